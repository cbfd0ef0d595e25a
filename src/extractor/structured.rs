//! Structured data extraction: JSON-LD, microdata and RDFa.
//!
//! All three are deliberately shallow. Microdata only records the scope's own
//! `itemtype` and at most one `itemprop` carried on the same tag, and RDFa
//! produces one flat record per annotated tag with no nesting.

use serde_json::{Map, Value};

use crate::extractor::model::{MicrodataItem, RdfaItem};
use crate::extractor::tokenizer::Attributes;

pub const JSON_LD_MIME: &str = "application/ld+json";

const RDFA_ATTRIBUTES: [&str; 3] = ["property", "typeof", "vocab"];

pub fn is_json_ld_script(attrs: &Attributes) -> bool {
    attrs
        .get("type")
        .is_some_and(|t| t.trim().eq_ignore_ascii_case(JSON_LD_MIME))
}

/// Parses a captured JSON-LD script body. Malformed JSON yields `None`.
pub fn parse_json_ld(text: &str) -> Option<Value> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    serde_json::from_str(text).ok()
}

/// Top-level JSON-LD objects, looking one level into array payloads.
pub fn json_ld_objects(values: &[Value]) -> impl Iterator<Item = &Map<String, Value>> {
    values.iter().flat_map(|value| match value {
        Value::Object(obj) => vec![obj],
        Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
        _ => Vec::new(),
    })
}

/// Item for a tag carrying `itemscope`.
pub fn microdata_item(attrs: &Attributes) -> MicrodataItem {
    let mut item = MicrodataItem {
        item_type: attrs.get_or_empty("itemtype").to_string(),
        ..Default::default()
    };
    if let Some(prop) = attrs.get("itemprop") {
        item.properties
            .insert(prop.to_string(), attrs.get_or_empty("content").to_string());
    }
    item
}

pub fn has_rdfa(attrs: &Attributes) -> bool {
    RDFA_ATTRIBUTES.iter().any(|name| attrs.contains(name))
}

pub fn rdfa_item(attrs: &Attributes) -> RdfaItem {
    RdfaItem {
        property: attrs.get_or_empty("property").to_string(),
        type_of: attrs.get_or_empty("typeof").to_string(),
        content: attrs.get_or_empty("content").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn json_ld_script_detection_is_case_insensitive() {
        assert!(is_json_ld_script(&attrs(&[("type", "APPLICATION/LD+JSON")])));
        assert!(!is_json_ld_script(&attrs(&[("type", "text/javascript")])));
        assert!(!is_json_ld_script(&attrs(&[])));
    }

    #[test]
    fn malformed_json_ld_is_dropped() {
        assert_eq!(parse_json_ld("{invalid json"), None);
        assert_eq!(parse_json_ld("   "), None);
        assert_eq!(
            parse_json_ld(r#" {"@type": "Article"} "#),
            Some(json!({"@type": "Article"}))
        );
    }

    #[test]
    fn json_ld_objects_flattens_top_level_arrays() {
        let values = vec![
            json!({"@type": "WebSite"}),
            json!([{"@type": "Organization"}, 3, {"@type": "Person"}]),
            json!("stray"),
        ];
        let types: Vec<_> = json_ld_objects(&values)
            .map(|obj| obj["@type"].as_str().unwrap())
            .collect();
        assert_eq!(types, vec!["WebSite", "Organization", "Person"]);
    }

    #[test]
    fn microdata_captures_type_and_own_property() {
        let item = microdata_item(&attrs(&[
            ("itemscope", ""),
            ("itemtype", "https://schema.org/Offer"),
            ("itemprop", "offers"),
            ("content", "19.99"),
        ]));
        assert_eq!(item.item_type, "https://schema.org/Offer");
        assert_eq!(item.properties.get("offers").map(String::as_str), Some("19.99"));

        let bare = microdata_item(&attrs(&[("itemscope", "")]));
        assert_eq!(bare.item_type, "");
        assert!(bare.properties.is_empty());
    }

    #[test]
    fn rdfa_records_are_flat() {
        let a = attrs(&[("vocab", "https://schema.org/"), ("typeof", "Person")]);
        assert!(has_rdfa(&a));
        assert_eq!(
            rdfa_item(&a),
            RdfaItem {
                property: String::new(),
                type_of: "Person".to_string(),
                content: String::new(),
            }
        );
        assert!(!has_rdfa(&attrs(&[("class", "x")])));
    }
}
