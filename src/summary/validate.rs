use std::fmt::{Display, Formatter};

use crate::summary::model::PageSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A required key is empty.
    Error,
    /// A recommended key is empty.
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub page_id: String,
    pub field: &'static str,
    pub severity: Severity,
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let kind = match self.severity {
            Severity::Error => "missing required",
            Severity::Warning => "missing recommended",
        };
        write!(f, "page '{}': {kind} field '{}'", self.page_id, self.field)
    }
}

/// Checks pages for empty required (`id`, `u`, `t`, `ti`) and recommended
/// (`d`, `kw`, `emb`) keys.
pub fn validate_pages(pages: &[PageSummary]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for page in pages {
        let required = [
            ("id", page.id.is_empty()),
            ("u", page.u.is_empty()),
            ("t", page.t.is_empty()),
            ("ti", page.ti.is_empty()),
        ];
        let recommended = [
            ("d", page.d.is_empty()),
            ("kw", page.kw.is_empty()),
            ("emb", page.emb.is_empty()),
        ];

        let found = required
            .into_iter()
            .map(|(field, empty)| (field, empty, Severity::Error))
            .chain(
                recommended
                    .into_iter()
                    .map(|(field, empty)| (field, empty, Severity::Warning)),
            )
            .filter(|(_, empty, _)| *empty)
            .map(|(field, _, severity)| ValidationIssue {
                page_id: page.id.clone(),
                field,
                severity,
            });
        issues.extend(found);
    }
    issues
}
