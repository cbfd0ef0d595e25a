//! Fallback language guess for pages whose root element declares no `lang`.

use whatlang::Lang;

/// Paragraph text shorter than this many characters is not guessed at.
const MIN_SAMPLE_CHARS: usize = 50;
const MIN_CONFIDENCE: f64 = 0.25;

/// Two-letter codes for the languages most sites are written in. Other
/// languages keep whatlang's three-letter code.
const TWO_LETTER_CODES: [(Lang, &str); 24] = [
    (Lang::Eng, "en"),
    (Lang::Spa, "es"),
    (Lang::Fra, "fr"),
    (Lang::Deu, "de"),
    (Lang::Ita, "it"),
    (Lang::Por, "pt"),
    (Lang::Nld, "nl"),
    (Lang::Swe, "sv"),
    (Lang::Dan, "da"),
    (Lang::Fin, "fi"),
    (Lang::Pol, "pl"),
    (Lang::Ces, "cs"),
    (Lang::Hun, "hu"),
    (Lang::Ron, "ro"),
    (Lang::Ell, "el"),
    (Lang::Tur, "tr"),
    (Lang::Rus, "ru"),
    (Lang::Ukr, "uk"),
    (Lang::Heb, "he"),
    (Lang::Ara, "ar"),
    (Lang::Hin, "hi"),
    (Lang::Cmn, "zh"),
    (Lang::Jpn, "ja"),
    (Lang::Kor, "ko"),
];

/// Guesses the page language from its paragraphs. Returns `None` when there
/// is too little text or whatlang is not confident enough.
pub fn detect_paragraph_language(paragraphs: &[String]) -> Option<String> {
    let sample = paragraphs.join(" ");
    if sample.trim().chars().count() < MIN_SAMPLE_CHARS {
        return None;
    }

    let info = whatlang::detect(&sample).filter(|info| info.confidence() >= MIN_CONFIDENCE)?;
    Some(language_code(info.lang()).to_string())
}

fn language_code(lang: Lang) -> &'static str {
    TWO_LETTER_CODES
        .iter()
        .find(|(known, _)| *known == lang)
        .map_or(lang.code(), |&(_, code)| code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraphs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_guesses_from_joined_paragraphs() {
        let french = paragraphs(&[
            "Ceci est un petit texte écrit en français.",
            "Il sert à vérifier la détection automatique de la langue.",
        ]);
        assert_eq!(detect_paragraph_language(&french), Some("fr".to_string()));
    }

    #[test]
    fn test_sample_length_counts_characters() {
        // 30 two-byte characters: long enough in bytes, too short in chars.
        let text = "é".repeat(30);
        assert!(text.len() >= MIN_SAMPLE_CHARS);
        assert_eq!(detect_paragraph_language(&[text]), None);
    }

    #[test]
    fn test_no_paragraphs() {
        assert_eq!(detect_paragraph_language(&[]), None);
    }

    #[test]
    fn test_symbols_return_none() {
        let text = "1 2 3 4 5 6 7 8 9 0 ! @ # $ % ^ & * ( ) - = + [ ] { } | \\ : ; , . ? /";
        assert_eq!(detect_paragraph_language(&paragraphs(&[text])), None);
    }

    #[test]
    fn test_unlisted_language_keeps_three_letter_code() {
        assert_eq!(language_code(Lang::Epo), "epo");
        assert_eq!(language_code(Lang::Jpn), "ja");
    }
}
