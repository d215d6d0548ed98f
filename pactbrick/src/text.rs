//! Text preparation for the single-byte font encoding.
//!
//! Text shown on the page goes through [`normalize`] first and [`escape`]
//! second. Escaping normalized text is safe; normalizing escaped text is not
//! needed and escaping twice doubles every backslash.

/// Fallback for characters without a single-byte representation.
pub const PLACEHOLDER: char = '?';

/// Highest code point that survives the encoding unchanged.
const MAX_SINGLE_BYTE: u32 = 0xFF;

/// ASCII replacements for common typographic characters. Consulted before the
/// range check, so no-break spaces become plain spaces.
fn substitute(c: char) -> Option<&'static str> {
    let s = match c {
        '\u{2014}' | '\u{2013}' | '\u{2012}' | '\u{2015}' | '\u{2212}' => "-",
        '\u{2018}' | '\u{2019}' => "'",
        '\u{201A}' => ",",
        '\u{201C}' | '\u{201D}' | '\u{201E}' => "\"",
        '\u{2026}' => "...",
        '\u{00A0}' | '\u{202F}' | '\u{2009}' | '\u{2007}' | '\u{2002}' | '\u{2003}' | '\u{200A}' => " ",
        '\u{200B}' | '\u{2060}' => "",
        _ => return None,
    };
    Some(s)
}

/// Map text onto the characters the page font can encode.
///
/// Characters up to U+00FF are kept (accents included), typographic characters
/// get an ASCII substitute and everything else becomes [`PLACEHOLDER`].
pub fn normalize(text: Option<&str>) -> String {
    let text = match text {
        Some(t) => t,
        None => return String::new(),
    };

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if let Some(sub) = substitute(c) {
            out.push_str(sub);
        } else if u32::from(c) <= MAX_SINGLE_BYTE {
            out.push(c);
        } else {
            out.push(PLACEHOLDER);
        }
    }
    out
}

/// Escape the characters reserved inside a literal string: the backslash,
/// then both parentheses.
pub fn escape(text: &str) -> String {
    text.replace('\\', r"\\").replace('(', r"\(").replace(')', r"\)")
}

/// Encode normalized text, one byte per character.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(PLACEHOLDER as u8))
        .collect()
}

/// Normalize, escape and encode in the only order that is correct.
pub fn literal_bytes(text: &str) -> Vec<u8> {
    encode(&escape(&normalize(Some(text))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_latin1_accents() {
        assert_eq!(normalize(Some("Énergie à Noël")), "Énergie à Noël");
    }

    #[test]
    fn absent_text_is_empty() {
        assert_eq!(normalize(None), "");
    }

    #[test]
    fn substitutes_typographic_characters() {
        assert_eq!(normalize(Some("a\u{2014}b\u{2013}c")), "a-b-c");
        assert_eq!(normalize(Some("\u{201C}quoted\u{201D}")), "\"quoted\"");
        assert_eq!(normalize(Some("l\u{2019}offre")), "l'offre");
        assert_eq!(normalize(Some("wait\u{2026}")), "wait...");
        assert_eq!(normalize(Some("1\u{00A0}000\u{202F}kWh")), "1 000 kWh");
        assert_eq!(normalize(Some("zero\u{200B}width\u{2060}")), "zerowidth");
    }

    #[test]
    fn unknown_characters_become_placeholder() {
        assert_eq!(normalize(Some("€ 5")), "? 5");
        assert_eq!(normalize(Some("日本")), "??");
        assert_eq!(normalize(Some("🙂")), "?");
    }

    #[test]
    fn escape_order() {
        assert_eq!(escape(r"a\b"), r"a\\b");
        assert_eq!(escape("(x)"), r"\(x\)");
        assert_eq!(escape(r"\("), r"\\\(");
    }

    #[test]
    fn escaped_output_has_no_bare_delimiters() {
        let inputs = [
            r"((\))",
            "\\",
            "\u{201C}(nested \\ stuff)\u{201D}",
            ")(",
            "plain",
            "\\\\(",
        ];
        for input in inputs {
            let out = escape(&normalize(Some(input)));
            let bytes = out.as_bytes();
            let mut i = 0;
            while i < bytes.len() {
                match bytes[i] {
                    b'\\' => {
                        assert!(
                            matches!(bytes.get(i + 1), Some(b'\\' | b'(' | b')')),
                            "dangling backslash in {:?}",
                            out
                        );
                        i += 2;
                    }
                    b'(' | b')' => panic!("unescaped delimiter in {:?}", out),
                    _ => i += 1,
                }
            }
        }
    }

    #[test]
    fn encode_is_single_byte() {
        assert_eq!(encode("é"), vec![0xE9]);
        assert_eq!(literal_bytes("Prénom (x)"), b"Pr\xE9nom \\(x\\)".to_vec());
        assert_eq!(literal_bytes("€"), b"?".to_vec());
    }
}
