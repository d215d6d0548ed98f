use std::ops::Deref;

use crate::text;

/// Literal string object. Holds the raw single-byte content; escaping happens
/// on encode.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PdfString(Vec<u8>);

impl PdfString {
    /// Build a string from arbitrary text by normalizing it to the single-byte
    /// encoding first.
    pub fn from_text(s: &str) -> Self {
        PdfString(text::encode(&text::normalize(Some(s))))
    }
}

impl From<Vec<u8>> for PdfString {
    fn from(v: Vec<u8>) -> Self {
        PdfString(v)
    }
}

impl Deref for PdfString {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Debug for PdfString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PdfString")
            .field(&String::from_utf8_lossy(&self.0[..]))
            .finish()
    }
}

impl std::fmt::Display for PdfString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // single-byte content, so every byte is its own code point
        let s: String = self.0.iter().map(|&b| char::from(b)).collect();
        write!(f, "{}", s)
    }
}
