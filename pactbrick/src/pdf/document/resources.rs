//! Font and image objects referenced from page resources.

use super::{dict_types, K_SUBTYPE, K_TYPE};
use crate::{
    jpeg::JpegHeader,
    pdf::{Dictionary, Name, Stream},
};

const K_BASE_FONT: &[u8] = b"BaseFont";
const K_ENCODING: &[u8] = b"Encoding";
const K_WIDTH: &[u8] = b"Width";
const K_HEIGHT: &[u8] = b"Height";
const K_COLOR_SPACE: &[u8] = b"ColorSpace";
const K_BITS_PER_COMPONENT: &[u8] = b"BitsPerComponent";

const DCT_DECODE: &[u8] = b"DCTDecode";
const WIN_ANSI_ENCODING: &[u8] = b"WinAnsiEncoding";

/// One of the standard 14 fonts, which readers provide without embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type1Font {
    pub base_font: Name,
}

impl Type1Font {
    pub fn helvetica() -> Self {
        Self {
            base_font: Name::from("Helvetica"),
        }
    }
}

impl From<&Type1Font> for Dictionary {
    fn from(font: &Type1Font) -> Self {
        Dictionary::new()
            .with(K_TYPE, Name::from(dict_types::FONT))
            .with(K_SUBTYPE, Name::from("Type1"))
            .with(K_BASE_FONT, font.base_font.clone())
            .with(K_ENCODING, Name::from(WIN_ANSI_ENCODING))
    }
}

/// Image XObject carrying a JPEG file verbatim.
pub fn jpeg_image(header: &JpegHeader, data: &[u8]) -> Stream {
    let dict = Dictionary::new()
        .with(K_TYPE, Name::from(dict_types::XOBJECT))
        .with(K_SUBTYPE, Name::from("Image"))
        .with(K_WIDTH, header.width)
        .with(K_HEIGHT, header.height)
        .with(K_COLOR_SPACE, Name::from(header.color_space()))
        .with(K_BITS_PER_COMPONENT, 8)
        .with(super::K_FILTER, Name::from(DCT_DECODE));
    Stream::new(dict, data)
}
