use std::io::{Read, Write};

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};

use super::{document::K_FILTER, Bytes, Dictionary, Name, Object};
use crate::error::PbError;

pub(crate) const FLATE_DECODE: &[u8] = b"FlateDecode";

#[derive(Clone, Debug, PartialEq)]
pub struct Stream {
    pub dictionary: Dictionary,
    pub data: Bytes,
}

impl Stream {
    pub fn new(dictionary: Dictionary, data: impl Into<Bytes>) -> Self {
        Self {
            dictionary,
            data: data.into(),
        }
    }

    /// Deflate `data` and mark the stream with `/Filter /FlateDecode`.
    pub fn compressed(dictionary: Dictionary, data: &[u8]) -> Result<Self, PbError> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        let compressed = encoder.finish()?;
        log::trace!("deflated stream {} -> {} bytes", data.len(), compressed.len());

        Ok(Self::new(
            dictionary.with(K_FILTER, Name::from(FLATE_DECODE)),
            compressed,
        ))
    }

    pub fn filter(&self) -> Option<&Name> {
        self.dictionary.get(K_FILTER).and_then(Object::name)
    }

    /// Stream content with `FlateDecode` undone. Other filters (for example an
    /// embedded JPEG's `DCTDecode`) are returned as stored.
    pub fn decoded_data(&self) -> Result<Vec<u8>, PbError> {
        match self.filter() {
            Some(f) if &f[..] == FLATE_DECODE => {
                let mut out = Vec::new();
                ZlibDecoder::new(&self.data[..]).read_to_end(&mut out)?;
                Ok(out)
            }
            _ => Ok(self.data.to_vec()),
        }
    }
}
