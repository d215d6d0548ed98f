use super::{Dictionary, Reference};

pub const TRAILER: &[u8] = b"trailer";
pub const K_SIZE: &[u8] = b"Size";
pub const K_ROOT: &[u8] = b"Root";
pub const K_INFO: &[u8] = b"Info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailerError {
    InvalidSize,
    MissingSize,
    InvalidRoot,
    MissingRoot,
    InvalidInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trailer {
    /// Number of xref entries, the free-list head included.
    pub size: usize,

    /// Reference to the root object.
    pub root: Reference,

    /// Information for this document.
    pub info: Option<Reference>,
}

impl From<&Trailer> for Dictionary {
    fn from(trailer: &Trailer) -> Self {
        let mut dict = Dictionary::new();
        dict.insert(K_SIZE, trailer.size);
        dict.insert(K_ROOT, trailer.root);
        if let Some(info) = trailer.info {
            dict.insert(K_INFO, info);
        }
        dict
    }
}

impl TryFrom<&Dictionary> for Trailer {
    type Error = TrailerError;

    fn try_from(dict: &Dictionary) -> Result<Self, Self::Error> {
        Ok(Trailer {
            size: dict
                .get(K_SIZE)
                .ok_or(TrailerError::MissingSize)?
                .integer()
                .ok_or(TrailerError::InvalidSize)?
                .try_into()
                .map_err(|_| TrailerError::InvalidSize)?,

            root: *dict
                .get(K_ROOT)
                .ok_or(TrailerError::MissingRoot)?
                .reference()
                .ok_or(TrailerError::InvalidRoot)?,

            info: dict
                .get(K_INFO)
                .map(|o| o.reference().copied().ok_or(TrailerError::InvalidInfo))
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::Name;

    #[test]
    fn dictionary_round_trip() {
        let trailer = Trailer {
            size: 7,
            root: Reference::new(1, 0),
            info: Some(Reference::new(6, 0)),
        };
        let dict = Dictionary::from(&trailer);
        assert_eq!(Trailer::try_from(&dict), Ok(trailer));
    }

    #[test]
    fn missing_root() {
        let dict = Dictionary::new().with(K_SIZE, 3);
        assert_eq!(Trailer::try_from(&dict), Err(TrailerError::MissingRoot));
        let dict = dict.with(K_ROOT, Name::from("Catalog"));
        assert_eq!(Trailer::try_from(&dict), Err(TrailerError::InvalidRoot));
    }
}
