use nom::error::{ErrorKind, ParseError};

use crate::pdf::trailer::TrailerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PbParseErrorKind {
    InvalidTrailer(TrailerError),
    StartxrefInvalid,
    BackwardSearchNotFound,
    XrefInvalid,
    /// A stream without a direct, non-negative `/Length`.
    StreamLength,
    /// The xref table names an object that is not in the table or whose offset
    /// does not point at its `obj` header.
    ObjectOffset(u32),
    /// Catalog, page tree or page that is not a dictionary where one is needed.
    PageTree,
    /// More input was needed.
    Incomplete,
    Nom(ErrorKind),
}

impl From<TrailerError> for PbParseErrorKind {
    fn from(err: TrailerError) -> Self {
        PbParseErrorKind::InvalidTrailer(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbParseError<I> {
    pub input: I,
    pub kind: PbParseErrorKind,
    pub from: Option<Box<Self>>,
}

impl<I> PbParseError<I> {
    pub fn new(input: I, kind: PbParseErrorKind) -> Self {
        Self {
            input,
            kind,
            from: None,
        }
    }
}

impl<I> ParseError<I> for PbParseError<I> {
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        Self {
            input,
            kind: PbParseErrorKind::Nom(kind),
            from: None,
        }
    }

    fn append(input: I, kind: ErrorKind, other: Self) -> Self {
        Self {
            input,
            kind: PbParseErrorKind::Nom(kind),
            from: Some(other.into()),
        }
    }
}
