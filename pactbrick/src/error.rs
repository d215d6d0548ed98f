use crate::parse::error::{PbParseError, PbParseErrorKind};

#[derive(Debug, Clone, PartialEq)]
pub enum PbError {
    Io,
    /// The contract payload is not valid JSON for the expected record.
    Payload(String),
    Base64,
    /// A reference to an object id that was never handed out by the document.
    UnknownObject(u32),
    Parse(PbParseErrorKind),
    NotFound,
    /// A blob key that would leave its bucket.
    InvalidLocation(String),
}

impl std::fmt::Display for PbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PbError::Io => write!(f, "I/O error"),
            PbError::Payload(msg) => write!(f, "invalid payload: {}", msg),
            PbError::Base64 => write!(f, "invalid base64 data"),
            PbError::UnknownObject(id) => write!(f, "unknown object {}", id),
            PbError::Parse(kind) => write!(f, "parse error: {:?}", kind),
            PbError::NotFound => write!(f, "not found"),
            PbError::InvalidLocation(key) => write!(f, "invalid blob key `{}`", key),
        }
    }
}

impl std::error::Error for PbError {}

impl<I> From<nom::Err<PbParseError<I>>> for PbError {
    fn from(err: nom::Err<PbParseError<I>>) -> Self {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => PbError::Parse(e.kind),
            nom::Err::Incomplete(_) => PbError::Parse(PbParseErrorKind::Incomplete),
        }
    }
}

impl From<std::io::Error> for PbError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            PbError::NotFound
        } else {
            PbError::Io
        }
    }
}

impl From<serde_json::Error> for PbError {
    fn from(err: serde_json::Error) -> Self {
        PbError::Payload(err.to_string())
    }
}

impl From<base64::DecodeError> for PbError {
    fn from(_: base64::DecodeError) -> Self {
        PbError::Base64
    }
}
