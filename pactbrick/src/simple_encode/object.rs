use crate::{
    pdf::Object,
    writer::{format_real, Encoder, Writer},
};

use super::SimpleEncoder;

pub(crate) mod array;
pub(crate) mod dictionary;
pub(crate) mod name;
pub(crate) mod stream;
pub(crate) mod string;

pub(crate) const TRUE_OBJECT: &[u8] = b"true";
pub(crate) const FALSE_OBJECT: &[u8] = b"false";
pub(crate) const NULL_OBJECT: &[u8] = b"null";
pub(crate) const REFERENCE: &[u8] = b"R";

impl Encoder<Object> for SimpleEncoder {
    fn write_to(obj: &Object, writer: &mut dyn Writer) {
        match obj {
            Object::String(str) => Self::write_to(str, writer),
            Object::HexString(bytes) => {
                writer.write(b"<");
                writer.write(hex::encode(&bytes[..]).as_bytes());
                writer.write(b">");
            }
            Object::Real(f) => writer.write(format_real(f64::from(*f)).as_bytes()),
            Object::Integer(i) => writer.write(i.to_string().as_bytes()),
            Object::Bool(true) => writer.write(TRUE_OBJECT),
            Object::Bool(false) => writer.write(FALSE_OBJECT),
            Object::Name(n) => Self::write_to(n, writer),
            Object::Array(a) => Self::write_to(a, writer),
            Object::Dictionary(d) => Self::write_to(d, writer),
            Object::Stream(s) => Self::write_to(s, writer),
            Object::Null => writer.write(NULL_OBJECT),
            Object::Reference(r) => {
                writer.write(r.index.to_string().as_bytes());
                writer.write(b" ");
                writer.write(r.generation.to_string().as_bytes());
                writer.write(b" ");
                writer.write(REFERENCE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{Bytes, Reference};

    fn encode(obj: &Object) -> Vec<u8> {
        let mut out = Vec::<u8>::new();
        SimpleEncoder::write_to(obj, &mut out);
        assert_eq!(SimpleEncoder::encoded_len(obj), out.len());
        out
    }

    #[test]
    fn scalars() {
        assert_eq!(encode(&Object::Integer(-12)), b"-12");
        assert_eq!(encode(&Object::Real(0.5)), b"0.50");
        assert_eq!(encode(&Object::Bool(false)), b"false");
        assert_eq!(encode(&Object::Null), b"null");
        assert_eq!(encode(&Object::HexString(Bytes::from(vec![0xAB, 0x01]))), b"<ab01>");
    }

    #[test]
    fn reference() {
        assert_eq!(encode(&Object::Reference(Reference::new(12, 0))), b"12 0 R");
    }
}
