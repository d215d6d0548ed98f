use crate::{pdf::Array, writer::Encoder};

use crate::simple_encode::SimpleEncoder;

impl Encoder<Array> for SimpleEncoder {
    fn write_to(array: &Array, writer: &mut dyn crate::writer::Writer) {
        writer.write(b"[");
        for (i, item) in array.iter().enumerate() {
            if i != 0 {
                writer.write(b" ");
            }
            Self::write_to(item, writer);
        }
        writer.write(b"]");
    }
}
