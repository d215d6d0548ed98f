use crate::{pdf::Dictionary, writer::Encoder};

use crate::simple_encode::SimpleEncoder;

impl Encoder<Dictionary> for SimpleEncoder {
    fn write_to(o: &Dictionary, writer: &mut dyn crate::writer::Writer) {
        writer.write(b"<<");
        for (key, value) in o.iter() {
            writer.write(b" ");
            Self::write_to(key, writer);
            writer.write(b" ");
            Self::write_to(value, writer);
        }
        writer.write(b" >>");
    }
}
