use crate::{
    pdf::{document::K_LENGTH, Stream},
    writer::Encoder,
};

use crate::simple_encode::SimpleEncoder;

const START_STREAM: &[u8] = b"\nstream\n";
const END_STREAM: &[u8] = b"\nendstream";

impl Encoder<Stream> for SimpleEncoder {
    fn write_to(s: &Stream, writer: &mut dyn crate::writer::Writer) {
        // the length always reflects the data we are about to write
        let updated_dict = s.dictionary.clone().with(K_LENGTH, s.data.len());
        Self::write_to(&updated_dict, writer);
        writer.write(START_STREAM);
        writer.write(&s.data);
        writer.write(END_STREAM);
    }
}
