use crate::{
    pdf::PdfString,
    simple_encode::SimpleEncoder,
    writer::{Encoder, Writer},
};

fn needs_escape(c: u8) -> bool {
    matches!(c, b'\\' | b'(' | b')')
}

impl Encoder<PdfString> for SimpleEncoder {
    fn encoded_len(str: &PdfString) -> usize {
        // two bytes for the enclosing parentheses, one extra per escaped byte
        str.len() + str.iter().filter(|&&c| needs_escape(c)).count() + 2
    }

    fn write_to(str: &PdfString, writer: &mut dyn Writer) {
        writer.write(b"(");

        let mut last_written_index = 0;
        for (index, &char) in str.iter().enumerate() {
            if needs_escape(char) {
                writer.write(&str[last_written_index..index]);
                writer.write(br"\");
                last_written_index = index;
            }
        }
        writer.write(&str[last_written_index..]);
        writer.write(b")");
    }
}
