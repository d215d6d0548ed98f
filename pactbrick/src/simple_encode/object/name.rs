use crate::{parse::object::is_regular, pdf::Name, writer::Encoder};

use crate::simple_encode::SimpleEncoder;

impl Encoder<Name> for SimpleEncoder {
    fn encoded_len(n: &Name) -> usize {
        n.iter().map(|c| if escape_needed(*c) { 3 } else { 1 }).sum::<usize>() + 1
    }

    fn write_to(n: &Name, writer: &mut dyn crate::writer::Writer) {
        let mut last_write = 0;
        writer.write(b"/");
        for (index, &c) in n.iter().enumerate() {
            if escape_needed(c) {
                writer.write(&n[last_write..index]);
                last_write = index + 1;
                writer.write(b"#");
                writer.write(hex::encode([c]).as_bytes())
            }
        }
        writer.write(&n[last_write..]);
    }
}

/// Delimiters, whitespace, `#` itself and bytes outside the printable range
/// are written as `#xx`.
fn escape_needed(c: u8) -> bool {
    !is_regular(c) || c == b'#' || !(b'!'..=b'~').contains(&c)
}
