/// Byte sink that knows how much has been written to it.
///
/// The position is what the cross-reference table records, so it must count
/// every byte handed to [`Writer::write`].
pub trait Writer {
    fn write(&mut self, buf: &[u8]);
    fn position(&self) -> usize;
}

impl Writer for Vec<u8> {
    fn write(&mut self, buf: &[u8]) {
        self.extend_from_slice(buf);
    }

    fn position(&self) -> usize {
        self.len()
    }
}

/// Writer that only counts bytes.
#[derive(Debug, Default)]
pub struct CountingWriter {
    count: usize,
}

impl Writer for CountingWriter {
    fn write(&mut self, buf: &[u8]) {
        self.count += buf.len();
    }

    fn position(&self) -> usize {
        self.count
    }
}

pub trait Encoder<T: ?Sized> {
    fn write_to(obj: &T, writer: &mut dyn Writer);

    fn encoded_len(obj: &T) -> usize {
        let mut counter = CountingWriter::default();
        Self::write_to(obj, &mut counter);
        counter.position()
    }
}

/// Reals are written with two decimals.
pub(crate) fn format_real(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_position_tracks_length() {
        let mut out = Vec::<u8>::new();
        out.write(b"%PDF-1.7\n");
        assert_eq!(out.position(), 9);
    }

    #[test]
    fn real_formatting() {
        assert_eq!(format_real(110.0), "110.00");
        assert_eq!(format_real(702.5), "702.50");
        assert_eq!(format_real(1.0 / 3.0), "0.33");
    }
}
