//! Minimal JPEG header scan.
//!
//! Only the marker segments are walked to find the frame header. Entropy-coded
//! data is never decoded; the raw file is embedded as a `DCTDecode` stream.

const SOI: [u8; 2] = [0xFF, 0xD8];
const FILL: u8 = 0xFF;

/// Start-of-frame markers: every `0xCn` except DHT (C4), JPG (C8) and DAC (CC).
const SOF_MARKERS: [u8; 13] = [
    0xC0, 0xC1, 0xC2, 0xC3, 0xC5, 0xC6, 0xC7, 0xC9, 0xCA, 0xCB, 0xCD, 0xCE, 0xCF,
];

/// Bytes of a frame header we need: length (2), precision (1), height (2), width (2).
const SOF_MIN_LEN: usize = 7;

const DEFAULT_COMPONENTS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegHeader {
    pub width: u16,
    pub height: u16,
    /// Colour components declared by the frame header.
    pub components: u8,
}

impl JpegHeader {
    pub fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Name of the device colour space matching the component count.
    pub fn color_space(&self) -> &'static [u8] {
        match self.components {
            1 => b"DeviceGray",
            4 => b"DeviceCMYK",
            _ => b"DeviceRGB",
        }
    }
}

fn be_u16(data: &[u8], at: usize) -> Option<usize> {
    let hi = *data.get(at)?;
    let lo = *data.get(at + 1)?;
    Some(usize::from(u16::from_be_bytes([hi, lo])))
}

/// Find the first start-of-frame segment and read the image size from it.
///
/// Returns `None` for anything that is not a JPEG or is cut short before the
/// frame header.
pub fn inspect(data: &[u8]) -> Option<JpegHeader> {
    if !data.starts_with(&SOI) {
        return None;
    }

    let mut cursor = 2;
    while cursor + 1 < data.len() {
        if data[cursor] != FILL {
            cursor += 1;
            continue;
        }
        while cursor < data.len() && data[cursor] == FILL {
            cursor += 1;
        }
        let marker = *data.get(cursor)?;
        cursor += 1;

        let length = be_u16(data, cursor)?;
        if SOF_MARKERS.contains(&marker) {
            if length < SOF_MIN_LEN || cursor + length > data.len() {
                log::debug!("truncated frame header at {}", cursor);
                return None;
            }
            let height = be_u16(data, cursor + 3)?;
            let width = be_u16(data, cursor + 5)?;
            let components = if length > SOF_MIN_LEN {
                data[cursor + SOF_MIN_LEN]
            } else {
                DEFAULT_COMPONENTS
            };
            return Some(JpegHeader {
                width: width as u16,
                height: height as u16,
                components,
            });
        }

        if length < 2 {
            log::debug!("invalid segment length {} for marker {:#04x}", length, marker);
            return None;
        }
        cursor += length;
    }

    None
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A JPEG-like buffer: SOI, an APP0 segment, a baseline frame header and EOI.
    pub(crate) fn tiny_jpeg(width: u16, height: u16, components: u8) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        // APP0 with a 16 byte payload
        data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        data.extend_from_slice(b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0");
        // SOF0: length 8 + 3 * components
        let len = 8 + 3 * u16::from(components);
        data.extend_from_slice(&[0xFF, 0xC0]);
        data.extend_from_slice(&len.to_be_bytes());
        data.push(8);
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&width.to_be_bytes());
        data.push(components);
        for id in 0..components {
            data.extend_from_slice(&[id + 1, 0x11, 0x00]);
        }
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    #[test]
    fn reads_frame_dimensions() {
        let header = inspect(&tiny_jpeg(800, 600, 3)).expect("frame header");
        assert_eq!(header.dimensions(), (800, 600));
        assert_eq!(header.components, 3);
        assert_eq!(header.color_space(), b"DeviceRGB");
    }

    #[test]
    fn grayscale_frame() {
        let header = inspect(&tiny_jpeg(16, 9, 1)).unwrap();
        assert_eq!(header.dimensions(), (16, 9));
        assert_eq!(header.color_space(), b"DeviceGray");
    }

    #[test]
    fn progressive_frame_and_fill_bytes() {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xFF, 0xFF, 0xC2, 0x00, 0x11, 0x08];
        data.extend_from_slice(&480u16.to_be_bytes());
        data.extend_from_slice(&640u16.to_be_bytes());
        data.extend_from_slice(&[3, 1, 0x11, 0, 2, 0x11, 0, 3, 0x11, 0]);
        assert_eq!(inspect(&data).map(|h| h.dimensions()), Some((640, 480)));
    }

    #[test]
    fn rejects_missing_start_marker() {
        assert_eq!(inspect(b""), None);
        assert_eq!(inspect(&[0xFF]), None);
        assert_eq!(inspect(b"\x89PNG\r\n\x1a\n"), None);
    }

    #[test]
    fn no_frame_before_end() {
        assert_eq!(inspect(&[0xFF, 0xD8]), None);
        assert_eq!(inspect(&[0xFF, 0xD8, 0xFF, 0xD9]), None);
        assert_eq!(inspect(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00]), None);
    }

    #[test]
    fn every_truncation_is_none() {
        let data = tiny_jpeg(800, 600, 3);
        let sof_end = data.len() - 2;
        for len in 0..sof_end {
            assert_eq!(inspect(&data[..len]), None, "prefix of {} bytes", len);
        }
    }

    #[test]
    fn bad_segment_lengths() {
        // length smaller than its own field
        assert_eq!(inspect(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x01, 0xFF, 0xC0]), None);
        // frame header declaring more bytes than available
        assert_eq!(
            inspect(&[0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x40, 0x08, 0x00, 0x10, 0x00, 0x10]),
            None
        );
        // frame header too short to hold width and height
        assert_eq!(
            inspect(&[0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x05, 0x08, 0x00, 0x10, 0x00, 0x10]),
            None
        );
    }

    #[test]
    fn skips_segments_to_reach_frame() {
        let mut data = vec![0xFF, 0xD8];
        for _ in 0..3 {
            data.extend_from_slice(&[0xFF, 0xE1, 0x00, 0x06, 0xC0, 0xC0, 0xC0, 0xC0]);
        }
        data.extend_from_slice(&[0xFF, 0xC1, 0x00, 0x07, 0x08, 0x00, 0x02, 0x00, 0x03]);
        let header = inspect(&data).unwrap();
        assert_eq!(header.dimensions(), (3, 2));
        assert_eq!(header.components, DEFAULT_COMPONENTS);
    }
}
