//! Page content stream builder.
//!
//! Every method appends one line. Text given to [`Content::show_text`]
//! is normalized, escaped and encoded before it lands in the stream.

use crate::{pdf::Name, text, writer::format_real};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Content {
    buf: Vec<u8>,
}

impl Content {
    pub fn new() -> Self {
        Self::default()
    }

    fn op(&mut self, operands: &[String], operator: &str) -> &mut Self {
        self.ops(&[(operands, operator)])
    }

    /// Several operators on one line.
    fn ops(&mut self, ops: &[(&[String], &str)]) -> &mut Self {
        for (i, (operands, operator)) in ops.iter().enumerate() {
            if i > 0 {
                self.buf.push(b' ');
            }
            for operand in operands.iter() {
                self.buf.extend_from_slice(operand.as_bytes());
                self.buf.push(b' ');
            }
            self.buf.extend_from_slice(operator.as_bytes());
        }
        self.buf.push(b'\n');
        self
    }

    fn name(name: &Name) -> String {
        format!("/{}", name)
    }

    /// `q`
    pub fn save_state(&mut self) -> &mut Self {
        self.op(&[], "q")
    }

    /// `Q`
    pub fn restore_state(&mut self) -> &mut Self {
        self.op(&[], "Q")
    }

    pub fn set_fill_rgb(&mut self, r: f64, g: f64, b: f64) -> &mut Self {
        self.op(&rgb([r, g, b]), "rg")
    }

    /// `w`, `RG` and `rg` on one line: line width, stroke and fill color.
    pub fn set_line_style(&mut self, width: f64, stroke: [f64; 3], fill: [f64; 3]) -> &mut Self {
        let width = [number(width)];
        let (stroke, fill) = (rgb(stroke), rgb(fill));
        self.ops(&[(&width[..], "w"), (&stroke[..], "RG"), (&fill[..], "rg")])
    }

    /// Concatenate `[a b c d e f]` to the current transformation matrix.
    pub fn transform(&mut self, matrix: [f64; 6]) -> &mut Self {
        let operands: Vec<String> = matrix.iter().map(|v| format_real(*v)).collect();
        self.op(&operands, "cm")
    }

    /// Paint a named XObject.
    pub fn x_object(&mut self, name: &Name) -> &mut Self {
        self.op(&[Self::name(name)], "Do")
    }

    pub fn begin_text(&mut self) -> &mut Self {
        self.op(&[], "BT")
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.op(&[], "ET")
    }

    pub fn set_font(&mut self, font: &Name, size: f64) -> &mut Self {
        self.op(&[Self::name(font), number(size)], "Tf")
    }

    pub fn set_leading(&mut self, leading: f64) -> &mut Self {
        self.op(&[number(leading)], "TL")
    }

    pub fn next_line_at(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[number(x), format_real(y)], "Td")
    }

    /// `T*`: move down by the leading.
    pub fn next_line(&mut self) -> &mut Self {
        self.op(&[], "T*")
    }

    pub fn show_text(&mut self, text: &str) -> &mut Self {
        self.buf.push(b'(');
        self.buf.extend(text::literal_bytes(text));
        self.buf.extend_from_slice(b") Tj\n");
        self
    }

    /// Stroke a straight segment: `m`, `l` and `S` on one line.
    pub fn stroke_segment(&mut self, from: (f64, f64), to: (f64, f64)) -> &mut Self {
        let from = [format_real(from.0), format_real(from.1)];
        let to = [format_real(to.0), format_real(to.1)];
        self.ops(&[(&from[..], "m"), (&to[..], "l"), (&[][..], "S")])
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Whole numbers without decimals, everything else with two.
fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{}", value as i64)
    } else {
        format_real(value)
    }
}

fn rgb(components: [f64; 3]) -> [String; 3] {
    components.map(|c| number(c.clamp(0.0, 1.0)))
}
