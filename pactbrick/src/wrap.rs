/// Width used for body text on the contract page, in characters.
pub const DEFAULT_MAX_WIDTH: usize = 95;

/// A space closer to the line start than this is not used as a break point.
pub const DEFAULT_MIN_BREAK: usize = 40;

/// Greedy character-count word wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWrapper {
    pub max_width: usize,
    pub min_break: usize,
}

impl Default for LineWrapper {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            min_break: DEFAULT_MIN_BREAK,
        }
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split on hard line breaks. `\r\n` counts as one break and a trailing break
/// does not open an empty paragraph.
fn paragraphs(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if is_line_break(c) {
            out.push(&text[start..i]);
            let mut end = i + c.len_utf8();
            if c == '\r' {
                if let Some(&(j, '\n')) = chars.peek() {
                    end = j + 1;
                    chars.next();
                }
            }
            start = end;
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

fn trimmed(chars: &[char]) -> &[char] {
    let start = chars.iter().position(|c| !c.is_whitespace()).unwrap_or(chars.len());
    let end = chars.iter().rposition(|c| !c.is_whitespace()).map_or(start, |i| i + 1);
    &chars[start..end]
}

impl LineWrapper {
    pub fn new(max_width: usize) -> Self {
        Self {
            max_width,
            ..Self::default()
        }
    }

    pub fn with_min_break(mut self, min_break: usize) -> Self {
        self.min_break = min_break;
        self
    }

    /// Wrap `text` into lines of at most `max_width` characters.
    ///
    /// Always returns at least one line; empty input gives a single empty line.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        let max = self.max_width.max(1);
        let mut lines = Vec::new();

        for para in paragraphs(text) {
            let chars: Vec<char> = para.chars().collect();
            let mut rest = trimmed(&chars);

            while rest.len() > max {
                let cut = match rest[..max].iter().rposition(|&c| c == ' ') {
                    Some(space) if space >= self.min_break => space,
                    _ => max,
                };
                lines.push(trimmed(&rest[..cut]).iter().collect());
                rest = trimmed(&rest[cut..]);
            }
            if !rest.is_empty() {
                lines.push(rest.iter().collect());
            }
        }

        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }
}

/// Wrap with the default break offset.
pub fn wrap(text: &str, max_width: usize) -> Vec<String> {
    LineWrapper::new(max_width).wrap(text)
}
