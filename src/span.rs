//! Line and cell slicing over a borrowed text buffer.
//!
//! Everything here is offset arithmetic: a [`Span`] is a `(start, len)` pair
//! into the text being loaded, and nothing in this module allocates. The
//! newline and the delimiter are ASCII, so every span boundary is also a
//! UTF-8 character boundary and slicing with it cannot panic.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end()]
    }
}

/// Returns the line starting at `cursor` and the cursor just past its `\n`.
///
/// `None` once the cursor reaches the end of `text`, so a trailing newline
/// does not yield an extra empty line. The last line need not end in `\n`.
pub fn next_line(text: &str, cursor: usize) -> Option<(Span, usize)> {
    let bytes = text.as_bytes();
    if cursor >= bytes.len() {
        return None;
    }
    match bytes[cursor..].iter().position(|&b| b == b'\n') {
        Some(offset) => Some((Span::new(cursor, offset), cursor + offset + 1)),
        None => Some((Span::new(cursor, bytes.len() - cursor), bytes.len())),
    }
}

/// Iterator over the lines of `text`, each paired with its 1-based line number.
pub fn lines(text: &str) -> Lines<'_> {
    Lines {
        text,
        cursor: 0,
        number: 0,
    }
}

#[derive(Debug, Clone)]
pub struct Lines<'a> {
    text: &'a str,
    cursor: usize,
    number: usize,
}

impl Iterator for Lines<'_> {
    type Item = (usize, Span);

    fn next(&mut self) -> Option<Self::Item> {
        let (line, cursor) = next_line(self.text, self.cursor)?;
        self.cursor = cursor;
        self.number += 1;
        Some((self.number, line))
    }
}

/// Splits `line` on `delimiter`. N delimiters always give N + 1 spans,
/// including empty ones for leading, trailing or adjacent delimiters.
pub fn split_cells<'a>(text: &'a str, line: Span, delimiter: u8) -> CellSpans<'a> {
    CellSpans {
        bytes: line.slice(text).as_bytes(),
        base: line.start,
        pos: 0,
        delimiter,
        done: false,
    }
}

#[derive(Debug, Clone)]
pub struct CellSpans<'a> {
    bytes: &'a [u8],
    base: usize,
    pos: usize,
    delimiter: u8,
    done: bool,
}

impl Iterator for CellSpans<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        if self.done {
            return None;
        }
        let rest = &self.bytes[self.pos..];
        let span = match rest.iter().position(|&b| b == self.delimiter) {
            Some(offset) => {
                let span = Span::new(self.base + self.pos, offset);
                self.pos += offset + 1;
                span
            }
            None => {
                self.done = true;
                Span::new(self.base + self.pos, rest.len())
            }
        };
        Some(span)
    }
}

/// Narrows `span` so it excludes leading and trailing whitespace.
pub fn trim(text: &str, span: Span) -> Span {
    let raw = span.slice(text);
    let leading = raw.len() - raw.trim_start().len();
    let trimmed = raw.trim();
    Span::new(span.start + leading, trimmed.len())
}

/// Whitespace-only lines are skipped by both pipelines rather than becoming
/// zero-field rows.
pub fn is_blank(text: &str, span: Span) -> bool {
    trim(text, span).is_empty()
}
