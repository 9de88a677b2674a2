//! Display buffers for UI renderers.
//!
//! Widgets produce a [`TextBuffer`] of styled cells ("text grid" output) and a
//! frontend paints it. Cells carry abstract [`StyleId`]s; mapping them to
//! concrete colors is the frontend's job. Cell widths follow `unicode-width`,
//! so CJK wide characters occupy two cells.

use unicode_width::UnicodeWidthChar;

/// Identifier of a display style, mapped to concrete colors by the frontend.
pub type StyleId = u32;

/// Style applied to addon mode lines.
pub const STYLE_MODE_LINE: StyleId = 1;
/// Style applied to the pending-preview span of the code area.
pub const STYLE_PENDING: StyleId = 2;
/// Style applied to the prompt.
pub const STYLE_PROMPT: StyleId = 3;

/// Cell (character) information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Character content.
    pub ch: char,
    /// Visual width (1 or 2 cells).
    pub width: usize,
    /// List of applied style IDs.
    pub styles: Vec<StyleId>,
}

impl Cell {
    /// Create a cell without any styles applied.
    pub fn new(ch: char, width: usize) -> Self {
        Self {
            ch,
            width,
            styles: Vec::new(),
        }
    }

    /// Create a cell with an explicit style list.
    pub fn with_styles(ch: char, width: usize, styles: Vec<StyleId>) -> Self {
        Self { ch, width, styles }
    }
}

/// Position of the cursor inside a [`TextBuffer`], in (visual line, cell column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    /// Visual line index, 0-based.
    pub line: usize,
    /// Cell column, 0-based.
    pub col: usize,
}

/// A rendered region of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    /// Width the buffer was laid out for, in cells.
    pub width: usize,
    /// Visual lines, top to bottom.
    pub lines: Vec<Vec<Cell>>,
    /// Where the terminal cursor should be placed, if anywhere in this buffer.
    pub dot: Option<Pos>,
}

impl TextBuffer {
    /// Create an empty buffer (zero lines) for the given width.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            dot: None,
        }
    }

    /// Number of visual lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Keep only the visual lines in `[start, end)`.
    ///
    /// The dot is shifted accordingly; a dot outside the kept window is
    /// dropped. `trim_to_lines(0, 0)` yields an empty rendering.
    pub fn trim_to_lines(&mut self, start: usize, end: usize) {
        let end = end.min(self.lines.len());
        let start = start.min(end);
        self.lines.truncate(end);
        self.lines.drain(..start);
        self.dot = self.dot.and_then(|dot| {
            (start..end).contains(&dot.line).then_some(Pos {
                line: dot.line - start,
                col: dot.col,
            })
        });
    }

    /// Stack `other` below this buffer.
    ///
    /// If `move_dot` is `true`, the dot moves to `other`'s dot (shifted by the
    /// number of lines already present); otherwise this buffer's dot stays.
    pub fn extend(&mut self, other: TextBuffer, move_dot: bool) {
        let offset = self.lines.len();
        if move_dot {
            self.dot = other.dot.map(|dot| Pos {
                line: dot.line + offset,
                col: dot.col,
            });
        }
        self.lines.extend(other.lines);
    }
}

/// Incremental writer that fills a [`TextBuffer`] left to right, wrapping when
/// a cell would cross the buffer width.
#[derive(Debug)]
pub struct BufferBuilder {
    width: usize,
    lines: Vec<Vec<Cell>>,
    col: usize,
    dot: Option<Pos>,
}

impl BufferBuilder {
    /// Create a builder for the given width (clamped to at least 1 cell).
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            lines: vec![Vec::new()],
            col: 0,
            dot: None,
        }
    }

    /// Write `text` with the given styles, wrapping at the buffer width.
    ///
    /// `'\n'` starts a new visual line.
    pub fn write_str(mut self, text: &str, styles: &[StyleId]) -> Self {
        for ch in text.chars() {
            self = self.write_char(ch, styles);
        }
        self
    }

    /// Write a single character with the given styles.
    pub fn write_char(mut self, ch: char, styles: &[StyleId]) -> Self {
        if ch == '\n' {
            return self.newline();
        }
        let width = UnicodeWidthChar::width(ch).unwrap_or(1).max(1);
        if self.col + width > self.width {
            self = self.newline();
        }
        if let Some(line) = self.lines.last_mut() {
            line.push(Cell::with_styles(ch, width, styles.to_vec()));
        }
        self.col += width;
        self
    }

    /// Start a new visual line.
    pub fn newline(mut self) -> Self {
        self.lines.push(Vec::new());
        self.col = 0;
        self
    }

    /// Record the dot at the current write position.
    pub fn set_dot_here(mut self) -> Self {
        self.dot = Some(Pos {
            line: self.lines.len() - 1,
            col: self.col,
        });
        self
    }

    /// Finish and return the built buffer.
    pub fn buffer(self) -> TextBuffer {
        TextBuffer {
            width: self.width,
            lines: self.lines,
            dot: self.dot,
        }
    }
}
