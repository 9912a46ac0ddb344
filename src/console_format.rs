/// Console formatting module - Pure rendering concerns
///
/// This module handles all console output formatting including:
/// - Grid layout with left-justified headers
/// - Text truncation, padding and word wrapping
/// - Terminal width detection
///
/// It accepts pre-formatted cells from the report module and renders them.
///
/// ## Output Flexibility
///
/// `TableWriter` writes to any `std::io::Write` destination, so the same
/// rendering serves stdout and string buffers in tests.

use std::io::{self, Write};
use std::sync::OnceLock;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Space between columns
const GUTTER: &str = "  ";

/// Alignment of a cell within its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Writer for table output - configurable for color/plain text
pub struct TableWriter<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> TableWriter<W> {
    /// Create a new table writer
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Write a section banner such as `===== Report =====`
    pub fn write_banner(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", format_banner(title))
    }

    /// Write a grid of cells under left-justified headers
    ///
    /// Column width is the widest header or cell line, capped at `max_width`.
    /// Cells may contain newlines; each such row spans several lines.
    pub fn write_grid(
        &mut self,
        headers: &[String],
        rows: &[Vec<(String, Align)>],
        max_width: usize,
    ) -> io::Result<()> {
        let widths = column_widths(headers, rows, max_width);

        let header_line: Vec<String> =
            headers.iter().zip(&widths).map(|(h, w)| truncate_with_padding(h, *w)).collect();
        let header_line = header_line.join(GUTTER);
        if self.use_colors {
            write!(self.writer, "\x1b[1m{}\x1b[0m", header_line.trim_end())?;
        } else {
            write!(self.writer, "{}", header_line.trim_end())?;
        }
        writeln!(self.writer)?;

        for row in rows {
            let split: Vec<Vec<&str>> = row.iter().map(|(text, _)| text.split('\n').collect()).collect();
            let height = split.iter().map(Vec::len).max().unwrap_or(1);

            for line_no in 0..height {
                let mut parts = Vec::with_capacity(widths.len());
                for (col, width) in widths.iter().enumerate() {
                    let line = split.get(col).and_then(|lines| lines.get(line_no)).copied().unwrap_or("");
                    let align = row.get(col).map(|(_, a)| *a).unwrap_or(Align::Left);
                    parts.push(align_cell(line, *width, align));
                }
                writeln!(self.writer, "{}", parts.join(GUTTER).trim_end())?;
            }
        }
        Ok(())
    }
}

/// Widest header or cell line per column, capped at `max_width`
pub fn column_widths(headers: &[String], rows: &[Vec<(String, Align)>], max_width: usize) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (col, (text, _)) in row.iter().enumerate() {
            let widest = text.split('\n').map(display_width).max().unwrap_or(0);
            if let Some(w) = widths.get_mut(col) {
                *w = (*w).max(widest);
            }
        }
    }
    widths.into_iter().map(|w| w.min(max_width)).collect()
}

/// Narrowest column cap used when fitting a grid to the console
const MIN_FIT_WIDTH: usize = 12;

/// Column cap that fits `columns` columns and their gutters into
/// `console_width`, between `MIN_FIT_WIDTH` and `max_width`
pub fn fit_column_width(console_width: usize, columns: usize, max_width: usize) -> usize {
    if columns == 0 {
        return max_width;
    }
    let gutters = GUTTER.len() * (columns - 1);
    let share = console_width.saturating_sub(gutters) / columns;
    share.clamp(MIN_FIT_WIDTH.min(max_width), max_width)
}

fn align_cell(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => truncate_with_padding(text, width),
        Align::Right => {
            let display_w = display_width(text);
            if display_w >= width {
                truncate_with_padding(text, width)
            } else {
                format!("{}{}", " ".repeat(width - display_w), text)
            }
        }
    }
}

/// Format a section banner
pub fn format_banner(title: &str) -> String {
    format!("===== {} =====", title)
}

//
// Console width
//

static CONSOLE_WIDTH: OnceLock<usize> = OnceLock::new();

/// Override the detected console width (used by --console-width and tests)
pub fn set_console_width(width: usize) {
    let _ = CONSOLE_WIDTH.set(width); // Ignore error if already initialized
}

/// Console width: the override if set, else the terminal, else 120
pub fn get_console_width() -> usize {
    *CONSOLE_WIDTH.get_or_init(|| {
        if let Some((Width(w), _)) = terminal_size() {
            w as usize
        } else {
            120 // Default width
        }
    })
}

//
// Text Formatting Utilities
//

/// Count the display width of a string, accounting for wide Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate and pad string to exact width
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let display_w = display_width(s);

    if display_w <= width {
        return format!("{}{}", s, " ".repeat(width - display_w));
    }

    // Reserve space for "..."
    let target_width = if width >= 3 { width - 3 } else { width };
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let c_width = UnicodeWidthChar::width(c).unwrap_or(1);
        if current_width + c_width > target_width {
            break;
        }
        result.push(c);
        current_width += c_width;
    }

    if width >= 3 {
        result.push_str("...");
        current_width += 3;
    }

    if current_width < width {
        result.push_str(&" ".repeat(width - current_width));
    }

    result
}

/// Greedy word wrap by display width
///
/// Whitespace runs (including newlines) collapse to single spaces; words
/// wider than `width` are broken across lines. Blank input gives no lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = display_width(word);

        if word_width > width {
            // Fill what is left of the current line, then hard-break the rest
            let mut remaining = word;
            if current_width > 0 && current_width + 1 < width {
                let (head, tail) = split_at_width(remaining, width - current_width - 1);
                current.push(' ');
                current.push_str(head);
                remaining = tail;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            while display_width(remaining) > width {
                let (head, tail) = split_at_width(remaining, width);
                lines.push(head.to_string());
                remaining = tail;
            }
            current.push_str(remaining);
            current_width = display_width(remaining);
            continue;
        }

        if current_width == 0 {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split so the head is as wide as possible without exceeding `width`
/// (always at least one character, so wrapping makes progress)
fn split_at_width(s: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(1);
        if used + w > width && idx > 0 {
            return s.split_at(idx);
        }
        used += w;
    }
    (s, "")
}

#[cfg(test)]
#[path = "console_format_test.rs"]
mod console_format_test;
