//! Text bounding-box estimation
//!
//! No font metrics are available, so text size is approximated from the
//! display width of each line and the font size. The estimate is meant to be
//! on the large side; the host application reflows text when a file opens.

use unicode_width::UnicodeWidthStr;

use super::geometry::Size;
use super::types::FontFamily;

/// Line height as a multiple of the font size
pub const LINE_HEIGHT: f64 = 1.25;

/// Distance from the top of a line to its baseline, as a multiple of the font size
pub const BASELINE_RATIO: f64 = 0.9;

/// Estimate the box needed to display `text` at `font_size`.
///
/// Width is the widest line (in display columns) times a per-family glyph
/// width; height is one [`LINE_HEIGHT`] per line. Lines are split on `\n`
/// the way the host application splits them, so a trailing newline adds an
/// empty last row (`"a\n"` is two lines tall). A `\r` before a newline is
/// ignored. Empty text yields a box of one glyph by one line, so the result
/// is always strictly positive for a positive font size.
///
/// # Example
/// ```
/// use procxd::core::{estimate_text_size, FontFamily};
///
/// let size = estimate_text_size("hello", 20.0, FontFamily::Code);
/// assert!(size.width > 0.0 && size.height > 0.0);
/// ```
pub fn estimate_text_size(text: &str, font_size: f64, family: FontFamily) -> Size {
    let font_size = font_size.max(1.0);
    let lines: Vec<&str> = text.split('\n').map(|l| l.trim_end_matches('\r')).collect();
    let columns = lines
        .iter()
        .map(|l| UnicodeWidthStr::width(*l))
        .max()
        .unwrap_or(0)
        .max(1);
    let line_count = lines.len();

    Size::new(
        columns as f64 * family.char_width_ratio() * font_size,
        line_count as f64 * LINE_HEIGHT * font_size,
    )
}
