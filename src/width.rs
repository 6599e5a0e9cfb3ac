//! Display width helpers for text labels.
//!
//! Labels may carry user-supplied names, so width is measured after stripping
//! ANSI escapes and with Unicode-aware column counting. Surfaces without a
//! font metrics API can size label boxes with [`estimated_extent`].

/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f64 = 0.6;

/// Number of display columns `text` occupies.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    unicode_width::UnicodeWidthStr::width(String::from_utf8_lossy(&clean).as_ref())
}

/// Approximate rendered width of `text` at `font_size`.
pub fn estimated_extent(text: &str, font_size: u32) -> f64 {
    display_width(text) as f64 * font_size as f64 * GLYPH_ADVANCE
}
