//! Word wrapping for the print preview

use crate::constants::{DEFAULT_CHAR_WIDTH_RATIO, DEFAULT_LINE_HEIGHT_MULTIPLIER};
use tracing::trace;

/// How many characters of `font_size` fit in `width` points
pub fn chars_per_line(width: f32, font_size: f32) -> usize {
    let char_width = font_size * DEFAULT_CHAR_WIDTH_RATIO;
    if char_width <= 0.0 {
        return 0;
    }
    (width / char_width).max(0.0) as usize
}

/// Break text into lines of at most `max_chars` characters.
///
/// Explicit newlines are kept, words are packed greedily and words longer
/// than a line are cut on character boundaries. Always returns at least one
/// line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for segment in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0;

        for word in segment.split_whitespace() {
            let mut word = word;
            let mut word_len = word.chars().count();

            if line_len > 0 && line_len + 1 + word_len > max_chars {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            while word_len > max_chars {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let cut = word
                    .char_indices()
                    .nth(max_chars)
                    .map_or(word.len(), |(i, _)| i);
                let (chunk, rest) = word.split_at(cut);
                lines.push(chunk.to_string());
                word = rest;
                word_len -= max_chars;
            }
            if word.is_empty() {
                continue;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.push_str(word);
            line_len += word_len;
        }
        lines.push(line);
    }

    trace!("Wrapped {} chars into {} lines", text.len(), lines.len());
    lines
}

/// Height of `line_count` lines of `font_size`
pub fn text_height(line_count: usize, font_size: f32) -> f32 {
    line_count as f32 * font_size * DEFAULT_LINE_HEIGHT_MULTIPLIER
}
