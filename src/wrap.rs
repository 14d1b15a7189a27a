//! Character-budget text layout used by the draw renderer and by the page composer.

use crate::config::Metrics;
use crate::model::{Row, Section};

/// Greedy word wrap against `max_chars` characters per line.
///
/// Words are split on whitespace runs and never broken: a word longer than the budget gets a
/// line of its own. The output depends only on the arguments.
pub fn wrap(value: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in value.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Line units a row occupies: one for inline values, `max(1, lines)` for wrapped blocks.
pub fn row_units(row: &Row, max_chars: usize) -> usize {
    if row.is_wrapped() {
        wrap(row.value.text(), max_chars).len().max(1)
    } else {
        1
    }
}

/// Rendered height of a section card, heading and paddings included.
pub fn section_height(section: &Section, metrics: &Metrics) -> f32 {
    let units: usize = section
        .rows
        .iter()
        .map(|row| row_units(row, metrics.max_chars_per_line))
        .sum();
    metrics.heading_height
        + units as f32 * metrics.line_height
        + metrics.card_padding_top
        + metrics.card_padding_bottom
}
