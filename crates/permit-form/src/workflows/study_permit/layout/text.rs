use tracing::warn;

use super::super::calendar::{parse_calendar_date, parse_partial_date};
use super::model::{Font, TextStyle};

/// Approximate Helvetica advance width of one character, in 1/1000 em.
fn glyph_width(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '\'' | '|' => 222.0,
        ' ' | '.' | ',' | ':' | ';' | '!' | 'I' | 'f' | 't' | '/' | '[' | ']' | '(' | ')' => 278.0,
        'r' | '-' => 333.0,
        'm' | 'M' | 'W' => 833.0,
        'w' => 722.0,
        'A'..='Z' => 667.0,
        _ => 556.0,
    }
}

pub fn text_width(text: &str, style: &TextStyle) -> f32 {
    let weight = match style.font {
        Font::Regular => 1.0,
        Font::Bold => 1.06,
    };
    text.chars().map(glyph_width).sum::<f32>() * style.size * weight / 1000.0
}

/// Greedy word wrap to `max_width` points; words longer than a line are split.
pub fn wrap(text: &str, style: &TextStyle, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if text_width(&candidate, style) <= max_width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            line = split_long_word(word, style, max_width, &mut lines);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

fn split_long_word(word: &str, style: &TextStyle, max_width: f32, lines: &mut Vec<String>) -> String {
    let mut chunk = String::new();
    for c in word.chars() {
        chunk.push(c);
        if text_width(&chunk, style) > max_width && chunk.chars().count() > 1 {
            chunk.pop();
            lines.push(std::mem::replace(&mut chunk, c.to_string()));
        }
    }
    chunk
}

/// `YYYY-MM-DD` for calendar dates, verbatim for `YYYY-MM` and anything unparseable.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Some(date) = parse_calendar_date(raw) {
        return date.format("%Y-%m-%d").to_string();
    }
    if parse_partial_date(raw).is_none() {
        warn!(value = raw, "unparseable date rendered verbatim");
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::study_permit::layout::model::{BODY, CAPTION};

    #[test]
    fn wraps_on_word_boundaries_within_width() {
        let text = "Have you ever been refused a visa or permit, denied entry or ordered to leave Canada or any other country?";
        let lines = wrap(text, &BODY, 300.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, &BODY) <= 300.0, "{line} overflows");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn splits_words_wider_than_a_line() {
        let lines = wrap(&"X".repeat(80), &CAPTION, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "X".repeat(80));
    }

    #[test]
    fn dates_normalize_or_fall_back() {
        assert_eq!(format_date("2020-01-10T00:00:00Z"), "2020-01-10");
        assert_eq!(format_date("2018-07"), "2018-07");
        assert_eq!(format_date("March 1995"), "March 1995");
        assert_eq!(format_date("  "), "");
    }
}
