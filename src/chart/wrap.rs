//! Tick-label wrapping.

/// Break `text` into lines no wider than `max_width`, measured by the
/// caller's closure (the renderer passes the live font, tests pass a
/// fixed per-char width). Word-first; a single word wider than the
/// budget is split at character level. Nothing is truncated.
pub fn wrap_text<F: Fn(&str) -> f32>(text: &str, max_width: f32, measure: F) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure(&candidate) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if measure(word) <= max_width {
            current = word.to_string();
        } else {
            // Single over-wide word: split at character level.
            for ch in word.chars() {
                let attempt = format!("{current}{ch}");
                if !current.is_empty() && measure(&attempt) > max_width {
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                } else {
                    current = attempt;
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_chars(s: &str) -> f32 {
        s.chars().count() as f32 * 8.0
    }

    #[test]
    fn test_short_label_stays_single_line() {
        let lines = wrap_text("12:30", 80.0, by_chars);
        assert_eq!(lines, vec!["12:30"]);
    }

    #[test]
    fn test_axis_label_wraps_at_space() {
        // "08-07 14:30" at 8px/char needs 88px; a 48px budget splits it.
        let lines = wrap_text("08-07 14:30", 48.0, by_chars);
        assert_eq!(lines, vec!["08-07", "14:30"]);
    }

    #[test]
    fn test_over_wide_word_splits_by_char() {
        let lines = wrap_text("abcdefgh", 32.0, by_chars);
        assert_eq!(lines, vec!["abcd", "efgh"]);
    }

    #[test]
    fn test_no_content_lost() {
        let text = "one two three four five";
        let lines = wrap_text(text, 40.0, by_chars);
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_empty_input_yields_one_empty_line() {
        assert_eq!(wrap_text("", 40.0, by_chars), vec![""]);
    }
}
