//! Fitting event text into fixed-width cells.
//!
//! Widths are estimated with a constant per-character factor instead of real
//! glyph metrics, so the result depends only on the text and font size. The
//! estimate is tuned for Helvetica; other fonts may over- or underflow.

/// Average glyph width as a fraction of the font size.
pub const CHAR_WIDTH_FACTOR: f32 = 0.5;

/// Estimated width of one character at `font_size`.
pub fn approx_char_width(font_size: f32) -> f32 {
    font_size * CHAR_WIDTH_FACTOR
}

/// Estimated width of `text` at `font_size`.
pub fn estimated_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * approx_char_width(font_size)
}

/// How many characters fit in `available_width`.
pub fn max_chars(available_width: f32, font_size: f32) -> usize {
    let char_width = approx_char_width(font_size);
    if !(available_width > 0.0 && char_width > 0.0) {
        return 0;
    }
    (available_width / char_width).floor() as usize
}

/// Wrap `text` to lines whose estimated width fits `available_width`.
///
/// Returns no lines when not even one character fits.
pub fn fit(text: &str, available_width: f32, font_size: f32) -> Vec<String> {
    wrap(text, max_chars(available_width, font_size))
}

/// Greedy word wrap to at most `width` characters per line.
///
/// Words are only split when a single word is longer than `width`.
/// Whitespace runs collapse to one space and never start or end a line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let mut word = word;
        let mut word_len = word.chars().count();

        if line_len > 0 {
            if line_len + 1 + word_len <= width {
                line.push(' ');
                line.push_str(word);
                line_len += 1 + word_len;
                continue;
            }
            lines.push(std::mem::take(&mut line));
        }

        while word_len > width {
            let split = word
                .char_indices()
                .nth(width)
                .map_or(word.len(), |(index, _)| index);
            lines.push(word[..split].to_string());
            word = &word[split..];
            word_len -= width;
        }

        line.push_str(word);
        line_len = word_len;
    }

    if line_len > 0 {
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_chars_uses_half_font_size() {
        // 8pt font → 4pt per character
        assert_eq!(max_chars(80.0, 8.0), 20);
        assert_eq!(max_chars(83.9, 8.0), 20);
        assert_eq!(max_chars(3.9, 8.0), 0);
        assert_eq!(max_chars(-10.0, 8.0), 0);
        assert_eq!(max_chars(80.0, 0.0), 0);
    }

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap("09:00 - Standup", 20), vec!["09:00 - Standup"]);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap("09:00 - Standup @ Room A", 12),
            vec!["09:00 -", "Standup @", "Room A"]
        );
    }

    #[test]
    fn word_exactly_filling_line_is_not_split() {
        assert_eq!(wrap("abcde fghij", 5), vec!["abcde", "fghij"]);
    }

    #[test]
    fn long_word_is_split_to_budget() {
        assert_eq!(wrap("ab abcdefghijkl", 5), vec!["ab", "abcde", "fghij", "kl"]);
    }

    #[test]
    fn words_after_a_split_word_share_its_tail_line() {
        assert_eq!(
            wrap("abcd efghijk lm no", 5),
            vec!["abcd", "efghi", "jk lm", "no"]
        );
    }

    #[test]
    fn splits_multibyte_words_on_char_boundaries() {
        assert_eq!(wrap("ääääää", 4), vec!["ääää", "ää"]);
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(wrap("  a   b  ", 10), vec!["a b"]);
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn zero_width_yields_no_lines() {
        assert!(wrap("anything", 0).is_empty());
        assert!(fit("anything", 2.0, 8.0).is_empty());
    }

    #[test]
    fn hundred_twenty_characters_in_twenty_char_lines() {
        let text = "x".repeat(120);
        let lines = fit(&text, 80.0, 8.0);
        assert_eq!(lines.len(), 6);
        assert!(lines.iter().all(|l| l.chars().count() == 20));

        let words = vec!["abcd"; 24].join(" ");
        assert_eq!(fit(&words, 80.0, 8.0).len(), 6);
    }

    #[test]
    fn no_line_exceeds_available_width() {
        let text = "10:30 - Quarterly planning with the extended leadership team @ Conference Room Seven";
        for width in [10.0, 37.5, 64.0, 100.0, 117.6] {
            for line in fit(text, width, 8.0) {
                assert!(estimated_width(&line, 8.0) <= width, "{line:?} too wide for {width}");
            }
        }
    }
}
