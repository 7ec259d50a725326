/// Per-character state of the reference text against the current input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Correct,
    Incorrect,
    Pending,
    Cursor,
}

/// Classifies every reference char. Rebuilt from scratch on each input change.
pub fn classify(reference: &str, input: &str) -> Vec<CharClass> {
    let typed: Vec<char> = input.chars().collect();

    reference
        .chars()
        .enumerate()
        .map(|(idx, expected)| match typed.get(idx) {
            Some(&c) if c == expected => CharClass::Correct,
            Some(_) => CharClass::Incorrect,
            None if idx == typed.len() => CharClass::Cursor,
            None => CharClass::Pending,
        })
        .collect()
}

/// Glyph used to draw a reference char; whitespace stays visible as a non-breaking space
pub fn display_glyph(c: char) -> char {
    if c.is_whitespace() {
        '\u{00A0}'
    } else {
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CharClass::*;

    #[test]
    fn test_fresh_passage_has_cursor_first() {
        assert_eq!(classify("abc", ""), vec![Cursor, Pending, Pending]);
    }

    #[test]
    fn test_mixed_outcomes() {
        assert_eq!(classify("cat", "cb"), vec![Correct, Incorrect, Cursor]);
    }

    #[test]
    fn test_complete_input_has_no_cursor() {
        let classes = classify("cat", "cat");
        assert_eq!(classes, vec![Correct, Correct, Correct]);
    }

    #[test]
    fn test_overlong_input_has_no_cursor() {
        let classes = classify("ab", "abzz");
        assert_eq!(classes, vec![Correct, Correct]);
    }

    #[test]
    fn test_whitespace_compared_as_ordinary_char() {
        assert_eq!(classify("a b", "a_b"), vec![Correct, Incorrect, Correct]);
        assert_eq!(classify("a b", "a b"), vec![Correct, Correct, Correct]);
    }

    #[test]
    fn test_length_and_single_cursor_property() {
        let reference = "Spirits dance among the stars.";
        let ref_len = reference.chars().count();
        for n in 0..=ref_len + 3 {
            let input: String = "x".repeat(n);
            let classes = classify(reference, &input);
            assert_eq!(classes.len(), ref_len);

            let cursors: Vec<usize> = classes
                .iter()
                .enumerate()
                .filter(|(_, c)| **c == Cursor)
                .map(|(i, _)| i)
                .collect();
            if n < ref_len {
                assert_eq!(cursors, vec![n]);
            } else {
                assert!(cursors.is_empty());
            }
        }
    }

    #[test]
    fn test_empty_reference() {
        assert!(classify("", "abc").is_empty());
    }

    #[test]
    fn test_display_glyph() {
        assert_eq!(display_glyph(' '), '\u{00A0}');
        assert_eq!(display_glyph('g'), 'g');
    }
}
