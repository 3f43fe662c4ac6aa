//! Escape sequences for leaf text
//!
//! ```text
//! \F\   field separator         \S\   component separator
//! \R\   repetition separator    \T\   subcomponent separator
//! \E\   escape character        \Xhh..\  hex-encoded bytes
//! ```
//!
//! Decoding is lenient: unknown or unterminated sequences are kept as
//! literal text and never produce an error.

use std::borrow::Cow;

use super::Separators;

/// Escape every separator, the escape character and line breaks in `text`
#[must_use]
pub fn escape<'a>(text: &'a str, separators: &Separators) -> Cow<'a, str> {
    if !text
        .chars()
        .any(|c| separators.contains(c) || matches!(c, '\r' | '\n'))
    {
        return Cow::Borrowed(text);
    }

    let esc = separators.escape();
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        let code = if c == separators.field() {
            "F"
        } else if c == separators.component() {
            "S"
        } else if c == separators.repetition() {
            "R"
        } else if c == separators.subcomponent() {
            "T"
        } else if c == esc {
            "E"
        } else if c == '\r' {
            "X0D"
        } else if c == '\n' {
            "X0A"
        } else {
            out.push(c);
            continue;
        };
        out.push(esc);
        out.push_str(code);
        out.push(esc);
    }
    Cow::Owned(out)
}

/// Decode escape sequences in `text`
#[must_use]
pub fn unescape<'a>(text: &'a str, separators: &Separators) -> Cow<'a, str> {
    let esc = separators.escape();
    if !text.contains(esc) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(esc) {
        out.push_str(&rest[..start]);
        let after = &rest[start + esc.len_utf8()..];

        // Unterminated: the escape character is literal.
        let Some(end) = after.find(esc) else {
            out.push_str(&rest[start..]);
            return Cow::Owned(out);
        };

        let code = &after[..end];
        match decode_sequence(code, separators) {
            Some(decoded) => out.push_str(&decoded),
            None => {
                out.push(esc);
                out.push_str(code);
                out.push(esc);
            }
        }
        rest = &after[end + esc.len_utf8()..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_sequence(code: &str, separators: &Separators) -> Option<String> {
    let c = match code {
        "F" => separators.field(),
        "S" => separators.component(),
        "R" => separators.repetition(),
        "T" => separators.subcomponent(),
        "E" => separators.escape(),
        _ => return code.strip_prefix('X').and_then(decode_hex),
    };
    Some(c.to_string())
}

fn decode_hex(digits: &str) -> Option<String> {
    if digits.is_empty()
        || digits.len() % 2 != 0
        || !digits.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return None;
    }
    let bytes = (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seps() -> Separators {
        Separators::DEFAULT
    }

    #[test]
    fn test_escape_separators() {
        assert_eq!(
            escape("a|b^c~d&e\\f", &seps()),
            "a\\F\\b\\S\\c\\R\\d\\T\\e\\E\\f"
        );
    }

    #[test]
    fn test_escape_plain_is_borrowed() {
        assert!(matches!(escape("plain text", &seps()), Cow::Borrowed(_)));
        assert!(matches!(unescape("plain text", &seps()), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_line_breaks() {
        assert_eq!(escape("line1\rline2\n", &seps()), "line1\\X0D\\line2\\X0A\\");
    }

    #[test]
    fn test_unescape_known_codes() {
        assert_eq!(
            unescape("a\\F\\b\\S\\c\\R\\d\\T\\e\\E\\f", &seps()),
            "a|b^c~d&e\\f"
        );
    }

    #[test]
    fn test_unescape_hex() {
        assert_eq!(unescape("\\X0D\\\\X0A\\", &seps()), "\r\n");
        assert_eq!(unescape("\\X48454C4C4F\\", &seps()), "HELLO");
    }

    #[test]
    fn test_unescape_unknown_is_literal() {
        assert_eq!(unescape("\\H\\bold\\N\\", &seps()), "\\H\\bold\\N\\");
        assert_eq!(unescape("\\XZZ\\", &seps()), "\\XZZ\\");
        assert_eq!(unescape("\\X0\\", &seps()), "\\X0\\");
    }

    #[test]
    fn test_unescape_unterminated_is_literal() {
        assert_eq!(unescape("trailing \\F", &seps()), "trailing \\F");
        assert_eq!(unescape("\\F\\ then \\", &seps()), "| then \\");
    }

    #[test]
    fn test_custom_separators() {
        let custom = Separators::compile("#$%!*").unwrap();
        assert_eq!(escape("a#b!c", &custom), "a!F!b!E!c");
        assert_eq!(unescape("a!F!b!E!c", &custom), "a#b!c");
        // The default escape character is ordinary text here.
        assert_eq!(unescape("\\F\\", &custom), "\\F\\");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn separators_strategy() -> impl Strategy<Value = Separators> {
            prop::sample::subsequence(vec!['|', '^', '~', '\\', '&', '#', '$', '%', '!', '*'], 5)
                .prop_shuffle()
                .prop_map(|chars| {
                    Separators::new(chars[0], chars[1], chars[2], chars[3], chars[4]).unwrap()
                })
        }

        proptest! {
            /// Property: unescape inverts escape for any text
            #[test]
            fn prop_escape_roundtrip(text in any::<String>(), separators in separators_strategy()) {
                let escaped = escape(&text, &separators);
                prop_assert_eq!(unescape(&escaped, &separators), text.as_str());
            }

            /// Property: escaped text contains no structural separator or line break
            #[test]
            fn prop_escaped_has_no_separators(text in any::<String>(), separators in separators_strategy()) {
                let escaped = escape(&text, &separators);
                let leaked = escaped.chars().any(|c| {
                    c == separators.field()
                        || c == separators.component()
                        || c == separators.repetition()
                        || c == separators.subcomponent()
                        || c == '\r'
                        || c == '\n'
                });
                prop_assert!(!leaked);
            }
        }
    }
}
