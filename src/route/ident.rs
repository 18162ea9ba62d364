//! Path-segment to identifier sanitization.
//!
//! Route children are looked up by identifier-safe names while the URL
//! always keeps the raw segment. Keywords get a `_` prefix; characters
//! illegal in an identifier are replaced with `_`.

/// Rust keywords, strict and reserved. Segments matching one of these are
/// prefixed with an underscore so they remain usable as lookup names.
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while",
    // Reserved for future use.
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try", "typeof",
    "unsized", "virtual", "yield",
];

/// Map an arbitrary path segment to a safe identifier.
///
/// Only the lookup name is sanitized; the URL-facing segment is never
/// altered.
pub fn to_identifier(segment: &str) -> String {
    let mut ident: String = segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if ident.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }

    if KEYWORDS.contains(&ident.as_str()) {
        ident.insert(0, '_');
    }

    ident
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_segment_unchanged() {
        assert_eq!(to_identifier("fruits"), "fruits");
        assert_eq!(to_identifier("findByStatus"), "findByStatus");
    }

    #[test]
    fn test_keyword_gets_prefix() {
        assert_eq!(to_identifier("match"), "_match");
        assert_eq!(to_identifier("type"), "_type");
        assert_eq!(to_identifier("use"), "_use");
    }

    #[test]
    fn test_illegal_characters_replaced() {
        assert_eq!(to_identifier("foo-bar"), "foo_bar");
        assert_eq!(to_identifier("foo.bar"), "foo_bar");
    }

    #[test]
    fn test_leading_digit_gets_prefix() {
        assert_eq!(to_identifier("2fa"), "_2fa");
    }

    #[test]
    fn test_replacement_before_keyword_check() {
        // "match-all" sanitizes to "match_all", which is not a keyword.
        assert_eq!(to_identifier("match-all"), "match_all");
    }
}
