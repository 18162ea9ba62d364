//! Partially-substitutable string templates.
//!
//! `${name}` is the only placeholder syntax; there is no nesting or
//! escaping. Substitution is a one-way bake: once a name is resolved its
//! value becomes literal text and a later substitution under the same name
//! has no further effect.

use std::fmt;

use indexmap::IndexMap;

/// A template string in which `${name}` placeholders can be substituted
/// incrementally. Unknown names are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringTemplate {
    text: String,
}

impl StringTemplate {
    /// Wrap a template string.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The current text, with unresolved placeholders left as literal
    /// `${name}`. Never fails on missing bindings.
    pub fn render(&self) -> &str {
        &self.text
    }

    /// Return a new template with every known binding baked into literal
    /// text. Placeholders with no binding survive for a later pass.
    pub fn substitute(&self, bindings: &IndexMap<String, String>) -> StringTemplate {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let name = &after[..end];
                    match bindings.get(name) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push_str("${");
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    // Unterminated placeholder, keep it literal.
                    out.push_str("${");
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        StringTemplate { text: out }
    }
}

impl fmt::Display for StringTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq<str> for StringTemplate {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for StringTemplate {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl PartialEq<String> for StringTemplate {
    fn eq(&self, other: &String) -> bool {
        self.text == *other
    }
}

/// Extract the placeholder name from a path segment of the form `${name}`.
/// Returns `None` for static segments.
pub fn placeholder_name(segment: &str) -> Option<&str> {
    segment.strip_prefix("${").and_then(|s| s.strip_suffix('}'))
}
