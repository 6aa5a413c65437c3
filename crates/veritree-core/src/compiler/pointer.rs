//! JSON pointer paths into the raw schema document
//!
//! The compiler threads a canonical pointer through its descent so every
//! compiled schema object has a stable address (`#`, `#/properties/r`,
//! `#/allOf/0`, ...). Same-document `$ref` strings are resolved by exact
//! lookup against these addresses, so both sides must use the same `~0`/`~1`
//! token escaping.
//!
//! Copyright (c) 2025 Veritree Team
//! Licensed under the Apache-2.0 license

/// Pointer of the schema document root.
pub const ROOT: &str = "#";

/// Escape a single reference token (`~` then `/`, in that order).
pub fn escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Append a named token to a pointer.
pub fn join(base: &str, token: &str) -> String {
    format!("{}/{}", base, escape(token))
}

/// Append an array index token to a pointer.
pub fn join_index(base: &str, index: usize) -> String {
    format!("{}/{}", base, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        assert_eq!(join(ROOT, "properties"), "#/properties");
        assert_eq!(join(&join(ROOT, "properties"), "r"), "#/properties/r");
        assert_eq!(join_index(&join(ROOT, "allOf"), 1), "#/allOf/1");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape("a/b"), "a~1b");
        assert_eq!(escape("a~b"), "a~0b");
        assert_eq!(join(ROOT, "a/~b"), "#/a~1~0b");
    }
}
