//! Dotted namespace path parsing.
//!
//! Turns a raw string like `editor.buffer.saved` into a canonical segment
//! list: the first segment is the *main namespace*, the remaining segments
//! are *sub-namespaces*. Runs of the separator collapse, a single leading or
//! trailing separator is stripped, and whitespace around every segment is
//! trimmed. A path that reduces to zero usable segments (or contains a
//! blank segment) is rejected with [`EventError::InvalidNamespace`].

use crate::error::{EventError, EventResult};

/// A parsed namespace path: main namespace plus sub-namespace segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePath {
    /// First segment; the top-level grouping key.
    pub main: String,
    /// Segments after the first, in order.
    pub subs: Vec<String>,
}

impl NamespacePath {
    /// Parse a raw dotted string into a canonical path.
    ///
    /// Parsing is idempotent: feeding [`to_dotted`](Self::to_dotted) output
    /// back through `parse` yields the same path.
    pub fn parse(raw: &str, separator: &str) -> EventResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EventError::invalid_namespace(raw, "namespace is empty"));
        }

        let mut segments = Vec::new();
        for piece in trimmed.split(separator) {
            if piece.is_empty() {
                // A run of separators, or a leading/trailing one; collapses away.
                continue;
            }
            let segment = piece.trim();
            if segment.is_empty() {
                return Err(EventError::invalid_namespace(
                    raw,
                    "namespace contains a blank segment",
                ));
            }
            segments.push(segment.to_string());
        }

        if segments.is_empty() {
            return Err(EventError::invalid_namespace(
                raw,
                "namespace has no usable segments",
            ));
        }

        let main = segments.remove(0);
        Ok(Self {
            main,
            subs: segments,
        })
    }

    /// True if the path named any sub-namespace segments.
    pub fn has_subs(&self) -> bool {
        !self.subs.is_empty()
    }

    /// Format the path back to a dotted string.
    pub fn to_dotted(&self, separator: &str) -> String {
        let mut out = self.main.clone();
        for sub in &self.subs {
            out.push_str(separator);
            out.push_str(sub);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_main_only() {
        let path = NamespacePath::parse("editor", ".").unwrap();
        assert_eq!(path.main, "editor");
        assert!(path.subs.is_empty());
        assert!(!path.has_subs());
    }

    #[test]
    fn parse_main_and_subs() {
        let path = NamespacePath::parse("editor.buffer.saved", ".").unwrap();
        assert_eq!(path.main, "editor");
        assert_eq!(path.subs, vec!["buffer", "saved"]);
        assert!(path.has_subs());
    }

    #[test]
    fn parse_collapses_separator_runs() {
        let path = NamespacePath::parse("a...b..c", ".").unwrap();
        assert_eq!(path.main, "a");
        assert_eq!(path.subs, vec!["b", "c"]);
    }

    #[test]
    fn parse_strips_edge_separators() {
        let path = NamespacePath::parse(".a.b.", ".").unwrap();
        assert_eq!(path.main, "a");
        assert_eq!(path.subs, vec!["b"]);
    }

    #[test]
    fn parse_trims_whitespace() {
        let path = NamespacePath::parse("  a . b  ", ".").unwrap();
        assert_eq!(path.main, "a");
        assert_eq!(path.subs, vec!["b"]);
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(NamespacePath::parse("", ".").is_err());
        assert!(NamespacePath::parse("   ", ".").is_err());
    }

    #[test]
    fn parse_rejects_separators_only() {
        assert!(NamespacePath::parse("...", ".").is_err());
        assert!(NamespacePath::parse(" . . ", ".").is_err());
    }

    #[test]
    fn parse_rejects_blank_segment() {
        // " " between separators is a segment that trims to nothing,
        // unlike "a..b" where the empty piece comes from a separator run.
        assert!(NamespacePath::parse("a. .b", ".").is_err());
    }

    #[test]
    fn parse_custom_separator() {
        let path = NamespacePath::parse("a/b/c", "/").unwrap();
        assert_eq!(path.main, "a");
        assert_eq!(path.subs, vec!["b", "c"]);
    }

    #[test]
    fn parse_is_idempotent() {
        for raw in ["..a...b.", " a . b .c ", "a", ".a."] {
            let first = NamespacePath::parse(raw, ".").unwrap();
            let second = NamespacePath::parse(&first.to_dotted("."), ".").unwrap();
            assert_eq!(first, second, "reparse of {raw:?} diverged");
        }
    }

    #[test]
    fn to_dotted_round_trip() {
        let path = NamespacePath::parse("x.y.z", ".").unwrap();
        assert_eq!(path.to_dotted("."), "x.y.z");
    }
}
