#![forbid(unsafe_code)]

//! Address-fragment parsing and formatting.
//!
//! The fragment is shared, process-wide state that anything may write
//! (external links, back/forward, the user editing the address bar), so the
//! read path accepts arbitrary input and classifies it rather than failing.
//!
//! # Format
//!
//! Empty, or `#<id>` where `<id>` is percent-encoded. No query-like structure
//! is recognised: a raw fragment containing unescaped whitespace, `#`, `?` or
//! `/` is malformed. Escaped, those characters are part of the id, so every
//! fragment produced by [`format`] parses back to the id it was made from.

use std::borrow::Cow;

/// A fragment classified for lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentValue {
    /// No fragment, or a bare `#`.
    Empty,
    /// A decoded, well-formed identifier. It may still name no drawer.
    Target(String),
    /// Something that cannot be an identifier.
    Malformed,
}

impl FragmentValue {
    /// Classify a raw fragment as read from the platform, with or without
    /// the leading `#`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let body = raw.strip_prefix('#').unwrap_or(raw);
        if body.is_empty() {
            return Self::Empty;
        }
        if !is_raw_identifier(body) {
            #[cfg(feature = "tracing")]
            tracing::trace!(fragment = raw, "fragment has query-like structure");
            return Self::Malformed;
        }
        let decoded = match urlencoding::decode(body) {
            Ok(decoded) => decoded,
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(fragment = raw, "fragment is not valid percent-encoded UTF-8");
                return Self::Malformed;
            }
        };
        Self::Target(decoded.into_owned())
    }

    /// The target id, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Target(id) => Some(id),
            Self::Empty | Self::Malformed => None,
        }
    }
}

fn is_raw_identifier(s: &str) -> bool {
    !s.chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '?' | '/'))
}

/// Format an id as a fragment (`#<id>`), percent-encoding where required.
#[must_use]
pub fn format(id: &str) -> String {
    let encoded: Cow<'_, str> = urlencoding::encode(id);
    let mut out = String::with_capacity(encoded.len() + 1);
    out.push('#');
    out.push_str(&encoded);
    out
}

/// Whether the raw fragment names exactly `id`.
#[must_use]
pub fn names(raw: &str, id: &str) -> bool {
    FragmentValue::parse(raw).target() == Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_and_bare_hash() {
        assert_eq!(FragmentValue::parse(""), FragmentValue::Empty);
        assert_eq!(FragmentValue::parse("#"), FragmentValue::Empty);
    }

    #[test]
    fn target_with_and_without_hash() {
        assert_eq!(
            FragmentValue::parse("#pricing"),
            FragmentValue::Target("pricing".into())
        );
        assert_eq!(
            FragmentValue::parse("pricing"),
            FragmentValue::Target("pricing".into())
        );
    }

    #[test]
    fn percent_encoded_ids_decode() {
        assert_eq!(
            FragmentValue::parse("#caf%C3%A9"),
            FragmentValue::Target("café".into())
        );
    }

    #[test]
    fn malformed_inputs() {
        for raw in ["#a b", "#a?b=1", "#a/b", "##a", "#%FF"] {
            assert_eq!(FragmentValue::parse(raw), FragmentValue::Malformed, "{raw}");
        }
    }

    #[test]
    fn escaped_separators_belong_to_the_id() {
        assert_eq!(format("faq/pricing"), "#faq%2Fpricing");
        assert_eq!(
            FragmentValue::parse("#faq%2Fpricing"),
            FragmentValue::Target("faq/pricing".into())
        );
        assert_eq!(
            FragmentValue::parse("#a%3Fb%3D1"),
            FragmentValue::Target("a?b=1".into())
        );
        assert!(names(&format("two words"), "two words"));
    }

    #[test]
    fn names_matches_only_exact_id() {
        assert!(names("#faq", "faq"));
        assert!(!names("#faq-2", "faq"));
        assert!(!names("", "faq"));
    }

    proptest! {
        #[test]
        fn parse_never_panics(raw in ".*") {
            let _ = FragmentValue::parse(&raw);
        }

        #[test]
        fn format_then_parse_recovers_identifiers(id in "\\PC{1,24}") {
            prop_assert_eq!(FragmentValue::parse(&format(&id)), FragmentValue::Target(id));
        }
    }
}
