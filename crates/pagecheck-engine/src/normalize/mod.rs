//! Content minimization.
//!
//! [`minimize`] is the single normalization entry point used by every
//! higher-level assertion. It runs three canonicalizing passes in a fixed
//! order:
//!
//! ```text
//! raw text → entities::canonicalize → whitespace policy → brackets::tighten_brackets
//! ```
//!
//! Entities are decoded first so that `&nbsp;` and `&#32;` take part in
//! whitespace collapsing, and brackets are tightened last so they see the
//! decoded `<`/`>` and no later pass can reintroduce padding.
//!
//! ```
//! use pagecheck_engine::normalize::minimize;
//!
//! let raw = "&#32;&lt;h1&gt;&nbsp;Test&nbsp;Title&nbsp;&lt;/h1&gt;";
//! assert_eq!(minimize(raw, true), "<h1>Test Title</h1>");
//! ```

pub mod brackets;
pub mod entities;
pub mod whitespace;

use std::borrow::Cow;
use std::str::Utf8Error;

pub use brackets::tighten_brackets;
pub use entities::canonicalize;
pub use whitespace::{flatten, preserve_newlines};

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Content is not valid UTF-8: {0}")]
    Decode(#[from] Utf8Error),
}

/// How line structure is treated during minimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhitespacePolicy {
    /// Keep one `\n` per line break.
    PreserveNewlines,
    /// Reduce every line break to a single space.
    #[default]
    Flatten,
}

impl WhitespacePolicy {
    pub fn from_strip_newlines(strip_newlines: bool) -> Self {
        if strip_newlines {
            Self::Flatten
        } else {
            Self::PreserveNewlines
        }
    }

    pub fn apply(self, text: &str) -> String {
        match self {
            Self::PreserveNewlines => preserve_newlines(text),
            Self::Flatten => flatten(text),
        }
    }
}

/// Anything that carries a rendered byte payload, such as an HTTP test
/// client response.
pub trait ResponseBody {
    fn body(&self) -> &[u8];
}

/// Content handed over by a test client or browser driver, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawContent<'a> {
    Text(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
}

impl<'a> RawContent<'a> {
    pub fn from_response<R: ResponseBody + ?Sized>(response: &'a R) -> Self {
        Self::Bytes(Cow::Borrowed(response.body()))
    }

    /// Decodes the payload as UTF-8. Decoding failures are returned as-is.
    pub fn into_text(self) -> Result<Cow<'a, str>, ContentError> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Bytes(Cow::Borrowed(bytes)) => Ok(Cow::Borrowed(std::str::from_utf8(bytes)?)),
            Self::Bytes(Cow::Owned(bytes)) => String::from_utf8(bytes)
                .map(Cow::Owned)
                .map_err(|e| ContentError::Decode(e.utf8_error())),
        }
    }
}

impl<'a> From<&'a str> for RawContent<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for RawContent<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(Cow::Borrowed(text.as_str()))
    }
}

impl From<String> for RawContent<'_> {
    fn from(text: String) -> Self {
        Self::Text(Cow::Owned(text))
    }
}

impl<'a> From<&'a [u8]> for RawContent<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(Cow::Borrowed(bytes))
    }
}

impl From<Vec<u8>> for RawContent<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Cow::Owned(bytes))
    }
}

/// Minimizes `content`, flattening line breaks when `strip_newlines` is set.
pub fn minimize(content: &str, strip_newlines: bool) -> String {
    minimize_with(content, WhitespacePolicy::from_strip_newlines(strip_newlines))
}

pub fn minimize_with(content: &str, policy: WhitespacePolicy) -> String {
    let canonical = canonicalize(content);
    let spaced = policy.apply(&canonical);
    let minimized = tighten_brackets(&spaced);
    log::trace!(
        "minimized {} bytes to {} bytes ({policy:?})",
        content.len(),
        minimized.len()
    );
    minimized
}

/// Decodes raw content and minimizes it.
pub fn minimize_raw<'a>(
    content: impl Into<RawContent<'a>>,
    strip_newlines: bool,
) -> Result<String, ContentError> {
    let content: RawContent<'a> = content.into();
    let text = content.into_text()?;
    Ok(minimize(&text, strip_newlines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    struct FakeResponse {
        content: Vec<u8>,
    }

    impl ResponseBody for FakeResponse {
        fn body(&self) -> &[u8] {
            &self.content
        }
    }

    #[test]
    fn minimizes_entity_encoded_heading() {
        let raw = "&#32;&lt;h1&gt;&nbsp;Test&nbsp;Title&nbsp;&lt;/h1&gt;";
        assert_eq!(minimize(raw, true), "<h1>Test Title</h1>");
    }

    #[test]
    fn keeps_line_structure_when_requested() {
        let raw = "<div>\n    <h1>\n        Title\n    </h1>\n\n</div>";
        assert_eq!(minimize(raw, false), "<div>\n<h1>\nTitle\n</h1>\n</div>");
        assert_eq!(minimize(raw, true), "<div><h1>Title</h1></div>");
    }

    #[test]
    fn entity_spaces_take_part_in_collapsing() {
        assert_eq!(minimize("a&#32;&#x20; &nbsp;b", true), "a b");
    }

    #[rstest]
    #[case("")]
    #[case("plain text")]
    #[case("&#32;&lt;h1&gt;&nbsp;Test&nbsp;Title&nbsp;&lt;/h1&gt;")]
    #[case("<ul>\n  <li> One </li>\n\n  <li>&#84;wo</li>\n</ul>\r\n")]
    #[case("&amp;lt; br &amp;gt;")]
    #[case("{ [ &lt; x &gt; ] }")]
    #[case("a < > b\n<\n>")]
    #[case("&#38;#60;p&#38;#62;")]
    fn minimize_is_idempotent(#[case] input: &str) {
        for strip_newlines in [true, false] {
            let once = minimize(input, strip_newlines);
            assert_eq!(minimize(&once, strip_newlines), once, "input: {input:?}");
        }
    }

    #[test]
    fn minimized_content_is_never_longer() {
        let input = "<p>\r\n  &nbsp;x&#x3C;  </p>";
        assert!(minimize(input, true).len() <= input.len());
        assert!(minimize(input, false).len() <= input.len());
    }

    #[test]
    fn decodes_response_bodies() {
        let response = FakeResponse {
            content: b"<p>\n  Hello&nbsp;there\n</p>".to_vec(),
        };
        let minimized = minimize_raw(RawContent::from_response(&response), true).unwrap();
        assert_eq!(minimized, "<p>Hello there</p>");
    }

    #[test]
    fn accepts_owned_and_borrowed_inputs() {
        assert_eq!(minimize_raw("a  b", true).unwrap(), "a b");
        assert_eq!(minimize_raw(String::from("a  b"), true).unwrap(), "a b");
        assert_eq!(minimize_raw(&b"a  b"[..], true).unwrap(), "a b");
        assert_eq!(minimize_raw(b"a  b".to_vec(), true).unwrap(), "a b");
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let result = minimize_raw(vec![0x66, 0x6f, 0xff], true);
        assert!(matches!(result, Err(ContentError::Decode(_))));

        let result = minimize_raw(&[0xc3u8, 0x28][..], false);
        assert!(matches!(result, Err(ContentError::Decode(_))));
    }

    #[test]
    fn policy_from_strip_newlines() {
        assert_eq!(
            WhitespacePolicy::from_strip_newlines(true),
            WhitespacePolicy::Flatten
        );
        assert_eq!(
            WhitespacePolicy::from_strip_newlines(false),
            WhitespacePolicy::PreserveNewlines
        );
    }
}
