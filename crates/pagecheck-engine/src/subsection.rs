//! Subsection extraction.
//!
//! Narrows minimized content to the region between a "starts after" marker and
//! an "ends before" marker. Markers are matched fuzzily on whitespace: every
//! whitespace run in a marker matches one or more whitespace characters in the
//! content, while everything else must match literally.
//!
//! ```
//! use pagecheck_engine::subsection::extract;
//!
//! let page = "<head><title>X</title></head><body><h1>Y</h1><p>Z</p></body>";
//! let sub = extract(page, Some("<h1>Y</h1>"), None).unwrap();
//! assert_eq!(sub.content, "<p>Z</p></body>");
//! ```

use std::fmt;

use regex::{Match, Regex};

use crate::normalize::{canonicalize, minimize, preserve_newlines};

/// Which boundary of a subsection a marker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    StartsAfter,
    EndsBefore,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::StartsAfter => f.write_str("content_starts_after"),
            Section::EndsBefore => f.write_str("content_ends_before"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubsectionError {
    #[error("Could not find {section} marker in content: '{marker}'")]
    MarkerNotFound { section: Section, marker: String },
    #[error("Invalid {section} marker pattern: {source}")]
    Pattern {
        section: Section,
        source: regex::Error,
    },
}

/// A marker compiled into a whitespace-tolerant pattern.
///
/// The marker is decoded and split into whitespace-separated tokens. Each
/// token is matched literally with `\s+` between tokens, or `\s*` where the
/// gap touches a bracket, since minimized content drops padding there.
#[derive(Debug, Clone)]
pub struct MarkerPattern {
    text: String,
    regex: Regex,
}

impl MarkerPattern {
    /// Returns `None` when the marker has no content once minimized.
    pub fn compile(marker: &str) -> Result<Option<Self>, regex::Error> {
        // Brackets are not tightened here so their padding stays flexible.
        let relaxed = preserve_newlines(&canonicalize(marker));
        let tokens = tokenize(&relaxed);
        if tokens.is_empty() {
            return Ok(None);
        }

        let mut pattern = String::new();
        for (index, token) in tokens.iter().enumerate() {
            if let Some(previous) = index.checked_sub(1).map(|i| tokens[i]) {
                pattern.push_str(gap(previous, token));
            }
            pattern.push_str(&regex::escape(token));
        }
        let regex = Regex::new(&pattern)?;
        let text = minimize(marker, false);
        log::debug!("compiled marker {text:?} to pattern {pattern:?}");

        Ok(Some(Self { text, regex }))
    }

    /// The minimized marker text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    pub fn find_first<'h>(&self, haystack: &'h str) -> Option<Match<'h>> {
        self.regex.find(haystack)
    }

    /// The match starting furthest into `haystack`, including matches that
    /// overlap an earlier one.
    pub fn find_last<'h>(&self, haystack: &'h str) -> Option<Match<'h>> {
        let mut last = None;
        let mut from = 0;
        while from <= haystack.len() {
            let Some(found) = self.regex.find_at(haystack, from) else {
                break;
            };
            from = found.start()
                + haystack[found.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
            last = Some(found);
        }
        last
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

/// Splits marker text on whitespace runs.
fn tokenize(marker: &str) -> Vec<&str> {
    marker.split_whitespace().collect()
}

/// Whitespace pattern between two tokens.
fn gap(previous: &str, next: &str) -> &'static str {
    if previous.ends_with(['<', '[', '{', '>']) || next.starts_with(['>', ']', '}', '<']) {
        r"\s*"
    } else {
        r"\s+"
    }
}

/// Narrowed content plus the text each boundary stripped away.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Subsection {
    pub content: String,
    /// Everything up to and including the start marker match.
    pub start_marker: String,
    /// The end marker match and everything after it.
    pub end_marker: String,
}

impl Subsection {
    pub fn into_parts(self) -> (String, String, String) {
        (self.content, self.start_marker, self.end_marker)
    }
}

/// Optional start/end markers bounding the region of interest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bounds {
    pub starts_after: Option<String>,
    pub ends_before: Option<String>,
}

impl Bounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starts_after(mut self, marker: impl Into<String>) -> Self {
        self.starts_after = Some(marker.into());
        self
    }

    pub fn ends_before(mut self, marker: impl Into<String>) -> Self {
        self.ends_before = Some(marker.into());
        self
    }

    pub fn is_unbounded(&self) -> bool {
        is_blank(self.starts_after.as_deref()) && is_blank(self.ends_before.as_deref())
    }

    pub fn extract(&self, content: &str) -> Result<Subsection, SubsectionError> {
        extract(
            content,
            self.starts_after.as_deref(),
            self.ends_before.as_deref(),
        )
    }
}

fn is_blank(marker: Option<&str>) -> bool {
    marker.is_none_or(str::is_empty)
}

/// Narrows `content` to the region after `starts_after` and before
/// `ends_before`.
///
/// The start boundary is applied first; the end marker is then searched for in
/// what remains. Content is re-minimized (keeping newlines) before each search.
/// An absent or empty marker leaves its side of the content untouched.
pub fn extract(
    content: &str,
    starts_after: Option<&str>,
    ends_before: Option<&str>,
) -> Result<Subsection, SubsectionError> {
    let mut narrowed = content.to_string();
    let mut start_marker = String::new();
    let mut end_marker = String::new();

    if let Some(pattern) = compile_marker(starts_after, Section::StartsAfter)? {
        let current = minimize(&narrowed, false);
        let found = pattern
            .find_first(&current)
            .ok_or_else(|| not_found(Section::StartsAfter, &pattern))?;
        log::debug!(
            "{} matched bytes {}..{}",
            Section::StartsAfter,
            found.start(),
            found.end()
        );
        start_marker = current[..found.end()].to_string();
        narrowed = current[found.end()..].to_string();
    }

    if let Some(pattern) = compile_marker(ends_before, Section::EndsBefore)? {
        let current = minimize(&narrowed, false);
        let found = pattern
            .find_last(&current)
            .ok_or_else(|| not_found(Section::EndsBefore, &pattern))?;
        log::debug!(
            "{} matched bytes {}..{}",
            Section::EndsBefore,
            found.start(),
            found.end()
        );
        end_marker = current[found.start()..].to_string();
        narrowed = current[..found.start()].to_string();
    }

    Ok(Subsection {
        content: narrowed,
        start_marker,
        end_marker,
    })
}

fn compile_marker(
    marker: Option<&str>,
    section: Section,
) -> Result<Option<MarkerPattern>, SubsectionError> {
    match marker {
        Some(marker) if !marker.is_empty() => MarkerPattern::compile(marker)
            .map_err(|source| SubsectionError::Pattern { section, source }),
        _ => Ok(None),
    }
}

fn not_found(section: Section, pattern: &MarkerPattern) -> SubsectionError {
    SubsectionError::MarkerNotFound {
        section,
        marker: minimize(pattern.text(), true),
    }
}
