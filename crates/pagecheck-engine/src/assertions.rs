//! Content assertions built on minimization, subsection extraction and diff
//! rendering.
//!
//! Each assertion returns `Result<(), AssertionError>` and leaves the decision
//! of how to fail to the caller. [`Reporter`] adds console diagnostics to a
//! failed assertion without changing the error itself.

use std::borrow::Cow;
use std::io::{self, Write};

use crate::diff::{Palette, render_with};
use crate::normalize::{ContentError, RawContent, minimize};
use crate::subsection::{Bounds, MarkerPattern, Section, SubsectionError};

#[derive(Debug, thiserror::Error)]
pub enum AssertionError {
    #[error("Content does not match expected value")]
    Mismatch { expected: String, actual: String },
    #[error("Could not find '{value}' in content")]
    NotFound { value: String },
    #[error("Found '{value}', but it is in the section excluded by {section}")]
    FoundInExcludedSection { value: String, section: Section },
    #[error("Found '{value}' in content, but it should be absent")]
    UnexpectedlyFound { value: String },
    #[error("Cannot search for an empty value")]
    EmptyValue,
    #[error("Invalid search value: {0}")]
    Pattern(#[from] regex::Error),
    #[error(transparent)]
    Subsection(#[from] SubsectionError),
    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Per-call settings shared by every assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertOptions {
    pub strip_newlines: bool,
    pub bounds: Bounds,
}

impl Default for AssertOptions {
    fn default() -> Self {
        Self {
            strip_newlines: true,
            bounds: Bounds::default(),
        }
    }
}

impl AssertOptions {
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn keep_newlines(mut self) -> Self {
        self.strip_newlines = false;
        self
    }
}

/// Passes when both sides minimize to the same text.
pub fn assert_content_equals<'a, 'b>(
    expected: impl Into<RawContent<'a>>,
    actual: impl Into<RawContent<'b>>,
    options: &AssertOptions,
) -> Result<(), AssertionError> {
    let expected = minimize(&decode(expected)?, options.strip_newlines);
    let actual = minimize(&decode(actual)?, options.strip_newlines);
    if expected == actual {
        Ok(())
    } else {
        Err(AssertionError::Mismatch { expected, actual })
    }
}

/// Passes when every value appears inside the bounded region of `content`.
///
/// A value that only appears in the text stripped by a boundary marker fails
/// with [`AssertionError::FoundInExcludedSection`] rather than `NotFound`.
pub fn assert_content_contains<'a, S: AsRef<str>>(
    content: impl Into<RawContent<'a>>,
    values: &[S],
    options: &AssertOptions,
) -> Result<(), AssertionError> {
    let searched = SearchedContent::new(content, options)?;
    for value in values {
        let pattern = value_pattern(value.as_ref())?;
        if pattern.is_match(&searched.narrowed) {
            continue;
        }
        let value = pattern.text().to_string();
        return Err(match searched.excluded_section(&pattern) {
            Some(section) => AssertionError::FoundInExcludedSection { value, section },
            None => AssertionError::NotFound { value },
        });
    }
    Ok(())
}

/// Passes when no value appears inside the bounded region of `content`.
/// Occurrences inside excluded sections are ignored.
pub fn assert_content_excludes<'a, S: AsRef<str>>(
    content: impl Into<RawContent<'a>>,
    values: &[S],
    options: &AssertOptions,
) -> Result<(), AssertionError> {
    let searched = SearchedContent::new(content, options)?;
    for value in values {
        let pattern = value_pattern(value.as_ref())?;
        if pattern.is_match(&searched.narrowed) {
            return Err(AssertionError::UnexpectedlyFound {
                value: pattern.text().to_string(),
            });
        }
    }
    Ok(())
}

fn decode<'a>(content: impl Into<RawContent<'a>>) -> Result<Cow<'a, str>, ContentError> {
    let content: RawContent<'a> = content.into();
    content.into_text()
}

fn value_pattern(value: &str) -> Result<MarkerPattern, AssertionError> {
    MarkerPattern::compile(value)?.ok_or(AssertionError::EmptyValue)
}

/// Minimized content and the region under test within it.
///
/// `extract` trims the region between its passes, so boundaries are kept as
/// byte offsets into `searched` rather than stitched back together.
struct SearchedContent {
    searched: String,
    narrowed: String,
    start_end: usize,
    end_start: usize,
}

impl SearchedContent {
    fn new<'a>(
        content: impl Into<RawContent<'a>>,
        options: &AssertOptions,
    ) -> Result<Self, AssertionError> {
        let minimized = minimize(&decode(content)?, options.strip_newlines);
        let subsection = options.bounds.extract(&minimized)?;
        let searched = minimize(&minimized, false);
        let start_end = subsection.start_marker.len();
        let end_start = searched.len().saturating_sub(subsection.end_marker.len());
        Ok(Self {
            searched,
            narrowed: subsection.content,
            start_end,
            end_start,
        })
    }

    /// Which stripped boundary, if any, holds a match of `pattern`.
    ///
    /// A match straddling a boundary is reported against the first boundary
    /// it overlaps.
    fn excluded_section(&self, pattern: &MarkerPattern) -> Option<Section> {
        let mut from = 0;
        while let Some(found) = pattern.as_regex().find_at(&self.searched, from) {
            if found.start() < self.start_end {
                return Some(Section::StartsAfter);
            }
            if found.end() > self.end_start {
                return Some(Section::EndsBefore);
            }
            from = found.start()
                + self.searched[found.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
        }
        None
    }
}

/// Writes diagnostics for failed assertions to a sink.
///
/// Mismatches are rendered as a colored diff framed by `EXPECTED:` and
/// `ACTUAL:` headers. The result passed to [`Reporter::check`] is always
/// returned unchanged.
pub struct Reporter<W: Write> {
    sink: W,
    palette: Palette,
}

impl Reporter<io::Stderr> {
    pub fn stderr(palette: Palette) -> Self {
        Self::new(io::stderr(), palette)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(sink: W, palette: Palette) -> Self {
        Self { sink, palette }
    }

    pub fn check<T>(&mut self, result: Result<T, AssertionError>) -> Result<T, AssertionError> {
        if let Err(err) = &result
            && let Err(write_err) = self.report(err)
        {
            log::warn!("Failed to write assertion report: {write_err}");
        }
        result
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn report(&mut self, err: &AssertionError) -> io::Result<()> {
        match err {
            AssertionError::Mismatch { expected, actual } => {
                let rendered = render_with(expected, actual, &self.palette);
                writeln!(self.sink)?;
                writeln!(self.sink, "EXPECTED:")?;
                writeln!(self.sink, "{}", rendered.expected)?;
                writeln!(self.sink)?;
                writeln!(self.sink, "ACTUAL:")?;
                writeln!(self.sink, "{}", rendered.actual)?;
                writeln!(self.sink)?;
            }
            other => writeln!(self.sink, "{other}")?,
        }
        self.sink.flush()
    }
}
