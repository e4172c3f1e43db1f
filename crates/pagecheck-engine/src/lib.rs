//! # pagecheck-engine
//!
//! Normalization, subsection matching and diff rendering for assertions over
//! rendered page content.
//!
//! ```text
//! raw content → normalize::minimize → subsection::extract → assertion
//!                                                            └─ on failure → diff::render
//! ```
//!
//! - [`normalize`] canonicalizes entities, applies a whitespace policy and
//!   tightens bracket padding.
//! - [`subsection`] narrows content to the region between two fuzzy markers.
//! - [`diff`] lays out expected and actual text with line and character level
//!   coloring.
//! - [`assertions`] combines the above into contains/excludes/equals checks.
//!
//! Every function here is pure and holds no shared state, so it can be called
//! from any number of test threads at once.

pub mod assertions;
pub mod diff;
pub mod normalize;
pub mod subsection;

pub use assertions::{
    AssertOptions, AssertionError, Reporter, assert_content_contains, assert_content_equals,
    assert_content_excludes,
};
pub use diff::{Palette, RenderedDiff, render, render_with};
pub use normalize::{
    ContentError, RawContent, ResponseBody, WhitespacePolicy, minimize, minimize_raw,
    minimize_with,
};
pub use subsection::{Bounds, Section, Subsection, SubsectionError, extract};
