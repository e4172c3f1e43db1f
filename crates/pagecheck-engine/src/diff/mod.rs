//! Line and character level diff rendering for assertion failures.
//!
//! The renderer never decides pass/fail; it only lays out two strings so a
//! person can see where they diverge. Lines are compared by index. Equal lines
//! are painted as matches, a line present on one side only is painted as an
//! overflow, and unequal lines fall through to a character-by-character
//! comparison.
//!
//! ```
//! use pagecheck_engine::diff::{render_with, Palette};
//!
//! let rendered = render_with("a\nb", "a\nc\nd", &Palette::plain());
//! assert_eq!(rendered.expected, "a\nb\n");
//! assert_eq!(rendered.actual, "a\nc\nd");
//! ```

mod palette;

pub use palette::{Palette, Tone};

/// How the lines at one index relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    FullMatch,
    /// Only the expected side has a line here.
    ExpectedLonger,
    /// Only the actual side has a line here.
    ActualLonger,
    PartialMismatch,
}

/// One line index worth of comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffCell<'a> {
    pub expected: Option<&'a str>,
    pub actual: Option<&'a str>,
    pub state: MatchState,
}

/// A run of consecutive characters sharing one tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub tone: Tone,
    pub text: String,
}

/// Both sides of a rendered diff, newline-joined and ready to print.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedDiff {
    pub expected: String,
    pub actual: String,
}

fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

/// Pairs up the lines of both strings by index and classifies each pair.
pub fn cells<'a>(expected: &'a str, actual: &'a str) -> Vec<DiffCell<'a>> {
    let expected_lines = split_lines(expected);
    let actual_lines = split_lines(actual);
    let max_lines = expected_lines.len().max(actual_lines.len());

    (0..max_lines)
        .map(|index| {
            let expected = expected_lines.get(index).copied();
            let actual = actual_lines.get(index).copied();
            let state = match (expected, actual) {
                (Some(e), Some(a)) if e == a => MatchState::FullMatch,
                (Some(_), Some(_)) => MatchState::PartialMismatch,
                (Some(_), None) => MatchState::ExpectedLonger,
                (None, _) => MatchState::ActualLonger,
            };
            DiffCell {
                expected,
                actual,
                state,
            }
        })
        .collect()
}

/// Compares two lines character by character.
///
/// Positions past the end of one line count as mismatches on the other side.
/// Adjacent characters with the same tone are merged into one [`Run`].
pub fn char_runs(expected_line: &str, actual_line: &str) -> (Vec<Run>, Vec<Run>) {
    let expected_chars: Vec<char> = expected_line.chars().collect();
    let actual_chars: Vec<char> = actual_line.chars().collect();
    let max_chars = expected_chars.len().max(actual_chars.len());

    let mut expected_runs = Vec::new();
    let mut actual_runs = Vec::new();
    for index in 0..max_chars {
        let e = expected_chars.get(index).copied();
        let a = actual_chars.get(index).copied();
        if e == a {
            if let Some(c) = e {
                push_char(&mut expected_runs, Tone::Match, c);
                push_char(&mut actual_runs, Tone::Match, c);
            }
            continue;
        }
        if let Some(c) = e {
            push_char(&mut expected_runs, Tone::ExpectedMismatch, c);
        }
        if let Some(c) = a {
            push_char(&mut actual_runs, Tone::ActualMismatch, c);
        }
    }
    (expected_runs, actual_runs)
}

fn push_char(runs: &mut Vec<Run>, tone: Tone, c: char) {
    match runs.last_mut() {
        Some(run) if run.tone == tone => run.text.push(c),
        _ => runs.push(Run {
            tone,
            text: c.to_string(),
        }),
    }
}

fn paint_runs(runs: &[Run], palette: &Palette) -> String {
    runs.iter()
        .map(|run| palette.paint(run.tone, &run.text))
        .collect()
}

/// Renders both sides with ANSI colors.
pub fn render(expected: &str, actual: &str) -> RenderedDiff {
    render_with(expected, actual, &Palette::ansi())
}

/// Renders both sides using `palette`.
///
/// Output lines stay index-aligned: a line missing on one side is rendered as
/// an empty line there.
pub fn render_with(expected: &str, actual: &str, palette: &Palette) -> RenderedDiff {
    let mut expected_out = Vec::new();
    let mut actual_out = Vec::new();

    for cell in cells(expected, actual) {
        let e = cell.expected.unwrap_or_default();
        let a = cell.actual.unwrap_or_default();
        match cell.state {
            MatchState::FullMatch => {
                expected_out.push(palette.paint(Tone::Match, e));
                actual_out.push(palette.paint(Tone::Match, a));
            }
            MatchState::ExpectedLonger => {
                expected_out.push(palette.paint(Tone::ExpectedOverflow, e));
                actual_out.push(String::new());
            }
            MatchState::ActualLonger => {
                expected_out.push(String::new());
                actual_out.push(palette.paint(Tone::ActualOverflow, a));
            }
            MatchState::PartialMismatch => {
                let (expected_runs, actual_runs) = char_runs(e, a);
                expected_out.push(paint_runs(&expected_runs, palette));
                actual_out.push(paint_runs(&actual_runs, palette));
            }
        }
    }

    RenderedDiff {
        expected: expected_out.join("\n"),
        actual: actual_out.join("\n"),
    }
}
