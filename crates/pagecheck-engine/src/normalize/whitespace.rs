//! Whitespace policies.
//!
//! Template engines emit indentation, blank lines and `<br>` variants that
//! carry no meaning for an assertion. [`flatten`] reduces all of it to single
//! spaces; [`preserve_newlines`] keeps one newline per line break so console
//! output stays readable.

use std::sync::OnceLock;

use regex::Regex;

fn line_break_tag_regex() -> &'static Regex {
    static LINE_BREAK_TAG: OnceLock<Regex> = OnceLock::new();
    LINE_BREAK_TAG.get_or_init(|| {
        Regex::new(r"(?i)<\s*/?\s*br\s*/?\s*>").expect("Invalid line break tag regex")
    })
}

fn nbsp_run_regex() -> &'static Regex {
    static NBSP_RUN: OnceLock<Regex> = OnceLock::new();
    NBSP_RUN.get_or_init(|| Regex::new("(?:&nbsp;|\u{a0})+").expect("Invalid nbsp regex"))
}

fn newline_run_regex() -> &'static Regex {
    static NEWLINE_RUN: OnceLock<Regex> = OnceLock::new();
    NEWLINE_RUN.get_or_init(|| Regex::new(r"[\r\n]+").expect("Invalid newline regex"))
}

fn carriage_return_regex() -> &'static Regex {
    static CARRIAGE_RETURN: OnceLock<Regex> = OnceLock::new();
    CARRIAGE_RETURN.get_or_init(|| Regex::new(r"\r\n?").expect("Invalid carriage return regex"))
}

fn padded_newline_regex() -> &'static Regex {
    static PADDED_NEWLINE: OnceLock<Regex> = OnceLock::new();
    PADDED_NEWLINE
        .get_or_init(|| Regex::new(r"[ \t]*\n[ \t]*").expect("Invalid padded newline regex"))
}

fn blank_line_regex() -> &'static Regex {
    static BLANK_LINE: OnceLock<Regex> = OnceLock::new();
    BLANK_LINE.get_or_init(|| Regex::new(r"\n\s*\n").expect("Invalid blank line regex"))
}

fn space_run_regex() -> &'static Regex {
    static SPACE_RUN: OnceLock<Regex> = OnceLock::new();
    SPACE_RUN.get_or_init(|| Regex::new(r" {2,}").expect("Invalid space run regex"))
}

/// Collapses all line structure to single spaces and trims the result.
pub fn flatten(text: &str) -> String {
    let text = line_break_tag_regex().replace_all(text, " ");
    let text = nbsp_run_regex().replace_all(&text, " ");
    let text = newline_run_regex().replace_all(&text, " ");
    let text = space_run_regex().replace_all(&text, " ");
    text.trim().to_string()
}

/// Like [`flatten`], but line breaks survive as a single `\n`.
///
/// Carriage returns fold into `\n`, horizontal padding around a newline is
/// dropped, and whitespace-only lines disappear.
pub fn preserve_newlines(text: &str) -> String {
    let text = line_break_tag_regex().replace_all(text, "\n");
    let text = nbsp_run_regex().replace_all(&text, " ");
    let text = carriage_return_regex().replace_all(&text, "\n");
    let text = space_run_regex().replace_all(&text, " ");
    let text = padded_newline_regex().replace_all(&text, "\n");

    // Each replacement can expose another blank line, so repeat until none remain.
    let mut text = text.into_owned();
    while blank_line_regex().is_match(&text) {
        text = blank_line_regex().replace_all(&text, "\n").into_owned();
    }
    text.trim().to_string()
}
