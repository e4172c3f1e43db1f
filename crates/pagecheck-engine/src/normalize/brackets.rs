//! Bracket padding removal.
//!
//! Whitespace directly inside `<>`, `[]` and `{}` is dropped, so `< h1 >`
//! becomes `<h1>`. Tags additionally lose horizontal padding against the text
//! they enclose (`<h1> Title </h1>` becomes `<h1>Title</h1>`); line breaks
//! between tags are left for the whitespace policy to decide.

use std::sync::OnceLock;

use regex::Regex;

/// Opening/closing pairs whose inner padding is insignificant.
const BRACKET_PAIRS: [(&str, &str); 3] = [("<", ">"), ("[", "]"), ("{", "}")];

struct PaddingRule {
    pattern: Regex,
    replacement: &'static str,
}

impl PaddingRule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("Invalid bracket padding regex"),
            replacement,
        }
    }
}

fn padding_rules() -> &'static [PaddingRule] {
    static PADDING_RULES: OnceLock<Vec<PaddingRule>> = OnceLock::new();
    PADDING_RULES.get_or_init(|| {
        let mut rules = Vec::new();
        for (open, close) in BRACKET_PAIRS {
            let open_pattern = regex::escape(open);
            let close_pattern = regex::escape(close);
            rules.push(PaddingRule::new(&format!(r"{open_pattern}\s+"), open));
            rules.push(PaddingRule::new(&format!(r"\s+{close_pattern}"), close));
        }
        rules.push(PaddingRule::new(r">[ \t]+", ">"));
        rules.push(PaddingRule::new(r"[ \t]+<", "<"));
        rules
    })
}

/// Strips whitespace padding inside brackets and around tags.
pub fn tighten_brackets(text: &str) -> String {
    padding_rules().iter().fold(text.to_string(), |text, rule| {
        rule.pattern
            .replace_all(&text, rule.replacement)
            .into_owned()
    })
}
