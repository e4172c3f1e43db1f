//! Character canonicalization.
//!
//! Rendered pages spell the same character in several ways: literally, as a
//! decimal numeric entity (`&#60;`), as a hex numeric entity (`&#x3C;`) or as a
//! named entity (`&lt;`). [`canonicalize`] folds every supported spelling down
//! to the literal character so two renderings of the same text compare equal.
//!
//! The supported set is deliberately small: the space, the non-breaking space
//! (folded to a plain space), and the printable ASCII range of punctuation,
//! digits and Latin letters. Any other entity is left untouched.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Matches any decimal, hex or named entity. Whether it gets replaced is
/// decided per match by [`decode_entity`].
fn entity_regex() -> &'static Regex {
    static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();
    ENTITY_REGEX.get_or_init(|| {
        Regex::new(r"&(?:#([0-9]+)|#[xX]([0-9a-fA-F]+)|([A-Za-z]+));")
            .expect("Invalid entity regex")
    })
}

/// Replaces every supported entity in `text` with its literal character.
///
/// Substitution is repeated until nothing changes, so doubly-encoded input
/// such as `&#38;lt;` ends up as `<` and the result is stable under a second
/// call.
pub fn canonicalize(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = entity_regex()
            .replace_all(&current, |caps: &Captures| match decode_entity(caps) {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned();

        // Every substitution shortens the text, so equal length means no-op.
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

/// Decodes a single entity match, or `None` if the character is outside the
/// supported set.
fn decode_entity(caps: &Captures) -> Option<char> {
    if let Some(decimal) = caps.get(1) {
        return decimal.as_str().parse::<u32>().ok().and_then(from_code_point);
    }
    if let Some(hex) = caps.get(2) {
        return u32::from_str_radix(hex.as_str(), 16)
            .ok()
            .and_then(from_code_point);
    }
    caps.get(3).and_then(|name| named_entity(name.as_str()))
}

fn from_code_point(code: u32) -> Option<char> {
    match code {
        0x20 | 0xA0 => Some(' '),
        0x21..=0x7E => char::from_u32(code),
        _ => None,
    }
}

/// HTML named entities for the supported characters. Names are case
/// sensitive, matching how browsers resolve them.
fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "nbsp" | "NonBreakingSpace" => ' ',
        "excl" => '!',
        "quot" | "QUOT" => '"',
        "num" => '#',
        "dollar" => '$',
        "percnt" => '%',
        "amp" | "AMP" => '&',
        "apos" => '\'',
        "lpar" => '(',
        "rpar" => ')',
        "ast" | "midast" => '*',
        "plus" => '+',
        "comma" => ',',
        "period" => '.',
        "sol" => '/',
        "colon" => ':',
        "semi" => ';',
        "lt" | "LT" => '<',
        "equals" => '=',
        "gt" | "GT" => '>',
        "quest" => '?',
        "commat" => '@',
        "lsqb" | "lbrack" => '[',
        "bsol" => '\\',
        "rsqb" | "rbrack" => ']',
        "Hat" => '^',
        "lowbar" | "UnderBar" => '_',
        "grave" | "DiacriticalGrave" => '`',
        "lcub" | "lbrace" => '{',
        "verbar" | "vert" | "VerticalLine" => '|',
        "rcub" | "rbrace" => '}',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("&#32;", " ")]
    #[case("&#x20;", " ")]
    #[case("&#160;", " ")]
    #[case("&nbsp;", " ")]
    #[case("&#33;", "!")]
    #[case("&#x21;", "!")]
    #[case("&excl;", "!")]
    #[case("&#34;", "\"")]
    #[case("&quot;", "\"")]
    #[case("&#38;", "&")]
    #[case("&amp;", "&")]
    #[case("&#39;", "'")]
    #[case("&#x27;", "'")]
    #[case("&apos;", "'")]
    #[case("&#60;", "<")]
    #[case("&#x3C;", "<")]
    #[case("&#x3c;", "<")]
    #[case("&lt;", "<")]
    #[case("&#62;", ">")]
    #[case("&gt;", ">")]
    #[case("&#47;", "/")]
    #[case("&sol;", "/")]
    #[case("&#91;", "[")]
    #[case("&lsqb;", "[")]
    #[case("&#92;", "\\")]
    #[case("&bsol;", "\\")]
    #[case("&#93;", "]")]
    #[case("&rsqb;", "]")]
    #[case("&#94;", "^")]
    #[case("&Hat;", "^")]
    #[case("&#96;", "`")]
    #[case("&grave;", "`")]
    #[case("&#123;", "{")]
    #[case("&lcub;", "{")]
    #[case("&#124;", "|")]
    #[case("&verbar;", "|")]
    #[case("&#125;", "}")]
    #[case("&rcub;", "}")]
    #[case("&#126;", "~")]
    #[case("&#x7E;", "~")]
    fn decodes_symbol_encodings(#[case] encoded: &str, #[case] expected: &str) {
        assert_eq!(canonicalize(encoded), expected);
    }

    #[test]
    fn decodes_every_printable_ascii_character() {
        for code in 0x21u32..=0x7E {
            let c = char::from_u32(code).unwrap();
            let literal = c.to_string();

            assert_eq!(canonicalize(&format!("&#{code};")), literal);
            assert_eq!(canonicalize(&format!("&#x{code:X};")), literal);
            assert_eq!(canonicalize(&format!("&#x{code:x};")), literal);
            assert_eq!(canonicalize(&literal), literal);
        }
    }

    #[test]
    fn decodes_digits_and_letters() {
        assert_eq!(canonicalize("&#48;&#x39;"), "09");
        assert_eq!(canonicalize("&#65;&#x5A;&#97;&#x7a;"), "AZaz");
    }

    #[test]
    fn leaves_unsupported_entities_alone() {
        assert_eq!(canonicalize("&copy; 2024"), "&copy; 2024");
        assert_eq!(canonicalize("&#8212;"), "&#8212;");
        assert_eq!(canonicalize("&#99999999999;"), "&#99999999999;");
    }

    #[test]
    fn leaves_malformed_entities_alone() {
        assert_eq!(canonicalize("&lt"), "&lt");
        assert_eq!(canonicalize("& lt;"), "& lt;");
        assert_eq!(canonicalize("&#x;"), "&#x;");
    }

    #[test]
    fn named_entities_are_case_sensitive() {
        assert_eq!(canonicalize("&LT;&GT;"), "<>");
        assert_eq!(canonicalize("&Lt;"), "&Lt;");
    }

    #[test]
    fn double_encoding_settles_to_literal() {
        let once = canonicalize("&#38;lt;p&amp;gt;");
        assert_eq!(once, "<p>");
        assert_eq!(canonicalize(&once), once);
    }

    #[test]
    fn mixed_content_is_decoded_in_place() {
        assert_eq!(
            canonicalize("&lt;a href=&quot;/x&quot;&gt;Tom &amp; Jerry&lt;/a&gt;"),
            "<a href=\"/x\">Tom & Jerry</a>"
        );
    }
}
