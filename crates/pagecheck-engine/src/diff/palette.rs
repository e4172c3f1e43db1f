use crossterm::style::{Attribute, Color, ContentStyle};

/// Role of a rendered segment in a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Match,
    /// Expected line with no counterpart in the actual output.
    ExpectedOverflow,
    /// Actual line with no counterpart in the expected output.
    ActualOverflow,
    ExpectedMismatch,
    ActualMismatch,
}

/// Maps tones to terminal styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
    matched: ContentStyle,
    expected_overflow: ContentStyle,
    actual_overflow: ContentStyle,
    expected_mismatch: ContentStyle,
    actual_mismatch: ContentStyle,
}

impl Palette {
    /// ANSI colors: green for matches, yellow for expected-side errors and
    /// red for actual-side errors.
    pub fn ansi() -> Self {
        Self {
            enabled: true,
            matched: foreground(Color::Green),
            expected_overflow: ContentStyle {
                attributes: Attribute::Bold.into(),
                ..foreground(Color::Yellow)
            },
            actual_overflow: ContentStyle {
                attributes: Attribute::Bold.into(),
                ..foreground(Color::Red)
            },
            expected_mismatch: ContentStyle {
                background_color: Some(Color::Yellow),
                ..foreground(Color::Black)
            },
            actual_mismatch: ContentStyle {
                background_color: Some(Color::Red),
                ..foreground(Color::Black)
            },
        }
    }

    /// No escape sequences; text passes through untouched.
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::ansi()
        }
    }

    pub fn from_enabled(enabled: bool) -> Self {
        if enabled { Self::ansi() } else { Self::plain() }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn style(&self, tone: Tone) -> ContentStyle {
        match tone {
            Tone::Match => self.matched,
            Tone::ExpectedOverflow => self.expected_overflow,
            Tone::ActualOverflow => self.actual_overflow,
            Tone::ExpectedMismatch => self.expected_mismatch,
            Tone::ActualMismatch => self.actual_mismatch,
        }
    }

    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if !self.enabled || text.is_empty() {
            return text.to_string();
        }
        self.style(tone).apply(text).to_string()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::ansi()
    }
}

fn foreground(color: Color) -> ContentStyle {
    ContentStyle {
        foreground_color: Some(color),
        ..ContentStyle::new()
    }
}
