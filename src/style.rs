//! Reference presentation palette for field classes.
//!
//! Renderers are free to choose their own mapping; this is the one used by the
//! terminal and HTML output formats.

use crate::compare::FieldClass;
use std::fmt;

/// A CSS-style color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Hex(u8, u8, u8),
    Transparent,
    Inherit,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Hex(r, g, b) => write!(f, "#{:02X}{:02X}{:02X}", r, g, b),
            Color::Transparent => f.write_str("transparent"),
            Color::Inherit => f.write_str("inherit"),
        }
    }
}

/// Background and text color for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub background: Color,
    pub foreground: Color,
}

const AGREE: Style = Style {
    background: Color::Hex(0xDF, 0xF0, 0xD8),
    foreground: Color::Hex(0x3C, 0x76, 0x3D),
};

const DISAGREE: Style = Style {
    background: Color::Hex(0xFA, 0xDB, 0xD8),
    foreground: Color::Hex(0x31, 0x70, 0x8F),
};

const PLAIN: Style = Style {
    background: Color::Transparent,
    foreground: Color::Inherit,
};

impl FieldClass {
    pub fn style(self) -> Style {
        match self {
            FieldClass::Baseline | FieldClass::Match => AGREE,
            FieldClass::Mismatch => DISAGREE,
            FieldClass::UniqueToComparand => PLAIN,
        }
    }

    /// Single-character marker used where colors are unavailable.
    pub fn marker(self) -> char {
        match self {
            FieldClass::Baseline => '*',
            FieldClass::Match => '=',
            FieldClass::Mismatch => '!',
            FieldClass::UniqueToComparand => '+',
        }
    }
}

impl Style {
    /// Inline CSS declarations for this style.
    pub fn css(&self) -> String {
        format!(
            "background-color: {}; color: {}",
            self.background, self.foreground
        )
    }
}
