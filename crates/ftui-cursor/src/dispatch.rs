#![forbid(unsafe_code)]

//! Symbolic erase/delete/insert requests.
//!
//! Names are parsed into closed enums at the boundary; the controller only
//! ever matches on the typed form. Unknown names are rejected here with the
//! matching `Unknown*Type` error.
//!
//! Erase and delete names are the suffix of the matching controller method,
//! so `screen` and `Screen` both select `erase_screen`. Only the first letter
//! is case-insensitive: `SCREEN` is unknown.

use std::borrow::Cow;
use std::str::FromStr;

use crate::codes::{Action, Movement};
use crate::error::CursorError;

/// Region cleared by `erase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EraseKind {
    /// Cursor to end of line. Also spelled `$`.
    Right,
    /// Start of line to cursor. Also spelled `^`.
    Left,
    /// Entire line.
    Line,
    /// Cursor to end of screen.
    Down,
    /// Start of screen to cursor.
    Up,
    /// Entire screen.
    Screen,
    /// Characters at the cursor, with the terminal's default count.
    Chars,
}

impl EraseKind {
    /// The action this region maps to, or `None` for [`EraseKind::Chars`],
    /// which is the [`Movement::EraseChars`] movement.
    #[must_use]
    pub const fn action(self) -> Option<Action> {
        match self {
            Self::Right => Some(Action::EraseRight),
            Self::Left => Some(Action::EraseLeft),
            Self::Line => Some(Action::EraseLine),
            Self::Down => Some(Action::EraseDown),
            Self::Up => Some(Action::EraseUp),
            Self::Screen => Some(Action::EraseScreen),
            Self::Chars => None,
        }
    }
}

/// Lower-case the first character so a capitalized method suffix matches.
fn uncapitalize(s: &str) -> Cow<'_, str> {
    match s.chars().next() {
        Some(first) if first.is_ascii_uppercase() => {
            let mut owned = String::with_capacity(s.len());
            owned.push(first.to_ascii_lowercase());
            owned.push_str(&s[1..]);
            Cow::Owned(owned)
        }
        _ => Cow::Borrowed(s),
    }
}

impl FromStr for EraseKind {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &*uncapitalize(s) {
            "$" | "right" => Ok(Self::Right),
            "^" | "left" => Ok(Self::Left),
            "line" => Ok(Self::Line),
            "down" => Ok(Self::Down),
            "up" => Ok(Self::Up),
            "screen" => Ok(Self::Screen),
            "chars" => Ok(Self::Chars),
            _ => Err(CursorError::UnknownEraseType(s.to_owned())),
        }
    }
}

/// Unit removed by `delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteKind {
    /// Whole lines, shifting the rest of the screen up.
    Line,
    /// Characters, shifting the rest of the line left.
    Char,
}

impl DeleteKind {
    /// The movement this unit maps to; the count becomes its argument.
    #[must_use]
    pub const fn movement(self) -> Movement {
        match self {
            Self::Line => Movement::DeleteLine,
            Self::Char => Movement::DeleteChar,
        }
    }
}

impl FromStr for DeleteKind {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &*uncapitalize(s) {
            "line" => Ok(Self::Line),
            "char" => Ok(Self::Char),
            _ => Err(CursorError::UnknownDeleteType(s.to_owned())),
        }
    }
}

/// Insert request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertMode {
    /// Turn insert mode on.
    On,
    /// Turn insert mode off.
    Off,
    /// Insert `n` blank lines.
    Lines(u32),
    /// Insert `n` blank characters.
    Chars(u32),
}

impl InsertMode {
    /// Parse a mode name. `n` applies to `line` and `char`; a missing or
    /// zero count means 1.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::UnknownInsertType`] for any other name.
    pub fn parse(name: &str, n: Option<u32>) -> Result<Self, CursorError> {
        let n = n.filter(|&n| n != 0).unwrap_or(1);
        match name {
            "on" | "true" => Ok(Self::On),
            "off" | "false" => Ok(Self::Off),
            "line" => Ok(Self::Lines(n)),
            "char" => Ok(Self::Chars(n)),
            _ => Err(CursorError::UnknownInsertType(name.to_owned())),
        }
    }
}

impl From<bool> for InsertMode {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}
