#![forbid(unsafe_code)]

//! Escape-code table.
//!
//! Every sequence the controller can emit is listed here as data. Movements
//! take numeric arguments placed between the prefix and the code; actions are
//! fixed strings. The controller never builds a sequence that is not rooted in
//! one of these entries.
//!
//! # Sequence Reference
//!
//! | Category | Sequence | Description |
//! |----------|----------|-------------|
//! | CSI | `ESC [ n A` .. `ESC [ n D` | Relative cursor movement |
//! | CSI | `ESC [ row ; col H` | Absolute position (1-indexed) |
//! | CSI | `ESC [ n K` / `ESC [ n J` | Erase line / display |
//! | CSI | `ESC [ n m` | SGR attributes and colors |
//! | CSI | `ESC [ 4 h` | Insert mode (IRM) |
//! | CSI | `ESC [ s` / `ESC [ u` | Save / restore position only |
//! | DEC | `ESC 7` / `ESC 8` | Save / restore cursor and attributes |
//! | C0 | `BEL` | Audible bell |

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// Control Sequence Introducer prepended to every movement and action.
pub const CSI: &str = "\x1b[";

/// Audible bell.
pub const BEEP: &[u8] = b"\x07";

/// DECSC: saves position, attributes and charset.
pub const SAVE_WITH_ATTRIBUTES: &[u8] = b"\x1b7";

/// DECRC: restores what [`SAVE_WITH_ATTRIBUTES`] saved.
pub const RESTORE_WITH_ATTRIBUTES: &[u8] = b"\x1b8";

/// `CSI s`: saves position only.
pub const SAVE_POSITION: &[u8] = b"\x1b[s";

/// `CSI u`: restores position saved by [`SAVE_POSITION`].
pub const RESTORE_POSITION: &[u8] = b"\x1b[u";

/// Insert mode on (IRM set).
pub const INSERT_MODE_ON: &str = "4h";

/// Insert mode off.
pub const INSERT_MODE_OFF: &str = "l";

/// Insert `n` blank lines (IL).
pub const INSERT_LINES: &str = "L";

/// Insert `n` blank characters (ICH).
pub const INSERT_CHARS: &str = "@";

// =============================================================================
// Movements
// =============================================================================

/// Argument-taking sequences.
///
/// Called without arguments the terminal applies its default magnitude
/// (usually 1). With arguments, the normalized values are joined with `;`
/// before the code, so [`Movement::Position`] takes `row;col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    /// CUU
    Up,
    /// CUD
    Down,
    /// CUF
    Forward,
    /// CUB
    Backward,
    /// CNL
    NextLine,
    /// CPL
    PreviousLine,
    /// CHA
    HorizontalAbsolute,
    /// CUP
    Position,
    /// SU
    ScrollUp,
    /// SD
    ScrollDown,
    /// DL
    DeleteLine,
    /// DCH
    DeleteChar,
    /// ECH
    EraseChars,
}

impl Movement {
    /// Every movement, in table order.
    pub const ALL: [Self; 13] = [
        Self::Up,
        Self::Down,
        Self::Forward,
        Self::Backward,
        Self::NextLine,
        Self::PreviousLine,
        Self::HorizontalAbsolute,
        Self::Position,
        Self::ScrollUp,
        Self::ScrollDown,
        Self::DeleteLine,
        Self::DeleteChar,
        Self::EraseChars,
    ];

    /// Code suffix written after the arguments.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Up => "A",
            Self::Down => "B",
            Self::Forward => "C",
            Self::Backward => "D",
            Self::NextLine => "E",
            Self::PreviousLine => "F",
            Self::HorizontalAbsolute => "G",
            Self::Position => "H",
            Self::ScrollUp => "S",
            Self::ScrollDown => "T",
            Self::DeleteLine => "M",
            Self::DeleteChar => "P",
            Self::EraseChars => "X",
        }
    }

    /// Method name on the controller.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::NextLine => "next_line",
            Self::PreviousLine => "previous_line",
            Self::HorizontalAbsolute => "horizontal_absolute",
            Self::Position => "position",
            Self::ScrollUp => "scroll_up",
            Self::ScrollDown => "scroll_down",
            Self::DeleteLine => "delete_line",
            Self::DeleteChar => "delete_char",
            Self::EraseChars => "erase_chars",
        }
    }

    /// Write `CSI args code`, with `args` already normalized.
    pub fn encode<W: Write>(self, w: &mut W, args: &[i64]) -> io::Result<()> {
        w.write_all(CSI.as_bytes())?;
        for (i, n) in args.iter().enumerate() {
            if i > 0 {
                w.write_all(b";")?;
            }
            write!(w, "{n}")?;
        }
        w.write_all(self.code().as_bytes())
    }
}

// =============================================================================
// Actions
// =============================================================================

bitflags::bitflags! {
    /// Text attributes the controller tracks as last-known state.
    ///
    /// Advisory only: nothing reads them back from the terminal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attributes: u8 {
        /// Bold / increased intensity.
        const BOLD      = 0b0000_0001;
        /// Italic text.
        const ITALIC    = 0b0000_0010;
        /// Underlined text.
        const UNDERLINE = 0b0000_0100;
        /// Reverse video (swap fg/bg).
        const INVERSE   = 0b0000_1000;
    }
}

/// Zero-argument sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// EL 0: cursor to end of line.
    EraseRight,
    /// EL 1: start of line to cursor.
    EraseLeft,
    /// EL 2: whole line.
    EraseLine,
    /// ED 0: cursor to end of screen.
    EraseDown,
    /// ED 1: start of screen to cursor.
    EraseUp,
    /// ED 2: whole screen.
    EraseScreen,
    Bold,
    Italic,
    Underline,
    Inverse,
    ResetBold,
    ResetItalic,
    ResetUnderline,
    ResetInverse,
    /// SGR 0: clears every attribute and color.
    Reset,
    /// DECTCEM off.
    Hide,
    /// DECTCEM on.
    Show,
    /// DSR 6: the terminal answers with its cursor position on input.
    QueryPosition,
}

impl Action {
    /// Every action, in table order.
    pub const ALL: [Self; 18] = [
        Self::EraseRight,
        Self::EraseLeft,
        Self::EraseLine,
        Self::EraseDown,
        Self::EraseUp,
        Self::EraseScreen,
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Inverse,
        Self::ResetBold,
        Self::ResetItalic,
        Self::ResetUnderline,
        Self::ResetInverse,
        Self::Reset,
        Self::Hide,
        Self::Show,
        Self::QueryPosition,
    ];

    /// Fixed code written after the prefix.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EraseRight => "K",
            Self::EraseLeft => "1K",
            Self::EraseLine => "2K",
            Self::EraseDown => "J",
            Self::EraseUp => "1J",
            Self::EraseScreen => "2J",
            Self::Bold => "1m",
            Self::Italic => "3m",
            Self::Underline => "4m",
            Self::Inverse => "7m",
            Self::ResetBold => "22m",
            Self::ResetItalic => "23m",
            Self::ResetUnderline => "24m",
            Self::ResetInverse => "27m",
            Self::Reset => "0m",
            Self::Hide => "?25l",
            Self::Show => "?25h",
            Self::QueryPosition => "6n",
        }
    }

    /// Method name on the controller.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EraseRight => "erase_right",
            Self::EraseLeft => "erase_left",
            Self::EraseLine => "erase_line",
            Self::EraseDown => "erase_down",
            Self::EraseUp => "erase_up",
            Self::EraseScreen => "erase_screen",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Inverse => "inverse",
            Self::ResetBold => "reset_bold",
            Self::ResetItalic => "reset_italic",
            Self::ResetUnderline => "reset_underline",
            Self::ResetInverse => "reset_inverse",
            Self::Reset => "reset",
            Self::Hide => "hide",
            Self::Show => "show",
            Self::QueryPosition => "query_position",
        }
    }

    /// Apply this action's effect to the tracked attribute state.
    #[must_use]
    pub fn apply(self, attrs: Attributes) -> Attributes {
        match self {
            Self::Bold => attrs | Attributes::BOLD,
            Self::Italic => attrs | Attributes::ITALIC,
            Self::Underline => attrs | Attributes::UNDERLINE,
            Self::Inverse => attrs | Attributes::INVERSE,
            Self::ResetBold => attrs - Attributes::BOLD,
            Self::ResetItalic => attrs - Attributes::ITALIC,
            Self::ResetUnderline => attrs - Attributes::UNDERLINE,
            Self::ResetInverse => attrs - Attributes::INVERSE,
            Self::Reset => Attributes::empty(),
            _ => attrs,
        }
    }

    /// Write `CSI code`.
    pub fn encode<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_all(CSI.as_bytes())?;
        w.write_all(self.code().as_bytes())
    }
}

// =============================================================================
// Colors
// =============================================================================

/// Foreground/background color for SGR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// One of the 16 basic colors (0-7 normal, 8-15 bright).
    Ansi(u8),
    /// 256-color palette index.
    Indexed(u8),
    /// 24-bit true color.
    Rgb(u8, u8, u8),
    /// Terminal default.
    Default,
}

/// Basic color names, indexed by their ANSI number.
const COLOR_NAMES: [&str; 16] = [
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "bright_black",
    "bright_red",
    "bright_green",
    "bright_yellow",
    "bright_blue",
    "bright_magenta",
    "bright_cyan",
    "bright_white",
];

impl Color {
    pub const BLACK: Self = Self::Ansi(0);
    pub const RED: Self = Self::Ansi(1);
    pub const GREEN: Self = Self::Ansi(2);
    pub const YELLOW: Self = Self::Ansi(3);
    pub const BLUE: Self = Self::Ansi(4);
    pub const MAGENTA: Self = Self::Ansi(5);
    pub const CYAN: Self = Self::Ansi(6);
    pub const WHITE: Self = Self::Ansi(7);
    pub const GREY: Self = Self::Ansi(8);

    /// Write the foreground SGR for this color.
    ///
    /// Uses codes 30-37 for normal colors, 90-97 for bright colors.
    pub fn encode_fg<W: Write>(self, w: &mut W) -> io::Result<()> {
        self.encode(w, 30, 90, 38)
    }

    /// Write the background SGR for this color.
    ///
    /// Uses codes 40-47 for normal colors, 100-107 for bright colors.
    pub fn encode_bg<W: Write>(self, w: &mut W) -> io::Result<()> {
        self.encode(w, 40, 100, 48)
    }

    fn encode<W: Write>(self, w: &mut W, normal: u8, bright: u8, extended: u8) -> io::Result<()> {
        match self {
            Self::Ansi(index) => {
                let index = index & 0x0f;
                let code = if index < 8 {
                    normal + index
                } else {
                    bright + index - 8
                };
                write!(w, "{CSI}{code}m")
            }
            Self::Indexed(index) => write!(w, "{CSI}{extended};5;{index}m"),
            Self::Rgb(r, g, b) => write!(w, "{CSI}{extended};2;{r};{g};{b}m"),
            Self::Default => write!(w, "{CSI}{}m", extended + 1),
        }
    }
}

/// A color name that is not in the basic table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown color name: {:?}", self.0)
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for Color {
    type Err = UnknownColor;

    /// Parse a basic color name. Accepts `snake_case` and `camelCase`
    /// spellings, plus `grey`/`gray` for bright black and `default`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut normalized = String::with_capacity(s.len() + 1);
        for ch in s.chars() {
            if ch.is_ascii_uppercase() {
                normalized.push('_');
                normalized.push(ch.to_ascii_lowercase());
            } else {
                normalized.push(ch);
            }
        }
        match normalized.as_str() {
            "grey" | "gray" => return Ok(Self::GREY),
            "default" => return Ok(Self::Default),
            _ => {}
        }
        COLOR_NAMES
            .iter()
            .position(|name| *name == normalized)
            .and_then(|i| u8::try_from(i).ok())
            .map(Self::Ansi)
            .ok_or_else(|| UnknownColor(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_bytes<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> Vec<u8> {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        buf
    }

    #[test]
    fn movement_without_args_is_bare_code() {
        assert_eq!(to_bytes(|w| Movement::Up.encode(w, &[])), b"\x1b[A");
        assert_eq!(to_bytes(|w| Movement::Position.encode(w, &[])), b"\x1b[H");
    }

    #[test]
    fn movement_args_are_semicolon_joined() {
        assert_eq!(to_bytes(|w| Movement::Down.encode(w, &[5])), b"\x1b[5B");
        assert_eq!(
            to_bytes(|w| Movement::Position.encode(w, &[24, 80])),
            b"\x1b[24;80H"
        );
        assert_eq!(to_bytes(|w| Movement::Up.encode(w, &[-4])), b"\x1b[-4A");
    }

    #[test]
    fn erase_actions() {
        assert_eq!(to_bytes(|w| Action::EraseRight.encode(w)), b"\x1b[K");
        assert_eq!(to_bytes(|w| Action::EraseLeft.encode(w)), b"\x1b[1K");
        assert_eq!(to_bytes(|w| Action::EraseLine.encode(w)), b"\x1b[2K");
        assert_eq!(to_bytes(|w| Action::EraseScreen.encode(w)), b"\x1b[2J");
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = Movement::ALL.iter().map(|m| m.name()).collect();
        names.extend(Action::ALL.iter().map(|a| a.name()));
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn attribute_effects() {
        let attrs = Action::Bold.apply(Attributes::empty());
        assert_eq!(attrs, Attributes::BOLD);
        let attrs = Action::Underline.apply(attrs);
        assert_eq!(attrs, Attributes::BOLD | Attributes::UNDERLINE);
        assert_eq!(Action::ResetBold.apply(attrs), Attributes::UNDERLINE);
        assert_eq!(Action::Reset.apply(attrs), Attributes::empty());
        assert_eq!(Action::EraseLine.apply(attrs), attrs);
    }

    #[test]
    fn color_sgr() {
        assert_eq!(to_bytes(|w| Color::RED.encode_fg(w)), b"\x1b[31m");
        assert_eq!(to_bytes(|w| Color::Ansi(9).encode_fg(w)), b"\x1b[91m");
        assert_eq!(to_bytes(|w| Color::BLUE.encode_bg(w)), b"\x1b[44m");
        assert_eq!(to_bytes(|w| Color::Ansi(12).encode_bg(w)), b"\x1b[104m");
        assert_eq!(
            to_bytes(|w| Color::Indexed(196).encode_fg(w)),
            b"\x1b[38;5;196m"
        );
        assert_eq!(
            to_bytes(|w| Color::Rgb(255, 128, 0).encode_bg(w)),
            b"\x1b[48;2;255;128;0m"
        );
        assert_eq!(to_bytes(|w| Color::Default.encode_fg(w)), b"\x1b[39m");
        assert_eq!(to_bytes(|w| Color::Default.encode_bg(w)), b"\x1b[49m");
    }

    #[test]
    fn color_names() {
        assert_eq!("red".parse::<Color>().unwrap(), Color::RED);
        assert_eq!("brightRed".parse::<Color>().unwrap(), Color::Ansi(9));
        assert_eq!("bright_white".parse::<Color>().unwrap(), Color::Ansi(15));
        assert_eq!("grey".parse::<Color>().unwrap(), Color::GREY);
        assert_eq!("default".parse::<Color>().unwrap(), Color::Default);
        assert!("chartreuse".parse::<Color>().is_err());
    }
}
