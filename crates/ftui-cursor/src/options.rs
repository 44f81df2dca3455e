#![forbid(unsafe_code)]

//! Constructor configuration.
//!
//! Whether escape sequences should be emitted at all is decided once, before
//! the controller exists. The controller itself never inspects the
//! environment: callers either set [`CursorOptions::interactive`] themselves
//! or let [`CursorOptions::detect`] resolve it from the stream and the
//! process environment.
//!
//! # Detection Rules
//!
//! | Input | Effect |
//! |-------|--------|
//! | stream is a terminal | interactive |
//! | `NO_COLOR` set | not interactive |
//! | `TERM=dumb` | not interactive |
//! | `FTUI_CURSOR_FORCE=1` | interactive, overrides the rows above |

use std::env;
use std::io::IsTerminal;

/// Environment variable that forces escape emission on.
pub const FORCE_ENV: &str = "FTUI_CURSOR_FORCE";

#[derive(Debug, Clone, Default)]
struct DetectInputs {
    is_terminal: bool,
    no_color: bool,
    term: String,
    force: Option<String>,
}

impl DetectInputs {
    fn from_env(is_terminal: bool) -> Self {
        Self {
            is_terminal,
            no_color: env::var_os("NO_COLOR").is_some(),
            term: env::var("TERM").unwrap_or_default(),
            force: env::var(FORCE_ENV).ok(),
        }
    }

    fn interactive(&self) -> bool {
        if let Some(force) = self.force.as_deref() {
            match force {
                "1" | "true" | "yes" => return true,
                "0" | "false" | "no" => return false,
                _ => {}
            }
        }
        self.is_terminal && !self.no_color && self.term != "dumb"
    }
}

/// Options for [`Cursor::new`](crate::Cursor::new).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorOptions {
    /// Explicit enable flag. `None` falls back to `interactive`.
    pub enabled: Option<bool>,
    /// Start in buffering mode.
    pub buffering: bool,
    /// Whether the stream is an interactive terminal.
    pub interactive: bool,
}

impl CursorOptions {
    /// Non-interactive, not buffering, no explicit enable flag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enabled: None,
            buffering: false,
            interactive: false,
        }
    }

    /// Resolve `interactive` for `stream` from its terminal status and the
    /// process environment.
    #[must_use]
    pub fn detect<T: IsTerminal>(stream: &T) -> Self {
        let inputs = DetectInputs::from_env(stream.is_terminal());
        Self::new().interactive(inputs.interactive())
    }

    /// Force escape emission on or off regardless of interactivity.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Start in buffering mode.
    #[must_use]
    pub const fn buffering(mut self, buffering: bool) -> Self {
        self.buffering = buffering;
        self
    }

    /// Set the interactivity capability flag.
    #[must_use]
    pub const fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// The enable flag the controller starts with.
    #[must_use]
    pub const fn resolved_enabled(&self) -> bool {
        match self.enabled {
            Some(enabled) => enabled,
            None => self.interactive,
        }
    }
}
