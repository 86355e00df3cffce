use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Launch mode selected by the optional positional CLI argument.
///
/// - `Production` (default): each service runs its plain `args`.
/// - `Dev`: services that declare `dev_args` run those instead (typically a
///   live-reloading start command).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    Dev,
    #[default]
    Production,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" => Ok(Mode::Dev),
            "production" | "prod" => Ok(Mode::Production),
            other => Err(format!(
                "invalid mode: {other} (expected \"dev\" or \"production\")"
            )),
        }
    }
}

/// How child stdout/stderr reach the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Children write straight to the supervisor's stdout/stderr.
    #[default]
    Inherit,
    /// Output is piped and re-emitted line by line behind the display tag.
    ///
    /// The pipes close when the supervisor exits, which it does right after
    /// forwarding a shutdown signal. A child that keeps writing while it
    /// shuts down then gets `EPIPE` (or `SIGPIPE`); use `Inherit` for
    /// services that log during graceful shutdown.
    Prefixed,
}

/// ANSI colour used for a service's display tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Cyan,
    Green,
    Yellow,
    Magenta,
    Blue,
    Red,
    White,
}

impl TagColor {
    /// Colours handed out, in declaration order, to services without one.
    pub const PALETTE: [TagColor; 7] = [
        TagColor::Cyan,
        TagColor::Green,
        TagColor::Yellow,
        TagColor::Magenta,
        TagColor::Blue,
        TagColor::Red,
        TagColor::White,
    ];

    pub fn for_index(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }

    pub fn ansi_code(self) -> &'static str {
        match self {
            TagColor::Red => "\x1b[31m",
            TagColor::Green => "\x1b[32m",
            TagColor::Yellow => "\x1b[33m",
            TagColor::Blue => "\x1b[34m",
            TagColor::Magenta => "\x1b[35m",
            TagColor::Cyan => "\x1b[36m",
            TagColor::White => "\x1b[37m",
        }
    }
}

const ANSI_RESET: &str = "\x1b[0m";

/// Identifier used to attribute console lines to a service.
///
/// Renders as `<colour>[label]<reset>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTag {
    pub label: String,
    pub color: TagColor,
}

impl DisplayTag {
    pub fn new(label: impl Into<String>, color: TagColor) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

impl fmt::Display for DisplayTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]{}", self.color.ansi_code(), self.label, ANSI_RESET)
    }
}
