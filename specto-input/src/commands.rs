//! Command definitions for Specto

/// Commands that can be dispatched from input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Display scaling (renderer-side ceiling)
    ZoomIn,
    ZoomOut,
    ResetZoom,
    SetCeiling(f64),

    // Display toggles
    ToggleFreeze,
    TogglePeaks,
    CycleTheme,
    SetTheme(String),
    ToggleHelp,

    // Mode changes
    EnterCommandMode,
    EnterNormalMode,
    /// Unrecognised `:` command, kept for the status line
    ExecuteCommand(String),

    // System
    Quit,
}

impl Command {
    /// Parse the text typed after `:`
    pub fn parse(input: &str) -> Option<Command> {
        let mut parts = input.split_whitespace();
        let name = parts.next()?;
        let arg = parts.next();

        match (name, arg) {
            ("q" | "quit", None) => Some(Command::Quit),
            ("theme", Some(theme)) => Some(Command::SetTheme(theme.to_string())),
            ("theme", None) => Some(Command::CycleTheme),
            ("ceiling", Some(value)) => value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(Command::SetCeiling),
            ("reset", None) => Some(Command::ResetZoom),
            ("freeze", None) => Some(Command::ToggleFreeze),
            ("peaks", None) => Some(Command::TogglePeaks),
            ("help", None) => Some(Command::ToggleHelp),
            _ => None,
        }
    }
}
