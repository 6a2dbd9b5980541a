//! Modal state machine for keyboard input handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::commands::Command;

/// Input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Command,
    Help,
}

impl Mode {
    /// Get display name for the mode
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Command => "COMMAND",
            Mode::Help => "HELP",
        }
    }
}

/// Handles keyboard input and converts to commands
pub struct InputHandler {
    mode: Mode,
    command_buffer: String,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            command_buffer: String::new(),
        }
    }

    /// Get current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Force a mode, e.g. when help was opened by a `:` command
    pub fn set_mode(&mut self, mode: Mode) {
        if mode != Mode::Command {
            self.command_buffer.clear();
        }
        self.mode = mode;
    }

    /// Get current command buffer (for display)
    pub fn command_buffer(&self) -> &str {
        &self.command_buffer
    }

    /// Handle a key event and return a command if applicable
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        // Ctrl-C quits from anywhere
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Command::Quit);
        }

        match self.mode {
            Mode::Normal => self.handle_normal_mode(key),
            Mode::Command => self.handle_command_mode(key),
            Mode::Help => self.handle_help_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char(':') => {
                self.mode = Mode::Command;
                self.command_buffer.clear();
                Some(Command::EnterCommandMode)
            }
            KeyCode::Char('?') | KeyCode::Char('h') => {
                self.mode = Mode::Help;
                Some(Command::ToggleHelp)
            }

            // Display ceiling
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('k') | KeyCode::Up => {
                Some(Command::ZoomIn)
            }
            KeyCode::Char('-') | KeyCode::Char('j') | KeyCode::Down => Some(Command::ZoomOut),
            KeyCode::Char('0') => Some(Command::ResetZoom),

            KeyCode::Char(' ') => Some(Command::ToggleFreeze),
            KeyCode::Char('p') => Some(Command::TogglePeaks),
            KeyCode::Char('t') => Some(Command::CycleTheme),

            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),

            _ => None,
        }
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                let buffer = std::mem::take(&mut self.command_buffer);
                Command::parse(&buffer).or(Some(Command::ExecuteCommand(buffer)))
            }
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.command_buffer.clear();
                Some(Command::EnterNormalMode)
            }
            KeyCode::Backspace => {
                self.command_buffer.pop();
                if self.command_buffer.is_empty() {
                    self.mode = Mode::Normal;
                    Some(Command::EnterNormalMode)
                } else {
                    None
                }
            }
            KeyCode::Char(c) => {
                self.command_buffer.push(c);
                None
            }
            _ => None,
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Esc | KeyCode::Enter => {
                self.mode = Mode::Normal;
                Some(Command::ToggleHelp)
            }
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(handler: &mut InputHandler, text: &str) {
        for c in text.chars() {
            assert_eq!(handler.handle_key(key(KeyCode::Char(c))), None);
        }
    }

    #[test]
    fn test_normal_mode_keys() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_key(key(KeyCode::Char('+'))), Some(Command::ZoomIn));
        assert_eq!(handler.handle_key(key(KeyCode::Down)), Some(Command::ZoomOut));
        assert_eq!(handler.handle_key(key(KeyCode::Char(' '))), Some(Command::ToggleFreeze));
        assert_eq!(handler.handle_key(key(KeyCode::Char('t'))), Some(Command::CycleTheme));
        assert_eq!(handler.handle_key(key(KeyCode::Char('x'))), None);
        assert_eq!(handler.handle_key(key(KeyCode::Char('q'))), Some(Command::Quit));
    }

    #[test]
    fn test_ctrl_c_quits_in_command_mode() {
        let mut handler = InputHandler::new();
        handler.handle_key(key(KeyCode::Char(':')));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key(ctrl_c), Some(Command::Quit));
    }

    #[test]
    fn test_command_mode_round_trip() {
        let mut handler = InputHandler::new();
        assert_eq!(
            handler.handle_key(key(KeyCode::Char(':'))),
            Some(Command::EnterCommandMode)
        );
        assert_eq!(handler.mode(), Mode::Command);

        type_str(&mut handler, "theme amber");
        assert_eq!(handler.command_buffer(), "theme amber");

        assert_eq!(
            handler.handle_key(key(KeyCode::Enter)),
            Some(Command::SetTheme("amber".into()))
        );
        assert_eq!(handler.mode(), Mode::Normal);
        assert_eq!(handler.command_buffer(), "");
    }

    #[test]
    fn test_unknown_command_is_reported() {
        let mut handler = InputHandler::new();
        handler.handle_key(key(KeyCode::Char(':')));
        type_str(&mut handler, "bogus");
        assert_eq!(
            handler.handle_key(key(KeyCode::Enter)),
            Some(Command::ExecuteCommand("bogus".into()))
        );
    }

    #[test]
    fn test_backspace_leaves_command_mode_when_empty() {
        let mut handler = InputHandler::new();
        handler.handle_key(key(KeyCode::Char(':')));
        type_str(&mut handler, "q");
        assert_eq!(handler.handle_key(key(KeyCode::Backspace)), Some(Command::EnterNormalMode));
        assert_eq!(handler.mode(), Mode::Normal);
    }

    #[test]
    fn test_set_mode_from_command() {
        let mut handler = InputHandler::new();
        handler.handle_key(key(KeyCode::Char(':')));
        type_str(&mut handler, "help");
        assert_eq!(handler.handle_key(key(KeyCode::Enter)), Some(Command::ToggleHelp));
        assert_eq!(handler.mode(), Mode::Normal);

        handler.set_mode(Mode::Help);
        assert_eq!(handler.handle_key(key(KeyCode::Esc)), Some(Command::ToggleHelp));
        assert_eq!(handler.mode(), Mode::Normal);
    }

    #[test]
    fn test_help_mode_toggles() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_key(key(KeyCode::Char('?'))), Some(Command::ToggleHelp));
        assert_eq!(handler.mode(), Mode::Help);
        assert_eq!(handler.handle_key(key(KeyCode::Char('+'))), None);
        assert_eq!(handler.handle_key(key(KeyCode::Esc)), Some(Command::ToggleHelp));
        assert_eq!(handler.mode(), Mode::Normal);
    }
}
