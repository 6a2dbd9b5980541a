//! Status bar widget - mode indicator, stream info and command line

use crate::app::{AppState, DeviceStatus, MessageType};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use specto_input::Mode;

/// Widget for displaying the two-line status bar
pub struct StatusBarWidget<'a> {
    state: &'a AppState,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn mode_string(&self) -> (&'static str, Style) {
        let theme = &self.state.theme;
        match self.state.mode {
            Mode::Normal => (Mode::Normal.display_name(), theme.highlight()),
            Mode::Command => (Mode::Command.display_name(), Style::from(theme.accent)),
            Mode::Help => (Mode::Help.display_name(), theme.highlight()),
        }
    }

    /// Device, stream and frame counters
    fn info_line(&self) -> Line<'static> {
        let state = self.state;
        let theme = &state.theme;

        let device = match &state.device {
            DeviceStatus::Connecting => Span::styled("connecting...", theme.dim()),
            DeviceStatus::Running {
                name,
                sample_rate,
                channels,
            } => Span::styled(
                format!("{} {} Hz {}ch", name, sample_rate, channels),
                theme.normal(),
            ),
            DeviceStatus::Failed => Span::styled("no input", Style::default().fg(theme.danger)),
            DeviceStatus::Stopped => Span::styled("stopped", Style::default().fg(theme.warning)),
        };

        Line::from(vec![
            device,
            Span::styled(
                format!(
                    "  N={}  scale={}  ceil={:.0}  gen={}  frames={}/{}",
                    state.window_size,
                    state.scale_factor,
                    state.ceiling,
                    state.generation,
                    state.fresh_frames,
                    state.frame_count,
                ),
                theme.dim(),
            ),
        ])
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }
        let theme = &self.state.theme;

        let rows = if area.height >= 2 {
            let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);
            Paragraph::new(self.info_line()).render(rows[0], buf);
            rows[1]
        } else {
            area
        };

        let chunks = Layout::horizontal([
            Constraint::Length(10), // Mode indicator
            Constraint::Min(20),    // Command/message area
            Constraint::Length(22), // Help hint
        ])
        .split(rows);

        // Mode indicator
        let (mode_text, mode_style) = self.mode_string();
        let mode_line = Line::from(vec![
            Span::raw("["),
            Span::styled(mode_text, mode_style),
            Span::raw("]"),
        ]);
        Paragraph::new(mode_line).render(chunks[0], buf);

        // Command/message area
        let content = if self.state.mode == Mode::Command {
            Line::from(vec![
                Span::styled(":", Style::from(theme.accent)),
                Span::styled(self.state.command_buffer.as_str(), theme.normal()),
                Span::styled("█", theme.highlight()), // Cursor
            ])
        } else if let Some(msg) = self.state.message.as_deref() {
            let msg_style = match self.state.message_type {
                MessageType::Info => theme.dim(),
                MessageType::Success => Style::from(theme.accent),
                MessageType::Warning => Style::default().fg(theme.warning),
                MessageType::Error => Style::default().fg(theme.danger),
            };
            Line::from(Span::styled(msg, msg_style))
        } else {
            Line::from(Span::styled(
                "Ready. Press ? for help, : for commands",
                theme.dim(),
            ))
        };
        Paragraph::new(content).render(chunks[1], buf);

        // Help hint
        let help = match self.state.mode {
            Mode::Normal => "+/-:zoom  spc:freeze  ?",
            Mode::Command => "Enter:run  Esc:cancel",
            Mode::Help => "Esc:close help",
        };
        let help_line = Line::from(Span::styled(help, theme.dim()));
        Paragraph::new(help_line).render(chunks[2], buf);
    }
}

/// Help overlay widget
pub struct HelpWidget<'a> {
    theme: &'a Theme,
}

impl<'a> HelpWidget<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn help_lines() -> Vec<&'static str> {
        vec![
            "╔════════════════════════════════════════════╗",
            "║         SPECTO - spectrum analyzer         ║",
            "╠════════════════════════════════════════════╣",
            "║ DISPLAY                                    ║",
            "║   + / = / k / ↑    Zoom in (lower ceiling) ║",
            "║   - / j / ↓        Zoom out                ║",
            "║   0                Reset zoom              ║",
            "║   space            Freeze / resume         ║",
            "║   p                Toggle peak hold        ║",
            "║   t                Cycle theme             ║",
            "╠────────────────────────────────────────────╣",
            "║ COMMANDS (:)                               ║",
            "║   :theme <name>    green / amber / cyber   ║",
            "║   :ceiling <v>     Set display ceiling     ║",
            "║   :reset           Reset zoom              ║",
            "║   :freeze :peaks   Toggles                 ║",
            "║   :q               Quit                    ║",
            "╠════════════════════════════════════════════╣",
            "║   Esc or ? to close help   q to quit       ║",
            "╚════════════════════════════════════════════╝",
        ]
    }
}

impl Widget for HelpWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clear background
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                buf[(x, y)].set_char(' ').set_style(self.theme.normal());
            }
        }

        let help_text = Self::help_lines();
        let box_width = help_text[0].chars().count() as u16;
        let start_x = area.x + area.width.saturating_sub(box_width) / 2;
        let start_y = area.y + area.height.saturating_sub(help_text.len() as u16) / 2;

        for (i, line) in help_text.iter().enumerate() {
            let y = start_y + i as u16;
            if y >= area.y + area.height {
                break;
            }

            for (j, ch) in line.chars().enumerate() {
                let x = start_x + j as u16;
                if x >= area.x + area.width {
                    break;
                }

                let style = if matches!(ch, '║' | '╔' | '╗' | '╚' | '╝' | '═' | '╠' | '╣' | '─') {
                    self.theme.border()
                } else {
                    self.theme.normal()
                };

                buf[(x, y)].set_char(ch).set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_status_shows_stream_info() {
        let mut state = AppState::new(512, 100.0, 2000.0, Theme::default());
        state.device = DeviceStatus::Running {
            name: "Mic".into(),
            sample_rate: 44100,
            channels: 1,
        };
        let area = Rect::new(0, 0, 100, 2);
        let mut buf = Buffer::empty(area);

        StatusBarWidget::new(&state).render(area, &mut buf);

        let info = row_text(&buf, 0);
        assert!(info.contains("Mic 44100 Hz 1ch"));
        assert!(info.contains("N=512"));
        assert!(info.contains("ceil=2000"));
        assert!(row_text(&buf, 1).starts_with("[NORMAL]"));
    }

    #[test]
    fn test_status_shows_command_buffer() {
        let mut state = AppState::new(512, 100.0, 2000.0, Theme::default());
        state.mode = Mode::Command;
        state.command_buffer = "theme amber".into();
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);

        StatusBarWidget::new(&state).render(area, &mut buf);

        assert!(row_text(&buf, 0).contains(":theme amber"));
    }

    #[test]
    fn test_help_is_centered_and_clipped() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);

        HelpWidget::new(&theme).render(area, &mut buf);

        // Wider than the area: drawn from the left edge and clipped
        assert_eq!(buf[(0, 0)].symbol(), "╔");
    }
}
