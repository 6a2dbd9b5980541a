//! CRT-style themes for Specto

use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    /// Primary foreground color (text, borders)
    pub fg: Color,
    /// Dimmed foreground (secondary text)
    pub fg_dim: Color,
    /// Background color
    pub bg: Color,
    /// Highlight color (mode indicator, titles)
    pub highlight: Color,
    /// Accent color (mid-range bars)
    pub accent: Color,
    /// Warning color
    pub warning: Color,
    /// Error/danger color
    pub danger: Color,
    /// Low-frequency bar color
    pub low: Color,
    /// High-frequency bar color
    pub high: Color,
    /// Peak-hold marker color
    pub peak: Color,
}

impl Theme {
    /// Get style for normal text
    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get style for dimmed text
    pub fn dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Get style for highlighted/selected items
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for borders
    pub fn border(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    /// Get title style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for spectrum bars based on column position
    pub fn spectrum_style(&self, column: usize, total_columns: usize) -> Style {
        // Color gradient: bass (warm) -> treble (cool)
        let ratio = column as f32 / total_columns.max(1) as f32;
        let color = if ratio < 0.33 {
            self.low
        } else if ratio < 0.66 {
            self.accent
        } else {
            self.high
        };
        Style::default().fg(color)
    }

    /// Get style for peak-hold markers
    pub fn peak_style(&self) -> Style {
        Style::default().fg(self.peak)
    }

    /// Look a theme up by name or alias
    pub fn by_name(name: &str) -> Option<Theme> {
        match name.to_lowercase().as_str() {
            "green" | "phosphor" | "phosphor-green" => Some(CRT_GREEN),
            "amber" | "orange" => Some(CRT_AMBER),
            "cyber" | "cyberpunk" | "neon" => Some(CYBERPUNK),
            _ => None,
        }
    }

    /// The theme after this one in [`THEMES`]
    pub fn next(&self) -> Theme {
        let position = THEMES.iter().position(|t| t.name == self.name).unwrap_or(0);
        THEMES[(position + 1) % THEMES.len()].clone()
    }
}

/// Classic phosphor green CRT theme
pub const CRT_GREEN: Theme = Theme {
    name: "phosphor-green",
    fg: Color::Rgb(51, 255, 51),        // #33ff33 - phosphor green
    fg_dim: Color::Rgb(25, 128, 25),    // dimmed green
    bg: Color::Rgb(0, 10, 0),           // near black with green tint
    highlight: Color::Rgb(180, 255, 180), // bright green
    accent: Color::Rgb(100, 255, 100),  // medium green
    warning: Color::Rgb(255, 255, 100), // yellow-green
    danger: Color::Rgb(255, 100, 100),  // red warning
    low: Color::Rgb(100, 255, 150),     // green-cyan
    high: Color::Rgb(150, 255, 100),    // yellow-green
    peak: Color::Rgb(220, 255, 220),
};

/// Amber CRT theme (1980s monochrome)
pub const CRT_AMBER: Theme = Theme {
    name: "amber",
    fg: Color::Rgb(255, 176, 0),        // #ffb000 - amber
    fg_dim: Color::Rgb(128, 88, 0),     // dimmed amber
    bg: Color::Rgb(10, 5, 0),           // near black with amber tint
    highlight: Color::Rgb(255, 220, 128), // bright amber
    accent: Color::Rgb(255, 200, 64),   // medium amber
    warning: Color::Rgb(255, 255, 100), // yellow
    danger: Color::Rgb(255, 100, 100),  // red warning
    low: Color::Rgb(255, 180, 50),      // orange-amber
    high: Color::Rgb(255, 220, 100),    // yellow-amber
    peak: Color::Rgb(255, 240, 200),
};

/// Cyberpunk neon theme
pub const CYBERPUNK: Theme = Theme {
    name: "cyberpunk",
    fg: Color::Rgb(0, 255, 255),        // cyan
    fg_dim: Color::Rgb(0, 128, 128),    // dim cyan
    bg: Color::Rgb(5, 0, 10),           // dark purple-black
    highlight: Color::Rgb(255, 0, 255), // magenta
    accent: Color::Rgb(0, 255, 128),    // neon green
    warning: Color::Rgb(255, 255, 0),   // yellow
    danger: Color::Rgb(255, 50, 50),    // red
    low: Color::Rgb(255, 100, 255),     // pink
    high: Color::Rgb(100, 255, 255),    // light cyan
    peak: Color::Rgb(255, 255, 255),
};

/// All built-in themes, in cycling order
pub const THEMES: [Theme; 3] = [CRT_GREEN, CRT_AMBER, CYBERPUNK];

impl Default for Theme {
    fn default() -> Self {
        CRT_GREEN
    }
}
