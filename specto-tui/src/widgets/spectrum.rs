//! Spectrum analyzer widget - bar graph of the remapped display bins

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, Widget},
};

use crate::theme::Theme;

/// Characters for vertical bar rendering (8 levels)
const BAR_CHARS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Marker drawn at a column's held peak
const PEAK_CHAR: char = '▔';

/// Widget for displaying the frequency spectrum
pub struct SpectrumWidget<'a> {
    magnitudes: &'a [f64],
    peaks: Option<&'a [f64]>,
    ceiling: f64,
    theme: &'a Theme,
    frozen: bool,
}

impl<'a> SpectrumWidget<'a> {
    /// `ceiling` is the magnitude that fills the full panel height
    pub fn new(magnitudes: &'a [f64], ceiling: f64, theme: &'a Theme) -> Self {
        Self {
            magnitudes,
            peaks: None,
            ceiling,
            theme,
            frozen: false,
        }
    }

    pub fn peaks(mut self, peaks: Option<&'a [f64]>) -> Self {
        self.peaks = peaks;
        self
    }

    pub fn frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }

    /// Get full height bar representation, bottom to top
    fn render_bar(level: f64, height: u16) -> Vec<char> {
        let total_levels = (level.clamp(0.0, 1.0) * 8.0 * height as f64) as usize;
        let full_blocks = total_levels / 8;
        let partial = total_levels % 8;

        (0..height as usize)
            .map(|row| {
                if row < full_blocks {
                    '█'
                } else if row == full_blocks && partial > 0 {
                    BAR_CHARS[partial]
                } else {
                    ' '
                }
            })
            .collect()
    }
}

/// Group `values` into `columns` buckets (max of each) and normalise by
/// `ceiling` into `[0, 1]`.
pub fn column_levels(values: &[f64], columns: usize, ceiling: f64) -> Vec<f64> {
    if values.is_empty() || columns == 0 {
        return Vec::new();
    }
    let columns = columns.min(values.len());
    let ceiling = if ceiling > 0.0 { ceiling } else { 1.0 };

    (0..columns)
        .map(|column| {
            let start = column * values.len() / columns;
            let end = ((column + 1) * values.len() / columns).max(start + 1);
            let peak = values[start..end].iter().cloned().fold(0.0f64, f64::max);
            (peak / ceiling).clamp(0.0, 1.0)
        })
        .collect()
}

impl Widget for SpectrumWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.frozen { " SPECTRUM [FROZEN] " } else { " SPECTRUM " };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border())
            .title(Span::styled(title, self.theme.title()));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        let height = inner.height;
        let levels = column_levels(self.magnitudes, inner.width as usize, self.ceiling);
        let peak_levels = self
            .peaks
            .map(|peaks| column_levels(peaks, inner.width as usize, self.ceiling));
        let columns = levels.len();
        let start_x = (inner.width as usize).saturating_sub(columns) / 2;

        for (column, &level) in levels.iter().enumerate() {
            let x = inner.x + (start_x + column) as u16;
            let bar = Self::render_bar(level, height);
            let style = self.theme.spectrum_style(column, columns);

            for (row, &ch) in bar.iter().enumerate() {
                if ch != ' ' {
                    let y = inner.y + height - 1 - row as u16;
                    buf[(x, y)].set_char(ch).set_style(style);
                }
            }

            if let Some(peak) = peak_levels.as_ref().and_then(|p| p.get(column)) {
                if *peak > 0.0 {
                    let row = ((peak * height as f64) as u16).min(height - 1);
                    if bar[row as usize] == ' ' {
                        let y = inner.y + height - 1 - row;
                        buf[(x, y)].set_char(PEAK_CHAR).set_style(self.theme.peak_style());
                    }
                }
            }
        }
    }
}
