//! Terminal UI for Specto - widgets, themes, and state
//!
//! Renders the display half of each published spectrum as a CRT-style bar
//! graph with peak hold and a status line.

mod app;
mod theme;
pub mod widgets;

pub use app::{AppState, DeviceStatus, MessageType, PeakHold, MAX_CEILING, MIN_CEILING, ZOOM_STEP};
pub use theme::{Theme, CRT_AMBER, CRT_GREEN, CYBERPUNK, THEMES};
pub use widgets::status_bar::HelpWidget;
pub use widgets::{column_levels, SpectrumWidget, StatusBarWidget};
