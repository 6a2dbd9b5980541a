//! UI Widgets for Specto

mod spectrum;
pub mod status_bar;

pub use spectrum::{column_levels, SpectrumWidget};
pub use status_bar::StatusBarWidget;
