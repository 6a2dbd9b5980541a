//! Modal keyboard input handling for Specto

mod commands;
mod modal;

pub use commands::Command;
pub use modal::{InputHandler, Mode};
