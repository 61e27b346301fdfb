// Rust guideline compliant 2026-10-12

//! Slotwise CLI library.
//!
//! This library exposes the CLI modules for use in tests and external code.

pub mod commands;
pub mod output;
pub mod terminal;

pub use commands::CommandContext;
pub use output::{create_formatter, OutputFormatter};
pub use terminal::{fit_to_width, should_use_color, terminal_width};
