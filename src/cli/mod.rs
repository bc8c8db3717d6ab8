//! Command-line interface for poolctl.

pub mod commands;
pub mod output;
pub mod types;

// Re-export commonly used items
pub use output::{handle_error, output, CommandOutput};
pub use types::{Cli, Commands};
