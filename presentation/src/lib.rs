//! Presentation layer for advisor
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive approval prompt.

pub mod approval;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use approval::prompt::InteractiveApproval;
pub use cli::commands::{Cli, OutputFormat, RosterArg, parse_key_value};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
