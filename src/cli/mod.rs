//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod commands;
mod logging;

pub use commands::{handle_deploy_command, handle_plan_command};
pub use logging::init_logging;
