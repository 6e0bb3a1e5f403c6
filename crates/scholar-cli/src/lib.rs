//! scholar CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `config`: Layered settings (defaults, file, environment, flags)
//! - `commands`: Command implementations (attributes, search, compare)

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{parse_criterion, Cli, Commands, CompareArgs, ReportFormat, SearchArgs};
pub use commands::{
    export_file_name, handle_attributes, handle_compare, handle_search, run, run_search,
    SearchOutput,
};
pub use config::Settings;
