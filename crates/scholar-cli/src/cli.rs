//! CLI argument parsing for the scholar binary.
//!
//! CLI flags override every other configuration source.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use scholar_engine::Backend;
use scholar_traits::{AttributeKey, MatchMode};

/// Scientist roster query tool
///
/// Lists filter values, searches records and renders reports from a
/// roster XML document using interchangeable query strategies.
#[derive(Parser, Debug)]
#[command(name = "scholar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Query strategy (streaming, tree, declarative)
    #[arg(short, long, global = true)]
    pub strategy: Option<Backend>,

    /// Criterion matching (exact, contains)
    #[arg(short, long, global = true)]
    pub mode: Option<MatchMode>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the distinct values of every filterable attribute as JSON
    Attributes {
        /// Roster XML document
        file: PathBuf,
    },

    /// Print the records matching the given criteria
    Search(SearchArgs),

    /// Run every strategy and report whether they agree
    Compare(CompareArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Roster XML document
    pub file: PathBuf,

    /// Criterion as KEY=VALUE (Faculty, Department, DegreeType, Rank); repeatable
    #[arg(short = 'c', long = "criterion", value_parser = parse_criterion)]
    pub criteria: Vec<(String, String)>,

    /// XSLT template used for HTML output
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Render the results as HTML
    #[arg(long)]
    pub html: bool,

    /// Write output to this file instead of stdout
    #[arg(short, long, conflicts_with = "export_dir")]
    pub output: Option<PathBuf>,

    /// Export an HTML report named FilteredReport_<timestamp>.html into this directory
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

impl SearchArgs {
    /// Whether the output is rendered through a template
    pub fn wants_html(&self) -> bool {
        self.html || self.template.is_some() || self.export_dir.is_some()
    }
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Roster XML document
    pub file: PathBuf,

    /// Criterion as KEY=VALUE; repeatable
    #[arg(short = 'c', long = "criterion", value_parser = parse_criterion)]
    pub criteria: Vec<(String, String)>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Markdown)]
    pub format: ReportFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Json,
}

/// Parse `KEY=VALUE`, accepting only the four filterable keys
pub fn parse_criterion(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    key.parse::<AttributeKey>().map_err(|e| e.to_string())?;
    Ok((key.to_string(), value.to_string()))
}
