//! Command implementations (attributes, search, compare)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use tracing::{debug, info};

use scholar_engine::{
    extract_records, ConsistencyReport, ScholarEngine, TemplateTransform, DEFAULT_TEMPLATE,
};
use scholar_traits::{Criteria, ScientistQuery};

use crate::cli::{Cli, Commands, CompareArgs, ReportFormat, SearchArgs};
use crate::config::Settings;

/// Output of a search, ready to print or write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutput {
    pub content: String,
    pub matches: usize,
}

/// Load configuration, initialize logging and dispatch `cli.command`
pub fn run(cli: Cli) -> Result<()> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    settings.apply_overrides(&cli);
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    init_logging(&settings.log_level)?;
    debug!(strategy = %settings.strategy, mode = %settings.match_mode, "settings loaded");

    match cli.command {
        Commands::Attributes { file } => {
            println!("{}", handle_attributes(&file, &settings)?);
        }
        Commands::Search(args) => handle_search(&args, &settings)?,
        Commands::Compare(args) => handle_compare(&args, &settings)?,
    }
    Ok(())
}

/// Install the fmt subscriber; RUST_LOG wins over the configured level
pub fn init_logging(level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn engine_for(settings: &Settings) -> ScholarEngine {
    ScholarEngine::with_backend(settings.strategy, settings.match_mode)
}

pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn criteria_from_pairs(pairs: &[(String, String)]) -> Criteria {
    pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

/// Filter attributes of `path` as pretty JSON
pub fn handle_attributes(path: &Path, settings: &Settings) -> Result<String> {
    let document = read_document(path)?;
    let engine = engine_for(settings);
    let attributes = engine
        .filter_attributes(&document)
        .with_context(|| format!("{} could not read {}", engine.name(), path.display()))?;
    info!(strategy = engine.name(), values = attributes.len(), "attributes listed");
    Ok(serde_json::to_string_pretty(&attributes)?)
}

/// Template text for HTML output: `--template`, then configured, then bundled
pub fn resolve_template(args: &SearchArgs, settings: &Settings) -> Result<String> {
    let path = args
        .template
        .clone()
        .or_else(|| settings.template.as_ref().map(PathBuf::from));
    match path {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template {}", path.display())),
        None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
}

/// Run a search and optionally render it through `template`
pub fn run_search(
    engine: &ScholarEngine,
    document: &str,
    criteria: &Criteria,
    template: Option<&str>,
) -> Result<SearchOutput> {
    let xml = engine.search(document, criteria)?;
    let matches = extract_records(&xml)?.len();
    info!(strategy = engine.name(), matches, "search finished");

    let content = match template {
        Some(template) => TemplateTransform::render(&xml, template),
        None => xml,
    };
    Ok(SearchOutput { content, matches })
}

/// File name for an exported report taken at `now`
pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("FilteredReport_{}.html", now.format("%Y%m%d_%H%M%S"))
}

pub fn handle_search(args: &SearchArgs, settings: &Settings) -> Result<()> {
    let document = read_document(&args.file)?;
    let engine = engine_for(settings);
    let criteria = criteria_from_pairs(&args.criteria);
    let template = if args.wants_html() {
        Some(resolve_template(args, settings)?)
    } else {
        None
    };

    let output = run_search(&engine, &document, &criteria, template.as_deref())?;
    if output.matches == 0 {
        eprintln!("No scientists match the given criteria.");
    }

    let target = match (&args.output, &args.export_dir) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(dir)) => Some(dir.join(export_file_name(Local::now()))),
        (None, None) => None,
    };
    match target {
        Some(path) => {
            fs::write(&path, &output.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{}", path.display());
        }
        None => println!("{}", output.content),
    }
    Ok(())
}

pub fn handle_compare(args: &CompareArgs, settings: &Settings) -> Result<()> {
    let document = read_document(&args.file)?;
    let criteria = criteria_from_pairs(&args.criteria);
    let report = ConsistencyReport::run(&document, &criteria, settings.match_mode);

    match args.format {
        ReportFormat::Markdown => println!("{}", report.to_markdown()),
        ReportFormat::Json => println!("{}", report.to_json()?),
    }

    if !report.is_consistent() {
        bail!("strategies disagree on {}", args.file.display());
    }
    Ok(())
}
