//! Configuration loading for the scholar CLI.
//!
//! Layered config: defaults -> config file -> env vars (SCHOLAR_*) -> CLI flags

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use scholar_engine::Backend;
use scholar_traits::{MatchMode, DEFAULT_MATCH_MODE};

use crate::cli::Cli;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Main application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Query strategy used by `attributes` and `search`
    #[serde(default)]
    pub strategy: Backend,

    /// Criterion matching policy shared by every strategy
    #[serde(default = "default_match_mode")]
    pub match_mode: MatchMode,

    /// XSLT template for HTML output; the bundled one when unset
    #[serde(default)]
    pub template: Option<String>,

    /// Log level (trace, debug, info, warn, error) or an EnvFilter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_match_mode() -> MatchMode {
    DEFAULT_MATCH_MODE
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strategy: Backend::default(),
            match_mode: default_match_mode(),
            template: None,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (optional, `--config`)
    /// 3. Environment variables (SCHOLAR_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("strategy", Backend::default().as_str())?
            .set_default("match_mode", default_match_mode().as_str())?
            .set_default("log_level", default_log_level())?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SCHOLAR_STRATEGY, SCHOLAR_MATCH_MODE, SCHOLAR_TEMPLATE, SCHOLAR_LOG_LEVEL
        builder = builder.add_source(Environment::with_prefix("SCHOLAR"));

        builder.build()?.try_deserialize()
    }

    /// Apply CLI overrides (highest precedence)
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(strategy) = cli.strategy {
            self.strategy = strategy;
        }
        if let Some(mode) = cli.mode {
            self.match_mode = mode;
        }
        if let Some(level) = &cli.log_level {
            self.log_level = level.clone();
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        let level = self.log_level.trim();
        if level.is_empty() {
            return Err("log_level must not be empty".to_string());
        }
        // Directives such as "scholar_engine=debug" are left to EnvFilter
        if !level.contains('=') && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "log_level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            ));
        }
        if self.template.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err("template must not be an empty path".to_string());
        }
        Ok(())
    }
}
