//! Consistency report generation
//!
//! Runs every strategy against one document and shows whether they agree.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use scholar_traits::{Criteria, FilterAttributes, MatchMode, ScientistQuery, ScientistRecord};

use crate::engine_stream::extract_records;
use crate::unified::{Backend, ScholarEngine};

/// What one strategy produced
#[derive(Debug, Clone, Serialize)]
pub struct StrategyOutcome {
    pub name: String,
    pub backend: Backend,
    pub ids: Vec<String>,
    pub count: usize,
    pub attribute_values: usize,
    pub duration_ms: u64,
    pub error: Option<String>,
    #[serde(skip)]
    records: Vec<ScientistRecord>,
    #[serde(skip)]
    attributes: Option<FilterAttributes>,
}

impl StrategyOutcome {
    fn run(engine: &ScholarEngine, document: &str, criteria: &Criteria) -> Self {
        let started = Instant::now();
        let attributes = engine.filter_attributes(document);
        let records = engine
            .search(document, criteria)
            .and_then(|xml| extract_records(&xml));
        let duration_ms = started.elapsed().as_millis() as u64;

        let error = match (&attributes, &records) {
            (Err(e), _) | (_, Err(e)) => Some(e.to_string()),
            _ => None,
        };
        let attributes = attributes.ok();
        let records = records.unwrap_or_default();

        Self {
            name: engine.name().to_string(),
            backend: engine.backend(),
            ids: records.iter().map(|r| r.id.clone()).collect(),
            count: records.len(),
            attribute_values: attributes.as_ref().map_or(0, FilterAttributes::len),
            duration_ms,
            error,
            records,
            attributes,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Cross-strategy comparison for one document and one set of criteria
#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyReport {
    pub timestamp: DateTime<Utc>,
    pub match_mode: MatchMode,
    pub criteria: BTreeMap<String, String>,
    pub strategies: Vec<StrategyOutcome>,
    pub attributes_agree: bool,
    pub results_agree: bool,
}

impl ConsistencyReport {
    /// Run all three strategies and compare their answers
    pub fn run(document: &str, criteria: &Criteria, mode: MatchMode) -> Self {
        let strategies: Vec<StrategyOutcome> = ScholarEngine::all(mode)
            .iter()
            .map(|engine| StrategyOutcome::run(engine, document, criteria))
            .collect();

        let all_ok = strategies.iter().all(StrategyOutcome::is_ok);
        let attributes_agree = all_ok && all_equal(strategies.iter().map(|s| &s.attributes));
        let results_agree = all_ok && all_equal(strategies.iter().map(|s| &s.records));

        if !(attributes_agree && results_agree) {
            tracing::warn!(attributes_agree, results_agree, "strategies disagree");
        }

        Self {
            timestamp: Utc::now(),
            match_mode: mode,
            criteria: criteria
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), v.to_string()))
                .collect(),
            strategies,
            attributes_agree,
            results_agree,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.attributes_agree && self.results_agree
    }

    /// Generate a markdown report
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Strategy Consistency Report\n\n");
        md.push_str(&format!("**Date:** {}\n", self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")));
        md.push_str(&format!("**Match mode:** {}\n", self.match_mode));
        if self.criteria.is_empty() {
            md.push_str("**Criteria:** (none)\n\n");
        } else {
            let criteria: Vec<String> =
                self.criteria.iter().map(|(k, v)| format!("{k} = \"{v}\"")).collect();
            md.push_str(&format!("**Criteria:** {}\n\n", criteria.join(", ")));
        }

        md.push_str("## Strategies\n\n");
        md.push_str("| Strategy | Matches | Attribute values | Time (ms) | Error |\n");
        md.push_str("|----------|---------|------------------|-----------|-------|\n");
        for s in &self.strategies {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                s.name,
                s.count,
                s.attribute_values,
                s.duration_ms,
                s.error.as_deref().unwrap_or("-")
            ));
        }

        md.push_str("\n## Agreement\n\n");
        md.push_str(&format!("- Filter attributes: {}\n", yes_no(self.attributes_agree)));
        md.push_str(&format!("- Search results: {}\n", yes_no(self.results_agree)));

        if let Some(first) = self.strategies.iter().find(|s| s.is_ok()) {
            if !first.ids.is_empty() {
                md.push_str(&format!("\nMatched ids: {}\n", first.ids.join(", ")));
            }
        }

        md
    }

    /// Generate a JSON report
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn all_equal<T: PartialEq>(mut items: impl Iterator<Item = T>) -> bool {
    match items.next() {
        Some(first) => items.all(|item| item == first),
        None => true,
    }
}

fn yes_no(agree: bool) -> &'static str {
    if agree {
        "agree"
    } else {
        "DISAGREE"
    }
}
