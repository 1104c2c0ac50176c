use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::highlight::HighlightCase;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Paths of the four resources, relative to the resource location
    #[serde(default)]
    pub resources: ResourceSet,

    /// Upper bound for the concurrent resource join (seconds)
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Upper bound for engine construction (seconds)
    #[serde(default = "default_engine_timeout_secs")]
    pub engine_timeout_secs: u64,

    /// Upper bound for a single query (milliseconds)
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// How the typed prefix is compared when highlighting candidates
    #[serde(default)]
    pub highlight_case: HighlightCase,

    /// Placeholder set on the entry field once search is ready
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Text of the explanatory element shown while the query is empty
    #[serde(default = "default_explanation")]
    pub explanation: String,

    #[serde(default)]
    pub labels: ColumnLabels,

    /// Run the `q` page parameter as the first query after startup
    #[serde(default)]
    pub prefill_from_url: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resources: ResourceSet::default(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            engine_timeout_secs: default_engine_timeout_secs(),
            query_timeout_ms: default_query_timeout_ms(),
            highlight_case: HighlightCase::default(),
            placeholder: default_placeholder(),
            explanation: default_explanation(),
            labels: ColumnLabels::default(),
            prefill_from_url: false,
        }
    }
}

impl Config {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {path:?}"))?;
        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.engine_timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

/// The four static resources handed verbatim to the engine constructor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceSet {
    /// Word list (CSV)
    pub pu: String,
    /// Core word definitions (line-delimited)
    pub nimi_pu: String,
    /// Compound definitions (line-delimited)
    pub compounds: String,
    /// Generated translation model (TSV)
    pub model: String,
}

impl Default for ResourceSet {
    fn default() -> Self {
        Self {
            pu: "pu.csv".to_string(),
            nimi_pu: "nimi_pu.txt".to_string(),
            compounds: "compounds.txt".to_string(),
            model: "generated_day2.tsv".to_string(),
        }
    }
}

/// Header row labels of the results list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColumnLabels {
    pub source: String,
    pub target: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            source: "English".to_string(),
            target: "toki pona".to_string(),
        }
    }
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_engine_timeout_secs() -> u64 {
    60
}

fn default_query_timeout_ms() -> u64 {
    5_000
}

fn default_placeholder() -> String {
    "teacher".to_string()
}

fn default_explanation() -> String {
    "Type an English word to see how it is said in toki pona.".to_string()
}
