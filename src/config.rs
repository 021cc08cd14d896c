use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::loader::{ExclusionRule, LoadOptions};

/// Well-known config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "tracker.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Static dashboard configuration.  Everything here is fixed for the
/// session; the UI mutates filter and page state, never the config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Cards per page.
    pub page_size: usize,
    /// Field the search box matches against.
    pub search_field: String,
    /// Fields offered as membership filters in the side panel.
    pub filter_fields: Vec<String>,
    /// Default grouping field for the summary chart.
    pub group_field: String,
    /// Numeric field offered as the chart's sum metric (count is always
    /// available).
    pub metric_field: Option<String>,
    /// Chart the filtered view (true) or the full table (false).
    pub aggregate_filtered: bool,
    /// Fields coerced text → number at load time.
    pub numeric_fields: Vec<String>,
    /// Fields kept as date text at load time.
    pub date_fields: Vec<String>,
    /// Declarative row exclusions applied at load time.
    pub exclusions: Vec<ExclusionRule>,
    /// Dataset auto-loaded at startup when the file exists.
    pub data_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            page_size: 6,
            search_field: "company_name".to_string(),
            filter_fields: vec![
                "region".to_string(),
                "host_country".to_string(),
                "sector".to_string(),
                "project_type".to_string(),
                "project_stage".to_string(),
            ],
            group_field: "region".to_string(),
            metric_field: Some("investment_amount".to_string()),
            aggregate_filtered: true,
            numeric_fields: vec!["investment_amount".to_string()],
            date_fields: vec!["date".to_string()],
            exclusions: Vec::new(),
            data_path: Some(PathBuf::from("projects.csv")),
        }
    }
}

impl DashboardConfig {
    /// Read the config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Read the config, falling back to defaults when the file is absent.
    /// A present-but-malformed file is an error, not a silent default.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("no {} found, using default configuration", path.display());
            Ok(Self::default())
        }
    }

    /// The loader options this configuration implies.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            numeric_fields: self.numeric_fields.clone(),
            date_fields: self.date_fields.clone(),
            exclusions: self.exclusions.clone(),
        }
    }
}
