use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::aggregate::{aggregate, AggregationResult, Metric};
use crate::data::cache::SourceCache;
use crate::data::filter::{self, FilterSpec};
use crate::data::model::{FieldValue, ProjectTable};
use crate::data::page::PageState;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.  `FilterSpec` and
/// `PageState` are the only things the UI mutates; the loaded table is
/// shared read-only behind an `Arc` and every view is recomputed from it.
pub struct AppState {
    /// Static dashboard configuration.
    pub config: DashboardConfig,

    /// Parse cache, keyed by source path + modification signature.
    cache: SourceCache,

    /// Path of the currently loaded source (None until a file is loaded).
    pub source_path: Option<PathBuf>,

    /// Loaded dataset.
    pub dataset: Option<Arc<ProjectTable>>,

    /// Active search / membership predicates.
    pub filters: FilterSpec,

    /// The filtered view (cached; rebuilt by `refilter`).
    pub filtered: ProjectTable,

    /// Pagination cursor over the filtered view.
    pub page: PageState,

    /// Grouping field for the summary chart.
    pub group_field: String,

    /// Chart metric: project count or a numeric sum.
    pub chart_metric: Metric,

    /// Chart the filtered view (true) or the full table (false).
    pub aggregate_filtered: bool,

    /// Per-group colours for the chart, stable across filter changes.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let filters = FilterSpec::new(config.search_field.clone());
        let page = PageState::new(config.page_size);
        let group_field = config.group_field.clone();
        let aggregate_filtered = config.aggregate_filtered;
        Self {
            config,
            cache: SourceCache::new(),
            source_path: None,
            dataset: None,
            filters,
            filtered: ProjectTable::from_records(Vec::new()),
            page,
            group_field,
            chart_metric: Metric::Count,
            aggregate_filtered,
            color_map: None,
            status_message: None,
        }
    }

    /// Auto-load the configured dataset when it exists.
    pub fn load_initial(&mut self) {
        let Some(path) = self.config.data_path.clone() else {
            return;
        };
        if path.exists() {
            self.load_path(&path);
        } else {
            log::warn!("configured dataset {} not found", path.display());
        }
    }

    /// Load (or re-use from cache) the dataset at `path`.
    pub fn load_path(&mut self, path: &Path) {
        let options = self.config.load_options();
        match self.cache.load(path, &options) {
            Ok(table) => {
                log::info!(
                    "loaded {} projects with columns {:?} from {}",
                    table.len(),
                    table.column_names,
                    path.display()
                );
                self.source_path = Some(path.to_path_buf());
                self.set_dataset(table);
            }
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Invalidate the cache entry for the current source and load it again.
    pub fn reload(&mut self) {
        if let Some(path) = self.source_path.clone() {
            self.cache.invalidate(&path);
            self.load_path(&path);
        }
    }

    /// Ingest a newly loaded dataset; reset filters and pagination.
    pub fn set_dataset(&mut self, dataset: Arc<ProjectTable>) {
        self.filters.clear();
        self.page.reset();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.rebuild_color_map();
        self.refilter();
    }

    /// Recompute the filtered view and reclamp the page cursor.
    pub fn refilter(&mut self) {
        self.filtered = match &self.dataset {
            Some(ds) => filter::apply(ds, &self.filters),
            None => ProjectTable::from_records(Vec::new()),
        };
        self.page.reclamp(self.filtered.len());
    }

    /// Rebuild per-group colours from the full table so a group keeps its
    /// colour while filters come and go.
    pub fn rebuild_color_map(&mut self) {
        self.color_map = self.dataset.as_ref().map(|ds| {
            let keys: Vec<FieldValue> = aggregate(ds, &self.group_field, &Metric::Count)
                .rows
                .into_iter()
                .map(|(key, _)| key)
                .collect();
            ColorMap::new(&self.group_field, &keys)
        });
    }

    /// Change the chart's grouping field.
    pub fn set_group_field(&mut self, field: String) {
        self.group_field = field;
        self.rebuild_color_map();
    }

    /// The table the chart aggregates, per the `aggregate_filtered` toggle.
    pub fn chart_input(&self) -> Option<&ProjectTable> {
        if self.aggregate_filtered {
            Some(&self.filtered)
        } else {
            self.dataset.as_deref()
        }
    }

    /// The chart's data: group totals over the selected input.
    pub fn aggregation(&self) -> Option<AggregationResult> {
        self.chart_input()
            .map(|table| aggregate(table, &self.group_field, &self.chart_metric))
    }

    /// Toggle a single value in a field's membership filter.
    pub fn toggle_filter_value(&mut self, field: &str, value: &FieldValue) {
        let selected = self.filters.membership.entry(field.to_string()).or_default();
        if selected.contains(value) {
            selected.remove(value);
        } else {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Select every value of a field.
    pub fn select_all(&mut self, field: &str) {
        if let Some(ds) = &self.dataset {
            if let Some(all_vals) = ds.unique_values.get(field) {
                let all_vals = all_vals.clone();
                self.filters.set_membership(field, all_vals);
                self.refilter();
            }
        }
    }

    /// Clear a field's membership filter (no constraint).
    pub fn select_none(&mut self, field: &str) {
        self.filters.set_membership(field, BTreeSet::new());
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn state_with_csv(csv: &str, config: DashboardConfig) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(csv.as_bytes()).unwrap();

        let mut state = AppState::new(config);
        state.load_path(&path);
        (dir, state)
    }

    #[test]
    fn filter_change_reclamps_the_page() {
        let csv = "company_name,host_country\n\
                   A,Thailand\nB,Thailand\nC,Vietnam\nD,Vietnam\nE,Vietnam\nF,Japan\nG,Japan\n";
        let config = DashboardConfig {
            page_size: 3,
            data_path: None,
            ..DashboardConfig::default()
        };
        let (_dir, mut state) = state_with_csv(csv, config);
        assert_eq!(state.filtered.len(), 7);

        state.page.next(state.filtered.len());
        state.page.next(state.filtered.len());
        assert_eq!(state.page.current_page, 3);

        state.toggle_filter_value(
            "host_country",
            &FieldValue::String("Thailand".to_string()),
        );
        assert_eq!(state.filtered.len(), 2);
        assert_eq!(state.page.current_page, 1);
    }

    #[test]
    fn chart_input_follows_the_toggle() {
        let csv = "company_name,region\nA,Asia\nB,Asia\nC,Europe\n";
        let config = DashboardConfig {
            data_path: None,
            ..DashboardConfig::default()
        };
        let (_dir, mut state) = state_with_csv(csv, config);
        state.toggle_filter_value("region", &FieldValue::String("Asia".to_string()));

        state.aggregate_filtered = true;
        let filtered_agg = state.aggregation().unwrap();
        assert_eq!(filtered_agg.rows.len(), 1);

        state.aggregate_filtered = false;
        let full_agg = state.aggregation().unwrap();
        assert_eq!(full_agg.rows.len(), 2);
    }

    #[test]
    fn reload_survives_a_missing_source_gracefully() {
        let config = DashboardConfig {
            data_path: None,
            ..DashboardConfig::default()
        };
        let mut state = AppState::new(config);
        state.load_path(Path::new("/no/such/projects.csv"));
        assert!(state.dataset.is_none());
        assert!(state.status_message.as_deref().unwrap_or("").starts_with("Error"));
    }
}
