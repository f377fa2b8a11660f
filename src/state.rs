use std::path::{Path, PathBuf};
use std::sync::Arc;

use sales_dashboard::data::filter::{filtered_indices, FilterColumn, FilterSet, FilteredView};
use sales_dashboard::{DashboardData, Dataset, DatasetCache};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded datasets by path; survives switching between files.
    pub cache: DatasetCache,

    /// Path of the dataset currently shown.
    pub data_path: Option<PathBuf>,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<Dataset>>,

    /// Region / Segment / Year selections.
    pub filters: FilterSet,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// KPIs and summaries for the current filters (cached).
    pub dashboard: Option<DashboardData>,

    /// Show the numeric table under each chart.
    pub show_tables: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            cache: DatasetCache::new(),
            data_path: None,
            dataset: None,
            filters: FilterSet::default(),
            visible_indices: Vec::new(),
            dashboard: None,
            show_tables: false,
            status_message: None,
        }
    }
}

impl AppState {
    /// Load `path` through the cache and make it the active dataset.
    /// On failure the previous dataset stays on screen.
    pub fn open(&mut self, path: &Path) {
        match self.cache.load(path) {
            Ok(dataset) => {
                self.data_path = Some(path.to_path_buf());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Drop the cached copy of the current file and read it again.
    pub fn reload(&mut self) {
        if let Some(path) = self.data_path.clone() {
            self.cache.invalidate(&path);
            self.open(&path);
        }
    }

    /// Ingest a newly loaded dataset and reset filters.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.filters = FilterSet::default();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` and the dashboard after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters);
            let view = FilteredView::from_indices(ds, &self.visible_indices);
            self.dashboard = Some(DashboardData::compute(&view));
        }
    }

    /// Toggle one region in the filter.
    pub fn toggle_region(&mut self, region: &str) {
        self.filters.toggle_region(region);
        self.refilter();
    }

    /// Toggle one segment in the filter.
    pub fn toggle_segment(&mut self, segment: &str) {
        self.filters.toggle_segment(segment);
        self.refilter();
    }

    /// Toggle one year in the filter.
    pub fn toggle_year(&mut self, year: i64) {
        self.filters.toggle_year(year);
        self.refilter();
    }

    /// Remove the predicate on one column.
    pub fn clear_filter(&mut self, column: FilterColumn) {
        if self.filters.selected_count(column) > 0 {
            self.filters.clear(column);
            self.refilter();
        }
    }

    /// Remove every predicate.
    pub fn clear_all_filters(&mut self) {
        if !self.filters.is_unfiltered() {
            self.filters = FilterSet::default();
            self.refilter();
        }
    }
}
