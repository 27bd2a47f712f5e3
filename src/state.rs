use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::chart::ChartSet;
use crate::data::filter::{CountryFilter, Filters, TypeFilter};
use crate::data::model::{PreparedDataset, YearRange};
use crate::recompute::{Delivery, Recomputer};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Prepared dataset, shared read-only with the recompute worker.
    pub dataset: Arc<PreparedDataset>,

    /// Current values of the three filter controls.
    pub filters: Filters,

    /// Chart set currently on screen; replaced only as a whole.
    pub charts: ChartSet,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    recomputer: Recomputer,
}

impl AppState {
    /// Initialise filters to their defaults and request the first chart set.
    pub fn new(dataset: Arc<PreparedDataset>, recomputer: Recomputer) -> Self {
        let mut state = Self {
            filters: Filters::defaults(&dataset),
            dataset,
            charts: ChartSet::empty(),
            status_message: None,
            recomputer,
        };
        state.refilter();
        state
    }

    /// Whether a recomputation for the current filters is still running.
    pub fn is_recomputing(&self) -> bool {
        self.recomputer.is_pending()
    }

    /// Submit the current filters for recomputation.
    pub fn refilter(&mut self) {
        self.recomputer.submit(self.filters.clone());
    }

    /// Swap in the newest finished chart set, if any. On failure the
    /// previous set stays displayed.
    pub fn poll_charts(&mut self) {
        match self.recomputer.poll() {
            Some(Delivery::Charts(charts)) => {
                self.charts = charts;
                self.status_message = None;
            }
            Some(Delivery::Failed) => {
                self.status_message =
                    Some("Could not update charts; showing the previous results".to_string());
            }
            None => {}
        }
    }

    /// Set the release-year range, keeping `min <= max`.
    pub fn set_year_range(&mut self, min: i32, max: i32) {
        let range = YearRange::new(min.min(max), min.max(max));
        if range != self.filters.year_range {
            self.filters.year_range = range;
            self.refilter();
        }
    }

    pub fn set_content_type(&mut self, content_type: TypeFilter) {
        if content_type != self.filters.content_type {
            self.filters.content_type = content_type;
            self.refilter();
        }
    }

    pub fn set_country(&mut self, country: CountryFilter) {
        if country != self.filters.country {
            self.filters.country = country;
            self.refilter();
        }
    }

    /// Restore every control to its initial value.
    pub fn reset_filters(&mut self) {
        let defaults = Filters::defaults(&self.dataset);
        if defaults != self.filters {
            self.filters = defaults;
            self.refilter();
        }
    }

    /// Write the displayed chart set as pretty JSON.
    pub fn export_charts(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.charts).context("serializing chart set")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::chart::{self, ChartId};
    use crate::data::model::ContentType;
    use crate::data::testing::mixed_dataset;

    fn state() -> AppState {
        let dataset = Arc::new(mixed_dataset());
        let recomputer = Recomputer::spawn(dataset.clone(), || {}).unwrap();
        AppState::new(dataset, recomputer)
    }

    fn settle(state: &mut AppState) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while state.is_recomputing() {
            assert!(Instant::now() < deadline, "recompute did not finish");
            state.poll_charts();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn first_chart_set_uses_default_filters() {
        let mut state = state();
        settle(&mut state);
        let expected = chart::recompute(&state.dataset, &Filters::defaults(&state.dataset));
        assert_eq!(state.charts, expected);
    }

    #[test]
    fn filter_changes_replace_the_chart_set() {
        let mut state = state();
        settle(&mut state);

        state.set_content_type(TypeFilter::Only(ContentType::TvShow));
        state.set_year_range(2020, 2015);
        assert_eq!(state.filters.year_range, YearRange::new(2015, 2020));
        settle(&mut state);
        assert_eq!(state.charts, chart::recompute(&state.dataset, &state.filters));

        state.set_country(CountryFilter::Containing("Nowhere".into()));
        settle(&mut state);
        assert!(!state.charts.has_data());
        assert!(!state.charts.get(ChartId::TopGenres).has_data());

        state.reset_filters();
        settle(&mut state);
        assert_eq!(state.filters, Filters::defaults(&state.dataset));
        assert!(state.charts.has_data());
    }

    #[test]
    fn export_writes_json() {
        let mut state = state();
        settle(&mut state);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts.json");
        state.export_charts(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["charts"].as_array().unwrap().len(), 5);
        assert_eq!(json["charts"][0]["id"], "type_composition");
    }
}
