use std::collections::BTreeSet;
use std::sync::Arc;

use crate::auth::{GateStatus, PassphraseGate};
use crate::color::CategoryColors;
use crate::config::Config;
use crate::data::filter::{FilterState, filtered_indices};
use crate::data::forecast::{Forecast, ForecastError, forecast};
use crate::data::model::{Dataset, Record};
use crate::data::summary::{
    self, BoxSummary, Bucket, Describe, OverallSummary, by_location, by_sex, by_year,
    by_year_and_sex, describe_by_sex, histogram_buckets, overall_summary, ranked_by_location,
    sex_distributions,
};

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Knobs that shape the aggregations, taken from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub top_n: usize,
    pub bins: usize,
    pub forecast_horizon: u32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            top_n: summary::DEFAULT_TOP_N,
            bins: summary::DEFAULT_BINS,
            forecast_horizon: 5,
        }
    }
}

impl From<&Config> for ViewSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            top_n: cfg.top_n,
            bins: cfg.bins,
            forecast_horizon: cfg.forecast_horizon,
        }
    }
}

/// Every chart-ready table derived from the filtered subset.
#[derive(Debug, Clone, Default)]
pub struct Views {
    pub overall: Option<OverallSummary>,
    pub by_sex: Vec<(String, f64)>,
    pub by_location: Vec<(String, f64)>,
    pub ranked: Vec<(String, f64)>,
    pub by_year_and_sex: Vec<(i32, String, f64)>,
    pub by_year: Vec<(i32, f64)>,
    pub histogram: Vec<Bucket>,
    pub distributions: Vec<(String, BoxSummary)>,
    pub key_stats: Vec<(String, Describe)>,
    /// `None` when there is nothing to forecast from.
    pub forecast: Option<Result<Forecast, ForecastError>>,
}

impl Views {
    pub fn compute(subset: &[&Record], settings: ViewSettings) -> Self {
        let by_year = by_year(subset);
        let projection = (!by_year.is_empty()).then(|| {
            let result = forecast(&by_year, settings.forecast_horizon);
            if let Err(e) = &result {
                log::warn!("Forecast unavailable: {e}");
            }
            result
        });

        Self {
            overall: overall_summary(subset),
            by_sex: by_sex(subset),
            by_location: by_location(subset),
            ranked: ranked_by_location(subset, settings.top_n),
            by_year_and_sex: by_year_and_sex(subset),
            by_year,
            histogram: histogram_buckets(subset, settings.bins),
            distributions: sex_distributions(subset),
            key_stats: describe_by_sex(subset),
            forecast: projection,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTab {
    #[default]
    Overview,
    Distribution,
    Trend,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// The table, loaded once at startup.
    pub dataset: Arc<Dataset>,

    /// Current filter selections.
    pub filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregations over the visible records (cached).
    pub views: Views,

    pub settings: ViewSettings,

    pub gate: PassphraseGate,

    /// Text currently typed into the passphrase box.
    pub passphrase_input: String,

    /// Search text narrowing the location list.
    pub location_query: String,

    pub sex_colors: CategoryColors,

    pub tab: ChartTab,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, settings: ViewSettings, gate: PassphraseGate) -> Self {
        let filters = FilterState::defaults(&dataset.domain);
        let sex_colors = CategoryColors::new(&dataset.domain.sexes);
        let mut state = Self {
            dataset,
            filters,
            visible_indices: Vec::new(),
            views: Views::default(),
            settings,
            gate,
            passphrase_input: String::new(),
            location_query: String::new(),
            sex_colors,
            tab: ChartTab::default(),
        };
        state.refilter();
        state
    }

    /// Borrow the records currently passing the filters.
    pub fn visible_records(&self) -> Vec<&Record> {
        self.visible_indices
            .iter()
            .map(|&i| &self.dataset.records[i])
            .collect()
    }

    /// Recompute `visible_indices` and every view after a filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset, &self.filters);
        let views = Views::compute(&self.visible_records(), self.settings);
        self.views = views;
        log::debug!(
            "Filters updated: {} of {} records visible",
            self.visible_indices.len(),
            self.dataset.len()
        );
    }

    /// Check the typed passphrase; the input box is cleared either way.
    pub fn submit_passphrase(&mut self) -> GateStatus {
        let attempt = std::mem::take(&mut self.passphrase_input);
        self.gate.submit(&attempt)
    }

    pub fn set_global_top_mode(&mut self, enabled: bool) {
        self.filters.set_global_top_mode(enabled);
        self.refilter();
    }

    pub fn toggle_location(&mut self, location: &str) {
        self.filters.toggle_location(location);
        self.refilter();
    }

    pub fn toggle_sex(&mut self, sex: &str) {
        self.filters.toggle_sex(sex);
        self.refilter();
    }

    pub fn toggle_year(&mut self, year: i32) {
        self.filters.toggle_year(year);
        self.refilter();
    }

    pub fn select_all_locations(&mut self) {
        self.filters
            .set_locations(self.dataset.domain.locations.clone());
        self.refilter();
    }

    pub fn select_no_locations(&mut self) {
        self.filters.set_locations(BTreeSet::new());
        self.refilter();
    }

    pub fn select_all_sexes(&mut self) {
        self.filters.set_sexes(self.dataset.domain.sexes.clone());
        self.refilter();
    }

    pub fn select_no_sexes(&mut self) {
        self.filters.set_sexes(BTreeSet::new());
        self.refilter();
    }

    pub fn select_all_years(&mut self) {
        self.filters.set_years(self.dataset.domain.years.clone());
        self.refilter();
    }

    pub fn select_no_years(&mut self) {
        self.filters.set_years(BTreeSet::new());
        self.refilter();
    }

    /// "Reset All Filters".
    pub fn reset_filters(&mut self) {
        self.filters.reset(&self.dataset.domain);
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let dataset = Dataset::from_records(vec![
            Record::new("A", "Male", 2000, 30.0),
            Record::new("A", "Female", 2000, 40.0),
            Record::new("B", "Male", 2000, 50.0),
        ]);
        AppState::new(
            Arc::new(dataset),
            ViewSettings::default(),
            PassphraseGate::new("123456"),
        )
    }

    #[test]
    fn starts_with_no_locations_and_no_data() {
        let st = state();
        assert!(st.visible_indices.is_empty());
        assert!(st.views.overall.is_none());
        assert!(st.views.ranked.is_empty());
        assert!(st.views.forecast.is_none());
    }

    #[test]
    fn selecting_locations_recomputes_views() {
        let mut st = state();
        st.select_all_locations();

        let overall = st.views.overall.unwrap();
        assert_eq!((overall.mean, overall.min, overall.max), (40.0, 30.0, 50.0));
        assert_eq!(
            st.views.ranked,
            vec![("B".to_string(), 50.0), ("A".to_string(), 35.0)]
        );
        assert_eq!(st.views.by_year, vec![(2000, 40.0)]);

        let sexes: Vec<_> = st.views.key_stats.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(sexes, ["Male", "Female"]);
        assert_eq!(st.views.key_stats[0].1.count, 2);
        assert_eq!(st.visible_records().len(), 3);
    }

    #[test]
    fn single_year_forecast_is_a_warning_not_a_failure() {
        let mut st = state();
        st.set_global_top_mode(true);
        assert_eq!(
            st.views.forecast,
            Some(Err(ForecastError::TooFewPoints(1)))
        );
        assert_eq!(st.views.histogram.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn global_mode_overrides_locations() {
        let mut st = state();
        st.toggle_location("A");
        st.toggle_sex("Female");
        assert_eq!(st.visible_indices, vec![0]);

        st.set_global_top_mode(true);
        assert_eq!(st.visible_indices, vec![0, 2]);
    }

    #[test]
    fn reset_restores_default_view() {
        let mut st = state();
        st.set_global_top_mode(true);
        st.select_no_years();
        st.reset_filters();

        assert_eq!(st.filters, FilterState::defaults(&st.dataset.domain));
        assert!(st.visible_indices.is_empty());
    }

    #[test]
    fn passphrase_input_is_cleared_after_submit() {
        let mut st = state();
        st.passphrase_input = "nope".to_string();
        assert_eq!(st.submit_passphrase(), GateStatus::Rejected);
        assert!(st.passphrase_input.is_empty());

        st.passphrase_input = "123456".to_string();
        assert_eq!(st.submit_passphrase(), GateStatus::Granted);
        assert!(st.gate.is_open());
    }
}
