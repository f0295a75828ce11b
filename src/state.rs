use std::path::Path;

use anyhow::{Context, Result};

use catalog_lens::data::dashboard::{compute_with, CatalogTables, DashboardResults};
use catalog_lens::data::filter::FilterSelection;
use catalog_lens::data::loader::load_source;
use catalog_lens::data::model::{Catalog, ContentType};
use catalog_lens::DashboardConfig;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// URL or path the current catalog came from.
    pub source: String,

    /// Loaded catalog (None until a load succeeds).
    pub catalog: Option<Catalog>,

    /// Whole-catalog tables, built once per load.
    pub tables: Option<CatalogTables>,

    /// Current side-panel selection.
    pub selection: FilterSelection,

    /// Tables for `selection` (cached until the selection changes).
    pub results: Option<DashboardResults>,

    /// Text typed in the country search box.
    pub country_search: String,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    /// Set when the last load failed; blocks the chart area.
    pub load_error: Option<String>,

    dirty: bool,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            source: config.source.clone(),
            config,
            catalog: None,
            tables: None,
            selection: FilterSelection::default(),
            results: None,
            country_search: String::new(),
            status_message: None,
            load_error: None,
            dirty: false,
        }
    }

    /// Load (or reload) `source`. On failure the previous catalog is kept
    /// only when there was one; otherwise the error blocks the dashboard.
    pub fn load(&mut self, source: &str) {
        match load_source(source) {
            Ok(catalog) => {
                self.source = source.to_string();
                self.set_catalog(catalog);
            }
            Err(e) => {
                log::error!("Failed to load {source}: {e}");
                let msg = format!("Could not load {source}: {e}");
                if self.catalog.is_none() {
                    self.load_error = Some(msg.clone());
                }
                self.status_message = Some(msg);
            }
        }
    }

    pub fn reload(&mut self) {
        let source = self.source.clone();
        self.load(&source);
    }

    /// Ingest a newly loaded catalog and reset the filters.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.tables = Some(CatalogTables::build(&catalog, &self.config.options));
        self.catalog = Some(catalog);
        self.load_error = None;
        self.status_message = None;
        self.country_search.clear();
        self.reset_filters();
    }

    /// Back to "everything selected", honouring `initial_years`.
    pub fn reset_filters(&mut self) {
        let Some(catalog) = &self.catalog else {
            return;
        };
        let mut selection = FilterSelection::full(catalog);
        if let Some([lo, hi]) = self.config.initial_years {
            selection.set_years(catalog, lo, hi);
        }
        self.selection = selection;
        self.dirty = true;
    }

    /// Recompute the results bundle if the selection changed.
    pub fn refresh(&mut self) {
        if !self.dirty && self.results.is_some() {
            return;
        }
        if let (Some(catalog), Some(tables)) = (&self.catalog, &self.tables) {
            self.results = Some(compute_with(
                catalog,
                tables,
                &self.selection,
                &self.config.options,
            ));
        }
        self.dirty = false;
    }

    pub fn toggle_type(&mut self, content_type: ContentType) {
        if !self.selection.types.remove(&content_type) {
            self.selection.types.insert(content_type);
        }
        self.dirty = true;
    }

    pub fn toggle_country(&mut self, country: &str) {
        if !self.selection.countries.remove(country) {
            self.selection.countries.insert(country.to_string());
        }
        self.dirty = true;
    }

    /// Countries matching the search box, case-insensitively.
    pub fn visible_countries(&self) -> Vec<String> {
        let Some(catalog) = &self.catalog else {
            return Vec::new();
        };
        let needle = self.country_search.trim().to_lowercase();
        catalog
            .countries
            .iter()
            .filter(|c| needle.is_empty() || c.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Select every country currently shown by the search box.
    pub fn select_visible_countries(&mut self) {
        let visible = self.visible_countries();
        self.selection.countries.extend(visible);
        self.dirty = true;
    }

    pub fn clear_countries(&mut self) {
        self.selection.countries.clear();
        self.dirty = true;
    }

    pub fn set_years(&mut self, lo: i64, hi: i64) {
        if let Some(catalog) = &self.catalog {
            self.selection.set_years(catalog, lo, hi);
            self.dirty = true;
        }
    }

    /// Write the current results bundle as pretty JSON.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let results = self
            .results
            .as_ref()
            .context("nothing to export, no catalog loaded")?;
        let json = serde_json::to_string_pretty(results).context("serializing results")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported dashboard summary to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_lens::data::model::CatalogRow;

    fn loaded_state() -> AppState {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_catalog(Catalog::from_rows(vec![
            CatalogRow::new(ContentType::Movie, Some("United States"), 2020, "Comedy", Some("90 min")),
            CatalogRow::new(ContentType::TvShow, Some("India, United Kingdom"), 2019, "Drama", None),
            CatalogRow::new(ContentType::Movie, Some("United Kingdom"), 2001, "Drama", Some("100 min")),
        ]));
        state.refresh();
        state
    }

    #[test]
    fn refresh_recomputes_after_toggle() {
        let mut state = loaded_state();
        assert_eq!(state.results.as_ref().unwrap().total, 3);

        state.toggle_type(ContentType::TvShow);
        state.refresh();
        assert_eq!(state.results.as_ref().unwrap().total, 1);

        state.toggle_type(ContentType::TvShow);
        state.refresh();
        assert_eq!(state.results.as_ref().unwrap().total, 3);
    }

    #[test]
    fn whole_catalog_tables_survive_filter_changes() {
        let mut state = loaded_state();
        let before = state.tables.as_ref().unwrap().top_countries.clone();
        assert_eq!(before[0], ("United Kingdom".to_string(), 2));

        state.toggle_country("India");
        state.set_years(2019, 2020);
        state.refresh();
        let results = state.results.as_ref().unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.top_countries, before);
        assert_eq!(results.durations.as_ref().unwrap().minutes, vec![90.0, 100.0]);
    }

    #[test]
    fn country_search_and_bulk_select() {
        let mut state = loaded_state();
        state.country_search = "united".to_string();
        assert_eq!(state.visible_countries(), vec!["United Kingdom", "United States"]);

        state.select_visible_countries();
        state.refresh();
        assert_eq!(state.results.as_ref().unwrap().total, 3);

        state.clear_countries();
        state.toggle_country("India");
        state.refresh();
        assert_eq!(state.results.as_ref().unwrap().indices, vec![1]);
    }

    #[test]
    fn initial_years_apply_on_reset() {
        let mut config = DashboardConfig::default();
        config.initial_years = Some([2010, 2030]);
        let mut state = AppState::new(config);
        state.set_catalog(Catalog::from_rows(vec![
            CatalogRow::new(ContentType::Movie, None, 2001, "", None),
            CatalogRow::new(ContentType::Movie, None, 2020, "", None),
        ]));
        assert_eq!(state.selection.years, (2010, 2020));
    }

    #[test]
    fn failed_first_load_blocks_dashboard() {
        let mut state = AppState::new(DashboardConfig::default());
        state.load("does-not-exist.csv");
        assert!(state.catalog.is_none());
        assert!(state.load_error.is_some());
    }

    #[test]
    fn export_writes_json() {
        let state = loaded_state();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        state.export_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total"], 3);
        assert_eq!(value["movies"], 2);
    }
}
