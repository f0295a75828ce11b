use serde::{Deserialize, Serialize};

use super::aggregate::{
    self, BoxStats, DurationPolicy, DurationSummary, HistogramBin, Pivot,
};
use super::error::ParseError;
use super::filter::{filtered_indices, CountryMatch, FilterSelection};
use super::model::{Catalog, ContentType};

// ---------------------------------------------------------------------------
// Options and results
// ---------------------------------------------------------------------------

/// Knobs that change how the bundle is computed, not what is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardOptions {
    pub country_match: CountryMatch,
    pub duration_policy: DurationPolicy,
    /// Length of the top-genre and top-country lists.
    pub top_n: usize,
    pub histogram_bins: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            country_match: CountryMatch::AnyToken,
            duration_policy: DurationPolicy::SkipInvalid,
            top_n: 10,
            histogram_bins: 30,
        }
    }
}

/// Everything the front-end draws for one selection.
///
/// Counters, `type_counts` and `year_counts` follow the selection; the other
/// tables always describe the whole catalog.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResults {
    pub selection: FilterSelection,
    /// Catalog indices of the filtered rows.
    #[serde(skip)]
    pub indices: Vec<usize>,

    pub total: usize,
    pub movies: usize,
    pub tv_shows: usize,

    pub type_counts: Vec<(ContentType, usize)>,
    pub year_counts: Vec<(i64, usize)>,

    pub top_genres: Vec<(String, usize)>,
    pub top_countries: Vec<(String, usize)>,
    pub pivot: Pivot,
    pub durations: Result<DurationSummary, ParseError>,
    pub duration_stats: Option<BoxStats>,
    pub year_histogram: Vec<HistogramBin>,
}

impl DashboardResults {
    /// Count for one content type among the filtered rows.
    pub fn count_of(&self, content_type: ContentType) -> usize {
        self.type_counts
            .iter()
            .find(|(t, _)| *t == content_type)
            .map_or(0, |(_, n)| *n)
    }
}

// ---------------------------------------------------------------------------
// Whole-catalog tables
// ---------------------------------------------------------------------------

/// Tables that describe the whole catalog. They depend on the options but
/// never on the selection, so callers can build them once per load.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogTables {
    pub top_genres: Vec<(String, usize)>,
    pub top_countries: Vec<(String, usize)>,
    pub pivot: Pivot,
    pub durations: Result<DurationSummary, ParseError>,
    pub duration_stats: Option<BoxStats>,
    pub year_histogram: Vec<HistogramBin>,
}

impl CatalogTables {
    pub fn build(catalog: &Catalog, options: &DashboardOptions) -> Self {
        let full = catalog.rows();

        let durations = aggregate::movie_durations(full, options.duration_policy);
        match &durations {
            Ok(summary) if summary.skipped > 0 => log::warn!(
                "skipped {} movie duration(s) that are not \"<n> min\"",
                summary.skipped
            ),
            Err(e) => log::warn!("movie durations unavailable: {e}"),
            Ok(_) => {}
        }
        let duration_stats = durations
            .as_ref()
            .ok()
            .and_then(|d| BoxStats::from_values(&d.minutes));

        CatalogTables {
            top_genres: aggregate::top_genres(full, options.top_n),
            top_countries: aggregate::top_countries(full, options.top_n),
            pivot: aggregate::country_year_pivot(full),
            durations,
            duration_stats,
            year_histogram: aggregate::release_year_histogram(full, options.histogram_bins),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Recompute every table for `selection`.
pub fn compute(
    catalog: &Catalog,
    selection: &FilterSelection,
    options: &DashboardOptions,
) -> DashboardResults {
    let tables = CatalogTables::build(catalog, options);
    compute_with(catalog, &tables, selection, options)
}

/// Like [`compute`], reusing `tables` previously built for `catalog` with
/// the same `options`.
pub fn compute_with(
    catalog: &Catalog,
    tables: &CatalogTables,
    selection: &FilterSelection,
    options: &DashboardOptions,
) -> DashboardResults {
    let indices = filtered_indices(catalog, selection, options.country_match);

    let type_counts = aggregate::type_counts(catalog.select(&indices));
    let year_counts = aggregate::year_counts(catalog.select(&indices));

    let tables = tables.clone();
    let mut results = DashboardResults {
        selection: selection.clone(),
        total: indices.len(),
        movies: 0,
        tv_shows: 0,
        type_counts,
        year_counts,
        top_genres: tables.top_genres,
        top_countries: tables.top_countries,
        pivot: tables.pivot,
        durations: tables.durations,
        duration_stats: tables.duration_stats,
        year_histogram: tables.year_histogram,
        indices,
    };
    results.movies = results.count_of(ContentType::Movie);
    results.tv_shows = results.count_of(ContentType::TvShow);

    log::debug!(
        "recomputed dashboard: {} of {} titles selected",
        results.total,
        catalog.len()
    );
    results
}
