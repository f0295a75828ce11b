//! Summary tables behind the dashboard charts.
//!
//! Every function here is pure: it reads rows and returns a small owned
//! table. Which rows are passed in (full catalog or the filtered subset) is
//! decided by [`super::dashboard::compute`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::error::ParseError;
use super::model::{CatalogRow, ContentType};

// ---------------------------------------------------------------------------
// Simple counts
// ---------------------------------------------------------------------------

/// Rows per content type, for every type present. Movie sorts first.
pub fn type_counts<'a, I>(rows: I) -> Vec<(ContentType, usize)>
where
    I: IntoIterator<Item = &'a CatalogRow>,
{
    let mut counts: BTreeMap<ContentType, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.content_type).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Rows per release year, ascending by year.
pub fn year_counts<'a, I>(rows: I) -> Vec<(i64, usize)>
where
    I: IntoIterator<Item = &'a CatalogRow>,
{
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.release_year).or_default() += 1;
    }
    counts.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Top-N over comma-separated columns
// ---------------------------------------------------------------------------

/// Count tokens and keep the `n` most frequent. Equal counts keep the order
/// in which tokens were first seen.
fn top_tokens<'a, T>(tokens: T, n: usize) -> Vec<(String, usize)>
where
    T: IntoIterator<Item = &'a str>,
{
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut slot: HashMap<&'a str, usize> = HashMap::new();

    for tok in tokens {
        match slot.get(tok) {
            Some(&i) => order[i].1 += 1,
            None => {
                slot.insert(tok, order.len());
                order.push((tok.to_string(), 1));
            }
        }
    }

    // `sort_by` is stable, so ties stay in first-seen order.
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.truncate(n);
    order
}

/// Most frequent genres in `listed_in`.
pub fn top_genres<'a, I>(rows: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a CatalogRow>,
{
    top_tokens(rows.into_iter().flat_map(CatalogRow::genres), n)
}

/// Most frequent countries; rows without a country are ignored.
pub fn top_countries<'a, I>(rows: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a CatalogRow>,
{
    top_tokens(rows.into_iter().flat_map(CatalogRow::countries), n)
}

// ---------------------------------------------------------------------------
// Country × year pivot
// ---------------------------------------------------------------------------

/// Dense count grid: `counts[c][y]` is the number of rows whose primary
/// country is `countries[c]` and release year is `years[y]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pivot {
    pub countries: Vec<String>,
    pub years: Vec<i64>,
    pub counts: Vec<Vec<usize>>,
}

impl Pivot {
    /// Cell value; 0 for pairs outside the grid.
    pub fn get(&self, country: &str, year: i64) -> usize {
        let Some(c) = self.countries.iter().position(|x| x == country) else {
            return 0;
        };
        match self.years.binary_search(&year) {
            Ok(y) => self.counts[c][y],
            Err(_) => 0,
        }
    }

    /// Sum over all cells.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

/// Build the pivot from the first listed country of each row.
pub fn country_year_pivot<'a, I>(rows: I) -> Pivot
where
    I: IntoIterator<Item = &'a CatalogRow>,
{
    let mut cells: BTreeMap<(&str, i64), usize> = BTreeMap::new();
    let mut years: BTreeSet<i64> = BTreeSet::new();

    for row in rows {
        let Some(country) = row.countries().next() else {
            continue;
        };
        *cells.entry((country, row.release_year)).or_default() += 1;
        years.insert(row.release_year);
    }

    let countries: Vec<String> = cells
        .keys()
        .map(|(c, _)| *c)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    let years: Vec<i64> = years.into_iter().collect();

    let mut counts = vec![vec![0usize; years.len()]; countries.len()];
    for ((country, year), n) in cells {
        // Both keys come from the sorted vectors built above.
        if let (Ok(c), Ok(y)) = (
            countries.binary_search_by(|x| x.as_str().cmp(country)),
            years.binary_search(&year),
        ) {
            counts[c][y] = n;
        }
    }

    Pivot {
        countries,
        years,
        counts,
    }
}

// ---------------------------------------------------------------------------
// Movie durations
// ---------------------------------------------------------------------------

/// What to do with a movie whose duration is not `"<N> min"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationPolicy {
    /// The first malformed duration fails the whole computation.
    Strict,
    /// Malformed durations are skipped and counted.
    #[default]
    SkipInvalid,
}

/// Parsed movie durations in minutes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DurationSummary {
    pub minutes: Vec<f64>,
    /// Movies with an empty duration cell.
    pub missing: usize,
    /// Movies whose duration could not be parsed (only under `SkipInvalid`).
    pub skipped: usize,
}

/// `"90 min"` → `90.0`. Anything without the `" min"` suffix is rejected.
pub fn parse_minutes(value: &str) -> Option<f64> {
    let number = value.trim().strip_suffix(" min")?;
    number.trim().parse::<f64>().ok().filter(|m| m.is_finite())
}

/// Parse the duration of every movie. Row numbers in errors count from 0
/// over the rows passed in.
pub fn movie_durations<'a, I>(rows: I, policy: DurationPolicy) -> Result<DurationSummary, ParseError>
where
    I: IntoIterator<Item = &'a CatalogRow>,
{
    let mut summary = DurationSummary::default();

    for (i, row) in rows.into_iter().enumerate() {
        if row.content_type != ContentType::Movie {
            continue;
        }
        let Some(raw) = row.duration.as_deref() else {
            summary.missing += 1;
            continue;
        };
        match parse_minutes(raw) {
            Some(m) => summary.minutes.push(m),
            None => {
                let err = ParseError {
                    row: i,
                    value: raw.to_string(),
                };
                match policy {
                    DurationPolicy::Strict => return Err(err),
                    DurationPolicy::SkipInvalid => {
                        log::debug!("skipping movie duration: {err}");
                        summary.skipped += 1;
                    }
                }
            }
        }
    }

    Ok(summary)
}

/// Five-number summary for a box plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxStats {
    /// Quartiles with linear interpolation between closest ranks.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let quantile = |p: f64| {
            let pos = p * (sorted.len() - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        };

        Some(BoxStats {
            min: sorted[0],
            q1: quantile(0.25),
            median: quantile(0.5),
            q3: quantile(0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

// ---------------------------------------------------------------------------
// Release-year histogram
// ---------------------------------------------------------------------------

/// One bar of the release-year histogram, covering `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Split `[min_year, max_year + 1)` into `bins` equal-width bins.
pub fn release_year_histogram<'a, I>(rows: I, bins: usize) -> Vec<HistogramBin>
where
    I: IntoIterator<Item = &'a CatalogRow>,
{
    let years: Vec<i64> = rows.into_iter().map(|r| r.release_year).collect();
    let (Some(&min), Some(&max)) = (years.iter().min(), years.iter().max()) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    // Widen before subtracting so extreme years cannot overflow.
    let start = min as f64;
    let width = (i128::from(max) + 1 - i128::from(min)) as f64 / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|b| HistogramBin {
            start: start + width * b as f64,
            end: start + width * (b + 1) as f64,
            count: 0,
        })
        .collect();

    for y in years {
        let b = ((i128::from(y) - i128::from(min)) as f64 / width).floor() as usize;
        out[b.min(bins - 1)].count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Vec<CatalogRow> {
        vec![
            CatalogRow::new(ContentType::Movie, Some("USA"), 2020, "Action, Comedy", Some("90 min")),
            CatalogRow::new(ContentType::TvShow, Some("India"), 2019, "Drama", Some("2 Seasons")),
            CatalogRow::new(ContentType::Movie, Some("USA,UK"), 2021, "Comedy", Some("100 min")),
        ]
    }

    #[test]
    fn type_counts_sum_to_row_count() {
        let rows = scenario();
        let counts = type_counts(&rows);
        assert_eq!(counts, vec![(ContentType::Movie, 2), (ContentType::TvShow, 1)]);
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), rows.len());
    }

    #[test]
    fn year_counts_are_sorted_by_year() {
        let rows = scenario();
        assert_eq!(year_counts(&rows), vec![(2019, 1), (2020, 1), (2021, 1)]);
    }

    #[test]
    fn top_genres_orders_ties_by_first_occurrence() {
        let rows = scenario();
        assert_eq!(
            top_genres(&rows, 10),
            vec![
                ("Comedy".to_string(), 2),
                ("Action".to_string(), 1),
                ("Drama".to_string(), 1),
            ]
        );
    }

    #[test]
    fn top_lists_are_capped_and_descending() {
        let rows: Vec<CatalogRow> = (0..15)
            .flat_map(|g| {
                (0..=g).map(move |_| {
                    CatalogRow::new(
                        ContentType::Movie,
                        Some(format!("C{g}").as_str()),
                        2000,
                        &format!("G{g}"),
                        None,
                    )
                })
            })
            .collect();

        for top in [top_genres(&rows, 10), top_countries(&rows, 10)] {
            assert_eq!(top.len(), 10);
            assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
            assert_eq!(top[0].1, 15);
        }
    }

    #[test]
    fn top_countries_splits_and_skips_missing() {
        let mut rows = scenario();
        rows.push(CatalogRow::new(ContentType::Movie, None, 2000, "", None));
        assert_eq!(
            top_countries(&rows, 10),
            vec![
                ("USA".to_string(), 2),
                ("India".to_string(), 1),
                ("UK".to_string(), 1),
            ]
        );
    }

    #[test]
    fn pivot_uses_first_country_and_fills_zeros() {
        let mut rows = scenario();
        rows.push(CatalogRow::new(ContentType::Movie, None, 2018, "", None));
        let pivot = country_year_pivot(&rows);

        assert_eq!(pivot.countries, vec!["India", "USA"]);
        assert_eq!(pivot.years, vec![2019, 2020, 2021]);
        assert_eq!(pivot.get("USA", 2021), 1);
        assert_eq!(pivot.get("USA", 2019), 0);
        assert_eq!(pivot.get("UK", 2021), 0);
        assert_eq!(pivot.total(), 3);
        assert_eq!(pivot.max_count(), 1);
    }

    #[test]
    fn parse_minutes_requires_suffix() {
        assert_eq!(parse_minutes("90 min"), Some(90.0));
        assert_eq!(parse_minutes("120 min"), Some(120.0));
        assert_eq!(parse_minutes("90"), None);
        assert_eq!(parse_minutes("2 Seasons"), None);
        assert_eq!(parse_minutes("abc min"), None);
    }

    #[test]
    fn durations_only_consider_movies() {
        let rows = scenario();
        let summary = movie_durations(&rows, DurationPolicy::Strict).unwrap();
        assert_eq!(summary.minutes, vec![90.0, 100.0]);
        assert_eq!(summary.skipped, 0);
    }

    #[test]
    fn strict_policy_fails_on_malformed_duration() {
        let mut rows = scenario();
        rows.push(CatalogRow::new(ContentType::Movie, None, 2000, "", Some("74")));
        let err = movie_durations(&rows, DurationPolicy::Strict).unwrap_err();
        assert_eq!(err.row, 3);
        assert_eq!(err.value, "74");
    }

    #[test]
    fn skip_policy_counts_malformed_and_missing() {
        let mut rows = scenario();
        rows.push(CatalogRow::new(ContentType::Movie, None, 2000, "", Some("74")));
        rows.push(CatalogRow::new(ContentType::Movie, None, 2000, "", None));
        let summary = movie_durations(&rows, DurationPolicy::SkipInvalid).unwrap();
        assert_eq!(summary.minutes, vec![90.0, 100.0]);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.missing, 1);
    }

    #[test]
    fn box_stats_interpolate_quartiles() {
        let stats = BoxStats::from_values(&[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.max, 5.0);

        let even = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(even.median, 2.5);
        assert!(BoxStats::from_values(&[]).is_none());
    }

    #[test]
    fn histogram_covers_every_row() {
        let rows: Vec<CatalogRow> = (1925..=2021)
            .map(|y| CatalogRow::new(ContentType::Movie, None, y, "", None))
            .collect();
        let bins = release_year_histogram(&rows, 30);
        assert_eq!(bins.len(), 30);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), rows.len());
        assert_eq!(bins[0].start, 1925.0);
        assert!((bins[29].end - 2022.0).abs() < 1e-9);
    }

    #[test]
    fn histogram_of_single_year() {
        let rows = vec![CatalogRow::new(ContentType::Movie, None, 2000, "", None); 3];
        let bins = release_year_histogram(&rows, 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(bins[0].count, 3);
        assert!(release_year_histogram(&rows, 0).is_empty());
    }

    #[test]
    fn histogram_handles_extreme_years() {
        let rows = vec![
            CatalogRow::new(ContentType::Movie, None, i64::MIN, "", None),
            CatalogRow::new(ContentType::Movie, None, 0, "", None),
            CatalogRow::new(ContentType::Movie, None, i64::MAX, "", None),
        ];
        let bins = release_year_histogram(&rows, 30);
        assert_eq!(bins.len(), 30);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[29].count, 1);

        let top = vec![CatalogRow::new(ContentType::Movie, None, i64::MAX, "", None); 2];
        assert_eq!(release_year_histogram(&top, 3)[0].count, 2);
    }
}
