use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{Catalog, CatalogRow, ContentType};

// ---------------------------------------------------------------------------
// Filter selection: what the side panel currently asks for
// ---------------------------------------------------------------------------

/// How a row's `country` cell is compared against the selected countries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountryMatch {
    /// Match when any comma-separated country of the row is selected.
    #[default]
    AnyToken,
    /// Match only when the whole cell equals a selected value, so
    /// `"USA, UK"` is never matched by `{"UK"}`.
    WholeField,
}

/// Current user selection. An empty set means "no constraint" for that
/// column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub types: BTreeSet<ContentType>,
    pub countries: BTreeSet<String>,
    /// Inclusive release-year range `(lo, hi)`.
    pub years: (i64, i64),
}

impl Default for FilterSelection {
    /// Keeps every row of any catalog.
    fn default() -> Self {
        FilterSelection {
            types: BTreeSet::new(),
            countries: BTreeSet::new(),
            years: (i64::MIN, i64::MAX),
        }
    }
}

impl FilterSelection {
    /// Selection that keeps every row of `catalog`.
    pub fn full(catalog: &Catalog) -> Self {
        FilterSelection {
            types: BTreeSet::new(),
            countries: BTreeSet::new(),
            years: catalog.year_bounds.unwrap_or((i64::MIN, i64::MAX)),
        }
    }

    /// Replace the year range, clamped to the catalog bounds and reordered
    /// so that `lo <= hi`.
    pub fn set_years(&mut self, catalog: &Catalog, lo: i64, hi: i64) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.years = match catalog.year_bounds {
            Some((min, max)) => (lo.clamp(min, max), hi.clamp(min, max)),
            None => (lo, hi),
        };
    }

    /// Whether `row` passes every active constraint.
    pub fn matches(&self, row: &CatalogRow, country_match: CountryMatch) -> bool {
        let (lo, hi) = self.years;
        if row.release_year < lo || row.release_year > hi {
            return false;
        }
        if !self.types.is_empty() && !self.types.contains(&row.content_type) {
            return false;
        }
        if self.countries.is_empty() {
            return true;
        }
        match country_match {
            CountryMatch::AnyToken => row.countries().any(|c| self.countries.contains(c)),
            CountryMatch::WholeField => row
                .country
                .as_deref()
                .is_some_and(|c| self.countries.contains(c)),
        }
    }
}

/// Return indices of rows that pass the selection, in catalog order.
pub fn filtered_indices(
    catalog: &Catalog,
    selection: &FilterSelection,
    country_match: CountryMatch,
) -> Vec<usize> {
    catalog
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| selection.matches(row, country_match))
        .map(|(i, _)| i)
        .collect()
}
