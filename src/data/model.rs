use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// ContentType – the `type` column
// ---------------------------------------------------------------------------

/// Kind of a catalog entry. The source data only ever uses these two labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "Movie")]
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl ContentType {
    pub const ALL: [ContentType; 2] = [ContentType::Movie, ContentType::TvShow];

    pub fn label(self) -> &'static str {
        match self {
            ContentType::Movie => "Movie",
            ContentType::TvShow => "TV Show",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Movie" => Ok(ContentType::Movie),
            "TV Show" => Ok(ContentType::TvShow),
            other => Err(format!("unknown content type '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogRow – one row of the source table
// ---------------------------------------------------------------------------

/// A single movie or show.
///
/// Only `type`, `country`, `release_year`, `listed_in` and `duration` feed
/// the dashboard; the remaining columns are carried along when the source
/// has them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub show_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub director: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub cast: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_added: Option<String>,
    pub release_year: i64,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub rating: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub listed_in: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
}

impl CatalogRow {
    /// Row with only the columns the dashboard reads.
    pub fn new(
        content_type: ContentType,
        country: Option<&str>,
        release_year: i64,
        listed_in: &str,
        duration: Option<&str>,
    ) -> Self {
        CatalogRow {
            show_id: None,
            title: String::new(),
            content_type,
            director: None,
            cast: None,
            country: country.and_then(non_blank),
            date_added: None,
            release_year,
            rating: None,
            duration: duration.and_then(non_blank),
            listed_in: listed_in.to_string(),
            description: None,
        }
    }

    /// Trimmed, non-empty country names of this row.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.country.as_deref().into_iter().flat_map(split_list)
    }

    /// Trimmed, non-empty genre names of this row.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        split_list(&self.listed_in)
    }
}

/// Split a comma-separated cell into trimmed, non-empty tokens.
pub fn split_list(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|t| !t.is_empty())
}

pub(crate) fn non_blank(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(non_blank))
}

// ---------------------------------------------------------------------------
// Catalog – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed catalog with indices used to populate the filter widgets.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    rows: Vec<CatalogRow>,
    /// Distinct content types present.
    pub types: BTreeSet<ContentType>,
    /// Distinct country tokens, sorted.
    pub countries: BTreeSet<String>,
    /// Inclusive `(min, max)` release year; `None` when empty.
    pub year_bounds: Option<(i64, i64)>,
}

impl Catalog {
    /// Build column indices from the loaded rows.
    pub fn from_rows(rows: Vec<CatalogRow>) -> Self {
        let mut types = BTreeSet::new();
        let mut countries = BTreeSet::new();
        let mut year_bounds: Option<(i64, i64)> = None;

        for row in &rows {
            types.insert(row.content_type);
            for c in row.countries() {
                if !countries.contains(c) {
                    countries.insert(c.to_string());
                }
            }
            year_bounds = Some(match year_bounds {
                None => (row.release_year, row.release_year),
                Some((lo, hi)) => (lo.min(row.release_year), hi.max(row.release_year)),
            });
        }

        Catalog {
            rows,
            types,
            countries,
            year_bounds,
        }
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    /// Rows at the given indices, in index order.
    pub fn select<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a CatalogRow> + 'a {
        indices.iter().filter_map(move |&i| self.rows.get(i))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
