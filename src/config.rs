use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::dashboard::DashboardOptions;

/// File looked up in the working directory at start-up.
pub const CONFIG_FILE: &str = "catalog-lens.toml";

/// Public Netflix titles dataset the dashboard was built around.
pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/Hansini19/netflix_dashboard_dynamic/refs/heads/main/netflix_titles.csv";

/// Start-up configuration. Every field is optional in the file.
///
/// ```toml
/// source = "data/netflix_titles.csv"
/// initial_years = [2000, 2021]
///
/// [options]
/// country_match = "whole_field"
/// duration_policy = "strict"
/// top_n = 10
/// histogram_bins = 30
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// URL or file path of the catalog.
    pub source: String,
    /// Year range selected when a catalog is (re)loaded, clamped to its
    /// bounds. The full range when absent.
    pub initial_years: Option<[i64; 2]>,
    pub options: DashboardOptions,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            initial_years: None,
            options: DashboardOptions::default(),
        }
    }
}

impl DashboardConfig {
    /// Read `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.options.top_n == 0 {
            anyhow::bail!("options.top_n must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::DurationPolicy;
    use crate::data::filter::CountryMatch;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(DashboardConfig::from_toml("").unwrap(), DashboardConfig::default());
    }

    #[test]
    fn partial_options_keep_other_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
            source = "titles.csv"
            initial_years = [2000, 2021]

            [options]
            country_match = "whole_field"
            duration_policy = "strict"
            "#,
        )
        .unwrap();

        assert_eq!(config.source, "titles.csv");
        assert_eq!(config.initial_years, Some([2000, 2021]));
        assert_eq!(config.options.country_match, CountryMatch::WholeField);
        assert_eq!(config.options.duration_policy, DurationPolicy::Strict);
        assert_eq!(config.options.top_n, 10);
        assert_eq!(config.options.histogram_bins, 30);
    }

    #[test]
    fn rejects_zero_top_n() {
        assert!(DashboardConfig::from_toml("[options]\ntop_n = 0\n").is_err());
    }

    #[test]
    fn unknown_policy_is_an_error() {
        assert!(DashboardConfig::from_toml("[options]\nduration_policy = \"lenient\"\n").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.source, DEFAULT_SOURCE);
    }
}
