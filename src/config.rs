use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

// ---------------------------------------------------------------------------
// Configuration file
// ---------------------------------------------------------------------------

/// Dashboard settings read from `dashboard.toml`. Every key is optional.
///
/// ```toml
/// data = "snic-provincias.csv"
///
/// [defaults]
/// regions = 3
/// categories = 5
/// years = [2000, 2023]
///
/// [views]
/// top_categories = 10
/// extremes = 3
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Dataset opened at startup.
    pub data: Option<PathBuf>,
    pub defaults: FilterDefaults,
    pub views: Settings,
}

/// Initial filter selection applied when a dataset is loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterDefaults {
    /// How many provinces (in file order) start selected.
    pub regions: usize,
    /// How many crime categories (in file order) start selected.
    pub categories: usize,
    /// Initial year range, clamped to the dataset.
    pub years: (i32, i32),
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            regions: 3,
            categories: 5,
            years: (2000, 2023),
        }
    }
}

/// Sizes of the ranked views.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub top_categories: usize,
    pub extremes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            top_categories: 10,
            extremes: 3,
        }
    }
}

impl DashboardConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parsing dashboard configuration")
    }

    /// Load an explicit config file, or `dashboard.toml` if it exists, or
    /// fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Self::from_toml(&text).with_context(|| format!("in {}", path.display()))?;
        log::info!("Using configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = DashboardConfig::from_toml("").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.defaults.years, (2000, 2023));
        assert_eq!(cfg.views.top_categories, 10);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let cfg = DashboardConfig::from_toml(
            r#"
            data = "snic-provincias.csv"

            [views]
            extremes = 5
            "#,
        )
        .unwrap();

        assert_eq!(cfg.data, Some(PathBuf::from("snic-provincias.csv")));
        assert_eq!(cfg.views.extremes, 5);
        assert_eq!(cfg.views.top_categories, 10);
        assert_eq!(cfg.defaults.regions, 3);
    }

    #[test]
    fn year_pair_is_read_from_array() {
        let cfg = DashboardConfig::from_toml("[defaults]\nyears = [2010, 2015]\n").unwrap();
        assert_eq!(cfg.defaults.years, (2010, 2015));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(DashboardConfig::from_toml("[views]\ntop = 3\n").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(DashboardConfig::load(Some(Path::new("/no/such/dashboard.toml"))).is_err());
    }
}
