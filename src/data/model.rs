use std::collections::HashSet;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column names of the SNIC provincial export
// ---------------------------------------------------------------------------

pub const COL_REGION: &str = "provincia_nombre";
pub const COL_YEAR: &str = "anio";
pub const COL_CATEGORY: &str = "codigo_delito_snic_nombre";
pub const COL_INCIDENTS: &str = "cantidad_hechos";
pub const COL_RATE: &str = "tasa_hechos";
pub const COL_VICTIMS_MALE: &str = "cantidad_victimas_masc";
pub const COL_VICTIMS_FEMALE: &str = "cantidad_victimas_fem";
pub const COL_VICTIMS_UNDETERMINED: &str = "cantidad_victimas_sd";

/// Every column the loader requires, in display order.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_REGION,
    COL_YEAR,
    COL_CATEGORY,
    COL_INCIDENTS,
    COL_RATE,
    COL_VICTIMS_MALE,
    COL_VICTIMS_FEMALE,
    COL_VICTIMS_UNDETERMINED,
];

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// A single (province, year, crime category) row.
///
/// Numeric cells are `None` when the source left them blank; the SNIC export
/// does this routinely for victim counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "provincia_nombre")]
    pub region: String,
    #[serde(rename = "anio")]
    pub year: i32,
    #[serde(rename = "codigo_delito_snic_nombre")]
    pub category: String,
    #[serde(rename = "cantidad_hechos")]
    pub incidents: Option<u64>,
    /// Incidents per 100,000 inhabitants.
    #[serde(rename = "tasa_hechos")]
    pub rate: Option<f64>,
    #[serde(rename = "cantidad_victimas_masc")]
    pub victims_male: Option<u64>,
    #[serde(rename = "cantidad_victimas_fem")]
    pub victims_female: Option<u64>,
    #[serde(rename = "cantidad_victimas_sd")]
    pub victims_undetermined: Option<u64>,
}

// ---------------------------------------------------------------------------
// CrimeDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed catalogues for the filter widgets.
///
/// Read-only after construction; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CrimeDataset {
    records: Vec<Record>,
    /// Distinct regions in first-encountered order.
    regions: Vec<String>,
    /// Distinct crime categories in first-encountered order.
    categories: Vec<String>,
    year_bounds: Option<(i32, i32)>,
    max_rate: Option<f64>,
}

impl CrimeDataset {
    /// Build catalogues from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut seen_regions: HashSet<&str> = HashSet::new();
        let mut seen_categories: HashSet<&str> = HashSet::new();
        let mut regions = Vec::new();
        let mut categories = Vec::new();
        let mut year_bounds: Option<(i32, i32)> = None;
        let mut max_rate: Option<f64> = None;

        for rec in &records {
            if seen_regions.insert(rec.region.as_str()) {
                regions.push(rec.region.clone());
            }
            if seen_categories.insert(rec.category.as_str()) {
                categories.push(rec.category.clone());
            }
            year_bounds = Some(match year_bounds {
                Some((lo, hi)) => (lo.min(rec.year), hi.max(rec.year)),
                None => (rec.year, rec.year),
            });
            if let Some(rate) = rec.rate {
                max_rate = Some(max_rate.map_or(rate, |m| m.max(rate)));
            }
        }

        CrimeDataset {
            records,
            regions,
            categories,
            year_bounds,
            max_rate,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Smallest and largest year present, `None` for an empty dataset.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.year_bounds
    }

    /// Largest adjusted rate present, ignoring blank cells.
    pub fn max_rate(&self) -> Option<f64> {
        self.max_rate
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn record(
    region: &str,
    year: i32,
    category: &str,
    incidents: u64,
    rate: f64,
    victims: (u64, u64, u64),
) -> Record {
    Record {
        region: region.to_string(),
        year,
        category: category.to_string(),
        incidents: Some(incidents),
        rate: Some(rate),
        victims_male: Some(victims.0),
        victims_female: Some(victims.1),
        victims_undetermined: Some(victims.2),
    }
}
