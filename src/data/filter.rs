use std::collections::BTreeSet;

use thiserror::Error;

use super::model::{CrimeDataset, Record};

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("year range is inverted: {min} > {max}")]
    InvertedYears { min: i32, max: i32 },
    #[error("rate range is inverted: {min} > {max}")]
    InvertedRates { min: f64, max: f64 },
    #[error("rate bounds must be finite numbers")]
    NonFiniteRate,
}

// ---------------------------------------------------------------------------
// Bounds – an inclusive range
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` range. Only built through [`FilterSpec::new`], so
/// `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

// ---------------------------------------------------------------------------
// FilterSpec – the user's complete selection
// ---------------------------------------------------------------------------

/// Validated filter predicates. All four must hold for a record to pass.
///
/// An empty region or category set matches nothing. Identifiers absent from
/// the dataset are accepted and simply never match.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    regions: BTreeSet<String>,
    years: Bounds<i32>,
    categories: BTreeSet<String>,
    rates: Bounds<f64>,
}

impl FilterSpec {
    /// Build a spec, rejecting inverted or non-finite ranges.
    pub fn new(
        regions: BTreeSet<String>,
        years: (i32, i32),
        categories: BTreeSet<String>,
        rates: (f64, f64),
    ) -> Result<Self, FilterError> {
        let (year_min, year_max) = years;
        if year_min > year_max {
            return Err(FilterError::InvertedYears {
                min: year_min,
                max: year_max,
            });
        }
        let (rate_min, rate_max) = rates;
        if !rate_min.is_finite() || !rate_max.is_finite() {
            return Err(FilterError::NonFiniteRate);
        }
        if rate_min > rate_max {
            return Err(FilterError::InvertedRates {
                min: rate_min,
                max: rate_max,
            });
        }

        Ok(FilterSpec {
            regions,
            years: Bounds {
                min: year_min,
                max: year_max,
            },
            categories,
            rates: Bounds {
                min: rate_min,
                max: rate_max,
            },
        })
    }

    pub fn regions(&self) -> &BTreeSet<String> {
        &self.regions
    }

    pub fn years(&self) -> Bounds<i32> {
        self.years
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn rates(&self) -> Bounds<f64> {
        self.rates
    }

    /// Whether a record passes every predicate.
    ///
    /// A record with a blank rate never satisfies the rate range.
    pub fn matches(&self, record: &Record) -> bool {
        self.regions.contains(&record.region)
            && self.years.contains(record.year)
            && self.categories.contains(&record.category)
            && record.rate.is_some_and(|rate| self.rates.contains(rate))
    }
}

// ---------------------------------------------------------------------------
// FilteredView – records passing a FilterSpec
// ---------------------------------------------------------------------------

/// Borrowed subset of a dataset, in the dataset's original order.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply another spec on top of this view.
    pub fn refine(&self, spec: &FilterSpec) -> FilteredView<'a> {
        FilteredView {
            records: self.iter().filter(|rec| spec.matches(rec)).collect(),
        }
    }
}

/// Return the records of `dataset` that pass all predicates of `spec`.
pub fn apply_filter<'a>(dataset: &'a CrimeDataset, spec: &FilterSpec) -> FilteredView<'a> {
    FilteredView {
        records: dataset
            .records()
            .iter()
            .filter(|rec| spec.matches(rec))
            .collect(),
    }
}
