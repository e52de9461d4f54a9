use std::collections::HashMap;

use super::filter::FilteredView;
use super::model::Record;

// ---------------------------------------------------------------------------
// Aggregate result shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RegionRate {
    pub region: String,
    pub mean_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Victim counts summed over a view.
///
/// Blank cells contribute zero; `missing` counts how many were blank so the
/// UI can say how much of the total is unknown. Sums saturate at `u64::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VictimTotals {
    pub male: u64,
    pub female: u64,
    pub undetermined: u64,
    pub missing: usize,
}

impl VictimTotals {
    pub fn total(&self) -> u64 {
        self.male
            .saturating_add(self.female)
            .saturating_add(self.undetermined)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionSums {
    pub region: String,
    pub incidents: u64,
    pub rate: f64,
}

/// Best- and worst-ranked regions, both in ranking order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extremes {
    pub top: Vec<RegionRate>,
    pub bottom: Vec<RegionRate>,
}

// ---------------------------------------------------------------------------
// Grouping helper
// ---------------------------------------------------------------------------

/// Fold records into per-key accumulators, keeping keys in the order they
/// first appear.
fn group_by<'a, K, A, F>(view: &FilteredView<'a>, key: K, mut fold: F) -> Vec<(&'a str, A)>
where
    K: Fn(&'a Record) -> &'a str,
    A: Default,
    F: FnMut(&mut A, &'a Record),
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, A)> = Vec::new();

    for rec in view.iter() {
        let k = key(rec);
        let idx = *slots.entry(k).or_insert_with(|| {
            groups.push((k, A::default()));
            groups.len() - 1
        });
        fold(&mut groups[idx].1, rec);
    }
    groups
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Mean adjusted rate per region, highest first.
///
/// Ties keep first-encountered order. Blank rates count as zero, although
/// [`apply_filter`](super::filter::apply_filter) never lets them through.
pub fn mean_rate_by_region(view: &FilteredView<'_>) -> Vec<RegionRate> {
    let groups = group_by(
        view,
        |rec| rec.region.as_str(),
        |acc: &mut (f64, usize), rec| {
            acc.0 += rec.rate.unwrap_or(0.0);
            acc.1 += 1;
        },
    );

    let mut ranking: Vec<RegionRate> = groups
        .into_iter()
        .map(|(region, (sum, n))| RegionRate {
            region: region.to_string(),
            mean_rate: sum / n as f64,
        })
        .collect();
    // `sort_by` is stable, which gives the first-encountered tie-break.
    ranking.sort_by(|a, b| b.mean_rate.total_cmp(&a.mean_rate));
    ranking
}

/// The `k` most frequent categories by record count.
pub fn top_categories_by_frequency(view: &FilteredView<'_>, k: usize) -> Vec<CategoryCount> {
    if k == 0 {
        return Vec::new();
    }

    let mut counts: Vec<CategoryCount> = group_by(
        view,
        |rec| rec.category.as_str(),
        |n: &mut usize, _| *n += 1,
    )
    .into_iter()
    .map(|(category, count)| CategoryCount {
        category: category.to_string(),
        count,
    })
    .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(k);
    counts
}

/// Sum of the three victim columns.
pub fn victim_totals(view: &FilteredView<'_>) -> VictimTotals {
    let mut totals = VictimTotals::default();
    for rec in view.iter() {
        for (cell, sum) in [
            (rec.victims_male, &mut totals.male),
            (rec.victims_female, &mut totals.female),
            (rec.victims_undetermined, &mut totals.undetermined),
        ] {
            match cell {
                Some(n) => *sum = sum.saturating_add(n),
                None => totals.missing += 1,
            }
        }
    }
    totals
}

/// Incident and rate sums per region, in first-encountered order.
pub fn sums_by_region(view: &FilteredView<'_>) -> Vec<RegionSums> {
    group_by(
        view,
        |rec| rec.region.as_str(),
        |acc: &mut (u64, f64), rec| {
            acc.0 = acc.0.saturating_add(rec.incidents.unwrap_or(0));
            acc.1 += rec.rate.unwrap_or(0.0);
        },
    )
    .into_iter()
    .map(|(region, (incidents, rate))| RegionSums {
        region: region.to_string(),
        incidents,
        rate,
    })
    .collect()
}

/// First `k` and last `k` entries of a descending ranking.
///
/// With fewer than `2k` regions the two lists overlap.
pub fn extreme_regions(ranking: &[RegionRate], k: usize) -> Extremes {
    let k = k.min(ranking.len());
    Extremes {
        top: ranking[..k].to_vec(),
        bottom: ranking[ranking.len() - k..].to_vec(),
    }
}
