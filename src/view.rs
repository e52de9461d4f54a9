use crate::config::Settings;
use crate::data::aggregate::{
    extreme_regions, mean_rate_by_region, sums_by_region, top_categories_by_frequency,
    victim_totals, CategoryCount, Extremes, RegionRate, RegionSums, VictimTotals,
};
use crate::data::filter::{apply_filter, FilterSpec};
use crate::data::model::CrimeDataset;

// ---------------------------------------------------------------------------
// Navigation sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Section {
    #[default]
    Introduction,
    Geography,
    CrimeTypes,
    Victims,
    Relationships,
    Highlights,
    Conclusion,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Introduction,
        Section::Geography,
        Section::CrimeTypes,
        Section::Victims,
        Section::Relationships,
        Section::Highlights,
        Section::Conclusion,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Introduction => "Introduction",
            Section::Geography => "Geographic distribution",
            Section::CrimeTypes => "Crime types",
            Section::Victims => "Victims by gender",
            Section::Relationships => "Incidents vs. rate",
            Section::Highlights => "Highlighted provinces",
            Section::Conclusion => "Conclusion",
        }
    }

    /// Whether the section only shows narrative text.
    pub fn is_narrative(self) -> bool {
        matches!(self, Section::Introduction | Section::Conclusion)
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Whole-dataset figures quoted by the narrative sections.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub records: usize,
    pub regions: usize,
    pub categories: usize,
    pub years: Option<(i32, i32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionView {
    Narrative(DatasetSummary),
    MeanRates(Vec<RegionRate>),
    Categories(Vec<CategoryCount>),
    Victims(VictimTotals),
    Relationships(Vec<RegionSums>),
    Extremes(Extremes),
}

/// Everything the central panel needs to draw one section.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub section: Section,
    /// Records passing the current filters.
    pub matched: usize,
    pub content: SectionView,
}

impl ViewModel {
    /// True when a data section has nothing to plot.
    pub fn is_empty(&self) -> bool {
        !self.section.is_narrative() && self.matched == 0
    }
}

/// Compute the view for `section` under `spec`. Pure: same inputs, same output.
pub fn render(
    dataset: &CrimeDataset,
    spec: &FilterSpec,
    section: Section,
    settings: &Settings,
) -> ViewModel {
    let view = apply_filter(dataset, spec);

    let content = match section {
        Section::Introduction | Section::Conclusion => SectionView::Narrative(DatasetSummary {
            records: dataset.len(),
            regions: dataset.regions().len(),
            categories: dataset.categories().len(),
            years: dataset.year_bounds(),
        }),
        Section::Geography => SectionView::MeanRates(mean_rate_by_region(&view)),
        Section::CrimeTypes => {
            SectionView::Categories(top_categories_by_frequency(&view, settings.top_categories))
        }
        Section::Victims => SectionView::Victims(victim_totals(&view)),
        Section::Relationships => SectionView::Relationships(sums_by_region(&view)),
        Section::Highlights => {
            let ranking = mean_rate_by_region(&view);
            SectionView::Extremes(extreme_regions(&ranking, settings.extremes))
        }
    };

    log::debug!(
        "Rendered {:?}: {} of {} records match",
        section,
        view.len(),
        dataset.len()
    );

    ViewModel {
        section,
        matched: view.len(),
        content,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::model::record;

    fn dataset() -> CrimeDataset {
        CrimeDataset::from_records(vec![
            record("Salta", 2019, "Robos", 100, 50.0, (5, 3, 0)),
            record("Chaco", 2019, "Robos", 40, 20.0, (1, 1, 1)),
            record("Jujuy", 2020, "Hurtos", 60, 35.0, (2, 0, 0)),
            record("Salta", 2020, "Hurtos", 80, 30.0, (4, 4, 0)),
        ])
    }

    fn spec(regions: &[&str], categories: &[&str]) -> FilterSpec {
        FilterSpec::new(
            regions.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            (2019, 2020),
            categories.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            (0.0, 100.0),
        )
        .unwrap()
    }

    #[test]
    fn geography_ranks_regions_by_mean_rate() {
        let ds = dataset();
        let vm = render(
            &ds,
            &spec(&["Salta", "Chaco", "Jujuy"], &["Robos", "Hurtos"]),
            Section::Geography,
            &Settings::default(),
        );

        assert_eq!(vm.matched, 4);
        let SectionView::MeanRates(ranking) = vm.content else {
            panic!("expected mean rates");
        };
        let regions: Vec<_> = ranking.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["Salta", "Jujuy", "Chaco"]);
    }

    #[test]
    fn highlights_use_configured_extremes() {
        let ds = dataset();
        let settings = Settings {
            top_categories: 10,
            extremes: 1,
        };
        let vm = render(
            &ds,
            &spec(&["Salta", "Chaco", "Jujuy"], &["Robos", "Hurtos"]),
            Section::Highlights,
            &settings,
        );

        let SectionView::Extremes(ext) = vm.content else {
            panic!("expected extremes");
        };
        assert_eq!(ext.top[0].region, "Salta");
        assert_eq!(ext.bottom[0].region, "Chaco");
    }

    #[test]
    fn no_match_yields_empty_state_for_data_sections() {
        let ds = dataset();
        let nothing = spec(&[], &["Robos"]);

        for section in Section::ALL {
            let vm = render(&ds, &nothing, section, &Settings::default());
            assert_eq!(vm.matched, 0);
            assert_eq!(vm.is_empty(), !section.is_narrative(), "{section:?}");
        }
    }

    #[test]
    fn victims_section_sums_filtered_rows() {
        let ds = dataset();
        let vm = render(
            &ds,
            &spec(&["Salta"], &["Robos", "Hurtos"]),
            Section::Victims,
            &Settings::default(),
        );

        assert_eq!(
            vm.content,
            SectionView::Victims(VictimTotals {
                male: 9,
                female: 7,
                undetermined: 0,
                missing: 0,
            })
        );
    }

    #[test]
    fn narrative_sections_summarise_the_whole_dataset() {
        let ds = dataset();
        let vm = render(&ds, &spec(&[], &[]), Section::Introduction, &Settings::default());

        assert_eq!(
            vm.content,
            SectionView::Narrative(DatasetSummary {
                records: 4,
                regions: 3,
                categories: 2,
                years: Some((2019, 2020)),
            })
        );
        assert!(!vm.is_empty());
    }
}
