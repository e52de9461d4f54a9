use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use crate::color::RegionColors;
use crate::config::{DashboardConfig, FilterDefaults};
use crate::data::filter::{FilterError, FilterSpec};
use crate::data::model::CrimeDataset;
use crate::data::source::DatasetSource;
use crate::view::{render, Section, ViewModel};

// ---------------------------------------------------------------------------
// Filter widget state
// ---------------------------------------------------------------------------

/// Raw widget values. Unlike [`FilterSpec`] this may hold inverted ranges
/// while the user is still editing.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDraft {
    pub regions: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub year_min: i32,
    pub year_max: i32,
    pub rate_min: f64,
    pub rate_max: f64,
}

impl FilterDraft {
    /// Initial selection for a freshly loaded dataset.
    pub fn defaults_for(dataset: &CrimeDataset, defaults: &FilterDefaults) -> Self {
        let (lo, hi) = dataset.year_bounds().unwrap_or(defaults.years);
        let (mut year_min, mut year_max) = (defaults.years.0.max(lo), defaults.years.1.min(hi));
        if year_min > year_max {
            (year_min, year_max) = (lo, hi);
        }

        FilterDraft {
            regions: dataset.regions().iter().take(defaults.regions).cloned().collect(),
            categories: dataset
                .categories()
                .iter()
                .take(defaults.categories)
                .cloned()
                .collect(),
            year_min,
            year_max,
            rate_min: 0.0,
            rate_max: dataset.max_rate().unwrap_or(0.0),
        }
    }

    pub fn to_spec(&self) -> Result<FilterSpec, FilterError> {
        FilterSpec::new(
            self.regions.clone(),
            (self.year_min, self.year_max),
            self.categories.clone(),
            (self.rate_min, self.rate_max),
        )
    }
}

/// Which multi-select list a widget edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalogue {
    Regions,
    Categories,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Backing file and its loaded dataset (None until a file is opened).
    pub source: Option<DatasetSource>,

    /// Current widget values.
    pub draft: Option<FilterDraft>,

    /// Navigation section shown in the central panel.
    pub section: Section,

    /// Result of the last render; `Err` while the filter ranges are invalid.
    pub view: Option<Result<ViewModel, FilterError>>,

    pub colors: RegionColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Inputs of the last render, to skip recomputation on idle frames.
    rendered: Option<(FilterDraft, Section)>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            source: None,
            draft: None,
            section: Section::default(),
            view: None,
            colors: RegionColors::default(),
            status_message: None,
            rendered: None,
        }
    }

    pub fn dataset(&self) -> Option<Arc<CrimeDataset>> {
        self.source.as_ref().map(DatasetSource::dataset)
    }

    /// Open a dataset file. Errors are logged and shown in the status line;
    /// the previous dataset, if any, stays loaded.
    pub fn open(&mut self, path: &Path) {
        match DatasetSource::open(path) {
            Ok(source) => self.set_source(source),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and reset the filters to their defaults.
    pub fn set_source(&mut self, source: DatasetSource) {
        let dataset = source.dataset();
        self.draft = Some(FilterDraft::defaults_for(&dataset, &self.config.defaults));
        self.colors = RegionColors::new(dataset.regions());
        self.source = Some(source);
        self.status_message = None;
        self.rendered = None;
        self.refresh();
    }

    /// Re-read the current file, keeping the user's selection.
    ///
    /// An upper rate bound left at the old maximum follows the new maximum;
    /// any other bound is clamped to it.
    pub fn reload(&mut self) {
        let Some(source) = self.source.as_mut() else {
            return;
        };
        let old_max = source.dataset().max_rate().unwrap_or(0.0);
        match source.reload() {
            Ok(()) => {
                let dataset = source.dataset();
                let new_max = dataset.max_rate().unwrap_or(0.0);
                if let Some(draft) = self.draft.as_mut() {
                    draft.rate_max = if draft.rate_max >= old_max {
                        new_max
                    } else {
                        draft.rate_max.min(new_max)
                    };
                }
                self.colors = RegionColors::new(dataset.regions());
                self.status_message = None;
                self.rendered = None;
                self.refresh();
            }
            Err(e) => {
                log::error!("Failed to reload file: {e:#}");
                self.status_message = Some(format!("Reload failed: {e:#}"));
            }
        }
    }

    pub fn set_section(&mut self, section: Section) {
        self.section = section;
        self.refresh();
    }

    /// Recompute the view if the filters or section changed since last time.
    pub fn refresh(&mut self) {
        let (Some(dataset), Some(draft)) = (self.dataset(), self.draft.as_ref()) else {
            return;
        };
        let key = (draft.clone(), self.section);
        if self.rendered.as_ref() == Some(&key) {
            return;
        }

        self.view = Some(
            draft
                .to_spec()
                .map(|spec| render(&dataset, &spec, self.section, &self.config.views)),
        );
        self.rendered = Some(key);
    }

    /// Toggle a single value in a multi-select list.
    pub fn toggle(&mut self, catalogue: Catalogue, value: &str) {
        if let Some(selected) = self.selection_mut(catalogue) {
            if !selected.remove(value) {
                selected.insert(value.to_string());
            }
        }
        self.refresh();
    }

    /// Select every value of a list.
    pub fn select_all(&mut self, catalogue: Catalogue) {
        let Some(dataset) = self.dataset() else {
            return;
        };
        let all = match catalogue {
            Catalogue::Regions => dataset.regions(),
            Catalogue::Categories => dataset.categories(),
        };
        if let Some(selected) = self.selection_mut(catalogue) {
            *selected = all.iter().cloned().collect();
        }
        self.refresh();
    }

    /// Deselect every value of a list.
    pub fn select_none(&mut self, catalogue: Catalogue) {
        if let Some(selected) = self.selection_mut(catalogue) {
            selected.clear();
        }
        self.refresh();
    }

    fn selection_mut(&mut self, catalogue: Catalogue) -> Option<&mut BTreeSet<String>> {
        let draft = self.draft.as_mut()?;
        Some(match catalogue {
            Catalogue::Regions => &mut draft.regions,
            Catalogue::Categories => &mut draft.categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::data::model::record;
    use crate::view::SectionView;

    const CSV: &str = "provincia_nombre,anio,codigo_delito_snic_nombre,cantidad_hechos,tasa_hechos,cantidad_victimas_masc,cantidad_victimas_fem,cantidad_victimas_sd\n\
        Salta,2019,Robos,10,12.0,1,0,0\n\
        Chaco,2020,Hurtos,4,3.5,,,\n\
        Jujuy,2021,Robos,6,8.0,2,1,0\n\
        Tucumán,2022,Amenazas,2,1.0,0,1,0\n";

    fn loaded_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snic.csv");
        fs::write(&path, CSV).unwrap();

        let mut state = AppState::new(DashboardConfig::default());
        state.open(&path);
        (dir, state)
    }

    #[test]
    fn defaults_take_leading_values_and_clamp_years() {
        let ds = CrimeDataset::from_records(vec![
            record("Salta", 2015, "Robos", 1, 4.0, (0, 0, 0)),
            record("Chaco", 2024, "Hurtos", 1, 9.0, (0, 0, 0)),
        ]);
        let defaults = FilterDefaults {
            regions: 1,
            categories: 5,
            years: (2000, 2023),
        };

        let draft = FilterDraft::defaults_for(&ds, &defaults);

        assert_eq!(draft.regions, BTreeSet::from(["Salta".to_string()]));
        assert_eq!(draft.categories.len(), 2);
        assert_eq!((draft.year_min, draft.year_max), (2015, 2023));
        assert_eq!((draft.rate_min, draft.rate_max), (0.0, 9.0));
    }

    #[test]
    fn defaults_outside_dataset_fall_back_to_full_span() {
        let ds = CrimeDataset::from_records(vec![record("Salta", 1990, "Robos", 1, 4.0, (0, 0, 0))]);

        let draft = FilterDraft::defaults_for(&ds, &FilterDefaults::default());

        assert_eq!((draft.year_min, draft.year_max), (1990, 1990));
    }

    #[test]
    fn opening_a_file_renders_the_default_section() {
        let (_dir, state) = loaded_state();

        assert!(state.status_message.is_none());
        let Some(Ok(vm)) = &state.view else {
            panic!("expected a rendered view");
        };
        assert_eq!(vm.section, Section::Introduction);
        // First three provinces, years 2000-2023: Salta, Chaco and Jujuy rows.
        assert_eq!(vm.matched, 3);
    }

    #[test]
    fn toggling_a_province_recomputes_the_view() {
        let (_dir, mut state) = loaded_state();
        state.set_section(Section::Geography);

        state.toggle(Catalogue::Regions, "Salta");

        let Some(Ok(vm)) = &state.view else {
            panic!("expected a rendered view");
        };
        let SectionView::MeanRates(ranking) = &vm.content else {
            panic!("expected mean rates");
        };
        let regions: Vec<_> = ranking.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["Jujuy", "Chaco"]);
    }

    #[test]
    fn select_none_empties_the_view() {
        let (_dir, mut state) = loaded_state();
        state.set_section(Section::CrimeTypes);

        state.select_none(Catalogue::Categories);

        let Some(Ok(vm)) = &state.view else {
            panic!("expected a rendered view");
        };
        assert!(vm.is_empty());
    }

    #[test]
    fn inverted_years_surface_as_an_error() {
        let (_dir, mut state) = loaded_state();
        if let Some(draft) = state.draft.as_mut() {
            draft.year_min = 2022;
            draft.year_max = 2019;
        }

        state.refresh();

        assert!(matches!(
            state.view,
            Some(Err(FilterError::InvertedYears { .. }))
        ));
    }

    #[test]
    fn reload_extends_rate_bound_left_at_the_maximum() {
        let (dir, mut state) = loaded_state();
        let path = dir.path().join("snic.csv");
        fs::write(&path, format!("{CSV}Salta,2021,Robos,5,50.0,1,0,0\n")).unwrap();

        state.reload();

        assert_eq!(state.draft.as_ref().map(|d| d.rate_max), Some(50.0));
        let Some(Ok(vm)) = &state.view else {
            panic!("expected a rendered view");
        };
        assert_eq!(vm.matched, 4);
    }

    #[test]
    fn reload_keeps_a_narrowed_rate_bound() {
        let (dir, mut state) = loaded_state();
        if let Some(draft) = state.draft.as_mut() {
            draft.rate_max = 9.0;
        }
        let path = dir.path().join("snic.csv");
        fs::write(&path, format!("{CSV}Salta,2021,Robos,5,50.0,1,0,0\n")).unwrap();

        state.reload();

        assert_eq!(state.draft.as_ref().map(|d| d.rate_max), Some(9.0));
    }

    #[test]
    fn failed_open_keeps_previous_dataset() {
        let (_dir, mut state) = loaded_state();

        state.open(Path::new("/no/such/file.csv"));

        assert!(state.status_message.is_some());
        assert_eq!(state.dataset().map(|d| d.len()), Some(4));
    }
}
