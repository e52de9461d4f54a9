use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Slider, Ui};

use crate::state::{AppState, Catalogue};
use crate::view::Section;

// ---------------------------------------------------------------------------
// Left side panel – navigation and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: section navigation followed by the filters.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Navigation");
    ui.separator();

    let mut section = state.section;
    for candidate in Section::ALL {
        ui.radio_value(&mut section, candidate, candidate.label());
    }
    if section != state.section {
        state.set_section(section);
    }

    ui.add_space(8.0);
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            catalogue_filter(ui, state, Catalogue::Regions, "Provinces", dataset.regions());
            catalogue_filter(
                ui,
                state,
                Catalogue::Categories,
                "Crime types",
                dataset.categories(),
            );

            let Some(draft) = state.draft.as_mut() else {
                return;
            };

            ui.separator();
            ui.strong("Years");
            if let Some((lo, hi)) = dataset.year_bounds() {
                ui.add(Slider::new(&mut draft.year_min, lo..=hi).text("from"));
                ui.add(Slider::new(&mut draft.year_max, lo..=hi).text("to"));
            }

            ui.separator();
            ui.strong("Adjusted rate (per 100,000)");
            let max_rate = dataset.max_rate().unwrap_or(0.0);
            ui.horizontal(|ui: &mut Ui| {
                ui.label("min");
                ui.add(
                    DragValue::new(&mut draft.rate_min)
                        .range(0.0..=max_rate)
                        .speed(0.5),
                );
                ui.label("max");
                ui.add(
                    DragValue::new(&mut draft.rate_max)
                        .range(0.0..=max_rate)
                        .speed(0.5),
                );
            });

            if draft.year_min > draft.year_max || draft.rate_min > draft.rate_max {
                ui.label(RichText::new("Range minimum is above its maximum").color(Color32::RED));
            }
        });

    // Recompute the view after any widget changes.
    state.refresh();
}

/// Collapsible checklist for one multi-select filter.
fn catalogue_filter(
    ui: &mut Ui,
    state: &mut AppState,
    catalogue: Catalogue,
    title: &str,
    values: &[String],
) {
    let selected = match (&state.draft, catalogue) {
        (Some(d), Catalogue::Regions) => d.regions.clone(),
        (Some(d), Catalogue::Categories) => d.categories.clone(),
        (None, _) => return,
    };

    let header_text = format!("{title}  ({}/{})", selected.len(), values.len());
    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(catalogue);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(catalogue);
                }
            });

            for value in values {
                let mut text = RichText::new(value);
                if catalogue == Catalogue::Regions {
                    text = text.color(state.colors.color_for(value));
                }

                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle(catalogue, value);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(source) = &state.source {
            let matched = match &state.view {
                Some(Ok(vm)) => vm.matched.to_string(),
                _ => "–".to_string(),
            };
            ui.label(format!(
                "{}: {} records loaded, {} match",
                source
                    .path()
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                source.dataset().len(),
                matched
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open crime statistics")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
