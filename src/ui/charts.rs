use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::color::RegionColors;
use crate::data::aggregate::{CategoryCount, Extremes, RegionRate, RegionSums, VictimTotals};
use crate::state::AppState;
use crate::ui::narrative;
use crate::view::SectionView;

const BAR_COLOR: Color32 = Color32::from_rgb(75, 0, 130);

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the current section in the central panel.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    ui.heading(state.section.label());
    ui.separator();

    let vm = match &state.view {
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a dataset to begin  (File → Open…)");
            });
            return;
        }
        Some(Err(e)) => {
            ui.label(RichText::new(format!("Invalid filter: {e}")).color(Color32::RED));
            return;
        }
        Some(Ok(vm)) => vm,
    };

    if vm.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No records match the current filters.");
        });
        return;
    }

    match &vm.content {
        SectionView::Narrative(summary) => narrative::show(ui, vm.section, summary),
        SectionView::MeanRates(ranking) => mean_rates(ui, ranking, &state.colors),
        SectionView::Categories(counts) => categories(ui, counts),
        SectionView::Victims(totals) => victims(ui, totals),
        SectionView::Relationships(sums) => relationships(ui, sums, &state.colors),
        SectionView::Extremes(extremes) => highlights(ui, extremes, &state.colors),
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn mean_rates(ui: &mut Ui, ranking: &[RegionRate], colors: &RegionColors) {
    ui.label("Mean adjusted rate per province for the selected crime types and years.");
    let height = ui.available_height() * 0.6;
    ranking_chart(ui, "mean_rates", ranking, colors, height);
    table(
        ui,
        "mean_rates_table",
        &["Province", "Mean rate"],
        ranking
            .iter()
            .map(|r| vec![r.region.clone(), format!("{:.2}", r.mean_rate)])
            .collect(),
    );
}

fn categories(ui: &mut Ui, counts: &[CategoryCount]) {
    ui.label("Most frequent crime types among the filtered records.");
    let names: Vec<String> = counts.iter().map(|c| c.category.clone()).collect();
    let bars = counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new(i as f64, c.count as f64)
                .name(&c.category)
                .fill(BAR_COLOR)
        })
        .collect();

    Plot::new("categories")
        .height(ui.available_height() * 0.6)
        .x_axis_formatter(move |mark, _range| label_at(&names, mark.value))
        .y_axis_label("Records")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars).width(0.7)));

    table(
        ui,
        "categories_table",
        &["Crime type", "Records"],
        counts
            .iter()
            .map(|c| vec![c.category.clone(), c.count.to_string()])
            .collect(),
    );
}

fn victims(ui: &mut Ui, totals: &VictimTotals) {
    ui.label(format!("{} victims in the filtered records.", totals.total()));
    if totals.missing > 0 {
        ui.label(
            RichText::new(format!(
                "{} blank victim cells were counted as zero.",
                totals.missing
            ))
            .italics(),
        );
    }

    let groups = [
        ("Male", totals.male, Color32::from_rgb(70, 130, 180)),
        ("Female", totals.female, Color32::from_rgb(219, 112, 147)),
        ("Undetermined", totals.undetermined, Color32::GRAY),
    ];
    let names: Vec<String> = groups.iter().map(|(n, _, _)| n.to_string()).collect();
    let bars = groups
        .iter()
        .enumerate()
        .map(|(i, (name, count, color))| Bar::new(i as f64, *count as f64).name(name).fill(*color))
        .collect();

    Plot::new("victims")
        .height(ui.available_height() * 0.8)
        .x_axis_formatter(move |mark, _range| label_at(&names, mark.value))
        .y_axis_label("Victims")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars).width(0.6)));
}

fn relationships(ui: &mut Ui, sums: &[RegionSums], colors: &RegionColors) {
    ui.label("Total incidents against summed adjusted rate, one point per province.");

    Plot::new("relationships")
        .height(ui.available_height() * 0.6)
        .legend(Legend::default())
        .x_axis_label("Incidents")
        .y_axis_label("Adjusted rate (sum)")
        .show(ui, |plot_ui| {
            for s in sums {
                let points = Points::new(PlotPoints::new(vec![[s.incidents as f64, s.rate]]))
                    .name(&s.region)
                    .color(colors.color_for(&s.region))
                    .radius(5.0);
                plot_ui.points(points);
            }
        });

    table(
        ui,
        "relationships_table",
        &["Province", "Incidents", "Rate (sum)"],
        sums.iter()
            .map(|s| {
                vec![
                    s.region.clone(),
                    s.incidents.to_string(),
                    format!("{:.2}", s.rate),
                ]
            })
            .collect(),
    );
}

fn highlights(ui: &mut Ui, extremes: &Extremes, colors: &RegionColors) {
    ui.label("Provinces at both ends of the mean adjusted rate ranking.");
    let height = ui.available_height() * 0.8;
    ui.columns(2, |cols| {
        cols[0].strong("Highest rates");
        ranking_chart(&mut cols[0], "top_rates", &extremes.top, colors, height);
        cols[1].strong("Lowest rates");
        ranking_chart(&mut cols[1], "bottom_rates", &extremes.bottom, colors, height);
    });
}

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

/// Horizontal bars, first entry on top.
fn ranking_chart(
    ui: &mut Ui,
    id: &str,
    ranking: &[RegionRate],
    colors: &RegionColors,
    height: f32,
) {
    let n = ranking.len();
    // Bars are laid out bottom-up, so index the names the same way.
    let names: Vec<String> = ranking.iter().rev().map(|r| r.region.clone()).collect();
    let bars = ranking
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new((n - 1 - i) as f64, r.mean_rate)
                .name(&r.region)
                .fill(colors.color_for(&r.region))
        })
        .collect();

    Plot::new(id)
        .height(height)
        .y_axis_formatter(move |mark, _range| label_at(&names, mark.value))
        .x_axis_label("Mean adjusted rate")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.7).horizontal())
        });
}

/// Axis label for an integral grid position, empty elsewhere.
fn label_at(names: &[String], value: f64) -> String {
    if value < 0.0 || value.fract() != 0.0 {
        return String::new();
    }
    names.get(value as usize).cloned().unwrap_or_default()
}

fn table(ui: &mut Ui, id: &str, headers: &[&str], rows: Vec<Vec<String>>) {
    ui.push_id(id, |ui: &mut Ui| {
        let mut builder = TableBuilder::new(ui).striped(true);
        for i in 0..headers.len() {
            builder = if i + 1 == headers.len() {
                builder.column(Column::remainder())
            } else {
                builder.column(Column::auto().at_least(120.0))
            };
        }
        builder
            .header(20.0, |mut header| {
                for h in headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*h);
                    });
                }
            })
            .body(|mut body| {
                for row in &rows {
                    body.row(18.0, |mut table_row| {
                        for cell in row {
                            table_row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}
