use eframe::egui::{RichText, ScrollArea, Ui};

use crate::view::{DatasetSummary, Section};

/// Static text panels for the introduction and conclusion.
pub fn show(ui: &mut Ui, section: Section, summary: &DatasetSummary) {
    ScrollArea::vertical().show(ui, |ui: &mut Ui| match section {
        Section::Conclusion => conclusion(ui),
        _ => introduction(ui, summary),
    });
}

fn introduction(ui: &mut Ui, summary: &DatasetSummary) {
    ui.label(
        "This dashboard explores crime statistics reported by the National Criminal \
         Information System (SNIC) for each Argentine province.",
    );
    ui.add_space(8.0);

    let span = match summary.years {
        Some((lo, hi)) if lo == hi => lo.to_string(),
        Some((lo, hi)) => format!("{lo}–{hi}"),
        None => "–".to_string(),
    };
    ui.label(RichText::new("Dataset").strong());
    ui.label(format!("• {} records", summary.records));
    ui.label(format!("• {} provinces", summary.regions));
    ui.label(format!("• {} crime types", summary.categories));
    ui.label(format!("• years {span}"));
    ui.add_space(8.0);

    ui.label(RichText::new("How to use it").strong());
    ui.label("• Pick provinces, crime types, a year range and a rate range on the left.");
    ui.label("• Choose a section to see rankings, frequencies, victims or relationships.");
    ui.label(
        "• Adjusted rates are incidents per 100,000 inhabitants, which makes provinces \
         of different size comparable.",
    );
}

fn conclusion(ui: &mut Ui) {
    ui.label(RichText::new("Summary").strong());
    ui.label(
        "• Mean adjusted rates differ widely between provinces, so absolute counts alone \
         are a poor basis for comparison.",
    );
    ui.label("• A few crime types account for most recorded incidents.");
    ui.label(
        "• Many victim records have no gender recorded; better registration would make \
         victim analysis more precise.",
    );
    ui.add_space(8.0);
    ui.label(
        RichText::new(
            "Figures depend on the loaded file. Reload (File → Reload) after updating it.",
        )
        .italics(),
    );
}
