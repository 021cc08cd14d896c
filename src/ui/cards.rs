use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::data::model::{FieldValue, ProjectRecord};
use crate::data::page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel – paginated project cards
// ---------------------------------------------------------------------------

/// Labelled card lines, in display order.
const CARD_FIELDS: &[(&str, &str)] = &[
    ("Country", "host_country"),
    ("Project Type", "project_type"),
    ("Sector", "sector"),
    ("Investment", "investment_amount"),
    ("Stage", "project_stage"),
];

/// Render the card list for the current page.
pub fn project_cards(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to browse projects  (File → Open…)");
        });
        return;
    }

    ui.heading("Project Details");
    ui.separator();

    // Reclamps the cursor against the current filtered length, so a stale
    // page number self-heals here every frame.
    let (records, _total) = page::page(&state.filtered.records, &mut state.page);
    let records: Vec<ProjectRecord> = records.to_vec();

    if records.is_empty() {
        ui.label("No results match the current filters.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for rec in &records {
                project_card(ui, rec);
                ui.add_space(6.0);
            }
        });
}

fn project_card(ui: &mut Ui, record: &ProjectRecord) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.strong(field_text(record, "company_name"));
        for (label, field) in CARD_FIELDS {
            ui.label(format!("{label}: {}", field_text(record, field)));
        }
        if let summary @ FieldValue::String(_) = record.get("summary_of_project") {
            ui.label(RichText::new(summary.to_string()).weak().italics());
        }
    });
}

/// Rendering-boundary default: missing values display as "N/A", the core
/// keeps them null.
fn field_text(record: &ProjectRecord, field: &str) -> String {
    match record.get(field) {
        FieldValue::Null => "N/A".to_string(),
        value => value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Pagination controls (bottom bar)
// ---------------------------------------------------------------------------

pub fn pagination_controls(ui: &mut Ui, state: &mut AppState) {
    let len = state.filtered.len();
    let total = state.page.reclamp(len);
    let current = state.page.current_page;

    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(current > 1, egui::Button::new("⬅ Previous"))
            .clicked()
        {
            state.page.previous();
        }
        ui.label(format!("Page {current} of {total}"));
        if ui
            .add_enabled(current < total, egui::Button::new("Next ➡"))
            .clicked()
        {
            state.page.next(len);
        }
    });
}
