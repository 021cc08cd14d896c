use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – search + membership filters
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match state.dataset.clone() {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // ---- Search box ----
    ui.strong("Search");
    let response = ui.add(
        egui::TextEdit::singleline(&mut state.filters.search)
            .hint_text("Company name contains…"),
    );
    if response.changed() {
        state.refilter();
    }
    ui.separator();

    // Clone the field list so we can mutate state inside the loop.
    let fields = state.config.filter_fields.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Per-field filter widgets (collapsible) ----
            // An empty selection means "no constraint", so every value is
            // shown; checking values narrows the view down.
            for field in &fields {
                let Some(all_values) = dataset.unique_values.get(field) else {
                    continue;
                };

                let n_selected = state
                    .filters
                    .membership
                    .get(field)
                    .map_or(0, |s| s.len());
                let n_total = all_values.len();
                let header_text = if n_selected == 0 {
                    format!("{field}  (all)")
                } else {
                    format!("{field}  ({n_selected}/{n_total})")
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(field)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        // Select all / none buttons
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(field);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(field);
                            }
                        });

                        for val in all_values {
                            let is_selected = state
                                .filters
                                .membership
                                .get(field)
                                .is_some_and(|s| s.contains(val));

                            let mut checked = is_selected;
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                state.toggle_filter_value(field, val);
                            }
                        }
                    });
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
            let can_reload = state.source_path.is_some();
            if ui
                .add_enabled(can_reload, egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} projects · {} companies · {} countries",
                ds.len(),
                ds.unique_count("company_name"),
                ds.unique_count("host_country"),
            ));
            ui.separator();
            ui.label(format!("{} matching", state.filtered.len()));
        }

        ui.separator();

        if ui
            .selectable_label(state.aggregate_filtered, "Chart filtered data")
            .clicked()
        {
            state.aggregate_filtered = !state.aggregate_filtered;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open project data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
