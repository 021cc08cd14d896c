use eframe::egui::{self, Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::data::aggregate::Metric;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Summary chart (right panel)
// ---------------------------------------------------------------------------

/// Render the grouped summary chart with its group/metric selectors.
pub fn chart_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Overview");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // ---- Group-by selector ----
    let candidates = state.config.filter_fields.clone();
    let current_group = state.group_field.clone();
    egui::ComboBox::from_label("Group by")
        .selected_text(&current_group)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &candidates {
                if ui.selectable_label(current_group == *col, col).clicked() {
                    state.set_group_field(col.clone());
                }
            }
        });

    // ---- Metric selector ----
    if let Some(metric_field) = state.config.metric_field.clone() {
        let is_count = matches!(state.chart_metric, Metric::Count);
        egui::ComboBox::from_label("Metric")
            .selected_text(if is_count { "Project count" } else { "Total investment" })
            .show_ui(ui, |ui: &mut Ui| {
                if ui.selectable_label(is_count, "Project count").clicked() {
                    state.chart_metric = Metric::Count;
                }
                if ui
                    .selectable_label(!is_count, "Total investment")
                    .clicked()
                {
                    state.chart_metric = Metric::Sum(metric_field.clone());
                }
            });
    }
    ui.separator();

    let Some(result) = state.aggregation() else {
        return;
    };
    if result.rows.is_empty() {
        ui.label("Nothing to chart.");
        return;
    }

    let title = match &state.chart_metric {
        Metric::Count => format!("Projects by {}", result.group_field),
        Metric::Sum(field) => format!("Total {field} by {}", result.group_field),
    };
    ui.strong(title);

    // One named chart per group so the legend lists the group values,
    // coloured consistently with the full-table colour map.
    Plot::new("summary_chart")
        .legend(Legend::default())
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for (i, (key, value)) in result.rows.iter().enumerate() {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(key))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let bar = Bar::new(i as f64, *value)
                    .width(0.6)
                    .fill(color)
                    .name(key.to_string());

                plot_ui.bar_chart(BarChart::new(vec![bar]).name(key.to_string()).color(color));
            }
        });
}
