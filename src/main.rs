use std::path::Path;

use eframe::egui;

use expansion_tracker::app::ExpansionTrackerApp;
use expansion_tracker::config::{DashboardConfig, CONFIG_FILE};

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE)).unwrap_or_else(|e| {
        log::error!("invalid configuration: {e:#}");
        std::process::exit(1);
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([700.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Global Expansion Tracker",
        options,
        Box::new(move |_cc| Ok(Box::new(ExpansionTrackerApp::new(config)))),
    )
}
