mod app;
use lp_matrix::*;

use app::LpMatrixApp;
use config::AppConfig;
use database::library::load_library;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();
    let store = database::open_store(&config)?;
    let library = load_library(store.as_ref());

    log::info!(
        "Question bank has {} principle pools and {} common questions",
        library.questions.principles.len(),
        library.questions.questions(models::COMMON_POOL).len()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height]),
        ..Default::default()
    };
    eframe::run_native(
        "Amazon Leadership Principles Story Matrix",
        options,
        Box::new(move |_cc| Ok(Box::new(LpMatrixApp::new(config, store, library)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run the application window: {}", e))
}
