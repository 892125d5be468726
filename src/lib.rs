#[cfg(feature = "desktop")]
mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

#[cfg(feature = "desktop")]
use config::{AppConfig, CONFIG_FILE_NAME};
#[cfg(feature = "desktop")]
use services::flows::PredictionSession;
#[cfg(feature = "desktop")]
use tauri::Manager;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_window_state::Builder::default().build())
        .setup(|app| {
            if let Err(e) = logging::init() {
                eprintln!("{}", e);
            }

            let config_dir = app
                .path()
                .app_config_dir()
                .expect("Failed to get app config directory");
            let config = AppConfig::load(&config_dir.join(CONFIG_FILE_NAME))?;
            tracing::info!(api = %config.api_base_url, "Using prediction API");

            app.manage(PredictionSession::new(&config));
            app.manage(config);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::predict::submit_single,
            commands::predict::load_batch_file,
            commands::predict::submit_batch,
            commands::predict::get_api_status,
            commands::predict::get_config,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
