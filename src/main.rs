#![forbid(unsafe_code)]
#![cfg_attr(not(debug_assertions), deny(warnings))] // Forbid warnings in release builds
#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use eframe::egui::viewport::WindowLevel;
use log::LevelFilter;

#[tokio::main]
async fn main() -> eframe::Result<()> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Countdown")
            .with_inner_size([200.0, desktop_countdown::layout::WINDOW_HEIGHT])
            .with_decorations(false)
            .with_transparent(true)
            .with_mouse_passthrough(true)
            .with_active(false)
            .with_taskbar(false)
            .with_resizable(false)
            .with_window_level(WindowLevel::AlwaysOnBottom),
        centered: false,
        ..Default::default()
    };
    eframe::run_native(
        "desktop countdown",
        native_options,
        Box::new(|cc| Box::new(desktop_countdown::CountdownApp::new(cc))),
    )
}
