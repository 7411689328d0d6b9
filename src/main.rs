#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod adapters;
mod app;
mod core;
mod global_constants;
mod presentation;


use iced::daemon;

fn main() -> iced::Result {
    env_logger::init();

    log::info!(
        "{} Starting {} plant identifier",
        global_constants::LOG_TAG_MAIN,
        global_constants::APPLICATION_TITLE
    );

    daemon(
        app::PlantApp::build,
        app::PlantApp::handle_update,
        app::PlantApp::render_view,
    )
    .title(|_app: &app::PlantApp, _window| global_constants::APPLICATION_TITLE.to_string())
    .subscription(app::PlantApp::handle_subscription)
    .run()
}
