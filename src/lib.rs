pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod format;
pub mod pages;
pub mod routes;
pub mod session;
pub mod storage;
pub mod theme;

use app::App;
use config::config;

/// Starts logging at the configured level and mounts the app on `<body>`.
pub fn run() {
    wasm_logger::init(wasm_logger::Config::new(config().log_level));
    log::info!("starting against {}", config().api_root);
    yew::Renderer::<App>::new().render();
}
