mod api;
mod app;
mod commands;
mod redact;
mod settings;
mod state;
pub mod types;
mod view;

pub fn run() {
    app::run();
}
