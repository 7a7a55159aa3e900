mod app;
mod cli;
mod config;
mod effects;
mod input;
mod logging;
mod render;

pub use app::run_app;
