// io/mod.rs
// Settings, TOML config and command line
pub mod config_loader;
pub mod render_settings;
pub mod simple_cli;
