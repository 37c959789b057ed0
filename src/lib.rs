pub mod analyzer;
pub mod clip;
pub mod config;
pub mod display;
pub mod input;

/// Audio file extensions we support
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav"];

/// Application name for XDG paths
pub const APP_NAME: &str = "voicelens";
