pub mod app;
pub mod clipboard;
pub mod compositor;
pub mod config;
pub mod cover_fit;
pub mod error;
pub mod events;
pub mod exporter;
pub mod image_source;
pub mod loader;
pub mod notification;
pub mod session;
pub mod ui_theme;

pub use error::{PfpError, Result};
