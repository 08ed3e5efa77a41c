//! Infrastructure: HTTP, filesystem, configuration, and logging concerns.

pub mod config;
pub mod csv_fetch;
pub mod http_client;
pub mod image_store;
pub mod logging;

pub use config::{AppConfig, ConfigManager};
pub use http_client::HttpClient;
pub use image_store::{ImageSink, ImageStore};
