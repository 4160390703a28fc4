//! Lottery ticket ingestion service.
//!
//! Records Powerball and Mega Millions plays submitted through a JSON API or
//! an HTML form, and accepts ticket photos for later OCR.

pub mod config;
pub mod http;
pub mod persistence;
pub mod tickets;

pub use config::{ConfigError, ServerConfig};
pub use http::{build_router, AppState};
