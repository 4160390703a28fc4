//! Endpoint handlers organized by ingestion path

pub mod forms;
pub mod health;
pub mod photos;
pub mod tickets;
