//! Icinga Status Proxy Library
//!
//! Serves the host and service status stored in an Icinga IDO database as
//! Icinga-API-shaped JSON for dashboards.

pub mod config;
pub mod controllers;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;

pub use config::Config;
pub use errors::{ApiError, Result, StartupError};
pub use models::{NormalizedEntity, ObjectList};
pub use state::AppState;
pub use storage::{MonitoringConn, MonitoringDb, SchemaOptions};
