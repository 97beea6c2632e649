//! TMS Core - Translation Management Service Backend
//!
//! REST API for contexts, locales and translations behind bearer-token
//! authentication, backed by MySQL.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
