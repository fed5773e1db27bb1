//! HTTP service over the companydb object-document mapper.
//!
//! Exposes the `products` and `employees` collections as JSON resources.
//! Everything the binary wires together is public so integration tests can
//! build the same router over an in-memory store.

pub mod api;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod state;

pub use config::{Config, StoreBackendKind};
pub use error::{AppError, AppResult};
pub use state::AppState;
