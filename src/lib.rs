pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod service;

pub use api::{router, AppState};
pub use config::AppConfig;
pub use error::ReconcileError;
pub use service::{ImportSession, SessionRegistry};
