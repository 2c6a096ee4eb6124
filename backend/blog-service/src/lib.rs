/// Blog Service Library
///
/// JSON API for the Inkwell blogging platform: accounts, blogs, categories,
/// likes, comments, follows and bookmarks, with trending and smart feed
/// ranking evaluated in PostgreSQL.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route table
/// - `services`: Business logic layer
/// - `db`: Repository functions over `sqlx`
/// - `models`: Row and view types
/// - `middleware`: Auth extractors, permission checks, request metrics
/// - `metrics`: Prometheus collectors and `/metrics`
/// - `error`, `response`: Error type and JSON envelope
/// - `config`: Environment configuration
/// - `validators`: Input shape checks and slug derivation
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod response;
pub mod services;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};

/// Embedded schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
