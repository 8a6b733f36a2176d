//! Core library for the CodeRefine terminal client.
//!
//! Holds everything that can be tested without a terminal: the wire model,
//! the session store and its SQLite backing, the HTTP client, and one state
//! machine per screen.

pub mod auth;
pub mod buffer;
pub mod client;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod language;
pub mod review;
pub mod schema;
pub mod score;
pub mod session;
pub mod storage;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, Result, StorageError, ValidationError};
pub use language::Language;
pub use session::SessionStore;
