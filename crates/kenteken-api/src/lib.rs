//! Kenteken API - stores vehicle registration numbers.
//!
//! A single `POST /storeKenteken` endpoint accepts `{"Kenteken": "..."}` and
//! inserts the value into a MySQL table, rejecting values already present.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod startup;
pub mod store;

pub use config::Config;
pub use error::{ApiError, StartupError};
pub use store::{DuplicateStrategy, MemoryStore, MySqlStore, RegistrationStore, StoreError};
