// --- File: crates/paybridge_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{
    config_error, external_service_error, internal_error, validation_error, HttpStatusCode,
    PaybridgeError, GENERIC_SERVER_ERROR,
};

// Re-export HTTP utilities for easier access
pub use http::{client::create_client, AppJson, AppQuery, IntoHttpResponse};

pub use logging::log_error;

// Shared error handling, HTTP helpers and logging for the Paybridge crates.
