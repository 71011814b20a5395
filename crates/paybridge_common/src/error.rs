// --- File: crates/paybridge_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// Message returned to clients for every server-side failure.
pub const GENERIC_SERVER_ERROR: &str = "Internal server error";

/// The base error type for all Paybridge errors.
///
/// Each crate extends this by implementing `From<SpecificError> for PaybridgeError`.
#[derive(Error, Debug)]
pub enum PaybridgeError {
    /// Error occurred during an outgoing HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Request input was missing or had the wrong shape
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A signed payload could not be verified
    #[error("Verification error: {0}")]
    VerificationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for PaybridgeError {
    fn status_code(&self) -> u16 {
        match self {
            PaybridgeError::HttpError(_) => 500,
            PaybridgeError::ConfigError(_) => 500,
            PaybridgeError::ValidationError(_) => 400,
            PaybridgeError::VerificationError(_) => 400,
            PaybridgeError::ExternalServiceError { .. } => 500,
            PaybridgeError::InternalError(_) => 500,
        }
    }
}

impl PaybridgeError {
    /// The message that is safe to hand back to a client.
    ///
    /// Provider and transport details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            PaybridgeError::ValidationError(msg) | PaybridgeError::ConfigError(msg) => msg.clone(),
            PaybridgeError::VerificationError(_) => "Webhook verification failed".to_string(),
            _ => GENERIC_SERVER_ERROR.to_string(),
        }
    }
}

impl From<reqwest::Error> for PaybridgeError {
    fn from(err: reqwest::Error) -> Self {
        PaybridgeError::HttpError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> PaybridgeError {
    PaybridgeError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> PaybridgeError {
    PaybridgeError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> PaybridgeError {
    PaybridgeError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> PaybridgeError {
    PaybridgeError::InternalError(message.to_string())
}
