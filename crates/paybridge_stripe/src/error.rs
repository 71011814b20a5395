// --- File: crates/paybridge_stripe/src/error.rs ---
use paybridge_common::{
    config_error, external_service_error, internal_error, HttpStatusCode, PaybridgeError,
};
use thiserror::Error;

/// Stripe-specific error types.
#[derive(Error, Debug)]
pub enum StripeError {
    /// Error occurred during a Stripe API request
    #[error("Stripe API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Stripe API
    #[error("Stripe API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing Stripe API response
    #[error("Failed to parse Stripe API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or incomplete Stripe configuration
    #[error("Stripe configuration missing or incomplete: {0}")]
    ConfigError(String),

    /// Webhook signature or payload could not be verified
    #[error("Stripe webhook verification failed: {0}")]
    WebhookVerificationError(String),

    /// Webhook event processing error
    #[error("Stripe webhook event processing error: {0}")]
    WebhookProcessingError(String),

    /// Internal processing error
    #[error("Internal processing error: {0}")]
    InternalError(String),
}

/// Convert StripeError to PaybridgeError
impl From<StripeError> for PaybridgeError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::RequestError(e) => PaybridgeError::HttpError(format!("Stripe request error: {}", e)),
            StripeError::ApiError { status_code, message } => external_service_error(
                "Stripe API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            StripeError::ParseError(e) => external_service_error("Stripe API", format!("Response parse error: {}", e)),
            StripeError::ConfigError(msg) => config_error(msg),
            StripeError::WebhookVerificationError(msg) => PaybridgeError::VerificationError(msg),
            StripeError::WebhookProcessingError(msg) => internal_error(format!("Stripe webhook: {}", msg)),
            StripeError::InternalError(msg) => internal_error(format!("Stripe internal error: {}", msg)),
        }
    }
}

/// Every provider-side failure is a 500; only webhook verification is the caller's fault.
impl HttpStatusCode for StripeError {
    fn status_code(&self) -> u16 {
        match self {
            StripeError::WebhookVerificationError(_) => 400,
            _ => 500,
        }
    }
}
