// --- File: crates/paybridge_stripe/src/webhook.rs ---
//! Verification and dispatch of Stripe webhook events.
//!
//! Stripe signs `"<t>.<raw body>"` with HMAC-SHA256 and sends the result in
//! the `Stripe-Signature` header as `t=<unix>,v1=<hex>[,v1=<hex>...]`. The
//! body must be verified exactly as received; re-serializing it breaks the
//! signature.

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;
use tracing::{debug, info, warn};

use crate::error::StripeError;

type HmacSha256 = Hmac<Sha256>;

pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

/// The parts of a `Stripe-Signature` header this service uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub v1_signatures: Vec<String>,
}

impl SignatureHeader {
    /// Parses `t=...,v1=...` pairs. `v0` and unknown keys are ignored.
    pub fn parse(header: &str) -> Result<Self, StripeError> {
        let mut timestamp = None;
        let mut v1_signatures = Vec::new();

        for item in header.split(',') {
            let Some((key, value)) = item.trim().split_once('=') else {
                continue;
            };
            match key {
                "t" => timestamp = Some(value),
                "v1" => v1_signatures.push(value.to_string()),
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| {
                StripeError::WebhookVerificationError(
                    "Missing timestamp 't' in Stripe-Signature".to_string(),
                )
            })?
            .parse::<i64>()
            .map_err(|_| {
                StripeError::WebhookVerificationError(
                    "Invalid timestamp format in Stripe-Signature".to_string(),
                )
            })?;

        if v1_signatures.is_empty() {
            return Err(StripeError::WebhookVerificationError(
                "Missing v1 signature in Stripe-Signature".to_string(),
            ));
        }

        Ok(Self {
            timestamp,
            v1_signatures,
        })
    }
}

/// Checks `header` against `payload` at the given clock reading.
///
/// Passes when any `v1` entry matches and the signed timestamp lies within
/// `tolerance_secs` of `now` in either direction.
pub fn verify_stripe_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: u64,
    now: i64,
) -> Result<(), StripeError> {
    let parsed = SignatureHeader::parse(header)?;
    debug!(
        "[Stripe Webhook] t={} with {} v1 signature(s)",
        parsed.timestamp,
        parsed.v1_signatures.len()
    );

    let age = now.abs_diff(parsed.timestamp);
    if age > tolerance_secs {
        warn!(
            "[Stripe Webhook] Timestamp outside tolerance. Current: {}, Event: {}, Diff: {}",
            now, parsed.timestamp, age
        );
        return Err(StripeError::WebhookVerificationError(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| StripeError::InternalError(format!("HMAC init failed: {}", e)))?;
    mac.update(parsed.timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    let matched = parsed.v1_signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });

    if matched {
        Ok(())
    } else {
        Err(StripeError::WebhookVerificationError(
            "Signature mismatch".to_string(),
        ))
    }
}

/// A Stripe event envelope. `data.object` is kept as raw JSON.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub livemode: bool,
    pub data: StripeEventData,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StripeEventData {
    pub object: Value,
}

/// Verifies the raw body against the header and decodes the event.
pub fn construct_event(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
    tolerance_secs: u64,
) -> Result<StripeEvent, StripeError> {
    verify_stripe_signature(payload, sig_header, secret, tolerance_secs, Utc::now().timestamp())?;
    serde_json::from_slice(payload).map_err(|e| {
        StripeError::WebhookVerificationError(format!("Invalid event payload: {}", e))
    })
}

/// Which branch of [`process_stripe_webhook`] handled an event.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    SubscriptionChanged {
        event_type: String,
        subscription_id: String,
    },
    PaymentSucceeded {
        payment_intent_id: String,
        amount: Option<i64>,
    },
    PaymentFailed {
        payment_intent_id: String,
        last_payment_error: Option<Value>,
    },
    ChargeRefunded {
        charge_id: String,
        amount_refunded: Option<i64>,
    },
    Unhandled {
        event_type: String,
    },
}

fn object_id(event: &StripeEvent) -> Result<String, StripeError> {
    event
        .data
        .object
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            StripeError::WebhookProcessingError(format!(
                "{} event {} has no data.object.id",
                event.event_type, event.id
            ))
        })
}

fn object_i64(event: &StripeEvent, field: &str) -> Option<i64> {
    event.data.object.get(field).and_then(Value::as_i64)
}

/// Logs the fields of interest for each event family. Nothing else happens.
pub fn process_stripe_webhook(event: &StripeEvent) -> Result<WebhookOutcome, StripeError> {
    info!(event_id = %event.id, event_type = %event.event_type, "Processing Stripe event");

    let outcome = match event.event_type.as_str() {
        "customer.subscription.created"
        | "customer.subscription.updated"
        | "customer.subscription.deleted" => {
            let subscription_id = object_id(event)?;
            info!(
                subscription_id = %subscription_id,
                event_type = %event.event_type,
                "Subscription event"
            );
            WebhookOutcome::SubscriptionChanged {
                event_type: event.event_type.clone(),
                subscription_id,
            }
        }
        "payment_intent.succeeded" => {
            let payment_intent_id = object_id(event)?;
            let amount = object_i64(event, "amount");
            info!(
                payment_intent_id = %payment_intent_id,
                amount = ?amount,
                "Payment succeeded"
            );
            WebhookOutcome::PaymentSucceeded {
                payment_intent_id,
                amount,
            }
        }
        "payment_intent.payment_failed" => {
            let payment_intent_id = object_id(event)?;
            let last_payment_error = event
                .data
                .object
                .get("last_payment_error")
                .filter(|v| !v.is_null())
                .cloned();
            warn!(
                payment_intent_id = %payment_intent_id,
                last_payment_error = ?last_payment_error,
                "Payment failed"
            );
            WebhookOutcome::PaymentFailed {
                payment_intent_id,
                last_payment_error,
            }
        }
        "charge.refunded" => {
            let charge_id = object_id(event)?;
            let amount_refunded = object_i64(event, "amount_refunded");
            info!(
                charge_id = %charge_id,
                amount_refunded = ?amount_refunded,
                "Charge refunded"
            );
            WebhookOutcome::ChargeRefunded {
                charge_id,
                amount_refunded,
            }
        }
        other => {
            info!(event_type = %other, "Unhandled event type");
            WebhookOutcome::Unhandled {
                event_type: other.to_string(),
            }
        }
    };

    Ok(outcome)
}

/// Produces a header Stripe would send for `payload` at `timestamp`.
#[cfg(test)]
pub(crate) fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(format!("{}.", timestamp).as_bytes());
    mac.update(payload);
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}
