// --- File: crates/paybridge_stripe/src/client.rs ---
use async_trait::async_trait;
use paybridge_common::http::client::{create_client, DEFAULT_TIMEOUT_SECS};
use paybridge_config::StripeConfig;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::StripeError;
use crate::models::{CheckoutSessionParams, CustomerFields, ListParams, StripeList};
use crate::service::StripeApi;

/// Handle to the Stripe REST API.
///
/// Built once at startup and shared behind an `Arc`; it holds no mutable state.
#[derive(Clone)]
pub struct StripeClient {
    http: Client,
    base_url: Url,
    secret_key: String,
}

impl StripeClient {
    /// Builds a client from configuration.
    ///
    /// Fails with [`StripeError::ConfigError`] when the secret key is absent
    /// or the API base URL is not a valid URL.
    pub fn from_config(config: &StripeConfig) -> Result<Self, StripeError> {
        let secret_key = config
            .secret_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| StripeError::ConfigError("STRIPE_SECRET_KEY is not set".to_string()))?;

        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            StripeError::ConfigError(format!("Invalid Stripe API base URL '{}': {}", config.api_base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(StripeError::ConfigError(format!(
                "Stripe API base URL '{}' cannot be used as a base",
                config.api_base_url
            )));
        }

        let http = create_client(DEFAULT_TIMEOUT_SECS, true)?;

        info!("[Stripe Client] Initialized for {}", base_url);
        Ok(Self {
            http,
            base_url,
            secret_key,
        })
    }

    /// Joins path segments onto the base URL, percent-encoding each one so
    /// caller-supplied IDs cannot escape their segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StripeError> {
        let response = request
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;
        debug!("[Stripe Client] Stripe API response status: {}", status);

        if status.is_success() {
            Ok(serde_json::from_str(&body_text)?)
        } else {
            let error_message = match serde_json::from_str::<Value>(&body_text) {
                Ok(json_body) => json_body
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .unwrap_or(&body_text)
                    .to_string(),
                Err(_) => body_text,
            };
            error!(
                "[Stripe Client] Stripe API request failed with HTTP status: {}. Message: {}",
                status, error_message
            );
            Err(StripeError::ApiError {
                status_code: status.as_u16(),
                message: error_message,
            })
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, StripeError> {
        let url = self.endpoint(segments);
        debug!("[Stripe Client] GET {}", url);
        self.send(self.http.get(url).query(query)).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        form: &[(&str, String)],
    ) -> Result<T, StripeError> {
        let url = self.endpoint(segments);
        debug!("[Stripe Client] POST {}", url);
        self.send(self.http.post(url).form(form)).await
    }
}

fn list_query(params: &ListParams) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(limit) = params.limit {
        query.push(("limit", limit.to_string()));
    }
    if let Some(starting_after) = &params.starting_after {
        query.push(("starting_after", starting_after.clone()));
    }
    query
}

fn customer_form(fields: &CustomerFields) -> Vec<(&'static str, String)> {
    [
        ("email", &fields.email),
        ("name", &fields.name),
        ("phone", &fields.phone),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
    .collect()
}

fn checkout_form(params: &CheckoutSessionParams) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("mode", "subscription".to_string()),
        ("line_items[0][price]", params.price_id.clone()),
        ("line_items[0][quantity]", "1".to_string()),
        ("success_url", params.success_url.clone()),
        ("cancel_url", params.cancel_url.clone()),
    ];
    if let Some(customer_id) = &params.customer_id {
        form.push(("customer", customer_id.clone()));
    }
    form
}

#[async_trait]
impl StripeApi for StripeClient {
    async fn list_products(&self, params: ListParams) -> Result<StripeList, StripeError> {
        self.get(&["v1", "products"], &list_query(&params)).await
    }

    async fn retrieve_product(&self, product_id: &str) -> Result<Value, StripeError> {
        self.get(&["v1", "products", product_id], &[]).await
    }

    async fn retrieve_customer(&self, customer_id: &str) -> Result<Value, StripeError> {
        self.get(&["v1", "customers", customer_id], &[]).await
    }

    async fn create_customer(&self, fields: CustomerFields) -> Result<Value, StripeError> {
        self.post_form(&["v1", "customers"], &customer_form(&fields)).await
    }

    async fn update_customer(
        &self,
        customer_id: &str,
        fields: CustomerFields,
    ) -> Result<Value, StripeError> {
        self.post_form(&["v1", "customers", customer_id], &customer_form(&fields))
            .await
    }

    async fn list_subscriptions(
        &self,
        customer_id: &str,
        params: ListParams,
    ) -> Result<StripeList, StripeError> {
        let mut query = vec![("customer", customer_id.to_string())];
        query.extend(list_query(&params));
        self.get(&["v1", "subscriptions"], &query).await
    }

    async fn retrieve_subscription(&self, subscription_id: &str) -> Result<Value, StripeError> {
        self.get(&["v1", "subscriptions", subscription_id], &[]).await
    }

    async fn list_payment_intents(
        &self,
        customer_id: Option<String>,
        params: ListParams,
    ) -> Result<StripeList, StripeError> {
        let mut query = Vec::new();
        if let Some(customer_id) = customer_id {
            query.push(("customer", customer_id));
        }
        query.extend(list_query(&params));
        self.get(&["v1", "payment_intents"], &query).await
    }

    async fn retrieve_payment_intent(&self, payment_intent_id: &str) -> Result<Value, StripeError> {
        self.get(&["v1", "payment_intents", payment_intent_id], &[])
            .await
    }

    async fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> Result<Value, StripeError> {
        self.post_form(&["v1", "checkout", "sessions"], &checkout_form(&params))
            .await
    }
}
