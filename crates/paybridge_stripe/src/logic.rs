// --- File: crates/paybridge_stripe/src/logic.rs ---
//! Domain operations over the Stripe API.
//!
//! Each function issues exactly one provider call and returns its result or
//! its error unchanged. List operations return only the `data` array.

use serde_json::Value;
use tracing::info;

use crate::error::StripeError;
use crate::models::{
    CheckoutSessionParams, CreateCheckoutSessionResponse, CustomerFields, ListParams,
    PaymentListParams, SubscriptionListParams, MAX_LIST_LIMIT,
};
use crate::service::StripeApi;

/// Page size used when a route asks for everything belonging to one customer.
pub const CUSTOMER_LIST_LIMIT: u8 = MAX_LIST_LIMIT;

fn customer_page() -> ListParams {
    ListParams {
        limit: Some(CUSTOMER_LIST_LIMIT),
        starting_after: None,
    }
}

pub async fn get_products(api: &dyn StripeApi, params: ListParams) -> Result<Vec<Value>, StripeError> {
    Ok(api.list_products(params).await?.data)
}

pub async fn get_product(api: &dyn StripeApi, product_id: &str) -> Result<Value, StripeError> {
    api.retrieve_product(product_id).await
}

/// Deleted customers come back as `{"id", "deleted": true}` and are passed through.
pub async fn get_customer(api: &dyn StripeApi, customer_id: &str) -> Result<Value, StripeError> {
    api.retrieve_customer(customer_id).await
}

pub async fn create_customer(api: &dyn StripeApi, fields: CustomerFields) -> Result<Value, StripeError> {
    api.create_customer(fields).await
}

pub async fn update_customer(
    api: &dyn StripeApi,
    customer_id: &str,
    fields: CustomerFields,
) -> Result<Value, StripeError> {
    api.update_customer(customer_id, fields).await
}

pub async fn get_customer_subscriptions(
    api: &dyn StripeApi,
    customer_id: &str,
) -> Result<Vec<Value>, StripeError> {
    Ok(api.list_subscriptions(customer_id, customer_page()).await?.data)
}

pub async fn get_customer_payments(
    api: &dyn StripeApi,
    customer_id: &str,
) -> Result<Vec<Value>, StripeError> {
    Ok(api
        .list_payment_intents(Some(customer_id.to_string()), customer_page())
        .await?
        .data)
}

pub async fn get_payment(api: &dyn StripeApi, payment_id: &str) -> Result<Value, StripeError> {
    api.retrieve_payment_intent(payment_id).await
}

pub async fn list_payments(
    api: &dyn StripeApi,
    params: PaymentListParams,
) -> Result<Vec<Value>, StripeError> {
    Ok(api
        .list_payment_intents(params.customer_id, params.list)
        .await?
        .data)
}

pub async fn get_subscription(api: &dyn StripeApi, subscription_id: &str) -> Result<Value, StripeError> {
    api.retrieve_subscription(subscription_id).await
}

pub async fn list_subscriptions(
    api: &dyn StripeApi,
    params: SubscriptionListParams,
) -> Result<Vec<Value>, StripeError> {
    Ok(api
        .list_subscriptions(&params.customer_id, params.list)
        .await?
        .data)
}

/// Creates a subscription-mode Checkout Session for a single price.
pub async fn create_checkout_session(
    api: &dyn StripeApi,
    params: CheckoutSessionParams,
) -> Result<CreateCheckoutSessionResponse, StripeError> {
    info!(
        "[Stripe Logic] Creating Checkout Session for price {} (customer: {:?})",
        params.price_id, params.customer_id
    );

    let session = api.create_checkout_session(params).await?;

    match session.get("url").and_then(Value::as_str) {
        Some(url) => {
            info!("[Stripe Logic] Stripe Checkout Session created successfully. URL: {}", url);
            Ok(CreateCheckoutSessionResponse {
                checkout_url: url.to_string(),
            })
        }
        None => Err(StripeError::InternalError(
            "Stripe response missing checkout URL".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StripeListObject;
    use crate::service::MockStripeApi;
    use serde_json::json;

    fn list_of(items: Vec<Value>) -> StripeListObject<Value> {
        StripeListObject {
            object: "list".to_string(),
            data: items,
            has_more: true,
            url: "/v1/things".to_string(),
        }
    }

    #[tokio::test]
    async fn customer_subscriptions_ask_for_a_full_page() {
        let mut api = MockStripeApi::new();
        api.expect_list_subscriptions()
            .withf(|customer_id: &str, params: &ListParams| {
                customer_id == "cus_1" && params.limit == Some(100) && params.starting_after.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(list_of(vec![json!({"id": "sub_1"})])));

        let subs = get_customer_subscriptions(&api, "cus_1").await.unwrap();
        assert_eq!(subs, vec![json!({"id": "sub_1"})]);
    }

    #[tokio::test]
    async fn customer_payments_filter_by_customer() {
        let mut api = MockStripeApi::new();
        api.expect_list_payment_intents()
            .withf(|customer_id: &Option<String>, params: &ListParams| {
                customer_id.as_deref() == Some("cus_1") && params.limit == Some(100)
            })
            .times(1)
            .returning(|_, _| Ok(list_of(vec![json!({"id": "pi_1"}), json!({"id": "pi_2"})])));

        let payments = get_customer_payments(&api, "cus_1").await.unwrap();
        assert_eq!(payments.len(), 2);
    }

    #[tokio::test]
    async fn list_operations_drop_pagination_envelope() {
        let mut api = MockStripeApi::new();
        api.expect_list_products()
            .times(1)
            .returning(|_| Ok(list_of(vec![json!({"id": "prod_1"})])));

        let products = get_products(&api, ListParams::default()).await.unwrap();
        assert_eq!(products, vec![json!({"id": "prod_1"})]);
    }

    #[tokio::test]
    async fn checkout_session_without_url_is_an_error() {
        let mut api = MockStripeApi::new();
        api.expect_create_checkout_session()
            .times(1)
            .returning(|_| Ok(json!({"id": "cs_test_1", "url": null})));

        let params = CheckoutSessionParams {
            price_id: "price_123".to_string(),
            success_url: "https://x/ok".to_string(),
            cancel_url: "https://x/cancel".to_string(),
            customer_id: None,
        };
        let err = create_checkout_session(&api, params).await.unwrap_err();
        assert!(matches!(err, StripeError::InternalError(_)));
    }

    #[tokio::test]
    async fn provider_errors_propagate_unchanged() {
        let mut api = MockStripeApi::new();
        api.expect_retrieve_product().times(1).returning(|_| {
            Err(StripeError::ApiError {
                status_code: 404,
                message: "No such product".to_string(),
            })
        });

        let err = get_product(&api, "prod_missing").await.unwrap_err();
        assert!(matches!(err, StripeError::ApiError { status_code: 404, .. }));
    }
}
