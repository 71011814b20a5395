// --- File: crates/paybridge_stripe/src/handlers_test.rs ---
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use paybridge_config::StripeConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::error::StripeError;
use crate::models::{CheckoutSessionParams, CustomerFields, ListParams, StripeListObject};
use crate::routes::routes;
use crate::service::MockStripeApi;
use crate::webhook::sign_payload;

const WEBHOOK_SECRET: &str = "whsec_test_secret";

fn test_config() -> StripeConfig {
    StripeConfig {
        secret_key: Some("sk_test_123".to_string()),
        webhook_secret: Some(WEBHOOK_SECRET.to_string()),
        ..StripeConfig::default()
    }
}

fn app(api: MockStripeApi) -> Router {
    routes(Arc::new(api), Arc::new(test_config()))
}

fn app_with_config(api: MockStripeApi, config: StripeConfig) -> Router {
    routes(Arc::new(api), Arc::new(config))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn webhook_request(payload: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/stripe/webhook");
    if let Some(signature) = signature {
        builder = builder.header("Stripe-Signature", signature);
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn list_of(items: Vec<Value>) -> StripeListObject<Value> {
    StripeListObject {
        object: "list".to_string(),
        data: items,
        has_more: false,
        url: "/v1/things".to_string(),
    }
}

fn api_failure() -> StripeError {
    StripeError::ApiError {
        status_code: 404,
        message: "No such resource: 'x_missing'".to_string(),
    }
}

// --- Checkout ---

#[tokio::test]
async fn checkout_returns_session_url() {
    let mut api = MockStripeApi::new();
    api.expect_create_checkout_session()
        .withf(|params: &CheckoutSessionParams| {
            params.price_id == "price_123"
                && params.success_url == "https://x/ok"
                && params.cancel_url == "https://x/cancel"
                && params.customer_id.is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(json!({
                "id": "cs_test_1",
                "url": "https://checkout.stripe.com/c/pay/cs_test_1"
            }))
        });

    let (status, body) = send(
        app(api),
        json_request(
            "POST",
            "/stripe/checkout",
            json!({"price_id": "price_123", "success_url": "https://x/ok", "cancel_url": "https://x/cancel"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"checkout_url": "https://checkout.stripe.com/c/pay/cs_test_1"})
    );
}

#[tokio::test]
async fn checkout_without_price_is_rejected_before_stripe() {
    let mut api = MockStripeApi::new();
    api.expect_create_checkout_session().never();

    let (status, body) = send(
        app(api),
        json_request(
            "POST",
            "/stripe/checkout",
            json!({"success_url": "https://x/ok", "cancel_url": "https://x/cancel"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "price_id, success_url and cancel_url are required"})
    );
}

#[tokio::test]
async fn checkout_with_malformed_json_is_a_bad_request() {
    let mut api = MockStripeApi::new();
    api.expect_create_checkout_session().never();

    let request = Request::builder()
        .method("POST")
        .uri("/stripe/checkout")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(api), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn checkout_provider_failure_is_a_generic_500() {
    let mut api = MockStripeApi::new();
    api.expect_create_checkout_session()
        .times(1)
        .returning(|_| Err(api_failure()));

    let (status, body) = send(
        app(api),
        json_request(
            "POST",
            "/stripe/checkout",
            json!({"price_id": "price_123", "success_url": "https://x/ok", "cancel_url": "https://x/cancel"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));
}

// --- Customer ---

#[tokio::test]
async fn get_customer_requires_customer_id() {
    let mut api = MockStripeApi::new();
    api.expect_retrieve_customer().never();

    let (status, body) = send(app(api), get("/stripe/customer")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "customer_id is required"}));
}

#[tokio::test]
async fn get_customer_passes_record_through() {
    let record = json!({"id": "cus_1", "object": "customer", "email": "jane@example.com"});
    let returned = record.clone();
    let mut api = MockStripeApi::new();
    api.expect_retrieve_customer()
        .withf(|id: &str| id == "cus_1")
        .times(1)
        .returning(move |_| Ok(returned.clone()));

    let (status, body) = send(app(api), get("/stripe/customer?customer_id=cus_1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, record);
}

#[tokio::test]
async fn get_customer_passes_deleted_marker_through() {
    let mut api = MockStripeApi::new();
    api.expect_retrieve_customer()
        .times(1)
        .returning(|_| Ok(json!({"id": "cus_gone", "object": "customer", "deleted": true})));

    let (status, body) = send(app(api), get("/stripe/customer?customer_id=cus_gone")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], json!(true));
}

#[tokio::test]
async fn create_customer_maps_phone_number() {
    let mut api = MockStripeApi::new();
    api.expect_create_customer()
        .withf(|fields: &CustomerFields| {
            fields.email.as_deref() == Some("jane@example.com")
                && fields.name.as_deref() == Some("Jane Doe")
                && fields.phone.as_deref() == Some("+41790000000")
        })
        .times(1)
        .returning(|_| Ok(json!({"id": "cus_new", "email": "jane@example.com"})));

    let (status, body) = send(
        app(api),
        json_request(
            "POST",
            "/stripe/customer",
            json!({"email": "jane@example.com", "name": "Jane Doe", "phone_number": "+41790000000"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "cus_new");
}

#[tokio::test]
async fn update_customer_requires_customer_id() {
    let mut api = MockStripeApi::new();
    api.expect_update_customer().never();

    let (status, body) = send(
        app(api),
        json_request("PUT", "/stripe/customer", json!({"name": "Jane"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "customer_id is required"}));
}

#[tokio::test]
async fn update_customer_targets_the_queried_customer() {
    let mut api = MockStripeApi::new();
    api.expect_update_customer()
        .withf(|id: &str, fields: &CustomerFields| {
            id == "cus_1" && fields.name.as_deref() == Some("Jane") && fields.email.is_none()
        })
        .times(1)
        .returning(|_, _| Ok(json!({"id": "cus_1", "name": "Jane"})));

    let (status, body) = send(
        app(api),
        json_request("PUT", "/stripe/customer?customer_id=cus_1", json!({"name": "Jane"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "cus_1", "name": "Jane"}));
}

#[tokio::test]
async fn customer_subscriptions_return_bare_array() {
    let mut api = MockStripeApi::new();
    api.expect_list_subscriptions()
        .withf(|id: &str, params: &ListParams| id == "cus_1" && params.limit == Some(100))
        .times(1)
        .returning(|_, _| Ok(list_of(vec![json!({"id": "sub_1"}), json!({"id": "sub_2"})])));

    let (status, body) = send(
        app(api),
        get("/stripe/customer/subscriptions?customer_id=cus_1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": "sub_1"}, {"id": "sub_2"}]));
}

#[tokio::test]
async fn customer_payments_failure_calls_stripe_once() {
    let mut api = MockStripeApi::new();
    api.expect_list_payment_intents()
        .times(1)
        .returning(|_, _| Err(api_failure()));

    let (status, body) = send(app(api), get("/stripe/customer/payments?customer_id=cus_1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));
}

// --- Payments ---

#[tokio::test]
async fn get_payment_requires_payment_id() {
    let mut api = MockStripeApi::new();
    api.expect_retrieve_payment_intent().never();

    let (status, body) = send(app(api), get("/stripe/payments")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "payment_id is required"}));
}

#[tokio::test]
async fn get_payment_provider_failure_is_500() {
    let mut api = MockStripeApi::new();
    api.expect_retrieve_payment_intent()
        .times(1)
        .returning(|_| Err(api_failure()));

    let (status, body) = send(app(api), get("/stripe/payments?payment_id=pi_missing")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn list_payments_forwards_filters() {
    let mut api = MockStripeApi::new();
    api.expect_list_payment_intents()
        .withf(|customer: &Option<String>, params: &ListParams| {
            customer.as_deref() == Some("cus_1")
                && params.limit == Some(5)
                && params.starting_after.as_deref() == Some("pi_9")
        })
        .times(1)
        .returning(|_, _| Ok(list_of(vec![json!({"id": "pi_10"})])));

    let (status, body) = send(
        app(api),
        get("/stripe/payments/list?customer_id=cus_1&limit=5&starting_after=pi_9"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": "pi_10"}]));
}

#[tokio::test]
async fn list_payments_without_filters_lists_everything() {
    let mut api = MockStripeApi::new();
    api.expect_list_payment_intents()
        .withf(|customer: &Option<String>, params: &ListParams| {
            customer.is_none() && *params == ListParams::default()
        })
        .times(1)
        .returning(|_, _| Ok(list_of(vec![])));

    let (status, body) = send(app(api), get("/stripe/payments/list")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn invalid_limits_are_rejected_before_stripe() {
    for limit in ["0", "abc", "101"] {
        let mut api = MockStripeApi::new();
        api.expect_list_payment_intents().never();

        let (status, body) = send(app(api), get(&format!("/stripe/payments/list?limit={}", limit))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "limit={}", limit);
        assert_eq!(
            body,
            json!({"error": "limit must be an integer between 1 and 100"})
        );
    }
}

// --- Products ---

#[tokio::test]
async fn get_products_returns_data_array() {
    let mut api = MockStripeApi::new();
    api.expect_list_products()
        .withf(|params: &ListParams| params.limit == Some(10))
        .times(1)
        .returning(|_| Ok(list_of(vec![json!({"id": "prod_1", "name": "Pro"})])));

    let (status, body) = send(app(api), get("/stripe/products?limit=10")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": "prod_1", "name": "Pro"}]));
}

#[tokio::test]
async fn get_product_requires_product_id() {
    let mut api = MockStripeApi::new();
    api.expect_retrieve_product().never();

    let (status, body) = send(app(api), get("/stripe/products/product?product_id=")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "product_id is required"}));
}

#[tokio::test]
async fn get_product_passes_record_through() {
    let mut api = MockStripeApi::new();
    api.expect_retrieve_product()
        .withf(|id: &str| id == "prod_1")
        .times(1)
        .returning(|_| Ok(json!({"id": "prod_1", "active": true})));

    let (status, body) = send(app(api), get("/stripe/products/product?product_id=prod_1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "prod_1", "active": true}));
}

// --- Subscriptions ---

#[tokio::test]
async fn get_subscription_requires_subscription_id() {
    let mut api = MockStripeApi::new();
    api.expect_retrieve_subscription().never();

    let (status, body) = send(app(api), get("/stripe/subscriptions")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "subscription_id is required"}));
}

#[tokio::test]
async fn list_subscriptions_requires_customer_id() {
    let mut api = MockStripeApi::new();
    api.expect_list_subscriptions().never();

    let (status, body) = send(app(api), get("/stripe/subscriptions/list?limit=10")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "customer_id is required"}));
}

#[tokio::test]
async fn list_subscriptions_returns_data_array() {
    let mut api = MockStripeApi::new();
    api.expect_list_subscriptions()
        .withf(|id: &str, params: &ListParams| id == "cus_1" && params.limit.is_none())
        .times(1)
        .returning(|_, _| Ok(list_of(vec![json!({"id": "sub_1", "status": "active"})])));

    let (status, body) = send(app(api), get("/stripe/subscriptions/list?customer_id=cus_1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": "sub_1", "status": "active"}]));
}

// --- Webhook ---

fn event_payload(event_type: &str, object: Value) -> String {
    json!({
        "id": "evt_test_1",
        "object": "event",
        "type": event_type,
        "created": 1_700_000_000,
        "livemode": false,
        "data": { "object": object }
    })
    .to_string()
}

fn signed(payload: &str) -> String {
    sign_payload(payload.as_bytes(), WEBHOOK_SECRET, Utc::now().timestamp())
}

#[tokio::test]
async fn webhook_without_signature_is_rejected() {
    let payload = event_payload("charge.refunded", json!({"id": "ch_1"}));
    let (status, body) = send(app(MockStripeApi::new()), webhook_request(&payload, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing Stripe signature"}));
}

#[tokio::test]
async fn webhook_without_configured_secret_is_500() {
    let config = StripeConfig {
        webhook_secret: None,
        ..test_config()
    };
    let payload = event_payload("charge.refunded", json!({"id": "ch_1"}));
    let signature = signed(&payload);

    let (status, body) = send(
        app_with_config(MockStripeApi::new(), config),
        webhook_request(&payload, Some(&signature)),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Webhook secret not configured"}));
}

#[tokio::test]
async fn webhook_accepts_every_event_family() {
    let cases = [
        event_payload("customer.subscription.created", json!({"id": "sub_1"})),
        event_payload("customer.subscription.updated", json!({"id": "sub_1"})),
        event_payload("customer.subscription.deleted", json!({"id": "sub_1"})),
        event_payload("payment_intent.succeeded", json!({"id": "pi_1", "amount": 2000})),
        event_payload(
            "payment_intent.payment_failed",
            json!({"id": "pi_2", "last_payment_error": {"message": "Your card was declined."}}),
        ),
        event_payload("charge.refunded", json!({"id": "ch_1", "amount_refunded": 500})),
        event_payload("invoice.paid", json!({"id": "in_1"})),
    ];

    for payload in cases {
        let signature = signed(&payload);
        let (status, body) = send(
            app(MockStripeApi::new()),
            webhook_request(&payload, Some(&signature)),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "payload: {}", payload);
        assert_eq!(body, json!({"message": "Webhook processed successfully"}));
    }
}

#[tokio::test]
async fn webhook_with_tampered_payload_is_rejected() {
    let payload = event_payload("payment_intent.succeeded", json!({"id": "pi_1", "amount": 2000}));
    let signature = signed(&payload);
    let tampered = payload.replace("2000", "1");

    let (status, body) = send(
        app(MockStripeApi::new()),
        webhook_request(&tampered, Some(&signature)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Webhook verification failed"}));
}

#[tokio::test]
async fn webhook_signed_with_other_secret_is_rejected() {
    let payload = event_payload("charge.refunded", json!({"id": "ch_1"}));
    let signature = sign_payload(payload.as_bytes(), "whsec_other", Utc::now().timestamp());

    let (status, body) = send(
        app(MockStripeApi::new()),
        webhook_request(&payload, Some(&signature)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Webhook verification failed"}));
}

#[tokio::test]
async fn webhook_with_expired_timestamp_is_rejected() {
    let payload = event_payload("charge.refunded", json!({"id": "ch_1"}));
    let signature = sign_payload(
        payload.as_bytes(),
        WEBHOOK_SECRET,
        Utc::now().timestamp() - 3_600,
    );

    let (status, _) = send(
        app(MockStripeApi::new()),
        webhook_request(&payload, Some(&signature)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_missing_object_id_is_500() {
    let payload = event_payload("payment_intent.succeeded", json!({"amount": 2000}));
    let signature = signed(&payload);

    let (status, body) = send(
        app(MockStripeApi::new()),
        webhook_request(&payload, Some(&signature)),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn replayed_webhook_is_processed_again() {
    let payload = event_payload("payment_intent.succeeded", json!({"id": "pi_1", "amount": 2000}));
    let signature = signed(&payload);
    let router = app(MockStripeApi::new());

    let first = send(router.clone(), webhook_request(&payload, Some(&signature))).await;
    let second = send(router, webhook_request(&payload, Some(&signature))).await;

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(first, second);
}

// --- Every route ---

/// A mock that fails the test if any Stripe call is made.
fn untouched_api() -> MockStripeApi {
    let mut api = MockStripeApi::new();
    api.expect_list_products().never();
    api.expect_retrieve_product().never();
    api.expect_retrieve_customer().never();
    api.expect_create_customer().never();
    api.expect_update_customer().never();
    api.expect_list_subscriptions().never();
    api.expect_retrieve_subscription().never();
    api.expect_list_payment_intents().never();
    api.expect_retrieve_payment_intent().never();
    api.expect_create_checkout_session().never();
    api
}

fn route_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    match body {
        Some(body) => json_request(method, uri, body),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    }
}

fn checkout_body() -> Value {
    json!({"price_id": "price_123", "success_url": "https://x/ok", "cancel_url": "https://x/cancel"})
}

#[tokio::test]
async fn missing_required_fields_never_reach_stripe() {
    let cases: Vec<(&str, &str, Option<Value>, &str)> = vec![
        ("POST", "/stripe/checkout", Some(json!({"price_id": "price_123"})), "price_id, success_url and cancel_url are required"),
        ("GET", "/stripe/customer", None, "customer_id is required"),
        ("PUT", "/stripe/customer", Some(json!({"name": "Jane"})), "customer_id is required"),
        ("PUT", "/stripe/customer", None, "customer_id is required"),
        ("GET", "/stripe/customer/subscriptions", None, "customer_id is required"),
        ("GET", "/stripe/customer/payments", None, "customer_id is required"),
        ("GET", "/stripe/payments", None, "payment_id is required"),
        ("GET", "/stripe/products/product", None, "product_id is required"),
        ("GET", "/stripe/subscriptions", None, "subscription_id is required"),
        ("GET", "/stripe/subscriptions/list", None, "customer_id is required"),
    ];

    for (method, uri, body, message) in cases {
        let (status, response) = send(app(untouched_api()), route_request(method, uri, body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert_eq!(response, json!({ "error": message }), "{} {}", method, uri);
    }
}

#[tokio::test]
async fn put_customer_without_body_is_still_rejected_after_id_check() {
    let (status, body) = send(
        app(untouched_api()),
        route_request("PUT", "/stripe/customer?customer_id=cus_1", None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_ne!(body["error"], "customer_id is required");
}

type Expect = fn(&mut MockStripeApi);

#[tokio::test]
async fn provider_failure_is_500_after_one_call_on_every_route() {
    let cases: [(&str, &str, Option<Value>, Expect); 12] = [
        ("POST", "/stripe/checkout", Some(checkout_body()), |api| {
            api.expect_create_checkout_session().times(1).returning(|_| Err(api_failure()));
        }),
        ("GET", "/stripe/customer?customer_id=cus_1", None, |api| {
            api.expect_retrieve_customer().times(1).returning(|_| Err(api_failure()));
        }),
        ("POST", "/stripe/customer", Some(json!({"email": "jane@example.com"})), |api| {
            api.expect_create_customer().times(1).returning(|_| Err(api_failure()));
        }),
        ("PUT", "/stripe/customer?customer_id=cus_1", Some(json!({"name": "Jane"})), |api| {
            api.expect_update_customer().times(1).returning(|_, _| Err(api_failure()));
        }),
        ("GET", "/stripe/customer/subscriptions?customer_id=cus_1", None, |api| {
            api.expect_list_subscriptions().times(1).returning(|_, _| Err(api_failure()));
        }),
        ("GET", "/stripe/customer/payments?customer_id=cus_1", None, |api| {
            api.expect_list_payment_intents().times(1).returning(|_, _| Err(api_failure()));
        }),
        ("GET", "/stripe/payments?payment_id=pi_1", None, |api| {
            api.expect_retrieve_payment_intent().times(1).returning(|_| Err(api_failure()));
        }),
        ("GET", "/stripe/payments/list", None, |api| {
            api.expect_list_payment_intents().times(1).returning(|_, _| Err(api_failure()));
        }),
        ("GET", "/stripe/products", None, |api| {
            api.expect_list_products().times(1).returning(|_| Err(api_failure()));
        }),
        ("GET", "/stripe/products/product?product_id=prod_1", None, |api| {
            api.expect_retrieve_product().times(1).returning(|_| Err(api_failure()));
        }),
        ("GET", "/stripe/subscriptions?subscription_id=sub_1", None, |api| {
            api.expect_retrieve_subscription().times(1).returning(|_| Err(api_failure()));
        }),
        ("GET", "/stripe/subscriptions/list?customer_id=cus_1", None, |api| {
            api.expect_list_subscriptions().times(1).returning(|_, _| Err(api_failure()));
        }),
    ];

    for (method, uri, body, expect) in cases {
        let mut api = MockStripeApi::new();
        expect(&mut api);

        let (status, response) = send(app(api), route_request(method, uri, body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{} {}", method, uri);
        assert_eq!(response, json!({"error": "Internal server error"}), "{} {}", method, uri);
    }
}

#[tokio::test]
async fn get_payment_passes_record_through() {
    let record = json!({"id": "pi_1", "object": "payment_intent", "amount": 2000, "status": "succeeded"});
    let returned = record.clone();
    let mut api = MockStripeApi::new();
    api.expect_retrieve_payment_intent()
        .withf(|id: &str| id == "pi_1")
        .times(1)
        .returning(move |_| Ok(returned.clone()));

    let (status, body) = send(app(api), get("/stripe/payments?payment_id=pi_1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, record);
}

#[tokio::test]
async fn get_subscription_passes_record_through() {
    let record = json!({"id": "sub_1", "object": "subscription", "status": "active", "items": {"data": []}});
    let returned = record.clone();
    let mut api = MockStripeApi::new();
    api.expect_retrieve_subscription()
        .withf(|id: &str| id == "sub_1")
        .times(1)
        .returning(move |_| Ok(returned.clone()));

    let (status, body) = send(app(api), get("/stripe/subscriptions?subscription_id=sub_1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, record);
}
