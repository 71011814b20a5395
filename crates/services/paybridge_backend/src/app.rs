// File: services/paybridge_backend/src/app.rs
use axum::{routing::get, Router};
use paybridge_config::AppConfig;
use paybridge_stripe::{routes as stripe_routes, StripeApi, StripeClient, StripeError};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, HttpMakeClassifier, TraceLayer};
use tracing::{info, Level};

pub const WELCOME_MESSAGE: &str = "Welcome to the Paybridge API!";

/// Builds the full application router.
///
/// The Stripe client is constructed here, once, so a missing secret key
/// stops the process before it binds a port.
pub fn build_router(config: &AppConfig) -> Result<Router, StripeError> {
    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut router = Router::new().nest("/api", api_router(config)?);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use paybridge_stripe::doc::StripeApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Paybridge API",
                version = "0.1.0",
                description = "Stripe proxy and webhook receiver",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(StripeApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        router = router.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    Ok(router.layer(request_trace_layer()))
}

/// Request spans and response events at INFO so the default filter shows them.
fn request_trace_layer() -> TraceLayer<HttpMakeClassifier> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

fn api_router(config: &AppConfig) -> Result<Router, StripeError> {
    let router = Router::new().route("/", get(|| async { WELCOME_MESSAGE }));

    match config.stripe.as_ref().filter(|_| config.use_stripe) {
        Some(stripe_config) => {
            let client: Arc<dyn StripeApi> = Arc::new(StripeClient::from_config(stripe_config)?);
            info!("Stripe routes enabled");
            Ok(router.merge(stripe_routes(client, Arc::new(stripe_config.clone()))))
        }
        None => {
            info!("Stripe disabled by configuration; /api/stripe routes not mounted");
            Ok(router)
        }
    }
}
