//! Backend service for the SKL app: avatar uploads proxied to an external
//! image host, and submission/withdrawal records with best-effort admin
//! notification fan-out against a document store.
//!
//! The binary in `main.rs` wires configuration, telemetry, and graceful
//! shutdown around [`Application`].

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Json, Router};
use bon::Builder;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};
use utoipa::OpenApi;

pub mod api;
pub mod config;
pub mod errors;
pub mod image_host;
pub mod notifications;
mod openapi;
pub mod store;
pub mod telemetry;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
use image_host::ImageHostClient;
use notifications::recipients::RoleRecipientResolver;
use notifications::service::NotificationService;
use store::DocumentStore;

/// Shared handler state.
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub image_host: ImageHostClient,
    pub store: Arc<dyn DocumentStore>,
    pub notifier: Arc<NotificationService>,
}

async fn health() -> &'static str {
    "ok"
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit();

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_spec))
        .route(
            "/api/v1/uploads/avatar",
            post(api::handlers::avatars::upload_avatar),
        )
        .route(
            "/api/v1/submissions",
            post(api::handlers::submissions::create_submission),
        )
        .route(
            "/api/v1/withdrawals",
            post(api::handlers::withdrawals::create_withdrawal),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .with_state(state)
}

/// A fully wired application, ready to serve or hand to a test server.
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized.
    pub fn new(config: Config) -> Self {
        tracing::debug!("Starting service with configuration: {:#?}", config);

        let image_host = ImageHostClient::new(&config.image_host);
        let store = store::create_store(&config.document_store);
        let resolver = Arc::new(RoleRecipientResolver::new(store.clone()));
        let notifier = Arc::new(NotificationService::new(store.clone(), resolver));

        let state = AppState::builder()
            .config(config.clone())
            .image_host(image_host)
            .store(store)
            .notifier(notifier)
            .build();

        let router = build_router(state);

        Self { router, config }
    }

    /// Convert application into a test server (for tests).
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application.
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Service listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
