//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    http::Method,
    routing::{get, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use billing_types::BillingRepository;

use super::handlers::{self, AppState};
use crate::BillingService;
use crate::openapi::ApiDoc;

/// HTTP Server for the Billing API.
pub struct HttpServer<R: BillingRepository> {
    state: Arc<AppState<R>>,
}

impl<R: BillingRepository> HttpServer<R> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: BillingService<R>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        // Browser front ends may be served from any origin.
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any);

        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/api/servicio",
                get(handlers::list_servicios::<R>).post(handlers::register_servicio::<R>),
            )
            .route("/api/servicio/{id}", get(handlers::get_servicio::<R>))
            .route(
                "/api/factura",
                get(handlers::list_facturas::<R>).post(handlers::create_factura::<R>),
            )
            .route(
                "/api/factura/{id}",
                get(handlers::get_factura::<R>).delete(handlers::delete_factura::<R>),
            )
            .route("/api/factura/{id}/pagar", put(handlers::pay_factura::<R>))
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .layer(metrics)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
