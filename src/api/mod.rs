//! HTTP API
//!
//! ```text
//! /health                      public
//! /auth/*                      public
//! /transactions/*              JWT
//! /payments/*                  JWT
//! /docs, /api-docs/openapi.json
//! ```

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::jwt_auth_middleware;
use state::AppState;

/// Build the complete router.
pub fn router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route("/verify-code", post(handlers::auth::verify_code))
        .route("/reset-password", post(handlers::auth::reset_password));

    let transaction_routes = Router::new()
        .route("/fund", post(handlers::transactions::fund))
        .route("/send", post(handlers::transactions::send_money))
        .route("/balance", get(handlers::transactions::get_balance))
        .route("/history", get(handlers::transactions::get_history))
        .route("/reconcile", get(handlers::transactions::reconcile))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let payment_routes = Router::new()
        .route("/initialize", post(handlers::payments::initialize_payment))
        .route("/verify", post(handlers::payments::verify_payment))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/auth", auth_routes)
        .nest("/transactions", transaction_routes)
        .nest("/payments", payment_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> std::io::Result<()> {
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await.inspect_err(|e| {
        tracing::error!(
            %addr,
            error = %e,
            "Failed to bind; port {} may already be in use",
            port
        );
    })?;

    tracing::info!("Paylink listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        // Keep serving rather than exiting immediately.
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
