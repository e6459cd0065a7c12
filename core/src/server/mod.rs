//! REST surface over the invoice tools and agent.

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ServerError};
pub use state::AppState;

use axum::Router;
use axum::routing::{get, post};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/invoices", get(routes::list_invoices))
        .route("/invoices/process", post(routes::process_invoice))
        .route(
            "/invoices/{invoice_number}",
            get(routes::get_invoice).delete(routes::delete_invoice),
        )
        .route("/agent/process", post(routes::agent_process))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), ServerError> {
    info!(%addr, "Binding REST server");

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "REST server ready to accept connections");

    axum::serve(listener, router(state).into_make_service())
        .await
        .map_err(ServerError::Serve)
}
