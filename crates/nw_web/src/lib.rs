use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/articles/:id", get(handlers::get_article))
        .route("/api/health", get(handlers::health))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Bind and serve the article API until the task is cancelled.
pub async fn serve(addr: &str, state: AppState) -> nw_core::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::AppState;
    pub use nw_core::{Article, Error, Result};
}
