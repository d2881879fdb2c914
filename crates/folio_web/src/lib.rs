//! Development record store: the three `/blogs` routes over any [`RecordStore`].
//!
//! [`RecordStore`]: folio_core::RecordStore

use axum::{
    routing::get,
    Router,
};
use folio_core::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/blogs", get(handlers::list_articles).post(handlers::create_article))
        .route("/blogs/:id", get(handlers::get_article))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Record store listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use folio_core::{Article, Error, Result};
}
