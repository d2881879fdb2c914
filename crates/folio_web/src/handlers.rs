use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use folio_core::{Article, ArticleId, Error, NewArticle};
use serde_json::json;
use std::sync::Arc;

use crate::AppState;

/// Store errors as HTTP responses. Unknown ids answer `404 {}` like json-server.
pub enum ApiError {
    NotFound,
    Store(Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(_) => Self::NotFound,
            err => Self::Store(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
            Self::Store(err) => {
                tracing::error!("Record store failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": err.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let articles = state.store.list_articles().await?;
    Ok(Json(articles))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let Ok(id) = id.parse::<ArticleId>() else {
        return Err(ApiError::NotFound);
    };
    let article = state.store.get_article(id).await?;
    Ok(Json(article))
}

pub async fn create_article(
    State(state): State<Arc<AppState>>,
    Json(article): Json<NewArticle>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let created = state.store.create_article(&article).await?;
    tracing::info!("📝 Created article {} ({})", created.id, created.title);
    Ok((StatusCode::CREATED, Json(created)))
}
