use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;

use nw_core::{Article, ArticleStore, SummaryStatus};
use crate::AppState;

type ApiError = (StatusCode, Json<Value>);

fn internal_error(e: impl std::fmt::Display) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
}

#[derive(Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let statuses = match params.status.as_deref() {
        Some(raw) => {
            let status = SummaryStatus::from_str(raw).map_err(|_| {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": format!("Unknown status: {}", raw) })))
            })?;
            vec![status]
        }
        None => vec![SummaryStatus::Pending, SummaryStatus::Success, SummaryStatus::Failed],
    };

    let mut articles = Vec::new();
    for status in statuses {
        articles.extend(
            state.store.list_by_status(status).await.map_err(internal_error)?,
        );
    }
    Ok(Json(articles))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let article = state.store.get_article(&id).await.map_err(internal_error)?;
    article.map(Json).ok_or((
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("Article not found: {}", id) })),
    ))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let pending = state
        .store
        .count_by_status(SummaryStatus::Pending)
        .await
        .map_err(internal_error)?;
    Ok(Json(json!({ "status": "ok", "pending_articles": pending })))
}
