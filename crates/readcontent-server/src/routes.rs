//! HTTP handlers.
//!
//! クエリ文字列は `(name, value)` の列としてデコードし、同名パラメータ
//! （`groupName=a&groupName=b`）をそのまま core に渡します。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use readcontent_core::app::ReadService;
use readcontent_core::domain::{Comment, ContributorId, PostPage};
use readcontent_core::query::QueryParams;

use crate::error::AppError;

type Pairs = Query<Vec<(String, String)>>;

pub async fn posts_handler(
    State(service): State<Arc<ReadService>>,
    Query(pairs): Pairs,
) -> Result<Json<PostPage>, AppError> {
    let page = service
        .list_posts_from_params(&QueryParams::from_pairs(pairs))
        .await?;
    Ok(Json(page))
}

pub async fn comments_handler(
    State(service): State<Arc<ReadService>>,
    Query(pairs): Pairs,
) -> Result<Json<Vec<Comment>>, AppError> {
    let comments = service
        .list_comments_from_params(&QueryParams::from_pairs(pairs))
        .await?;
    Ok(Json(comments))
}

pub async fn contributor_id_handler(
    State(service): State<Arc<ReadService>>,
    Query(pairs): Pairs,
) -> Result<Json<ContributorId>, AppError> {
    let id = service
        .issue_contributor_id_from_params(&QueryParams::from_pairs(pairs))
        .await?;
    Ok(Json(id))
}

pub async fn health_handler() -> StatusCode {
    StatusCode::OK
}
