//! CommentStore port - Comments テーブルへのクエリ

use async_trait::async_trait;

use crate::domain::{Comment, Result};
use crate::query::CommentQuery;

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// 親で絞り込み、`query.ordering` の順に全件返す（ページングなし）
    async fn fetch_comments(&self, query: &CommentQuery) -> Result<Vec<Comment>>;
}
