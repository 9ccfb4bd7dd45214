//! AppBuilder - ReadService の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - 3 つの port（RankingState / PostStore / CommentStore）を注入
//! - build() 時に未設定の port があれば BuildError を返す

use std::sync::Arc;

use super::service::ReadService;
use crate::ports::{CommentStore, PostStore, RankingState};

/// # 使用例
/// ```ignore
/// let store = Arc::new(PgStore::connect(&url, 5).await?);
/// let service = AppBuilder::new().with_store(store).build()?;
/// ```
#[derive(Default)]
pub struct AppBuilder {
    rankings: Option<Arc<dyn RankingState>>,
    posts: Option<Arc<dyn PostStore>>,
    comments: Option<Arc<dyn CommentStore>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing ports: {0:?}. These ports must be wired before build().")]
    MissingPorts(Vec<&'static str>),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rankings(mut self, rankings: Arc<dyn RankingState>) -> Self {
        self.rankings = Some(rankings);
        self
    }

    pub fn posts(mut self, posts: Arc<dyn PostStore>) -> Self {
        self.posts = Some(posts);
        self
    }

    pub fn comments(mut self, comments: Arc<dyn CommentStore>) -> Self {
        self.comments = Some(comments);
        self
    }

    /// 3 つの port を 1 つのゲートウェイでまとめて満たす
    pub fn with_store<S>(self, store: Arc<S>) -> Self
    where
        S: RankingState + PostStore + CommentStore + 'static,
    {
        self.rankings(store.clone())
            .posts(store.clone())
            .comments(store)
    }

    pub fn build(self) -> Result<ReadService, BuildError> {
        match (self.rankings, self.posts, self.comments) {
            (Some(rankings), Some(posts), Some(comments)) => {
                Ok(ReadService::new(rankings, posts, comments))
            }
            (rankings, posts, comments) => {
                let mut missing = Vec::new();
                if rankings.is_none() {
                    missing.push("RankingState");
                }
                if posts.is_none() {
                    missing.push("PostStore");
                }
                if comments.is_none() {
                    missing.push("CommentStore");
                }
                Err(BuildError::MissingPorts(missing))
            }
        }
    }
}
