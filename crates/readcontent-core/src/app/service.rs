//! ReadService - ranking / comment / contributor ID の読み取り API
//!
//! HTTP 層からはデコード済みのクエリパラメータだけを受け取ります。
//! 検証（client error）はゲートウェイに触る前に済ませます。

use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::orchestrator::dual_fetch;
use crate::domain::{Comment, ContributorId, Post, PostId, PostPage, Result, TimedPosts};
use crate::ports::{CommentStore, PostStore, RankingState};
use crate::query::{
    CommentQuery, ListingRange, PostListing, QueryParams, TimeWindow, contributor_target,
};

#[derive(Clone)]
pub struct ReadService {
    rankings: Arc<dyn RankingState>,
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
}

impl ReadService {
    pub fn new(
        rankings: Arc<dyn RankingState>,
        posts: Arc<dyn PostStore>,
        comments: Arc<dyn CommentStore>,
    ) -> Self {
        Self {
            rankings,
            posts,
            comments,
        }
    }

    /// `GET /posts`
    pub async fn list_posts_from_params(&self, params: &QueryParams) -> Result<PostPage> {
        let listing = PostListing::plan(params)?;
        self.list_posts(&listing).await
    }

    #[instrument(skip(self), fields(groups = ?listing.groups))]
    pub async fn list_posts(&self, listing: &PostListing) -> Result<PostPage> {
        let query = listing.query();
        match listing.range {
            ListingRange::Rank(window) => {
                let page = dual_fetch(
                    self.posts.as_ref(),
                    self.rankings.as_ref(),
                    &query,
                    window.requested,
                )
                .await?;
                debug!(rows = page.posts.len(), version = %page.rank_version, "served ranked page");
                Ok(PostPage::Ranked(page))
            }
            ListingRange::Time(window) => {
                let posts = self.posts.fetch_by_time(&query).await?;
                debug!(rows = posts.len(), "served timed page");
                Ok(PostPage::Timed(timed_page(posts, window)))
            }
        }
    }

    /// `GET /comments`
    pub async fn list_comments_from_params(&self, params: &QueryParams) -> Result<Vec<Comment>> {
        let query = CommentQuery::plan(params)?;
        self.list_comments(&query).await
    }

    #[instrument(skip(self))]
    pub async fn list_comments(&self, query: &CommentQuery) -> Result<Vec<Comment>> {
        self.comments.fetch_comments(query).await
    }

    /// `POST /contributor-id`（カウンタを進めるので GET ではない）
    pub async fn issue_contributor_id_from_params(
        &self,
        params: &QueryParams,
    ) -> Result<ContributorId> {
        let post = contributor_target(params)?;
        self.issue_contributor_id(post).await
    }

    #[instrument(skip(self))]
    pub async fn issue_contributor_id(&self, post: PostId) -> Result<ContributorId> {
        let id = self.posts.next_contributor_id(post).await?;
        info!(%post, id, "issued contributor id");
        Ok(ContributorId { id })
    }
}

/// `oldestPost` は要求された `firstTime` があればそれ、なければ返した中で最も古い時刻
fn timed_page(posts: Vec<Post>, window: TimeWindow) -> TimedPosts {
    let oldest_post = window
        .first_time
        .or_else(|| posts.iter().map(|p| p.created_at).min());
    TimedPosts { posts, oldest_post }
}
