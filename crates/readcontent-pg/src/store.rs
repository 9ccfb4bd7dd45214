//! PgStore - PostgreSQL 実装の Storage Gateway

use async_trait::async_trait;
use readcontent_core::domain::{
    Comment, CommentId, Generation, Post, PostId, RankVersion, ReadError, RequestedVersion,
    Result, resolve,
};
use readcontent_core::ports::{CommentStore, PostStore, RankedRows, RankingState};
use readcontent_core::query::{CommentQuery, PostQuery};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use crate::sql;

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    group_name: String,
    title: String,
    content: String,
    created_at: i64,
    current_rank: i64,
    previous_rank: i64,
    score: i64,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: PostId::new(row.id),
            group_name: row.group_name,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            rank: row.current_rank,
            previous_rank: row.previous_rank,
            score: row.score,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i64,
    parent_post: i64,
    parent_comment: Option<i64>,
    score: i64,
    created_at: i64,
    content: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: CommentId::new(row.id),
            parent_post: PostId::new(row.parent_post),
            parent_comment: row.parent_comment.map(CommentId::new),
            score: row.score,
            created_at: row.created_at,
            content: row.content,
        }
    }
}

fn storage(err: sqlx::Error) -> ReadError {
    ReadError::storage(err)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> std::result::Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        info!(max_connections, "connected to postgres");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RankingState for PgStore {
    async fn rank_version(&self) -> Result<RankVersion> {
        let version: i64 = sqlx::query_scalar(sql::SELECT_RANK_VERSION)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        Ok(RankVersion::new(version))
    }
}

#[async_trait]
impl PostStore for PgStore {
    /// REPEATABLE READ の読み取り専用トランザクション 1 本の中で
    /// `ranking_state` を読み、その値で rank 列を選んで posts を読む
    async fn fetch_ranked(
        &self,
        query: &PostQuery,
        requested: RequestedVersion,
    ) -> Result<RankedRows> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        sqlx::query(sql::BEGIN_SNAPSHOT)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        let published: i64 = sqlx::query_scalar(sql::SELECT_RANK_VERSION)
            .fetch_one(&mut *tx)
            .await
            .map_err(storage)?;
        let published = RankVersion::new(published);
        let resolution = resolve(requested, published);

        let mut qb = sql::posts(query, resolution.generation);
        debug!(sql = qb.sql(), %published, "fetching ranked posts");
        let rows: Vec<PostRow> = qb
            .build_query_as()
            .fetch_all(&mut *tx)
            .await
            .map_err(storage)?;
        tx.commit().await.map_err(storage)?;

        Ok(RankedRows {
            published,
            resolution,
            posts: rows.into_iter().map(Post::from).collect(),
        })
    }

    async fn fetch_by_time(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let mut qb = sql::posts(query, Generation::Current);
        debug!(sql = qb.sql(), "fetching posts by time");
        let rows: Vec<PostRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    /// 単一の `UPDATE ... RETURNING` による fetch-and-increment
    async fn next_contributor_id(&self, post: PostId) -> Result<i64> {
        let next: Option<i64> = sqlx::query_scalar(sql::NEXT_CONTRIBUTOR_ID)
            .bind(post.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        next.ok_or(ReadError::PostNotFound(post))
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn fetch_comments(&self, query: &CommentQuery) -> Result<Vec<Comment>> {
        let mut qb = sql::comments(query);
        let rows: Vec<CommentRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
