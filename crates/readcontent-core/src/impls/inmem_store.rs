//! InMemoryStore - 開発・テスト用の Storage Gateway
//!
//! 1 本の `RwLock` で dataset 全体を守ることで、リレーショナルストアが
//! 提供する一貫性を再現します。
//! - `fetch_ranked` は read lock 1 回の中で version 確認と列選択を行う
//! - `publish_ranking` は write lock 1 回の中で current→previous の退避と version の更新を行う
//! - `next_contributor_id` は write lock 1 回の中で fetch-and-increment を行う

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{
    Comment, Generation, Post, PostId, RankVersion, ReadError, RequestedVersion, Result, resolve,
};
use crate::ports::{CommentStore, PostStore, RankedRows, RankingState};
use crate::query::{CommentQuery, PostQuery};

struct PostRow {
    post: Post,
    next_contributor_id: i64,
}

struct Dataset {
    rank_version: RankVersion,
    posts: BTreeMap<PostId, PostRow>,
    comments: Vec<Comment>,
}

pub struct InMemoryStore {
    data: RwLock<Dataset>,
}

impl InMemoryStore {
    pub fn new(rank_version: RankVersion) -> Self {
        Self {
            data: RwLock::new(Dataset {
                rank_version,
                posts: BTreeMap::new(),
                comments: Vec::new(),
            }),
        }
    }

    /// カウンタ 0 で post を追加（同じ id は上書き）
    pub async fn insert_post(&self, post: Post) {
        self.insert_post_with_counter(post, 0).await;
    }

    pub async fn insert_post_with_counter(&self, post: Post, next_contributor_id: i64) {
        let mut data = self.data.write().await;
        data.posts.insert(
            post.id,
            PostRow {
                post,
                next_contributor_id,
            },
        );
    }

    pub async fn insert_comment(&self, comment: Comment) {
        self.data.write().await.comments.push(comment);
    }

    /// 再計算ジョブの publish を模倣する
    ///
    /// 全 post の current rank を previous に移し、`ranks` にある post は新しい
    /// current rank を、無い post は従来の値を引き継ぎます。最後に version を 1 進めます。
    pub async fn publish_ranking(&self, ranks: &HashMap<PostId, i64>) -> RankVersion {
        let mut data = self.data.write().await;
        for row in data.posts.values_mut() {
            let current = row.post.rank;
            row.post.previous_rank = current;
            row.post.rank = ranks.get(&row.post.id).copied().unwrap_or(current);
        }
        data.rank_version = data.rank_version.next();
        debug!(version = %data.rank_version, "published ranking");
        data.rank_version
    }

    /// テスト用: post のカウンタの現在値
    pub async fn contributor_counter(&self, post: PostId) -> Option<i64> {
        self.data
            .read()
            .await
            .posts
            .get(&post)
            .map(|row| row.next_contributor_id)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(RankVersion::new(0))
    }
}

#[async_trait]
impl RankingState for InMemoryStore {
    async fn rank_version(&self) -> Result<RankVersion> {
        Ok(self.data.read().await.rank_version)
    }
}

#[async_trait]
impl PostStore for InMemoryStore {
    async fn fetch_ranked(
        &self,
        query: &PostQuery,
        requested: RequestedVersion,
    ) -> Result<RankedRows> {
        let data = self.data.read().await;
        let published = data.rank_version;
        let resolution = resolve(requested, published);
        let posts = query.apply(data.posts.values().map(|row| &row.post), resolution.generation);
        Ok(RankedRows {
            published,
            resolution,
            posts,
        })
    }

    async fn fetch_by_time(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let data = self.data.read().await;
        Ok(query.apply(data.posts.values().map(|row| &row.post), Generation::Current))
    }

    async fn next_contributor_id(&self, post: PostId) -> Result<i64> {
        let mut data = self.data.write().await;
        let row = data.posts.get_mut(&post).ok_or(ReadError::PostNotFound(post))?;
        row.next_contributor_id = row
            .next_contributor_id
            .checked_add(1)
            .ok_or_else(|| ReadError::storage("contributor id counter overflow"))?;
        Ok(row.next_contributor_id)
    }
}

#[async_trait]
impl CommentStore for InMemoryStore {
    async fn fetch_comments(&self, query: &CommentQuery) -> Result<Vec<Comment>> {
        Ok(query.apply(self.data.read().await.comments.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{PostListing, QueryParams};

    fn post(id: i64, rank: i64) -> Post {
        Post {
            id: PostId::new(id),
            group_name: "g1".to_string(),
            title: format!("post {id}"),
            content: String::new(),
            created_at: id,
            rank,
            previous_rank: rank,
            score: 0,
        }
    }

    fn rank_query() -> PostQuery {
        PostListing::plan(&QueryParams::from_pairs([("groupName", "g1")]))
            .unwrap()
            .query()
    }

    #[tokio::test]
    async fn publish_shifts_current_into_previous() {
        let store = InMemoryStore::new(RankVersion::new(1));
        store.insert_post(post(1, 0)).await;
        store.insert_post(post(2, 1)).await;

        let ranks = HashMap::from([(PostId::new(1), 1), (PostId::new(2), 0)]);
        let version = store.publish_ranking(&ranks).await;
        assert_eq!(version, RankVersion::new(2));

        let latest = store
            .fetch_ranked(&rank_query(), RequestedVersion::Latest)
            .await
            .unwrap();
        assert_eq!(latest.published, RankVersion::new(2));
        let ids: Vec<i64> = latest.posts.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![2, 1]);

        let previous = store
            .fetch_ranked(&rank_query(), RequestedVersion::Exact(RankVersion::new(1)))
            .await
            .unwrap();
        assert_eq!(previous.resolution.generation, Generation::Previous);
        let ids: Vec<i64> = previous.posts.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn contributor_ids_increment_from_the_initial_counter() {
        let store = InMemoryStore::default();
        store.insert_post_with_counter(post(1, 0), 10).await;

        assert_eq!(store.next_contributor_id(PostId::new(1)).await.unwrap(), 11);
        assert_eq!(store.next_contributor_id(PostId::new(1)).await.unwrap(), 12);
        assert_eq!(store.contributor_counter(PostId::new(1)).await, Some(12));
    }

    #[tokio::test]
    async fn exhausted_counter_is_a_storage_error() {
        let store = InMemoryStore::default();
        store.insert_post_with_counter(post(1, 0), i64::MAX).await;

        let err = store.next_contributor_id(PostId::new(1)).await.unwrap_err();
        assert_eq!(err.kind(), crate::domain::ErrorKind::Upstream);
        assert_eq!(store.contributor_counter(PostId::new(1)).await, Some(i64::MAX));
    }

    #[tokio::test]
    async fn missing_post_does_not_create_a_counter() {
        let store = InMemoryStore::default();
        let err = store.next_contributor_id(PostId::new(9)).await.unwrap_err();
        assert!(matches!(err, ReadError::PostNotFound(id) if id == PostId::new(9)));
        assert_eq!(store.contributor_counter(PostId::new(9)).await, None);
    }
}
