//! Response shapes for post listings and allocator results.

use serde::{Deserialize, Serialize};

use super::post::{Post, Timestamp};
use super::ranking::RankVersion;

/// rank 順リストのレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPosts {
    pub posts: Vec<Post>,
    /// 実際に読んだ世代
    pub rank_version: RankVersion,
}

/// 時刻順リストのレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedPosts {
    pub posts: Vec<Post>,
    /// 次のページを遡るための基準時刻
    pub oldest_post: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostPage {
    Ranked(RankedPosts),
    Timed(TimedPosts),
}

impl PostPage {
    pub fn posts(&self) -> &[Post] {
        match self {
            PostPage::Ranked(page) => &page.posts,
            PostPage::Timed(page) => &page.posts,
        }
    }
}

/// Contributor ID allocator の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorId {
    pub id: i64,
}
