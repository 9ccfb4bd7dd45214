//! Post model.

use serde::{Deserialize, Serialize};

use super::ids::PostId;
use super::ranking::Generation;

/// 作成時刻（unix epoch 秒）。単調増加する整数として扱う
pub type Timestamp = i64;

/// A ranked piece of content belonging to one group.
///
/// 1 つの post が同時に持つ rank は current と previous の 2 つだけです。
/// `NextContributorID` カウンタは allocator 専用なのでここには載せません。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub group_name: String,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    /// current generation の rank（小さいほど上位）
    pub rank: i64,
    /// previous generation の rank
    pub previous_rank: i64,
    pub score: i64,
}

impl Post {
    /// 指定した generation での rank
    pub fn rank_in(&self, generation: Generation) -> i64 {
        match generation {
            Generation::Current => self.rank,
            Generation::Previous => self.previous_rank,
        }
    }
}
