//! Comment model.

use serde::{Deserialize, Serialize};

use super::ids::{CommentId, PostId};
use super::post::Timestamp;

/// A comment in a post's discussion thread.
///
/// すべての comment は所属 post を持ちます。`parent_comment` が `None` なら
/// post 直下、`Some` ならその comment への返信です。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub parent_post: PostId,
    pub parent_comment: Option<CommentId>,
    pub score: i64,
    pub created_at: Timestamp,
    pub content: String,
}

/// 直接の親
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentParent {
    Post(PostId),
    Comment(CommentId),
}

impl Comment {
    pub fn parent(&self) -> CommentParent {
        match self.parent_comment {
            Some(comment) => CommentParent::Comment(comment),
            None => CommentParent::Post(self.parent_post),
        }
    }
}
