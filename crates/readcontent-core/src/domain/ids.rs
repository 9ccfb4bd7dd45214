//! Domain identifiers (strongly-typed IDs).
//!
//! Posts と Comments はリレーショナルストアの整数主キーで識別されます。
//! Phantom type パターンで `PostId` と `CommentId` を別の型にしつつ、
//! 実装は `Id<T>` に一本化しています。
//!
//! ## Wire format
//! JSON ではただの整数として出し入れします（`#[serde(transparent)]`）。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"post-", "comment-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// # 例
/// ```ignore
/// let post: PostId = Id::new(42);
/// let comment: CommentId = Id::new(42);
/// // post と comment は異なる型なので、混同できない
/// ```
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    value: i64,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub const fn new(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// ストアに bind する生の値
    pub const fn get(&self) -> i64 {
        self.value
    }
}

impl<T: IdMarker> From<i64> for Id<T> {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> FromStr for Id<T> {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self::new)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.value)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Post のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PostMarker {}

impl IdMarker for PostMarker {
    fn prefix() -> &'static str {
        "post-"
    }
}

/// Comment のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommentMarker {}

impl IdMarker for CommentMarker {
    fn prefix() -> &'static str {
        "comment-"
    }
}

/// Identifier of a Post.
pub type PostId = Id<PostMarker>;

/// Identifier of a Comment.
pub type CommentId = Id<CommentMarker>;
