//! Errors - エラー型と分類

use thiserror::Error;

use super::ids::PostId;

/// ErrorKind はエラーの運用分類
///
/// - Client: リクエストの不備（クエリは発行しない）
/// - NotFound: 対象 post が存在しない
/// - Upstream: Storage Gateway の失敗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Client,
    NotFound,
    Upstream,
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("invalid value for `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("at least one `groupName` is required")]
    NoGroups,

    #[error("{0} not found")]
    PostNotFound(PostId),

    #[error("storage failure: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ReadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReadError::MissingParameter(_)
            | ReadError::InvalidParameter { .. }
            | ReadError::NoGroups => ErrorKind::Client,
            ReadError::PostNotFound(_) => ErrorKind::NotFound,
            ReadError::Storage(_) => ErrorKind::Upstream,
        }
    }

    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ReadError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// 任意のエラーを upstream failure として包む
    pub fn storage(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ReadError::Storage(err.into())
    }
}

pub type Result<T> = std::result::Result<T, ReadError>;
