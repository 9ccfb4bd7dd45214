//! Query planning: decoded request parameters → structured, bind-only queries.

pub mod comments;
pub mod params;
pub mod posts;

pub use self::comments::{CommentOrdering, CommentQuery};
pub use self::params::QueryParams;
pub use self::posts::{
    DEFAULT_MAX_COUNT, ListingRange, PostFilter, PostListing, PostOrder, PostOrdering, PostQuery,
    RankWindow, TimeWindow,
};

use crate::domain::{PostId, ReadError, Result};

/// Contributor ID 発行リクエストの `postId`
pub fn contributor_target(params: &QueryParams) -> Result<PostId> {
    params
        .int("postId")?
        .map(PostId::new)
        .ok_or(ReadError::MissingParameter("postId"))
}
