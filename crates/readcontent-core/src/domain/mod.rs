//! Domain model (IDs, posts, comments, ranking generations, errors).

pub mod comment;
pub mod errors;
pub mod ids;
pub mod page;
pub mod post;
pub mod ranking;

pub use self::comment::{Comment, CommentParent};
pub use self::errors::{ErrorKind, ReadError, Result};
pub use self::ids::{CommentId, PostId};
pub use self::page::{ContributorId, PostPage, RankedPosts, TimedPosts};
pub use self::post::{Post, Timestamp};
pub use self::ranking::{Generation, RankVersion, RequestedVersion, Resolution, resolve};
