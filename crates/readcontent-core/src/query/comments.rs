//! Comment subtree queries.

use std::cmp::Ordering;

use super::params::QueryParams;
use crate::domain::ids::{Id, IdMarker};
use crate::domain::{Comment, CommentId, PostId, ReadError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentOrdering {
    /// score 降順、同点は新しい順
    #[default]
    Score,
    /// 新しい順、同時刻は score 降順
    Time,
}

impl CommentOrdering {
    fn parse(raw: Option<&str>) -> Result<Self> {
        match raw {
            None | Some("score") => Ok(CommentOrdering::Score),
            Some("time") => Ok(CommentOrdering::Time),
            Some(other) => Err(ReadError::invalid(
                "ordering",
                format!("`{other}` is not one of score, time"),
            )),
        }
    }

    pub fn compare(&self, a: &Comment, b: &Comment) -> Ordering {
        let by_score = b.score.cmp(&a.score);
        let by_time = b.created_at.cmp(&a.created_at);
        match self {
            CommentOrdering::Score => by_score.then(by_time),
            CommentOrdering::Time => by_time.then(by_score),
        }
    }
}

/// 親の指定
///
/// 親 comment を指すときも所属 post を必ず併記させます。
/// post と comment が食い違っていればただの 0 件です。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentQuery {
    pub post: PostId,
    pub comment: Option<CommentId>,
    pub ordering: CommentOrdering,
}

impl CommentQuery {
    pub fn plan(params: &QueryParams) -> Result<Self> {
        let post = parse_id(params, "parentPost")?.ok_or(ReadError::MissingParameter("parentPost"))?;
        let comment = parse_id(params, "parentComment")?;
        let ordering = CommentOrdering::parse(params.first("ordering"))?;
        Ok(Self {
            post,
            comment,
            ordering,
        })
    }

    /// `comment` なし → post のスレッド全体、あり → その comment への直接の返信
    pub fn matches(&self, comment: &Comment) -> bool {
        if comment.parent_post != self.post {
            return false;
        }
        match self.comment {
            None => true,
            Some(parent) => comment.parent_comment == Some(parent),
        }
    }

    /// in-memory 実装向けの評価（ページングなし）
    pub fn apply<'a, I>(&self, comments: I) -> Vec<Comment>
    where
        I: IntoIterator<Item = &'a Comment>,
    {
        let mut selected: Vec<Comment> = comments
            .into_iter()
            .filter(|c| self.matches(c))
            .cloned()
            .collect();
        selected.sort_by(|a, b| self.ordering.compare(a, b).then(a.id.cmp(&b.id)));
        selected
    }
}

fn parse_id<T: IdMarker>(params: &QueryParams, name: &'static str) -> Result<Option<Id<T>>> {
    Ok(params.int(name)?.map(Id::new))
}
