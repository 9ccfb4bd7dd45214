//! SQL rendering for the structured queries.
//!
//! 呼び出し側の値はすべて `push_bind` で渡し、SQL テキストに埋め込むのは
//! この module 内の定数（列名・キーワード）だけです。

use readcontent_core::domain::Generation;
use readcontent_core::query::{CommentOrdering, CommentQuery, PostFilter, PostOrder, PostQuery};
use sqlx::{Postgres, QueryBuilder};

pub(crate) const POST_COLUMNS: &str =
    "id, group_name, title, content, created_at, current_rank, previous_rank, score";

pub(crate) const COMMENT_COLUMNS: &str =
    "id, parent_post, parent_comment, score, created_at, content";

pub(crate) const SELECT_RANK_VERSION: &str = "SELECT rank_version FROM ranking_state LIMIT 1";

pub(crate) const BEGIN_SNAPSHOT: &str =
    "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

pub(crate) const NEXT_CONTRIBUTOR_ID: &str = "UPDATE posts \
     SET next_contributor_id = next_contributor_id + 1 \
     WHERE id = $1 \
     RETURNING next_contributor_id";

fn rank_column(generation: Generation) -> &'static str {
    match generation {
        Generation::Current => "current_rank",
        Generation::Previous => "previous_rank",
    }
}

/// `SELECT ... FROM posts WHERE ... ORDER BY ... LIMIT $n`
pub(crate) fn posts(query: &PostQuery, generation: Generation) -> QueryBuilder<'static, Postgres> {
    let rank = rank_column(generation);
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(POST_COLUMNS).push(" FROM posts");

    if !query.filters.is_empty() {
        qb.push(" WHERE ");
        let mut clauses = qb.separated(" AND ");
        for filter in &query.filters {
            match filter {
                PostFilter::GroupIn(groups) => {
                    clauses
                        .push("group_name = ANY(")
                        .push_bind_unseparated(groups.clone())
                        .push_unseparated(")");
                }
                PostFilter::RankAtLeast(r) => {
                    clauses.push(format!("{rank} >= ")).push_bind_unseparated(*r);
                }
                PostFilter::RankAtMost(r) => {
                    clauses.push(format!("{rank} <= ")).push_bind_unseparated(*r);
                }
                PostFilter::CreatedAtLeast(t) => {
                    clauses.push("created_at >= ").push_bind_unseparated(*t);
                }
                PostFilter::CreatedAtMost(t) => {
                    clauses.push("created_at <= ").push_bind_unseparated(*t);
                }
            }
        }
    }

    match query.order {
        PostOrder::RankAscending => qb.push(format!(" ORDER BY {rank} ASC, id ASC")),
        PostOrder::NewestFirst => qb.push(" ORDER BY created_at DESC, id DESC"),
    };
    qb.push(" LIMIT ").push_bind(i64::from(query.limit));
    qb
}

pub(crate) fn comments(query: &CommentQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(COMMENT_COLUMNS)
        .push(" FROM comments WHERE parent_post = ")
        .push_bind(query.post.get());
    if let Some(parent) = query.comment {
        qb.push(" AND parent_comment = ").push_bind(parent.get());
    }
    qb.push(match query.ordering {
        CommentOrdering::Score => " ORDER BY score DESC, created_at DESC, id ASC",
        CommentOrdering::Time => " ORDER BY created_at DESC, score DESC, id ASC",
    });
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use readcontent_core::domain::{CommentId, PostId};
    use readcontent_core::query::{PostListing, QueryParams};
    use rstest::rstest;

    fn listing(pairs: &[(&str, &str)]) -> PostQuery {
        PostListing::plan(&QueryParams::from_pairs(pairs.iter().copied()))
            .unwrap()
            .query()
    }

    #[rstest]
    #[case::current(Generation::Current, "current_rank")]
    #[case::previous(Generation::Previous, "previous_rank")]
    fn rank_query_reads_the_generation_column(
        #[case] generation: Generation,
        #[case] column: &str,
    ) {
        let query = listing(&[("groupName", "g1"), ("firstRank", "3"), ("lastRank", "9")]);
        let sql = posts(&query, generation).sql().to_owned();
        assert_eq!(
            sql,
            format!(
                "SELECT {POST_COLUMNS} FROM posts WHERE group_name = ANY($1) AND {column} >= $2 \
                 AND {column} <= $3 ORDER BY {column} ASC, id ASC LIMIT $4"
            )
        );
    }

    #[test]
    fn caller_values_never_reach_the_sql_text() {
        let hostile = "g1'); DROP TABLE posts; --";
        let query = listing(&[("groupName", hostile), ("ordering", "time"), ("firstTime", "12345")]);
        let sql = posts(&query, Generation::Current).sql().to_owned();
        assert!(!sql.contains("DROP"));
        assert!(!sql.contains("12345"));
        assert!(sql.contains("created_at >= $2"));
        assert!(sql.ends_with("ORDER BY created_at DESC, id DESC LIMIT $3"));
    }

    #[test]
    fn open_time_window_has_only_the_group_filter() {
        let query = listing(&[("groupName", "g1"), ("ordering", "time")]);
        let sql = posts(&query, Generation::Current).sql().to_owned();
        assert!(sql.contains("WHERE group_name = ANY($1) ORDER BY"));
    }

    #[test]
    fn comment_query_binds_both_parents() {
        let query = CommentQuery {
            post: PostId::new(10),
            comment: Some(CommentId::new(3)),
            ordering: CommentOrdering::Time,
        };
        let sql = comments(&query).sql().to_owned();
        assert_eq!(
            sql,
            format!(
                "SELECT {COMMENT_COLUMNS} FROM comments WHERE parent_post = $1 \
                 AND parent_comment = $2 ORDER BY created_at DESC, score DESC, id ASC"
            )
        );
    }

    #[test]
    fn thread_query_binds_only_the_post() {
        let query = CommentQuery {
            post: PostId::new(10),
            comment: None,
            ordering: CommentOrdering::Score,
        };
        let sql = comments(&query).sql().to_owned();
        assert!(sql.contains("WHERE parent_post = $1 ORDER BY score DESC"));
        assert!(!sql.contains("$2"));
    }
}
