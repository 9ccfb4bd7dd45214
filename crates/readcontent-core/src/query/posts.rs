//! Pagination planner for post listings.
//!
//! クライアントの範囲指定（rank / time、group の和集合）を、
//! 値を直接埋め込まない構造化クエリ `PostQuery` に変換します。
//! SQL への変換はゲートウェイ側の仕事で、ここでは句の並びを組み立てるだけです。

use tracing::debug;

use super::params::QueryParams;
use crate::domain::{Generation, Post, ReadError, RequestedVersion, Result, Timestamp};

/// `maxCount` 省略時の上限
pub const DEFAULT_MAX_COUNT: u32 = 1000;
/// `lastRank` 省略時の窓の幅（`firstRank + 1000`）
pub const DEFAULT_RANK_SPAN: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostOrdering {
    #[default]
    Rank,
    Time,
}

impl PostOrdering {
    fn parse(raw: Option<&str>) -> Result<Self> {
        match raw {
            None | Some("rank") => Ok(PostOrdering::Rank),
            Some("time") => Ok(PostOrdering::Time),
            Some(other) => Err(ReadError::invalid(
                "ordering",
                format!("`{other}` is not one of rank, time"),
            )),
        }
    }
}

/// rank モードの窓 `[first_rank, last_rank]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankWindow {
    pub first_rank: i64,
    pub last_rank: i64,
    pub max_count: u32,
    pub requested: RequestedVersion,
}

/// time モードの窓 `[first_time, last_time]`（省略側は無制限）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub first_time: Option<Timestamp>,
    pub last_time: Option<Timestamp>,
    pub max_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingRange {
    Rank(RankWindow),
    Time(TimeWindow),
}

/// 1 回の post 一覧リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListing {
    pub groups: Vec<String>,
    pub range: ListingRange,
}

impl PostListing {
    /// クエリパラメータを検証して listing を組み立てる
    ///
    /// 不正な値・group なしはすべて client error（クエリは発行されない）。
    pub fn plan(params: &QueryParams) -> Result<Self> {
        let groups = parse_groups(params)?;
        let ordering = PostOrdering::parse(params.first("ordering"))?;
        let max_count = parse_max_count(params)?;

        let range = match ordering {
            PostOrdering::Rank => {
                let first_rank = params.int("firstRank")?.unwrap_or(0);
                let last_rank = params
                    .int("lastRank")?
                    .unwrap_or_else(|| first_rank.saturating_add(DEFAULT_RANK_SPAN));
                let requested = match params.int("rankVersion")? {
                    None => RequestedVersion::Latest,
                    Some(raw) => RequestedVersion::from_wire(raw).ok_or_else(|| {
                        ReadError::invalid("rankVersion", format!("`{raw}` is neither -1 nor a version"))
                    })?,
                };
                ListingRange::Rank(RankWindow {
                    first_rank,
                    last_rank,
                    max_count,
                    requested,
                })
            }
            PostOrdering::Time => ListingRange::Time(TimeWindow {
                first_time: params.int("firstTime")?,
                last_time: params.int("lastTime")?,
                max_count,
            }),
        };

        let listing = Self { groups, range };
        debug!(?listing, "planned post listing");
        Ok(listing)
    }

    /// ゲートウェイに渡す構造化クエリ
    pub fn query(&self) -> PostQuery {
        let mut filters = vec![PostFilter::GroupIn(self.groups.clone())];
        match self.range {
            ListingRange::Rank(w) => {
                filters.push(PostFilter::RankAtLeast(w.first_rank));
                filters.push(PostFilter::RankAtMost(w.last_rank));
                PostQuery {
                    filters,
                    order: PostOrder::RankAscending,
                    limit: w.max_count,
                }
            }
            ListingRange::Time(w) => {
                if let Some(t) = w.first_time {
                    filters.push(PostFilter::CreatedAtLeast(t));
                }
                if let Some(t) = w.last_time {
                    filters.push(PostFilter::CreatedAtMost(t));
                }
                PostQuery {
                    filters,
                    order: PostOrder::NewestFirst,
                    limit: w.max_count,
                }
            }
        }
    }
}

/// `groupName` は複数回指定でき、1 つの値にカンマ区切りで並べてもよい
fn parse_groups(params: &QueryParams) -> Result<Vec<String>> {
    let mut groups: Vec<String> = Vec::new();
    for raw in params.all("groupName") {
        for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !groups.iter().any(|g| g == name) {
                groups.push(name.to_string());
            }
        }
    }
    if groups.is_empty() {
        return Err(ReadError::NoGroups);
    }
    Ok(groups)
}

fn parse_max_count(params: &QueryParams) -> Result<u32> {
    match params.int("maxCount")? {
        None => Ok(DEFAULT_MAX_COUNT),
        Some(n) => u32::try_from(n)
            .map_err(|_| ReadError::invalid("maxCount", format!("`{n}` is out of range"))),
    }
}

/// 1 つの絞り込み条件。値は必ず bind パラメータとして扱われる
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// group の和集合
    GroupIn(Vec<String>),
    /// 読んでいる generation の rank が下限以上
    RankAtLeast(i64),
    RankAtMost(i64),
    CreatedAtLeast(Timestamp),
    CreatedAtMost(Timestamp),
}

impl PostFilter {
    pub fn matches(&self, post: &Post, generation: Generation) -> bool {
        match self {
            PostFilter::GroupIn(groups) => groups.iter().any(|g| *g == post.group_name),
            PostFilter::RankAtLeast(r) => post.rank_in(generation) >= *r,
            PostFilter::RankAtMost(r) => post.rank_in(generation) <= *r,
            PostFilter::CreatedAtLeast(t) => post.created_at >= *t,
            PostFilter::CreatedAtMost(t) => post.created_at <= *t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrder {
    RankAscending,
    /// created_at 降順（新しい順）
    NewestFirst,
}

/// 構造化された post クエリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub filters: Vec<PostFilter>,
    pub order: PostOrder,
    pub limit: u32,
}

impl PostQuery {
    pub fn matches(&self, post: &Post, generation: Generation) -> bool {
        self.filters.iter().all(|f| f.matches(post, generation))
    }

    /// in-memory 実装向けの評価（filter → sort → limit）
    pub fn apply<'a, I>(&self, posts: I, generation: Generation) -> Vec<Post>
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut selected: Vec<Post> = posts
            .into_iter()
            .filter(|p| self.matches(p, generation))
            .cloned()
            .collect();
        match self.order {
            PostOrder::RankAscending => {
                selected.sort_by_key(|p| (p.rank_in(generation), p.id));
            }
            PostOrder::NewestFirst => {
                selected.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            }
        }
        selected.truncate(self.limit as usize);
        selected
    }
}
