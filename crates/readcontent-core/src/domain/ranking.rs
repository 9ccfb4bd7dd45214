//! Ranking generations and the rank version resolver.
//!
//! バックグラウンドの再計算ジョブは、1 回の publish で
//! (a) current rank を書き込み、(b) 旧 current を previous に退避し、
//! (c) `RankVersion` を 1 つ進めます。この 3 つはアトミックです。
//!
//! 読み取り側が見られるのは「最新」と「1 世代前」の 2 つだけです。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire 上で「最新」を意味する rankVersion
pub const LATEST_SENTINEL: i64 = -1;

/// RankVersion は publish ごとに 1 ずつ増える世代番号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankVersion(i64);

impl RankVersion {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(&self) -> i64 {
        self.0
    }

    /// 1 世代前
    pub const fn previous(&self) -> Self {
        Self(self.0 - 1)
    }

    /// 次の世代（publish 用）
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RankVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// クライアントが要求したバージョン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestedVersion {
    /// `rankVersion` 省略、または `-1`
    #[default]
    Latest,
    Exact(RankVersion),
}

impl RequestedVersion {
    /// wire 表現（`-1` = latest）から変換
    ///
    /// `-1` 以外の負数は `None`（呼び出し側で client error にする）。
    pub fn from_wire(value: i64) -> Option<Self> {
        match value {
            LATEST_SENTINEL => Some(Self::Latest),
            v if v >= 0 => Some(Self::Exact(RankVersion::new(v))),
            _ => None,
        }
    }
}

/// どちらの rank 列を読むか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generation {
    /// current rank（現行バージョンで有効）
    Current,
    /// previous rank（直前のバージョンで有効）
    Previous,
}

/// Resolution は resolver の判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// レスポンスに載せるバージョン
    pub effective: RankVersion,
    /// データクエリが読む列
    pub generation: Generation,
    /// 要求された世代がもう（あるいはまだ）存在しない
    pub unavailable: bool,
}

/// requested と published から実効バージョンと読む列を決める
///
/// - `Latest` または `requested == published` → current 列、`published` を返す
/// - それ以外（`requested > published` を含む）→ previous 列、`published - 1` を返す
///
/// previous 列が要求された世代と一致するのは `requested == published - 1` のときだけです。
/// それ以外は `unavailable` を立てます。
///
/// `published == 0` で一致しない要求は `effective = -1` になり、wire 上の
/// `LATEST_SENTINEL` と同じ値です。その値を送り返したクライアントは latest を読みます。
/// 前の世代が存在しないので、この場合は常に `unavailable` です。
pub fn resolve(requested: RequestedVersion, published: RankVersion) -> Resolution {
    match requested {
        RequestedVersion::Latest => Resolution {
            effective: published,
            generation: Generation::Current,
            unavailable: false,
        },
        RequestedVersion::Exact(v) if v == published => Resolution {
            effective: published,
            generation: Generation::Current,
            unavailable: false,
        },
        RequestedVersion::Exact(v) => Resolution {
            effective: published.previous(),
            generation: Generation::Previous,
            unavailable: v != published.previous(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn latest_reads_current_generation() {
        let r = resolve(RequestedVersion::Latest, RankVersion::new(5));
        assert_eq!(r.effective, RankVersion::new(5));
        assert_eq!(r.generation, Generation::Current);
        assert!(!r.unavailable);
    }

    #[test]
    fn matching_version_reads_current_generation() {
        let r = resolve(RequestedVersion::Exact(RankVersion::new(5)), RankVersion::new(5));
        assert_eq!(r.effective, RankVersion::new(5));
        assert_eq!(r.generation, Generation::Current);
        assert!(!r.unavailable);
    }

    #[test]
    fn one_generation_back_reads_previous_generation() {
        let r = resolve(RequestedVersion::Exact(RankVersion::new(4)), RankVersion::new(5));
        assert_eq!(r.effective, RankVersion::new(4));
        assert_eq!(r.generation, Generation::Previous);
        assert!(!r.unavailable);
    }

    #[rstest]
    #[case::evicted(3, 5)]
    #[case::long_gone(0, 5)]
    #[case::ahead_of_publisher(6, 5)]
    #[case::nothing_published_yet(3, 0)]
    fn other_versions_fall_back_to_previous_and_are_flagged(
        #[case] requested: i64,
        #[case] published: i64,
    ) {
        let r = resolve(
            RequestedVersion::Exact(RankVersion::new(requested)),
            RankVersion::new(published),
        );
        assert_eq!(r.effective, RankVersion::new(published - 1));
        assert_eq!(r.generation, Generation::Previous);
        assert!(r.unavailable);
    }

    #[test]
    fn first_generation_fallback_collides_with_the_latest_sentinel() {
        let r = resolve(RequestedVersion::Exact(RankVersion::new(1)), RankVersion::new(0));
        assert_eq!(r.effective.get(), LATEST_SENTINEL);
        assert!(r.unavailable);
        assert_eq!(
            RequestedVersion::from_wire(r.effective.get()),
            Some(RequestedVersion::Latest)
        );
    }

    #[rstest]
    #[case::latest(-1, Some(RequestedVersion::Latest))]
    #[case::zero(0, Some(RequestedVersion::Exact(RankVersion::new(0))))]
    #[case::positive(9, Some(RequestedVersion::Exact(RankVersion::new(9))))]
    #[case::negative(-2, None)]
    fn wire_values_map_to_requests(#[case] raw: i64, #[case] expected: Option<RequestedVersion>) {
        assert_eq!(RequestedVersion::from_wire(raw), expected);
    }
}
