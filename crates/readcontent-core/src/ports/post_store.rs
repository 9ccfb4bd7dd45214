//! PostStore port - Posts テーブルへのクエリ
//!
//! # 一貫性の要求
//! `fetch_ranked` は「`RankVersion` の読み取り」と「rank 列の選択」を
//! 同じスナップショットで評価しなければなりません。再計算の publish を
//! 跨いでしまうと、ある世代の行に別の世代のラベルが付きます。
//! そのため戻り値に、行を選んだときの `Resolution` を含めます。

use async_trait::async_trait;

use crate::domain::{Post, PostId, RankVersion, RequestedVersion, Resolution, Result};
use crate::query::PostQuery;

/// `fetch_ranked` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRows {
    /// 行を選んだときに見えていた published version
    pub published: RankVersion,
    /// `resolve(requested, published)` の結果
    pub resolution: Resolution,
    pub posts: Vec<Post>,
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// data query: 1 回の読み取り一貫な操作で version を確認し、
    /// current / previous のどちらかの rank 列で絞り込む
    async fn fetch_ranked(&self, query: &PostQuery, requested: RequestedVersion)
    -> Result<RankedRows>;

    /// 時刻順の一覧（常に current generation）
    async fn fetch_by_time(&self, query: &PostQuery) -> Result<Vec<Post>>;

    /// post の `NextContributorID` をアトミックに 1 進め、進めた後の値を返す
    ///
    /// post が存在しなければ `ReadError::PostNotFound`（カウンタは作らない）。
    async fn next_contributor_id(&self, post: PostId) -> Result<i64>;
}
