//! RankingState port - 単一行の `RankVersion` を読む
//!
//! プロセス全体のグローバル変数ではなく、注入される依存として扱います。
//! テストでは in-memory 実装や fault injection 用の fake に差し替えます。

use async_trait::async_trait;

use crate::domain::{RankVersion, Result};

/// RankingState は現在 publish されている世代番号を返す
///
/// # 設計原則
/// - 読み取り専用（書き込みは再計算ジョブの責務）
/// - `RankVersion` は単調増加
#[async_trait]
pub trait RankingState: Send + Sync {
    /// version-confirmation query
    async fn rank_version(&self) -> Result<RankVersion>;
}
