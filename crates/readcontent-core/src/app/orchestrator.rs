//! Dual-fetch orchestrator - rank 順一覧の fan-out / fan-in
//!
//! 1 リクエストにつき 2 本のクエリを同時に走らせ、両方の完了を待ってから応答を組み立てます。
//! - (a) data query: `PostStore::fetch_ranked`（version 確認と列選択を 1 スナップショットで）
//! - (b) version-confirmation query: `RankingState::rank_version`
//!
//! # 失敗時
//! 片方が失敗しても、もう片方の完了を必ず待ちます（in-flight の操作を漏らさない）。
//! 返すエラーは data query 側を優先します。部分的な結果は返しません。
//!
//! # ラベル付け
//! レスポンスの `rankVersion` は (a) が行を選んだときのスナップショットから導きます。
//! (b) の値が (a) と食い違っても（publish が間に挟まった）ラベルは差し替えず、ログに残すだけです。

use tracing::{debug, warn};

use crate::domain::{RankVersion, RankedPosts, RequestedVersion, Result};
use crate::ports::{PostStore, RankedRows, RankingState};
use crate::query::PostQuery;

pub async fn dual_fetch(
    posts: &dyn PostStore,
    rankings: &dyn RankingState,
    query: &PostQuery,
    requested: RequestedVersion,
) -> Result<RankedPosts> {
    let (rows, confirmed) = tokio::join!(
        posts.fetch_ranked(query, requested),
        rankings.rank_version()
    );

    match (rows, confirmed) {
        (Ok(rows), Ok(confirmed)) => Ok(merge(rows, confirmed, requested)),
        (Err(err), confirmed) => {
            debug!(%err, "ranked data query failed");
            if let Err(other) = confirmed {
                debug!(%other, "version confirmation query also failed");
            }
            Err(err)
        }
        (Ok(_), Err(err)) => {
            debug!(%err, "version confirmation query failed");
            Err(err)
        }
    }
}

fn merge(rows: RankedRows, confirmed: RankVersion, requested: RequestedVersion) -> RankedPosts {
    let RankedRows {
        published,
        resolution,
        posts,
    } = rows;

    if confirmed != published {
        warn!(
            %published,
            %confirmed,
            "ranking was republished while the request was in flight"
        );
    }

    if resolution.unavailable {
        // 2 世代以上前（または未来）の要求: 別世代の行を返さない
        debug!(?requested, %published, "requested rank generation is unavailable");
        return RankedPosts {
            posts: Vec::new(),
            rank_version: resolution.effective,
        };
    }

    RankedPosts {
        posts,
        rank_version: resolution.effective,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Post, PostId, ReadError, Resolution, resolve};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn query() -> PostQuery {
        PostQuery {
            filters: vec![],
            order: crate::query::PostOrder::RankAscending,
            limit: 10,
        }
    }

    fn post(id: i64) -> Post {
        Post {
            id: PostId::new(id),
            group_name: "g1".to_string(),
            title: String::new(),
            content: String::new(),
            created_at: 0,
            rank: id,
            previous_rank: id,
            score: 0,
        }
    }

    /// 固定の published version で行を返す fake
    struct FixedPosts {
        published: RankVersion,
        fail: bool,
        barrier: Option<Arc<Barrier>>,
    }

    #[async_trait]
    impl PostStore for FixedPosts {
        async fn fetch_ranked(
            &self,
            _query: &PostQuery,
            requested: RequestedVersion,
        ) -> Result<RankedRows> {
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
            if self.fail {
                return Err(ReadError::storage("data query exploded"));
            }
            Ok(RankedRows {
                published: self.published,
                resolution: resolve(requested, self.published),
                posts: vec![post(1), post(2)],
            })
        }

        async fn fetch_by_time(&self, _query: &PostQuery) -> Result<Vec<Post>> {
            Ok(vec![])
        }

        async fn next_contributor_id(&self, post: PostId) -> Result<i64> {
            Err(ReadError::PostNotFound(post))
        }
    }

    /// 遅れて完了し、完了したことを記録する fake
    struct SlowRanking {
        version: RankVersion,
        fail: bool,
        delay: Duration,
        finished: AtomicBool,
        barrier: Option<Arc<Barrier>>,
    }

    impl SlowRanking {
        fn new(version: i64) -> Self {
            Self {
                version: RankVersion::new(version),
                fail: false,
                delay: Duration::ZERO,
                finished: AtomicBool::new(false),
                barrier: None,
            }
        }
    }

    #[async_trait]
    impl RankingState for SlowRanking {
        async fn rank_version(&self) -> Result<RankVersion> {
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
            tokio::time::sleep(self.delay).await;
            self.finished.store(true, Ordering::SeqCst);
            if self.fail {
                return Err(ReadError::storage("state query exploded"));
            }
            Ok(self.version)
        }
    }

    fn posts_at(version: i64) -> FixedPosts {
        FixedPosts {
            published: RankVersion::new(version),
            fail: false,
            barrier: None,
        }
    }

    #[tokio::test]
    async fn latest_request_reports_the_published_version() {
        let page = dual_fetch(&posts_at(5), &SlowRanking::new(5), &query(), RequestedVersion::Latest)
            .await
            .unwrap();
        assert_eq!(page.rank_version, RankVersion::new(5));
        assert_eq!(page.posts.len(), 2);
    }

    #[tokio::test]
    async fn previous_version_request_is_labeled_with_that_version() {
        let requested = RequestedVersion::Exact(RankVersion::new(4));
        let page = dual_fetch(&posts_at(5), &SlowRanking::new(5), &query(), requested)
            .await
            .unwrap();
        assert_eq!(page.rank_version, RankVersion::new(4));
        assert_eq!(page.posts.len(), 2);
    }

    #[tokio::test]
    async fn evicted_generation_fails_closed() {
        let requested = RequestedVersion::Exact(RankVersion::new(4));
        let page = dual_fetch(&posts_at(6), &SlowRanking::new(6), &query(), requested)
            .await
            .unwrap();
        assert!(page.posts.is_empty());
        assert_eq!(page.rank_version, RankVersion::new(5));
    }

    #[tokio::test]
    async fn label_follows_the_data_snapshot_not_the_confirmation_read() {
        // data query saw v5, confirmation saw v6 (a publish landed in between)
        let page = dual_fetch(&posts_at(5), &SlowRanking::new(6), &query(), RequestedVersion::Latest)
            .await
            .unwrap();
        assert_eq!(page.rank_version, RankVersion::new(5));
    }

    #[tokio::test]
    async fn both_queries_are_in_flight_at_once() {
        // 両方が barrier に到達しないと進めない
        let barrier = Arc::new(Barrier::new(2));
        let posts = FixedPosts {
            barrier: Some(barrier.clone()),
            ..posts_at(3)
        };
        let ranking = SlowRanking {
            barrier: Some(barrier),
            ..SlowRanking::new(3)
        };
        let page = tokio::time::timeout(
            Duration::from_secs(5),
            dual_fetch(&posts, &ranking, &query(), RequestedVersion::Latest),
        )
        .await
        .expect("fan-out deadlocked")
        .unwrap();
        assert_eq!(page.rank_version, RankVersion::new(3));
    }

    #[tokio::test]
    async fn data_failure_still_drains_the_confirmation_query() {
        let posts = FixedPosts {
            fail: true,
            ..posts_at(5)
        };
        let ranking = SlowRanking {
            delay: Duration::from_millis(50),
            ..SlowRanking::new(5)
        };
        let err = dual_fetch(&posts, &ranking, &query(), RequestedVersion::Latest)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("data query exploded"));
        assert!(ranking.finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn confirmation_failure_fails_the_request() {
        let ranking = SlowRanking {
            fail: true,
            ..SlowRanking::new(5)
        };
        let err = dual_fetch(&posts_at(5), &ranking, &query(), RequestedVersion::Latest)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("state query exploded"));
    }

    #[tokio::test]
    async fn data_error_wins_when_both_fail() {
        let posts = FixedPosts {
            fail: true,
            ..posts_at(5)
        };
        let ranking = SlowRanking {
            fail: true,
            ..SlowRanking::new(5)
        };
        let err = dual_fetch(&posts, &ranking, &query(), RequestedVersion::Latest)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("data query exploded"));
    }

    #[test]
    fn merge_keeps_rows_for_available_generations() {
        let rows = RankedRows {
            published: RankVersion::new(2),
            resolution: Resolution {
                effective: RankVersion::new(2),
                generation: crate::domain::Generation::Current,
                unavailable: false,
            },
            posts: vec![post(1)],
        };
        let page = merge(rows, RankVersion::new(2), RequestedVersion::Latest);
        assert_eq!(page.posts.len(), 1);
    }
}
