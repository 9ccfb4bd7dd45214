//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」です。各 trait は Storage Gateway
//! （リレーショナルストア）へのインターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - リレーショナルストアが source of truth（正本）
//! - 呼び出し側が渡す値は必ず bind パラメータとして扱う
//! - `RankingState` はグローバル状態ではなく注入される依存

pub mod comment_store;
pub mod post_store;
pub mod ranking_state;

pub use self::comment_store::CommentStore;
pub use self::post_store::{PostStore, RankedRows};
pub use self::ranking_state::RankingState;
