//! Impls - 実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryStore**: `RankingState` / `PostStore` / `CommentStore` をまとめて実装する開発用ゲートウェイ
//!
//! # 本番用実装
//! 本番用の実装は別クレートに配置します：
//! - `readcontent-pg`: PgStore

pub mod inmem_store;

pub use self::inmem_store::InMemoryStore;
