//! readcontent-core
//!
//! Versioned ranking read path for posts and comments.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, post, comment, ranking, page, errors）
//! - **query**: クエリパラメータの検証と構造化クエリ（pagination planner）
//! - **ports**: 抽象化レイヤー（RankingState, PostStore, CommentStore）
//! - **app**: アプリケーションロジック（builder, service, orchestrator）
//! - **impls**: 実装（InMemoryStore など開発用）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod query;
