//! App - アプリケーション層
//!
//! ports を組み合わせて読み取りパスを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: port の注入と起動時検証
//! - **ReadService**: posts / comments / contributor ID の読み取り API
//! - **dual_fetch**: rank 順一覧の fan-out / fan-in

pub mod builder;
pub mod orchestrator;
pub mod service;

pub use self::builder::{AppBuilder, BuildError};
pub use self::orchestrator::dual_fetch;
pub use self::service::ReadService;
