//! readcontent-pg
//!
//! PostgreSQL implementation of the readcontent Storage Gateway ports.
//!
//! スキーマは `migrations/` を参照してください。

mod sql;
mod store;

pub use self::store::PgStore;

/// 接続時のエラー
pub use sqlx::Error as PgError;
