use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use readcontent_core::app::BuildError;
use readcontent_core::domain::{ErrorKind, ReadError};
use readcontent_pg::PgError;
use thiserror::Error;
use tracing::error;

use crate::config::ConfigError;

/// リクエスト処理中のエラー
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Read(#[from] ReadError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Read(err) = &self;
        let status = match err.kind() {
            ErrorKind::Client => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Upstream => {
                error!(%err, "request failed upstream");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

/// 起動時のエラー
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("database: {0}")]
    Database(#[from] PgError),

    #[error("wiring: {0}")]
    Build(#[from] BuildError),

    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}
