//! Core errors (renderer-agnostic).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown geometry {0}")]
    UnknownGeometry(u32),
    #[error("unknown texture {0}")]
    UnknownTexture(u32),
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("invalid texture: {0}")]
    InvalidTexture(String),
    #[error("invalid animation channel: {0}")]
    InvalidChannel(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
