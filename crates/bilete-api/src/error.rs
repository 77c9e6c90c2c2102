use bilete_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[cfg(feature = "http")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;
