// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("bad URL {url}: {reason}")]
    Url { url: String, reason: String },

    #[error("no snapshot for {0}")]
    MissingPage(String),

    #[error("invalid option: {0}")]
    Config(String),

    #[error("a collection flow is already running")]
    AlreadyRunning,

    #[error("navigation limit reached after {0} page loads")]
    NavigationLimit(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
