use std::path::PathBuf;
use thiserror::Error;

#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum RevqError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("Enrich error: {0}")]
    Enrich(#[from] EnrichError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("No repository configured. Use --repo owner/repo or set repo in config")]
    RepoNotSet,

    #[error("Invalid repository '{0}': expected owner/name")]
    InvalidRepo(String),

    #[error("Token environment variable '{env}' is not set")]
    MissingToken { env: String },

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("max_prs must be at least 1")]
    ZeroMaxPrs,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub returned {status} for {path}")]
    Status { status: u16, path: String },

    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        source: reqwest::Error,
    },
}

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        source: chrono::ParseError,
    },
}

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("No pull requests matched filters")]
    NoPullsMatched,

    #[error("Failed to acquire semaphore: {0}")]
    Semaphore(#[from] tokio::sync::AcquireError),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write report: {0}")]
    WriteReport(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
