use thiserror::Error;

/// App-level failures: configuration and script I/O.
///
/// Domain refusals (sold out, wrong state, ...) are not errors; they are
/// [`Response`](crate::state_machine::Response) values returned by the
/// machine itself.
#[derive(Debug, Error)]
pub enum VendomatError {
    #[error("config error: {0}")]
    Config(String),

    #[error("event script error: {0}")]
    Script(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
