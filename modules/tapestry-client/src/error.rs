use thiserror::Error;

pub type Result<T> = std::result::Result<T, TapestryError>;

#[derive(Debug, Error)]
pub enum TapestryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TapestryError {
    fn from(err: reqwest::Error) -> Self {
        TapestryError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for TapestryError {
    fn from(err: serde_json::Error) -> Self {
        TapestryError::Parse(err.to_string())
    }
}
