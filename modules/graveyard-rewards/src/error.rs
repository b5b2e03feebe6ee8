use tapestry_client::TapestryError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RewardsError>;

#[derive(Debug, Error)]
pub enum RewardsError {
    #[error("walletAddress is required and must be a valid Solana address")]
    InvalidWallet,

    #[error("Tapestry {context} error (status {status}): {details}")]
    Upstream {
        context: &'static str,
        status: u16,
        details: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl RewardsError {
    /// Attach the call site ("profile", "feed") to a client error. Upstream
    /// statuses are relayed to the caller as-is; transport and parse
    /// failures stay local.
    pub fn from_upstream(context: &'static str, err: TapestryError) -> Self {
        match err {
            TapestryError::Api { status, message } => RewardsError::Upstream {
                context,
                status,
                details: message,
            },
            TapestryError::Network(msg) => RewardsError::Network(msg),
            TapestryError::Parse(msg) => RewardsError::Parse(msg),
        }
    }
}
