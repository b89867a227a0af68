use crate::bridge::BridgeError;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Required arguments are missing.
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0:#}")]
    Other(#[from] anyhow::Error),
}
