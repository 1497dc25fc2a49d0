/// Error types for the layer cascade
use thiserror::Error;

/// Failures a layer surfaces to its panel. None of them are fatal: the layer
/// keeps its last good selection until the user tries again.
#[derive(Error, Debug, PartialEq)]
pub enum LayerError {
    /// A metadata list could not be fetched, or came back empty
    #[error("Metadata unavailable for {request}: {reason}")]
    MetadataUnavailable { request: String, reason: String },

    /// The requested dataset is not in the loaded dataset list
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// The requested variable is not in the loaded variable list
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
}

/// Type alias for Results using LayerError
pub type Result<T> = std::result::Result<T, LayerError>;
