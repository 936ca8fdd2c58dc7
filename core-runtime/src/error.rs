use thiserror::Error;

/// Failures raised while assembling the core from configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// A setting is missing, malformed or out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// A host capability was neither injected nor defaulted
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    /// The global subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;
