use gometa_html::TokenizeError;
use thiserror::Error;

/// Discovery errors.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The document declared a charset that cannot be decoded.
    #[error("could not decode document metadata: {0}")]
    Decode(#[from] TokenizeError),
}
