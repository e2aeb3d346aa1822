use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialError {
    #[error("No target specified")]
    NoTargetSpecified,
    // Only ever produced by the structured parse; resolve() falls back on it.
    #[error("Not a URL")]
    NotAUrl,
    #[error("Malformed address {address:?}: {reason}")]
    MalformedAddress { address: String, reason: String },
}

impl DialError {
    pub(crate) fn malformed(address: &str, reason: &str) -> Self {
        DialError::MalformedAddress {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }
}
