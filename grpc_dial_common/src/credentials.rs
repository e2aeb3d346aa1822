use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata key carrying the access token on every call.
pub const ACCESS_METADATA_KEY: &str = "access";

/// Metadata attached to every outbound call of a connection.
pub trait PerCallCredentials {
    fn request_metadata(&self) -> &BTreeMap<String, String>;

    /// Whether the metadata may only be sent over a secured channel.
    fn require_transport_security(&self) -> bool;
}

/// A fixed set of key/value pairs sent with every call, secured channel or not.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapCredentials {
    values: BTreeMap<String, String>,
}

impl MapCredentials {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Credentials carrying `access -> token`, or `None` for an empty token.
    pub fn access(token: &str) -> Option<Self> {
        if token.is_empty() {
            return None;
        }
        Some(Self::new(BTreeMap::from([(
            ACCESS_METADATA_KEY.to_string(),
            token.to_string(),
        )])))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PerCallCredentials for MapCredentials {
    fn request_metadata(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    fn require_transport_security(&self) -> bool {
        false
    }
}

impl FromIterator<(String, String)> for MapCredentials {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
