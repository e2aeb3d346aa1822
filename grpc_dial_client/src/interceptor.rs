use std::fmt;
use std::sync::Arc;

use grpc_dial_common::{MapCredentials, PerCallCredentials};
use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue};
use tonic::service::Interceptor;
use tonic::{Request, Status};

/// Copies the metadata of every configured credential into each outbound call.
#[derive(Clone)]
pub struct CredentialInterceptor {
    credentials: Arc<[MapCredentials]>,
}

impl CredentialInterceptor {
    pub fn new(credentials: Vec<MapCredentials>) -> Self {
        Self {
            credentials: credentials.into(),
        }
    }

    pub fn credentials(&self) -> &[MapCredentials] {
        &self.credentials
    }
}

// Credentials carry secrets; only the keys are shown.
impl fmt::Debug for CredentialInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.credentials
                    .iter()
                    .map(|c| c.request_metadata().keys().collect::<Vec<_>>()),
            )
            .finish()
    }
}

impl Interceptor for CredentialInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        for creds in self.credentials.iter() {
            for (key, value) in creds.request_metadata() {
                let key = AsciiMetadataKey::from_bytes(key.as_bytes()).map_err(|_| {
                    Status::invalid_argument(format!("invalid metadata key {key:?}"))
                })?;
                let value = AsciiMetadataValue::try_from(value.as_str()).map_err(|_| {
                    Status::invalid_argument(format!("invalid metadata value for {}", key.as_str()))
                })?;
                request.metadata_mut().append(key, value);
            }
        }
        Ok(request)
    }
}
