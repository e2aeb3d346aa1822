use grpc_dial_common::DialError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error(transparent)]
    Resolve(#[from] DialError),
    #[error("Invalid endpoint for address {address:?}")]
    InvalidUri {
        address: String,
        source: tonic::transport::Error,
    },
    #[error(transparent)]
    Transport(#[from] tonic::transport::Error),
    #[error("Unix domain sockets are not supported on this platform")]
    UnixSocketUnsupported,
}
