//! Dials gRPC servers from loosely specified remote strings.
//!
//! ```no_run
//! # async fn run() -> Result<(), grpc_dial_client::ConnectError> {
//! use grpc_dial_client::{dial, with_access_token};
//!
//! let connection = dial("https://api.example.com", with_access_token("tok", vec![])).await?;
//! # let _ = connection;
//! # Ok(())
//! # }
//! ```

mod connect;
mod connect_error;
mod interceptor;
mod options;

pub use connect::{connect, connect_lazy, dial, dial_lazy, unix_socket_path, Connection};
pub use connect_error::ConnectError;
pub use interceptor::CredentialInterceptor;
pub use options::{build_options, with_access_token, DialOption, TransportSecurity};

pub use grpc_dial_common::{resolve, DialError, DialTarget, MapCredentials, PerCallCredentials};
