use std::path::PathBuf;
use std::time::Duration;

use grpc_dial_common::{resolve, strip_unix_scheme, MapCredentials};
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tracing::debug;

use crate::connect_error::ConnectError;
use crate::interceptor::CredentialInterceptor;
use crate::options::{build_options, DialOption, TransportSecurity};

/// A client channel with per-call credentials applied. Accepted by any
/// tonic-generated client, e.g. `HealthClient::new(connection)`.
pub type Connection = InterceptedService<Channel, CredentialInterceptor>;

// Unix socket endpoints still need a well-formed URI; the authority is unused.
const UNIX_PLACEHOLDER_URI: &str = "http://[::]:50051";

#[derive(Debug, Default)]
struct Settings {
    tls: Option<ClientTlsConfig>,
    connect_timeout: Option<Duration>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    keep_alive: Option<Duration>,
    concurrency_limit: Option<usize>,
    credentials: Vec<MapCredentials>,
}

impl Settings {
    fn from_options(options: impl IntoIterator<Item = DialOption>) -> Self {
        let mut settings = Settings::default();
        for option in options {
            match option {
                DialOption::TransportSecurity(TransportSecurity::Tls(tls)) => {
                    settings.tls = Some(tls)
                }
                DialOption::TransportSecurity(TransportSecurity::Insecure) => settings.tls = None,
                DialOption::PerCallCredentials(creds) => settings.credentials.push(creds),
                DialOption::ConnectTimeout(t) => settings.connect_timeout = Some(t),
                DialOption::Timeout(t) => settings.timeout = Some(t),
                DialOption::UserAgent(ua) => settings.user_agent = Some(ua),
                DialOption::KeepAlive(interval) => settings.keep_alive = Some(interval),
                DialOption::ConcurrencyLimit(limit) => settings.concurrency_limit = Some(limit),
            }
        }
        settings
    }
}

struct Prepared {
    endpoint: Endpoint,
    unix_path: Option<PathBuf>,
    interceptor: CredentialInterceptor,
}

/// Extracts the socket path from `unix:<path>` or `unix://<path>`, with the
/// scheme in any case.
pub fn unix_socket_path(address: &str) -> Option<PathBuf> {
    let rest = strip_unix_scheme(address)?;
    let path = rest.strip_prefix("//").unwrap_or(rest);
    Some(PathBuf::from(path))
}

fn prepare(
    address: &str,
    options: impl IntoIterator<Item = DialOption>,
) -> Result<Prepared, ConnectError> {
    let settings = Settings::from_options(options);
    let unix_path = unix_socket_path(address);
    #[cfg(not(unix))]
    if unix_path.is_some() {
        return Err(ConnectError::UnixSocketUnsupported);
    }

    let use_tls = settings.tls.is_some() && unix_path.is_none();
    let interceptor = CredentialInterceptor::new(settings.credentials);
    if !use_tls && !interceptor.credentials().is_empty() {
        debug!(address, "sending per-call credentials over an insecure channel");
    }

    let uri = match unix_path {
        Some(_) => UNIX_PLACEHOLDER_URI.to_string(),
        None if use_tls => format!("https://{address}"),
        None => format!("http://{address}"),
    };
    let mut endpoint = Endpoint::from_shared(uri).map_err(|source| ConnectError::InvalidUri {
        address: address.to_string(),
        source,
    })?;

    if let Some(tls) = settings.tls {
        if use_tls {
            endpoint = endpoint.tls_config(tls)?;
        } else {
            debug!(address, "ignoring TLS settings for unix socket");
        }
    }
    if let Some(t) = settings.connect_timeout {
        endpoint = endpoint.connect_timeout(t);
    }
    if let Some(t) = settings.timeout {
        endpoint = endpoint.timeout(t);
    }
    if let Some(ua) = settings.user_agent {
        endpoint = endpoint.user_agent(ua)?;
    }
    if let Some(interval) = settings.keep_alive {
        endpoint = endpoint.http2_keep_alive_interval(interval);
    }
    if let Some(limit) = settings.concurrency_limit {
        endpoint = endpoint.concurrency_limit(limit);
    }

    debug!(address, use_tls, uri = %endpoint.uri(), "prepared endpoint");
    Ok(Prepared {
        endpoint,
        unix_path,
        interceptor,
    })
}

/// Creates a connection to `address` without dialing; the first call does.
///
/// Must be called from within a Tokio runtime.
pub fn connect_lazy(
    address: &str,
    options: impl IntoIterator<Item = DialOption>,
) -> Result<Connection, ConnectError> {
    let Prepared {
        endpoint,
        unix_path,
        interceptor,
    } = prepare(address, options)?;

    #[cfg(unix)]
    if let Some(path) = unix_path {
        let channel = endpoint.connect_with_connector_lazy(unix::UnixConnector::new(path));
        return Ok(InterceptedService::new(channel, interceptor));
    }
    #[cfg(not(unix))]
    let _ = unix_path;

    Ok(InterceptedService::new(endpoint.connect_lazy(), interceptor))
}

/// Dials `address` and waits for the channel to be established.
pub async fn connect(
    address: &str,
    options: impl IntoIterator<Item = DialOption>,
) -> Result<Connection, ConnectError> {
    let Prepared {
        endpoint,
        unix_path,
        interceptor,
    } = prepare(address, options)?;

    #[cfg(unix)]
    if let Some(path) = unix_path {
        let channel = endpoint
            .connect_with_connector(unix::UnixConnector::new(path))
            .await?;
        return Ok(InterceptedService::new(channel, interceptor));
    }
    #[cfg(not(unix))]
    let _ = unix_path;

    Ok(InterceptedService::new(endpoint.connect().await?, interceptor))
}

/// Resolves `remote` and dials it with `extra` options.
pub async fn dial(
    remote: &str,
    extra: impl IntoIterator<Item = DialOption>,
) -> Result<Connection, ConnectError> {
    let target = resolve(remote)?;
    let options = build_options(&target, extra, None);
    connect(&target.address, options).await
}

/// Like [`dial`], but without waiting for the connection.
pub fn dial_lazy(
    remote: &str,
    extra: impl IntoIterator<Item = DialOption>,
) -> Result<Connection, ConnectError> {
    let target = resolve(remote)?;
    let options = build_options(&target, extra, None);
    connect_lazy(&target.address, options)
}

#[cfg(unix)]
mod unix {
    use std::future::Future;
    use std::io;
    use std::path::PathBuf;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use hyper_util::rt::TokioIo;
    use tokio::net::UnixStream;
    use tonic::transport::Uri;
    use tower::Service;

    #[derive(Clone, Debug)]
    pub struct UnixConnector {
        path: PathBuf,
    }

    impl UnixConnector {
        pub fn new(path: PathBuf) -> Self {
            Self { path }
        }
    }

    impl Service<Uri> for UnixConnector {
        type Response = TokioIo<UnixStream>;
        type Error = io::Error;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _: Uri) -> Self::Future {
            let path = self.path.clone();
            Box::pin(async move { Ok(TokioIo::new(UnixStream::connect(path).await?)) })
        }
    }
}
