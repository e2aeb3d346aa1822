use std::time::Duration;

use grpc_dial_common::{DialTarget, MapCredentials};
use tonic::transport::ClientTlsConfig;

#[derive(Clone, Debug)]
pub enum TransportSecurity {
    Tls(ClientTlsConfig),
    Insecure,
}

impl TransportSecurity {
    /// TLS with default settings, trusting the platform's root certificates.
    pub fn tls() -> Self {
        TransportSecurity::Tls(ClientTlsConfig::new().with_native_roots())
    }

    pub fn for_target(target: &DialTarget) -> Self {
        match target.use_tls {
            true => Self::tls(),
            false => TransportSecurity::Insecure,
        }
    }
}

/// One unit of connection configuration, applied in order by
/// [`crate::connect`]. Later settings of the same kind replace earlier ones,
/// except for per-call credentials, which all apply.
#[derive(Clone, Debug)]
pub enum DialOption {
    TransportSecurity(TransportSecurity),
    PerCallCredentials(MapCredentials),
    ConnectTimeout(Duration),
    Timeout(Duration),
    UserAgent(String),
    KeepAlive(Duration),
    ConcurrencyLimit(usize),
}

/// Assembles the option list for dialing `target`: its transport security
/// first, then `extra` untouched, then the access token credential when a
/// non-empty token is given.
pub fn build_options<I>(
    target: &DialTarget,
    extra: I,
    access_token: Option<&str>,
) -> Vec<DialOption>
where
    I: IntoIterator<Item = DialOption>,
{
    let mut opts = vec![DialOption::TransportSecurity(TransportSecurity::for_target(
        target,
    ))];
    opts.extend(extra);
    match access_token {
        Some(token) => with_access_token(token, opts),
        None => opts,
    }
}

/// Appends an `access` credential to `opts` unless `token` is empty.
pub fn with_access_token(token: &str, mut opts: Vec<DialOption>) -> Vec<DialOption> {
    if let Some(creds) = MapCredentials::access(token) {
        opts.push(DialOption::PerCallCredentials(creds));
    }
    opts
}

#[cfg(test)]
mod tests {
    use super::*;
    use grpc_dial_common::PerCallCredentials;
    use std::collections::BTreeMap;

    fn credentials(opts: &[DialOption]) -> Vec<&MapCredentials> {
        opts.iter()
            .filter_map(|o| match o {
                DialOption::PerCallCredentials(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    fn transport_options(opts: &[DialOption]) -> usize {
        opts.iter()
            .filter(|o| matches!(o, DialOption::TransportSecurity(_)))
            .count()
    }

    #[test]
    fn test_tls_target_gets_tls_first() {
        let target = DialTarget::new("example.com:443", true);
        let opts = build_options(&target, vec![], None);
        assert_eq!(opts.len(), 1);
        assert!(matches!(
            opts[0],
            DialOption::TransportSecurity(TransportSecurity::Tls(_))
        ));
    }

    #[test]
    fn test_insecure_target_gets_insecure_first() {
        let target = DialTarget::new("localhost:50051", false);
        let opts = build_options(&target, vec![], Some(""));
        assert_eq!(opts.len(), 1);
        assert!(matches!(
            opts[0],
            DialOption::TransportSecurity(TransportSecurity::Insecure)
        ));
    }

    #[test]
    fn test_extra_options_kept_in_order() {
        let target = DialTarget::new("localhost:50051", false);
        let extra = vec![
            DialOption::UserAgent("probe/1".to_string()),
            DialOption::TransportSecurity(TransportSecurity::tls()),
            DialOption::ConnectTimeout(Duration::from_secs(3)),
        ];
        let opts = build_options(&target, extra, None);

        assert_eq!(opts.len(), 4);
        assert!(matches!(
            opts[0],
            DialOption::TransportSecurity(TransportSecurity::Insecure)
        ));
        assert!(matches!(&opts[1], DialOption::UserAgent(ua) if ua == "probe/1"));
        assert!(matches!(
            opts[2],
            DialOption::TransportSecurity(TransportSecurity::Tls(_))
        ));
        assert!(matches!(opts[3], DialOption::ConnectTimeout(d) if d == Duration::from_secs(3)));
        assert!(credentials(&opts).is_empty());
    }

    #[test]
    fn test_empty_token_adds_no_credentials() {
        let target = DialTarget::new("example.com:443", true);
        let opts = build_options(
            &target,
            vec![DialOption::Timeout(Duration::from_secs(1))],
            Some(""),
        );
        assert_eq!(opts.len(), 2);
        assert_eq!(transport_options(&opts), 1);
        assert!(credentials(&opts).is_empty());
    }

    #[test]
    fn test_token_appends_access_credentials_last() {
        let target = DialTarget::new("localhost:50051", false);
        let opts = build_options(
            &target,
            vec![DialOption::KeepAlive(Duration::from_secs(30))],
            Some("tok"),
        );

        assert_eq!(opts.len(), 3);
        let DialOption::PerCallCredentials(creds) = &opts[2] else {
            panic!("expected credentials last, got {:?}", opts[2]);
        };
        assert_eq!(
            creds.request_metadata(),
            &BTreeMap::from([("access".to_string(), "tok".to_string())])
        );
        assert!(!creds.require_transport_security());
    }

    #[test]
    fn test_with_access_token() {
        assert!(with_access_token("", vec![]).is_empty());

        let opts = with_access_token("secret", vec![DialOption::ConcurrencyLimit(8)]);
        assert_eq!(opts.len(), 2);
        assert_eq!(credentials(&opts).len(), 1);
    }
}
