use serde::{Deserialize, Serialize};

pub const HTTPS_DEFAULT_PORT: u16 = 443;
pub const HTTP_DEFAULT_PORT: u16 = 80;

/// Prefix of addresses that name a Unix domain socket.
pub const UNIX_SCHEME: &str = "unix";

/// Where to connect and whether the channel must be secured.
///
/// `address` is either `host:port` or a string starting with `unix:`. It is
/// never empty for a target returned by [`crate::resolve`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialTarget {
    pub address: String,
    pub use_tls: bool,
}

impl DialTarget {
    pub fn new(address: impl Into<String>, use_tls: bool) -> Self {
        Self {
            address: address.into(),
            use_tls,
        }
    }

    pub fn is_unix_socket(&self) -> bool {
        strip_unix_scheme(&self.address).is_some()
    }
}

/// Returns what follows a `unix:` prefix, matched case-insensitively.
pub fn strip_unix_scheme(address: &str) -> Option<&str> {
    let prefix_len = UNIX_SCHEME.len() + 1;
    let prefix = address.get(..prefix_len)?;
    let matches = prefix[..UNIX_SCHEME.len()].eq_ignore_ascii_case(UNIX_SCHEME)
        && prefix.ends_with(':');
    matches.then(|| &address[prefix_len..])
}

impl std::fmt::Display for DialTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let security = if self.use_tls { "tls" } else { "insecure" };
        write!(f, "{} ({})", self.address, security)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_socket_detection() {
        assert!(DialTarget::new("unix:/tmp/sock", false).is_unix_socket());
        assert!(DialTarget::new("unix:///tmp/sock", false).is_unix_socket());
        assert!(!DialTarget::new("unixhost:50051", false).is_unix_socket());
        assert!(!DialTarget::new("example.com:443", true).is_unix_socket());
        assert!(DialTarget::new("UNIX:/tmp/sock", false).is_unix_socket());
        assert!(DialTarget::new("Unix:///tmp/sock", false).is_unix_socket());
    }

    #[test]
    fn test_strip_unix_scheme() {
        assert_eq!(strip_unix_scheme("unix:/tmp/sock"), Some("/tmp/sock"));
        assert_eq!(strip_unix_scheme("UNIX:/tmp/sock"), Some("/tmp/sock"));
        assert_eq!(strip_unix_scheme("unix:"), Some(""));
        assert_eq!(strip_unix_scheme("unix"), None);
        assert_eq!(strip_unix_scheme("unixhost:50051"), None);
        assert_eq!(strip_unix_scheme("é:1"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            DialTarget::new("example.com:443", true).to_string(),
            "example.com:443 (tls)"
        );
        assert_eq!(
            DialTarget::new("localhost:80", false).to_string(),
            "localhost:80 (insecure)"
        );
    }
}
