use tracing::debug;
use url::{ParseError, Url};

use crate::dial_error::DialError;
use crate::types::{DialTarget, HTTPS_DEFAULT_PORT, HTTP_DEFAULT_PORT, UNIX_SCHEME};

const MISSING_PORT: &str = "missing port in address";
const TOO_MANY_COLONS: &str = "too many colons in address";

/// Resolves a remote string into a [`DialTarget`].
///
/// Accepted forms are `unix:<path>`, `https://host[:port]`, `http://host[:port]`
/// and bare `host:port`. Bare addresses are used verbatim and only port `443`
/// turns TLS on.
pub fn resolve(remote: &str) -> Result<DialTarget, DialError> {
    let remote = remote.trim();
    if remote.is_empty() {
        return Err(DialError::NoTargetSpecified);
    }

    match parse_url(remote) {
        Ok(target) => {
            debug!(remote, resolved = %target, "resolved remote as URL");
            Ok(target)
        }
        Err(_) => {
            let (_, port) = split_host_port(remote)?;
            let target = DialTarget::new(remote, port == "443");
            debug!(remote, resolved = %target, "resolved remote as host:port");
            Ok(target)
        }
    }
}

fn parse_url(remote: &str) -> Result<DialTarget, DialError> {
    let url = match Url::parse(remote) {
        Ok(url) => url,
        Err(ParseError::EmptyHost) => return parse_empty_host(remote),
        Err(_) => return Err(DialError::NotAUrl),
    };

    // host_str() keeps the brackets around IPv6 literals
    let host = || url.host_str().unwrap_or_default();
    match url.scheme() {
        UNIX_SCHEME => Ok(DialTarget::new(remote, false)),
        "https" => {
            let port = url.port().unwrap_or(HTTPS_DEFAULT_PORT);
            Ok(DialTarget::new(format!("{}:{}", host(), port), true))
        }
        "http" => {
            let port = url.port().unwrap_or(HTTP_DEFAULT_PORT);
            Ok(DialTarget::new(format!("{}:{}", host(), port), false))
        }
        _ => Err(DialError::NotAUrl),
    }
}

// The url crate refuses http(s) URLs without a host. They still resolve to
// `:port` so the failure surfaces when dialing.
fn parse_empty_host(remote: &str) -> Result<DialTarget, DialError> {
    let (scheme, rest) = remote.split_once("://").ok_or(DialError::NotAUrl)?;
    let (use_tls, default_port) = match scheme.to_ascii_lowercase().as_str() {
        "https" => (true, HTTPS_DEFAULT_PORT),
        "http" => (false, HTTP_DEFAULT_PORT),
        _ => return Err(DialError::NotAUrl),
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let port = match host_port.strip_prefix(':') {
        Some("") | None => default_port.to_string(),
        Some(port) if port.bytes().all(|b| b.is_ascii_digit()) => port.to_string(),
        Some(_) => return Err(DialError::NotAUrl),
    };
    Ok(DialTarget::new(format!(":{port}"), use_tls))
}

/// Splits `host:port` on the last colon. A host containing colons must be
/// enclosed in square brackets.
pub fn split_host_port(hostport: &str) -> Result<(&str, &str), DialError> {
    let fail = |reason| Err(DialError::malformed(hostport, reason));

    let Some(colon) = hostport.rfind(':') else {
        return fail(MISSING_PORT);
    };

    let (host, host_end) = if hostport.starts_with('[') {
        let Some(end) = hostport.find(']') else {
            return fail("missing ']' in address");
        };
        if end + 1 == hostport.len() {
            return fail(MISSING_PORT);
        }
        if end + 1 != colon {
            if hostport.as_bytes()[end + 1] == b':' {
                return fail(TOO_MANY_COLONS);
            }
            return fail(MISSING_PORT);
        }
        (&hostport[1..end], end + 1)
    } else {
        let host = &hostport[..colon];
        if host.contains(':') {
            return fail(TOO_MANY_COLONS);
        }
        (host, 0)
    };

    let host_start = usize::from(hostport.starts_with('['));
    if hostport[host_start..].contains('[') {
        return fail("unexpected '[' in address");
    }
    if hostport[host_end..].contains(']') {
        return fail("unexpected ']' in address");
    }

    Ok((host, &hostport[colon + 1..]))
}
