//! Upstream descriptors derived from JWKS URLs
//!
//! Each remote JWKS location needs an upstream cluster Envoy can fetch from.
//! The cluster name is derived from the URL's host and port so equal
//! upstreams collapse to one cluster.

use crate::errors::{Error, Result};
use std::fmt;
use url::{Host, Url};

/// Suffix marking clusters owned by this extension
pub const MANAGED_CLUSTER_SUFFIX: &str = "|jwtext";

/// How the upstream's address is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointType {
    /// Hostname resolved through DNS
    Dns,
    /// IP literal
    Static,
}

impl fmt::Display for EndpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointType::Dns => write!(f, "dns"),
            EndpointType::Static => write!(f, "static"),
        }
    }
}

/// Upstream reached when fetching a JWKS document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpstreamDescriptor {
    /// Canonical name: host with dots replaced by underscores, then `_<port>`
    pub name: String,
    pub hostname: String,
    pub port: u32,
    pub endpoint_type: EndpointType,
    pub tls: bool,
}

impl UpstreamDescriptor {
    /// Resolve a JWKS URL into its upstream.
    ///
    /// An explicit port always wins, even when it equals the scheme's
    /// well-known port. Otherwise the port defaults to 443 for `https` and 80
    /// for any other scheme.
    pub fn from_url(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).map_err(|e| Error::url_parse(raw, e))?;
        let tls = url.scheme() == "https";

        let (hostname, endpoint_type) = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => {
                (domain.to_string(), EndpointType::Dns)
            }
            Some(Host::Ipv4(ip)) => (ip.to_string(), EndpointType::Static),
            Some(Host::Ipv6(ip)) => (ip.to_string(), EndpointType::Static),
            _ => return Err(Error::url_parse(raw, "URL has no host")),
        };

        let default_port = if tls { 443 } else { 80 };
        let explicit = url
            .port()
            .or_else(|| url.port_or_known_default().filter(|_| has_explicit_port(raw)));
        let port = explicit.map(u32::from).unwrap_or(default_port);

        Ok(Self { name: cluster_name(&hostname, port), hostname, port, endpoint_type, tls })
    }

    /// Name of the managed cluster carrying the ownership suffix
    pub fn managed_name(&self) -> String {
        format!("{}{}", self.name, MANAGED_CLUSTER_SUFFIX)
    }
}

/// Whether the authority of `raw` spells out a port. The parsed URL drops a
/// port equal to the scheme's well-known one, so the raw text is checked.
fn has_explicit_port(raw: &str) -> bool {
    let Some((_, rest)) = raw.split_once("://") else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let after_host = match host_port.rfind(']') {
        Some(end) => &host_port[end + 1..],
        None => host_port,
    };
    after_host.rsplit_once(':').is_some_and(|(_, port)| !port.is_empty())
}

/// Canonical cluster name for a host and port
pub fn cluster_name(hostname: &str, port: u32) -> String {
    format!("{}_{}", hostname.replace('.', "_"), port)
}

/// Whether a cluster name carries the ownership suffix
pub fn is_managed_cluster_name(name: &str) -> bool {
    name.ends_with(MANAGED_CLUSTER_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn https_hostname_defaults_to_443() {
        let d = UpstreamDescriptor::from_url("https://example.com/jwks").unwrap();
        assert_eq!(d.name, "example_com_443");
        assert_eq!(d.hostname, "example.com");
        assert_eq!(d.port, 443);
        assert_eq!(d.endpoint_type, EndpointType::Dns);
        assert!(d.tls);
        assert_eq!(d.managed_name(), "example_com_443|jwtext");
    }

    #[test]
    fn ipv4_literal_is_static() {
        let d = UpstreamDescriptor::from_url("https://127.0.0.1:443/jwks").unwrap();
        assert_eq!(d.name, "127_0_0_1_443");
        assert_eq!(d.endpoint_type, EndpointType::Static);
    }

    #[test]
    fn ipv6_literal_is_static() {
        let d = UpstreamDescriptor::from_url("https://[::1]:8443/keys").unwrap();
        assert_eq!(d.hostname, "::1");
        assert_eq!(d.port, 8443);
        assert_eq!(d.endpoint_type, EndpointType::Static);
    }

    #[test]
    fn http_defaults_to_80_without_tls() {
        let d = UpstreamDescriptor::from_url("http://example.com/jwks").unwrap();
        assert_eq!(d.name, "example_com_80");
        assert!(!d.tls);
    }

    #[test]
    fn explicit_port_is_kept() {
        let d = UpstreamDescriptor::from_url("https://keys.idp.example:8443/certs").unwrap();
        assert_eq!(d.name, "keys_idp_example_8443");
    }

    #[test]
    fn explicit_port_equal_to_scheme_default_is_kept() {
        let ftp = UpstreamDescriptor::from_url("ftp://keys.example:21/jwks").unwrap();
        assert_eq!(ftp.port, 21);
        assert_eq!(ftp.name, "keys_example_21");

        let https = UpstreamDescriptor::from_url("https://keys.example:443/jwks").unwrap();
        assert_eq!(https.name, "keys_example_443");

        let ipv6 = UpstreamDescriptor::from_url("ftp://user:pw@[::1]:21/jwks").unwrap();
        assert_eq!(ipv6.port, 21);

        let implicit = UpstreamDescriptor::from_url("ftp://user:pw@keys.example/jwks").unwrap();
        assert_eq!(implicit.port, 80);
    }

    #[test]
    fn malformed_urls_are_rejected() {
        assert!(matches!(UpstreamDescriptor::from_url("not a url"), Err(Error::UrlParse { .. })));
        assert!(matches!(UpstreamDescriptor::from_url("/relative/jwks"), Err(Error::UrlParse { .. })));
        assert!(matches!(UpstreamDescriptor::from_url("mailto:keys@example.com"), Err(Error::UrlParse { .. })));
    }

    #[test]
    fn managed_name_detection() {
        assert!(is_managed_cluster_name("example_com_443|jwtext"));
        assert!(!is_managed_cluster_name("example_com_443"));
        assert!(!is_managed_cluster_name("jwtext|example_com_443"));
    }

    proptest! {
        #[test]
        fn resolution_is_deterministic(
            host in "[a-z]{1,12}(\\.[a-z]{1,8}){0,3}",
            port in 1u16..,
            https in any::<bool>(),
        ) {
            let scheme = if https { "https" } else { "http" };
            let raw = format!("{scheme}://{host}:{port}/jwks");
            let first = UpstreamDescriptor::from_url(&raw).unwrap();
            let second = UpstreamDescriptor::from_url(&raw).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert!(!first.name.contains('.'));
            prop_assert!(is_managed_cluster_name(&first.managed_name()));
            prop_assert_eq!(first.tls, https);
        }
    }
}
