//! OIDC discovery of JWKS locations
//!
//! Providers without an explicit `remoteJwks` are resolved through the
//! issuer's `/.well-known/openid-configuration` document.

use crate::config::DiscoveryConfig;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Path segments appended to the issuer URL
const WELL_KNOWN_SEGMENTS: [&str; 2] = [".well-known", "openid-configuration"];

/// Resolves an issuer to the URI of its JWKS document
#[async_trait]
pub trait JwksDiscovery: Send + Sync {
    async fn jwks_uri(&self, issuer: &str) -> Result<String>;
}

/// Subset of the OpenID provider metadata document
#[derive(Debug, Clone, Deserialize)]
pub struct OpenIdConfiguration {
    #[serde(default)]
    pub issuer: String,
    pub jwks_uri: String,
}

/// Discovery over HTTP(S) using the issuer's well-known document
#[derive(Debug, Clone)]
pub struct OidcDiscoveryClient {
    client: Client,
}

impl OidcDiscoveryClient {
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Discovery document URL for `issuer`, tolerating a trailing slash
    pub fn well_known_url(issuer: &str) -> Result<Url> {
        let mut url = Url::parse(issuer).map_err(|e| Error::url_parse(issuer, e))?;
        url.path_segments_mut()
            .map_err(|_| Error::url_parse(issuer, "issuer URL cannot carry a path"))?
            .pop_if_empty()
            .extend(WELL_KNOWN_SEGMENTS);
        Ok(url)
    }
}

#[async_trait]
impl JwksDiscovery for OidcDiscoveryClient {
    async fn jwks_uri(&self, issuer: &str) -> Result<String> {
        let url = Self::well_known_url(issuer)
            .map_err(|e| Error::discovery(issuer, e.to_string()))?;

        debug!(issuer = %issuer, url = %url, "Fetching OpenID configuration");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::discovery_http(issuer, e))?;

        let document: OpenIdConfiguration =
            response.json().await.map_err(|e| Error::discovery_http(issuer, e))?;

        if document.jwks_uri.trim().is_empty() {
            return Err(Error::discovery(issuer, "OpenID configuration has an empty jwks_uri"));
        }

        debug!(issuer = %issuer, jwks_uri = %document.jwks_uri, "Discovered JWKS location");
        Ok(document.jwks_uri)
    }
}
