//! JWTProvider resource types
//!
//! Mirrors the `JWTProvider` custom resource attached to Gateway listeners.
//! Field names follow the resource's camelCase JSON form.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default JWKS fetch timeout in seconds
pub const DEFAULT_JWKS_TIMEOUT_SECONDS: i64 = 2;

/// Default JWKS cache duration in seconds
pub const DEFAULT_JWKS_CACHE_DURATION_SECONDS: i64 = 600;

/// Delay before refetching after a failed async JWKS fetch
pub const DEFAULT_JWKS_FAILED_REFETCH_SECONDS: i64 = 5;

/// Default retry conditions for JWKS fetches
pub const DEFAULT_RETRY_ON: &str =
    "connect-failure,refused-stream,unavailable,cancelled,retriable-status-codes";

/// Retry count used when `numRetries` is explicitly zero
pub const DEFAULT_NUM_RETRIES: u32 = 2;

/// Object metadata subset used by the extension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// A JWTProvider resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JwtProviderResource {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[validate(nested)]
    pub spec: JwtProviderSpec,
}

impl JwtProviderResource {
    /// Provider name used as the key in the generated filter config
    pub fn provider_name(&self) -> &str {
        &self.spec.name
    }
}

/// Gateway object a provider attaches to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalObjectReference {
    pub group: String,
    pub kind: String,
    pub name: String,
}

/// How a JWT is verified
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct JwtProviderSpec {
    pub target_refs: Vec<LocalObjectReference>,

    /// Unique provider name within one generation cycle
    #[validate(length(min = 1, max = 253, message = "Provider name must be between 1 and 253 characters"))]
    pub name: String,

    /// Token issuer; also the OIDC discovery base when `remoteJwks` is absent
    pub issuer: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audiences: Vec<String>,

    pub remote_jwks: Option<RemoteJwksSpec>,

    pub require_expiration: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recompute_route: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub from_headers: Vec<JwtHeaderSpec>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub claim_to_headers: Vec<ClaimToHeaderSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_from: Option<JwtExtractorSpec>,
}

/// Header carrying a token, with an optional prefix to strip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JwtHeaderSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_prefix: Option<String>,
}

/// Claim copied into a request header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimToHeaderSpec {
    pub header_name: String,
    pub claim_name: String,
}

/// Explicit token locations. Replaces `fromHeaders` when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtExtractorSpec {
    pub headers: Vec<JwtHeaderSpec>,
    pub cookies: Vec<String>,
    pub params: Vec<String>,
}

/// Remote JWKS location and fetch behaviour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteJwksSpec {
    pub uri: String,
    pub timeout_sec: i64,
    pub cache_duration: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetrySpec>,
}

impl RemoteJwksSpec {
    /// Fetch timeout, falling back to the default for non-positive values
    pub fn effective_timeout_seconds(&self) -> i64 {
        positive_or(self.timeout_sec, DEFAULT_JWKS_TIMEOUT_SECONDS)
    }

    /// Cache duration, falling back to the default for non-positive values
    pub fn effective_cache_duration_seconds(&self) -> i64 {
        positive_or(self.cache_duration, DEFAULT_JWKS_CACHE_DURATION_SECONDS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrySpec {
    pub retry_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_off: Option<BackOffSpec>,
}

impl RetrySpec {
    pub fn effective_retry_on(&self) -> &str {
        if self.retry_on.is_empty() {
            DEFAULT_RETRY_ON
        } else {
            &self.retry_on
        }
    }

    /// `None` when unset; an explicit zero becomes the default count
    pub fn effective_num_retries(&self) -> Option<u32> {
        self.num_retries.map(|n| if n == 0 { DEFAULT_NUM_RETRIES } else { n })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackOffSpec {
    pub base_interval_sec: i64,
    pub max_interval_sec: i64,
}

impl BackOffSpec {
    pub fn effective_base_interval_seconds(&self) -> i64 {
        positive_or(self.base_interval_sec, 1)
    }

    pub fn effective_max_interval_seconds(&self) -> i64 {
        positive_or(self.max_interval_sec, 1)
    }
}

fn positive_or(value: i64, fallback: i64) -> i64 {
    if value > 0 {
        value
    } else {
        fallback
    }
}
