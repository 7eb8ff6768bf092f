//! JWT authentication HTTP filter configuration helpers
//!
//! Converts JWTProvider specs into `envoy.filters.http.jwt_authn` protos and
//! builds the per-route annotations that select the shared requirement.

use crate::domain::jwt_provider::{
    BackOffSpec, JwtHeaderSpec, JwtProviderSpec, RemoteJwksSpec, RetrySpec,
    DEFAULT_JWKS_CACHE_DURATION_SECONDS, DEFAULT_JWKS_FAILED_REFETCH_SECONDS,
    DEFAULT_JWKS_TIMEOUT_SECONDS,
};
use crate::errors::Result;
use crate::xds::filters::{any_from_message, invalid_config, message_from_any};
use envoy_types::pb::envoy::config::core::v3::{
    http_uri::HttpUpstreamType, BackoffStrategy, HttpUri, RetryPolicy,
};
use envoy_types::pb::envoy::extensions::filters::http::jwt_authn::v3::jwt_provider::{
    JwksSourceSpecifier, NormalizePayload,
};
use envoy_types::pb::envoy::extensions::filters::http::jwt_authn::v3::{
    jwt_requirement, per_route_config, JwksAsyncFetch, JwtAuthentication, JwtClaimToHeader,
    JwtHeader, JwtProvider, JwtRequirement, JwtRequirementOrList, PerRouteConfig, RemoteJwks,
};
use envoy_types::pb::envoy::extensions::filters::network::http_connection_manager::v3::{
    http_filter, HttpFilter,
};
use envoy_types::pb::google::protobuf::{Any, Duration as ProtoDuration, Empty, UInt32Value};

/// Name of the JWT authentication HTTP filter
pub const JWT_AUTHN_FILTER_NAME: &str = "envoy.filters.http.jwt_authn";

/// Type URL of the filter's top-level config
pub const JWT_AUTHN_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.http.jwt_authn.v3.JwtAuthentication";

/// Type URL of the filter's per-route config
pub const JWT_PER_ROUTE_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.http.jwt_authn.v3.PerRouteConfig";

/// Requirement map key shared by every listener and referenced from routes
pub const JWT_AUTH_REQUIREMENT_NAME: &str = "jwt_auth_secure";

/// Claims normalized from space-delimited strings into lists in dynamic metadata
const SPACE_DELIMITED_CLAIMS: &[&str] = &["scope"];

/// Providers and requirement installed into each HTTP connection manager
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JwtAuthenticationConfig {
    /// Providers keyed by name, in input order
    pub providers: Vec<(String, JwtProviderConfig)>,
    /// Requirement stored under [`JWT_AUTH_REQUIREMENT_NAME`], if any
    pub requirement: Option<JwtRequirementConfig>,
}

impl JwtAuthenticationConfig {
    /// Build the filter config, deriving the requirement from the provider names.
    pub fn new(providers: Vec<(String, JwtProviderConfig)>, allow_missing_fallback: bool) -> Self {
        let names: Vec<String> = providers.iter().map(|(name, _)| name.clone()).collect();
        let requirement = JwtRequirementConfig::for_providers(&names, allow_missing_fallback);
        Self { providers, requirement }
    }

    pub fn has_requirement(&self) -> bool {
        self.requirement.is_some()
    }

    /// Overwrite the provider and requirement maps of `proto`, keeping any other settings.
    pub fn apply_to(&self, proto: &mut JwtAuthentication) -> Result<()> {
        proto.providers = self
            .providers
            .iter()
            .map(|(name, cfg)| cfg.to_proto().map(|provider| (name.clone(), provider)))
            .collect::<Result<_>>()?;

        proto.requirement_map = match &self.requirement {
            Some(requirement) => {
                std::iter::once((JWT_AUTH_REQUIREMENT_NAME.to_string(), requirement.to_proto()?))
                    .collect()
            }
            None => Default::default(),
        };

        Ok(())
    }

    pub fn to_proto(&self) -> Result<JwtAuthentication> {
        let mut proto = JwtAuthentication::default();
        self.apply_to(&mut proto)?;
        Ok(proto)
    }
}

/// Wrap a JWT authentication config into an HTTP filter entry
pub fn jwt_authn_http_filter(config: &JwtAuthentication) -> HttpFilter {
    HttpFilter {
        name: JWT_AUTHN_FILTER_NAME.to_string(),
        config_type: Some(http_filter::ConfigType::TypedConfig(any_from_message(
            JWT_AUTHN_TYPE_URL,
            config,
        ))),
        ..Default::default()
    }
}

/// Decode the config of an existing JWT authentication filter.
///
/// A filter without a typed config decodes to an empty config.
pub fn decode_jwt_authn_filter(filter: &HttpFilter) -> Result<JwtAuthentication> {
    match &filter.config_type {
        Some(http_filter::ConfigType::TypedConfig(any)) => message_from_any(any, JWT_AUTHN_TYPE_URL),
        _ => Ok(JwtAuthentication::default()),
    }
}

/// Per-route override for the JWT authentication filter
#[derive(Debug, Clone, PartialEq)]
pub enum JwtPerRouteConfig {
    /// Disable JWT authentication for this route
    Disabled { disabled: bool },
    /// Reference a named requirement from the filter's requirement map
    RequirementName { requirement_name: String },
}

impl JwtPerRouteConfig {
    pub fn requirement(name: impl Into<String>) -> Self {
        Self::RequirementName { requirement_name: name.into() }
    }

    pub fn to_proto(&self) -> Result<PerRouteConfig> {
        let specifier = match self {
            JwtPerRouteConfig::Disabled { disabled } => {
                if !*disabled {
                    return Err(invalid_config(
                        "JwtAuthentication per-route disabled flag must be true when provided",
                    ));
                }
                per_route_config::RequirementSpecifier::Disabled(true)
            }
            JwtPerRouteConfig::RequirementName { requirement_name } => {
                if requirement_name.trim().is_empty() {
                    return Err(invalid_config(
                        "JwtAuthentication per-route requirement_name cannot be empty",
                    ));
                }
                per_route_config::RequirementSpecifier::RequirementName(requirement_name.clone())
            }
        };

        Ok(PerRouteConfig { requirement_specifier: Some(specifier) })
    }

    pub fn from_proto(proto: &PerRouteConfig) -> Result<Self> {
        match proto.requirement_specifier.as_ref() {
            Some(per_route_config::RequirementSpecifier::Disabled(value)) => {
                Ok(JwtPerRouteConfig::Disabled { disabled: *value })
            }
            Some(per_route_config::RequirementSpecifier::RequirementName(name)) => {
                Ok(JwtPerRouteConfig::RequirementName { requirement_name: name.clone() })
            }
            None => Err(invalid_config(
                "JwtAuthentication per-route config must specify disabled or requirement_name",
            )),
        }
    }

    /// Decode a packed per-route config
    pub fn from_any(any: &Any) -> Result<Self> {
        let proto: PerRouteConfig = message_from_any(any, JWT_PER_ROUTE_TYPE_URL)?;
        Self::from_proto(&proto)
    }

    pub fn to_any(&self) -> Result<Any> {
        Ok(any_from_message(JWT_PER_ROUTE_TYPE_URL, &self.to_proto()?))
    }

    pub fn requirement_name(&self) -> Option<&str> {
        match self {
            JwtPerRouteConfig::RequirementName { requirement_name } => Some(requirement_name),
            JwtPerRouteConfig::Disabled { .. } => None,
        }
    }
}

/// Supported requirement shapes
#[derive(Debug, Clone, PartialEq)]
pub enum JwtRequirementConfig {
    /// Require a single provider by name
    ProviderName { provider_name: String },
    /// Logical OR of nested requirements
    RequiresAny { requirements: Vec<JwtRequirementConfig> },
    /// Allow requests even if JWT is missing or invalid
    AllowMissingOrFailed,
}

impl JwtRequirementConfig {
    /// Requirement covering `provider_names`.
    ///
    /// One provider yields a direct reference, several yield an OR list. With
    /// no providers the result is the allow-missing fallback when enabled,
    /// otherwise `None`.
    pub fn for_providers(provider_names: &[String], allow_missing_fallback: bool) -> Option<Self> {
        match provider_names {
            [] if allow_missing_fallback => Some(JwtRequirementConfig::AllowMissingOrFailed),
            [] => None,
            [single] => Some(JwtRequirementConfig::ProviderName { provider_name: single.clone() }),
            many => Some(JwtRequirementConfig::RequiresAny {
                requirements: many
                    .iter()
                    .map(|name| JwtRequirementConfig::ProviderName { provider_name: name.clone() })
                    .collect(),
            }),
        }
    }

    pub fn to_proto(&self) -> Result<JwtRequirement> {
        let requires_type = match self {
            JwtRequirementConfig::ProviderName { provider_name } => {
                if provider_name.trim().is_empty() {
                    return Err(invalid_config(
                        "JwtAuthentication requirement provider_name cannot be empty",
                    ));
                }
                jwt_requirement::RequiresType::ProviderName(provider_name.clone())
            }
            JwtRequirementConfig::RequiresAny { requirements } => {
                if requirements.is_empty() {
                    return Err(invalid_config(
                        "JwtAuthentication requires_any must contain at least one requirement",
                    ));
                }
                jwt_requirement::RequiresType::RequiresAny(JwtRequirementOrList {
                    requirements: requirements
                        .iter()
                        .map(JwtRequirementConfig::to_proto)
                        .collect::<Result<_>>()?,
                })
            }
            JwtRequirementConfig::AllowMissingOrFailed => {
                jwt_requirement::RequiresType::AllowMissingOrFailed(Empty::default())
            }
        };

        Ok(JwtRequirement { requires_type: Some(requires_type) })
    }
}

/// Definition of per-provider behaviour
#[derive(Debug, Clone, PartialEq)]
pub struct JwtProviderConfig {
    pub issuer: String,
    pub audiences: Vec<String>,
    pub require_expiration: bool,
    pub clear_route_cache: bool,
    pub payload_in_metadata: String,
    pub forward: bool,
    pub from_headers: Vec<(String, String)>,
    pub from_cookies: Vec<String>,
    pub from_params: Vec<String>,
    pub claim_to_headers: Vec<(String, String)>,
    pub remote_jwks: RemoteJwksConfig,
}

impl JwtProviderConfig {
    /// Translate a provider spec. Metadata is keyed by the provider name and
    /// the token is forwarded upstream.
    pub fn from_spec(spec: &JwtProviderSpec, remote_jwks: RemoteJwksConfig) -> Self {
        let header_pairs = |headers: &[JwtHeaderSpec]| -> Vec<(String, String)> {
            headers
                .iter()
                .map(|h| (h.name.clone(), h.value_prefix.clone().unwrap_or_default()))
                .collect()
        };

        let mut from_headers = header_pairs(&spec.from_headers);
        let mut from_cookies = Vec::new();
        let mut from_params = Vec::new();
        if let Some(extract) = &spec.extract_from {
            from_headers = header_pairs(&extract.headers);
            from_cookies = extract.cookies.clone();
            from_params = extract.params.clone();
        }

        Self {
            issuer: spec.issuer.clone(),
            audiences: spec.audiences.clone(),
            require_expiration: spec.require_expiration,
            clear_route_cache: spec.recompute_route.unwrap_or(false),
            payload_in_metadata: spec.name.clone(),
            forward: true,
            from_headers,
            from_cookies,
            from_params,
            claim_to_headers: spec
                .claim_to_headers
                .iter()
                .map(|c| (c.header_name.clone(), c.claim_name.clone()))
                .collect(),
            remote_jwks,
        }
    }

    pub fn to_proto(&self) -> Result<JwtProvider> {
        for (header_name, claim_name) in &self.claim_to_headers {
            if header_name.trim().is_empty() || claim_name.trim().is_empty() {
                return Err(invalid_config(
                    "JwtAuthentication claim_to_headers requires header and claim names",
                ));
            }
        }

        Ok(JwtProvider {
            issuer: self.issuer.clone(),
            audiences: self.audiences.clone(),
            require_expiration: self.require_expiration,
            clear_route_cache: self.clear_route_cache,
            payload_in_metadata: self.payload_in_metadata.clone(),
            forward: self.forward,
            normalize_payload_in_metadata: Some(NormalizePayload {
                space_delimited_claims: SPACE_DELIMITED_CLAIMS.iter().map(|c| c.to_string()).collect(),
            }),
            from_headers: self
                .from_headers
                .iter()
                .map(|(name, value_prefix)| JwtHeader {
                    name: name.clone(),
                    value_prefix: value_prefix.clone(),
                })
                .collect(),
            from_cookies: self.from_cookies.clone(),
            from_params: self.from_params.clone(),
            claim_to_headers: self
                .claim_to_headers
                .iter()
                .map(|(header_name, claim_name)| JwtClaimToHeader {
                    header_name: header_name.clone(),
                    claim_name: claim_name.clone(),
                    claim_path: Vec::new(),
                })
                .collect(),
            jwks_source_specifier: Some(JwksSourceSpecifier::RemoteJwks(self.remote_jwks.to_proto()?)),
            ..Default::default()
        })
    }
}

/// Remote JWKS configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteJwksConfig {
    pub uri: String,
    pub cluster: String,
    pub timeout_seconds: i64,
    pub cache_duration_seconds: i64,
    pub async_fetch: JwksAsyncFetchConfig,
    pub retry_policy: Option<JwksRetryPolicyConfig>,
}

impl RemoteJwksConfig {
    /// Remote JWKS fetched from `uri` through `cluster`, with timeouts and
    /// retries taken from `spec` when the provider declared one.
    pub fn from_spec(uri: &str, cluster: impl Into<String>, spec: Option<&RemoteJwksSpec>) -> Self {
        Self {
            uri: uri.to_string(),
            cluster: cluster.into(),
            timeout_seconds: spec
                .map(RemoteJwksSpec::effective_timeout_seconds)
                .unwrap_or(DEFAULT_JWKS_TIMEOUT_SECONDS),
            cache_duration_seconds: spec
                .map(RemoteJwksSpec::effective_cache_duration_seconds)
                .unwrap_or(DEFAULT_JWKS_CACHE_DURATION_SECONDS),
            async_fetch: JwksAsyncFetchConfig::default(),
            retry_policy: spec
                .and_then(|s| s.retry.as_ref())
                .map(JwksRetryPolicyConfig::from_spec),
        }
    }

    pub fn to_proto(&self) -> Result<RemoteJwks> {
        if self.uri.trim().is_empty() {
            return Err(invalid_config("JwtAuthentication remote_jwks.uri cannot be empty"));
        }
        if self.cluster.trim().is_empty() {
            return Err(invalid_config("JwtAuthentication remote_jwks.cluster cannot be empty"));
        }

        Ok(RemoteJwks {
            http_uri: Some(HttpUri {
                uri: self.uri.clone(),
                http_upstream_type: Some(HttpUpstreamType::Cluster(self.cluster.clone())),
                timeout: Some(seconds(self.timeout_seconds)),
            }),
            cache_duration: Some(seconds(self.cache_duration_seconds)),
            async_fetch: Some(self.async_fetch.to_proto()),
            retry_policy: self.retry_policy.as_ref().map(JwksRetryPolicyConfig::to_proto),
        })
    }
}

/// Remote JWKS async fetch configuration
#[derive(Debug, Clone, PartialEq)]
pub struct JwksAsyncFetchConfig {
    pub fast_listener: bool,
    pub failed_refetch_duration_seconds: i64,
}

impl Default for JwksAsyncFetchConfig {
    fn default() -> Self {
        Self {
            fast_listener: true,
            failed_refetch_duration_seconds: DEFAULT_JWKS_FAILED_REFETCH_SECONDS,
        }
    }
}

impl JwksAsyncFetchConfig {
    fn to_proto(&self) -> JwksAsyncFetch {
        JwksAsyncFetch {
            fast_listener: self.fast_listener,
            failed_refetch_duration: Some(seconds(self.failed_refetch_duration_seconds)),
        }
    }
}

/// Remote JWKS retry policy configuration
#[derive(Debug, Clone, PartialEq)]
pub struct JwksRetryPolicyConfig {
    pub retry_on: String,
    pub num_retries: Option<u32>,
    pub retry_backoff: Option<RetryBackoffConfig>,
}

impl JwksRetryPolicyConfig {
    pub fn from_spec(spec: &RetrySpec) -> Self {
        Self {
            retry_on: spec.effective_retry_on().to_string(),
            num_retries: spec.effective_num_retries(),
            retry_backoff: spec.back_off.as_ref().map(RetryBackoffConfig::from_spec),
        }
    }

    fn to_proto(&self) -> RetryPolicy {
        RetryPolicy {
            retry_on: self.retry_on.clone(),
            num_retries: self.num_retries.map(|value| UInt32Value { value }),
            retry_back_off: self.retry_backoff.as_ref().map(RetryBackoffConfig::to_proto),
            ..Default::default()
        }
    }
}

/// Retry backoff configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryBackoffConfig {
    pub base_interval_seconds: i64,
    pub max_interval_seconds: i64,
}

impl RetryBackoffConfig {
    pub fn from_spec(spec: &BackOffSpec) -> Self {
        Self {
            base_interval_seconds: spec.effective_base_interval_seconds(),
            max_interval_seconds: spec.effective_max_interval_seconds(),
        }
    }

    fn to_proto(&self) -> BackoffStrategy {
        BackoffStrategy {
            base_interval: Some(seconds(self.base_interval_seconds)),
            max_interval: Some(seconds(self.max_interval_seconds)),
        }
    }
}

fn seconds(value: i64) -> ProtoDuration {
    ProtoDuration { seconds: value, nanos: 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::jwt_provider::{ClaimToHeaderSpec, JwtExtractorSpec};

    fn fixture_spec() -> JwtProviderSpec {
        JwtProviderSpec {
            name: "Provider".into(),
            issuer: "https://example.com".into(),
            audiences: vec!["api".into()],
            remote_jwks: Some(RemoteJwksSpec {
                uri: "https://example.com/jwks".into(),
                timeout_sec: 0,
                cache_duration: 300,
                retry: Some(RetrySpec {
                    retry_on: String::new(),
                    num_retries: Some(0),
                    back_off: Some(BackOffSpec { base_interval_sec: 1, max_interval_sec: 1 }),
                }),
            }),
            from_headers: vec![JwtHeaderSpec {
                name: "X-Custom-Header".into(),
                value_prefix: Some("prefix".into()),
            }],
            claim_to_headers: vec![ClaimToHeaderSpec {
                header_name: "X-Custom-Header".into(),
                claim_name: "claim".into(),
            }],
            ..Default::default()
        }
    }

    fn fixture_provider() -> JwtProviderConfig {
        let spec = fixture_spec();
        let remote = spec.remote_jwks.as_ref();
        JwtProviderConfig::from_spec(
            &spec,
            RemoteJwksConfig::from_spec("https://example.com/jwks", "example_com_443|jwtext", remote),
        )
    }

    #[test]
    fn builds_provider_proto() {
        let proto = fixture_provider().to_proto().unwrap();

        assert_eq!(proto.issuer, "https://example.com");
        assert_eq!(proto.payload_in_metadata, "Provider");
        assert!(proto.forward);
        assert_eq!(proto.normalize_payload_in_metadata.unwrap().space_delimited_claims, vec!["scope"]);
        assert_eq!(proto.from_headers[0].name, "X-Custom-Header");
        assert_eq!(proto.from_headers[0].value_prefix, "prefix");
        assert_eq!(proto.claim_to_headers[0].claim_name, "claim");

        let Some(JwksSourceSpecifier::RemoteJwks(remote)) = proto.jwks_source_specifier else {
            panic!("expected remote JWKS");
        };
        let http_uri = remote.http_uri.unwrap();
        assert_eq!(http_uri.uri, "https://example.com/jwks");
        assert_eq!(
            http_uri.http_upstream_type,
            Some(HttpUpstreamType::Cluster("example_com_443|jwtext".into()))
        );
        assert_eq!(http_uri.timeout.unwrap().seconds, 2);
        assert_eq!(remote.cache_duration.unwrap().seconds, 300);

        let async_fetch = remote.async_fetch.unwrap();
        assert!(async_fetch.fast_listener);
        assert_eq!(async_fetch.failed_refetch_duration.unwrap().seconds, 5);

        let retry = remote.retry_policy.unwrap();
        assert_eq!(retry.retry_on, crate::domain::jwt_provider::DEFAULT_RETRY_ON);
        assert_eq!(retry.num_retries.unwrap().value, 2);
        let backoff = retry.retry_back_off.unwrap();
        assert_eq!(backoff.base_interval.unwrap().seconds, 1);
        assert_eq!(backoff.max_interval.unwrap().seconds, 1);
    }

    #[test]
    fn retry_without_backoff_or_count_omits_them() {
        let policy = JwksRetryPolicyConfig::from_spec(&RetrySpec::default()).to_proto();
        assert!(policy.retry_back_off.is_none());
        assert!(policy.num_retries.is_none());
    }

    #[test]
    fn extract_from_replaces_headers() {
        let mut spec = fixture_spec();
        spec.extract_from = Some(JwtExtractorSpec {
            headers: vec![],
            cookies: vec!["session".into()],
            params: vec!["Param one".into(), "Param two".into()],
        });

        let cfg = JwtProviderConfig::from_spec(
            &spec,
            RemoteJwksConfig::from_spec("https://example.com/jwks", "c", None),
        );
        assert!(cfg.from_headers.is_empty());
        assert_eq!(cfg.from_cookies, vec!["session"]);
        assert_eq!(cfg.from_params, vec!["Param one", "Param two"]);
    }

    #[test]
    fn default_remote_jwks_without_spec() {
        let remote = RemoteJwksConfig::from_spec("https://idp/jwks", "idp_443|jwtext", None);
        assert_eq!(remote.timeout_seconds, 2);
        assert_eq!(remote.cache_duration_seconds, 600);
        assert!(remote.retry_policy.is_none());
    }

    #[test]
    fn remote_jwks_requires_cluster() {
        let remote = RemoteJwksConfig::from_spec("https://idp/jwks", "", None);
        assert!(remote.to_proto().is_err());
    }

    #[test]
    fn requirement_shapes_follow_provider_count() {
        assert_eq!(JwtRequirementConfig::for_providers(&[], false), None);
        assert_eq!(
            JwtRequirementConfig::for_providers(&[], true),
            Some(JwtRequirementConfig::AllowMissingOrFailed)
        );

        let single = JwtRequirementConfig::for_providers(&["a".into()], true).unwrap();
        assert_eq!(
            single.to_proto().unwrap().requires_type,
            Some(jwt_requirement::RequiresType::ProviderName("a".into()))
        );

        let many = JwtRequirementConfig::for_providers(&["a".into(), "b".into()], false).unwrap();
        match many.to_proto().unwrap().requires_type {
            Some(jwt_requirement::RequiresType::RequiresAny(list)) => {
                assert_eq!(list.requirements.len(), 2);
                assert_eq!(
                    list.requirements[1].requires_type,
                    Some(jwt_requirement::RequiresType::ProviderName("b".into()))
                );
            }
            other => panic!("unexpected requirement {other:?}"),
        }
    }

    #[test]
    fn apply_to_keeps_unrelated_settings() {
        let mut existing = JwtAuthentication { bypass_cors_preflight: true, ..Default::default() };
        let config = JwtAuthenticationConfig::new(vec![("Provider".into(), fixture_provider())], false);
        config.apply_to(&mut existing).unwrap();

        assert!(existing.bypass_cors_preflight);
        assert!(existing.providers.contains_key("Provider"));
        assert!(existing.requirement_map.contains_key(JWT_AUTH_REQUIREMENT_NAME));
    }

    #[test]
    fn no_providers_without_fallback_has_no_requirement() {
        let config = JwtAuthenticationConfig::new(vec![], false);
        assert!(!config.has_requirement());
        let proto = config.to_proto().unwrap();
        assert!(proto.requirement_map.is_empty());
        assert!(proto.providers.is_empty());
    }

    #[test]
    fn http_filter_round_trips_config() {
        let proto = JwtAuthenticationConfig::new(vec![("Provider".into(), fixture_provider())], false)
            .to_proto()
            .unwrap();
        let filter = jwt_authn_http_filter(&proto);
        assert_eq!(filter.name, JWT_AUTHN_FILTER_NAME);
        assert_eq!(decode_jwt_authn_filter(&filter).unwrap(), proto);

        let bare = HttpFilter { name: JWT_AUTHN_FILTER_NAME.into(), ..Default::default() };
        assert_eq!(decode_jwt_authn_filter(&bare).unwrap(), JwtAuthentication::default());
    }

    #[test]
    fn per_route_config_converts() {
        let cfg = JwtPerRouteConfig::requirement(JWT_AUTH_REQUIREMENT_NAME);
        let any = cfg.to_any().unwrap();
        assert_eq!(any.type_url, JWT_PER_ROUTE_TYPE_URL);
        let decoded = JwtPerRouteConfig::from_any(&any).unwrap();
        assert_eq!(decoded.requirement_name(), Some(JWT_AUTH_REQUIREMENT_NAME));

        let disabled = JwtPerRouteConfig::from_proto(&PerRouteConfig {
            requirement_specifier: Some(per_route_config::RequirementSpecifier::Disabled(true)),
        })
        .unwrap();
        assert_eq!(disabled.requirement_name(), None);

        assert!(JwtPerRouteConfig::requirement("  ").to_proto().is_err());
        assert!(JwtPerRouteConfig::from_proto(&PerRouteConfig::default()).is_err());
    }
}
