//! HTTP filter configuration helpers

pub mod jwt_auth;

pub use jwt_auth::{
    JwksAsyncFetchConfig, JwksRetryPolicyConfig, JwtAuthenticationConfig, JwtPerRouteConfig,
    JwtProviderConfig, JwtRequirementConfig, RemoteJwksConfig, RetryBackoffConfig,
    JWT_AUTHN_FILTER_NAME, JWT_AUTHN_TYPE_URL, JWT_AUTH_REQUIREMENT_NAME, JWT_PER_ROUTE_TYPE_URL,
};
