//! Domain layer
//!
//! Resource types the extension understands, independent of the gRPC and
//! xDS plumbing.
//!
//! - `jwt_provider`: the JWTProvider resource and its defaulting rules
//! - `resource`: envelope dispatch from raw bytes to typed resources

pub mod jwt_provider;
pub mod resource;

pub use jwt_provider::{
    BackOffSpec, ClaimToHeaderSpec, JwtExtractorSpec, JwtHeaderSpec, JwtProviderResource,
    JwtProviderSpec, LocalObjectReference, ObjectMeta, RemoteJwksSpec, RetrySpec,
};
pub use resource::{
    ResourceEnvelope, ResourceSet, TypedResource, GROUP_NAME, JWT_PROVIDER_API_VERSION,
    JWT_PROVIDER_KIND,
};
