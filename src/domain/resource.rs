//! Extension resource envelopes
//!
//! Every resource attached to a listener arrives as opaque JSON. The envelope
//! (`kind` + `apiVersion`) decides which typed decoder applies.

use crate::domain::jwt_provider::JwtProviderResource;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// API group of the extension's resources
pub const GROUP_NAME: &str = "gateway.extensions.envoyproxy.io";

/// `apiVersion` of the supported JWTProvider schema
pub const JWT_PROVIDER_API_VERSION: &str = "gateway.extensions.envoyproxy.io/v1alpha1";

/// `kind` of JWTProvider resources
pub const JWT_PROVIDER_KIND: &str = "JWTProvider";

/// Type metadata shared by every resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceEnvelope {
    pub kind: String,
    pub api_version: String,
}

/// A decoded extension resource of a supported kind
#[derive(Debug, Clone, PartialEq)]
pub enum TypedResource {
    JwtProvider(Box<JwtProviderResource>),
}

impl TypedResource {
    /// Decode raw resource bytes.
    ///
    /// Returns `Ok(None)` for kinds or versions this extension does not handle.
    pub fn decode(bytes: &[u8]) -> Result<Option<Self>> {
        let envelope: ResourceEnvelope = serde_json::from_slice(bytes)
            .map_err(|e| Error::decode("resource envelope", e))?;

        match (envelope.kind.as_str(), envelope.api_version.as_str()) {
            (JWT_PROVIDER_KIND, JWT_PROVIDER_API_VERSION) => {
                let provider: JwtProviderResource = serde_json::from_slice(bytes)
                    .map_err(|e| Error::decode(JWT_PROVIDER_KIND, e))?;
                provider
                    .validate()
                    .map_err(|e| Error::decode(JWT_PROVIDER_KIND, Error::from(e)))?;
                Ok(Some(Self::JwtProvider(Box::new(provider))))
            }
            _ => Ok(None),
        }
    }
}

/// Decoded resources grouped by kind, preserving input order within a kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceSet {
    pub jwt_providers: Vec<JwtProviderResource>,
}

impl ResourceSet {
    pub fn push(&mut self, resource: TypedResource) {
        match resource {
            TypedResource::JwtProvider(provider) => self.jwt_providers.push(*provider),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.jwt_providers.is_empty()
    }
}
