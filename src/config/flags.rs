//! Named boolean feature gates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Skip all JWT provider processing; hooks echo or strip their inputs.
pub const DISABLE_JWT_PROVIDER_COMPUTATION: &str = "disable-jwt-provider-computation";

/// Install an allow-missing fallback requirement when no provider survives.
pub const ENABLE_ALLOW_MISSING_JWT_AUTHENTICATION: &str = "enable-allow-missing-jwt-authentication-envoy";

/// Map of gate name to enabled state. Unknown gates are disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureGates(BTreeMap<String, bool>);

impl FeatureGates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper, mostly for tests and embedding.
    pub fn with(mut self, name: &str, enabled: bool) -> Self {
        self.set(name, enabled);
        self
    }

    pub fn set(&mut self, name: &str, enabled: bool) {
        self.0.insert(name.to_string(), enabled);
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn jwt_computation_disabled(&self) -> bool {
        self.is_enabled(DISABLE_JWT_PROVIDER_COMPUTATION)
    }

    pub fn allow_missing_fallback(&self) -> bool {
        self.is_enabled(ENABLE_ALLOW_MISSING_JWT_AUTHENTICATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_gates_default_to_disabled() {
        let gates = FeatureGates::new();
        assert!(!gates.is_enabled("something-else"));
        assert!(!gates.jwt_computation_disabled());
        assert!(!gates.allow_missing_fallback());
    }

    #[test]
    fn gates_deserialize_from_map() {
        let gates: FeatureGates = serde_json::from_str(
            r#"{"disable-jwt-provider-computation": true, "enable-allow-missing-jwt-authentication-envoy": false}"#,
        )
        .unwrap();
        assert!(gates.jwt_computation_disabled());
        assert!(!gates.allow_missing_fallback());
    }
}
