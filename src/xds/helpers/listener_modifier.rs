//! Helper for modifying Envoy Listener protobuf resources.
//!
//! Locates the HTTP connection manager in each filter chain (including the
//! default chain), hands it to a callback and writes the re-encoded manager
//! back at its original position.

use crate::errors::{Error, Result};
use crate::xds::filters::{any_from_message, message_from_any};
use envoy_types::pb::envoy::config::listener::v3::filter::ConfigType;
use envoy_types::pb::envoy::config::listener::v3::{FilterChain, Listener};
use envoy_types::pb::envoy::extensions::filters::network::http_connection_manager::v3::{
    HttpConnectionManager, HttpFilter,
};

/// Network filter name of the HTTP connection manager
pub const HCM_FILTER_NAME: &str = "envoy.filters.network.http_connection_manager";

/// Type URL of the HTTP connection manager config
pub const HCM_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.network.http_connection_manager.v3.HttpConnectionManager";

/// Find and decode the HTTP connection manager of a filter chain.
///
/// Returns the decoded manager with its index in the chain's filter list, or
/// `None` when the chain carries no manager.
pub fn find_hcm(chain: &FilterChain) -> Result<Option<(HttpConnectionManager, usize)>> {
    let Some((index, filter)) =
        chain.filters.iter().enumerate().find(|(_, f)| f.name == HCM_FILTER_NAME)
    else {
        return Ok(None);
    };

    match &filter.config_type {
        Some(ConfigType::TypedConfig(any)) => {
            let hcm = message_from_any(any, HCM_TYPE_URL)?;
            Ok(Some((hcm, index)))
        }
        _ => Err(Error::decode(
            format!("filter chain '{}'", chain.name),
            "HTTP connection manager has no typed config",
        )),
    }
}

/// Position of the first HTTP filter named `name`
pub fn find_http_filter(filters: &[HttpFilter], name: &str) -> Option<usize> {
    filters.iter().position(|f| f.name == name)
}

/// Helper for modifying the HTTP connection managers of a Listener.
///
/// # Example
///
/// ```rust,ignore
/// let mut modifier = ListenerModifier::new(&mut listener);
/// let updated = modifier.for_each_hcm(|hcm, chain| {
///     hcm.http_filters.insert(0, my_filter.clone());
///     Ok(true)
/// })?;
/// ```
pub struct ListenerModifier<'a> {
    listener: &'a mut Listener,
    modified: bool,
}

impl<'a> ListenerModifier<'a> {
    pub fn new(listener: &'a mut Listener) -> Self {
        Self { listener, modified: false }
    }

    /// Get the listener name.
    pub fn name(&self) -> &str {
        &self.listener.name
    }

    /// Number of filter chains, counting the default chain.
    pub fn filter_chain_count(&self) -> usize {
        self.listener.filter_chains.len() + usize::from(self.listener.default_filter_chain.is_some())
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Apply `f` to the HTTP connection manager of every filter chain.
    ///
    /// The callback receives the decoded manager and the chain name and
    /// returns `Ok(true)` when it changed the manager, which is then
    /// re-encoded in place. Chains without a manager, or whose manager fails
    /// to decode, are logged and skipped. Errors returned by `f` abort the walk.
    ///
    /// Returns the number of managers rewritten.
    pub fn for_each_hcm<F>(&mut self, mut f: F) -> Result<usize>
    where
        F: FnMut(&mut HttpConnectionManager, &str) -> Result<bool>,
    {
        let listener_name = self.listener.name.clone();
        let mut modified_count = 0;

        let chains = self
            .listener
            .filter_chains
            .iter_mut()
            .chain(self.listener.default_filter_chain.iter_mut());

        for chain in chains {
            let (mut hcm, index) = match find_hcm(chain) {
                Ok(Some(found)) => found,
                Ok(None) => {
                    tracing::warn!(
                        listener = %listener_name,
                        filter_chain = %chain.name,
                        "No HTTP connection manager in filter chain; skipping"
                    );
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        listener = %listener_name,
                        filter_chain = %chain.name,
                        error = %e,
                        "Failed to decode HTTP connection manager; skipping"
                    );
                    continue;
                }
            };

            if f(&mut hcm, &chain.name)? {
                chain.filters[index].config_type =
                    Some(ConfigType::TypedConfig(any_from_message(HCM_TYPE_URL, &hcm)));
                self.modified = true;
                modified_count += 1;
            }
        }

        Ok(modified_count)
    }
}
