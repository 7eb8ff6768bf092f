//! Helper utilities for xDS resource manipulation.
//!
//! Narrow accessors over the protobuf structures the hooks rewrite, so the
//! translation logic never walks raw listener or route messages itself.

mod listener_modifier;
mod route_config;

pub use listener_modifier::{
    find_hcm, find_http_filter, ListenerModifier, HCM_FILTER_NAME, HCM_TYPE_URL,
};
pub use route_config::PerFilterConfig;

#[cfg(test)]
pub(crate) use listener_modifier::tests as listener_fixtures;
