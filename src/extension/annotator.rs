//! Per-route JWT requirement annotations
//!
//! Every route of a virtual host references the shared requirement installed
//! by the listener hook through its per-filter config map.

use crate::errors::Result;
use crate::xds::filters::http::jwt_auth::{
    JwtPerRouteConfig, JWT_AUTHN_FILTER_NAME, JWT_AUTH_REQUIREMENT_NAME, JWT_PER_ROUTE_TYPE_URL,
};
use crate::xds::helpers::PerFilterConfig;
use envoy_types::pb::envoy::config::route::v3::Route;
use tracing::{debug, warn};

/// Point every route at the shared JWT requirement.
///
/// Annotations left by an earlier run are removed before the new one is
/// added, so repeated calls leave exactly one entry per route. Entries that
/// fail to decode are kept and logged. Returns the number of routes annotated.
pub fn annotate_routes(routes: &mut [Route]) -> Result<usize> {
    let annotation = JwtPerRouteConfig::requirement(JWT_AUTH_REQUIREMENT_NAME).to_any()?;
    let mut annotated = 0;

    for route in routes.iter_mut() {
        let mut per_filter = PerFilterConfig::of(route);

        let failures = per_filter.remove_where(|_, any| {
            if any.type_url != JWT_PER_ROUTE_TYPE_URL {
                return Ok(false);
            }
            let existing = JwtPerRouteConfig::from_any(any)?;
            Ok(existing.requirement_name() == Some(JWT_AUTH_REQUIREMENT_NAME))
        });
        for (key, e) in failures {
            warn!(route = %per_filter.route_name(), filter = %key, error = %e, "Failed to decode per-route config; leaving it in place");
        }

        if per_filter.contains(JWT_AUTHN_FILTER_NAME) {
            debug!(route = %per_filter.route_name(), "Route already carries a JWT per-route config");
            continue;
        }

        per_filter.insert(JWT_AUTHN_FILTER_NAME, annotation.clone());
        annotated += 1;
    }

    Ok(annotated)
}

/// Clear the per-filter config of every route
pub fn strip_routes(routes: &mut [Route]) {
    for route in routes.iter_mut() {
        PerFilterConfig::of(route).clear();
    }
}
