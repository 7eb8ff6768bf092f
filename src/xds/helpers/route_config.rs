//! Narrow accessor over a route's per-filter config map.

use crate::errors::Result;
use envoy_types::pb::envoy::config::route::v3::Route;
use envoy_types::pb::google::protobuf::Any;

/// Mutable view of `Route::typed_per_filter_config`
pub struct PerFilterConfig<'a> {
    route: &'a mut Route,
}

impl<'a> PerFilterConfig<'a> {
    pub fn of(route: &'a mut Route) -> Self {
        Self { route }
    }

    pub fn route_name(&self) -> &str {
        &self.route.name
    }

    pub fn contains(&self, filter_name: &str) -> bool {
        self.route.typed_per_filter_config.contains_key(filter_name)
    }

    pub fn get(&self, filter_name: &str) -> Option<&Any> {
        self.route.typed_per_filter_config.get(filter_name)
    }

    pub fn insert(&mut self, filter_name: &str, config: Any) {
        self.route.typed_per_filter_config.insert(filter_name.to_string(), config);
    }

    /// Remove every entry for which `remove` returns `Ok(true)`.
    ///
    /// An error from the predicate keeps the entry; the error is returned to
    /// the caller alongside the entry key so it can be logged.
    pub fn remove_where<F>(&mut self, mut remove: F) -> Vec<(String, crate::Error)>
    where
        F: FnMut(&str, &Any) -> Result<bool>,
    {
        let mut failures = Vec::new();
        self.route.typed_per_filter_config.retain(|key, any| match remove(key, any) {
            Ok(drop) => !drop,
            Err(e) => {
                failures.push((key.clone(), e));
                true
            }
        });
        failures
    }

    pub fn clear(&mut self) {
        self.route.typed_per_filter_config.clear();
    }

    pub fn len(&self) -> usize {
        self.route.typed_per_filter_config.len()
    }

    pub fn is_empty(&self) -> bool {
        self.route.typed_per_filter_config.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn any(type_url: &str) -> Any {
        Any { type_url: type_url.to_string(), value: vec![] }
    }

    #[test]
    fn insert_get_and_clear() {
        let mut route = Route { name: "r".into(), ..Default::default() };
        let mut cfg = PerFilterConfig::of(&mut route);
        assert_eq!(cfg.route_name(), "r");
        assert!(cfg.is_empty());

        cfg.insert("envoy.filters.http.cors", any("cors"));
        assert!(cfg.contains("envoy.filters.http.cors"));
        assert_eq!(cfg.get("envoy.filters.http.cors").unwrap().type_url, "cors");
        assert_eq!(cfg.len(), 1);

        cfg.clear();
        assert!(cfg.is_empty());
    }

    #[test]
    fn remove_where_keeps_entries_on_error() {
        let mut route = Route::default();
        let mut cfg = PerFilterConfig::of(&mut route);
        cfg.insert("drop", any("a"));
        cfg.insert("keep", any("b"));
        cfg.insert("broken", any("c"));

        let failures = cfg.remove_where(|key, _| match key {
            "drop" => Ok(true),
            "broken" => Err(Error::decode("per-route", "bad")),
            _ => Ok(false),
        });

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "broken");
        assert!(!cfg.contains("drop"));
        assert!(cfg.contains("keep"));
        assert!(cfg.contains("broken"));
    }
}
