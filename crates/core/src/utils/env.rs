//! Environment variable maps

use std::collections::BTreeMap;

/// Environment variables keyed by name, ordered for stable command rendering.
pub type EnvMap = BTreeMap<String, String>;

/// Returns a new map with `overlay` applied on top of `base`.
pub fn merge_env(base: &EnvMap, overlay: &EnvMap) -> EnvMap {
    let mut merged = base.clone();
    merged.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}
