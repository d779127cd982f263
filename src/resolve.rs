//! Core resolution pipeline: merge the scopes of one source into the
//! configuration of one server.
//!
//! Operates on an already-loaded [`ConfigSource`] with no I/O. Steps:
//!
//! 1. Start from `base` if the caller supplied one, else an empty map
//! 2. Merge the global scope on top, skipping global-only keys
//! 3. Shift offset keys by `id - 1`
//! 4. Merge the server's override scope on top (if it has one)
//!
//! In both merges an empty value removes the key rather than storing an
//! empty string. Defaults are not baked in; [`ServerConfig`] consults them
//! at read time.
//!
//! The order is load-bearing: overrides see the shifted value and may replace
//! or unset it.
//!
//! [`ServerConfig`]: crate::ServerConfig

use std::collections::BTreeMap;

use tracing::debug;

use crate::merge::merge_layer;
use crate::schema::KeySchema;
use crate::source::ConfigSource;
use crate::types::{RawConfigMap, ServerId};

/// Resolve the configuration of server `id`.
///
/// `base` is an optional lower layer the global scope is merged into, such as
/// values persisted for this server, or a map reused across a batch of ids.
/// It is consumed. `None` behaves exactly like `Some(RawConfigMap::new())`.
pub fn resolve(
    source: &ConfigSource,
    schema: &KeySchema,
    id: ServerId,
    base: Option<RawConfigMap>,
) -> RawConfigMap {
    let mut resolved = base.unwrap_or_default();

    merge_layer(&mut resolved, source.global_scope(), schema);
    apply_offsets(&mut resolved, schema, id);
    if let Some(overrides) = source.override_scope(id) {
        merge_layer(&mut resolved, overrides, schema);
    }

    debug!(server_id = id, keys = resolved.len(), "resolved server configuration");
    resolved
}

/// Resolve every server that has an override scope in `source`.
pub fn resolve_all(source: &ConfigSource, schema: &KeySchema) -> BTreeMap<ServerId, RawConfigMap> {
    source
        .server_ids()
        .map(|id| (id, resolve(source, schema, id, None)))
        .collect()
}

/// Add `id - 1` to every offset key holding an integer. Anything else,
/// including arithmetic overflow, is left as it is.
fn apply_offsets(config: &mut RawConfigMap, schema: &KeySchema, id: ServerId) {
    let Some(delta) = id.checked_sub(1) else {
        return;
    };
    for key in schema.offset_keys() {
        let Some(value) = config.get_mut(key) else {
            continue;
        };
        match value.parse::<i64>().ok().and_then(|n| n.checked_add(delta)) {
            Some(shifted) => *value = shifted.to_string(),
            None => debug!(key, value = %value, "offset key is not an integer, left unchanged"),
        }
    }
}
