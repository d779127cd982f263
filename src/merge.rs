use crate::schema::KeySchema;
use crate::types::RawConfigMap;

/// Merge `overlay` on top of `base`, key by key.
///
/// A non-empty overlay value replaces the base value. An empty overlay value
/// removes the key from `base`, whatever layer it came from. Global-only keys
/// in `overlay` are skipped.
pub fn merge_layer<'a>(
    base: &mut RawConfigMap,
    overlay: impl IntoIterator<Item = (&'a String, &'a String)>,
    schema: &KeySchema,
) {
    for (key, value) in overlay {
        if schema.is_global_only(key) {
            continue;
        }
        if value.is_empty() {
            base.remove(key);
        } else {
            base.insert(key.clone(), value.clone());
        }
    }
}
