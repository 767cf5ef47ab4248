use serde_json::Value;

/// Depth-first search for `key` in a parsed JSON document.
///
/// A mapping holding the key answers immediately (a `null` there ends the
/// search in that mapping). Otherwise mapping values are searched in
/// document order, then sequence elements in order; the first hit wins,
/// regardless of depth.
pub fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => {
            if let Some(found) = map.get(key) {
                return (!found.is_null()).then_some(found);
            }
            map.values().find_map(|child| find_key(child, key))
        }
        Value::Array(items) => items.iter().find_map(|item| find_key(item, key)),
        _ => None,
    }
}
