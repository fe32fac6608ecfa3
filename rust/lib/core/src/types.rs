/// Generate a new random identifier (UUIDv4, 32 hex chars, no dashes).
///
/// 122 random bits make collisions practically impossible even when many
/// records are created within the same millisecond.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Get the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Merge a JSON patch into a base value (RFC 7386 JSON Merge Patch).
///
/// For each key in `patch`:
/// - If the value is `null`, the key is removed from `base`.
/// - If both sides are objects, they are merged recursively.
/// - Otherwise, the key is set to the patch value.
pub fn merge_patch(base: &mut serde_json::Value, patch: &serde_json::Value) {
    let (Some(base_obj), Some(patch_obj)) = (base.as_object_mut(), patch.as_object()) else {
        *base = patch.clone();
        return;
    };

    for (key, value) in patch_obj {
        if value.is_null() {
            base_obj.remove(key);
        } else if value.is_object() {
            let entry = base_obj
                .entry(key.clone())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            merge_patch(entry, value);
        } else {
            base_obj.insert(key.clone(), value.clone());
        }
    }
}
