//! Merging an edit over a stored document.

use serde_json::Value;

/// Deep-merges `patch` into `base`. Objects merge key by key; arrays and
/// scalars in the patch replace what was there.
pub fn merge_documents(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_documents(existing, value);
                        continue;
                    }
                    _ => {}
                }
                base.insert(key.clone(), value.clone());
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}
