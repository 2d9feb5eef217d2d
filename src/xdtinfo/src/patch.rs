//! Deep merge of patch overlays onto server data
//!
//! Overlay rules, applied key by key:
//!
//! | overlay                | effect on base                               |
//! |------------------------|----------------------------------------------|
//! | `"!key": v`            | `key` is assigned `v` as-is                  |
//! | `"key": null`          | `key` is removed                             |
//! | `"key": [..]`          | items are appended to the base list          |
//! | `"key": {..}`          | merged recursively                           |
//! | `"key": scalar`        | `key` is replaced                            |
//! | key absent from base   | inserted                                     |

use serde_json::{Map, Value};

/// Marker prefix forcing direct assignment
pub const ASSIGN_PREFIX: char = '!';

/// Merge `overlay` into `base` in place.
///
/// Non-object overlays replace the base wholesale.
pub fn merge(base: &mut Value, overlay: &Value) {
    let Some(patch) = overlay.as_object() else {
        *base = overlay.clone();
        return;
    };

    if !base.is_object() {
        *base = Value::Object(Map::new());
    }

    if let Value::Object(target) = base {
        merge_object(target, patch);
    }
}

fn merge_object(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        if let Some(stripped) = key.strip_prefix(ASSIGN_PREFIX) {
            target.insert(stripped.to_string(), value.clone());
            continue;
        }

        let Some(existing) = target.get_mut(key) else {
            target.insert(key.clone(), value.clone());
            continue;
        };

        match value {
            Value::Null => {
                target.shift_remove(key);
            }
            Value::Array(items) => match existing {
                Value::Array(list) => list.extend(items.iter().cloned()),
                other => *other = value.clone(),
            },
            Value::Object(_) => merge(existing, value),
            scalar => *existing = scalar.clone(),
        }
    }
}

/// Apply `overlays` in order to a copy of `base`
pub fn patched(base: &Value, overlays: &[Value]) -> Value {
    let mut out = base.clone();
    for overlay in overlays {
        merge(&mut out, overlay);
    }
    out
}
