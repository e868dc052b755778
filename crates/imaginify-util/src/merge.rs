//! Recursive merge of JSON transformation settings.

use serde_json::Value;

/// Merge `primary` over `fallback`.
///
/// Keys from both objects are kept. When both sides hold an object under the
/// same key the two are merged recursively; otherwise the value from
/// `primary` wins, even when it is `null`. A top-level `null` on either side
/// yields the other side. Non-object inputs resolve to `primary`.
pub fn deep_merge(primary: &Value, fallback: &Value) -> Value {
    match (primary, fallback) {
        (p, Value::Null) => p.clone(),
        (Value::Null, f) => f.clone(),
        (Value::Object(p), Value::Object(f)) => {
            let mut out = f.clone();
            for (key, pv) in p {
                let merged = match (pv, f.get(key)) {
                    (Value::Object(_), Some(fv @ Value::Object(_))) => deep_merge(pv, fv),
                    _ => pv.clone(),
                };
                out.insert(key.clone(), merged);
            }
            Value::Object(out)
        }
        (p, _) => p.clone(),
    }
}
