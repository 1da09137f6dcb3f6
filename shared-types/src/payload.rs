use serde_json::Value;

use crate::pool::Pool;

/// Pulls pool records out of a list response. The API answers either with a
/// bare array or with a paginated envelope carrying a `results` array; both
/// are handled the same way. Only records without a usable `id` are dropped;
/// other bad fields are normalized by the [`Pool`] decoder.
pub fn extract_pools(payload: Value) -> Vec<Pool> {
    let records = match payload {
        Value::Array(records) => records,
        Value::Object(mut envelope) => match envelope.remove("results") {
            Some(Value::Array(records)) => records,
            _ => {
                tracing::warn!("pool payload is an object without a results array, ignoring it");
                return Vec::new();
            }
        },
        other => {
            tracing::warn!(kind = %value_kind(&other), "pool payload is neither an array nor paginated");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Pool>(record) {
            Ok(pool) => Some(pool),
            Err(err) => {
                tracing::warn!(error = %err, "skipping undecodable pool record");
                None
            }
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
