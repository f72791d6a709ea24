//! Value normalization for items read back from a store.
//!
//! DynamoDB-style stores hand numbers back wrapped as `{"N": "<digits>"}`
//! so that no precision is lost in transit. Records want plain JSON numbers,
//! so every item read through `get` or `query` passes a [`ValueNormalizer`]
//! before it is materialized.

use serde_json::{Map, Number, Value};

use crate::Attributes;

/// Key of the store-native number wrapper.
const NUMBER_TAG: &str = "N";

/// Rewrites store-native encodings in an item into language-native values.
pub trait ValueNormalizer: Send + Sync {
    fn normalize(&self, item: Attributes) -> Attributes;
}

/// Unwraps `{"N": "..."}` number encodings anywhere inside an item.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberNormalizer;

impl ValueNormalizer for NumberNormalizer {
    fn normalize(&self, item: Attributes) -> Attributes {
        item.into_iter()
            .map(|(name, value)| (name, unwrap_numbers(value)))
            .collect()
    }
}

/// Passes items through untouched, for stores that already return native numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl ValueNormalizer for IdentityNormalizer {
    fn normalize(&self, item: Attributes) -> Attributes {
        item
    }
}

/// Recursively replaces number wrappers with JSON numbers.
///
/// Wrappers whose payload does not parse as a finite number are left as-is.
pub fn unwrap_numbers(value: Value) -> Value {
    match value {
        Value::Object(map) => match parse_number_wrapper(&map) {
            Some(number) => Value::Number(number),
            None => Value::Object(
                map.into_iter()
                    .map(|(name, value)| (name, unwrap_numbers(value)))
                    .collect(),
            ),
        },
        Value::Array(values) => Value::Array(values.into_iter().map(unwrap_numbers).collect()),
        other => other,
    }
}

/// Recursively wraps every JSON number as `{"N": "<digits>"}`.
pub fn wrap_numbers(value: Value) -> Value {
    match value {
        Value::Number(number) => {
            let mut wrapper = Map::new();
            wrapper.insert(NUMBER_TAG.to_string(), Value::String(number.to_string()));
            Value::Object(wrapper)
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(name, value)| (name, wrap_numbers(value)))
                .collect(),
        ),
        Value::Array(values) => Value::Array(values.into_iter().map(wrap_numbers).collect()),
        other => other,
    }
}

/// Wraps every number inside an item, the form a DynamoDB-style store holds.
pub fn wrap_item(item: Attributes) -> Attributes {
    item.into_iter()
        .map(|(name, value)| (name, wrap_numbers(value)))
        .collect()
}

fn parse_number_wrapper(map: &Map<String, Value>) -> Option<Number> {
    if map.len() != 1 {
        return None;
    }
    let digits = map.get(NUMBER_TAG)?.as_str()?.trim();

    if let Ok(int) = digits.parse::<i64>() {
        return Some(Number::from(int));
    }
    if let Ok(uint) = digits.parse::<u64>() {
        return Some(Number::from(uint));
    }
    digits.parse::<f64>().ok().and_then(Number::from_f64)
}
