use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value};

use crate::error::LoadError;
use crate::types::Rate;

pub(crate) type RateTable = IndexMap<String, IndexMap<String, Rate>>;

pub(crate) fn parse_json(data: &str) -> Result<RateTable, LoadError> {
    let StrictValue(root) = serde_json::from_str(data)?;
    parse_value(&root)
}

pub(crate) fn parse_toml(data: &str) -> Result<RateTable, LoadError> {
    let StrictValue(root) = toml::from_str(data)?;
    parse_value(&root)
}

/// A [`Value`] that fails on repeated keys instead of keeping the last one.
struct StrictValue(Value);

impl<'de> Deserialize<'de> for StrictValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StrictVisitor).map(StrictValue)
    }
}

struct StrictVisitor;

impl<'de> Visitor<'de> for StrictVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a price catalog value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        StrictValue::deserialize(deserializer).map(|v| v.0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(StrictValue(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries = Map::new();
        while let Some(key) = map.next_key::<String>()? {
            if entries.contains_key(&key) {
                return Err(de::Error::custom(format!("duplicate key `{key}`")));
            }
            let StrictValue(value) = map.next_value()?;
            entries.insert(key, value);
        }
        Ok(Value::Object(entries))
    }
}

/// Validate a `provider -> model -> [input, output]` document.
/// Any bad entry rejects the whole document.
fn parse_value(root: &Value) -> Result<RateTable, LoadError> {
    let Some(providers) = root.as_object() else {
        return Err(malformed("<root>", "expected a table of providers"));
    };
    if providers.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut table = RateTable::with_capacity(providers.len());
    for (provider, models) in providers {
        if provider.trim().is_empty() {
            return Err(malformed("<root>", "empty provider name"));
        }
        let Some(models) = models.as_object() else {
            return Err(malformed(provider, "expected a table of models"));
        };
        if models.is_empty() {
            return Err(malformed(provider, "provider lists no models"));
        }

        let mut rates = IndexMap::with_capacity(models.len());
        for (model, leaf) in models {
            let location = format!("{provider}.{model}");
            if model.trim().is_empty() {
                return Err(malformed(provider, "empty model name"));
            }
            rates.insert(model.clone(), parse_rate(&location, leaf)?);
        }
        table.insert(provider.clone(), rates);
    }

    Ok(table)
}

fn parse_rate(location: &str, leaf: &Value) -> Result<Rate, LoadError> {
    let pair = match leaf.as_array() {
        Some(items) if items.len() == 2 => items,
        Some(items) => {
            return Err(malformed(
                location,
                &format!("expected [input, output], got {} values", items.len()),
            ))
        }
        None => return Err(malformed(location, "expected [input, output]")),
    };

    let input = rate_value(location, "input", &pair[0])?;
    let output = rate_value(location, "output", &pair[1])?;
    Ok(Rate::new(input, output))
}

fn rate_value(location: &str, which: &str, v: &Value) -> Result<f64, LoadError> {
    let Some(n) = v.as_f64() else {
        return Err(malformed(location, &format!("{which} rate is not a number")));
    };
    if !n.is_finite() || n < 0.0 {
        return Err(malformed(
            location,
            &format!("{which} rate must be a non-negative number, got {n}"),
        ));
    }
    Ok(n)
}

fn malformed(location: &str, reason: &str) -> LoadError {
    LoadError::Malformed {
        location: location.to_string(),
        reason: reason.to_string(),
    }
}
