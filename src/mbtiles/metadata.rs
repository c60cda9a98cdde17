//! Typed access to the MBTiles `metadata` table.
//!
//! MBTiles metadata is a flat name/value table where every value is stored as
//! text, even when the schema expects structured data: `bounds` and `center`
//! are comma-separated number lists, `minzoom`/`maxzoom` are numeric strings
//! and `json` holds a JSON document with the `vector_layers` description.
//! [`Metadata`] decodes those values into [`serde_json::Value`]s on load so
//! that consumers never see string-encoded structures.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::StoreError;

/// Decoded snapshot of the container metadata.
///
/// Built once per store scope; consumers read it as plain JSON values.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    entries: BTreeMap<String, Value>,
}

impl Metadata {
    /// Decode raw `(name, value)` rows from the `metadata` table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedMetadata`] when a value that the schema
    /// expects to be structured (`json`, `bounds`, `center`, zoom limits)
    /// cannot be decoded.
    pub fn from_rows<I>(rows: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut entries = BTreeMap::new();
        for (name, value) in rows {
            let decoded = decode_value(&name, &value)
                .map_err(|reason| StoreError::MalformedMetadata(format!("{name}: {reason}")))?;
            entries.insert(name, decoded);
        }
        Ok(Metadata { entries })
    }

    /// Raw decoded value for a metadata key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// String value for a metadata key.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    /// Zoom limit (`minzoom` / `maxzoom`) as an integer.
    pub fn zoom(&self, key: &str) -> Option<u8> {
        self.entries
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|z| u8::try_from(z).ok())
    }

    /// Geographic bounds as `[west, south, east, north]`.
    pub fn bounds(&self) -> Option<[f64; 4]> {
        float_array(self.entries.get("bounds")?)
    }

    /// Initial position as `[lon, lat, zoom]`.
    pub fn center(&self) -> Option<[f64; 3]> {
        float_array(self.entries.get("center")?)
    }

    /// The `vector_layers` description nested inside the `json` key.
    pub fn vector_layers(&self) -> Option<&Value> {
        self.entries.get("json")?.get("vector_layers")
    }
}

/// Decode a single metadata value according to its key.
fn decode_value(name: &str, value: &str) -> Result<Value, String> {
    match name {
        "json" => serde_json::from_str(value).map_err(|e| format!("invalid JSON: {e}")),
        "bounds" | "center" => {
            let floats = parse_float_list(value)?;
            Ok(Value::from(floats))
        }
        "minzoom" | "maxzoom" => {
            let zoom: u8 = value
                .trim()
                .parse()
                .map_err(|_| format!("expected an integer zoom level, got {value:?}"))?;
            Ok(Value::from(zoom))
        }
        _ => Ok(Value::from(value)),
    }
}

/// Parse a number list stored either as a JSON array or as the conventional
/// comma-separated MBTiles encoding ("-180,-85,180,85").
fn parse_float_list(value: &str) -> Result<Vec<f64>, String> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| format!("invalid number array: {e}"));
    }
    trimmed
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("expected a number, got {part:?}"))
        })
        .collect()
}

/// Read a fixed-size float array out of a decoded JSON value.
fn float_array<const N: usize>(value: &Value) -> Option<[f64; N]> {
    let items = value.as_array()?;
    if items.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_f64()?;
    }
    Some(out)
}
