//! Pulling packet metadata out of a larger message
//!
//! TTN does not publish metadata on its own: it sits under the `metadata`
//! key of an uplink message, next to the application and device IDs and the
//! payload. The caller names where the metadata lives with a JSON pointer
//! (RFC 6901), e.g. `/metadata`. No pointer means the whole document is the
//! metadata object.

use anyhow::Context;
use serde_json::Value;
use tracing::{debug, warn};

use crate::metadata::PacketMetadata;

/// Pointer to the metadata object inside a TTN uplink message
pub const TTN_UPLINK_POINTER: &str = "/metadata";

/// Parse `payload` as JSON and decode the metadata object found at `pointer`
pub fn extract(payload: &[u8], pointer: Option<&str>) -> anyhow::Result<PacketMetadata> {
    let pointer = pointer.unwrap_or("");

    // Whole-document decode skips the intermediate Value
    if pointer.is_empty() {
        debug!("Decoding {} bytes as bare metadata", payload.len());
        return PacketMetadata::from_slice(payload);
    }

    let mut document: Value =
        serde_json::from_slice(payload).context("Payload is not valid JSON")?;

    let selected = match document.pointer_mut(pointer) {
        Some(value) => value.take(),
        None => {
            warn!("No value at {} in {} byte payload", pointer, payload.len());
            return Err(anyhow::anyhow!("Nothing found at JSON pointer '{}'", pointer));
        }
    };

    if !selected.is_object() {
        warn!("Value at {} is a {}, not an object", pointer, kind(&selected));
        return Err(anyhow::anyhow!(
            "Value at '{}' is not an object: {}",
            pointer,
            kind(&selected)
        ));
    }

    debug!("Decoding metadata at {}", pointer);
    PacketMetadata::from_value(selected)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
