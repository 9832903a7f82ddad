//! Packet metadata as delivered by The Things Network
//!
//! A [`PacketMetadata`] describes the radio side of one uplink or downlink:
//! when it was received or sent, on which frequency and data rate, and which
//! gateways heard it. Values are read-only once decoded; the only way to get
//! one is through the `from_*` constructors below.
//!
//! Every field is optional. A key that was missing (or `null`) in the
//! payload stays unset, and unset fields are omitted when serializing, so a
//! decode/encode round-trip keeps the same set of keys. In particular an
//! absent `gateways` key is not the same thing as `"gateways": []`.

pub mod gateway;

pub use gateway::GatewayReception;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reception/transmission metadata of one packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketMetadata {
    /// RX (uplink) or TX (downlink) time, e.g. "2018-03-29T15:17:15.770864747Z"
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    /// Frequency in MHz
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency: Option<f64>,
    /// Modulation ("LORA" or "FSK")
    #[serde(skip_serializing_if = "Option::is_none")]
    modulation: Option<String>,
    /// LoRa data rate identifier (e.g., "SF7BW125")
    #[serde(skip_serializing_if = "Option::is_none")]
    data_rate: Option<String>,
    /// FSK bit rate
    #[serde(skip_serializing_if = "Option::is_none")]
    bit_rate: Option<String>,
    /// LoRa coding rate (e.g., "4/5")
    #[serde(skip_serializing_if = "Option::is_none")]
    coding_rate: Option<String>,
    /// Time on air
    #[serde(skip_serializing_if = "Option::is_none")]
    airtime: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gateways: Option<Vec<GatewayReception>>,
}

impl PacketMetadata {
    /// Decode metadata from a JSON string
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse packet metadata JSON")
    }

    /// Decode metadata from raw JSON bytes (e.g. an MQTT payload)
    pub fn from_slice(payload: &[u8]) -> anyhow::Result<Self> {
        serde_json::from_slice(payload).context("Failed to parse packet metadata JSON")
    }

    /// Decode metadata from an already parsed JSON value
    pub fn from_value(value: serde_json::Value) -> anyhow::Result<Self> {
        serde_json::from_value(value).context("Packet metadata has an unexpected shape")
    }

    /// Encode back to compact JSON, omitting unset fields
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).context("Failed to serialize packet metadata")
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    /// Frequency in MHz
    pub fn frequency(&self) -> Option<f64> {
        self.frequency
    }

    pub fn modulation(&self) -> Option<&str> {
        self.modulation.as_deref()
    }

    pub fn data_rate(&self) -> Option<&str> {
        self.data_rate.as_deref()
    }

    pub fn bit_rate(&self) -> Option<&str> {
        self.bit_rate.as_deref()
    }

    pub fn coding_rate(&self) -> Option<&str> {
        self.coding_rate.as_deref()
    }

    pub fn airtime(&self) -> Option<u64> {
        self.airtime
    }

    /// Gateways that received this packet.
    ///
    /// `None` means the payload carried no gateway information at all;
    /// `Some(&[])` means it carried an empty list.
    pub fn gateways(&self) -> Option<&[GatewayReception]> {
        self.gateways.as_deref()
    }
}

impl fmt::Display for PacketMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time={} freq={} modu={} dr={} br={} cr={} airtime={} gateways={}",
            or_dash(&self.time),
            or_dash(&self.frequency.map(|mhz| format!("{}MHz", mhz))),
            or_dash(&self.modulation),
            or_dash(&self.data_rate),
            or_dash(&self.bit_rate),
            or_dash(&self.coding_rate),
            or_dash(&self.airtime),
            or_dash(&self.gateways.as_ref().map(Vec::len)),
        )
    }
}

pub(crate) fn or_dash<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}
