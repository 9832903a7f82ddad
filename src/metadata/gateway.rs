//! Per-gateway reception details

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::or_dash;

/// One gateway's view of a packet.
///
/// Only ever built by deserializing the `gateways` array of a
/// [`PacketMetadata`](super::PacketMetadata). Every field is optional and
/// unset fields are left out again on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayReception {
    /// Gateway ID as registered on the network
    #[serde(skip_serializing_if = "Option::is_none")]
    gtw_id: Option<String>,
    /// Operator trust flag
    #[serde(skip_serializing_if = "Option::is_none")]
    gtw_trusted: Option<bool>,
    /// Concentrator counter (microseconds, wraps)
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<u64>,
    /// Absolute reception time, unset without clock sync
    #[serde(
        default,
        deserialize_with = "deserialize_time",
        skip_serializing_if = "Option::is_none"
    )]
    time: Option<DateTime<Utc>>,
    /// Radio channel index
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<u32>,
    /// RSSI in dBm
    #[serde(skip_serializing_if = "Option::is_none")]
    rssi: Option<f64>,
    /// Signal-to-noise ratio in dB
    #[serde(skip_serializing_if = "Option::is_none")]
    snr: Option<f64>,
    /// Receiver RF chain
    #[serde(skip_serializing_if = "Option::is_none")]
    rf_chain: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    altitude: Option<f64>,
    /// Where the position came from (e.g., "registry", "gps")
    #[serde(skip_serializing_if = "Option::is_none")]
    location_source: Option<String>,
}

impl GatewayReception {
    pub fn gtw_id(&self) -> Option<&str> {
        self.gtw_id.as_deref()
    }

    pub fn gtw_trusted(&self) -> Option<bool> {
        self.gtw_trusted
    }

    /// Gateway-internal reception counter
    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    /// Gateway absolute reception time
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    pub fn channel(&self) -> Option<u32> {
        self.channel
    }

    pub fn rssi(&self) -> Option<f64> {
        self.rssi
    }

    pub fn snr(&self) -> Option<f64> {
        self.snr
    }

    pub fn rf_chain(&self) -> Option<u32> {
        self.rf_chain
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    pub fn location_source(&self) -> Option<&str> {
        self.location_source.as_deref()
    }
}

impl fmt::Display for GatewayReception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gw={} trusted={} tmst={} chan={} rfch={} rssi={} snr={} pos=({}, {}, {}) src={}",
            or_dash(&self.gtw_id),
            or_dash(&self.gtw_trusted),
            or_dash(&self.timestamp),
            or_dash(&self.channel),
            or_dash(&self.rf_chain),
            or_dash(&self.rssi),
            or_dash(&self.snr),
            or_dash(&self.latitude),
            or_dash(&self.longitude),
            or_dash(&self.altitude),
            or_dash(&self.location_source),
        )
    }
}

/// Accepts RFC 3339, `null` or `""`; the last two mean "no clock".
fn deserialize_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| serde::de::Error::custom(format!("invalid gateway time '{}': {}", s, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn parse(json: &str) -> GatewayReception {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_full_gateway() {
        let gw = parse(
            r#"{
                "gtw_id": "eui-b827ebfffe114baa",
                "gtw_trusted": true,
                "timestamp": 1234567,
                "time": "2018-03-29T15:17:15.770864747Z",
                "channel": 2,
                "rssi": -42.0,
                "snr": 7.5,
                "rf_chain": 0,
                "latitude": 52.1,
                "longitude": 4.3,
                "altitude": 10.0,
                "location_source": "registry"
            }"#,
        );

        assert_eq!(gw.gtw_id(), Some("eui-b827ebfffe114baa"));
        assert_eq!(gw.gtw_trusted(), Some(true));
        assert_eq!(gw.timestamp(), Some(1234567));
        assert_eq!(gw.channel(), Some(2));
        assert_eq!(gw.rssi(), Some(-42.0));
        assert_eq!(gw.snr(), Some(7.5));
        assert_eq!(gw.rf_chain(), Some(0));
        assert_eq!(gw.latitude(), Some(52.1));
        assert_eq!(gw.longitude(), Some(4.3));
        assert_eq!(gw.altitude(), Some(10.0));
        assert_eq!(gw.location_source(), Some("registry"));

        let time = gw.time().unwrap();
        assert_eq!(time.nanosecond(), 770_864_747);
        assert_eq!(time.to_rfc3339(), "2018-03-29T15:17:15.770864747+00:00");
    }

    #[test]
    fn test_time_without_clock_sync() {
        assert_eq!(parse(r#"{"gtw_id": "a", "time": ""}"#).time(), None);
        assert_eq!(parse(r#"{"gtw_id": "a", "time": null}"#).time(), None);
        assert_eq!(parse(r#"{"gtw_id": "a"}"#).time(), None);
    }

    #[test]
    fn test_time_offset_normalized_to_utc() {
        let gw = parse(r#"{"time": "2018-03-29T17:17:15+02:00"}"#);
        assert_eq!(
            gw.time().unwrap().to_rfc3339(),
            "2018-03-29T15:17:15+00:00"
        );
    }

    #[test]
    fn test_invalid_time_fails() {
        let result = serde_json::from_str::<GatewayReception>(r#"{"time": "yesterday"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrapped_counter_fits() {
        // Concentrator counters are 32-bit on the wire but the field is 64-bit
        let gw = parse(r#"{"timestamp": 4294967295}"#);
        assert_eq!(gw.timestamp(), Some(u32::MAX as u64));
    }

    #[test]
    fn test_zero_is_not_unset() {
        let gw = parse(r#"{"channel": 0, "rssi": 0.0}"#);
        assert_eq!(gw.channel(), Some(0));
        assert_eq!(gw.rssi(), Some(0.0));
        assert_eq!(gw.rf_chain(), None);
        assert_eq!(gw.snr(), None);
    }

    #[test]
    fn test_time_keeps_nanoseconds_on_serialize() {
        let gw = parse(r#"{"time": "2018-03-29T15:17:15.770864747Z"}"#);
        let json = serde_json::to_value(&gw).unwrap();
        assert_eq!(json["time"], "2018-03-29T15:17:15.770864747Z");
    }

    #[test]
    fn test_unset_fields_not_serialized() {
        let gw = parse(r#"{"gtw_id": "eui-1", "time": ""}"#);
        let json = serde_json::to_value(&gw).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["gtw_id"]);
    }

    #[test]
    fn test_display() {
        let gw = parse(r#"{"gtw_id": "eui-1", "rssi": -42.0, "snr": 7.5}"#);
        assert_eq!(
            gw.to_string(),
            "gw=eui-1 trusted=- tmst=- chan=- rfch=- rssi=-42 snr=7.5 pos=(-, -, -) src=-"
        );
    }
}
