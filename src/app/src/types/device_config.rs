use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Device configuration as reported by `GET /api/config`
///
/// All fields are optional; the device only reports what it has stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeviceConfig {
    pub wifi: Option<WifiConfig>,
    pub web: Option<WebConfig>,
    pub syslog: Option<SyslogConfig>,
    pub ntp: Option<NtpConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct WifiConfig {
    pub start_ap: Option<bool>,
    pub ap_ssid: Option<String>,
    pub ssid: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WebConfig {
    pub hostname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SyslogConfig {
    pub server: Option<String>,
    pub facility: Option<u32>,
    pub severity: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NtpConfig {
    pub server: Option<String>,
    pub poll: Option<u32>,
}

impl DeviceConfig {
    /// Parse a configuration blob, ignoring unknown keys and missing sections
    pub fn parse(body: &[u8]) -> Result<Self, String> {
        Self::from_object(Self::object(body)?)
    }

    /// Parse a body that must be a JSON object, whatever its keys hold
    pub fn object(body: &[u8]) -> Result<Map<String, Value>, String> {
        serde_json::from_slice(body).map_err(|e| format!("device config: JSON parse error: {e}"))
    }

    /// Typed view of an already parsed configuration object
    pub fn from_object(object: Map<String, Value>) -> Result<Self, String> {
        serde_json::from_value(Value::Object(object))
            .map_err(|e| format!("device config: unexpected value: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_configuration() {
        let config = DeviceConfig::parse(
            br#"{"wifi":{"startAp":true,"apSsid":"garage-ap"},"web":{"hostname":"garage","port":80},"extra":1}"#,
        )
        .expect("config should parse");

        let wifi = config.wifi.expect("wifi section");
        assert_eq!(wifi.start_ap, Some(true));
        assert_eq!(wifi.ap_ssid.as_deref(), Some("garage-ap"));
        assert_eq!(wifi.ssid, None);
        assert_eq!(config.web.and_then(|w| w.port), Some(80));
        assert!(config.ntp.is_none());
    }

    #[test]
    fn out_of_range_value_is_an_object_but_no_typed_view() {
        let object = DeviceConfig::object(br#"{"web":{"port":70000}}"#).expect("json object");
        assert!(DeviceConfig::from_object(object).is_err());
    }

    #[test]
    fn rejects_non_object_body() {
        assert!(DeviceConfig::parse(b"[1,2]").is_err());
        assert!(DeviceConfig::parse(b"not json").is_err());
    }
}
