use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_valid::Validate;

/// Default text when the device reports an error without an `error` field
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Admin credentials of the device web interface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct WebCredentials {
    #[validate(min_length = 1)]
    pub username: String,
    #[validate(min_length = 1)]
    pub password: String,
}

/// Station mode WiFi credentials
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct WifiCredentials {
    #[validate(min_length = 1)]
    pub ssid: String,
    #[validate(min_length = 1)]
    pub password: String,
}

/// Partial configuration update sent to `POST /api/config`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SettingsUpdate {
    Web(WebCredentials),
    Wifi(WifiCredentials),
}

/// Error body returned by the device for rejected requests
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: Option<String>,
}

impl ErrorBody {
    /// Extract the `error` field from a response body, defaulting to [`UNKNOWN_ERROR`]
    pub fn message_from(body: &[u8]) -> String {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
    }
}

/// One entry of `GET /api/wifiScan`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WifiNetwork {
    pub ssid: String,
    pub rssi: i32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Sort scan results by signal strength, strongest first
pub fn sort_by_signal(networks: &mut [WifiNetwork]) {
    networks.sort_by(|a, b| b.rssi.cmp(&a.rssi));
}
