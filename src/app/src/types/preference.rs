use serde_repr::{Deserialize_repr, Serialize_repr};

/// Storage key of the door-two visibility preference
pub const SHOW_DOOR_TWO_KEY: &str = "showDoorTwo";
/// Storage key of the cached device configuration blob
pub const DEVICE_CONFIG_KEY: &str = "deviceConfig";

/// Persisted door-two visibility, stored as `1` (hidden) or `2` (shown)
#[derive(Debug, Clone, Copy, Default, Serialize_repr, Deserialize_repr, PartialEq, Eq)]
#[repr(u8)]
pub enum DoorTwoPreference {
    #[default]
    Hidden = 1,
    Shown = 2,
}

impl DoorTwoPreference {
    /// Decode a stored raw value. Any number above `1` means shown.
    pub fn decode(raw: Option<&str>) -> Self {
        raw.and_then(|raw| raw.trim().parse::<f64>().ok())
            .map(|value| Self::from(value > 1.0))
            .unwrap_or_default()
    }

    pub fn encode(self) -> String {
        (self as u8).to_string()
    }

    pub fn is_shown(self) -> bool {
        self == Self::Shown
    }
}

impl From<bool> for DoorTwoPreference {
    fn from(show: bool) -> Self {
        if show { Self::Shown } else { Self::Hidden }
    }
}
