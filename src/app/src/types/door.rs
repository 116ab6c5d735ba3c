use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Image resources used for the door icons: `[open, closed]`
pub const DOOR_ICONS: [&str; 2] = ["garage-open.png", "garage-closed.png"];

/// One of the two doors driven by the controller
#[derive(Debug, Clone, Copy, Serialize_repr, Deserialize_repr, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DoorId {
    One = 1,
    Two = 2,
}

impl DoorId {
    /// Endpoint that triggers the door relay, e.g. `/api/door1`
    pub fn activate_endpoint(self) -> String {
        format!("/api/door{}", self as u8)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::One => "Door one",
            Self::Two => "Door two",
        }
    }
}

/// Last known state of a door
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DoorStatus {
    Open,
    Closed,
    #[default]
    Unknown,
}

impl DoorStatus {
    /// Map a reported value to a status; anything but `"open"`/`"closed"` is unrecognized.
    pub fn from_report(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn icon(self) -> Option<DoorIcon> {
        match self {
            Self::Open => Some(DoorIcon::Open),
            Self::Closed => Some(DoorIcon::Closed),
            Self::Unknown => None,
        }
    }
}

/// The two icons a door can be rendered with
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DoorIcon {
    Open,
    Closed,
}

impl DoorIcon {
    pub fn resource(self) -> &'static str {
        match self {
            Self::Open => DOOR_ICONS[0],
            Self::Closed => DOOR_ICONS[1],
        }
    }
}

/// Payload of `GET /api/doorStatus`
///
/// Values are kept untyped so that one unrecognized entry does not discard the other.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoorStatusPayload {
    pub door_one: Option<serde_json::Value>,
    pub door_two: Option<serde_json::Value>,
}

impl DoorStatusPayload {
    /// Recognized status reported for `door`, if any
    pub fn status(&self, door: DoorId) -> Option<DoorStatus> {
        let value = match door {
            DoorId::One => self.door_one.as_ref(),
            DoorId::Two => self.door_two.as_ref(),
        };
        value
            .and_then(serde_json::Value::as_str)
            .and_then(DoorStatus::from_report)
    }
}

/// Status of both doors as last rendered
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Doors {
    pub one: DoorStatus,
    pub two: DoorStatus,
}

impl Doors {
    pub fn get(&self, door: DoorId) -> DoorStatus {
        match door {
            DoorId::One => self.one,
            DoorId::Two => self.two,
        }
    }

    pub fn icon(&self, door: DoorId) -> Option<DoorIcon> {
        self.get(door).icon()
    }

    /// Apply a status payload. Missing or unrecognized entries leave the door unchanged.
    ///
    /// Returns `true` if any door changed.
    pub fn apply(&mut self, payload: &DoorStatusPayload) -> bool {
        let mut changed = false;
        for door in [DoorId::One, DoorId::Two] {
            if let Some(status) = payload.status(door) {
                let slot = match door {
                    DoorId::One => &mut self.one,
                    DoorId::Two => &mut self.two,
                };
                if *slot != status {
                    *slot = status;
                    changed = true;
                }
            }
        }
        changed
    }
}

/// Layout of the door area derived from the door-two preference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoorLayout {
    pub door_two_visible: bool,
    pub spacer_visible: bool,
    pub check_mark: CheckMark,
}

impl DoorLayout {
    pub fn new(show_door_two: bool) -> Self {
        Self {
            door_two_visible: show_door_two,
            spacer_visible: !show_door_two,
            check_mark: if show_door_two {
                CheckMark::Marked
            } else {
                CheckMark::Blank
            },
        }
    }
}

/// Check box indicator next to the "show second door" setting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CheckMark {
    Marked,
    Blank,
}

impl CheckMark {
    pub fn class(self) -> &'static str {
        match self {
            Self::Marked => "mdi-checkbox-marked-outline",
            Self::Blank => "mdi-checkbox-blank-outline",
        }
    }
}
