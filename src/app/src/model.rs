use serde::{Deserialize, Serialize};

use crate::types::*;

/// Application Model - the complete state
/// Also serves as the ViewModel
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Model {
    // View state
    pub current_view: View,
    pub previous_view: View,
    pub message: Option<MessagePanel>,
    pub visibility: Visibility,

    // Door state
    pub doors: Doors,
    pub show_door_two: bool,

    // Device state
    pub device_config: Option<DeviceConfig>,
    pub wifi_networks: Vec<WifiNetwork>,

    // Live timer handles (door status polling, message dismissal)
    pub timers: TimerTable,
}

impl Model {
    /// Door area layout derived from the door-two preference
    pub fn door_layout(&self) -> DoorLayout {
        DoorLayout::new(self.show_door_two)
    }

    /// Doors currently rendered on the home view
    pub fn visible_doors(&self) -> Vec<DoorId> {
        if self.show_door_two {
            vec![DoorId::One, DoorId::Two]
        } else {
            vec![DoorId::One]
        }
    }

    pub fn is_polling(&self) -> bool {
        self.timers.live(DOOR_STATES_TIMER).is_some()
    }
}
