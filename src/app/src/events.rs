use serde::{Deserialize, Serialize};

use crate::commands::{
    storage::StorageOutput,
    timer::TimerOutput,
    upload::{ImageKind, UploadOutput},
};
use crate::http_helpers::Completion;
use crate::types::*;

/// Door related events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DoorEvent {
    Activate(DoorId),
    ToggleDoorTwo,
    RefreshStatus,

    #[serde(skip)]
    ActivateResponse(Completion),
    #[serde(skip)]
    StatusResponse(Completion),
}

/// Device maintenance events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeviceEvent {
    FactoryReset,
    Restart,
    /// `file` is `None` when nothing was selected
    SubmitFirmwareImage { file: Option<String> },
    SubmitFilesystemImage { file: Option<String> },

    #[serde(skip)]
    FactoryResetResponse(Completion),
    #[serde(skip)]
    RestartResponse(Completion),
    #[serde(skip)]
    ConfigResponse(Completion),
    #[serde(skip)]
    UploadResponse { kind: ImageKind, output: UploadOutput },
}

/// Settings form events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SettingsEvent {
    UpdateCredentials { username: String, password: String },
    UpdateWifiCredentials { ssid: String, password: String },
    RequestWifiScan,

    #[serde(skip)]
    CredentialsResponse(Completion),
    #[serde(skip)]
    WifiCredentialsResponse(Completion),
    #[serde(skip)]
    WifiScanResponse(Completion),
}

/// Shell capability responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShellEvent {
    TimerFinished { id: TimerId, output: TimerOutput },
    PreferenceLoaded(StorageOutput),
    PreferenceStored { key: String, output: StorageOutput },
}

/// Events that can happen in the app
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    // Initialization
    Initialize,

    // Page state
    VisibilityChanged(Visibility),
    ShowView(View),

    // Domain events
    Door(DoorEvent),
    Device(DeviceEvent),
    Settings(SettingsEvent),

    // Capability responses (internal events, skipped from serialization)
    #[serde(skip)]
    Shell(ShellEvent),
}
