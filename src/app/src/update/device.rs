use crux_core::Command;

use crate::commands::upload::{ImageKind, UploadOutput};
use crate::device_request;
use crate::events::{DeviceEvent, Event, ShellEvent};
use crate::http_helpers::Completion;
use crate::model::Model;
use crate::types::{DeviceConfig, MessagePanel, DEVICE_CONFIG_KEY};
use crate::update_field;
use crate::{Effect, StorageCmd, UploadCmd};

use super::view;

/// Handle device maintenance events (reset, restart, image upload, configuration)
pub fn handle(event: DeviceEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        DeviceEvent::FactoryReset => {
            device_request!(Device, DeviceEvent, "/api/freset", FactoryResetResponse)
        }
        DeviceEvent::FactoryResetResponse(completion) => {
            acknowledge(completion, "The device is resetting.", model)
        }

        DeviceEvent::Restart => {
            device_request!(Device, DeviceEvent, "/api/restart", RestartResponse)
        }
        DeviceEvent::RestartResponse(completion) => {
            acknowledge(completion, "The device is restarting.", model)
        }

        DeviceEvent::SubmitFirmwareImage { file } => submit_image(ImageKind::Firmware, file),
        DeviceEvent::SubmitFilesystemImage { file } => {
            submit_image(ImageKind::Filesystem, file)
        }
        DeviceEvent::UploadResponse { kind, output } => handle_upload(kind, output, model),

        DeviceEvent::ConfigResponse(completion) => handle_config(completion, model),
    }
}

/// The device acts on reset and restart regardless of what it answers.
fn acknowledge(completion: Completion, text: &str, model: &mut Model) -> Command<Effect, Event> {
    match completion {
        Completion::Unreachable(reason) => view::show_unreachable(model, &reason),
        Completion::Success(_) | Completion::Failed { .. } => {
            view::show_message(model, MessagePanel::info(text), true)
        }
    }
}

fn submit_image(kind: ImageKind, file: Option<String>) -> Command<Effect, Event> {
    let Some(file) = file.filter(|file| !file.trim().is_empty()) else {
        log::debug!("no {} image selected", kind.field_name());
        return Command::done();
    };

    log::info!("uploading {} image {file}", kind.field_name());
    UploadCmd::submit(kind, file)
        .then_send(move |output| Event::Device(DeviceEvent::UploadResponse { kind, output }))
}

fn handle_upload(kind: ImageKind, output: UploadOutput, model: &mut Model) -> Command<Effect, Event> {
    let name = kind.field_name();
    let panel = match output {
        UploadOutput::Completed { status } if (200..300).contains(&status) => {
            MessagePanel::info(format!(
                "The {name} image was uploaded, the device is restarting."
            ))
        }
        UploadOutput::Completed { status } => MessagePanel::error(format!(
            "The device rejected the {name} image (HTTP {status})."
        )),
        UploadOutput::Failed { message } => {
            MessagePanel::error(format!("The {name} image upload failed: {message}"))
        }
    };
    view::show_message(model, panel, true)
}

/// Fetch the device configuration
pub fn fetch_config() -> Command<Effect, Event> {
    device_request!(Device, DeviceEvent, "/api/config", ConfigResponse, method: get)
}

fn handle_config(completion: Completion, model: &mut Model) -> Command<Effect, Event> {
    let body = match completion {
        Completion::Success(body) => body,
        Completion::Failed { status, .. } => {
            log::debug!("device config request failed with HTTP {status}");
            return Command::done();
        }
        Completion::Unreachable(reason) => {
            log::debug!("device config request failed: {reason}");
            return Command::done();
        }
    };

    let object = match DeviceConfig::object(&body) {
        Ok(object) => object,
        Err(e) => {
            log::warn!("{e}");
            return Command::done();
        }
    };

    // the raw blob is cached even when the typed view does not fit it
    let config = DeviceConfig::from_object(object)
        .inspect_err(|e| log::debug!("{e}"))
        .ok();
    let raw = String::from_utf8_lossy(&body).into_owned();
    let cache = StorageCmd::set(DEVICE_CONFIG_KEY, raw).then_send(|output| {
        Event::Shell(ShellEvent::PreferenceStored {
            key: DEVICE_CONFIG_KEY.to_string(),
            output,
        })
    });
    Command::all([update_field!(model.device_config, config), cache])
}
