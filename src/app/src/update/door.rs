use crux_core::{render::render, Command};

use crate::device_request;
use crate::events::{DoorEvent, Event, ShellEvent};
use crate::http_helpers::{parse_json, Completion};
use crate::model::Model;
use crate::types::{DoorStatusPayload, DoorTwoPreference, SHOW_DOOR_TWO_KEY};
use crate::{Effect, StorageCmd};

use super::view;

/// Handle door events (activation, door-two visibility, status refresh)
pub fn handle(event: DoorEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        DoorEvent::Activate(door) => {
            log::info!("activating {}", door.label().to_lowercase());
            device_request!(Door, DoorEvent, door.activate_endpoint(), ActivateResponse)
        }

        DoorEvent::ActivateResponse(Completion::Unreachable(reason)) => {
            view::show_unreachable(model, &reason)
        }
        DoorEvent::ActivateResponse(_) => Command::done(),

        DoorEvent::ToggleDoorTwo => toggle_door_two(model),

        DoorEvent::RefreshStatus => refresh_status(),

        DoorEvent::StatusResponse(completion) => handle_status_response(completion, model),
    }
}

/// Request the current door states
pub fn refresh_status() -> Command<Effect, Event> {
    device_request!(Door, DoorEvent, "/api/doorStatus", StatusResponse, method: get)
}

/// Apply a status response; failures and malformed payloads leave the doors untouched.
pub fn handle_status_response(
    completion: Completion,
    model: &mut Model,
) -> Command<Effect, Event> {
    match completion {
        Completion::Success(body) => {
            match parse_json::<DoorStatusPayload>("Door status", &body) {
                Ok(payload) => {
                    if model.doors.apply(&payload) {
                        render()
                    } else {
                        Command::done()
                    }
                }
                Err(e) => {
                    log::warn!("{e}");
                    Command::done()
                }
            }
        }
        Completion::Failed { status, .. } => {
            log::debug!("door status request failed with HTTP {status}");
            Command::done()
        }
        Completion::Unreachable(reason) => {
            log::debug!("door status request failed: {reason}");
            Command::done()
        }
    }
}

/// Show or hide the second door and persist the choice
pub fn toggle_door_two(model: &mut Model) -> Command<Effect, Event> {
    model.show_door_two = !model.show_door_two;
    log::info!(
        "{} door two",
        if model.show_door_two { "showing" } else { "hiding" }
    );

    let value = DoorTwoPreference::from(model.show_door_two).encode();
    Command::all([render(), store_preference(value)])
}

/// Persist the door-two preference value
pub fn store_preference(value: String) -> Command<Effect, Event> {
    StorageCmd::set(SHOW_DOOR_TWO_KEY, value).then_send(|output| {
        Event::Shell(ShellEvent::PreferenceStored {
            key: SHOW_DOOR_TWO_KEY.to_string(),
            output,
        })
    })
}
