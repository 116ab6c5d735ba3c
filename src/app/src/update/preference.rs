use crux_core::Command;

use crate::commands::storage::StorageOutput;
use crate::events::{Event, ShellEvent};
use crate::model::Model;
use crate::types::{DoorTwoPreference, SHOW_DOOR_TWO_KEY};
use crate::{Effect, StorageCmd};

use super::door;

/// Read the door-two preference from the shell's store
pub fn load() -> Command<Effect, Event> {
    StorageCmd::get(SHOW_DOOR_TWO_KEY)
        .then_send(|output| Event::Shell(ShellEvent::PreferenceLoaded(output)))
}

pub fn handle_loaded(output: StorageOutput, model: &mut Model) -> Command<Effect, Event> {
    match output {
        StorageOutput::Value(None) => {
            log::info!("no {SHOW_DOOR_TWO_KEY} preference stored, defaulting to hidden");
            door::store_preference(DoorTwoPreference::Hidden.encode())
        }
        StorageOutput::Value(Some(raw)) => {
            let preference = DoorTwoPreference::decode(Some(&raw));
            log::debug!("{SHOW_DOOR_TWO_KEY} = {raw:?} ({preference:?})");
            if preference.is_shown() && !model.show_door_two {
                door::toggle_door_two(model)
            } else {
                Command::done()
            }
        }
        StorageOutput::Stored => Command::done(),
        StorageOutput::Error { message } => {
            log::warn!("failed to read {SHOW_DOOR_TWO_KEY}: {message}");
            Command::done()
        }
    }
}

pub fn handle_stored(key: &str, output: StorageOutput) -> Command<Effect, Event> {
    if let StorageOutput::Error { message } = output {
        log::warn!("failed to store {key}: {message}");
    }
    Command::done()
}
