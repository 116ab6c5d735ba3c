pub mod commands;
pub mod events;
pub mod http_helpers;
pub mod macros;
pub mod model;
pub mod types;
pub mod update;

use crux_core::Command;

// Re-export core types
pub use crate::{
    commands::{
        storage::{StorageOperation, StorageOutput},
        timer::{TimerOperation, TimerOutput},
        upload::{ImageKind, UploadOperation, UploadOutput},
    },
    events::{DeviceEvent, DoorEvent, Event, SettingsEvent, ShellEvent},
    http_helpers::{build_url, Completion, BASE_URL},
    model::Model,
    types::*,
};
pub use crux_http::Result as HttpResult;

#[crux_macros::effect]
pub enum Effect {
    Render(crux_core::render::RenderOperation),
    Http(crux_http::protocol::HttpRequest),
    Timer(TimerOperation),
    Storage(StorageOperation),
    Upload(UploadOperation),
}

pub type HttpCmd = crux_http::command::Http<Effect, Event>;
pub type TimerCmd = crate::commands::timer::Timer<Effect, Event>;
pub type StorageCmd = crate::commands::storage::Storage<Effect, Event>;
pub type UploadCmd = crate::commands::upload::Upload<Effect, Event>;

/// The Core application
#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = Model;
    type Effect = Effect;

    fn update(&self, event: Self::Event, model: &mut Self::Model) -> Command<Effect, Event> {
        update::update(event, model)
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        model.clone()
    }
}
