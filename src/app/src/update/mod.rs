mod device;
mod door;
mod poller;
mod preference;
mod settings;
mod view;

use crux_core::Command;

use crate::events::{Event, ShellEvent};
use crate::model::Model;
use crate::Effect;

pub use view::DEVICE_UNREACHABLE;

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        // Initialization
        Event::Initialize => {
            log::info!("initializing control panel");
            Command::all([
                preference::load(),
                device::fetch_config(),
                poller::visibility_refresh(model),
                crux_core::render::render(),
            ])
        }

        // Page state
        Event::VisibilityChanged(visibility) => {
            poller::handle_visibility_changed(visibility, model)
        }
        Event::ShowView(target) => view::handle_show_view(target, model),

        // Domain events
        Event::Door(event) => door::handle(event, model),
        Event::Device(event) => device::handle(event, model),
        Event::Settings(event) => settings::handle(event, model),

        // Shell capability responses
        Event::Shell(ShellEvent::TimerFinished { id, output }) => {
            poller::handle_timer_finished(id, output, model)
        }
        Event::Shell(ShellEvent::PreferenceLoaded(output)) => {
            preference::handle_loaded(output, model)
        }
        Event::Shell(ShellEvent::PreferenceStored { key, output }) => {
            preference::handle_stored(&key, output)
        }
    }
}
