use crux_core::{render::render, Command};

use crate::events::Event;
use crate::model::Model;
use crate::types::{MessagePanel, View, MESSAGE_DISMISS_DELAY_MS, MESSAGE_DISMISS_TIMER};
use crate::Effect;

use super::poller;

/// Generic text shown when the device did not answer a request
pub const DEVICE_UNREACHABLE: &str =
    "The operation failed, the device did not respond to the request.";

/// Switch the visible view. Returns `false` if `view` was already visible.
pub fn show_view(model: &mut Model, view: View) -> bool {
    if model.current_view == view {
        return false;
    }
    log::debug!("view {:?} -> {view:?}", model.current_view);
    model.previous_view = model.current_view;
    model.current_view = view;
    true
}

/// Handle a user-driven navigation; leaving the message view cancels its dismissal.
pub fn handle_show_view(view: View, model: &mut Model) -> Command<Effect, Event> {
    if model.current_view == view {
        return Command::done();
    }

    let cancel = poller::disarm(model, MESSAGE_DISMISS_TIMER);
    show_view(model, view);
    Command::all([cancel, render()])
}

/// Render `panel` into the message view and switch to it.
///
/// With `auto_return_home` the view returns home after a short delay, replacing
/// any dismissal still pending from an earlier message.
pub fn show_message(
    model: &mut Model,
    panel: MessagePanel,
    auto_return_home: bool,
) -> Command<Effect, Event> {
    log::info!("{}: {}", panel.title, panel.body);
    model.message = Some(panel);
    show_view(model, View::Messages);

    let dismissal = if auto_return_home {
        poller::arm(model, MESSAGE_DISMISS_TIMER, MESSAGE_DISMISS_DELAY_MS)
    } else {
        poller::disarm(model, MESSAGE_DISMISS_TIMER)
    };

    Command::all([render(), dismissal])
}

/// Show the generic "device did not respond" error
pub fn show_unreachable(model: &mut Model, reason: &str) -> Command<Effect, Event> {
    log::warn!("device unreachable: {reason}");
    show_message(model, MessagePanel::error(DEVICE_UNREACHABLE), true)
}

/// Dismissal timer fired: return home
pub fn dismiss_message(model: &mut Model) -> Command<Effect, Event> {
    if show_view(model, View::Home) {
        render()
    } else {
        Command::done()
    }
}
