use crux_core::{render::render, Command};

use crate::commands::timer::TimerOutput;
use crate::events::{Event, ShellEvent};
use crate::model::Model;
use crate::types::{
    TimerId, Visibility, DOOR_STATES_INTERVAL_MS, DOOR_STATES_TIMER, MESSAGE_DISMISS_TIMER,
};
use crate::{Effect, TimerCmd};

use super::{door, view};

/// Start the timer `name`, cancelling the handle it replaces.
pub fn arm(model: &mut Model, name: &str, millis: u64) -> Command<Effect, Event> {
    let (stale, id) = model.timers.arm(name);
    log::debug!("timer {name}: armed {id:?} for {millis} ms");

    let start = TimerCmd::start(id, millis).then_send(move |output| {
        Event::Shell(ShellEvent::TimerFinished { id, output })
    });

    match stale {
        Some(stale) => Command::all([cancel(stale), start]),
        None => start,
    }
}

/// Cancel the timer `name` if it is live; no-op otherwise.
pub fn disarm(model: &mut Model, name: &str) -> Command<Effect, Event> {
    match model.timers.disarm(name) {
        Some(id) => {
            log::debug!("timer {name}: cancelled {id:?}");
            cancel(id)
        }
        None => Command::done(),
    }
}

fn cancel(id: TimerId) -> Command<Effect, Event> {
    TimerCmd::cancel(id)
        .then_send(move |output| Event::Shell(ShellEvent::TimerFinished { id, output }))
}

/// Enable or disable the periodic door status refresh based on visibility
pub fn visibility_refresh(model: &mut Model) -> Command<Effect, Event> {
    match model.visibility {
        Visibility::Hidden => {
            log::info!("panel hidden, door status polling paused");
            disarm(model, DOOR_STATES_TIMER)
        }
        Visibility::Visible => {
            log::info!("panel visible, door status polling every {DOOR_STATES_INTERVAL_MS} ms");
            Command::all([
                arm(model, DOOR_STATES_TIMER, DOOR_STATES_INTERVAL_MS),
                door::refresh_status(),
            ])
        }
    }
}

pub fn handle_visibility_changed(
    visibility: Visibility,
    model: &mut Model,
) -> Command<Effect, Event> {
    model.visibility = visibility;
    Command::all([visibility_refresh(model), render()])
}

/// Route a finished timer to its task; stale or cancelled handles are ignored.
pub fn handle_timer_finished(
    id: TimerId,
    output: TimerOutput,
    model: &mut Model,
) -> Command<Effect, Event> {
    if output == TimerOutput::Cancelled {
        log::debug!("timer {id:?} cancelled");
        return Command::done();
    }

    let Some(name) = model.timers.name_of(id).map(str::to_string) else {
        log::debug!("ignoring stale timer {id:?}");
        return Command::done();
    };
    model.timers.take_if_live(&name, id);

    match name.as_str() {
        DOOR_STATES_TIMER => Command::all([
            arm(model, DOOR_STATES_TIMER, DOOR_STATES_INTERVAL_MS),
            door::refresh_status(),
        ]),
        MESSAGE_DISMISS_TIMER => view::dismiss_message(model),
        other => {
            log::warn!("timer {other} fired without a task");
            Command::done()
        }
    }
}
