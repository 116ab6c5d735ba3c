//! Timer command definitions.
//!
//! The Shell owns the clock: it sleeps for the requested time and resolves the
//! request with [`TimerOutput::Elapsed`], or with [`TimerOutput::Cancelled`]
//! when the timer was cancelled first.

use crux_core::{capability::Operation, command, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use crate::types::TimerId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerOperation {
    /// Resolve once after `millis` milliseconds
    Start { id: TimerId, millis: u64 },
    /// Cancel a started timer; both requests resolve with `Cancelled`
    Cancel { id: TimerId },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerOutput {
    Elapsed,
    Cancelled,
}

impl Operation for TimerOperation {
    type Output = TimerOutput;
}

/// Command-based timer API
pub struct Timer<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Timer<Effect, Event>
where
    Effect: Send + From<crux_core::Request<TimerOperation>> + 'static,
    Event: Send + 'static,
{
    pub fn start(
        id: TimerId,
        millis: u64,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = TimerOutput>> {
        Command::request_from_shell(TimerOperation::Start { id, millis })
    }

    pub fn cancel(
        id: TimerId,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = TimerOutput>> {
        Command::request_from_shell(TimerOperation::Cancel { id })
    }
}
