//! Preference storage command definitions.
//!
//! A durable string key/value store provided by the Shell.

use crux_core::{capability::Operation, command, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageOperation {
    Get { key: String },
    Set { key: String, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageOutput {
    /// Result of `Get`; `None` when the key was never written
    Value(Option<String>),
    /// `Set` completed
    Stored,
    Error { message: String },
}

impl Operation for StorageOperation {
    type Output = StorageOutput;
}

/// Command-based preference storage API
pub struct Storage<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Storage<Effect, Event>
where
    Effect: Send + From<crux_core::Request<StorageOperation>> + 'static,
    Event: Send + 'static,
{
    pub fn get(
        key: impl Into<String>,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = StorageOutput>>
    {
        Command::request_from_shell(StorageOperation::Get { key: key.into() })
    }

    pub fn set(
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = StorageOutput>>
    {
        Command::request_from_shell(StorageOperation::Set {
            key: key.into(),
            value: value.into(),
        })
    }
}
