//! Image upload command definitions.
//!
//! Firmware and filesystem images are submitted by the Shell as a multipart
//! form post, outside of the HTTP capability.

use crux_core::{capability::Operation, command, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Kind of image; also the multipart field name the device expects
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ImageKind {
    Firmware,
    Filesystem,
}

impl ImageKind {
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Firmware => "firmware",
            Self::Filesystem => "filesystem",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadOperation {
    pub kind: ImageKind,
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum UploadOutput {
    /// The device answered the form post
    Completed { status: u16 },
    /// The file could not be read or the device did not answer
    Failed { message: String },
}

impl Operation for UploadOperation {
    type Output = UploadOutput;
}

/// Command-based upload API
pub struct Upload<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Upload<Effect, Event>
where
    Effect: Send + From<crux_core::Request<UploadOperation>> + 'static,
    Event: Send + 'static,
{
    pub fn submit(
        kind: ImageKind,
        file: impl Into<String>,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = UploadOutput>>
    {
        Command::request_from_shell(UploadOperation {
            kind,
            file: file.into(),
        })
    }
}
