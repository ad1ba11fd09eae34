//! Command execution seam between discovery and a device.
//!
//! Discovery only needs to run a command and get back either structured
//! records or raw text. [`Session`] captures that contract; [`SshSession`]
//! is the SSH-backed implementation and tests script their own.

mod response;
mod ssh;
mod template;

pub use response::Response;
pub use ssh::SshSession;
pub use template::{RecordParser, TextFsmParser};

use std::future::Future;

use serde_json::Value;

use crate::error::Result;

/// Options for a single command execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Ask the session to convert the output into structured records.
    pub templated: bool,
}

impl ExecOptions {
    /// Request structured records.
    pub fn templated() -> Self {
        Self { templated: true }
    }

    /// Request the raw command text.
    pub fn raw() -> Self {
        Self { templated: false }
    }
}

/// What a command returned.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Records produced by templated parsing, usually an array of objects.
    Structured(Value),

    /// Raw command text, either requested or because no template applied.
    Text(String),
}

impl CommandOutput {
    /// View the output as a JSON value; text becomes a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            CommandOutput::Structured(value) => value,
            CommandOutput::Text(text) => Value::String(text),
        }
    }

    /// The raw text, if this output is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CommandOutput::Text(text) => Some(text),
            CommandOutput::Structured(_) => None,
        }
    }
}

/// A connection able to run read-only commands on one device.
///
/// Implementations must return `Ok` for commands that produce no output and
/// reserve errors for transport, authentication, timeout and rejected
/// commands.
pub trait Session: Send {
    /// Run `command` and return its output.
    fn execute(
        &mut self,
        command: &str,
        options: ExecOptions,
    ) -> impl Future<Output = Result<CommandOutput>> + Send;
}
