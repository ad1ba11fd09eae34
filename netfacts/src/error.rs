//! Error types for netfacts.

use std::io;
use thiserror::Error;

use crate::os::OsFamily;

/// Main error type for netfacts operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Session/command errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Platform errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Templated parsing errors
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host is not present in known_hosts and verification is strict
    #[error("Host key for {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Channel layer errors (prompt matching, PTY operations).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Pattern matching timed out
    #[error("Prompt not found within {0:?}")]
    PatternTimeout(std::time::Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),
}

/// Session-level errors (command execution, lifecycle).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Session not connected
    #[error("Session not connected - call connect() first")]
    NotConnected,

    /// Session already connected
    #[error("Session already connected")]
    AlreadyConnected,

    /// The device rejected the command
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Invalid configuration in the device builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Platform definition errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// No platform registered for the device type
    #[error("Unknown platform: {name}")]
    UnknownPlatform { name: String },

    /// Platform name could not be parsed
    #[error("Unrecognized device type '{name}'")]
    UnrecognizedDeviceType { name: String },

    /// Invalid platform definition
    #[error("Invalid platform definition: {message}")]
    InvalidDefinition { message: String },
}

/// Templated parsing errors.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template source failed to compile
    #[error("Template for '{command}' failed to compile: {message}")]
    Compile { command: String, message: String },

    /// Template failed while parsing command output
    #[error("Template for '{command}' failed to parse output: {message}")]
    Parse { command: String, message: String },
}

/// Version comparison errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Versions from different OS families have no ordering
    #[error("Cannot compare {left} version with {right} version")]
    FamilyMismatch { left: OsFamily, right: OsFamily },
}

/// Result type alias using netfacts' Error.
pub type Result<T> = std::result::Result<T, Error>;
