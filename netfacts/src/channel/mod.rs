//! Channel layer for prompt detection over a PTY shell.
//!
//! This module handles the interactive session plumbing: accumulating
//! output, stripping ANSI escapes and reading until the device prompt.

mod buffer;
mod shell;

pub use buffer::PatternBuffer;
pub use shell::ShellChannel;
