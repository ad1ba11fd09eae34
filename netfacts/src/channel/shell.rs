//! Interactive shell channel over an SSH PTY.

use std::time::Duration;

use log::{debug, trace};
use regex::bytes::Regex;
use russh::client::Msg;
use russh::{Channel, ChannelMsg};

use super::buffer::PatternBuffer;
use crate::error::{ChannelError, Result};

/// A PTY shell channel that reads until a prompt is seen.
pub struct ShellChannel {
    channel: Channel<Msg>,
    buffer: PatternBuffer,
}

impl ShellChannel {
    /// Wrap an opened PTY shell channel.
    pub fn new(channel: Channel<Msg>, search_depth: usize) -> Self {
        Self {
            channel,
            buffer: PatternBuffer::new(search_depth),
        }
    }

    /// Send one line of input.
    pub async fn send_line(&mut self, line: &str) -> Result<()> {
        trace!("send: {:?}", line);
        let data = format!("{}\n", line);
        self.channel
            .data(data.as_bytes())
            .await
            .map_err(ChannelError::Ssh)?;
        Ok(())
    }

    /// Read until `pattern` matches in the buffer tail.
    ///
    /// Returns all bytes read, including the prompt, and the matched prompt
    /// text.
    pub async fn read_until_prompt(
        &mut self,
        pattern: &Regex,
        timeout: Duration,
    ) -> Result<(Vec<u8>, String)> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if let Some(prompt) = self.buffer.trailing_match(pattern) {
                debug!("prompt matched: {:?} ({} bytes)", prompt, self.buffer.len());
                return Ok((self.buffer.take(), prompt));
            }

            let msg = tokio::time::timeout_at(deadline, self.channel.wait())
                .await
                .map_err(|_| ChannelError::PatternTimeout(timeout))?;

            match msg {
                Some(ChannelMsg::Data { ref data }) => self.buffer.extend(data),
                Some(ChannelMsg::ExtendedData { ref data, .. }) => self.buffer.extend(data),
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    return Err(ChannelError::Closed.into());
                }
                Some(other) => trace!("ignoring channel message: {:?}", other),
            }
        }
    }

    /// Discard anything buffered so far.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Close the channel.
    pub async fn close(self) -> Result<()> {
        self.channel.close().await.map_err(ChannelError::Ssh)?;
        Ok(())
    }
}
