//! Line-delimited JSON message writer

use super::message::Message;
use crate::error::{Error, Result};
use std::io::{self, Write};

/// Writes one JSON message per line to an underlying sink
#[derive(Debug)]
pub struct MessageWriter<W: Write> {
    inner: W,
    written: usize,
}

impl MessageWriter<io::Stdout> {
    /// Writer over process stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> MessageWriter<W> {
    /// Wrap a sink
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Serialize `message` as a single line and flush
    pub fn write(&mut self, message: &Message) -> Result<()> {
        serde_json::to_writer(&mut self.inner, message)
            .map_err(|e| Error::output(format!("Failed to serialize message: {e}")))?;
        self.inner.write_all(b"\n")?;
        self.inner.flush()?;
        self.written += 1;
        Ok(())
    }

    /// Number of messages written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Get a reference to the sink
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consume the writer and return the sink
    pub fn into_inner(self) -> W {
        self.inner
    }
}
