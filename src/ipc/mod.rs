//! Payload transports.
//!
//! Both sources speak the same framing: one JSON payload per line, blank
//! lines ignored.  The window manager's own control-channel protocol is
//! bridged onto this by whatever feeds the socket or stdin.

pub mod listener;
pub mod reader;

use log::{debug, info};
use std::io::BufRead;
use std::sync::mpsc;

/// Errors produced by payload sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// What made [`forward_lines`] stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Forwarded {
    /// The reader reached end of input.
    Exhausted,
    /// The receiving end of the sink was dropped.
    SinkClosed,
}

/// Send every non-blank line of `reader` into `sink`.
pub(crate) fn forward_lines(
    reader: impl BufRead,
    sink: &mpsc::Sender<String>,
) -> Result<Forwarded, std::io::Error> {
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        debug!("received payload ({} bytes)", line.len());
        if sink.send(line).is_err() {
            info!("sink closed, shutting down");
            return Ok(Forwarded::SinkClosed);
        }
    }
    Ok(Forwarded::Exhausted)
}
