//! Unix-socket [`PayloadSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is forwarded as one workspace payload.
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! [{"num":1,"name":"1","visible":true,"focused":true,"urgent":false,"rect":{"x":0,"y":0,"width":1920,"height":29},"output":"LVDS1"}]
//! ```
//!
//! The listener does not look inside the payload; validation happens in the
//! [`Rebuilder`](crate::rebuild::Rebuilder).

use super::{forward_lines, Forwarded, SourceError};
use crate::traits::PayloadSource;
use log::{debug, error, info};
use std::io::BufReader;
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`PayloadSource`] that listens on a Unix stream socket.
///
/// Each accepted connection can send multiple newline-delimited payloads.
/// When the connection closes, the listener waits for the next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](PayloadSource::run) is called.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PayloadSource for UnixSocketListener {
    type Error = SourceError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the sink is closed.  Run it on a
    /// dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<String>) -> Result<(), SourceError> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    match forward_lines(BufReader::new(stream), &sink) {
                        Ok(Forwarded::SinkClosed) => return Ok(()),
                        Ok(Forwarded::Exhausted) => debug!("client disconnected"),
                        Err(e) => error!("read error: {}", e),
                    }
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
        Ok(())
    }
}

//  Tests
