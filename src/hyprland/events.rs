//! Translates Hyprland lifecycle events into gridsnap [`Command`]s.
//!
//! Hyprland broadcasts events in the `EVENT>>DATA\n` format on its event
//! socket at `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket2.sock`.
//! The one event gridsnap acts on is `closewindow`, whose payload is the
//! window address (hex, without the `0x` prefix). It becomes
//! [`Command::WindowClosed`] so the tiler can drop the window's grid state
//! and stop any animation still targeting it.

use crate::command::{Command, WindowId};
use crate::traits::CommandSource;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::sync::mpsc;

/// A [`CommandSource`] that listens to Hyprland window lifecycle events
/// via the raw IPC event socket.
#[derive(Default)]
pub struct HyprlandEventSource;

impl HyprlandEventSource {
    /// Create a new event source.
    pub fn new() -> Self {
        Self
    }
}

/// Resolve the Hyprland event socket path.
///
/// Hyprland stores its sockets at
/// `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket2.sock`.
fn socket2_path() -> Result<PathBuf, HyprlandEventError> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map_err(|_| HyprlandEventError("XDG_RUNTIME_DIR not set".into()))?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
        .map_err(|_| HyprlandEventError("HYPRLAND_INSTANCE_SIGNATURE not set".into()))?;
    Ok(PathBuf::from(format!(
        "{}/hypr/{}/.socket2.sock",
        runtime_dir, his
    )))
}

/// Parse a single event line from socket2.
///
/// Lines have the form `EVENT>>DATA\n`.
fn parse_event_line(line: &str) -> Option<(&str, &str)> {
    let sep = line.find(">>")?;
    Some((&line[..sep], &line[sep + 2..]))
}

/// Process a single event and potentially emit a command.
fn handle_event(event: &str, data: &str, sink: &mpsc::Sender<Command>) {
    match event {
        "closewindow" => match WindowId::from_hex(data) {
            Some(id) => {
                debug!("window closed: {}", id);
                let _ = sink.send(Command::WindowClosed(id));
            }
            None => {
                debug!("closewindow with unparseable address: {:?}", data);
            }
        },
        _ => {
            // Ignore events we don't care about.
        }
    }
}

impl CommandSource for HyprlandEventSource {
    type Error = HyprlandEventError;

    /// Connect to Hyprland's event socket and start listening for window
    /// lifecycle events.
    ///
    /// This method **blocks** forever (until the socket is closed or an
    /// error occurs).  Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        let path = socket2_path()?;
        let stream = UnixStream::connect(&path)
            .map_err(|e| HyprlandEventError(format!("connect to {}: {}", path.display(), e)))?;
        info!("event source connected to {}", path.display());
        let reader = BufReader::new(stream);

        for line in reader.lines() {
            match line {
                Ok(line) if line.is_empty() => continue,
                Ok(line) => {
                    if let Some((event, data)) = parse_event_line(&line) {
                        handle_event(event, data, &sink);
                    }
                }
                Err(e) => {
                    error!("socket2 read error: {}", e);
                    return Err(HyprlandEventError(format!("read error: {}", e)));
                }
            }
        }

        warn!("socket2 stream ended");
        Ok(())
    }
}

/// Error from the Hyprland event source.
#[derive(Debug, thiserror::Error)]
#[error("hyprland event error: {0}")]
pub struct HyprlandEventError(String);

//  Tests
