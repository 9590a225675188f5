//! Core traits that decouple gridsnap from any specific compositor,
//! settings backend, or command transport.
//!
//! Every concrete backend (Hyprland, the file-backed settings store, a
//! Unix-socket listener, a test harness, …) implements one of these
//! traits. The [`GridTiler`](crate::tiler::GridTiler) only depends on
//! the abstractions.

use crate::command::{Command, Rect, WindowId, WindowInfo};
use crate::geometry::Padding;
use std::sync::mpsc;
use std::time::Duration;

/// Abstraction over a compositor that can report and place windows.
///
/// An implementation might talk to Hyprland via IPC, or it might be a
/// call-recording stub used in tests.
pub trait Compositor {
    /// The error type produced by this compositor.
    type Error: std::error::Error + Send + 'static;

    /// The currently focused window, or `None` if nothing is focused.
    fn focused_window(&self) -> Result<Option<WindowInfo>, Self::Error>;

    /// Normal windows on the active workspace.
    fn list_windows(&self) -> Result<Vec<WindowInfo>, Self::Error>;

    /// A window's current frame, or `None` once the window is gone.
    fn frame_rect(&self, id: WindowId) -> Result<Option<Rect>, Self::Error>;

    /// Usable area of the monitor the window sits on (monitor geometry
    /// minus reserved chrome), or `None` once the window is gone.
    fn work_area(&self, id: WindowId) -> Result<Option<Rect>, Self::Error>;

    /// Take the window out of the maximized/fullscreen state so that an
    /// explicit geometry can be applied.
    fn unmaximize(&self, id: WindowId) -> Result<(), Self::Error>;

    /// Place the window at the given absolute rect.
    fn move_resize(&self, id: WindowId, rect: Rect) -> Result<(), Self::Error>;

    /// Give the window input focus, raising it as the host requires.
    fn activate(&self, id: WindowId) -> Result<(), Self::Error>;
}

/// Abstraction over the persisted user settings.
///
/// Reads are infallible — implementations hold the loaded values and fall
/// back to defaults where a value is absent. Only the write-back of the
/// last used preset can fail.
pub trait SettingsStore {
    /// The error type produced when persisting fails.
    type Error: std::error::Error + Send + 'static;

    /// Whether window placement is animated.
    fn animate_movement(&self) -> bool;

    /// Length of the placement animation.
    fn animation_duration(&self) -> Duration;

    /// Gaps between tiles and around the grid.
    fn padding(&self) -> Padding;

    /// Key of the most recently applied preset.
    fn last_active_preset(&self) -> String;

    /// Record (and persist) the most recently applied preset.
    fn set_last_active_preset(&mut self, key: &str) -> Result<(), Self::Error>;
}

//  Overlay

/// Events sent from the [`GridTiler`](crate::tiler::GridTiler) to an
/// external grid-picker overlay over an [`mpsc`](std::sync::mpsc) channel.
///
/// The tiler holds an `Option<mpsc::Sender<OverlayEvent>>`. The overlay
/// owns its own visibility state machine; the tiler only announces that
/// the user asked for it, and the overlay answers by sending an
/// `ApplyTile` command back over the normal command transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEvent {
    /// Show or hide the picker for the given window, starting from the
    /// preset that window currently uses.
    Toggle {
        window: WindowId,
        preset_key: String,
    },
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport — a Unix socket, Hyprland's
/// event stream, an in-memory channel, … — and forward parsed commands
/// into the provided [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted
///   or an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated
///   thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Action, Command, Direction};
    use std::cell::RefCell;
    use std::sync::mpsc;

    //  Mock Compositor

    /// A test double that records every placement made through it.
    #[derive(Debug, Default)]
    struct MockCompositor {
        move_log: RefCell<Vec<(WindowId, Rect)>>,
        activate_log: RefCell<Vec<WindowId>>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    impl Compositor for MockCompositor {
        type Error = MockError;

        fn focused_window(&self) -> Result<Option<WindowInfo>, MockError> {
            Ok(Some(WindowInfo {
                id: WindowId(0xdead),
                title: "mock".into(),
                frame: Rect {
                    x: 0,
                    y: 0,
                    width: 640,
                    height: 480,
                },
            }))
        }

        fn list_windows(&self) -> Result<Vec<WindowInfo>, MockError> {
            Ok(vec![])
        }

        fn frame_rect(&self, _id: WindowId) -> Result<Option<Rect>, MockError> {
            Ok(None)
        }

        fn work_area(&self, _id: WindowId) -> Result<Option<Rect>, MockError> {
            Ok(None)
        }

        fn unmaximize(&self, _id: WindowId) -> Result<(), MockError> {
            Ok(())
        }

        fn move_resize(&self, id: WindowId, rect: Rect) -> Result<(), MockError> {
            self.move_log.borrow_mut().push((id, rect));
            Ok(())
        }

        fn activate(&self, id: WindowId) -> Result<(), MockError> {
            self.activate_log.borrow_mut().push(id);
            Ok(())
        }
    }

    #[test]
    fn mock_compositor_records_placements() {
        let wm = MockCompositor::default();
        let rect = Rect {
            x: 10,
            y: 20,
            width: 300,
            height: 200,
        };
        wm.move_resize(WindowId(7), rect).unwrap();
        assert_eq!(wm.move_log.borrow().len(), 1);
        assert_eq!(wm.move_log.borrow()[0], (WindowId(7), rect));
    }

    //  Mock CommandSource

    /// A test double that emits a fixed sequence of commands.
    struct MockSource {
        commands: Vec<Command>,
    }

    impl CommandSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), MockError> {
            for cmd in self.commands.drain(..) {
                let _ = sink.send(cmd);
            }
            Ok(())
        }
    }

    #[test]
    fn mock_source_emits_commands() {
        let mut src = MockSource {
            commands: vec![
                Command::Transform {
                    action: Action::Move,
                    direction: Direction::Right,
                },
                Command::Focus(Direction::Left),
            ],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let cmds: Vec<Command> = rx.try_iter().collect();
        assert_eq!(cmds.len(), 2);
        assert_eq!(
            cmds[0],
            Command::Transform {
                action: Action::Move,
                direction: Direction::Right,
            }
        );
        assert_eq!(cmds[1], Command::Focus(Direction::Left));
    }
}
