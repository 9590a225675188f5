//! IPC listener that accepts commands over a Unix socket.
//!
//! External tools — key-bind helpers, the overlay picker, plain scripts —
//! connect to the socket and send newline-delimited JSON commands.

pub mod listener;
