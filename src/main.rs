//! Entry point for the **gridsnap** daemon.
//!
//! Spawns all configured [`CommandSource`](gridsnap::traits::CommandSource)s
//! on background threads and processes incoming commands on the main thread.
//!
//! The main thread owns the [`GridTiler`](gridsnap::tiler::GridTiler) and is
//! the only place window geometry is touched.  It blocks on the command
//! channel with a timeout derived from the tiler's next deadline, so
//! deferred applies and animation frames fire without a dedicated timer
//! thread.

use gridsnap::command::Command;
use gridsnap::hyprland::events::HyprlandEventSource;
use gridsnap::hyprland::wm::HyprlandCompositor;
use gridsnap::ipc::listener::{default_socket_path, UnixSocketListener};
use gridsnap::settings::FileSettings;
use gridsnap::tiler::GridTiler;
use gridsnap::traits::{CommandSource, Compositor, SettingsStore};
use log::{error, info};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;

/// Value of a `--config <path>` argument, if present.
fn config_path_arg() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

/// Load the settings store, exiting on anything unrecoverable.
///
/// A missing file is fine (compiled-in defaults apply); a file that exists
/// but cannot be read or parsed is fatal, since silently ignoring it would
/// discard the user's configuration.
fn load_settings() -> FileSettings {
    let path = match config_path_arg() {
        Some(p) => p,
        None => match FileSettings::default_path() {
            Ok(p) => p,
            Err(e) => {
                error!("cannot resolve settings path: {}", e);
                std::process::exit(1);
            }
        },
    };

    match FileSettings::load(path.clone()) {
        Ok(settings) => {
            info!("settings file: {}", path.display());
            settings
        }
        Err(e) => {
            error!("failed to load settings from {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let settings = load_settings();

    let wm = HyprlandCompositor::new();
    match wm.list_windows() {
        Ok(windows) => info!("found {} window(s) on the active workspace", windows.len()),
        Err(e) => {
            error!("failed to reach Hyprland: {}", e);
            std::process::exit(1);
        }
    }

    let tiler = GridTiler::new(wm, settings);

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx);

    run_event_loop(tiler, cmd_rx);
}

//  Event loop

/// Process commands until every source has closed its sender.
///
/// Between commands, waits only as long as the tiler's next deadline
/// allows; a timeout wakes the tiler's timer instead of delivering a
/// command.
fn run_event_loop<C, S>(mut tiler: GridTiler<C, S>, cmd_rx: mpsc::Receiver<Command>)
where
    C: Compositor,
    S: SettingsStore,
{
    info!("gridsnap running");

    loop {
        let received = match tiler.next_deadline() {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match cmd_rx.recv_timeout(wait) {
                    Ok(cmd) => Some(cmd),
                    Err(mpsc::RecvTimeoutError::Timeout) => None,
                    Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match cmd_rx.recv() {
                Ok(cmd) => Some(cmd),
                Err(_) => break,
            },
        };

        let result = match received {
            Some(cmd) => tiler.handle(cmd, Instant::now()),
            None => tiler.on_timer(Instant::now()),
        };
        if let Err(e) = result {
            error!("command error: {}", e);
        }
    }

    tiler.shutdown();
    info!("all command sources closed, exiting");
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Command>) {
    {
        let tx = tx.clone();
        let path = default_socket_path();
        std::thread::spawn(move || {
            let mut source = UnixSocketListener::new(&path);
            if let Err(e) = source.run(tx) {
                error!("socket listener error: {}", e);
            }
        });
    }

    {
        let tx = tx.clone();
        std::thread::spawn(move || {
            let mut source = HyprlandEventSource::new();
            if let Err(e) = source.run(tx) {
                error!("event source error: {}", e);
            }
        });
    }

    drop(tx);
}
