//! [`Compositor`] implementation backed by Hyprland IPC.
//!
//! Communicates directly with Hyprland through its Unix socket at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`,
//! avoiding any shell command invocation or third-party crate for socket
//! discovery.
//!
//! Geometry is exchanged in logical pixels: window positions and sizes
//! from `j/clients` already are, and monitor sizes are divided by the
//! monitor's scale factor before reserved insets are subtracted.

use crate::command::{Rect, WindowId, WindowInfo};
use crate::traits::Compositor;
use serde::Deserialize;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

/// Hyprland-backed compositor adapter.
///
/// All communication happens over Hyprland's IPC socket
/// (`$XDG_RUNTIME_DIR/hypr/<instance>/.socket.sock`).  No child processes
/// are spawned.
#[derive(Default)]
pub struct HyprlandCompositor;

/// Errors that can occur when talking to Hyprland.
#[derive(Debug, thiserror::Error)]
#[error("hyprland IPC error: {0}")]
pub struct HyprlandError(String);

impl HyprlandCompositor {
    /// Create a new handle.
    ///
    /// No connection is opened eagerly; each method call opens a
    /// short-lived IPC request.
    pub fn new() -> Self {
        Self
    }
}

//  Direct Hyprland IPC helpers

/// Resolve the Hyprland command socket path.
///
/// Hyprland ≥ 0.40 stores its sockets at
/// `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`.
fn socket_path() -> Result<PathBuf, HyprlandError> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map_err(|_| HyprlandError("XDG_RUNTIME_DIR not set".into()))?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
        .map_err(|_| HyprlandError("HYPRLAND_INSTANCE_SIGNATURE not set".into()))?;
    Ok(PathBuf::from(format!(
        "{}/hypr/{}/.socket.sock",
        runtime_dir, his
    )))
}

/// Send a raw command to the Hyprland command socket and return the
/// response as a string.
fn ipc_request(command: &str) -> Result<String, HyprlandError> {
    let path = socket_path()?;
    let mut stream = UnixStream::connect(&path)
        .map_err(|e| HyprlandError(format!("connect to {}: {}", path.display(), e)))?;

    stream
        .write_all(command.as_bytes())
        .map_err(|e| HyprlandError(format!("write: {}", e)))?;

    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .map_err(|e| HyprlandError(format!("read: {}", e)))?;

    String::from_utf8(response).map_err(|e| HyprlandError(format!("utf-8: {}", e)))
}

/// Send a JSON data query (`j/<command>`) and return the raw JSON string.
fn ipc_json(data_command: &str) -> Result<String, HyprlandError> {
    ipc_request(&format!("j/{}", data_command))
}

/// Send a dispatch command and check for `"ok"`.
fn ipc_dispatch(args: &str) -> Result<(), HyprlandError> {
    let response = ipc_request(&format!("/dispatch {}", args))?;
    if response.trim() == "ok" {
        Ok(())
    } else {
        Err(HyprlandError(format!("dispatch error: {}", response)))
    }
}

//  Minimal serde structs for the JSON we care about

/// Subset of the JSON object returned by `j/activewindow`.
#[derive(Deserialize)]
struct ActiveWindowJson {
    address: String,
    #[serde(default)]
    title: String,
    at: [i32; 2],
    size: [i32; 2],
}

/// Subset of one entry of the array returned by `j/clients`.
#[derive(Deserialize)]
struct ClientJson {
    address: String,
    #[serde(default)]
    title: String,
    at: [i32; 2],
    size: [i32; 2],
    monitor: i64,
    workspace: WorkspaceRefJson,
    #[serde(default = "default_true")]
    mapped: bool,
    #[serde(default)]
    hidden: bool,
}

#[derive(Deserialize)]
struct WorkspaceRefJson {
    id: i64,
}

/// Subset of the JSON object returned by `j/activeworkspace`.
#[derive(Deserialize)]
struct ActiveWorkspaceJson {
    id: i64,
}

/// Subset of one entry of the array returned by `j/monitors`.
#[derive(Deserialize)]
struct MonitorJson {
    id: i64,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    #[serde(default = "default_scale")]
    scale: f64,
    /// Insets claimed by bars and other layer-shell chrome:
    /// `[left, top, right, bottom]`.
    #[serde(default)]
    reserved: [i32; 4],
}

fn default_true() -> bool {
    true
}

fn default_scale() -> f64 {
    1.0
}

//  Pure mapping helpers

/// Interpret a `j/activewindow` response. Hyprland returns an empty
/// object `{}` when no window is focused.
fn parse_active_window(json: &str) -> Result<Option<WindowInfo>, HyprlandError> {
    if json.trim() == "{}" {
        return Ok(None);
    }
    let w: ActiveWindowJson =
        serde_json::from_str(json).map_err(|e| HyprlandError(format!("parse: {}", e)))?;
    match WindowId::from_hex(&w.address) {
        Some(id) => Ok(Some(WindowInfo {
            id,
            title: w.title,
            frame: Rect::new(w.at[0], w.at[1], w.size[0], w.size[1]),
        })),
        None => Err(HyprlandError(format!("bad window address: {}", w.address))),
    }
}

fn client_rect(client: &ClientJson) -> Rect {
    Rect::new(client.at[0], client.at[1], client.size[0], client.size[1])
}

/// The mapped, non-hidden clients on `workspace_id`, as [`WindowInfo`]s.
/// Clients with an unparseable address are skipped.
fn visible_windows(clients: &[ClientJson], workspace_id: i64) -> Vec<WindowInfo> {
    clients
        .iter()
        .filter(|c| c.workspace.id == workspace_id && c.mapped && !c.hidden)
        .filter_map(|c| {
            WindowId::from_hex(&c.address).map(|id| WindowInfo {
                id,
                title: c.title.clone(),
                frame: client_rect(c),
            })
        })
        .collect()
}

/// A monitor's usable area: its logical geometry minus reserved insets.
fn monitor_work_area(monitor: &MonitorJson) -> Rect {
    let [left, top, right, bottom] = monitor.reserved;
    let width = (monitor.width as f64 / monitor.scale).round() as i32;
    let height = (monitor.height as f64 / monitor.scale).round() as i32;
    Rect {
        x: monitor.x + left,
        y: monitor.y + top,
        width: width - left - right,
        height: height - top - bottom,
    }
}

fn move_dispatch(id: WindowId, rect: Rect) -> String {
    format!("movewindowpixel exact {} {},address:{}", rect.x, rect.y, id)
}

fn resize_dispatch(id: WindowId, rect: Rect) -> String {
    format!(
        "resizewindowpixel exact {} {},address:{}",
        rect.width, rect.height, id
    )
}

//  Queries

fn query_clients() -> Result<Vec<ClientJson>, HyprlandError> {
    let json = ipc_json("clients")?;
    serde_json::from_str(&json).map_err(|e| HyprlandError(format!("parse: {}", e)))
}

fn query_monitors() -> Result<Vec<MonitorJson>, HyprlandError> {
    let json = ipc_json("monitors")?;
    serde_json::from_str(&json).map_err(|e| HyprlandError(format!("parse: {}", e)))
}

fn query_active_workspace() -> Result<i64, HyprlandError> {
    let json = ipc_json("activeworkspace")?;
    let ws: ActiveWorkspaceJson =
        serde_json::from_str(&json).map_err(|e| HyprlandError(format!("parse: {}", e)))?;
    Ok(ws.id)
}

//  Compositor implementation

impl Compositor for HyprlandCompositor {
    type Error = HyprlandError;

    fn focused_window(&self) -> Result<Option<WindowInfo>, Self::Error> {
        let json = ipc_json("activewindow")?;
        parse_active_window(&json)
    }

    fn list_windows(&self) -> Result<Vec<WindowInfo>, Self::Error> {
        let workspace = query_active_workspace()?;
        Ok(visible_windows(&query_clients()?, workspace))
    }

    fn frame_rect(&self, id: WindowId) -> Result<Option<Rect>, Self::Error> {
        Ok(query_clients()?
            .iter()
            .find(|c| WindowId::from_hex(&c.address) == Some(id))
            .map(client_rect))
    }

    fn work_area(&self, id: WindowId) -> Result<Option<Rect>, Self::Error> {
        let monitor = match query_clients()?
            .iter()
            .find(|c| WindowId::from_hex(&c.address) == Some(id))
        {
            Some(client) => client.monitor,
            None => return Ok(None),
        };
        Ok(query_monitors()?
            .iter()
            .find(|m| m.id == monitor)
            .map(monitor_work_area))
    }

    fn unmaximize(&self, id: WindowId) -> Result<(), Self::Error> {
        // Tiled and fullscreen windows ignore pixel-exact placement;
        // floating is the state in which a set geometry sticks.
        ipc_dispatch(&format!("setfloating address:{}", id))
    }

    fn move_resize(&self, id: WindowId, rect: Rect) -> Result<(), Self::Error> {
        ipc_dispatch(&move_dispatch(id, rect))?;
        ipc_dispatch(&resize_dispatch(id, rect))
    }

    fn activate(&self, id: WindowId) -> Result<(), Self::Error> {
        ipc_dispatch(&format!("focuswindow address:{}", id))
    }
}

//  Tests
