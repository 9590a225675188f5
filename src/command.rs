//! Commands and types used throughout gridsnap.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every action the tiler can perform, and
//! [`Action`] / [`Direction`] / [`Rect`] / [`WindowId`] / [`WindowInfo`]
//! provide the supporting data types.
//!
//! Key-bind helpers forward raw arguments; the daemon parses action and
//! direction strings case-insensitively ("move", "Expand", "LEFT", …) and
//! window ids as either numbers or hex strings ("0x5934277460f0").

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Direction for span transforms and focus jumps (cardinal only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Parse a direction string (case-insensitive).
fn parse_direction(s: &str) -> Option<Direction> {
    match s.trim().to_ascii_lowercase().as_str() {
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_direction(&s).ok_or_else(|| DeError::custom(format!("invalid direction: {:?}", s)))
    }
}

/// What a directional transform does to the focused window's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    /// Shift the anchor cell by one in the given direction.
    Move,
    /// Grow the span by one cell toward the given direction.
    Expand,
    /// Shrink the span by one cell away from the given direction.
    Shrink,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move => write!(f, "move"),
            Action::Expand => write!(f, "expand"),
            Action::Shrink => write!(f, "shrink"),
        }
    }
}

/// Parse an action string (case-insensitive).
fn parse_action(s: &str) -> Option<Action> {
    match s.trim().to_ascii_lowercase().as_str() {
        "move" => Some(Action::Move),
        "expand" => Some(Action::Expand),
        "shrink" => Some(Action::Shrink),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_action(&s).ok_or_else(|| DeError::custom(format!("invalid action: {:?}", s)))
    }
}

/// An axis-aligned rectangle in absolute screen pixels.
///
/// All four fields are `i32`: positions can be negative on multi-monitor
/// virtual desktops, and signed sizes keep the interpolation arithmetic
/// uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point of the rectangle, in real-valued pixels.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Opaque window identity.
///
/// On Hyprland this is the window address. The id is only ever used as a
/// map key and as an argument back to the compositor; holding one never
/// keeps the window alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl WindowId {
    /// Parse a hex window address, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.trim().trim_start_matches("0x");
        u64::from_str_radix(digits, 16).ok().map(WindowId)
    }
}

impl<'de> Deserialize<'de> for WindowId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = WindowId;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "non-negative integer or hex string")
            }
            fn visit_u64<E>(self, n: u64) -> Result<WindowId, E> {
                Ok(WindowId(n))
            }
            fn visit_str<E>(self, s: &str) -> Result<WindowId, E>
            where
                E: DeError,
            {
                WindowId::from_hex(s)
                    .ok_or_else(|| DeError::custom(format!("invalid window id: {:?}", s)))
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Minimal information about a window reported by the compositor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    /// Compositor-assigned identity.
    pub id: WindowId,
    /// Human-readable title.
    pub title: String,
    /// Current frame rectangle in absolute screen pixels.
    pub frame: Rect,
}

/// Wire format for ApplyTile.
///
/// `window` defaults to the currently focused window and the spans default
/// to a single cell, so a picker UI only has to send the preset and index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRequest {
    /// Target window; `None` means the focused window at apply time.
    #[serde(default)]
    pub window: Option<WindowId>,
    /// Key into the preset catalog ("1".."9").
    pub preset: String,
    /// Linear index of the span's anchor cell.
    pub index: usize,
    /// Rows covered by the span.
    #[serde(default = "one")]
    pub row_span: usize,
    /// Columns covered by the span.
    #[serde(default = "one")]
    pub col_span: usize,
}

fn one() -> usize {
    1
}

/// Every action the tiler can perform.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations and consumed by the [`GridTiler`](crate::tiler::GridTiler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Snap a window to an explicit preset/index/span. Used by picker UIs;
    /// executed through the tiler's single deferred-apply slot.
    ApplyTile(TileRequest),

    /// Move, expand or shrink the focused window's span by one cell.
    Transform {
        action: Action,
        direction: Direction,
    },

    /// Jump focus to the nearest window in the given direction.
    Focus(Direction),

    /// Ask the external overlay/picker to show (or hide) itself for the
    /// focused window.
    ///
    /// On the wire this is encoded as the JSON string `"ToggleOverlay"`.
    ToggleOverlay,

    /// Lifecycle notification: the window no longer exists. Prunes its
    /// tiling state and cancels any animation aimed at it.
    WindowClosed(WindowId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Left.to_string(), "left");
        assert_eq!(Direction::Right.to_string(), "right");
        assert_eq!(Direction::Up.to_string(), "up");
        assert_eq!(Direction::Down.to_string(), "down");
    }

    #[test]
    fn direction_parse_case_insensitive() {
        for s in ["left", "Left", "LEFT", " left "] {
            let d: Direction = serde_json::from_str(&format!("{:?}", s)).unwrap();
            assert_eq!(d, Direction::Left);
        }
        assert!(serde_json::from_str::<Direction>("\"sideways\"").is_err());
    }

    #[test]
    fn action_parse_case_insensitive() {
        for (s, want) in [
            ("move", Action::Move),
            ("EXPAND", Action::Expand),
            ("Shrink", Action::Shrink),
        ] {
            let a: Action = serde_json::from_str(&format!("{:?}", s)).unwrap();
            assert_eq!(a, want);
        }
        assert!(serde_json::from_str::<Action>("\"grow\"").is_err());
    }

    #[test]
    fn rect_center() {
        let r = Rect::new(10, 20, 100, 50);
        assert_eq!(r.center(), (60.0, 45.0));
    }

    #[test]
    fn rect_center_odd_sizes() {
        let r = Rect::new(0, 0, 5, 5);
        assert_eq!(r.center(), (2.5, 2.5));
    }

    #[test]
    fn window_id_from_hex() {
        assert_eq!(WindowId::from_hex("0x1f"), Some(WindowId(31)));
        assert_eq!(WindowId::from_hex("1f"), Some(WindowId(31)));
        assert_eq!(
            WindowId::from_hex("5934277460f0"),
            Some(WindowId(0x5934277460f0))
        );
        assert_eq!(WindowId::from_hex("not hex"), None);
    }

    #[test]
    fn window_id_display_is_hex() {
        assert_eq!(WindowId(31).to_string(), "0x1f");
    }

    #[test]
    fn window_id_deserializes_number_or_string() {
        let a: WindowId = serde_json::from_str("31").unwrap();
        let b: WindowId = serde_json::from_str("\"0x1f\"").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn transform_wire_format() {
        let cmd: Command =
            serde_json::from_str(r#"{"Transform":{"action":"move","direction":"left"}}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Transform {
                action: Action::Move,
                direction: Direction::Left,
            }
        );
    }

    #[test]
    fn focus_wire_format() {
        let cmd: Command = serde_json::from_str(r#"{"Focus":"right"}"#).unwrap();
        assert_eq!(cmd, Command::Focus(Direction::Right));
    }

    #[test]
    fn toggle_overlay_wire_format() {
        let cmd: Command = serde_json::from_str(r#""ToggleOverlay""#).unwrap();
        assert_eq!(cmd, Command::ToggleOverlay);
    }

    #[test]
    fn apply_tile_defaults() {
        let cmd: Command =
            serde_json::from_str(r#"{"ApplyTile":{"preset":"9","index":4}}"#).unwrap();
        match cmd {
            Command::ApplyTile(req) => {
                assert_eq!(req.window, None);
                assert_eq!(req.preset, "9");
                assert_eq!(req.index, 4);
                assert_eq!(req.row_span, 1);
                assert_eq!(req.col_span, 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn apply_tile_full() {
        let json = r#"{"ApplyTile":{"window":"0xbeef","preset":"5","index":1,"row_span":2,"col_span":1}}"#;
        let cmd: Command = serde_json::from_str(json).unwrap();
        match cmd {
            Command::ApplyTile(req) => {
                assert_eq!(req.window, Some(WindowId(0xbeef)));
                assert_eq!(req.preset, "5");
                assert_eq!(req.row_span, 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn window_closed_wire_format() {
        let cmd: Command = serde_json::from_str(r#"{"WindowClosed":"0x1f"}"#).unwrap();
        assert_eq!(cmd, Command::WindowClosed(WindowId(31)));
    }

    #[test]
    fn command_serialize_round_trip() {
        let cmds = vec![
            Command::Transform {
                action: Action::Shrink,
                direction: Direction::Down,
            },
            Command::Focus(Direction::Up),
            Command::ToggleOverlay,
        ];
        for cmd in cmds {
            let json = serde_json::to_string(&cmd).unwrap();
            let back: Command = serde_json::from_str(&json).unwrap();
            assert_eq!(back, cmd);
        }
    }
}
