//! The main orchestrator that ties the grid catalog, per-window state,
//! geometry, animation, and compositor together.
//!
//! [`GridTiler`] owns the [`StateStore`] and the [`Animator`] and reacts
//! to [`Command`]s by updating window state and issuing calls through the
//! [`Compositor`] trait. It never blocks and never sleeps: the event loop
//! drives time into it via [`handle`](GridTiler::handle) and
//! [`on_timer`](GridTiler::on_timer), and asks
//! [`next_deadline`](GridTiler::next_deadline) how long it may wait.

use crate::animator::{Animator, TICK};
use crate::catalog;
use crate::command::{Action, Command, Direction, TileRequest, WindowId};
use crate::focus;
use crate::geometry;
use crate::state::{StateStore, TilingState};
use crate::traits::{Compositor, OverlayEvent, SettingsStore};
use crate::transform;
use log::{debug, info, warn};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Delay between receiving an `ApplyTile` command and executing it.
///
/// Gives the sender (typically the overlay picker) time to dismiss itself
/// before the window starts moving.
const APPLY_DELAY: Duration = Duration::from_millis(10);

/// Possible errors from the tiler.
#[derive(Debug, thiserror::Error)]
pub enum TilerError {
    /// The compositor returned an error.
    #[error("compositor error: {0}")]
    Compositor(String),
}

/// An `ApplyTile` waiting out its [`APPLY_DELAY`].
#[derive(Debug)]
struct DeferredApply {
    due: Instant,
    request: TileRequest,
}

/// Orchestrates grid tiling and compositor calls.
///
/// The tiler is generic over any [`Compositor`] and [`SettingsStore`]
/// implementation, making it completely independent of Hyprland or any
/// other concrete backend.
///
/// # Typical usage
///
/// ```ignore
/// let wm = HyprlandCompositor::new()?;
/// let settings = FileSettings::load(path)?;
/// let mut tiler = GridTiler::new(wm, settings);
/// tiler.handle(Command::Focus(Direction::Right), Instant::now())?;
/// ```
pub struct GridTiler<C: Compositor, S: SettingsStore> {
    wm: C,
    settings: S,
    states: StateStore,
    animator: Animator,
    overlay_tx: Option<mpsc::Sender<OverlayEvent>>,
    deferred: Option<DeferredApply>,
    /// When the next animation frame is due, while one is in flight.
    next_tick: Option<Instant>,
}

impl<C: Compositor, S: SettingsStore> GridTiler<C, S> {
    /// Create a new tiler over the given backend and settings.
    pub fn new(wm: C, settings: S) -> Self {
        Self {
            wm,
            settings,
            states: StateStore::new(),
            animator: Animator::new(),
            overlay_tx: None,
            deferred: None,
            next_tick: None,
        }
    }

    /// Attach an overlay event channel.
    ///
    /// The tiler sends [`OverlayEvent::Toggle`] when handling
    /// [`Command::ToggleOverlay`]. The receiver — a grid-picker UI, a
    /// debug logger, … — owns its own visibility state and answers with
    /// an `ApplyTile` command over the normal command transport.
    pub fn set_overlay(&mut self, tx: mpsc::Sender<OverlayEvent>) {
        self.overlay_tx = Some(tx);
    }

    /// Key of the most recently applied preset, resolved to a catalog key.
    pub fn last_preset(&self) -> String {
        let (key, _) = catalog::get_or_default(&self.settings.last_active_preset());
        key.to_string()
    }

    /// Process a single [`Command`].
    ///
    /// Transform and focus commands run immediately; `ApplyTile` is
    /// deferred by [`APPLY_DELAY`], replacing any apply still waiting.
    pub fn handle(&mut self, cmd: Command, now: Instant) -> Result<(), TilerError> {
        match cmd {
            Command::ApplyTile(request) => {
                debug!(
                    "defer apply: preset {} index {}",
                    request.preset, request.index
                );
                self.deferred = Some(DeferredApply {
                    due: now + APPLY_DELAY,
                    request,
                });
            }

            Command::Transform { action, direction } => {
                info!("{} {}", action, direction);
                self.transform_window(action, direction, now)?;
            }

            Command::Focus(direction) => {
                info!("focus {}", direction);
                self.focus_neighbor(direction)?;
            }

            Command::ToggleOverlay => {
                debug!("toggle overlay");
                self.toggle_overlay()?;
            }

            Command::WindowClosed(id) => {
                debug!("window closed: {}", id);
                self.window_closed(id);
            }
        }
        Ok(())
    }

    /// Tile a window onto a preset span.
    ///
    /// A request without a window targets the currently focused one; no
    /// focused window means nothing happens. Unknown preset keys fall
    /// back to the default preset, and only the resolved key is recorded.
    pub fn apply_tile(&mut self, request: TileRequest, now: Instant) -> Result<(), TilerError> {
        let window = match request.window {
            Some(id) => id,
            None => {
                match self
                    .wm
                    .focused_window()
                    .map_err(|e| TilerError::Compositor(e.to_string()))?
                {
                    Some(w) => w.id,
                    None => {
                        debug!("no focused window, nothing to tile");
                        return Ok(());
                    }
                }
            }
        };

        let state = TilingState {
            preset_key: request.preset,
            index: request.index,
            row_span: request.row_span.max(1),
            col_span: request.col_span.max(1),
        };
        self.apply_state(window, state, now)
    }

    /// Step the focused window's span one cell in a direction.
    ///
    /// A window seen for the first time starts from the default state
    /// (center cell of the last used preset), so the first transform also
    /// snaps it onto the grid. The resulting tile is applied even when
    /// the step was blocked at a grid edge — re-applying pulls a window
    /// that drifted (or was resized by hand) back onto its tile.
    pub fn transform_window(
        &mut self,
        action: Action,
        direction: Direction,
        now: Instant,
    ) -> Result<(), TilerError> {
        let window = match self
            .wm
            .focused_window()
            .map_err(|e| TilerError::Compositor(e.to_string()))?
        {
            Some(w) => w,
            None => {
                debug!("no focused window, nothing to transform");
                return Ok(());
            }
        };

        let last = self.settings.last_active_preset();
        let current = self.states.get_or_insert(window.id, &last).clone();
        let next = transform::transform(&current, action, direction);
        self.apply_state(window.id, next, now)
    }

    /// Move focus to the nearest window in a direction, if any.
    pub fn focus_neighbor(&mut self, direction: Direction) -> Result<(), TilerError> {
        let current = match self
            .wm
            .focused_window()
            .map_err(|e| TilerError::Compositor(e.to_string()))?
        {
            Some(w) => w,
            None => {
                debug!("no focused window, nothing to focus from");
                return Ok(());
            }
        };

        let windows = self
            .wm
            .list_windows()
            .map_err(|e| TilerError::Compositor(e.to_string()))?;

        match focus::select_neighbor(&windows, current.id, current.frame, direction) {
            Some(target) => {
                debug!("focus {} -> {} ({})", current.id, target.id, target.title);
                self.wm
                    .activate(target.id)
                    .map_err(|e| TilerError::Compositor(e.to_string()))?;
            }
            None => debug!("no window {} of {}", direction, current.id),
        }
        Ok(())
    }

    /// Announce the overlay toggle for the focused window.
    pub fn toggle_overlay(&mut self) -> Result<(), TilerError> {
        if self.overlay_tx.is_none() {
            debug!("no overlay attached");
            return Ok(());
        }

        let window = match self
            .wm
            .focused_window()
            .map_err(|e| TilerError::Compositor(e.to_string()))?
        {
            Some(w) => w,
            None => {
                debug!("no focused window, not toggling the overlay");
                return Ok(());
            }
        };

        let preset_key = match self.states.get(window.id) {
            Some(state) => state.preset_key.clone(),
            None => self.last_preset(),
        };

        if let Some(tx) = &self.overlay_tx {
            let _ = tx.send(OverlayEvent::Toggle {
                window: window.id,
                preset_key,
            });
        }
        Ok(())
    }

    /// Forget a closed window: prune its state, stop any animation aimed
    /// at it, and drop a deferred apply that names it.
    pub fn window_closed(&mut self, id: WindowId) {
        self.states.remove(id);
        self.animator.cancel_window(id);
        if !self.animator.is_active() {
            self.next_tick = None;
        }
        if self
            .deferred
            .as_ref()
            .is_some_and(|d| d.request.window == Some(id))
        {
            self.deferred = None;
        }
    }

    //  Timer interface

    /// The next instant at which [`on_timer`](GridTiler::on_timer) wants
    /// to run, or `None` while nothing is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.deferred.as_ref().map(|d| d.due), self.next_tick) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Run whatever is due at `now`: a deferred apply, an animation
    /// frame, or both.
    pub fn on_timer(&mut self, now: Instant) -> Result<(), TilerError> {
        if self.deferred.as_ref().is_some_and(|d| d.due <= now) {
            if let Some(deferred) = self.deferred.take() {
                self.apply_tile(deferred.request, now)?;
            }
        }

        if self.next_tick.is_some_and(|due| due <= now) {
            self.next_tick = None;
            if let Some(frame) = self.animator.tick(TICK) {
                match self.wm.move_resize(frame.window, frame.rect) {
                    Ok(()) => {
                        if !frame.last {
                            self.next_tick = Some(now + TICK);
                        }
                    }
                    Err(e) => {
                        // The window most likely vanished mid-animation.
                        debug!("stopping animation for {}: {}", frame.window, e);
                        self.animator.cancel_window(frame.window);
                    }
                }
            }
        }
        Ok(())
    }

    /// Cancel every scheduled timer and in-flight animation.
    pub fn shutdown(&mut self) {
        self.animator.cancel();
        self.deferred = None;
        self.next_tick = None;
    }

    //  Internals

    /// Record `state` for `window` and place the window accordingly.
    ///
    /// A window that turns out to be gone aborts the apply before any
    /// state is recorded, so the store never tracks dead windows.
    fn apply_state(
        &mut self,
        window: WindowId,
        state: TilingState,
        now: Instant,
    ) -> Result<(), TilerError> {
        let work = match self
            .wm
            .work_area(window)
            .map_err(|e| TilerError::Compositor(e.to_string()))?
        {
            Some(w) => w,
            None => {
                debug!("window {} is gone, dropping tile", window);
                return Ok(());
            }
        };

        let (key, preset) = catalog::get_or_default(&state.preset_key);
        if let Err(e) = self.settings.set_last_active_preset(key) {
            warn!("failed to persist last preset: {}", e);
        }
        let state = TilingState {
            preset_key: key.to_string(),
            ..state
        };
        self.states.set(window, state.clone());

        self.wm
            .unmaximize(window)
            .map_err(|e| TilerError::Compositor(e.to_string()))?;

        let rect = geometry::span_rect(
            work,
            preset,
            state.index,
            state.row_span,
            state.col_span,
            self.settings.padding(),
        );

        let duration = self.settings.animation_duration();
        if self.settings.animate_movement() && !duration.is_zero() {
            let from = match self
                .wm
                .frame_rect(window)
                .map_err(|e| TilerError::Compositor(e.to_string()))?
            {
                Some(f) => f,
                None => {
                    debug!("window {} is gone, dropping tile", window);
                    return Ok(());
                }
            };
            debug!("animate {}: {} -> {}", window, from, rect);
            self.animator.start(window, from, rect, duration);
            self.next_tick = Some(now + TICK);
        } else {
            self.animator.cancel_window(window);
            if !self.animator.is_active() {
                self.next_tick = None;
            }
            debug!("snap {} to {}", window, rect);
            self.wm
                .move_resize(window, rect)
                .map_err(|e| TilerError::Compositor(e.to_string()))?;
        }
        Ok(())
    }
}

//  Tests
