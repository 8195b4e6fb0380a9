//! Free-form mode: one scrollable canvas where every rectangle's position
//! and size is user-authored through pointer gestures. Selection, drag,
//! anchor resize and the derived `max_y` extent live here; the underlying
//! rectangles stay on the shared [`ImageBoard`].

use thiserror::Error;

use crate::board::{BoardError, ImageBoard};
use crate::config::{resolve_preset, ConfigError, LayoutConfig};
use crate::geometry::{
    clamp_top_left_non_negative, resize_from_anchor, to_display, to_page, Anchor, PagePoint,
    PageRect, ANCHOR_HIT_RADIUS,
};
use crate::state::{PointerEvent, PointerState, PointerStateMachine, StateError};

pub type FreeFormResult<T> = std::result::Result<T, FreeFormError>;

#[derive(Debug, Error)]
pub enum FreeFormError {
    /// Pointer input arrived while the canvas was not started; the host
    /// forgot its `start()`/`stop()` bracketing.
    #[error("free-form canvas is not started")]
    NotStarted,

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Payload of the gesture in flight. The state machine guards which events
/// are legal; this carries the data those events need.
#[derive(Debug, Clone, Copy)]
enum GestureSession {
    Drag {
        id: u64,
        /// Pointer offset from the rectangle's top-left at press time.
        grab_offset: PagePoint,
    },
    Resize {
        id: u64,
        anchor: Anchor,
        /// Geometry at press time; each move resizes from this, not from
        /// the intermediate result.
        original: PageRect,
    },
}

#[derive(Debug)]
pub struct FreeFormLayout {
    ids: Vec<u64>,
    selected_id: Option<u64>,
    machine: PointerStateMachine,
    session: Option<GestureSession>,
    max_y: f64,
    active: bool,
    /// Keep top-left corners out of negative space while dragging.
    floor_y0: bool,
    /// Preserve the original aspect ratio during anchor resize.
    aspect_lock: bool,
}

impl FreeFormLayout {
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            selected_id: None,
            machine: PointerStateMachine::new(),
            session: None,
            max_y: 0.0,
            active: false,
            floor_y0: true,
            aspect_lock: false,
        }
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.selected_id
    }

    pub fn state(&self) -> PointerState {
        self.machine.state()
    }

    /// Lowest vertical extent across the canvas, in page units. Kept in
    /// sync after every mutation, never recomputed lazily.
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn set_floor_y0(&mut self, floor: bool) {
        self.floor_y0 = floor;
    }

    pub fn set_aspect_lock(&mut self, lock: bool) {
        self.aspect_lock = lock;
    }

    /// Binds the canvas for pointer input. Idempotent.
    pub fn start(&mut self) {
        self.active = true;
        tracing::debug!("free-form canvas started");
    }

    /// Releases the canvas. Any gesture in flight is aborted and the
    /// machine returns to idle; safe to call on every exit path.
    pub fn stop(&mut self) {
        self.machine.reset();
        self.session = None;
        self.active = false;
        tracing::debug!("free-form canvas stopped");
    }

    /// Recreates the view wholesale from the board, keeping the selection
    /// when its rectangle survived.
    pub fn sync_from_board(&mut self, board: &ImageBoard) {
        self.ids = board.ids().to_vec();
        if let Some(selected) = self.selected_id {
            if !board.contains(selected) {
                self.selected_id = None;
            }
        }
        self.recompute_max_y(board);
    }

    /// Appends a late decode arrival without disturbing placed rectangles.
    pub fn append_image(&mut self, id: u64, board: &ImageBoard) -> FreeFormResult<()> {
        board.get(id)?;
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
        self.recompute_max_y(board);
        Ok(())
    }

    /// Drops a rectangle from the view, clearing the selection if it was
    /// the one selected.
    pub fn detach_image(&mut self, id: u64, board: &ImageBoard) {
        self.ids.retain(|entry| *entry != id);
        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
        self.recompute_max_y(board);
    }

    fn recompute_max_y(&mut self, board: &ImageBoard) {
        self.max_y = self
            .ids
            .iter()
            .filter_map(|id| board.get(*id).ok())
            .map(|image| image.rect().max_y())
            .fold(0.0, f64::max);
    }

    fn ensure_active(&self) -> FreeFormResult<()> {
        if self.active {
            Ok(())
        } else {
            Err(FreeFormError::NotStarted)
        }
    }

    fn page_point(config: &LayoutConfig, display_x: f64, display_y: f64) -> PagePoint {
        PagePoint::new(
            to_page(display_x, config.scale_factor),
            to_page(display_y, config.scale_factor),
        )
    }

    /// Pointer pressed at display coordinates. Anchor of the selected
    /// rectangle wins over bodies; bodies are tested topmost-first; empty
    /// canvas clears the selection.
    pub fn pointer_down(
        &mut self,
        board: &ImageBoard,
        config: &LayoutConfig,
        display_x: f64,
        display_y: f64,
    ) -> FreeFormResult<()> {
        self.ensure_active()?;
        let point = Self::page_point(config, display_x, display_y);

        if let Some(selected) = self.selected_id {
            if let Ok(image) = board.get(selected) {
                let rect = image.rect();
                if let Some(anchor) = rect.anchor_at(point, ANCHOR_HIT_RADIUS) {
                    self.machine.transition(PointerEvent::PressAnchor)?;
                    self.session = Some(GestureSession::Resize {
                        id: selected,
                        anchor,
                        original: rect,
                    });
                    tracing::debug!(id = selected, ?anchor, "resize gesture started");
                    return Ok(());
                }
            }
        }

        for id in self.ids.iter().rev().copied() {
            let Ok(image) = board.get(id) else { continue };
            let rect = image.rect();
            if rect.contains(point, 0.0) {
                self.machine.transition(PointerEvent::PressBody)?;
                self.selected_id = Some(id);
                self.session = Some(GestureSession::Drag {
                    id,
                    grab_offset: PagePoint::new(point.x - rect.x, point.y - rect.y),
                });
                tracing::debug!(id, "drag gesture started");
                return Ok(());
            }
        }

        // Empty canvas: selection cleared, no gesture begins.
        self.selected_id = None;
        Ok(())
    }

    /// Pointer moved. Ignored while idle; otherwise updates the dragged
    /// position or resized geometry and keeps `max_y` current.
    pub fn pointer_move(
        &mut self,
        board: &mut ImageBoard,
        config: &LayoutConfig,
        display_x: f64,
        display_y: f64,
    ) -> FreeFormResult<()> {
        self.ensure_active()?;
        if self.machine.state() == PointerState::Idle {
            return Ok(());
        }

        let point = Self::page_point(config, display_x, display_y);
        self.machine.transition(PointerEvent::Move)?;

        match self.session {
            Some(GestureSession::Drag { id, grab_offset }) => {
                let floor = self.floor_y0;
                let image = board.get_mut(id)?;
                let mut rect = image.rect();
                rect.x = point.x - grab_offset.x;
                rect.y = point.y - grab_offset.y;
                if floor {
                    rect = clamp_top_left_non_negative(rect);
                }
                image.set_rect(rect);
            }
            Some(GestureSession::Resize {
                id,
                anchor,
                original,
            }) => {
                let resized = resize_from_anchor(original, anchor, point, self.aspect_lock);
                let resized = if self.floor_y0 {
                    clamp_top_left_non_negative(resized)
                } else {
                    resized
                };
                board.get_mut(id)?.set_rect(resized);
            }
            None => {
                // A non-idle machine without a session is an invariant
                // breach; fail loudly in development builds.
                debug_assert!(false, "pointer gesture active without a session");
                tracing::warn!(state = ?self.machine.state(), "gesture active without session");
            }
        }

        self.recompute_max_y(board);
        Ok(())
    }

    /// Pointer released: commits the gesture and returns to idle. A release
    /// with no gesture in flight (e.g. after an empty-canvas click) is a
    /// no-op.
    pub fn pointer_up(&mut self, board: &ImageBoard) -> FreeFormResult<()> {
        self.finish_gesture(board, PointerEvent::Release)
    }

    /// Pointer left the canvas mid-gesture; commits like a release.
    pub fn pointer_leave(&mut self, board: &ImageBoard) -> FreeFormResult<()> {
        self.finish_gesture(board, PointerEvent::Leave)
    }

    fn finish_gesture(&mut self, board: &ImageBoard, event: PointerEvent) -> FreeFormResult<()> {
        self.ensure_active()?;
        if self.machine.state() == PointerState::Idle {
            return Ok(());
        }
        self.machine.transition(event)?;
        self.session = None;
        self.recompute_max_y(board);
        Ok(())
    }

    /// Direct (non-pointer) mutation: snap a rectangle to a named preset
    /// size, preserving its top-left corner.
    pub fn set_image_to_preset_size(
        &mut self,
        board: &mut ImageBoard,
        id: u64,
        preset: &str,
    ) -> FreeFormResult<()> {
        let size = resolve_preset(preset)?;
        let image = board.get_mut(id)?;
        image.w = size.w;
        image.h = size.h;
        self.recompute_max_y(board);
        tracing::debug!(id, preset, "image snapped to preset size");
        Ok(())
    }

    /// Ids whose rectangles intersect `region`, topmost first. Backs a
    /// marquee-style lookup over the canvas.
    pub fn ids_intersecting(&self, board: &ImageBoard, region: &PageRect) -> Vec<u64> {
        self.ids
            .iter()
            .rev()
            .copied()
            .filter(|id| {
                board
                    .get(*id)
                    .map(|image| image.rect().intersects(region))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Whether the canvas extends past a single page height.
    pub fn overflows(&self, config: &LayoutConfig) -> bool {
        self.max_y > config.height
    }

    /// Display-pixel offsets of every page boundary the canvas content
    /// crosses, for rendering "page end" indicators. Derived, never stored.
    pub fn page_end_markers(&self, config: &LayoutConfig) -> Vec<f64> {
        let mut markers = Vec::new();
        if config.height <= 0.0 {
            return markers;
        }
        let mut boundary = config.height;
        while boundary < self.max_y {
            markers.push(to_display(boundary, config.scale_factor));
            boundary += config.height;
        }
        markers
    }
}

impl Default for FreeFormLayout {
    fn default() -> Self {
        Self::new()
    }
}
