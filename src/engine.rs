//! Interactive crop rectangle state machine.
//!
//! The engine owns a single crop rectangle in viewport coordinates and turns
//! discrete pointer events into moves and aspect-locked resizes:
//!
//! ```text
//!            pointer_down inside rect            pointer_move
//!   ┌──────┐ ───────────────────────► ┌──────────┐ ◄─┐ (translate, clamped
//!   │ Idle │                          │ Dragging │ ──┘  to the viewport)
//!   └──────┘ ◄─────────────────────── └──────────┘
//!      │  ▲      pointer_up / leave
//!      │  │
//!      │  │ pointer_up / leave        pointer_move
//!      ▼  │                          ┌─┐ (rebuild from the fixed
//!   ┌──────────────────┐ ◄───────────┘ │  opposite corner)
//!   │ Resizing(handle) │ ──────────────┘
//!   └──────────────────┘
//!   entered with handle_down
//! ```
//!
//! Resizes always rebuild the rectangle from the fixed corner, the new width
//! and `width / aspect`, so the ratio holds exactly after every update. Updates
//! that would shrink either side below the minimum are rejected and the prior
//! rectangle is kept. Resizes are not clamped to the image or viewport.

use crate::aspect::AspectRatio;
use crate::geometry::{CropRect, DisplayGeometry, Point, Viewport, contains_point};
use serde::{Deserialize, Serialize};

/// Smallest width or height a crop may be resized to, in viewport units.
pub const MIN_CROP_SIZE: f64 = 50.0;

/// One of the four corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handle {
    #[serde(rename = "nw")]
    NorthWest,
    #[serde(rename = "ne")]
    NorthEast,
    #[serde(rename = "sw")]
    SouthWest,
    #[serde(rename = "se")]
    SouthEast,
}

impl Handle {
    pub const ALL: [Handle; 4] = [
        Handle::NorthWest,
        Handle::NorthEast,
        Handle::SouthWest,
        Handle::SouthEast,
    ];

    /// Position of this handle's corner on `rect`.
    pub fn corner(self, rect: &CropRect) -> Point {
        match self {
            Handle::NorthWest => Point::new(rect.x, rect.y),
            Handle::NorthEast => Point::new(rect.right(), rect.y),
            Handle::SouthWest => Point::new(rect.x, rect.bottom()),
            Handle::SouthEast => Point::new(rect.right(), rect.bottom()),
        }
    }

    /// The diagonally opposite handle, which stays fixed while this one moves.
    pub fn opposite(self) -> Handle {
        match self {
            Handle::NorthWest => Handle::SouthEast,
            Handle::NorthEast => Handle::SouthWest,
            Handle::SouthWest => Handle::NorthEast,
            Handle::SouthEast => Handle::NorthWest,
        }
    }
}

/// What the pointer is currently doing to the crop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Moving the whole rect. `anchor` is the pointer offset from the rect origin.
    Dragging { anchor: Point },
    Resizing(Handle),
}

/// Largest rectangle of `aspect` that fits the displayed image, centered on it.
///
/// # Examples
/// ```
/// # use batchcrop::aspect::AspectRatio;
/// # use batchcrop::engine::init_centered_rect;
/// # use batchcrop::geometry::{compute_display_geometry, Dimensions, Viewport};
/// // 1000x1000 shows as 600x600 at x=100; a square crop covers all of it
/// let geo = compute_display_geometry(Dimensions::new(1000, 1000), Viewport::new(800.0, 600.0));
/// let rect = init_centered_rect(&geo, AspectRatio::SQUARE);
/// assert_eq!((rect.width, rect.height), (600.0, 600.0));
/// ```
pub fn init_centered_rect(geometry: &DisplayGeometry, aspect: AspectRatio) -> CropRect {
    let ratio = aspect.value();
    let display_w = geometry.display_width();
    let display_h = geometry.display_height();

    let height = (display_w / ratio).min(display_h);
    let width = height * ratio;

    CropRect {
        x: geometry.offset_x + (display_w - width) / 2.0,
        y: geometry.offset_y + (display_h - height) / 2.0,
        width,
        height,
    }
}

/// Compute the rect produced by dragging `handle` to `pointer`.
///
/// Width comes from the horizontal distance between the pointer and the fixed
/// opposite corner; height follows from the ratio. Returns `None` when either
/// side would fall below `min_size` (including a pointer that crossed over the
/// fixed corner).
pub fn resize_from_handle(
    rect: &CropRect,
    handle: Handle,
    pointer: Point,
    aspect: AspectRatio,
    min_size: f64,
) -> Option<CropRect> {
    let fixed = handle.opposite().corner(rect);

    let width = match handle {
        Handle::NorthEast | Handle::SouthEast => pointer.x - fixed.x,
        Handle::NorthWest | Handle::SouthWest => fixed.x - pointer.x,
    };
    let height = width / aspect.value();

    if width < min_size || height < min_size {
        return None;
    }

    let x = match handle {
        Handle::NorthEast | Handle::SouthEast => fixed.x,
        Handle::NorthWest | Handle::SouthWest => fixed.x - width,
    };
    let y = match handle {
        Handle::SouthWest | Handle::SouthEast => fixed.y,
        Handle::NorthWest | Handle::NorthEast => fixed.y - height,
    };

    Some(CropRect {
        x,
        y,
        width,
        height,
    })
}

/// Owns the crop rectangle currently in play and the gesture acting on it.
#[derive(Debug, Clone)]
pub struct CropEngine {
    viewport: Viewport,
    aspect: AspectRatio,
    min_size: f64,
    rect: Option<CropRect>,
    interaction: Interaction,
}

impl CropEngine {
    pub fn new(viewport: Viewport, aspect: AspectRatio, min_size: f64) -> Self {
        Self {
            viewport,
            aspect,
            min_size,
            rect: None,
            interaction: Interaction::Idle,
        }
    }

    pub fn rect(&self) -> Option<CropRect> {
        self.rect
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    /// Change the locked ratio. The current rect is left alone; the owner
    /// decides when to rebuild it.
    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio) {
        self.aspect = aspect;
    }

    /// Swap in a rect (e.g. when the active image changes). Any gesture in
    /// progress is abandoned.
    pub fn load(&mut self, rect: CropRect) {
        self.rect = Some(rect);
        self.interaction = Interaction::Idle;
    }

    /// Replace the rect with the largest centered one for `geometry`.
    pub fn center_on(&mut self, geometry: &DisplayGeometry) -> CropRect {
        let rect = init_centered_rect(geometry, self.aspect);
        self.load(rect);
        rect
    }

    pub fn clear(&mut self) {
        self.rect = None;
        self.interaction = Interaction::Idle;
    }

    /// Start dragging if the pointer lands inside the rect. Returns whether a
    /// drag started.
    pub fn pointer_down(&mut self, pointer: Point) -> bool {
        let Some(rect) = self.rect else {
            return false;
        };
        if self.interaction != Interaction::Idle || !contains_point(&rect, pointer) {
            return false;
        }
        self.interaction = Interaction::Dragging {
            anchor: Point::new(pointer.x - rect.x, pointer.y - rect.y),
        };
        true
    }

    /// Start resizing from `handle`. Returns whether a resize started.
    pub fn handle_down(&mut self, handle: Handle) -> bool {
        if self.rect.is_none() || self.interaction != Interaction::Idle {
            return false;
        }
        self.interaction = Interaction::Resizing(handle);
        true
    }

    /// Apply a pointer move to the gesture in progress. Returns `true` when the
    /// rect changed; idle moves and rejected resizes return `false`.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let Some(rect) = self.rect else {
            return false;
        };

        let updated = match self.interaction {
            Interaction::Idle => None,
            Interaction::Dragging { anchor } => Some(self.dragged(&rect, pointer, anchor)),
            Interaction::Resizing(handle) => {
                resize_from_handle(&rect, handle, pointer, self.aspect, self.min_size)
            }
        };

        match updated {
            Some(next) if next != rect => {
                self.rect = Some(next);
                true
            }
            _ => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.interaction = Interaction::Idle;
    }

    /// The pointer left the tracked surface; ends the gesture like a release.
    pub fn pointer_leave(&mut self) {
        self.interaction = Interaction::Idle;
    }

    fn dragged(&self, rect: &CropRect, pointer: Point, anchor: Point) -> CropRect {
        let max_x = self.viewport.width - rect.width;
        let max_y = self.viewport.height - rect.height;
        CropRect {
            x: (pointer.x - anchor.x).min(max_x).max(0.0),
            y: (pointer.y - anchor.y).min(max_y).max(0.0),
            ..*rect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Dimensions, compute_display_geometry};
    use crate::test_helpers::{assert_aspect, assert_close, assert_rect_close};

    fn engine_with(rect: CropRect, aspect: AspectRatio) -> CropEngine {
        let mut engine = CropEngine::new(Viewport::default(), aspect, MIN_CROP_SIZE);
        engine.load(rect);
        engine
    }

    /// 300x200 crop at (100, 100), 3:2.
    fn landscape_engine() -> CropEngine {
        engine_with(
            CropRect::new(100.0, 100.0, 300.0, 200.0),
            AspectRatio::THREE_TWO,
        )
    }

    fn resize_to_x(rect: &CropRect, handle: Handle, x: f64) -> Option<CropRect> {
        resize_from_handle(
            rect,
            handle,
            Point::new(x, 0.0),
            AspectRatio::THREE_TWO,
            MIN_CROP_SIZE,
        )
    }

    // =========================================================================
    // init_centered_rect tests
    // =========================================================================

    #[test]
    fn centered_rect_width_limited() {
        // 1600x1200 fills the viewport; 3:2 is wider than 4:3 so width is the limit
        let geo = compute_display_geometry(Dimensions::new(1600, 1200), Viewport::default());
        let rect = init_centered_rect(&geo, AspectRatio::THREE_TWO);
        assert_rect_close(&rect, &CropRect::new(0.0, 100.0 / 3.0, 800.0, 1600.0 / 3.0));
    }

    #[test]
    fn centered_rect_height_limited() {
        // 2000x1000 shows as 800x400 at y=100; 3:2 at height 400 is 600 wide
        let geo = compute_display_geometry(Dimensions::new(2000, 1000), Viewport::default());
        let rect = init_centered_rect(&geo, AspectRatio::THREE_TWO);
        assert_rect_close(&rect, &CropRect::new(100.0, 100.0, 600.0, 400.0));
    }

    #[test]
    fn centered_rect_respects_every_preset() {
        let sizes = [
            (1600, 1200),
            (2000, 1000),
            (1000, 1000),
            (1080, 1920),
            (37, 999),
        ];
        for (w, h) in sizes {
            let geo = compute_display_geometry(Dimensions::new(w, h), Viewport::default());
            for aspect in AspectRatio::PRESETS {
                let rect = init_centered_rect(&geo, aspect);
                assert_aspect(&rect, aspect);
                assert!(rect.x >= geo.offset_x - 1e-9);
                assert!(rect.y >= geo.offset_y - 1e-9);
                assert!(rect.right() <= geo.offset_x + geo.display_width() + 1e-9);
                assert!(rect.bottom() <= geo.offset_y + geo.display_height() + 1e-9);
            }
        }
    }

    // =========================================================================
    // State transitions
    // =========================================================================

    #[test]
    fn pointer_down_inside_starts_drag() {
        let mut engine = landscape_engine();
        assert!(engine.pointer_down(Point::new(150.0, 120.0)));
        assert_eq!(
            engine.interaction(),
            Interaction::Dragging {
                anchor: Point::new(50.0, 20.0)
            }
        );
    }

    #[test]
    fn pointer_down_outside_stays_idle() {
        let mut engine = landscape_engine();
        assert!(!engine.pointer_down(Point::new(50.0, 50.0)));
        assert_eq!(engine.interaction(), Interaction::Idle);
    }

    #[test]
    fn pointer_down_without_rect_is_ignored() {
        let mut engine =
            CropEngine::new(Viewport::default(), AspectRatio::default(), MIN_CROP_SIZE);
        assert!(!engine.pointer_down(Point::new(50.0, 50.0)));
        assert!(!engine.handle_down(Handle::SouthEast));
        assert!(!engine.pointer_move(Point::new(60.0, 60.0)));
    }

    #[test]
    fn handle_down_starts_resize() {
        let mut engine = landscape_engine();
        assert!(engine.handle_down(Handle::NorthEast));
        assert_eq!(engine.interaction(), Interaction::Resizing(Handle::NorthEast));
    }

    #[test]
    fn pointer_up_and_leave_return_to_idle() {
        let mut engine = landscape_engine();
        engine.pointer_down(Point::new(150.0, 150.0));
        engine.pointer_up();
        assert_eq!(engine.interaction(), Interaction::Idle);

        engine.handle_down(Handle::SouthWest);
        engine.pointer_leave();
        assert_eq!(engine.interaction(), Interaction::Idle);
    }

    #[test]
    fn idle_move_changes_nothing() {
        let rect = CropRect::new(100.0, 100.0, 300.0, 200.0);
        let mut engine = engine_with(rect, AspectRatio::THREE_TWO);
        assert!(!engine.pointer_move(Point::new(500.0, 500.0)));
        assert_eq!(engine.rect(), Some(rect));
    }

    #[test]
    fn load_abandons_gesture() {
        let mut engine = landscape_engine();
        engine.handle_down(Handle::SouthEast);
        engine.load(CropRect::new(0.0, 0.0, 150.0, 100.0));
        assert_eq!(engine.interaction(), Interaction::Idle);
    }

    // =========================================================================
    // Dragging
    // =========================================================================

    #[test]
    fn drag_translates_by_anchor() {
        let mut engine = landscape_engine();
        engine.pointer_down(Point::new(150.0, 120.0));
        assert!(engine.pointer_move(Point::new(250.0, 220.0)));
        assert_eq!(engine.rect(), Some(CropRect::new(200.0, 200.0, 300.0, 200.0)));
    }

    #[test]
    fn drag_clamps_to_viewport() {
        let mut engine = landscape_engine();
        engine.pointer_down(Point::new(100.0, 100.0));

        engine.pointer_move(Point::new(-50.0, -80.0));
        assert_eq!(engine.rect(), Some(CropRect::new(0.0, 0.0, 300.0, 200.0)));

        engine.pointer_move(Point::new(5000.0, 5000.0));
        assert_eq!(engine.rect(), Some(CropRect::new(500.0, 400.0, 300.0, 200.0)));
    }

    #[test]
    fn drag_keeps_size() {
        let mut engine = landscape_engine();
        engine.pointer_down(Point::new(200.0, 200.0));
        for step in 0..20 {
            let step = step as f64;
            engine.pointer_move(Point::new(200.0 + step * 37.0, 200.0 - step * 11.0));
            let rect = engine.rect().unwrap();
            assert_eq!((rect.width, rect.height), (300.0, 200.0));
        }
    }

    // =========================================================================
    // Resizing
    // =========================================================================

    #[test]
    fn resize_se_keeps_nw_fixed() {
        let rect = CropRect::new(100.0, 100.0, 300.0, 200.0);
        let out = resize_to_x(&rect, Handle::SouthEast, 550.0).unwrap();
        assert_rect_close(&out, &CropRect::new(100.0, 100.0, 450.0, 300.0));
    }

    #[test]
    fn resize_nw_keeps_se_fixed() {
        let rect = CropRect::new(100.0, 100.0, 300.0, 200.0);
        let out = resize_to_x(&rect, Handle::NorthWest, 250.0).unwrap();
        assert_rect_close(&out, &CropRect::new(250.0, 200.0, 150.0, 100.0));
        assert_close(out.right(), 400.0);
        assert_close(out.bottom(), 300.0);
    }

    #[test]
    fn resize_ne_keeps_sw_fixed() {
        let rect = CropRect::new(100.0, 100.0, 300.0, 200.0);
        let out = resize_to_x(&rect, Handle::NorthEast, 700.0).unwrap();
        assert_rect_close(&out, &CropRect::new(100.0, -100.0, 600.0, 400.0));
        assert_close(out.bottom(), 300.0);
    }

    #[test]
    fn resize_sw_keeps_ne_fixed() {
        let rect = CropRect::new(100.0, 100.0, 300.0, 200.0);
        let out = resize_to_x(&rect, Handle::SouthWest, 40.0).unwrap();
        assert_rect_close(&out, &CropRect::new(40.0, 100.0, 360.0, 240.0));
        assert_close(out.right(), 400.0);
    }

    #[test]
    fn resize_preserves_aspect_for_every_handle_and_preset() {
        let pointers = [
            Point::new(10.0, 10.0),
            Point::new(333.3, 17.0),
            Point::new(512.7, 580.0),
            Point::new(799.0, 1.0),
        ];
        for aspect in AspectRatio::PRESETS {
            for handle in Handle::ALL {
                let start = CropRect::new(200.0, 150.0, 240.0, 240.0 / aspect.value());
                let mut engine = engine_with(start, aspect);
                engine.handle_down(handle);
                for p in pointers {
                    engine.pointer_move(p);
                    assert_aspect(&engine.rect().unwrap(), aspect);
                }
            }
        }
    }

    #[test]
    fn resize_below_minimum_is_rejected() {
        // 90x60 at 3:2; shrinking width to 60 would make height 40 < 50
        let rect = CropRect::new(100.0, 100.0, 90.0, 60.0);
        let mut engine = engine_with(rect, AspectRatio::THREE_TWO);
        engine.handle_down(Handle::SouthEast);

        assert!(!engine.pointer_move(Point::new(160.0, 0.0)));
        assert_eq!(engine.rect(), Some(rect));
    }

    #[test]
    fn resize_further_inward_near_minimum_leaves_rect_unchanged() {
        let rect = CropRect::new(200.0, 200.0, 75.0, 50.0);
        for handle in Handle::ALL {
            let mut engine = engine_with(rect, AspectRatio::THREE_TWO);
            engine.handle_down(handle);
            let inward = match handle {
                Handle::NorthWest | Handle::SouthWest => Point::new(210.0, 210.0),
                Handle::NorthEast | Handle::SouthEast => Point::new(265.0, 210.0),
            };
            assert!(!engine.pointer_move(inward));
            assert_eq!(engine.rect(), Some(rect), "handle {handle:?}");
        }
    }

    #[test]
    fn resize_crossing_fixed_corner_is_rejected() {
        let rect = CropRect::new(100.0, 100.0, 300.0, 200.0);
        assert!(resize_to_x(&rect, Handle::SouthEast, 20.0).is_none());
    }

    #[test]
    fn resize_continues_after_rejected_step() {
        let rect = CropRect::new(100.0, 100.0, 150.0, 100.0);
        let mut engine = engine_with(rect, AspectRatio::THREE_TWO);
        engine.handle_down(Handle::SouthEast);
        assert!(!engine.pointer_move(Point::new(110.0, 0.0)));
        assert!(engine.pointer_move(Point::new(400.0, 0.0)));
        assert_rect_close(
            &engine.rect().unwrap(),
            &CropRect::new(100.0, 100.0, 300.0, 200.0),
        );
    }

    #[test]
    fn set_aspect_ratio_does_not_touch_rect() {
        let rect = CropRect::new(100.0, 100.0, 300.0, 200.0);
        let mut engine = engine_with(rect, AspectRatio::THREE_TWO);
        engine.set_aspect_ratio(AspectRatio::SQUARE);
        assert_eq!(engine.aspect_ratio(), AspectRatio::SQUARE);
        assert_eq!(engine.rect(), Some(rect));
    }

    #[test]
    fn center_on_rebuilds_with_current_ratio() {
        let geo = compute_display_geometry(Dimensions::new(1600, 1200), Viewport::default());
        let mut engine = engine_with(
            CropRect::new(0.0, 0.0, 150.0, 100.0),
            AspectRatio::THREE_TWO,
        );
        engine.set_aspect_ratio(AspectRatio::SQUARE);
        let rect = engine.center_on(&geo);
        assert_rect_close(&rect, &CropRect::new(100.0, 0.0, 600.0, 600.0));
    }
}
