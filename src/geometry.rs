//! Shared geometric primitives for page-unit layout math.
//!
//! All stored geometry is in page units with a top-left origin; display
//! pixels exist only at the edges via [`to_display`]/[`to_page`].

/// Smallest width/height a rectangle may be resized to, in page units.
pub const MIN_RECT_SIZE: f64 = 10.0;

/// Hit radius around a corner anchor, in page units.
pub const ANCHOR_HIT_RADIUS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePoint {
    pub x: f64,
    pub y: f64,
}

impl PagePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    pub const fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomLeft => Self::TopRight,
            Self::BottomRight => Self::TopLeft,
        }
    }
}

impl PageRect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Lowest vertical extent of the rectangle.
    pub fn max_y(&self) -> f64 {
        self.y + self.h
    }

    pub fn contains(&self, point: PagePoint, hit_pad: f64) -> bool {
        point.x >= self.x - hit_pad
            && point.x <= self.x + self.w + hit_pad
            && point.y >= self.y - hit_pad
            && point.y <= self.y + self.h + hit_pad
    }

    pub fn intersects(&self, other: &PageRect) -> bool {
        self.x <= other.x + other.w
            && other.x <= self.x + self.w
            && self.y <= other.y + other.h
            && other.y <= self.y + self.h
    }

    pub fn corner(&self, anchor: Anchor) -> PagePoint {
        match anchor {
            Anchor::TopLeft => PagePoint::new(self.x, self.y),
            Anchor::TopRight => PagePoint::new(self.x + self.w, self.y),
            Anchor::BottomLeft => PagePoint::new(self.x, self.y + self.h),
            Anchor::BottomRight => PagePoint::new(self.x + self.w, self.y + self.h),
        }
    }

    pub fn corner_points(&self) -> [(Anchor, PagePoint); 4] {
        [
            (Anchor::TopLeft, self.corner(Anchor::TopLeft)),
            (Anchor::TopRight, self.corner(Anchor::TopRight)),
            (Anchor::BottomLeft, self.corner(Anchor::BottomLeft)),
            (Anchor::BottomRight, self.corner(Anchor::BottomRight)),
        ]
    }

    /// Which corner anchor, if any, the point lands on.
    pub fn anchor_at(&self, point: PagePoint, radius: f64) -> Option<Anchor> {
        for (anchor, corner) in self.corner_points() {
            if (point.x - corner.x).abs() <= radius && (point.y - corner.y).abs() <= radius {
                return Some(anchor);
            }
        }
        None
    }
}

/// Page units to display pixels.
pub fn to_display(value: f64, scale_factor: f64) -> f64 {
    value * scale_factor
}

/// Display pixels back to page units.
pub fn to_page(value: f64, scale_factor: f64) -> f64 {
    value / scale_factor
}

/// Resize `rect` by dragging `anchor` to `pointer`, keeping the opposite
/// corner fixed. Width and height never fall below [`MIN_RECT_SIZE`]; with
/// `keep_aspect` the height is derived from the rectangle's original aspect
/// ratio instead of the pointer's vertical position.
pub fn resize_from_anchor(
    rect: PageRect,
    anchor: Anchor,
    pointer: PagePoint,
    keep_aspect: bool,
) -> PageRect {
    let pin = rect.corner(anchor.opposite());
    let mut w = (pointer.x - pin.x).abs().max(MIN_RECT_SIZE);
    let mut h = (pointer.y - pin.y).abs().max(MIN_RECT_SIZE);

    if keep_aspect && rect.w > 0.0 {
        let aspect = rect.h / rect.w;
        h = w * aspect;
        if h < MIN_RECT_SIZE {
            h = MIN_RECT_SIZE;
            w = if aspect > 0.0 { h / aspect } else { w };
        }
    }

    let (x, y) = match anchor {
        Anchor::TopLeft => (pin.x - w, pin.y - h),
        Anchor::TopRight => (pin.x, pin.y - h),
        Anchor::BottomLeft => (pin.x - w, pin.y),
        Anchor::BottomRight => (pin.x, pin.y),
    };
    PageRect::new(x, y, w, h)
}

/// Free-form guard: keep the top-left corner out of negative space. The
/// bottom edge is deliberately unclamped; overflow past the page is reported
/// through page-end markers, not blocked.
pub fn clamp_top_left_non_negative(rect: PageRect) -> PageRect {
    PageRect::new(rect.x.max(0.0), rect.y.max(0.0), rect.w, rect.h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_transforms_are_inverses() {
        for value in [0.0, 1.0, 33.7, 595.0, 842.0] {
            for scale in [0.1, 0.5, 1.0, 1.6180339, 3.0] {
                let back = to_page(to_display(value, scale), scale);
                assert!((back - value).abs() < 1e-9, "value={value} scale={scale}");
            }
        }
    }

    #[test]
    fn bottom_right_resize_keeps_top_left_fixed() {
        let rect = PageRect::new(10.0, 10.0, 100.0, 100.0);
        let resized = resize_from_anchor(
            rect,
            Anchor::BottomRight,
            PagePoint::new(130.0, 120.0),
            false,
        );
        assert_eq!(resized, PageRect::new(10.0, 10.0, 120.0, 110.0));
    }

    #[test]
    fn top_left_resize_keeps_bottom_right_fixed() {
        let rect = PageRect::new(10.0, 10.0, 100.0, 100.0);
        let resized =
            resize_from_anchor(rect, Anchor::TopLeft, PagePoint::new(40.0, 30.0), false);
        let fixed = resized.corner(Anchor::BottomRight);
        assert_eq!((fixed.x, fixed.y), (110.0, 110.0));
        assert_eq!(resized, PageRect::new(40.0, 30.0, 70.0, 80.0));
    }

    #[test]
    fn resize_clamps_to_minimum_size() {
        let rect = PageRect::new(0.0, 0.0, 50.0, 50.0);
        let resized =
            resize_from_anchor(rect, Anchor::BottomRight, PagePoint::new(2.0, 1.0), false);
        assert_eq!(resized.w, MIN_RECT_SIZE);
        assert_eq!(resized.h, MIN_RECT_SIZE);
        let fixed = resized.corner(Anchor::TopLeft);
        assert_eq!((fixed.x, fixed.y), (0.0, 0.0));
    }

    #[test]
    fn aspect_lock_derives_height_from_width() {
        let rect = PageRect::new(0.0, 0.0, 200.0, 100.0);
        let resized = resize_from_anchor(
            rect,
            Anchor::BottomRight,
            PagePoint::new(100.0, 300.0),
            true,
        );
        assert_eq!(resized.w, 100.0);
        assert_eq!(resized.h, 50.0);
    }

    #[test]
    fn anchor_at_hits_corners_within_radius() {
        let rect = PageRect::new(10.0, 10.0, 80.0, 60.0);
        assert_eq!(
            rect.anchor_at(PagePoint::new(12.0, 9.0), ANCHOR_HIT_RADIUS),
            Some(Anchor::TopLeft)
        );
        assert_eq!(
            rect.anchor_at(PagePoint::new(90.0, 70.0), ANCHOR_HIT_RADIUS),
            Some(Anchor::BottomRight)
        );
        assert_eq!(
            rect.anchor_at(PagePoint::new(50.0, 40.0), ANCHOR_HIT_RADIUS),
            None
        );
    }

    #[test]
    fn clamp_keeps_size_and_floors_position() {
        let rect = clamp_top_left_non_negative(PageRect::new(-5.0, -2.0, 40.0, 40.0));
        assert_eq!(rect, PageRect::new(0.0, 0.0, 40.0, 40.0));
    }

    #[test]
    fn contains_honors_hit_padding() {
        let rect = PageRect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(PagePoint::new(8.0, 8.0), 4.0));
        assert!(!rect.contains(PagePoint::new(8.0, 8.0), 0.0));
    }
}
