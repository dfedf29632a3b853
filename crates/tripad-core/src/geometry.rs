#![forbid(unsafe_code)]

//! One-dimensional geometry for vertical scrolling.
//!
//! Offsets and extents are `f32` in the viewport's content coordinate space
//! (logical pixels on the device). Only the vertical axis matters for linear
//! traversal, so an item is described by where it starts and how tall it is.

/// Vertical extent of an item in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    /// Leading (top) edge.
    pub start: f32,
    /// Height. Negative values are treated as zero.
    pub len: f32,
}

impl Extent {
    #[must_use]
    pub const fn new(start: f32, len: f32) -> Self {
        Self { start, len }
    }

    /// Trailing (bottom) edge.
    #[inline]
    #[must_use]
    pub fn end(&self) -> f32 {
        self.start + self.len.max(0.0)
    }

    /// Whether the whole extent lies within `[offset, offset + window]`.
    #[must_use]
    pub fn is_within(&self, offset: f32, window: f32) -> bool {
        self.start >= offset && self.end() <= offset + window
    }
}

/// Largest legal scroll offset: `max(0, content - viewport)`.
#[inline]
#[must_use]
pub fn max_offset(content_extent: f32, viewport_extent: f32) -> f32 {
    (content_extent - viewport_extent).max(0.0)
}

/// Clamp `offset` into `[0, max_offset(content, viewport)]`.
///
/// Non-finite offsets collapse to `0`.
#[must_use]
pub fn clamp_offset(offset: f32, content_extent: f32, viewport_extent: f32) -> f32 {
    if !offset.is_finite() {
        return 0.0;
    }
    offset.clamp(0.0, max_offset(content_extent, viewport_extent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_end() {
        assert_eq!(Extent::new(10.0, 40.0).end(), 50.0);
        assert_eq!(Extent::new(10.0, -5.0).end(), 10.0);
    }

    #[test]
    fn within_window() {
        let e = Extent::new(100.0, 50.0);
        assert!(e.is_within(100.0, 50.0));
        assert!(e.is_within(80.0, 100.0));
        assert!(!e.is_within(101.0, 100.0));
        assert!(!e.is_within(0.0, 149.0));
    }

    #[test]
    fn max_offset_never_negative() {
        assert_eq!(max_offset(1000.0, 400.0), 600.0);
        assert_eq!(max_offset(300.0, 400.0), 0.0);
    }

    #[test]
    fn clamp_offset_bounds() {
        assert_eq!(clamp_offset(-20.0, 1000.0, 400.0), 0.0);
        assert_eq!(clamp_offset(700.0, 1000.0, 400.0), 600.0);
        assert_eq!(clamp_offset(250.0, 1000.0, 400.0), 250.0);
        assert_eq!(clamp_offset(f32::NAN, 1000.0, 400.0), 0.0);
    }
}
