//! Preview size computation
//!
//! Picks a single integer divisor so both axes shrink by the same factor and
//! the aspect ratio is preserved.

/// Default bound for the long axis of a preview
pub const DEFAULT_LONG_EDGE: u32 = 800;
/// Default bound for the short axis of a preview
pub const DEFAULT_SHORT_EDGE: u32 = 600;

/// Axis bounds the divisor is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewBounds {
    pub long_edge: u32,
    pub short_edge: u32,
}

impl Default for PreviewBounds {
    fn default() -> Self {
        Self {
            long_edge: DEFAULT_LONG_EDGE,
            short_edge: DEFAULT_SHORT_EDGE,
        }
    }
}

/// Integer divisor applied to both axes of a `width` x `height` image
///
/// The divisor is the larger of `long / long_edge` and `short / short_edge`,
/// never less than 1, so images already inside the bounds keep their size.
pub fn divisor(width: u32, height: u32, bounds: PreviewBounds) -> u32 {
    let long = width.max(height);
    let short = width.min(height);

    let by_long = long / bounds.long_edge.max(1);
    let by_short = short / bounds.short_edge.max(1);

    by_long.max(by_short).max(1)
}

/// Target preview dimensions for a `width` x `height` image
///
/// # Examples
/// ```ignore
/// let bounds = PreviewBounds::default();
/// assert_eq!(preview_size(1600, 1200, bounds), (800, 600));
/// ```
pub fn preview_size(width: u32, height: u32, bounds: PreviewBounds) -> (u32, u32) {
    let d = divisor(width, height, bounds);
    (width / d, height / d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_halved() {
        assert_eq!(preview_size(1600, 1200, PreviewBounds::default()), (800, 600));
    }

    #[test]
    fn test_portrait_uses_long_axis() {
        assert_eq!(preview_size(1200, 1600, PreviewBounds::default()), (600, 800));
    }

    #[test]
    fn test_short_axis_can_dominate() {
        // long 2400/800 = 3, short 2400/600 = 4
        assert_eq!(divisor(2400, 2400, PreviewBounds::default()), 4);
        assert_eq!(preview_size(2400, 2400, PreviewBounds::default()), (600, 600));
    }

    #[test]
    fn test_panorama() {
        // long 3000/800 = 3, short 1000/600 = 1
        assert_eq!(preview_size(3000, 1000, PreviewBounds::default()), (1000, 333));
    }

    #[test]
    fn test_large_camera_image() {
        assert_eq!(divisor(6000, 4000, PreviewBounds::default()), 7);
        assert_eq!(preview_size(6000, 4000, PreviewBounds::default()), (857, 571));
    }

    #[test]
    fn test_small_image_keeps_size() {
        assert_eq!(divisor(640, 480, PreviewBounds::default()), 1);
        assert_eq!(preview_size(640, 480, PreviewBounds::default()), (640, 480));
        assert_eq!(preview_size(1, 1, PreviewBounds::default()), (1, 1));
    }

    #[test]
    fn test_zero_bounds_do_not_panic() {
        let bounds = PreviewBounds {
            long_edge: 0,
            short_edge: 0,
        };
        assert_eq!(divisor(100, 50, bounds), 100);
    }

    #[test]
    fn test_custom_bounds() {
        let bounds = PreviewBounds {
            long_edge: 400,
            short_edge: 300,
        };
        assert_eq!(preview_size(1600, 1200, bounds), (400, 300));
    }
}
