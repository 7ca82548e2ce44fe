//! Mapping between on-screen display coordinates and native canvas pixels.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// How the canvas's pixel buffer is laid out on screen.
///
/// The canvas may be displayed at a different size than its pixel buffer,
/// so pointer positions must be rescaled by `native / displayed` on each
/// axis before they are used as stroke points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMapping {
    /// Native pixel size of the canvas buffers.
    pub native: Size,
    /// Rectangle the canvas occupies on screen, in display coordinates.
    pub displayed: Rect,
}

impl DisplayMapping {
    /// Mapping for a canvas displayed at its native size at the origin.
    pub fn identity(native: Size) -> Self {
        Self {
            native,
            displayed: Rect::from_origin_size(Point::ORIGIN, native),
        }
    }

    pub fn new(native: Size, displayed: Rect) -> Self {
        Self { native, displayed }
    }

    /// Update the on-screen rectangle after a resize or scroll.
    pub fn set_displayed(&mut self, displayed: Rect) {
        self.displayed = displayed;
    }

    /// Per-axis scale from display to native coordinates.
    ///
    /// A degenerate displayed rectangle maps with scale 1 on that axis.
    pub fn scale(&self) -> Vec2 {
        let axis = |native: f64, displayed: f64| {
            if displayed.abs() < f64::EPSILON {
                1.0
            } else {
                native / displayed
            }
        };
        Vec2::new(
            axis(self.native.width, self.displayed.width()),
            axis(self.native.height, self.displayed.height()),
        )
    }

    /// Display-to-native transform.
    pub fn transform(&self) -> Affine {
        let scale = self.scale();
        Affine::scale_non_uniform(scale.x, scale.y) * Affine::translate(-self.displayed.origin().to_vec2())
    }

    /// Convert a display-space pointer position to native canvas coordinates.
    pub fn to_canvas(&self, display_point: Point) -> Point {
        self.transform() * display_point
    }

    /// Convert a native canvas position back to display coordinates.
    pub fn to_display(&self, canvas_point: Point) -> Point {
        self.transform().inverse() * canvas_point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping() {
        let mapping = DisplayMapping::identity(Size::new(800.0, 500.0));
        let p = Point::new(123.0, 45.0);
        assert_eq!(mapping.to_canvas(p), p);
    }

    #[test]
    fn test_half_size_display_doubles_coordinates() {
        let mapping = DisplayMapping::new(
            Size::new(800.0, 500.0),
            Rect::new(0.0, 0.0, 400.0, 250.0),
        );
        let canvas = mapping.to_canvas(Point::new(30.0, 70.0));
        assert!((canvas.x - 60.0).abs() < 1e-10);
        assert!((canvas.y - 140.0).abs() < 1e-10);
    }

    #[test]
    fn test_displayed_origin_is_subtracted() {
        let mapping = DisplayMapping::new(
            Size::new(800.0, 500.0),
            Rect::new(100.0, 50.0, 500.0, 300.0),
        );
        let canvas = mapping.to_canvas(Point::new(100.0, 50.0));
        assert!(canvas.x.abs() < 1e-10);
        assert!(canvas.y.abs() < 1e-10);

        let canvas = mapping.to_canvas(Point::new(300.0, 175.0));
        assert!((canvas.x - 400.0).abs() < 1e-10);
        assert!((canvas.y - 250.0).abs() < 1e-10);
    }

    #[test]
    fn test_non_uniform_scale() {
        let mapping = DisplayMapping::new(
            Size::new(800.0, 500.0),
            Rect::new(0.0, 0.0, 1600.0, 500.0),
        );
        let canvas = mapping.to_canvas(Point::new(400.0, 100.0));
        assert!((canvas.x - 200.0).abs() < 1e-10);
        assert!((canvas.y - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mapping = DisplayMapping::new(
            Size::new(800.0, 500.0),
            Rect::new(12.0, 34.0, 612.0, 409.0),
        );
        let original = Point::new(123.0, 256.0);
        let back = mapping.to_display(mapping.to_canvas(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_degenerate_display_rect() {
        let mut mapping = DisplayMapping::identity(Size::new(800.0, 500.0));
        mapping.set_displayed(Rect::new(0.0, 0.0, 0.0, 0.0));
        let scale = mapping.scale();
        assert!((scale.x - 1.0).abs() < f64::EPSILON);
        assert!((scale.y - 1.0).abs() < f64::EPSILON);
    }
}
