//! Freehand stroke rasterisation.
//!
//! Strokes are rendered incrementally: each pointer move strokes one line
//! segment from the previous point onto the overlay. Only the resulting pixels
//! survive; no vector data is kept once the stroke ends.

use crate::color::InkColor;
use crate::tools::ToolKind;
use kurbo::Point;
use tiny_skia::{BlendMode, Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Tool, colour and width captured when a stroke begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub tool: ToolKind,
    pub color: InkColor,
    pub width: f32,
}

impl StrokeStyle {
    fn paint(&self) -> Paint<'static> {
        let mut paint = Paint {
            anti_alias: true,
            ..Default::default()
        };
        match self.tool {
            ToolKind::Eraser => {
                // Cut a hole in the overlay; only coverage matters
                paint.set_color(Color::BLACK);
                paint.blend_mode = BlendMode::DestinationOut;
            }
            _ => {
                let opaque = InkColor { a: 255, ..self.color };
                paint.set_color(opaque.into());
                paint.blend_mode = BlendMode::SourceOver;
            }
        }
        paint
    }

    fn stroke(&self) -> Stroke {
        Stroke {
            width: self.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        }
    }
}

/// Stroke one line segment from `from` to `to` onto `pixmap`.
///
/// Returns `false` when nothing was drawn: the tool does not draw, or the
/// segment has zero length.
pub fn render_segment(pixmap: &mut Pixmap, from: Point, to: Point, style: &StrokeStyle) -> bool {
    if !style.tool.draws() {
        return false;
    }
    if (to - from).hypot2() < f64::EPSILON {
        return false;
    }

    let mut builder = PathBuilder::new();
    builder.move_to(from.x as f32, from.y as f32);
    builder.line_to(to.x as f32, to.y as f32);
    let Some(path) = builder.finish() else {
        return false;
    };

    pixmap.stroke_path(&path, &style.paint(), &style.stroke(), Transform::identity(), None);
    true
}

/// A stroke in progress between pointer-down and pointer-up.
#[derive(Debug, Clone)]
pub struct ActiveStroke {
    style: StrokeStyle,
    last: Point,
    segments: usize,
}

impl ActiveStroke {
    /// Start a stroke at `start` (native canvas coordinates).
    pub fn begin(style: StrokeStyle, start: Point) -> Self {
        log::debug!("Stroke started with {} at ({:.1}, {:.1})", style.tool.name(), start.x, start.y);
        Self {
            style,
            last: start,
            segments: 0,
        }
    }

    /// Draw a segment from the last recorded point to `point`.
    pub fn extend_to(&mut self, pixmap: &mut Pixmap, point: Point) -> bool {
        let drawn = render_segment(pixmap, self.last, point, &self.style);
        self.last = point;
        if drawn {
            self.segments += 1;
        }
        drawn
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn last_point(&self) -> Point {
        self.last
    }

    /// Number of segments rendered so far.
    pub fn segments(&self) -> usize {
        self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink(width: f32) -> StrokeStyle {
        StrokeStyle {
            tool: ToolKind::Ink,
            color: InkColor::rgb(0x8B, 0x45, 0x13),
            width,
        }
    }

    #[test]
    fn test_ink_segment_paints_opaque_color() {
        let mut pixmap = Pixmap::new(64, 64).unwrap();
        assert!(render_segment(&mut pixmap, Point::new(10.0, 20.0), Point::new(50.0, 20.0), &ink(10.0)));

        let pixel = pixmap.pixel(30, 20).unwrap();
        assert_eq!(pixel.alpha(), 255);
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (0x8B, 0x45, 0x13));

        // Well outside the brush radius
        assert_eq!(pixmap.pixel(30, 40).unwrap().alpha(), 0);
    }

    #[test]
    fn test_round_cap_extends_past_endpoint() {
        let mut pixmap = Pixmap::new(64, 64).unwrap();
        render_segment(&mut pixmap, Point::new(10.0, 20.0), Point::new(50.0, 20.0), &ink(10.0));
        // Inside the round cap beyond the end point
        assert!(pixmap.pixel(52, 20).unwrap().alpha() > 0);
    }

    #[test]
    fn test_eraser_removes_ink() {
        let mut pixmap = Pixmap::new(64, 64).unwrap();
        render_segment(&mut pixmap, Point::new(10.0, 20.0), Point::new(50.0, 20.0), &ink(10.0));

        let eraser = StrokeStyle {
            tool: ToolKind::Eraser,
            color: InkColor::black(),
            width: 20.0,
        };
        assert!(render_segment(&mut pixmap, Point::new(5.0, 20.0), Point::new(55.0, 20.0), &eraser));
        assert_eq!(pixmap.pixel(30, 20).unwrap().alpha(), 0);
    }

    #[test]
    fn test_zero_length_segment_skipped() {
        let mut pixmap = Pixmap::new(16, 16).unwrap();
        let p = Point::new(8.0, 8.0);
        assert!(!render_segment(&mut pixmap, p, p, &ink(5.0)));
        assert!(pixmap.pixels().iter().all(|px| px.alpha() == 0));
    }

    #[test]
    fn test_select_tool_never_draws() {
        let mut pixmap = Pixmap::new(16, 16).unwrap();
        let style = StrokeStyle {
            tool: ToolKind::Select,
            color: InkColor::black(),
            width: 5.0,
        };
        assert!(!render_segment(&mut pixmap, Point::new(0.0, 0.0), Point::new(10.0, 10.0), &style));
    }

    #[test]
    fn test_active_stroke_tracks_segments() {
        let mut pixmap = Pixmap::new(32, 32).unwrap();
        let mut stroke = ActiveStroke::begin(ink(2.0), Point::new(1.0, 1.0));
        assert_eq!(stroke.segments(), 0);

        assert!(stroke.extend_to(&mut pixmap, Point::new(10.0, 10.0)));
        assert!(!stroke.extend_to(&mut pixmap, Point::new(10.0, 10.0)));
        assert!(stroke.extend_to(&mut pixmap, Point::new(20.0, 10.0)));
        assert_eq!(stroke.segments(), 2);
        assert_eq!(stroke.last_point(), Point::new(20.0, 10.0));
    }
}
