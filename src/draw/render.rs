//! Cairo-based stroke rasterization.
//!
//! Strokes never paint color: they punch transparent holes into the current
//! target with `Operator::Clear`, letting whatever layer sits underneath show
//! through.

use crate::input::Stroke;
use crate::util::{Point, ScaleRatio};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Shape drawn at the two open ends of each stroke segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    /// Ends exactly at the segment end points
    Butt,
    /// Half-disc around each end point (default, gives a continuous brush trail)
    #[default]
    Round,
    /// Half-square around each end point
    Square,
}

impl LineCap {
    pub fn to_cairo(self) -> cairo::LineCap {
        match self {
            Self::Butt => cairo::LineCap::Butt,
            Self::Round => cairo::LineCap::Round,
            Self::Square => cairo::LineCap::Square,
        }
    }
}

/// Line width and cap applied to every stroke in a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Width in the coordinate space the stroke is drawn in
    pub width: f64,
    pub cap: LineCap,
}

impl StrokeStyle {
    pub fn new(width: f64, cap: LineCap) -> Self {
        Self { width, cap }
    }
}

/// Punches one segment out of the current target.
pub fn render_erase_segment(
    ctx: &cairo::Context,
    from: Point,
    to: Point,
    style: StrokeStyle,
) -> Result<(), cairo::Error> {
    if !(style.width.is_finite() && style.width > 0.0) {
        return Ok(());
    }
    ctx.save()?;
    ctx.set_operator(cairo::Operator::Clear);
    ctx.set_line_width(style.width);
    ctx.set_line_cap(style.cap.to_cairo());
    ctx.set_line_join(cairo::LineJoin::Round);
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    ctx.stroke()?;
    ctx.restore()
}

/// Punches every stroke in arrival order.
///
/// With `ratio`, stroke points are mapped from display space into the target's
/// point space and the width is multiplied by [`ScaleRatio::line_width_factor`].
pub fn render_erase_strokes(
    ctx: &cairo::Context,
    strokes: &[Stroke],
    style: StrokeStyle,
    ratio: Option<ScaleRatio>,
) -> Result<(), cairo::Error> {
    let factor = ratio.map_or(1.0, |r| r.line_width_factor());
    let style = StrokeStyle::new(style.width * factor, style.cap);
    let map = |p: Point| ratio.map_or(p, |r| r.apply(p));

    for stroke in strokes {
        render_erase_segment(ctx, map(stroke.from), map(stroke.to), style)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Image;
    use crate::util::Size;

    fn opaque_canvas(size: i32, draw: impl FnOnce(&cairo::Context) -> Result<(), cairo::Error>) -> Image {
        Image::render((size, size), 1.0, |ctx| {
            ctx.set_source_rgb(1.0, 1.0, 1.0);
            ctx.paint()?;
            draw(ctx)
        })
        .unwrap()
    }

    #[test]
    fn erase_segment_clears_pixels_under_stroke() {
        let image = opaque_canvas(20, |ctx| {
            render_erase_segment(
                ctx,
                Point::new(2.0, 10.0),
                Point::new(18.0, 10.0),
                StrokeStyle::new(4.0, LineCap::Butt),
            )
        });
        assert_eq!(image.pixel(10, 10).unwrap()[3], 0);
        assert_eq!(image.pixel(10, 2), Some([255, 255, 255, 255]));
        // Butt caps stop at the end point.
        assert_eq!(image.pixel(0, 10), Some([255, 255, 255, 255]));
    }

    #[test]
    fn round_cap_covers_zero_length_segment() {
        let dot = Point::new(10.0, 10.0);
        let round = opaque_canvas(20, |ctx| {
            render_erase_segment(ctx, dot, dot, StrokeStyle::new(6.0, LineCap::Round))
        });
        assert_eq!(round.pixel(10, 10).unwrap()[3], 0);

        let butt = opaque_canvas(20, |ctx| {
            render_erase_segment(ctx, dot, dot, StrokeStyle::new(6.0, LineCap::Butt))
        });
        assert_eq!(butt.pixel(10, 10).unwrap()[3], 255);
    }

    #[test]
    fn zero_width_does_nothing() {
        let image = opaque_canvas(10, |ctx| {
            render_erase_segment(
                ctx,
                Point::new(0.0, 5.0),
                Point::new(10.0, 5.0),
                StrokeStyle::new(0.0, LineCap::Round),
            )
        });
        assert_eq!(image.pixel(5, 5).unwrap()[3], 255);
    }

    #[test]
    fn strokes_rescale_into_target_space() {
        let ratio = ScaleRatio::between(Size::new(100.0, 100.0), Size::new(200.0, 200.0)).unwrap();
        let strokes = [Stroke::new(Point::new(10.0, 10.0), Point::new(10.0, 10.0))];
        let image = Image::render((200, 200), 1.0, |ctx| {
            ctx.set_source_rgb(1.0, 1.0, 1.0);
            ctx.paint()?;
            render_erase_strokes(ctx, &strokes, StrokeStyle::new(2.0, LineCap::Round), Some(ratio))
        })
        .unwrap();
        assert_eq!(image.pixel(20, 20).unwrap()[3], 0);
        assert_eq!(image.pixel(10, 10).unwrap()[3], 255);
    }

    #[test]
    fn line_cap_defaults_to_round() {
        assert_eq!(LineCap::default(), LineCap::Round);
        assert_eq!(LineCap::Square.to_cairo(), cairo::LineCap::Square);
    }
}
