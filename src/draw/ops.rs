//! Stateless image utilities: resizing, solid fills, and layer flattening.
//!
//! Every function returns a new [`Image`]; inputs are never modified.

use super::color::Color;
use super::image::{DrawError, Image};
use crate::util::{Size, aspect_fit_size};

/// Paints `image` into the current context stretched to `dest` (in user-space points).
///
/// The source pattern pads at its borders so resampled edges stay opaque
/// instead of fading towards transparent.
pub fn paint_image(ctx: &cairo::Context, image: &Image, dest: Size) -> Result<(), cairo::Error> {
    if dest.is_degenerate() {
        return Ok(());
    }
    let (width, height) = (image.pixel_width() as f64, image.pixel_height() as f64);
    ctx.save()?;
    ctx.scale(dest.width / width, dest.height / height);
    let pattern = cairo::SurfacePattern::create(image.surface());
    pattern.set_extend(cairo::Extend::Pad);
    ctx.set_source(&pattern)?;
    ctx.rectangle(0.0, 0.0, width, height);
    ctx.fill()?;
    ctx.restore()
}

/// Rescales `image` to exactly `size` points, keeping its device scale.
pub fn resized_to(image: &Image, size: Size) -> Result<Image, DrawError> {
    if size.is_degenerate() {
        return Err(DrawError::DegenerateGeometry(format!(
            "cannot resize to {}x{}",
            size.width, size.height
        )));
    }
    let scale = image.scale();
    Image::render(size.to_pixels(scale), scale, |ctx| {
        paint_image(ctx, image, size)
    })
}

/// Scales `image` preserving aspect ratio so its longer side equals `max_dimension` points.
pub fn resized_to_fit(image: &Image, max_dimension: f64) -> Result<Image, DrawError> {
    let size = image.size();
    if !(max_dimension.is_finite() && max_dimension > 0.0) {
        return Err(DrawError::DegenerateGeometry(format!(
            "max dimension {max_dimension}"
        )));
    }
    let ratio = max_dimension / size.max_side();
    resized_to(image, size.scaled(ratio))
}

/// Opaque raster of `size` points filled with `color`.
///
/// The alpha channel of `color` is ignored so the result is always fully opaque.
pub fn filled(color: Color, size: Size, scale: f64) -> Result<Image, DrawError> {
    if size.is_degenerate() {
        return Err(DrawError::DegenerateGeometry(format!(
            "cannot fill {}x{}",
            size.width, size.height
        )));
    }
    let color = color.opaque();
    Image::render(size.to_pixels(scale), scale, |ctx| {
        ctx.set_source_rgba(color.r, color.g, color.b, color.a);
        ctx.paint()
    })
}

/// Flattens `top` over `bottom`.
///
/// Draws `bottom` at its own point size first, then `top` over it with normal
/// alpha compositing. The canvas takes `top`'s size and scale, so holes punched
/// into `top` show whatever `bottom` has underneath.
pub fn union_below(top: &Image, bottom: &Image) -> Result<Image, DrawError> {
    let scale = top.scale();
    let size = top.size();
    Image::render(size.to_pixels(scale), scale, |ctx| {
        paint_image(ctx, bottom, bottom.size())?;
        paint_image(ctx, top, size)
    })
}

/// Aspect-preserving target size for `image` given optional limits (points).
///
/// - width only: width becomes the limit, height follows the aspect ratio
/// - height only: height becomes the limit, width follows the aspect ratio
/// - both: the largest size fitting inside both limits
/// - neither: square images stay square at their width, portrait images keep
///   their height and landscape images keep their width. This reproduces the
///   native size through an aspect normalization and is kept as-is even though
///   it looks like a latent inconsistency rather than a deliberate rule.
pub fn suitable_size(image: &Image, width_limit: Option<f64>, height_limit: Option<f64>) -> Size {
    let native = image.size();
    let aspect = native.height / native.width;
    match (width_limit, height_limit) {
        (Some(width), None) => Size::new(width, width * aspect),
        (None, Some(height)) => Size::new(height / aspect, height),
        (Some(width), Some(height)) => aspect_fit_size(Size::new(width, height), native),
        (None, None) => {
            if native.width == native.height {
                Size::new(native.width, native.width)
            } else if native.height > native.width {
                Size::new(native.height / aspect, native.height)
            } else {
                Size::new(native.width, native.width * aspect)
            }
        }
    }
}
