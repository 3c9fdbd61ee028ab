//! Mask layer derivation, optionally computed on a worker thread.

use super::line_style::LineStyle;
use crate::draw::{self, BoxBlur, DrawError, Image, PixelBuffer};
use log::{debug, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

/// The derived layer revealed by Pen strokes.
#[derive(Debug, Default)]
pub(crate) enum MaskLayer {
    /// No source image yet, or derivation failed
    #[default]
    Unavailable,
    /// Blur still running on a worker thread
    Pending(BlurJob),
    /// Derived and immutable until the source or style changes
    Ready(Image),
}

impl MaskLayer {
    /// Derives the mask layer for `original` under `style`.
    ///
    /// With `background` set, blur styles are handed to a worker thread and the
    /// layer starts out `Pending`.
    pub(crate) fn derive(original: &Image, style: LineStyle, background: bool) -> Self {
        let result = match style {
            LineStyle::SolidColor(color) => {
                draw::filled(color, original.size(), original.scale()).map(MaskLayer::Ready)
            }
            LineStyle::BlurRadius(radius) if background => {
                BlurJob::spawn(original, radius).map(|job| match job {
                    Some(job) => MaskLayer::Pending(job),
                    None => MaskLayer::Ready(original.clone()),
                })
            }
            LineStyle::BlurRadius(radius) => {
                draw::blur::try_blur(original, radius).map(MaskLayer::Ready)
            }
        };

        match result {
            Ok(layer) => layer,
            Err(err) => {
                warn!("Mask layer unavailable for {style:?}: {err}");
                MaskLayer::Unavailable
            }
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        matches!(self, MaskLayer::Pending(_))
    }

    /// Returns the finished layer, blocking on an in-flight blur first.
    pub(crate) fn resolve(&mut self) -> Option<&Image> {
        if self.is_pending() {
            if let MaskLayer::Pending(job) = std::mem::take(self) {
                *self = match job.wait() {
                    Some(image) => MaskLayer::Ready(image),
                    None => MaskLayer::Unavailable,
                };
            }
        }
        match self {
            MaskLayer::Ready(image) => Some(image),
            _ => None,
        }
    }
}

/// A blur running on its own thread.
///
/// Dropping the job (for example because a newer source image superseded it)
/// raises its cancel flag; the worker stops at the next convolution boundary
/// and its result is discarded.
#[derive(Debug)]
pub(crate) struct BlurJob {
    handle: Option<JoinHandle<Option<PixelBuffer>>>,
    cancel: Arc<AtomicBool>,
    scale: f64,
}

impl BlurJob {
    /// Starts blurring a copy of `image`. Returns `Ok(None)` when the radius
    /// maps to an identity blur and no work is needed.
    fn spawn(image: &Image, radius: f64) -> Result<Option<Self>, DrawError> {
        let blur = BoxBlur::for_radius(radius, image.scale());
        if blur.is_identity() {
            return Ok(None);
        }

        let pixels = image.pixel_buffer()?;
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = Arc::clone(&cancel);

        let handle = thread::Builder::new()
            .name("blurmask-blur".to_string())
            .spawn(move || blur.apply_cancellable(pixels, &worker_cancel))
            .map_err(DrawError::Worker)?;

        debug!(
            "Spawned blur worker (window {}, {}x{})",
            blur.window(),
            image.pixel_width(),
            image.pixel_height()
        );

        Ok(Some(Self {
            handle: Some(handle),
            cancel,
            scale: image.scale(),
        }))
    }

    /// Blocks until the worker finishes and converts its output into an image.
    fn wait(mut self) -> Option<Image> {
        let handle = self.handle.take()?;
        let pixels = match handle.join() {
            Ok(Some(pixels)) => pixels,
            Ok(None) => {
                debug!("Blur worker finished without a result (cancelled)");
                return None;
            }
            Err(_) => {
                warn!("Blur worker panicked");
                return None;
            }
        };
        match Image::from_pixel_buffer(pixels, self.scale) {
            Ok(image) => Some(image),
            Err(err) => {
                warn!("Failed to wrap blurred pixels: {err}");
                None
            }
        }
    }
}

impl Drop for BlurJob {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel.store(true, Ordering::Release);
            debug!("Superseded in-flight blur worker");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BLUE, Color};

    fn checker(size: i32) -> Image {
        Image::render((size, size), 1.0, |ctx| {
            ctx.set_source_rgb(1.0, 1.0, 1.0);
            ctx.paint()?;
            ctx.set_source_rgb(0.0, 0.0, 0.0);
            ctx.rectangle(0.0, 0.0, size as f64 / 2.0, size as f64);
            ctx.fill()
        })
        .unwrap()
    }

    #[test]
    fn solid_style_fills_full_size() {
        let original = checker(8);
        let mut layer = MaskLayer::derive(&original, LineStyle::SolidColor(BLUE), false);
        let image = layer.resolve().expect("solid fill is ready");
        assert!(image.same_geometry(&original));
        assert_eq!(image.pixel(0, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn translucent_solid_color_is_made_opaque() {
        let original = checker(4);
        let mut layer = MaskLayer::derive(
            &original,
            LineStyle::SolidColor(Color::new(1.0, 0.0, 0.0, 0.1)),
            false,
        );
        assert_eq!(layer.resolve().unwrap().pixel(3, 3), Some([255, 0, 0, 255]));
    }

    #[test]
    fn background_blur_matches_foreground_blur() {
        let original = checker(16);
        let mut foreground = MaskLayer::derive(&original, LineStyle::BlurRadius(2.0), false);
        let mut background = MaskLayer::derive(&original, LineStyle::BlurRadius(2.0), true);
        assert!(background.is_pending());

        let fg = foreground.resolve().unwrap().clone();
        let bg = background.resolve().unwrap().clone();
        assert!(!background.is_pending());
        for (x, y) in [(0, 0), (7, 8), (8, 8), (15, 15)] {
            assert_eq!(fg.pixel(x, y), bg.pixel(x, y), "pixel ({x}, {y})");
        }
    }

    #[test]
    fn zero_radius_background_blur_is_ready_immediately() {
        let original = checker(4);
        let layer = MaskLayer::derive(&original, LineStyle::BlurRadius(0.0), true);
        assert!(matches!(layer, MaskLayer::Ready(_)));
    }

    #[test]
    fn superseded_job_is_cancelled() {
        let original = checker(64);
        let job = BlurJob::spawn(&original, 30.0).unwrap().unwrap();
        let cancel = Arc::clone(&job.cancel);
        drop(job);
        assert!(cancel.load(Ordering::Acquire));
    }
}
