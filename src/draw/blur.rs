//! Box-blur engine approximating a Gaussian blur.
//!
//! Three successive box convolutions of equal odd width approximate a single
//! Gaussian of the requested radius to within a few percent. Each convolution
//! is separable (a horizontal pass followed by a vertical pass) and uses
//! edge-extend boundary handling: samples outside the buffer replicate the
//! nearest edge pixel, so borders never darken or wrap.

use super::image::{DrawError, Image, PixelBuffer};
use std::f64::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};

/// Number of box convolutions applied per blur.
pub const BOX_PASSES: usize = 3;

/// Converts a Gaussian radius (in points) into an odd box window width (in pixels).
///
/// `w = floor(radius * scale * 3 * sqrt(2π) / 4 + 0.5)`, bumped to the next odd
/// number so the window is centred on each pixel. Zero, negative and non-finite
/// radii yield a window of 1 (identity).
pub fn box_window(radius: f64, scale: f64) -> u32 {
    let width = (radius * scale * 3.0 * (2.0 * PI).sqrt() / 4.0 + 0.5).floor();
    let mut window = if width.is_finite() && width > 0.0 {
        width.min(u32::MAX as f64 - 1.0) as u32
    } else {
        0
    };
    if window % 2 == 0 {
        window += 1;
    }
    window
}

/// A configured three-pass box blur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxBlur {
    window: u32,
}

impl BoxBlur {
    /// Box blur for a Gaussian `radius` at device `scale`.
    pub fn for_radius(radius: f64, scale: f64) -> Self {
        Self {
            window: box_window(radius, scale),
        }
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    /// A window of one pixel leaves every pixel unchanged.
    pub fn is_identity(&self) -> bool {
        self.window <= 1
    }

    /// Blurs `input`, consuming it.
    pub fn apply(&self, input: PixelBuffer) -> PixelBuffer {
        if self.is_identity() || input.width == 0 || input.height == 0 {
            return input;
        }
        let mut passes = PingPong::new(input, self.window);
        for _ in 0..BOX_PASSES {
            passes.convolve();
        }
        passes.front
    }

    /// Blurs `input`, checking `cancel` before every convolution.
    ///
    /// Returns `None` as soon as cancellation is observed; partial results are
    /// never returned.
    pub fn apply_cancellable(&self, input: PixelBuffer, cancel: &AtomicBool) -> Option<PixelBuffer> {
        if self.is_identity() || input.width == 0 || input.height == 0 {
            return (!cancel.load(Ordering::Acquire)).then_some(input);
        }

        let mut passes = PingPong::new(input, self.window);
        for _ in 0..BOX_PASSES {
            if cancel.load(Ordering::Acquire) {
                log::debug!("Box blur cancelled (window {})", self.window);
                return None;
            }
            passes.convolve();
        }

        (!cancel.load(Ordering::Acquire)).then_some(passes.front)
    }
}

/// Owned buffers the passes alternate between: `front` holds the latest
/// result, `back` receives the next one, `scratch` holds the horizontal pass.
struct PingPong {
    front: PixelBuffer,
    back: PixelBuffer,
    scratch: PixelBuffer,
    half: usize,
}

impl PingPong {
    fn new(input: PixelBuffer, window: u32) -> Self {
        Self {
            back: input.blank_like(),
            scratch: input.blank_like(),
            front: input,
            half: (window / 2) as usize,
        }
    }

    fn convolve(&mut self) {
        let front = std::mem::replace(&mut self.front, PixelBuffer::empty());
        let back = std::mem::replace(&mut self.back, PixelBuffer::empty());
        let (output, recycled) = box_convolve(front, back, &mut self.scratch, self.half);
        self.front = output;
        self.back = recycled;
    }
}

/// One 2-D box convolution: `src` rows into `scratch`, then `scratch` columns into `dst`.
///
/// Takes both buffers by value and hands them back as `(output, recycled_input)`
/// so the caller can ping-pong without aliasing.
fn box_convolve(
    src: PixelBuffer,
    mut dst: PixelBuffer,
    scratch: &mut PixelBuffer,
    half: usize,
) -> (PixelBuffer, PixelBuffer) {
    let (width, height, stride) = (src.width, src.height, src.stride);

    for y in 0..height {
        blur_line(&src.data, &mut scratch.data, y * stride, 4, width, half);
    }
    for x in 0..width {
        blur_line(&scratch.data, &mut dst.data, x * 4, stride, height, half);
    }

    (dst, src)
}

/// Sliding-window average over `len` pixels starting at byte `start`, `step` bytes apart.
fn blur_line(src: &[u8], dst: &mut [u8], start: usize, step: usize, len: usize, half: usize) {
    if len == 0 {
        return;
    }
    let last = len - 1;
    let window = 2 * half as u64 + 1;
    let at = |i: usize| start + i.min(last) * step;

    // Window for pixel 0 is [-half, half]. Indices left of 0 replicate pixel 0
    // and indices past the end replicate the last pixel, so both are counted
    // instead of visited. Cost stays proportional to `len`, not the window.
    let inside = half.min(last);
    let tail = (half - inside) as u64;
    let mut sums = [0u64; 4];
    for (c, sum) in sums.iter_mut().enumerate() {
        *sum = (half as u64 + 1) * src[at(0) + c] as u64 + tail * src[at(last) + c] as u64;
        for k in 1..=inside {
            *sum += src[at(k) + c] as u64;
        }
    }

    for i in 0..len {
        let out = start + i * step;
        for (c, sum) in sums.iter().enumerate() {
            dst[out + c] = ((sum + window / 2) / window) as u8;
        }

        let leave = at(i.saturating_sub(half));
        let enter = at(i.saturating_add(half).saturating_add(1));
        for (c, sum) in sums.iter_mut().enumerate() {
            *sum = *sum - src[leave + c] as u64 + src[enter + c] as u64;
        }
    }
}

/// Blurs an image by a Gaussian `radius` given in points.
///
/// Uses the image's own device scale. A radius that maps to a one-pixel window
/// returns the image unchanged.
pub fn try_blur(image: &Image, radius: f64) -> Result<Image, DrawError> {
    let blur = BoxBlur::for_radius(radius, image.scale());
    if blur.is_identity() {
        return Ok(image.clone());
    }
    let pixels = image.pixel_buffer()?;
    Image::from_pixel_buffer(blur.apply(pixels), image.scale())
}

/// Like [`try_blur`], but maps failures to an absent result.
pub fn blur(image: &Image, radius: f64) -> Option<Image> {
    match try_blur(image, radius) {
        Ok(blurred) => Some(blurred),
        Err(err) => {
            log::warn!("Blur of radius {radius:.1} failed: {err}");
            None
        }
    }
}
