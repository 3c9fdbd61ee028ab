//! Immutable raster images backed by Cairo image surfaces.

use crate::util::Size;
use cairo::{Context, Format, ImageSurface};
use std::io::{Read, Write};
use thiserror::Error;

/// Errors raised while reading, rendering, or encoding rasters.
#[derive(Debug, Error)]
pub enum DrawError {
    #[error("image has no readable ARGB32 pixel buffer")]
    UnreadablePixelBuffer,

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("surface data is not accessible: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("PNG encode/decode failed: {0}")]
    Png(#[from] cairo::IoError),

    #[error("failed to start blur worker: {0}")]
    Worker(std::io::Error),
}

/// Immutable pixel buffer plus a device scale factor.
///
/// Pixel dimensions come from the underlying ARGB32 surface; the point size
/// (what display coordinates are measured against) is `pixels / scale`.
/// Cloning is cheap and shares the surface; nothing in this crate mutates a
/// surface once it has been wrapped in an `Image`.
#[derive(Clone, Debug)]
pub struct Image {
    surface: ImageSurface,
    scale: f64,
}

impl Image {
    /// Wraps an existing surface, converting it to ARGB32 if needed.
    pub fn from_surface(surface: ImageSurface, scale: f64) -> Result<Self, DrawError> {
        let (width, height) = (surface.width(), surface.height());
        if width <= 0 || height <= 0 {
            return Err(DrawError::DegenerateGeometry(format!(
                "{width}x{height} surface"
            )));
        }
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };

        if surface.format() == Format::ARgb32 {
            return Ok(Self { surface, scale });
        }

        let converted = ImageSurface::create(Format::ARgb32, width, height)?;
        {
            let ctx = Context::new(&converted)?;
            ctx.set_source_surface(&surface, 0.0, 0.0)?;
            ctx.paint()?;
        }
        Ok(Self {
            surface: converted,
            scale,
        })
    }

    /// Decodes a PNG stream.
    pub fn from_png<R: Read>(reader: &mut R, scale: f64) -> Result<Self, DrawError> {
        let surface = ImageSurface::create_from_png(reader)?;
        Self::from_surface(surface, scale)
    }

    /// Builds an image from an owned pixel buffer (used by the blur engine).
    pub fn from_pixel_buffer(buffer: PixelBuffer, scale: f64) -> Result<Self, DrawError> {
        let PixelBuffer {
            data,
            width,
            height,
            stride,
        } = buffer;
        let surface = ImageSurface::create_for_data(
            data,
            Format::ARgb32,
            width as i32,
            height as i32,
            stride as i32,
        )?;
        Self::from_surface(surface, scale)
    }

    /// Renders into a fresh, fully transparent surface of `pixel_size`.
    ///
    /// The context handed to `draw` is pre-scaled by `scale`, so user space is
    /// measured in points just like [`Image::size`].
    pub fn render<F>(pixel_size: (i32, i32), scale: f64, draw: F) -> Result<Self, DrawError>
    where
        F: FnOnce(&Context) -> Result<(), cairo::Error>,
    {
        let (width, height) = pixel_size;
        if width <= 0 || height <= 0 {
            return Err(DrawError::DegenerateGeometry(format!(
                "cannot render into {width}x{height}"
            )));
        }
        let surface = ImageSurface::create(Format::ARgb32, width, height)?;
        {
            let ctx = Context::new(&surface)?;
            ctx.scale(scale, scale);
            draw(&ctx)?;
        }
        surface.flush();
        Self::from_surface(surface, scale)
    }

    /// Encodes the image as PNG.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> Result<(), DrawError> {
        self.surface.write_to_png(writer)?;
        Ok(())
    }

    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pixel_width(&self) -> i32 {
        self.surface.width()
    }

    pub fn pixel_height(&self) -> i32 {
        self.surface.height()
    }

    /// Size in points.
    pub fn size(&self) -> Size {
        Size::new(
            self.pixel_width() as f64 / self.scale,
            self.pixel_height() as f64 / self.scale,
        )
    }

    /// True when both images have identical pixel dimensions and scale.
    pub fn same_geometry(&self, other: &Image) -> bool {
        self.pixel_width() == other.pixel_width()
            && self.pixel_height() == other.pixel_height()
            && self.scale == other.scale
    }

    /// Copies the raw premultiplied pixels out of the surface.
    pub fn pixel_buffer(&self) -> Result<PixelBuffer, DrawError> {
        if self.surface.format() != Format::ARgb32 {
            return Err(DrawError::UnreadablePixelBuffer);
        }
        let width = self.pixel_width() as usize;
        let height = self.pixel_height() as usize;
        let stride = self.surface.stride() as usize;
        let len = stride * height;

        let mut copied = None;
        self.surface
            .with_data(|data| {
                if data.len() >= len {
                    copied = Some(data[..len].to_vec());
                }
            })
            .map_err(|_| DrawError::UnreadablePixelBuffer)?;

        let data = copied.ok_or(DrawError::UnreadablePixelBuffer)?;
        Ok(PixelBuffer {
            data,
            width,
            height,
            stride,
        })
    }

    /// Reads one pixel as straight (non-premultiplied) RGBA8.
    ///
    /// Returns `None` outside the image or when the surface cannot be read.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.pixel_width() || y >= self.pixel_height() {
            return None;
        }
        let offset = y as usize * self.surface.stride() as usize + x as usize * 4;
        let mut word = None;
        self.surface
            .with_data(|data| {
                if let Some(bytes) = data.get(offset..offset + 4) {
                    word = Some(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]));
                }
            })
            .ok()?;
        word.map(unpremultiply)
    }
}

/// Decodes a native-endian premultiplied ARGB32 word into straight RGBA8.
fn unpremultiply(word: u32) -> [u8; 4] {
    let a = (word >> 24) & 0xff;
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let channel = |shift: u32| -> u8 {
        let c = (word >> shift) & 0xff;
        ((c * 255 + a / 2) / a).min(255) as u8
    };
    [channel(16), channel(8), channel(0), a as u8]
}

/// Owned copy of a surface's pixels: `height` rows of `stride` bytes, four bytes per pixel.
///
/// Plain memory, so it can move to a worker thread; the blur engine ping-pongs
/// between two of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub(crate) data: Vec<u8>,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) stride: usize,
}

impl PixelBuffer {
    /// Allocates a zeroed ARGB32 buffer with Cairo's preferred stride.
    pub fn zeroed(width: usize, height: usize) -> Result<Self, DrawError> {
        let stride = Format::ARgb32.stride_for_width(width as u32)? as usize;
        Ok(Self {
            data: vec![0; stride * height],
            width,
            height,
            stride,
        })
    }

    /// Zero-sized placeholder, used while a buffer is moved between owners.
    pub(crate) fn empty() -> Self {
        Self {
            data: Vec::new(),
            width: 0,
            height: 0,
            stride: 0,
        }
    }

    /// Zeroed buffer with the same geometry, used as a scratch target.
    pub fn blank_like(&self) -> Self {
        Self {
            data: vec![0; self.data.len()],
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The four bytes of pixel `(x, y)` in memory order.
    pub fn pixel_bytes(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y * self.stride + x * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Overwrites pixel `(x, y)`; out-of-range writes are ignored.
    pub fn set_pixel_bytes(&mut self, x: usize, y: usize, bytes: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = y * self.stride + x * 4;
        self.data[i..i + 4].copy_from_slice(&bytes);
    }
}
