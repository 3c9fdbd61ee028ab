//! The masked dual-layer compositor.

use super::EditorError;
use super::line_style::LineStyle;
use super::mask::MaskLayer;
use super::settings::EditorSettings;
use crate::draw::{
    self, Image, LineCap, StrokeStyle, ops::paint_image, render_erase_segment,
    render_erase_strokes,
};
use crate::input::{Backdrop, Mode, Stroke, StrokeBatch};
use crate::util::{ScaleRatio, Size};
use log::{debug, info, warn};

/// What the view should show right now: `top` drawn over `backdrop`.
#[derive(Debug, Clone)]
pub struct DisplayLayers {
    /// Mask layer in Pen mode, original image in Eraser mode
    pub backdrop: Image,
    /// Baseline in display space, with any uncommitted strokes punched out
    pub top: Image,
}

/// Stateful editing engine.
///
/// Owns the source image, the derived mask layer, the committed baseline, and
/// the strokes made since the last commit. Strokes punch holes into a
/// transient display-space copy of the baseline for live feedback; a commit
/// replays them at image resolution and flattens the result over the layer
/// chosen by the mode the strokes were made in.
///
/// Every operation is a no-op returning `None` until a source image is set.
#[derive(Debug)]
pub struct LayerCompositor {
    original: Option<Image>,
    mask_layer: MaskLayer,
    baseline: Option<Image>,
    pending: StrokeBatch,
    /// Live display-space layer; discarded on commit
    top_layer: Option<Image>,
    display_size: Option<Size>,
    mode: Mode,
    line_style: LineStyle,
    line_width: f64,
    line_cap: LineCap,
    background_blur: bool,
}

impl Default for LayerCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerCompositor {
    /// Creates an empty compositor with default settings.
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    /// Creates an empty compositor with the given settings.
    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            original: None,
            mask_layer: MaskLayer::Unavailable,
            baseline: None,
            pending: StrokeBatch::new(),
            top_layer: None,
            display_size: None,
            mode: settings.mode,
            line_style: settings.line_style,
            line_width: settings.line_width,
            line_cap: settings.line_cap,
            background_blur: settings.background_blur,
        }
    }

    // ------------------------------------------------------------------
    // Source image and mask layer
    // ------------------------------------------------------------------

    /// Starts a new editing session on `image`.
    ///
    /// Re-derives the mask layer, resets the baseline to `image`, and drops any
    /// pending strokes. An in-flight background blur for the previous image is
    /// cancelled.
    pub fn set_original_image(&mut self, image: Image) {
        debug!(
            "New source image {}x{} @{}x",
            image.pixel_width(),
            image.pixel_height(),
            image.scale()
        );
        self.mask_layer = MaskLayer::derive(&image, self.line_style, self.background_blur);
        self.baseline = Some(image.clone());
        self.original = Some(image);
        self.pending.clear();
        self.top_layer = None;
    }

    /// Changes how the mask layer is derived and re-derives it for the current source.
    pub fn set_line_style(&mut self, style: LineStyle) {
        if style == self.line_style && !matches!(self.mask_layer, MaskLayer::Unavailable) {
            return;
        }
        self.line_style = style;
        if let Some(original) = &self.original {
            debug!("Re-deriving mask layer for {style:?}");
            self.mask_layer = MaskLayer::derive(original, style, self.background_blur);
        }
    }

    /// Shorthand for `set_line_style(LineStyle::BlurRadius(radius))`.
    pub fn set_blur_radius(&mut self, radius: f64) {
        self.set_line_style(LineStyle::BlurRadius(radius));
    }

    /// Enables or disables blurring on a worker thread for future derivations.
    pub fn set_background_blur(&mut self, enabled: bool) {
        self.background_blur = enabled;
    }

    // ------------------------------------------------------------------
    // Brush settings (read at commit time)
    // ------------------------------------------------------------------

    /// Sets the stroke width in display points. Negative or non-finite widths are ignored.
    pub fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width >= 0.0 {
            self.line_width = width;
        } else {
            warn!("Ignoring invalid line width {width}");
        }
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    /// Declares the size of the view strokes are measured against.
    ///
    /// Pending strokes belong to the old display space, so they are committed first.
    pub fn set_display_size(&mut self, size: Size) {
        if size.is_degenerate() {
            warn!(
                "Ignoring degenerate display size {}x{}",
                size.width, size.height
            );
            return;
        }
        if self.display_size == Some(size) {
            return;
        }
        self.commit();
        self.display_size = Some(size);
        self.top_layer = None;
    }

    // ------------------------------------------------------------------
    // Mode
    // ------------------------------------------------------------------

    /// Switches editing mode.
    ///
    /// Pending strokes are committed under the outgoing mode before the switch,
    /// so Pen strokes are always baked against the mask layer and Eraser strokes
    /// against the original.
    pub fn transition_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        self.commit();
        debug!("Mode {} -> {}", self.mode, mode);
        self.mode = mode;
    }

    // ------------------------------------------------------------------
    // Strokes
    // ------------------------------------------------------------------

    /// Punches `stroke` into the live top layer and queues it for the next commit.
    ///
    /// Returns the updated top layer for immediate display.
    pub fn apply_stroke(&mut self, stroke: Stroke) -> Option<Image> {
        match self.try_apply_stroke(stroke) {
            Ok(top) => Some(top),
            Err(EditorError::NoSourceImage) => None,
            Err(err) => {
                warn!("Stroke dropped: {err}");
                None
            }
        }
    }

    /// Fallible form of [`apply_stroke`](Self::apply_stroke).
    pub fn try_apply_stroke(&mut self, stroke: Stroke) -> Result<Image, EditorError> {
        let baseline = self.baseline.as_ref().ok_or(EditorError::NoSourceImage)?;
        let display = self.display_size.unwrap_or_else(|| baseline.size());

        let current = match &self.top_layer {
            Some(top) => top.clone(),
            None => draw::resized_to(baseline, display)?,
        };
        let style = StrokeStyle::new(self.line_width, self.line_cap);
        let top = Image::render(
            (current.pixel_width(), current.pixel_height()),
            current.scale(),
            |ctx| {
                paint_image(ctx, &current, display)?;
                render_erase_segment(ctx, stroke.from, stroke.to, style)
            },
        )?;

        self.pending.push(stroke);
        self.top_layer = Some(top.clone());
        Ok(top)
    }

    /// Bakes pending strokes into the baseline using the current mode.
    ///
    /// Returns the (possibly unchanged) baseline. With no pending strokes this
    /// is a no-op. The pending batch is always emptied, even on failure, so
    /// strokes can never be baked against the wrong layer later.
    pub fn commit(&mut self) -> Option<Image> {
        match self.try_commit() {
            Ok(baseline) => Some(baseline),
            Err(EditorError::NoSourceImage) => None,
            Err(err) => {
                warn!("Commit failed, baseline unchanged: {err}");
                None
            }
        }
    }

    /// Fallible form of [`commit`](Self::commit).
    pub fn try_commit(&mut self) -> Result<Image, EditorError> {
        let baseline = self.baseline.clone().ok_or(EditorError::NoSourceImage)?;
        if self.pending.is_empty() {
            return Ok(baseline);
        }

        let strokes = self.pending.take();
        self.top_layer = None;

        let backdrop = self.backdrop_for(self.mode.backdrop())?;
        let display = self.display_size.unwrap_or_else(|| baseline.size());
        let ratio = ScaleRatio::between(display, baseline.size()).ok_or_else(|| {
            EditorError::Draw(draw::DrawError::DegenerateGeometry(format!(
                "display {}x{}",
                display.width, display.height
            )))
        })?;

        let style = StrokeStyle::new(self.line_width, self.line_cap);
        let punched = Image::render(
            (baseline.pixel_width(), baseline.pixel_height()),
            baseline.scale(),
            |ctx| {
                paint_image(ctx, &baseline, baseline.size())?;
                render_erase_strokes(ctx, &strokes, style, Some(ratio))
            },
        )?;
        let merged = draw::union_below(&punched, &backdrop)?;

        debug!(
            "Committed {} stroke(s) in {} mode against {:?}",
            strokes.len(),
            self.mode,
            self.mode.backdrop()
        );
        self.baseline = Some(merged.clone());
        Ok(merged)
    }

    /// Commits, then flattens the baseline over the mask layer.
    ///
    /// The result is fully opaque wherever the mask layer is.
    pub fn export(&mut self) -> Option<Image> {
        match self.try_export() {
            Ok(image) => Some(image),
            Err(EditorError::NoSourceImage) => None,
            Err(err) => {
                warn!("No edited image available: {err}");
                None
            }
        }
    }

    /// Fallible form of [`export`](Self::export).
    pub fn try_export(&mut self) -> Result<Image, EditorError> {
        let baseline = self.try_commit()?;
        let mask = self.backdrop_for(Backdrop::MaskLayer)?;
        let exported = draw::union_below(&baseline, &mask)?;
        info!(
            "Exported {}x{} image",
            exported.pixel_width(),
            exported.pixel_height()
        );
        Ok(exported)
    }

    /// Layers the view should display for the current mode.
    ///
    /// Returns `None` before a source image is set, or when the backdrop for the
    /// current mode is unavailable (the view then shows nothing).
    pub fn display_layers(&mut self) -> Option<DisplayLayers> {
        let baseline = self.baseline.clone()?;
        let backdrop = match self.backdrop_for(self.mode.backdrop()) {
            Ok(backdrop) => backdrop,
            Err(err) => {
                warn!("Backdrop unavailable: {err}");
                return None;
            }
        };
        let top = match &self.top_layer {
            Some(top) => top.clone(),
            None => {
                let display = self.display_size.unwrap_or_else(|| baseline.size());
                draw::resized_to(&baseline, display)
                    .map_err(|err| warn!("Cannot build display layer: {err}"))
                    .ok()?
            }
        };
        Some(DisplayLayers { backdrop, top })
    }

    fn backdrop_for(&mut self, backdrop: Backdrop) -> Result<Image, EditorError> {
        match backdrop {
            Backdrop::Original => self.original.clone().ok_or(EditorError::NoSourceImage),
            Backdrop::MaskLayer => self
                .mask_layer
                .resolve()
                .cloned()
                .ok_or(EditorError::MaskLayerUnavailable),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn line_style(&self) -> LineStyle {
        self.line_style
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }

    pub fn original_image(&self) -> Option<&Image> {
        self.original.as_ref()
    }

    /// The committed edit, excluding uncommitted strokes.
    pub fn baseline_image(&self) -> Option<&Image> {
        self.baseline.as_ref()
    }

    /// The derived mask layer, waiting for a background blur if one is running.
    pub fn mask_layer_image(&mut self) -> Option<&Image> {
        self.mask_layer.resolve()
    }

    #[cfg(test)]
    pub(super) fn discard_mask_layer(&mut self) {
        self.mask_layer = MaskLayer::Unavailable;
    }

    pub fn is_mask_layer_pending(&self) -> bool {
        self.mask_layer.is_pending()
    }

    /// Strokes applied since the last commit, in arrival order.
    pub fn pending_strokes(&self) -> &[Stroke] {
        self.pending.as_slice()
    }

    /// Display size strokes are measured against.
    pub fn display_size(&self) -> Option<Size> {
        self.display_size
            .or_else(|| self.baseline.as_ref().map(Image::size))
    }
}
