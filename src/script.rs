//! Recorded gesture scripts for driving the editor without a UI.
//!
//! A script is a JSON array of steps:
//!
//! ```json
//! [
//!   {"line_width": 12.0},
//!   {"begin": {"x": 10.0, "y": 10.0}},
//!   {"move": {"x": 40.0, "y": 12.0}},
//!   "end",
//!   {"solid_color": "blue"},
//!   {"mode": "eraser"},
//!   "commit"
//! ]
//! ```
//!
//! Gesture steps go through a [`StrokeRecorder`] exactly as live pointer events
//! would; the strokes it emits are applied to the [`LayerCompositor`].

use crate::config::ColorSpec;
use crate::draw::LineCap;
use crate::editor::{LayerCompositor, LineStyle};
use crate::input::{GestureEvent, Mode, StrokeRecorder};
use crate::util::Point;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    /// Pointer down
    Begin(Point),
    /// Pointer moved while down
    Move(Point),
    /// Pointer up
    End,
    /// Gesture aborted by the platform
    Cancel,
    /// Switch editing mode (commits pending strokes first)
    Mode(Mode),
    LineWidth(f64),
    LineCap(LineCap),
    /// Re-derive the mask layer as a blur of this radius
    BlurRadius(f64),
    /// Re-derive the mask layer as an opaque fill, by name or `[r, g, b]`
    SolidColor(ColorSpec),
    /// Bake pending strokes into the baseline
    Commit,
}

impl ScriptStep {
    fn gesture(&self) -> Option<GestureEvent> {
        match self {
            ScriptStep::Begin(point) => Some(GestureEvent::Began(*point)),
            ScriptStep::Move(point) => Some(GestureEvent::Moved(*point)),
            ScriptStep::End => Some(GestureEvent::Ended),
            ScriptStep::Cancel => Some(GestureEvent::Cancelled),
            _ => None,
        }
    }
}

/// Summary of a script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    /// Strokes the recorder emitted
    pub strokes: usize,
    /// Strokes the compositor accepted
    pub applied: usize,
    /// Explicit `commit` steps
    pub commits: usize,
}

/// An ordered list of [`ScriptStep`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    steps: Vec<ScriptStep>,
}

impl Script {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    /// Parses a script from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse gesture script")
    }

    /// Reads and parses a script file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script from {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid script {}", path.display()))
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Runs every step in order.
    ///
    /// Without a source image the compositor ignores strokes; they are still
    /// counted in `strokes` but not in `applied`.
    pub fn play(
        &self,
        recorder: &mut StrokeRecorder,
        compositor: &mut LayerCompositor,
    ) -> PlaybackStats {
        let mut stats = PlaybackStats::default();

        for step in &self.steps {
            if let Some(event) = step.gesture() {
                if let Some(stroke) = recorder.handle(event) {
                    stats.strokes += 1;
                    if compositor.apply_stroke(stroke).is_some() {
                        stats.applied += 1;
                    }
                }
                continue;
            }

            match step {
                ScriptStep::Mode(mode) => compositor.transition_mode(*mode),
                ScriptStep::LineWidth(width) => compositor.set_line_width(*width),
                ScriptStep::LineCap(cap) => compositor.set_line_cap(*cap),
                ScriptStep::BlurRadius(radius) => compositor.set_blur_radius(*radius),
                ScriptStep::SolidColor(color) => {
                    compositor.set_line_style(LineStyle::SolidColor(color.to_color()))
                }
                ScriptStep::Commit => {
                    compositor.commit();
                    stats.commits += 1;
                }
                _ => {}
            }
        }

        debug!(
            "Script finished: {} step(s), {} stroke(s), {} applied",
            self.steps.len(),
            stats.strokes,
            stats.applied
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BLUE, Image, RED};
    use crate::editor::EditorSettings;

    fn white(size: i32) -> Image {
        Image::render((size, size), 1.0, |ctx| {
            ctx.set_source_rgb(1.0, 1.0, 1.0);
            ctx.paint()
        })
        .unwrap()
    }

    #[test]
    fn parses_object_and_string_steps() {
        let script = Script::from_json(
            r#"[
                {"begin": {"x": 1.0, "y": 2.0}},
                {"move": {"x": 3.0, "y": 4.0}},
                "end",
                {"mode": "eraser"},
                {"line_width": 5.5},
                {"line_cap": "butt"},
                {"blur_radius": 3.0},
                {"solid_color": "red"},
                {"solid_color": [0, 128, 255]},
                "commit"
            ]"#,
        )
        .unwrap();

        assert_eq!(
            script.steps(),
            &[
                ScriptStep::Begin(Point::new(1.0, 2.0)),
                ScriptStep::Move(Point::new(3.0, 4.0)),
                ScriptStep::End,
                ScriptStep::Mode(Mode::Eraser),
                ScriptStep::LineWidth(5.5),
                ScriptStep::LineCap(LineCap::Butt),
                ScriptStep::BlurRadius(3.0),
                ScriptStep::SolidColor(ColorSpec::Name("red".into())),
                ScriptStep::SolidColor(ColorSpec::Rgb([0, 128, 255])),
                ScriptStep::Commit,
            ]
        );
    }

    #[test]
    fn rejects_unknown_steps() {
        assert!(Script::from_json(r#"[{"teleport": 1}]"#).is_err());
    }

    #[test]
    fn play_feeds_recorder_strokes_into_compositor() {
        let mut compositor = LayerCompositor::with_settings(EditorSettings {
            line_width: 4.0,
            line_cap: LineCap::Butt,
            line_style: LineStyle::SolidColor(BLUE),
            ..EditorSettings::default()
        });
        compositor.set_original_image(white(20));

        let script = Script::new(vec![
            ScriptStep::Begin(Point::new(0.0, 10.0)),
            ScriptStep::Move(Point::new(10.0, 10.0)),
            ScriptStep::Move(Point::new(20.0, 10.0)),
            ScriptStep::End,
            // A tap without movement emits nothing.
            ScriptStep::Begin(Point::new(5.0, 5.0)),
            ScriptStep::End,
            ScriptStep::Commit,
        ]);

        let mut recorder = StrokeRecorder::new();
        let stats = script.play(&mut recorder, &mut compositor);

        assert_eq!(
            stats,
            PlaybackStats {
                strokes: 2,
                applied: 2,
                commits: 1
            }
        );
        assert!(!recorder.is_tracking());
        assert!(compositor.pending_strokes().is_empty());
        let baseline = compositor.baseline_image().unwrap();
        assert_eq!(baseline.pixel(15, 10), Some([0, 0, 255, 255]));
        assert_eq!(baseline.pixel(15, 2), Some([255, 255, 255, 255]));
    }

    #[test]
    fn solid_color_step_switches_mask_mid_script() {
        let mut compositor = LayerCompositor::with_settings(EditorSettings {
            line_width: 4.0,
            line_cap: LineCap::Butt,
            line_style: LineStyle::BlurRadius(2.0),
            ..EditorSettings::default()
        });
        compositor.set_original_image(white(20));

        let script = Script::new(vec![
            ScriptStep::SolidColor(ColorSpec::Name("red".into())),
            ScriptStep::Begin(Point::new(0.0, 10.0)),
            ScriptStep::Move(Point::new(20.0, 10.0)),
            ScriptStep::End,
            ScriptStep::Commit,
        ]);
        script.play(&mut StrokeRecorder::new(), &mut compositor);

        assert_eq!(compositor.line_style(), LineStyle::SolidColor(RED));
        let baseline = compositor.baseline_image().unwrap();
        assert_eq!(baseline.pixel(10, 10), Some([255, 0, 0, 255]));
        assert_eq!(baseline.pixel(10, 2), Some([255, 255, 255, 255]));
    }

    #[test]
    fn play_without_source_image_applies_nothing() {
        let script = Script::new(vec![
            ScriptStep::Begin(Point::new(0.0, 0.0)),
            ScriptStep::Move(Point::new(1.0, 1.0)),
            ScriptStep::End,
        ]);
        let mut compositor = LayerCompositor::new();
        let stats = script.play(&mut StrokeRecorder::new(), &mut compositor);
        assert_eq!(stats.strokes, 1);
        assert_eq!(stats.applied, 0);
    }
}
