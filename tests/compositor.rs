use blurmask::draw::{self, BLUE, Image, LineCap, box_window};
use blurmask::editor::{EditorSettings, LayerCompositor, LineStyle};
use blurmask::input::{GestureEvent, Mode, StrokeRecorder};
use blurmask::util::{Point, Size};

fn gradient(width: i32, height: i32) -> Image {
    Image::render((width, height), 1.0, |ctx| {
        let gradient = cairo::LinearGradient::new(0.0, 0.0, width as f64, 0.0);
        gradient.add_color_stop_rgb(0.0, 0.0, 0.0, 0.0);
        gradient.add_color_stop_rgb(1.0, 1.0, 1.0, 1.0);
        ctx.set_source(&gradient)?;
        ctx.paint()
    })
    .unwrap()
}

fn solid_red(size: i32) -> Image {
    Image::render((size, size), 1.0, |ctx| {
        ctx.set_source_rgb(1.0, 0.0, 0.0);
        ctx.paint()
    })
    .unwrap()
}

#[test]
fn recorded_gesture_drives_compositor_end_to_end() {
    let mut compositor = LayerCompositor::with_settings(EditorSettings {
        line_width: 6.0,
        line_cap: LineCap::Round,
        line_style: LineStyle::SolidColor(BLUE),
        ..EditorSettings::default()
    });
    compositor.set_original_image(solid_red(30));

    let mut recorder = StrokeRecorder::new();
    let events = [
        GestureEvent::Began(Point::new(5.0, 15.0)),
        GestureEvent::Moved(Point::new(15.0, 15.0)),
        GestureEvent::Moved(Point::new(25.0, 15.0)),
        GestureEvent::Ended,
    ];
    for event in events {
        if let Some(stroke) = recorder.handle(event) {
            assert!(compositor.apply_stroke(stroke).is_some());
        }
    }
    assert_eq!(compositor.pending_strokes().len(), 2);

    let exported = compositor.export().unwrap();
    assert_eq!(exported.pixel(15, 15), Some([0, 0, 255, 255]));
    assert_eq!(exported.pixel(15, 2), Some([255, 0, 0, 255]));
}

#[test]
fn tap_without_move_changes_nothing() {
    let mut compositor = LayerCompositor::new();
    compositor.set_original_image(solid_red(10));
    let mut recorder = StrokeRecorder::new();

    assert!(recorder.handle(GestureEvent::Began(Point::new(5.0, 5.0))).is_none());
    assert!(recorder.handle(GestureEvent::Ended).is_none());
    assert!(compositor.pending_strokes().is_empty());
}

#[test]
fn blurred_mask_softens_hard_edges() {
    let original = Image::render((40, 10), 1.0, |ctx| {
        ctx.set_source_rgb(1.0, 1.0, 1.0);
        ctx.paint()?;
        ctx.set_source_rgb(0.0, 0.0, 0.0);
        ctx.rectangle(0.0, 0.0, 20.0, 10.0);
        ctx.fill()
    })
    .unwrap();
    let mut compositor = LayerCompositor::with_settings(EditorSettings {
        line_style: LineStyle::BlurRadius(2.0),
        ..EditorSettings::default()
    });
    compositor.set_original_image(original);

    let mask = compositor.mask_layer_image().unwrap();
    let edge_left = mask.pixel(19, 5).unwrap()[0];
    let edge_right = mask.pixel(20, 5).unwrap()[0];
    assert!(edge_left > 0 && edge_left < 255, "left edge {edge_left}");
    assert!(edge_right > 0 && edge_right < 255, "right edge {edge_right}");
    assert_eq!(mask.pixel(0, 5), Some([0, 0, 0, 255]));
    assert_eq!(mask.pixel(39, 5), Some([255, 255, 255, 255]));
}

#[test]
fn blur_window_is_always_odd() {
    for radius in [0.5, 1.0, 2.5, 7.0, 20.0, 63.3] {
        for scale in [1.0, 2.0, 3.0] {
            assert_eq!(box_window(radius, scale) % 2, 1, "radius {radius} scale {scale}");
        }
    }
}

#[test]
fn resized_to_fit_preserves_aspect() {
    let image = gradient(300, 120);
    let resized = draw::resized_to_fit(&image, 100.0).unwrap();
    assert_eq!(resized.pixel_width(), 100);
    assert_eq!(resized.pixel_height(), 40);

    let tall = gradient(50, 200);
    let resized = draw::resized_to_fit(&tall, 100.0).unwrap();
    assert_eq!(resized.size(), Size::new(25.0, 100.0));
}

#[test]
fn eraser_then_pen_keeps_erased_region_original() {
    let mut compositor = LayerCompositor::with_settings(EditorSettings {
        line_width: 2.0,
        line_cap: LineCap::Butt,
        line_style: LineStyle::SolidColor(BLUE),
        mode: Mode::Eraser,
        ..EditorSettings::default()
    });
    compositor.set_original_image(solid_red(10));
    compositor.apply_stroke(blurmask::input::Stroke::new(
        Point::new(3.0, 4.0),
        Point::new(5.0, 4.0),
    ));
    compositor.transition_mode(Mode::Pen);

    // Baked against the original, not the now-visible mask.
    let baseline = compositor.baseline_image().unwrap();
    assert_eq!(baseline.pixel(3, 3), Some([255, 0, 0, 255]));

    let layers = compositor.display_layers().unwrap();
    assert_eq!(layers.backdrop.pixel(3, 3), Some([0, 0, 255, 255]));
}
