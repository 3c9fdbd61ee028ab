use anyhow::{Context, anyhow};
use blurmask::config::{ColorSpec, Config, MaskStyleKind};
use blurmask::draw::{Image, name_to_color};
use blurmask::editor::{EditorSettings, LayerCompositor};
use blurmask::export;
use blurmask::input::{Mode, StrokeRecorder};
use blurmask::script::Script;
use blurmask::util::{Size, aspect_fit_size};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BLURMASK_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "blurmask")]
#[command(version = VERSION, about = "Reveal a blurred or masked copy of an image with recorded strokes")]
struct Cli {
    /// Source image (PNG)
    #[arg(long, short = 'i', value_name = "PNG")]
    input: PathBuf,

    /// Gesture script (JSON array of steps)
    #[arg(long, short = 's', value_name = "JSON")]
    script: PathBuf,

    /// Where to write the exported PNG (defaults to the configured export directory)
    #[arg(long, short = 'o', value_name = "PNG")]
    output: Option<PathBuf>,

    /// Config file to use instead of ~/.config/blurmask/config.toml
    #[arg(long, short = 'c', value_name = "TOML")]
    config: Option<PathBuf>,

    /// Initial editing mode (pen or eraser)
    #[arg(long, short = 'm', value_name = "MODE")]
    mode: Option<String>,

    /// Blur the mask layer with this radius (points)
    #[arg(long, short = 'r', value_name = "RADIUS", conflicts_with = "color")]
    radius: Option<f64>,

    /// Use an opaque fill of this named color as the mask layer
    #[arg(long, value_name = "COLOR")]
    color: Option<String>,

    /// Size of the surface the script's coordinates refer to, e.g. 375x667
    #[arg(long, value_name = "WxH")]
    display_size: Option<String>,

    /// Device scale of the source image (pixels per point)
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    apply_overrides(&mut config, &cli)?;
    config.validate_and_clamp();

    let image = {
        let file = File::open(&cli.input)
            .with_context(|| format!("Failed to open {}", cli.input.display()))?;
        Image::from_png(&mut BufReader::new(file), cli.scale)
            .with_context(|| format!("Failed to decode {}", cli.input.display()))?
    };
    log::info!(
        "Loaded {} ({}x{} px)",
        cli.input.display(),
        image.pixel_width(),
        image.pixel_height()
    );

    let display_size = match &cli.display_size {
        Some(value) => Some(
            Size::parse(value)
                .ok_or_else(|| anyhow!("Invalid display size '{value}': expected WIDTHxHEIGHT"))?,
        ),
        None if config.editor.display_max_dimension > 0.0 => {
            let bound = config.editor.display_max_dimension;
            Some(aspect_fit_size(Size::new(bound, bound), image.size()))
        }
        None => None,
    };

    let script = Script::load(&cli.script)?;

    let mut compositor = LayerCompositor::with_settings(EditorSettings::from_config(&config));
    compositor.set_original_image(image);
    if let Some(size) = display_size {
        compositor.set_display_size(size);
    }

    let mut recorder = StrokeRecorder::new();
    let stats = script.play(&mut recorder, &mut compositor);
    log::info!(
        "Applied {} of {} stroke(s), {} explicit commit(s)",
        stats.applied,
        stats.strokes,
        stats.commits
    );

    let edited = compositor
        .export()
        .ok_or_else(|| anyhow!("No edited image available"))?;

    let output = match cli.output {
        Some(path) => path,
        None => export::default_output_path(&config.export)?,
    };
    let saved = export::save_png(&edited, &output)
        .with_context(|| format!("Failed to save {}", output.display()))?;
    println!("{}", saved.display());

    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(name) = &cli.mode {
        config.editor.default_mode = name
            .parse::<Mode>()
            .map_err(|_| anyhow!("Invalid mode '{name}': expected pen or eraser"))?;
    }

    if let Some(radius) = cli.radius {
        config.mask.style = MaskStyleKind::Blur;
        config.mask.blur_radius = radius;
    }

    if let Some(name) = &cli.color {
        if name_to_color(name).is_none() {
            return Err(anyhow!("Unknown color '{name}'"));
        }
        config.mask.style = MaskStyleKind::Solid;
        config.mask.color = ColorSpec::Name(name.clone());
    }

    Ok(())
}
