//! Writing exported images to disk.

use crate::config::ExportConfig;
use crate::draw::{DrawError, Image};
use chrono::Local;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode image: {0}")]
    Encode(#[from] DrawError),
}

/// Generate a filename based on the template and current time.
///
/// # Arguments
/// * `template` - Template string with chrono format specifiers
/// * `format` - File extension (e.g., "png")
pub fn generate_filename(template: &str, format: &str) -> String {
    let now = Local::now();
    let filename = now.format(template).to_string();
    format!("{}.{}", filename, format)
}

/// Ensure the save directory exists, creating it if necessary.
///
/// Returns the canonicalized path when it can be resolved.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// Output path for an export when the caller didn't pick one.
pub fn default_output_path(config: &ExportConfig) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(&expand_tilde(&config.save_directory))?;
    Ok(directory.join(generate_filename(&config.filename_template, "png")))
}

/// Encodes `image` as PNG at `path`, creating parent directories as needed.
pub fn save_png(image: &Image, path: &Path) -> Result<PathBuf, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory_exists(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    image.write_png(&mut writer)?;
    writer.flush()?;

    let written_size = fs::metadata(path)?.len();
    log::info!(
        "Saved {}x{} image to {} ({} bytes)",
        image.pixel_width(),
        image.pixel_height(),
        path.display(),
        written_size
    );
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_filename() {
        let filename = generate_filename("test_%Y%m%d", "png");
        assert!(filename.starts_with("test_"));
        assert!(filename.ends_with(".png"));
        assert_eq!(filename.len(), "test_YYYYMMDD.png".len());
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/Pictures");
        assert!(!expanded.to_string_lossy().starts_with("~"));

        let no_tilde = expand_tilde("/absolute/path");
        assert_eq!(no_tilde, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn default_output_path_creates_directory() {
        let dir = TempDir::new().unwrap();
        let config = ExportConfig {
            save_directory: dir.path().join("out").to_string_lossy().into_owned(),
            filename_template: "edit".to_string(),
        };
        let path = default_output_path(&config).unwrap();
        assert!(dir.path().join("out").is_dir());
        assert_eq!(path.file_name().unwrap(), "edit.png");
    }

    #[test]
    fn save_png_writes_decodable_file() {
        let dir = TempDir::new().unwrap();
        let image = Image::render((6, 4), 1.0, |ctx| {
            ctx.set_source_rgb(0.0, 1.0, 0.0);
            ctx.paint()
        })
        .unwrap();

        let path = save_png(&image, &dir.path().join("a").join("b.png")).unwrap();
        let mut file = File::open(&path).unwrap();
        let decoded = Image::from_png(&mut file, 1.0).unwrap();
        assert!(decoded.same_geometry(&image));
        assert_eq!(decoded.pixel(5, 3), Some([0, 255, 0, 255]));
    }
}
