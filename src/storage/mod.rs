//! Storage Layer
//!
//! Loading screenshots, naming and saving annotated copies, and locating the
//! configuration directory.

use anyhow::{Context, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};

use crate::config::OutputSettings;

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "screenlabeler", "ScreenLabeler")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(proj_dirs.config_dir().to_path_buf())
}

/// Default location of `config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

/// Load a screenshot as 8-bit RGB
pub fn load_screenshot(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).with_context(|| format!("Failed to open image {:?}", path))?;
    Ok(image.to_rgb8())
}

/// Output path for the annotated copy of `input`
///
/// The file name is the input's file name with the configured prefix, placed
/// in the configured directory or the current directory.
pub fn annotated_output_path(input: &Path, output: &OutputSettings) -> Result<PathBuf> {
    let file_name = input
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Input path {:?} has no file name", input))?;

    let mut name = std::ffi::OsString::from(&output.prefix);
    name.push(file_name);

    let directory = output
        .directory
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(directory.join(name))
}

/// Save an annotated image; the format follows the file extension
pub fn save_annotated(image: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {:?}", parent))?;
        }
    }

    image
        .save(path)
        .with_context(|| format!("Failed to save annotated image {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    #[test]
    fn test_output_path_in_current_dir() {
        let path = annotated_output_path(Path::new("/tmp/shots/screen.png"), &OutputSettings::default())
            .unwrap();
        assert_eq!(path, PathBuf::from("./annotated_screen.png"));
    }

    #[test]
    fn test_output_path_in_configured_dir() {
        let output = OutputSettings {
            prefix: "labeled-".to_string(),
            directory: Some(PathBuf::from("/var/out")),
        };
        let path = annotated_output_path(Path::new("shot.jpg"), &output).unwrap();
        assert_eq!(path, PathBuf::from("/var/out/labeled-shot.jpg"));
    }

    #[test]
    fn test_output_path_requires_file_name() {
        assert!(annotated_output_path(Path::new("/"), &OutputSettings::default()).is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("annotated_shot.png");

        let mut image = RgbImage::from_pixel(8, 4, Rgb([1, 2, 3]));
        image.put_pixel(7, 3, Rgb([239, 221, 136]));
        save_annotated(&image, &path).unwrap();

        let loaded = load_screenshot(&path).unwrap();
        assert_eq!(loaded.dimensions(), (8, 4));
        assert_eq!(*loaded.get_pixel(7, 3), Rgb([239, 221, 136]));
    }

    #[test]
    fn test_load_missing_screenshot() {
        assert!(load_screenshot(Path::new("/nonexistent/shot.png")).is_err());
    }

    #[test]
    fn test_default_config_path() {
        if let Ok(path) = default_config_path() {
            assert!(path.ends_with("config.toml"));
        }
    }
}
