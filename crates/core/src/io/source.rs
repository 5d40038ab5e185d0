//! Directory-backed image sources and overlay output

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::ImageFormat;
use tracing::debug;

use crate::bands::RgbBands;
use crate::error::{Error, Result};
use crate::io::write_atomic;
use crate::sample::{CaptureKey, ImageSource, OverlaySink};

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A photo on disk. Pixels are decoded only when [`ImageSource::load`] is called.
#[derive(Debug, Clone)]
pub struct ImageFile {
    id: String,
    path: PathBuf,
}

impl ImageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { id, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for ImageFile {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<RgbBands> {
        read_rgb(&self.path).map_err(|e| match e {
            Error::Decode { reason, .. } => Error::Decode {
                id: self.id.clone(),
                reason,
            },
            other => Error::decode(&self.id, other),
        })
    }

    fn modified(&self) -> Option<CaptureKey> {
        let mtime = fs::metadata(&self.path).ok()?.modified().ok()?;
        Some(DateTime::<Local>::from(mtime).naive_local())
    }
}

/// List the photos in `dir` (`.jpg`, `.jpeg`, `.png`, any case).
///
/// The returned order is unspecified; use [`crate::ordering::order_samples`].
pub fn scan_image_dir(dir: &Path) -> Result<Vec<ImageFile>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()));
        if is_image {
            files.push(ImageFile::new(path));
        } else {
            debug!("Ignoring non-image file {}", path.display());
        }
    }
    Ok(files)
}

/// Decode an image file into RGB bands.
pub fn read_rgb(path: &Path) -> Result<RgbBands> {
    let id = path.display().to_string();
    let img = image::open(path).map_err(|e| Error::decode(&id, e))?;
    RgbBands::from_rgb_image(&img.to_rgb8())
}

/// Encode RGB bands to `path`, format chosen by extension, replacing atomically.
pub fn write_rgb(path: &Path, bands: &RgbBands) -> Result<()> {
    let format = ImageFormat::from_path(path).map_err(|e| Error::InvalidParameter {
        name: "path",
        value: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let img = bands.to_rgb_image()?;
    write_atomic(path, |file| {
        let mut writer = BufWriter::new(file);
        img.write_to(&mut writer, format)
            .map_err(|e| Error::Other(format!("Cannot encode {}: {e}", path.display())))?;
        writer.flush()?;
        Ok(())
    })
}

/// Writes each overlay to `<dir>/<id>`, creating `dir` on first use.
#[derive(Debug, Clone)]
pub struct OverlayDir {
    dir: PathBuf,
}

impl OverlayDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(id)
    }
}

impl OverlaySink for OverlayDir {
    fn write_overlay(&self, id: &str, image: &RgbBands) -> Result<()> {
        write_rgb(&self.path_for(id), image)
    }
}
