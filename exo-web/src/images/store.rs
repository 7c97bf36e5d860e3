//! Image directory listing and display rendering

use super::convert;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Recognized source formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Tiff,
    Png,
    Jpeg,
}

impl SourceFormat {
    /// Detect the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "tif" | "tiff" => Some(SourceFormat::Tiff),
            "png" => Some(SourceFormat::Png),
            "jpg" | "jpeg" => Some(SourceFormat::Jpeg),
            _ => None,
        }
    }

    /// Whether browsers can display this format without conversion
    pub fn is_browser_native(self) -> bool {
        !matches!(self, SourceFormat::Tiff)
    }

    /// Content type of the bytes served for this format
    pub fn display_content_type(self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "image/jpeg",
            SourceFormat::Png | SourceFormat::Tiff => "image/png",
        }
    }
}

/// One source image available for comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// File name, used as the identifier everywhere
    pub id: String,
    pub path: PathBuf,
    pub format: SourceFormat,
}

/// Browser-displayable image bytes
#[derive(Debug, Clone)]
pub struct DisplayImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Read-only view over the flat source image directory
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List every recognized image in the directory, sorted by id
    ///
    /// The directory is rescanned on every call so files added while the
    /// server runs are picked up.
    pub fn list_assets(&self) -> Result<Vec<ImageAsset>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            Error::StoreUnavailable(format!("{}: {}", self.dir.display(), e))
        })?;

        let mut assets = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Error::StoreUnavailable(format!("{}: {}", self.dir.display(), e))
            })?;
            let path = entry.path();

            let Some(id) = entry.file_name().to_str().map(str::to_string) else {
                debug!("Skipping non UTF-8 file name: {}", path.display());
                continue;
            };
            if id.starts_with('.') {
                continue;
            }
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let Some(format) = SourceFormat::from_path(&path) else {
                continue;
            };

            assets.push(ImageAsset { id, path, format });
        }

        assets.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(assets)
    }

    /// Look up one asset by id in the current listing
    ///
    /// Ids are only ever matched against the listing, never joined onto
    /// the directory path, so `../` style ids cannot escape it.
    pub fn find(&self, id: &str) -> Result<ImageAsset> {
        self.list_assets()?
            .into_iter()
            .find(|asset| asset.id == id)
            .ok_or_else(|| Error::AssetNotFound(id.to_string()))
    }

    /// Produce displayable bytes for an asset
    ///
    /// PNG and JPEG are served as stored; TIFF is converted to PNG on
    /// every request.
    pub fn render_for_display(&self, id: &str) -> Result<DisplayImage> {
        let asset = self.find(id)?;

        let bytes = fs::read(&asset.path).map_err(|e| Error::ConversionError {
            id: asset.id.clone(),
            reason: e.to_string(),
        })?;

        let bytes = if asset.format.is_browser_native() {
            bytes
        } else {
            debug!("Converting {} to PNG", asset.id);
            convert::to_png(&bytes).map_err(|e| Error::ConversionError {
                id: asset.id.clone(),
                reason: e.to_string(),
            })?
        };

        Ok(DisplayImage {
            bytes,
            content_type: asset.format.display_content_type(),
        })
    }
}
