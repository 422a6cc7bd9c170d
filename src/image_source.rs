use crate::error::{PfpError, Result};
use eframe::egui;
use image::io::Reader as ImageReader;
use image::RgbaImage;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extensions the decoder is built with.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "ico", "tif", "tiff"];

/// Where a candidate user image came from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Picked in the file dialog, dropped from the file manager, or named by
    /// clipboard text.
    Path(PathBuf),
    /// Dropped content that never touched the filesystem.
    Bytes {
        name: String,
        mime: Option<String>,
        bytes: Arc<[u8]>,
    },
    /// Raw pixels taken from the system clipboard.
    Pixels(RgbaImage),
}

impl ImageSource {
    pub fn name(&self) -> String {
        match self {
            ImageSource::Path(path) => path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            ImageSource::Bytes { name, .. } => name.clone(),
            ImageSource::Pixels(image) => format!("clipboard image {}x{}", image.width(), image.height()),
        }
    }

    /// Cheap check made before any decoding starts.
    pub fn validate(&self) -> Result<()> {
        let is_image = match self {
            ImageSource::Path(path) => is_image_file(path),
            ImageSource::Bytes { mime, bytes, .. } => {
                let mime_ok = mime
                    .as_deref()
                    .map(|m| m.is_empty() || m.starts_with("image/"))
                    .unwrap_or(true);
                mime_ok && image::guess_format(bytes).is_ok()
            }
            ImageSource::Pixels(_) => true,
        };

        if is_image {
            Ok(())
        } else {
            Err(PfpError::NotAnImage(self.name()))
        }
    }

    /// Decode into straight RGBA. Blocking; run it off the UI thread.
    pub fn decode(self) -> Result<RgbaImage> {
        match self {
            ImageSource::Path(path) => decode_file(&path),
            ImageSource::Bytes { bytes, .. } => {
                let image = ImageReader::new(Cursor::new(&bytes[..]))
                    .with_guessed_format()?
                    .decode()?;
                Ok(image.to_rgba8())
            }
            ImageSource::Pixels(image) => Ok(image),
        }
    }
}

/// Open an image file, trusting its contents over its extension.
pub fn decode_file(path: &Path) -> Result<RgbaImage> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image.to_rgba8())
}

/// Only the first file of a drop is used. A filesystem path wins over
/// in-memory bytes.
pub fn source_from_dropped(files: &[egui::DroppedFile]) -> Option<ImageSource> {
    let file = files.first()?;
    if let Some(path) = &file.path {
        return Some(ImageSource::Path(path.clone()));
    }

    file.bytes.as_ref().map(|bytes| ImageSource::Bytes {
        name: file.name.clone(),
        mime: (!file.mime.is_empty()).then(|| file.mime.clone()),
        bytes: bytes.clone(),
    })
}

/// Clipboard text counts only if it names an existing image file.
pub fn source_from_clipboard_text(text: &str) -> Option<ImageSource> {
    let path = Path::new(text.trim());
    if path.is_file() && is_image_file(path) {
        Some(ImageSource::Path(path.to_path_buf()))
    } else {
        None
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}
