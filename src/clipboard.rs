use crate::error::Result;
use crate::image_source::{source_from_clipboard_text, ImageSource};
use arboard::ImageData;
use image::RgbaImage;
use std::borrow::Cow;
use std::sync::{Arc, Mutex};

/// Lazily opened system clipboard shared between the UI and export tasks.
///
/// The handle is kept for the whole session because some X11 and Wayland
/// setups drop clipboard contents as soon as the owning handle goes away.
#[derive(Clone, Default)]
pub struct SharedClipboard {
    inner: Arc<Mutex<Option<arboard::Clipboard>>>,
}

impl SharedClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(
        &self,
        f: impl FnOnce(&mut arboard::Clipboard) -> std::result::Result<T, arboard::Error>,
    ) -> Result<T> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let clipboard = match guard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        let clipboard = guard.insert(clipboard);
        Ok(f(clipboard)?)
    }

    /// Put RGBA pixels on the clipboard. The platform backend offers them to
    /// other applications as PNG.
    pub fn write_image(&self, image: &RgbaImage) -> Result<()> {
        self.with(|clipboard| {
            clipboard.set_image(ImageData {
                width: image.width() as usize,
                height: image.height() as usize,
                bytes: Cow::Borrowed(image.as_raw()),
            })
        })
    }

    /// Whatever image the clipboard can offer: raw pixels first, then text
    /// naming an image file.
    pub fn read_source(&self) -> Option<ImageSource> {
        if let Ok(data) = self.with(|clipboard| clipboard.get_image()) {
            if let Some(image) =
                RgbaImage::from_raw(data.width as u32, data.height as u32, data.bytes.into_owned())
            {
                return Some(ImageSource::Pixels(image));
            }
        }

        let text = self.with(|clipboard| clipboard.get_text()).ok()?;
        source_from_clipboard_text(&text)
    }
}
