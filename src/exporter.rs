use crate::clipboard::SharedClipboard;
use crate::compositor::{Compositor, Layers};
use crate::error::{PfpError, Result};
use crate::events::{RepaintSignal, TaskEvent};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};
use std::path::{Path, PathBuf};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

pub const DOWNLOAD_FILE_NAME: &str = "salt-shaker-pfp.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Clipboard,
    Download,
}

#[derive(Debug)]
pub struct ExportOutcome {
    pub target: ExportTarget,
    /// Saved file for downloads, `None` for the clipboard.
    pub result: Result<Option<PathBuf>>,
}

impl ExportOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Text for the toast shown to the user.
    pub fn message(&self) -> &'static str {
        match (self.target, self.is_success()) {
            (ExportTarget::Clipboard, true) => "Image copied to clipboard!",
            (ExportTarget::Clipboard, false) => "Failed to copy to clipboard",
            (ExportTarget::Download, true) => "Image downloaded!",
            (ExportTarget::Download, false) => "Failed to download image",
        }
    }
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// Encode and write `image` to `dir/salt-shaker-pfp.png`, replacing any
/// earlier download.
pub fn save_download(image: &RgbaImage, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(DOWNLOAD_FILE_NAME);
    std::fs::write(&path, encode_png(image)?)?;
    Ok(path)
}

/// Renders composites at export size and delivers them in the background.
pub struct Exporter {
    runtime: Handle,
    sender: mpsc::UnboundedSender<TaskEvent>,
    repaint: RepaintSignal,
    clipboard: SharedClipboard,
    download_dir: PathBuf,
    compositor: Compositor,
}

impl Exporter {
    pub fn new(
        runtime: Handle,
        sender: mpsc::UnboundedSender<TaskEvent>,
        repaint: RepaintSignal,
        clipboard: SharedClipboard,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            runtime,
            sender,
            repaint,
            clipboard,
            download_dir,
            compositor: Compositor::export(),
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Fire and forget. The outcome arrives later as [`TaskEvent::Export`].
    pub fn export(&self, target: ExportTarget, layers: Layers) {
        let sender = self.sender.clone();
        let repaint = self.repaint.clone();
        let clipboard = self.clipboard.clone();
        let download_dir = self.download_dir.clone();
        let compositor = self.compositor;

        log::info!("Exporting {}x{} composite to {:?}", compositor.width(), compositor.height(), target);
        self.runtime.spawn(async move {
            let work = tokio::task::spawn_blocking(move || -> Result<Option<PathBuf>> {
                let image = compositor.render(&layers);
                match target {
                    ExportTarget::Clipboard => {
                        clipboard.write_image(&image)?;
                        Ok(None)
                    }
                    ExportTarget::Download => save_download(&image, &download_dir).map(Some),
                }
            });
            let result = match work.await {
                Ok(result) => result,
                Err(e) => Err(PfpError::from(e)),
            };
            let _ = sender.send(TaskEvent::Export(ExportOutcome { target, result }));
            repaint();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::EXPORT_SIZE;
    use crate::events::no_repaint;
    use image::Rgba;
    use std::sync::Arc;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pfp-export-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn test_encode_png_round_trips_dimensions() {
        let bytes = encode_png(&RgbaImage::from_pixel(3, 5, Rgba([1, 2, 3, 4]))).expect("encode");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).expect("decode").to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 5));
        assert_eq!(*decoded.get_pixel(2, 4), Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn test_messages() {
        let ok = ExportOutcome {
            target: ExportTarget::Clipboard,
            result: Ok(None),
        };
        assert_eq!(ok.message(), "Image copied to clipboard!");

        let failed = ExportOutcome {
            target: ExportTarget::Download,
            result: Err(PfpError::NotAnImage("x".to_string())),
        };
        assert!(!failed.is_success());
        assert_eq!(failed.message(), "Failed to download image");
    }

    #[test]
    fn test_save_download_overwrites_fixed_name() {
        let dir = temp_dir("overwrite");
        let first = save_download(&RgbaImage::new(2, 2), &dir).expect("first save");
        let second = save_download(&RgbaImage::new(4, 4), &dir).expect("second save");

        assert_eq!(first, second);
        assert_eq!(first.file_name().and_then(|n| n.to_str()), Some(DOWNLOAD_FILE_NAME));
        let saved = image::open(&second).expect("open").to_rgba8();
        assert_eq!(saved.dimensions(), (4, 4));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_download_is_export_size() {
        let dir = temp_dir("download");
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let exporter = Exporter::new(
            Handle::current(),
            sender,
            no_repaint(),
            SharedClipboard::new(),
            dir.clone(),
        );
        let layers = Layers {
            user: Some(Arc::new(RgbaImage::from_pixel(300, 200, Rgba([0, 128, 0, 255])))),
            overlay: None,
        };

        exporter.export(ExportTarget::Download, layers);

        let path = match receiver.recv().await {
            Some(TaskEvent::Export(outcome)) => {
                assert_eq!(outcome.target, ExportTarget::Download);
                assert_eq!(outcome.message(), "Image downloaded!");
                outcome.result.expect("saved").expect("download path")
            }
            other => panic!("unexpected event {other:?}"),
        };

        let saved = image::open(&path).expect("open").to_rgba8();
        assert_eq!(saved.dimensions(), (EXPORT_SIZE, EXPORT_SIZE));
        assert_eq!(*saved.get_pixel(512, 512), Rgba([0, 128, 0, 255]));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_unwritable_download_reports_failure() {
        let blocker = temp_dir("blocked");
        std::fs::write(&blocker, b"a file where a directory should be").expect("write blocker");

        let (sender, mut receiver) = mpsc::unbounded_channel();
        let exporter = Exporter::new(
            Handle::current(),
            sender,
            no_repaint(),
            SharedClipboard::new(),
            blocker.join("nested"),
        );
        exporter.export(ExportTarget::Download, Layers::default());

        match receiver.recv().await {
            Some(TaskEvent::Export(outcome)) => {
                assert!(!outcome.is_success());
                assert_eq!(outcome.message(), "Failed to download image");
            }
            other => panic!("unexpected event {other:?}"),
        }

        let _ = std::fs::remove_file(&blocker);
    }
}
