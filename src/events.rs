use crate::error::PfpError;
use crate::exporter::ExportOutcome;
use image::RgbaImage;
use std::sync::Arc;

/// Wakes the UI after a background task has posted an event.
pub type RepaintSignal = Arc<dyn Fn() + Send + Sync>;

#[cfg(test)]
pub fn no_repaint() -> RepaintSignal {
    Arc::new(|| {})
}

/// Results sent from background tasks back to the UI thread.
#[derive(Debug)]
pub enum TaskEvent {
    UserImage {
        request: u64,
        name: String,
        result: Result<RgbaImage, PfpError>,
    },
    Overlay(Result<RgbaImage, PfpError>),
    Export(ExportOutcome),
}
