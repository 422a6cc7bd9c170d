use crate::error::Result;
use crate::events::{RepaintSignal, TaskEvent};
use crate::image_source::{decode_file, ImageSource};
use std::path::PathBuf;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Starts image decodes on the runtime and posts the results as
/// [`TaskEvent`]s.
///
/// Requests are never cancelled. If several are in flight, whichever finishes
/// last is the one the UI ends up showing.
pub struct ImageLoader {
    runtime: Handle,
    sender: mpsc::UnboundedSender<TaskEvent>,
    repaint: RepaintSignal,
    next_request: u64,
}

impl ImageLoader {
    pub fn new(
        runtime: Handle,
        sender: mpsc::UnboundedSender<TaskEvent>,
        repaint: RepaintSignal,
    ) -> Self {
        Self {
            runtime,
            sender,
            repaint,
            next_request: 0,
        }
    }

    /// Id of the most recent user-image request, 0 if none was made.
    pub fn latest_request(&self) -> u64 {
        self.next_request
    }

    /// Validate `source` now and decode it in the background.
    ///
    /// A source that is not an image fails here, before any task is spawned.
    pub fn load_user_image(&mut self, source: ImageSource) -> Result<u64> {
        source.validate()?;

        self.next_request += 1;
        let request = self.next_request;
        let name = source.name();
        let sender = self.sender.clone();
        let repaint = self.repaint.clone();

        log::info!("Decoding {} (request {})", name, request);
        self.runtime.spawn(async move {
            let result = match tokio::task::spawn_blocking(move || source.decode()).await {
                Ok(result) => result,
                Err(e) => Err(e.into()),
            };
            let _ = sender.send(TaskEvent::UserImage {
                request,
                name,
                result,
            });
            repaint();
        });

        Ok(request)
    }

    pub fn load_overlay(&self, path: PathBuf) {
        let sender = self.sender.clone();
        let repaint = self.repaint.clone();

        log::debug!("Loading overlay from {}", path.display());
        self.runtime.spawn(async move {
            let result = match tokio::task::spawn_blocking(move || decode_file(&path)).await {
                Ok(result) => result,
                Err(e) => Err(e.into()),
            };
            let _ = sender.send(TaskEvent::Overlay(result));
            repaint();
        });
    }
}
