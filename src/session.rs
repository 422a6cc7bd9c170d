use crate::compositor::{Compositor, Layers};
use image::RgbaImage;
use std::sync::Arc;

/// Whether the user has supplied an image yet. There is no way back to
/// `Empty` once an image has loaded; a new image only replaces the old one.
#[derive(Debug, Clone, Default)]
pub enum Composition {
    #[default]
    Empty,
    Loaded(Arc<RgbaImage>),
}

#[derive(Debug)]
pub struct Session {
    composition: Composition,
    overlay: Option<Arc<RgbaImage>>,
    dirty: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            composition: Composition::Empty,
            overlay: None,
            // The placeholder still has to be drawn once.
            dirty: true,
        }
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.composition, Composition::Loaded(_))
    }

    pub fn user_image(&self) -> Option<&Arc<RgbaImage>> {
        match &self.composition {
            Composition::Loaded(image) => Some(image),
            Composition::Empty => None,
        }
    }

    pub fn overlay(&self) -> Option<&Arc<RgbaImage>> {
        self.overlay.as_ref()
    }

    /// Empty -> Loaded, or Loaded -> Loaded with the new image.
    pub fn load_user_image(&mut self, image: RgbaImage) {
        log::info!("User image loaded ({}x{})", image.width(), image.height());
        self.composition = Composition::Loaded(Arc::new(image));
        self.dirty = true;
    }

    pub fn set_overlay(&mut self, image: RgbaImage) {
        log::info!("Overlay loaded ({}x{})", image.width(), image.height());
        self.overlay = Some(Arc::new(image));
        self.dirty = true;
    }

    pub fn layers(&self) -> Layers {
        Layers {
            user: self.user_image().cloned(),
            overlay: self.overlay.clone(),
        }
    }

    pub fn render(&self, compositor: &Compositor) -> RgbaImage {
        compositor.render(&self.layers())
    }

    /// Returns true once after every state change.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::BACKGROUND;
    use image::Rgba;

    #[test]
    fn test_starts_empty_and_dirty() {
        let mut session = Session::new();
        assert!(!session.is_loaded());
        assert!(session.user_image().is_none());
        assert!(session.take_dirty());
        assert!(!session.take_dirty());
    }

    #[test]
    fn test_load_transitions_to_loaded() {
        let mut session = Session::new();
        session.take_dirty();

        session.load_user_image(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255])));
        assert!(session.is_loaded());
        assert!(session.take_dirty());
        assert_eq!(session.user_image().map(|img| img.dimensions()), Some((2, 2)));
    }

    #[test]
    fn test_new_image_replaces_old() {
        let mut session = Session::new();
        session.load_user_image(RgbaImage::new(2, 2));
        session.load_user_image(RgbaImage::new(5, 3));

        assert!(matches!(session.composition(), Composition::Loaded(img) if img.dimensions() == (5, 3)));
    }

    #[test]
    fn test_overlay_marks_dirty_without_loading() {
        let mut session = Session::new();
        session.take_dirty();

        session.set_overlay(RgbaImage::new(4, 4));
        assert!(session.take_dirty());
        assert!(!session.is_loaded());
        assert!(session.overlay().is_some());
    }

    #[test]
    fn test_layers_share_image_handles() {
        let mut session = Session::new();
        session.load_user_image(RgbaImage::new(2, 2));
        let layers = session.layers();

        let (Some(held), Some(snapshot)) = (session.user_image(), layers.user.as_ref()) else {
            panic!("expected a user image in both");
        };
        assert!(Arc::ptr_eq(held, snapshot));
        assert!(layers.overlay.is_none());
    }

    #[test]
    fn test_empty_render_is_placeholder() {
        let session = Session::new();
        let canvas = session.render(&Compositor::new(3, 3));
        assert!(canvas.pixels().all(|p| *p == BACKGROUND));
    }
}
