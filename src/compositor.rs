use crate::cover_fit::{compute_cover_rect, CropRect};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::sync::Arc;

/// Edge length of the on-screen preview canvas.
pub const PREVIEW_SIZE: u32 = 400;
/// Edge length of copied and downloaded images.
pub const EXPORT_SIZE: u32 = 1024;

pub const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[derive(Debug, Clone, Default)]
pub struct Layers {
    pub user: Option<Arc<RgbaImage>>,
    pub overlay: Option<Arc<RgbaImage>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compositor {
    width: u32,
    height: u32,
}

impl Compositor {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn preview() -> Self {
        Self::new(PREVIEW_SIZE, PREVIEW_SIZE)
    }

    pub fn export() -> Self {
        Self::new(EXPORT_SIZE, EXPORT_SIZE)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Clear to black, cover-fit the user image, then stretch the overlay
    /// across the whole canvas.
    pub fn render(&self, layers: &Layers) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);

        if let Some(user) = layers.user.as_deref() {
            draw_cover(&mut canvas, user);
        }

        if let Some(overlay) = layers.overlay.as_deref() {
            draw_stretched(&mut canvas, overlay);
        }

        canvas
    }
}

/// Blend the cover-fit crop of `source` over the whole canvas.
pub fn draw_cover(canvas: &mut RgbaImage, source: &RgbaImage) {
    if source.width() == 0 || source.height() == 0 {
        return;
    }

    let crop = compute_cover_rect(
        source.width() as f64,
        source.height() as f64,
        canvas.width() as f64,
        canvas.height() as f64,
    );
    let scaled = sample_nearest(source, crop, canvas.width(), canvas.height());
    imageops::overlay(canvas, &scaled, 0, 0);
}

/// Blend `source` scaled to the canvas size, ignoring its aspect ratio.
pub fn draw_stretched(canvas: &mut RgbaImage, source: &RgbaImage) {
    if source.width() == 0 || source.height() == 0 {
        return;
    }

    if source.dimensions() == canvas.dimensions() {
        imageops::overlay(canvas, source, 0, 0);
    } else {
        let scaled = imageops::resize(source, canvas.width(), canvas.height(), FilterType::Nearest);
        imageops::overlay(canvas, &scaled, 0, 0);
    }
}

/// Scale the `crop` window of `source` to `width` x `height` without
/// interpolation. Each destination pixel takes the source pixel under its
/// centre.
pub fn sample_nearest(source: &RgbaImage, crop: CropRect, width: u32, height: u32) -> RgbaImage {
    let max_x = source.width().saturating_sub(1);
    let max_y = source.height().saturating_sub(1);
    let step_x = crop.width / width as f64;
    let step_y = crop.height / height as f64;

    let columns: Vec<u32> = (0..width)
        .map(|dx| source_index(crop.x, step_x, dx, max_x))
        .collect();

    let mut out = RgbaImage::new(width, height);
    for dy in 0..height {
        let sy = source_index(crop.y, step_y, dy, max_y);
        for (dx, &sx) in columns.iter().enumerate() {
            out.put_pixel(dx as u32, dy, *source.get_pixel(sx, sy));
        }
    }
    out
}

fn source_index(origin: f64, step: f64, dest: u32, max: u32) -> u32 {
    let pos = (origin + (dest as f64 + 0.5) * step).floor();
    if pos <= 0.0 {
        0
    } else {
        (pos as u32).min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn striped(columns: &[Rgba<u8>], height: u32) -> RgbaImage {
        RgbaImage::from_fn(columns.len() as u32, height, |x, _| columns[x as usize])
    }

    #[test]
    fn test_empty_layers_render_black() {
        let canvas = Compositor::new(8, 8).render(&Layers::default());
        assert_eq!(canvas.dimensions(), (8, 8));
        assert!(canvas.pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn test_wide_source_keeps_centre_columns() {
        // 4x2 source cover-fits to columns 1..3 on a square canvas.
        let source = striped(&[RED, GREEN, BLUE, WHITE], 2);
        let layers = Layers {
            user: Some(Arc::new(source)),
            overlay: None,
        };
        let canvas = Compositor::new(2, 2).render(&layers);

        assert_eq!(*canvas.get_pixel(0, 0), GREEN);
        assert_eq!(*canvas.get_pixel(1, 0), BLUE);
        assert_eq!(*canvas.get_pixel(0, 1), GREEN);
        assert_eq!(*canvas.get_pixel(1, 1), BLUE);
    }

    #[test]
    fn test_tall_source_keeps_centre_rows() {
        let rows = [RED, GREEN, BLUE, WHITE];
        let source = RgbaImage::from_fn(2, 4, |_, y| rows[y as usize]);
        let layers = Layers {
            user: Some(Arc::new(source)),
            overlay: None,
        };
        let canvas = Compositor::new(4, 4).render(&layers);

        assert_eq!(*canvas.get_pixel(0, 0), GREEN);
        assert_eq!(*canvas.get_pixel(3, 1), GREEN);
        assert_eq!(*canvas.get_pixel(0, 2), BLUE);
        assert_eq!(*canvas.get_pixel(3, 3), BLUE);
    }

    #[test]
    fn test_upscale_has_hard_edges() {
        let source = striped(&[RED, BLUE], 2);
        let scaled = sample_nearest(
            &source,
            compute_cover_rect(2.0, 2.0, 6.0, 6.0),
            6,
            6,
        );

        for y in 0..6 {
            for x in 0..3 {
                assert_eq!(*scaled.get_pixel(x, y), RED);
            }
            for x in 3..6 {
                assert_eq!(*scaled.get_pixel(x, y), BLUE);
            }
        }
    }

    #[test]
    fn test_overlay_drawn_on_top_of_user_image() {
        let user = RgbaImage::from_pixel(3, 3, RED);
        let overlay = RgbaImage::from_fn(2, 2, |x, y| if x == 0 && y == 0 { WHITE } else { CLEAR });
        let layers = Layers {
            user: Some(Arc::new(user)),
            overlay: Some(Arc::new(overlay)),
        };
        let canvas = Compositor::new(4, 4).render(&layers);

        assert_eq!(*canvas.get_pixel(0, 0), WHITE);
        assert_eq!(*canvas.get_pixel(1, 1), WHITE);
        assert_eq!(*canvas.get_pixel(3, 3), RED);
        assert_eq!(*canvas.get_pixel(3, 0), RED);
    }

    #[test]
    fn test_overlay_without_user_image() {
        let overlay = RgbaImage::from_fn(2, 2, |x, _| if x == 1 { GREEN } else { CLEAR });
        let layers = Layers {
            user: None,
            overlay: Some(Arc::new(overlay)),
        };
        let canvas = Compositor::new(4, 4).render(&layers);

        assert_eq!(*canvas.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*canvas.get_pixel(3, 3), GREEN);
    }

    #[test]
    fn test_missing_overlay_leaves_only_user_image() {
        let user = RgbaImage::from_pixel(10, 5, BLUE);
        let layers = Layers {
            user: Some(Arc::new(user)),
            overlay: None,
        };
        let canvas = Compositor::preview().render(&layers);
        assert!(canvas.pixels().all(|p| *p == BLUE));
    }

    #[test]
    fn test_transparent_user_pixels_show_background() {
        let user = RgbaImage::from_pixel(2, 2, CLEAR);
        let layers = Layers {
            user: Some(Arc::new(user)),
            overlay: None,
        };
        let canvas = Compositor::new(2, 2).render(&layers);
        assert!(canvas.pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn test_export_size_is_fixed() {
        let layers = Layers {
            user: Some(Arc::new(RgbaImage::from_pixel(37, 91, RED))),
            overlay: Some(Arc::new(RgbaImage::from_pixel(400, 400, CLEAR))),
        };
        let preview = Compositor::preview().render(&layers);
        let export = Compositor::export().render(&layers);

        assert_eq!(preview.dimensions(), (PREVIEW_SIZE, PREVIEW_SIZE));
        assert_eq!(export.dimensions(), (EXPORT_SIZE, EXPORT_SIZE));
    }
}
