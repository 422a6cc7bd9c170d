/// Crop window in source pixels, unrounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Largest centered window of the source that has the target's aspect ratio.
///
/// Wider sources lose their left and right edges, taller ones lose top and
/// bottom. Equal aspects return the whole source. Inputs must be positive and
/// finite.
pub fn compute_cover_rect(
    source_width: f64,
    source_height: f64,
    target_width: f64,
    target_height: f64,
) -> CropRect {
    let source_aspect = source_width / source_height;
    let target_aspect = target_width / target_height;

    if source_aspect > target_aspect {
        let width = source_height * target_aspect;
        CropRect {
            x: (source_width - width) / 2.0,
            y: 0.0,
            width,
            height: source_height,
        }
    } else {
        let height = source_width / target_aspect;
        CropRect {
            x: 0.0,
            y: (source_height - height) / 2.0,
            width: source_width,
            height,
        }
    }
}
