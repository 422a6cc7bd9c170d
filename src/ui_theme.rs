use crate::notification::ToastKind;
use eframe::egui::{self, Color32, FontFamily, FontId, Rounding, Shadow, Stroke, Vec2};

/// Hard-edged pink-on-black look: square corners, solid offset shadows.
pub struct PixelTheme {
    // Colors
    pub background: Color32,
    pub surface: Color32,
    pub canvas_border: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_on_accent: Color32,
    pub accent: Color32,
    pub accent_hover: Color32,
    pub error: Color32,
    pub outline: Color32,

    // Spacing
    pub spacing_small: f32,
    pub spacing_medium: f32,
    pub spacing_large: f32,
    pub padding_medium: f32,
    pub padding_large: f32,

    // Borders
    pub border_width: f32,
    pub radius: Rounding,

    // Shadows
    pub shadow_block: Shadow,

    // Typography
    pub font_small: FontId,
    pub font_medium: FontId,
    pub font_title: FontId,
}

impl Default for PixelTheme {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(16, 16, 16),       // #101010
            surface: Color32::from_rgb(34, 34, 34),
            canvas_border: Color32::from_rgb(51, 51, 51),    // #333
            text_primary: Color32::from_rgb(255, 255, 255),
            text_secondary: Color32::from_rgb(180, 180, 180),
            text_on_accent: Color32::from_rgb(16, 16, 16),
            accent: Color32::from_rgb(255, 123, 152),         // #ff7b98
            accent_hover: Color32::from_rgb(255, 150, 173),
            error: Color32::from_rgb(255, 80, 80),
            outline: Color32::BLACK,

            spacing_small: 4.0,
            spacing_medium: 8.0,
            spacing_large: 16.0,
            padding_medium: 10.0,
            padding_large: 16.0,

            border_width: 3.0,
            radius: Rounding::ZERO,

            shadow_block: Shadow {
                offset: Vec2::new(3.0, 3.0),
                blur: 0.0,
                spread: 0.0,
                color: Color32::BLACK,
            },

            font_small: FontId::new(11.0, FontFamily::Monospace),
            font_medium: FontId::new(14.0, FontFamily::Monospace),
            font_title: FontId::new(22.0, FontFamily::Monospace),
        }
    }
}

impl PixelTheme {
    pub fn apply_to_ctx(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        style.visuals.panel_fill = self.background;
        style.visuals.window_fill = self.background;
        style.visuals.window_rounding = self.radius;
        style.visuals.window_stroke = Stroke::new(1.0, self.background);

        // Buttons
        style.visuals.button_frame = true;
        style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_on_accent);
        style.visuals.widgets.inactive.weak_bg_fill = self.accent;
        style.visuals.widgets.inactive.bg_fill = self.accent;
        style.visuals.widgets.inactive.rounding = self.radius;
        style.visuals.widgets.inactive.bg_stroke = Stroke::new(self.border_width, self.outline);

        style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_on_accent);
        style.visuals.widgets.hovered.weak_bg_fill = self.accent_hover;
        style.visuals.widgets.hovered.bg_fill = self.accent_hover;
        style.visuals.widgets.hovered.rounding = self.radius;
        style.visuals.widgets.hovered.bg_stroke = Stroke::new(self.border_width, self.outline);

        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_on_accent);
        style.visuals.widgets.active.weak_bg_fill = self.accent;
        style.visuals.widgets.active.bg_fill = self.accent;
        style.visuals.widgets.active.rounding = self.radius;
        style.visuals.widgets.active.bg_stroke = Stroke::new(self.border_width, self.outline);

        style.visuals.selection.bg_fill = self.accent;
        style.visuals.selection.stroke = Stroke::new(1.0, self.accent);
        style.visuals.hyperlink_color = self.accent;

        style.text_styles = [
            (egui::TextStyle::Heading, self.font_title.clone()),
            (egui::TextStyle::Body, self.font_medium.clone()),
            (egui::TextStyle::Monospace, self.font_medium.clone()),
            (egui::TextStyle::Button, self.font_medium.clone()),
            (egui::TextStyle::Small, self.font_small.clone()),
        ]
        .into();

        ctx.set_style(style);
    }

    /// Border around the canvas; highlighted while a file is dragged over.
    pub fn canvas_stroke(&self, drag_hover: bool) -> Stroke {
        let color = if drag_hover { self.accent } else { self.canvas_border };
        Stroke::new(self.border_width, color)
    }

    pub fn toast_frame(&self, kind: ToastKind) -> egui::Frame {
        let fill = match kind {
            ToastKind::Success => self.accent,
            ToastKind::Error => self.error,
        };
        egui::Frame {
            inner_margin: egui::Margin::symmetric(self.padding_large, self.padding_medium),
            rounding: self.radius,
            shadow: self.shadow_block,
            fill,
            stroke: Stroke::new(self.border_width, self.outline),
            ..Default::default()
        }
    }
}
