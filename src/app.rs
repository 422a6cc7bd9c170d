use crate::clipboard::SharedClipboard;
use crate::compositor::{Compositor, PREVIEW_SIZE};
use crate::config::AppConfig;
use crate::error::PfpError;
use crate::events::{RepaintSignal, TaskEvent};
use crate::exporter::{ExportTarget, Exporter};
use crate::image_source::{source_from_dropped, ImageSource};
use crate::loader::ImageLoader;
use crate::notification::{Notifications, ToastKind};
use crate::session::Session;
use crate::ui_theme::PixelTheme;
use eframe::egui::{self, Color32, Sense};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

const DROP_HINT: &str = "Click, drop or paste an image";
const REJECTED_MESSAGE: &str = "Please select an image file.";
const DIALOG_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "ico", "tif", "tiff"];

pub struct PfpApp {
    // Configuration
    config: AppConfig,
    config_path: PathBuf,

    // Canvas state
    session: Session,
    preview: Compositor,
    texture: Option<egui::TextureHandle>,
    drag_hover: bool,
    paste_shortcut: PasteShortcut,

    // Background work
    loader: ImageLoader,
    exporter: Exporter,
    clipboard: SharedClipboard,
    events: mpsc::UnboundedReceiver<TaskEvent>,

    // UI
    notifications: Notifications,
    theme: PixelTheme,

    // Runtime, kept alive for the tasks spawned above
    _runtime: tokio::runtime::Runtime,
}

impl PfpApp {
    pub fn new(cc: &eframe::CreationContext<'_>, runtime: tokio::runtime::Runtime) -> Self {
        let (sender, events) = mpsc::unbounded_channel::<TaskEvent>();
        let ctx = cc.egui_ctx.clone();
        let repaint: RepaintSignal = Arc::new(move || ctx.request_repaint());

        let config_path = AppConfig::default_path();
        let config = AppConfig::load(&config_path).unwrap_or_default();

        let clipboard = SharedClipboard::new();
        let loader = ImageLoader::new(runtime.handle().clone(), sender.clone(), repaint.clone());
        let exporter = Exporter::new(
            runtime.handle().clone(),
            sender,
            repaint,
            clipboard.clone(),
            config.download_dir(),
        );

        loader.load_overlay(config.resolve_overlay_path());

        let theme = PixelTheme::default();
        theme.apply_to_ctx(&cc.egui_ctx);

        Self {
            config,
            config_path,
            session: Session::new(),
            preview: Compositor::preview(),
            texture: None,
            drag_hover: false,
            paste_shortcut: PasteShortcut::default(),
            loader,
            exporter,
            clipboard,
            events,
            notifications: Notifications::default(),
            theme,
            _runtime: runtime,
        }
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save(&self.config_path) {
            log::error!("Failed to save config to {}: {}", self.config_path.display(), e);
        }
    }

    /// Validate and start decoding. Non-images stop here with an alert and
    /// leave the canvas as it was.
    fn submit(&mut self, source: ImageSource) {
        match self.loader.load_user_image(source) {
            Ok(_) => {}
            Err(PfpError::NotAnImage(name)) => {
                log::warn!("Rejected non-image input: {}", name);
                show_rejection_alert();
            }
            Err(e) => log::error!("Could not start loading image: {}", e),
        }
    }

    fn open_file_dialog(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Choose an image")
            .add_filter("Images", DIALOG_EXTENSIONS);
        if let Some(dir) = &self.config.last_open_dir {
            dialog = dialog.set_directory(dir);
        }

        if let Some(path) = dialog.pick_file() {
            if let Some(parent) = path.parent() {
                self.config.last_open_dir = Some(parent.to_path_buf());
                self.save_config();
            }
            self.submit(ImageSource::Path(path));
        }
    }

    fn paste_from_clipboard(&mut self) {
        match self.clipboard.read_source() {
            Some(source) => self.submit(source),
            None => log::debug!("Paste ignored: clipboard holds no image"),
        }
    }

    fn export(&self, target: ExportTarget) {
        self.exporter.export(target, self.session.layers());
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                TaskEvent::UserImage {
                    request,
                    name,
                    result,
                } => match result {
                    Ok(image) => {
                        if request < self.loader.latest_request() {
                            log::debug!(
                                "Request {} ({}) finished after newer request {}; showing it anyway",
                                request,
                                name,
                                self.loader.latest_request()
                            );
                        }
                        self.session.load_user_image(image);
                    }
                    Err(e) => {
                        log::error!("Failed to decode {}: {}", name, e);
                        self.notifications.push("Failed to load image", ToastKind::Error);
                    }
                },
                TaskEvent::Overlay(result) => match result {
                    Ok(image) => self.session.set_overlay(image),
                    Err(e) => log::warn!("Overlay image not found, continuing without overlay: {}", e),
                },
                TaskEvent::Export(outcome) => {
                    match &outcome.result {
                        Ok(Some(path)) => log::info!("Saved composite to {}", path.display()),
                        Ok(None) => log::info!("Copied composite to clipboard"),
                        Err(e) => log::error!("Export to {:?} failed: {}", outcome.target, e),
                    }
                    let kind = if outcome.is_success() {
                        ToastKind::Success
                    } else {
                        ToastKind::Error
                    };
                    self.notifications.push(outcome.message(), kind);
                }
            }
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));
        self.drag_hover = hovering;

        if let Some(source) = source_from_dropped(&dropped) {
            self.submit(source);
        }

        let pasted = ctx.input(|i| self.paste_shortcut.observe(&i.events));
        if pasted {
            self.paste_from_clipboard();
        }
    }

    fn refresh_preview(&mut self, ctx: &egui::Context) {
        let pixels = self.session.render(&self.preview);
        let size = [pixels.width() as usize, pixels.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_raw());

        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("pfp-preview", image, egui::TextureOptions::NEAREST));
            }
        }
    }
}

impl eframe::App for PfpApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.handle_input(ctx);

        if self.session.take_dirty() {
            self.refresh_preview(ctx);
        }

        let now = Instant::now();
        self.notifications.prune(now);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(self.theme.spacing_large);
                ui.label(
                    egui::RichText::new("SALT SHAKER PFP")
                        .font(self.theme.font_title.clone())
                        .color(self.theme.accent),
                );
                ui.add_space(self.theme.spacing_large);

                self.show_canvas(ui);

                ui.add_space(self.theme.spacing_large);
                self.show_action_buttons(ui);
            });
        });

        self.show_notifications(ctx);

        if let Some(wait) = self.notifications.next_expiry(now) {
            ctx.request_repaint_after(wait);
        }
    }
}

impl PfpApp {
    fn show_canvas(&mut self, ui: &mut egui::Ui) {
        let size = egui::vec2(PREVIEW_SIZE as f32, PREVIEW_SIZE as f32);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());
        let painter = ui.painter_at(rect.expand(self.theme.border_width));

        match &self.texture {
            Some(texture) => {
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture.id(), rect, uv, Color32::WHITE);
            }
            None => {
                painter.rect_filled(rect, 0.0, self.theme.surface);
            }
        }

        if !self.session.is_loaded() {
            painter.rect_filled(rect, 0.0, Color32::from_black_alpha(140));
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                DROP_HINT,
                self.theme.font_medium.clone(),
                self.theme.text_primary,
            );
        }

        painter.rect_stroke(
            rect.expand(self.theme.border_width / 2.0),
            self.theme.radius,
            self.theme.canvas_stroke(self.drag_hover),
        );

        let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);
        if response.clicked() {
            self.open_file_dialog();
        }
    }

    fn show_action_buttons(&mut self, ui: &mut egui::Ui) {
        let button_size = egui::vec2(120.0, 32.0);
        let total = button_size.x * 3.0 + self.theme.spacing_medium * 2.0;

        ui.allocate_ui_with_layout(
            egui::vec2(total, button_size.y),
            egui::Layout::left_to_right(egui::Align::Center),
            |ui| {
                ui.spacing_mut().item_spacing.x = self.theme.spacing_medium;

                if ui.add_sized(button_size, egui::Button::new("Copy")).clicked() {
                    self.export(ExportTarget::Clipboard);
                }
                if ui.add_sized(button_size, egui::Button::new("Download")).clicked() {
                    self.export(ExportTarget::Download);
                }
                if ui.add_sized(button_size, egui::Button::new("Paste")).clicked() {
                    self.paste_from_clipboard();
                }
            },
        );

        ui.add_space(self.theme.spacing_medium);
        ui.label(
            egui::RichText::new(format!("Downloads go to {}", self.exporter.download_dir().display()))
                .font(self.theme.font_small.clone())
                .color(self.theme.text_secondary),
        );
    }

    fn show_notifications(&self, ctx: &egui::Context) {
        if self.notifications.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("pfp-toasts"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-20.0, 20.0))
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                for toast in self.notifications.active() {
                    self.theme.toast_frame(toast.kind).show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(&toast.message)
                                .font(self.theme.font_small.clone())
                                .color(self.theme.text_on_accent),
                        );
                    });
                    ui.add_space(self.theme.spacing_small);
                }
            });
    }
}

/// Detects the paste shortcut in a frame's input events.
///
/// egui-winit swallows the Cmd/Ctrl+V press and only emits `Event::Paste`
/// when the clipboard holds text. The key release still comes through, so
/// an image-only clipboard is pasted when V is released.
#[derive(Debug, Default)]
struct PasteShortcut {
    handled_by_event: bool,
}

impl PasteShortcut {
    fn observe(&mut self, events: &[egui::Event]) -> bool {
        let mut paste = false;
        for event in events {
            match event {
                egui::Event::Paste(_) => {
                    paste = true;
                    self.handled_by_event = true;
                }
                egui::Event::Key {
                    key: egui::Key::V,
                    pressed: false,
                    modifiers,
                    ..
                } => {
                    let already_pasted = std::mem::take(&mut self.handled_by_event);
                    if modifiers.command && !already_pasted {
                        paste = true;
                    }
                }
                _ => {}
            }
        }
        paste
    }
}

fn show_rejection_alert() {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title("Not an image")
        .set_description(REJECTED_MESSAGE)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
