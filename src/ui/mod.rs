// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Desktop window: inspection page and history table

pub mod fade;
mod history_page;
mod main_page;
pub mod theme;

use egui::{ColorImage, TextureHandle, TextureOptions};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use self::fade::Fade;
use crate::config::AppearanceConfig;
use crate::history::HistoryRecord;
use crate::inspection::{Inspector, IMAGE_EXTENSIONS};
use crate::{AinspectError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Main,
    History,
}

pub struct InspectApp {
    inspector: Inspector,
    appearance: AppearanceConfig,
    page: Page,
    page_fade: Fade,
    result_fade: Option<Fade>,
    preview: Option<TextureHandle>,
    history_rows: Vec<HistoryRecord>,
    status: String,
}

impl InspectApp {
    pub fn new(cc: &eframe::CreationContext<'_>, mut inspector: Inspector, appearance: AppearanceConfig) -> Self {
        theme::apply(&cc.egui_ctx, &appearance);

        let ctx = cc.egui_ctx.clone();
        inspector.set_waker(move || ctx.request_repaint());

        let page_fade = Fade::start(Instant::now(), Duration::from_millis(appearance.fade_ms));
        Self {
            inspector,
            appearance,
            page: Page::Main,
            page_fade,
            result_fade: None,
            preview: None,
            history_rows: Vec::new(),
            status: String::new(),
        }
    }

    fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.appearance.fade_ms)
    }

    fn show_main(&mut self) {
        self.switch_to(Page::Main);
    }

    fn show_history(&mut self) {
        self.history_rows = self.inspector.history().load_all();
        debug!("Loaded {} history records", self.history_rows.len());
        self.switch_to(Page::History);
    }

    fn switch_to(&mut self, page: Page) {
        if self.page != page {
            self.page = page;
            self.page_fade = Fade::start(Instant::now(), self.fade_duration());
        }
    }

    fn select_image(&mut self) {
        if self.inspector.is_busy() {
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .set_title("Select an Image")
            .add_filter("Image Files", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        self.clear_result();
        match self.inspector.begin(path) {
            Ok(()) => self.status.clear(),
            Err(e) => {
                warn!("Cannot start inspection: {}", e);
                self.status = e.to_string();
            }
        }
    }

    fn clear_result(&mut self) {
        self.inspector.dismiss();
        self.preview = None;
        self.result_fade = None;
    }

    fn poll_inspection(&mut self, ctx: &egui::Context) {
        let Some(outcome) = self.inspector.poll() else {
            return;
        };

        self.preview = outcome.preview.as_ref().map(|preview| {
            let image = ColorImage::from_rgba_unmultiplied(preview.size, &preview.pixels);
            ctx.load_texture("inspection_preview", image, TextureOptions::LINEAR)
        });
        self.result_fade = Some(Fade::start(Instant::now(), self.fade_duration()));

        if self.page == Page::History {
            self.history_rows = self.inspector.history().load_all();
        }
    }

    fn animating(&self, now: Instant) -> bool {
        !self.page_fade.is_finished(now)
            || self.result_fade.map_or(false, |fade| !fade.is_finished(now))
    }
}

impl eframe::App for InspectApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_inspection(ctx);

        let now = Instant::now();
        if self.inspector.is_busy() || self.animating(now) {
            ctx.request_repaint();
        }

        let card = egui::Frame::none()
            .fill(theme::rgb(self.appearance.background).gamma_multiply(self.page_fade.opacity(now)))
            .rounding(20.0)
            .inner_margin(16.0)
            .outer_margin(12.0);

        egui::CentralPanel::default().show(ctx, |ui| {
            card.show(ui, |ui| {
                ui.set_min_size(ui.available_size());
                match self.page {
                    Page::Main => self.render_main(ui, now),
                    Page::History => self.render_history(ui),
                }
            });
        });
    }
}

/// Open the window and run until it is closed
pub fn run(inspector: Inspector, appearance: AppearanceConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(appearance.title.clone())
            .with_inner_size(appearance.window_size)
            .with_resizable(true),
        ..Default::default()
    };

    let title = appearance.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Box::new(InspectApp::new(cc, inspector, appearance))),
    )
    .map_err(|e| AinspectError::Ui(e.to_string()))
}
