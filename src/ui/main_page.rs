// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

use egui::{Align, Color32, Layout, RichText};
use std::time::Instant;

use super::{theme, InspectApp};
use crate::history::Authenticity;
use crate::inspection::{InspectionOutcome, InspectionState};

impl InspectApp {
    pub(super) fn render_main(&mut self, ui: &mut egui::Ui, now: Instant) {
        let mut open_history = false;
        let mut select_image = false;
        let mut clear_result = false;

        ui.horizontal(|ui| {
            let view_history = egui::Button::new(RichText::new("View History").strong().size(14.0))
                .fill(Color32::WHITE)
                .rounding(8.0);
            if ui.add(view_history).clicked() {
                open_history = true;
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                // One model is wired up; the dropdown only names it.
                let version = self.inspector.model_version().to_string();
                egui::ComboBox::from_id_source("model_version")
                    .selected_text(RichText::new(&version).strong())
                    .show_ui(ui, |ui| {
                        let _ = ui.selectable_label(true, version.as_str());
                    });
            });
        });

        ui.add_space(16.0);

        ui.vertical_centered(|ui| {
            match self.inspector.state() {
                InspectionState::Idle => {
                    ui.add_space(40.0);
                    ui.label(RichText::new("Pick an image to check whether it is AI-generated.").size(14.0));
                }
                InspectionState::Busy(request) => {
                    ui.add_space(40.0);
                    ui.add(egui::Spinner::new().size(32.0));
                    ui.label(format!("Inspecting {}…", request.file_name()));
                }
                InspectionState::ShowingResult(outcome) => {
                    let opacity = self.result_fade.map_or(1.0, |fade| fade.opacity(now));
                    if render_outcome(ui, outcome, self.preview.as_ref(), opacity) {
                        clear_result = true;
                    }
                }
            }

            ui.add_space(16.0);

            let select = egui::Button::new(RichText::new("Select Image").strong().size(16.0))
                .min_size(egui::vec2(180.0, 50.0))
                .rounding(15.0);
            if ui.add_enabled(!self.inspector.is_busy(), select).clicked() {
                select_image = true;
            }

            if !self.status.is_empty() {
                ui.label(RichText::new(&self.status).color(theme::verdict_color(Authenticity::Error)));
            }
        });

        if open_history {
            self.show_history();
        }
        if clear_result {
            self.clear_result();
        }
        if select_image {
            self.select_image();
        }
    }
}

/// Returns true when the user dismissed the result
fn render_outcome(
    ui: &mut egui::Ui,
    outcome: &InspectionOutcome,
    preview: Option<&egui::TextureHandle>,
    opacity: f32,
) -> bool {
    let authenticity = outcome.result.authenticity();
    let color = theme::verdict_color(authenticity).gamma_multiply(opacity);

    if let Some(texture) = preview {
        ui.add(
            egui::Image::new(texture)
                .max_size(egui::vec2(240.0, 160.0))
                .tint(Color32::WHITE.gamma_multiply(opacity)),
        );
    }

    ui.label(RichText::new(outcome.request.file_name()).size(13.0));
    ui.label(RichText::new(authenticity.as_str()).strong().size(24.0).color(color));
    ui.label(RichText::new(outcome.result.confidence_text()).size(14.0).color(color));

    ui.small_button("Clear").clicked()
}
