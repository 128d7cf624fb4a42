// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

use egui::{Color32, RichText};

use super::{theme, InspectApp};

const COLUMNS: [&str; 4] = ["File Name", "Date", "Authenticity", "Confidence"];

impl InspectApp {
    pub(super) fn render_history(&mut self, ui: &mut egui::Ui) {
        let mut go_back = false;

        egui::Frame::none()
            .fill(Color32::WHITE)
            .rounding(20.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if ui.button(RichText::new("←").strong().size(18.0)).clicked() {
                        go_back = true;
                    }
                    ui.add_space(8.0);
                    ui.heading(RichText::new("View History").strong().color(Color32::BLACK));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!("{} records", self.history_rows.len()));
                    });
                });
            });

        ui.add_space(8.0);

        egui::Frame::none()
            .fill(Color32::WHITE)
            .rounding(15.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_min_size(ui.available_size());
                if self.history_rows.is_empty() {
                    ui.label("No inspections yet.");
                    return;
                }

                egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    egui::Grid::new("history_table")
                        .num_columns(COLUMNS.len())
                        .striped(true)
                        .min_col_width(110.0)
                        .spacing([16.0, 6.0])
                        .show(ui, |ui| {
                            for column in COLUMNS {
                                ui.label(RichText::new(column).strong());
                            }
                            ui.end_row();

                            for record in &self.history_rows {
                                ui.label(record.file_name.as_str());
                                ui.label(record.timestamp.as_str());
                                match record.authenticity {
                                    Some(authenticity) => ui.label(
                                        RichText::new(authenticity.as_str())
                                            .color(theme::verdict_color(authenticity)),
                                    ),
                                    None => ui.label("-"),
                                };
                                ui.label(record.confidence.as_deref().unwrap_or("-"));
                                ui.end_row();
                            }
                        });
                });
            });

        if go_back {
            self.show_main();
        }
    }
}
