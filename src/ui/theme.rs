// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Window styling derived from `AppearanceConfig`

use egui::{Color32, Visuals};

use crate::config::{AppearanceConfig, ThemeMode};
use crate::history::Authenticity;

pub fn rgb([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}

pub fn visuals(appearance: &AppearanceConfig) -> Visuals {
    let mut visuals = match appearance.mode {
        ThemeMode::Light => Visuals::light(),
        ThemeMode::Dark => Visuals::dark(),
    };
    let accent = rgb(appearance.accent);
    visuals.selection.bg_fill = accent;
    visuals.hyperlink_color = accent;
    visuals
}

/// Applied once, when the window is created
pub fn apply(ctx: &egui::Context, appearance: &AppearanceConfig) {
    ctx.set_visuals(visuals(appearance));
}

pub fn verdict_color(authenticity: Authenticity) -> Color32 {
    match authenticity {
        Authenticity::Real => Color32::from_rgb(46, 160, 67),
        Authenticity::Fake => Color32::from_rgb(218, 54, 51),
        Authenticity::Error => Color32::from_rgb(210, 120, 20),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selects_base_visuals() {
        let mut appearance = AppearanceConfig::default();
        assert!(!visuals(&appearance).dark_mode);

        appearance.mode = ThemeMode::Dark;
        assert!(visuals(&appearance).dark_mode);
    }

    #[test]
    fn test_accent_is_selection_fill() {
        let appearance = AppearanceConfig {
            accent: [1, 2, 3],
            ..AppearanceConfig::default()
        };
        assert_eq!(visuals(&appearance).selection.bg_fill, Color32::from_rgb(1, 2, 3));
    }
}
