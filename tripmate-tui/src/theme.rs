//! Light and dark palettes.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tripmate_core::ActivityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
    pub flight: Color,
    pub hotel: Color,
    pub attraction: Color,
    pub food: Color,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(250, 250, 247),
            bg_highlight: Color::Rgb(228, 236, 244),
            primary: Color::Rgb(13, 110, 153),
            accent: Color::Rgb(224, 122, 48),
            success: Color::Rgb(34, 139, 84),
            warning: Color::Rgb(196, 140, 0),
            error: Color::Rgb(192, 44, 44),
            info: Color::Rgb(13, 110, 153),
            text: Color::Rgb(28, 32, 36),
            text_dim: Color::Rgb(104, 112, 120),
            border: Color::Rgb(190, 196, 202),
            border_focus: Color::Rgb(13, 110, 153),
            flight: Color::Rgb(70, 100, 200),
            hotel: Color::Rgb(140, 80, 170),
            attraction: Color::Rgb(13, 110, 153),
            food: Color::Rgb(224, 122, 48),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(18, 20, 24),
            bg_highlight: Color::Rgb(40, 46, 56),
            primary: Color::Rgb(94, 196, 230),
            accent: Color::Rgb(255, 166, 87),
            success: Color::Rgb(90, 210, 140),
            warning: Color::Rgb(240, 200, 80),
            error: Color::Rgb(240, 100, 100),
            info: Color::Rgb(94, 196, 230),
            text: Color::Rgb(232, 234, 237),
            text_dim: Color::Rgb(140, 148, 158),
            border: Color::Rgb(70, 76, 86),
            border_focus: Color::Rgb(94, 196, 230),
            flight: Color::Rgb(130, 160, 255),
            hotel: Color::Rgb(200, 140, 230),
            attraction: Color::Rgb(94, 196, 230),
            food: Color::Rgb(255, 166, 87),
        }
    }
}

pub fn activity_kind_color(kind: ActivityKind, theme: &Theme) -> Color {
    match kind {
        ActivityKind::Flight => theme.flight,
        ActivityKind::Hotel => theme.hotel,
        ActivityKind::Attraction => theme.attraction,
        ActivityKind::Food => theme.food,
    }
}
