use iced::widget::{button, container};
use iced::{Background, Border, Color, Shadow, Theme};

use crate::core::models::ThemeMode;

pub const BRAND_GREEN: Color = Color::from_rgb(0.086, 0.639, 0.290);

pub fn get_theme(mode: &ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => Theme::custom(
            "Dark".to_string(),
            iced::theme::Palette {
                background: Color::from_rgb(0.07, 0.09, 0.08),
                text: Color::from_rgb(0.95, 0.95, 0.95),
                primary: BRAND_GREEN,
                success: Color::from_rgb(0.2, 0.9, 0.4),
                danger: Color::from_rgb(1.0, 0.3, 0.3),
                warning: Color::from_rgb(1.0, 0.7, 0.0),
            },
        ),
        ThemeMode::Light => Theme::custom(
            "Light".to_string(),
            iced::theme::Palette {
                background: Color::from_rgb(0.953, 0.957, 0.965),
                text: Color::from_rgb(0.1, 0.1, 0.1),
                primary: BRAND_GREEN,
                success: Color::from_rgb(0.1, 0.7, 0.3),
                danger: Color::from_rgb(0.9, 0.2, 0.2),
                warning: Color::from_rgb(0.9, 0.6, 0.0),
            },
        ),
    }
}

struct ButtonPalette {
    active: Color,
    hovered: Color,
    pressed: Color,
}

fn solid_button_style(palette: ButtonPalette, status: button::Status) -> button::Style {
    let (background, text_color, snap) = match status {
        button::Status::Active => (palette.active, Color::WHITE, false),
        button::Status::Hovered => (palette.hovered, Color::WHITE, false),
        button::Status::Pressed => (palette.pressed, Color::WHITE, true),
        button::Status::Disabled => (
            Color::from_rgb(0.62, 0.66, 0.63),
            Color::from_rgb(0.9, 0.9, 0.9),
            false,
        ),
    };

    button::Style {
        background: Some(Background::Color(background)),
        text_color,
        border: Border {
            color: background,
            width: 1.0,
            radius: 6.0.into(),
        },
        shadow: Shadow::default(),
        snap,
    }
}

pub fn primary_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    solid_button_style(
        ButtonPalette {
            active: BRAND_GREEN,
            hovered: Color::from_rgb(0.082, 0.502, 0.239),
            pressed: Color::from_rgb(0.078, 0.325, 0.176),
        },
        status,
    )
}

pub fn secondary_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    solid_button_style(
        ButtonPalette {
            active: Color::from_rgb(0.145, 0.388, 0.922),
            hovered: Color::from_rgb(0.114, 0.306, 0.847),
            pressed: Color::from_rgb(0.118, 0.251, 0.686),
        },
        status,
    )
}

pub fn purple_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    solid_button_style(
        ButtonPalette {
            active: Color::from_rgb(0.576, 0.200, 0.918),
            hovered: Color::from_rgb(0.494, 0.133, 0.808),
            pressed: Color::from_rgb(0.420, 0.129, 0.659),
        },
        status,
    )
}

pub fn donation_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    solid_button_style(
        ButtonPalette {
            active: Color::from_rgb(0.859, 0.153, 0.467),
            hovered: Color::from_rgb(0.745, 0.094, 0.365),
            pressed: Color::from_rgb(0.616, 0.090, 0.302),
        },
        status,
    )
}

pub fn card_container_style(theme: &Theme) -> container::Style {
    let palette = theme.palette();
    let is_dark = palette.background.r < 0.5;

    container::Style {
        background: Some(Background::Color(if is_dark {
            Color::from_rgb(0.12, 0.14, 0.13)
        } else {
            Color::WHITE
        })),
        border: Border {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.08),
            width: 1.0,
            radius: 10.0.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.15),
            offset: iced::Vector::new(0.0, 4.0),
            blur_radius: 12.0,
        },
        ..Default::default()
    }
}

pub fn donation_banner_style(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color::from_rgb(0.996, 0.976, 0.765))),
        text_color: Some(Color::from_rgb(0.1, 0.1, 0.1)),
        border: Border {
            color: Color::from_rgb(0.992, 0.878, 0.278),
            width: 1.0,
            radius: 8.0.into(),
        },
        ..Default::default()
    }
}
