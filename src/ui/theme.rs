#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::unreadable_literal
)]

use ratatui::style::Color;

use crate::{
    cli::ColorArg,
    domain::{palette::Rgb, weather::DayPhase},
};

mod capability;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Xterm256,
    Basic16,
}

#[must_use]
pub fn detect_color_capability(mode: ColorArg) -> ColorCapability {
    let term = std::env::var("TERM").ok();
    let colorterm = std::env::var("COLORTERM").ok();
    let no_color = std::env::var("NO_COLOR").ok();
    capability::detect_color_capability_from(
        mode,
        term.as_deref(),
        colorterm.as_deref(),
        no_color.as_deref(),
    )
}

/// Top and bottom of the backdrop behind the scene.
#[must_use]
pub fn sky_gradient(phase: DayPhase) -> (Rgb, Rgb) {
    match phase {
        DayPhase::Day => (Rgb::from_hex(0x0d3566), Rgb::from_hex(0x1e669e)),
        DayPhase::Night => (Rgb::from_hex(0x09122c), Rgb::from_hex(0x152b4f)),
    }
}

#[must_use]
pub fn hud_colors(phase: DayPhase) -> (Color, Color) {
    match phase {
        DayPhase::Day => (Color::Rgb(255, 215, 117), Color::Rgb(13, 53, 102)),
        DayPhase::Night => (Color::Rgb(173, 216, 255), Color::Rgb(9, 18, 44)),
    }
}

#[must_use]
pub fn quantize(color: Rgb, capability: ColorCapability) -> Color {
    let (r, g, b) = color.to_u8();
    match capability {
        ColorCapability::TrueColor => Color::Rgb(r, g, b),
        ColorCapability::Xterm256 => {
            let to_cube = |v: u8| -> u8 { ((f32::from(v) / 255.0) * 5.0).round() as u8 };
            Color::Indexed(16 + 36 * to_cube(r) + 6 * to_cube(g) + to_cube(b))
        }
        ColorCapability::Basic16 => basic16_from_rgb(r, g, b),
    }
}

fn basic16_from_rgb(r: u8, g: u8, b: u8) -> Color {
    let rf = f32::from(r) / 255.0;
    let gf = f32::from(g) / 255.0;
    let bf = f32::from(b) / 255.0;

    let max = rf.max(gf.max(bf));
    let min = rf.min(gf.min(bf));
    let delta = max - min;
    let light = (max + min) / 2.0;

    if delta < 0.08 {
        return match light {
            l if l < 0.20 => Color::Black,
            l if l < 0.40 => Color::DarkGray,
            l if l < 0.72 => Color::Gray,
            _ => Color::White,
        };
    }

    let hue = if (max - rf).abs() < f32::EPSILON {
        60.0 * ((gf - bf) / delta).rem_euclid(6.0)
    } else if (max - gf).abs() < f32::EPSILON {
        60.0 * (((bf - rf) / delta) + 2.0)
    } else {
        60.0 * (((rf - gf) / delta) + 4.0)
    };

    let bright = light >= 0.55;
    let (dim, lit) = match hue {
        h if !(30.0..330.0).contains(&h) => (Color::Red, Color::LightRed),
        h if h < 90.0 => (Color::Yellow, Color::LightYellow),
        h if h < 150.0 => (Color::Green, Color::LightGreen),
        h if h < 210.0 => (Color::Cyan, Color::LightCyan),
        h if h < 270.0 => (Color::Blue, Color::LightBlue),
        _ => (Color::Magenta, Color::LightMagenta),
    };
    if bright { lit } else { dim }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truecolor_passes_rgb_through() {
        assert_eq!(
            quantize(Rgb::from_hex(0xffb347), ColorCapability::TrueColor),
            Color::Rgb(0xff, 0xb3, 0x47)
        );
    }

    #[test]
    fn xterm256_maps_into_color_cube() {
        assert_eq!(quantize(Rgb::WHITE, ColorCapability::Xterm256), Color::Indexed(231));
        assert_eq!(quantize(Rgb::BLACK, ColorCapability::Xterm256), Color::Indexed(16));
    }

    #[test]
    fn basic16_picks_hue_family() {
        assert_eq!(
            quantize(Rgb::from_hex(0xff4757), ColorCapability::Basic16),
            Color::LightRed
        );
        assert_eq!(
            quantize(Rgb::from_hex(0x1a237e), ColorCapability::Basic16),
            Color::Blue
        );
        assert_eq!(quantize(Rgb::BLACK, ColorCapability::Basic16), Color::Black);
    }

    #[test]
    fn night_sky_is_darker_than_day() {
        let (day_top, _) = sky_gradient(DayPhase::Day);
        let (night_top, _) = sky_gradient(DayPhase::Night);
        assert!(night_top.b < day_top.b);
    }
}
