#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::unreadable_literal
)]

use serde::{Deserialize, Serialize};

use crate::domain::weather::DayPhase;

/// Linear RGB color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// HSL with every component in `0.0..=1.0`. Hue wraps around.
    #[must_use]
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(1.0);
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);
        if s <= 0.0 {
            return Self::new(l, l, l);
        }

        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self {
            r: hue_to_channel(p, q, h + 1.0 / 3.0),
            g: hue_to_channel(p, q, h),
            b: hue_to_channel(p, q, h - 1.0 / 3.0),
        }
    }

    #[must_use]
    pub fn to_u8(self) -> (u8, u8, u8) {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }

    #[must_use]
    pub fn scale(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }

    #[must_use]
    pub fn modulate(self, other: Self) -> Self {
        Self::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self::new(
            (self.r + other.r).min(1.0),
            (self.g + other.g).min(1.0),
            (self.b + other.b).min(1.0),
        )
    }

    /// Endpoints are exact: `t <= 0` yields `self`, `t >= 1` yields `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a * (1.0 - t) + b * t;
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TemperatureBand {
    VeryCold,
    Cold,
    Cool,
    Mild,
    Warm,
    Hot,
    VeryHot,
}

impl TemperatureBand {
    pub const ALL: [Self; 7] = [
        Self::VeryCold,
        Self::Cold,
        Self::Cool,
        Self::Mild,
        Self::Warm,
        Self::Hot,
        Self::VeryHot,
    ];

    /// Lower bound inclusive, upper bound exclusive; NaN lands in the open top band.
    #[must_use]
    pub fn for_temperature(temp: f32) -> Self {
        if temp < -10.0 {
            Self::VeryCold
        } else if temp < 0.0 {
            Self::Cold
        } else if temp < 10.0 {
            Self::Cool
        } else if temp < 20.0 {
            Self::Mild
        } else if temp < 30.0 {
            Self::Warm
        } else if temp < 35.0 {
            Self::Hot
        } else {
            Self::VeryHot
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

const DAY_PALETTE: [u32; 7] = [
    0x4a6fa5, 0x5fa5b5, 0x7bb3b5, 0x94c2b5, 0xffb347, 0xff6b6b, 0xff4757,
];

const NIGHT_PALETTE: [u32; 7] = [
    0x2c3e50, 0x34495e, 0x4169a3, 0x487eb0, 0xe67e22, 0xd35400, 0xc23616,
];

#[must_use]
pub fn band_color(band: TemperatureBand, phase: DayPhase) -> Rgb {
    let palette = match phase {
        DayPhase::Day => &DAY_PALETTE,
        DayPhase::Night => &NIGHT_PALETTE,
    };
    Rgb::from_hex(palette[band.index()])
}

#[must_use]
pub fn color_for_temperature(temp: f32, phase: DayPhase) -> Rgb {
    band_color(TemperatureBand::for_temperature(temp), phase)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconMode {
    #[default]
    Unicode,
    Ascii,
    Emoji,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionIcon {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Haze,
    Squall,
    Tornado,
    Clear,
    Clouds,
    Default,
}

const CONDITION_ICONS: &[(&str, ConditionIcon)] = &[
    ("thunderstorm", ConditionIcon::Thunderstorm),
    ("drizzle", ConditionIcon::Drizzle),
    ("rain", ConditionIcon::Rain),
    ("snow", ConditionIcon::Snow),
    ("mist", ConditionIcon::Haze),
    ("smoke", ConditionIcon::Haze),
    ("haze", ConditionIcon::Haze),
    ("dust", ConditionIcon::Haze),
    ("fog", ConditionIcon::Haze),
    ("sand", ConditionIcon::Haze),
    ("ash", ConditionIcon::Haze),
    ("squall", ConditionIcon::Squall),
    ("tornado", ConditionIcon::Tornado),
    ("clear", ConditionIcon::Clear),
    ("clouds", ConditionIcon::Clouds),
];

#[must_use]
pub fn icon_for_condition(condition: Option<&str>) -> ConditionIcon {
    let Some(condition) = condition else {
        return ConditionIcon::Default;
    };
    let key = condition.trim().to_lowercase();
    CONDITION_ICONS
        .iter()
        .find_map(|(name, icon)| (*name == key).then_some(*icon))
        .unwrap_or(ConditionIcon::Default)
}

impl ConditionIcon {
    #[must_use]
    pub fn glyph(self, mode: IconMode) -> &'static str {
        match mode {
            IconMode::Ascii => self.ascii(),
            IconMode::Emoji => self.emoji(),
            IconMode::Unicode => self.unicode(),
        }
    }

    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Thunderstorm => "⛈️",
            Self::Drizzle | Self::Rain => "🌧️",
            Self::Snow => "❄️",
            Self::Haze => "🌫️",
            Self::Squall => "💨",
            Self::Tornado => "🌪️",
            Self::Clear => "☀️",
            Self::Clouds => "☁️",
            Self::Default => "🌤️",
        }
    }

    #[must_use]
    pub fn ascii(self) -> &'static str {
        match self {
            Self::Thunderstorm => "THN",
            Self::Drizzle => "DRZ",
            Self::Rain => "RAN",
            Self::Snow => "SNW",
            Self::Haze => "FOG",
            Self::Squall => "SQL",
            Self::Tornado => "TOR",
            Self::Clear => "SUN",
            Self::Clouds => "CLD",
            Self::Default => "---",
        }
    }

    #[must_use]
    pub fn unicode(self) -> &'static str {
        match self {
            Self::Thunderstorm => "⚡",
            Self::Drizzle | Self::Rain => "☂",
            Self::Snow => "❄",
            Self::Haze => "░",
            Self::Squall => "≋",
            Self::Tornado => "§",
            Self::Clear => "☀",
            Self::Clouds => "☁",
            Self::Default => "◌",
        }
    }
}
