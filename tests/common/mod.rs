#![allow(dead_code)]

use atmos_scene::{
    app::{settings::RenderSettings, state::AppState},
    cli::Cli,
    data::{SnapshotSource, demo::DemoRotation},
    domain::weather::{WeatherCondition, WeatherSnapshot},
    ui::theme::ColorCapability,
};
use chrono::{DateTime, TimeZone, Utc};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};

pub const NOON: i64 = 1_700_000_000;

pub fn noon() -> DateTime<Utc> {
    Utc.timestamp_opt(NOON, 0).single().expect("valid timestamp")
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A reading whose sun times put `noon()` inside (daylight) or outside the day.
pub fn reading(main: &str, temp: f32, clouds: Option<f32>, daylight: bool) -> WeatherSnapshot {
    let (sunrise, sunset) = if daylight {
        (NOON - 6 * 3_600, NOON + 6 * 3_600)
    } else {
        (NOON + 6 * 3_600, NOON + 18 * 3_600)
    };
    WeatherSnapshot {
        temp,
        feels_like: temp,
        humidity: 60.0,
        pressure: 1_012.0,
        dew_point: temp - 4.0,
        uvi: 2.0,
        clouds,
        visibility: 10_000.0,
        wind_speed: 3.5,
        wind_deg: 200.0,
        sunrise,
        sunset,
        weather: vec![WeatherCondition::new(main, main.to_lowercase())],
    }
}

pub fn demo_cli(args: &[&str]) -> Cli {
    let mut argv = vec!["atmos-scene"];
    argv.extend_from_slice(args);
    Cli::parse_from(argv)
}

pub fn demo_state(args: &[&str], viewport: (u16, u16)) -> AppState {
    let cli = demo_cli(args);
    AppState::new(
        SnapshotSource::Demo(DemoRotation::new()),
        RenderSettings::from_cli_defaults(&cli),
        ColorCapability::TrueColor,
        viewport,
    )
}
