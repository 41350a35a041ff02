use chrono::{DateTime, Utc};

use crate::domain::weather::{WeatherCondition, WeatherSnapshot};

const HOUR: i64 = 3_600;

#[derive(Debug, Clone, Copy)]
struct DemoReading {
    main: &'static str,
    description: &'static str,
    temp: f32,
    clouds: f32,
    humidity: f32,
    wind_speed: f32,
    daylight: bool,
}

const DEMO_READINGS: &[DemoReading] = &[
    DemoReading {
        main: "Clear",
        description: "clear sky",
        temp: 24.0,
        clouds: 0.0,
        humidity: 40.0,
        wind_speed: 2.1,
        daylight: true,
    },
    DemoReading {
        main: "Rain",
        description: "moderate rain",
        temp: 11.0,
        clouds: 90.0,
        humidity: 88.0,
        wind_speed: 7.4,
        daylight: true,
    },
    DemoReading {
        main: "Clouds",
        description: "overcast clouds",
        temp: 6.0,
        clouds: 100.0,
        humidity: 76.0,
        wind_speed: 4.0,
        daylight: false,
    },
    DemoReading {
        main: "Clear",
        description: "hot and hazy",
        temp: 37.0,
        clouds: 10.0,
        humidity: 22.0,
        wind_speed: 1.2,
        daylight: true,
    },
    DemoReading {
        main: "Snow",
        description: "snow showers",
        temp: -14.0,
        clouds: 60.0,
        humidity: 82.0,
        wind_speed: 5.5,
        daylight: false,
    },
];

/// Fixed cycle of built-in readings; sunrise and sunset are placed around `now`
/// so each reading lands in its intended phase.
#[derive(Debug, Clone, Default)]
pub struct DemoRotation {
    cursor: usize,
}

impl DemoRotation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        DEMO_READINGS.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        DEMO_READINGS.is_empty()
    }

    pub fn next_at(&mut self, now: DateTime<Utc>) -> WeatherSnapshot {
        let reading = DEMO_READINGS[self.cursor % DEMO_READINGS.len()];
        self.cursor = (self.cursor + 1) % DEMO_READINGS.len();
        snapshot_for(reading, now.timestamp())
    }
}

fn snapshot_for(reading: DemoReading, now: i64) -> WeatherSnapshot {
    let (sunrise, sunset) = if reading.daylight {
        (now - 4 * HOUR, now + 6 * HOUR)
    } else {
        (now + 5 * HOUR, now + 17 * HOUR)
    };
    WeatherSnapshot {
        temp: reading.temp,
        feels_like: reading.temp - reading.wind_speed * 0.3,
        humidity: reading.humidity,
        pressure: 1_013.0,
        dew_point: reading.temp - (100.0 - reading.humidity) / 5.0,
        uvi: if reading.daylight { 4.0 } else { 0.0 },
        clouds: Some(reading.clouds),
        visibility: 10_000.0,
        wind_speed: reading.wind_speed,
        wind_deg: 225.0,
        sunrise,
        sunset,
        weather: vec![WeatherCondition::new(reading.main, reading.description)],
    }
}
