use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Temperature used for the central sphere when no snapshot is available.
pub const FALLBACK_TEMP_C: f32 = 20.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub main: String,
    #[serde(default)]
    pub description: String,
}

impl WeatherCondition {
    pub fn new(main: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            main: main.into(),
            description: description.into(),
        }
    }
}

/// One reading of current conditions, shaped like the `current` block of an
/// OpenWeather One Call response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temp: f32,
    #[serde(default)]
    pub feels_like: f32,
    #[serde(default)]
    pub humidity: f32,
    #[serde(default)]
    pub pressure: f32,
    #[serde(default)]
    pub dew_point: f32,
    #[serde(default)]
    pub uvi: f32,
    #[serde(default)]
    pub clouds: Option<f32>,
    #[serde(default)]
    pub visibility: f32,
    #[serde(default)]
    pub wind_speed: f32,
    #[serde(default)]
    pub wind_deg: f32,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
}

impl WeatherSnapshot {
    #[must_use]
    pub fn primary_condition(&self) -> Option<&WeatherCondition> {
        self.weather.first()
    }

    /// Lower-cased `main` of the primary condition.
    #[must_use]
    pub fn condition_key(&self) -> Option<String> {
        self.primary_condition()
            .map(|condition| condition.main.trim().to_lowercase())
    }

    #[must_use]
    pub fn is_raining(&self) -> bool {
        self.condition_key()
            .is_some_and(|main| main.contains("rain"))
    }

    /// Cloud cover percentage, `0.0` when the reading carries none.
    #[must_use]
    pub fn cloud_cover(&self) -> f32 {
        self.clouds.unwrap_or(0.0)
    }

    #[must_use]
    pub fn day_phase(&self, now: DateTime<Utc>) -> DayPhase {
        let now = now.timestamp();
        DayPhase::from_is_day(now > self.sunrise && now < self.sunset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DayPhase {
    #[default]
    Day,
    Night,
}

impl DayPhase {
    #[must_use]
    pub fn from_is_day(is_day: bool) -> Self {
        if is_day { Self::Day } else { Self::Night }
    }

    #[must_use]
    pub fn is_day(self) -> bool {
        self == Self::Day
    }

    /// Phase for an optional snapshot; with nothing to go on the scene stays in daylight.
    #[must_use]
    pub fn for_snapshot(snapshot: Option<&WeatherSnapshot>, now: DateTime<Utc>) -> Self {
        snapshot.map_or(Self::Day, |snapshot| snapshot.day_phase(now))
    }
}

#[must_use]
pub fn rain_present(snapshot: Option<&WeatherSnapshot>) -> bool {
    snapshot.is_some_and(WeatherSnapshot::is_raining)
}
