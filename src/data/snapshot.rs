use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::weather::WeatherSnapshot;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("reading snapshot {} failed: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("snapshot {} is not a weather reading: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("snapshot {} is empty", path.display())]
    Empty { path: PathBuf },
}

/// Accepts either a bare reading or a One Call style document wrapping it in `current`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotDocument {
    Envelope { current: WeatherSnapshot },
    Bare(WeatherSnapshot),
}

impl SnapshotDocument {
    fn into_snapshot(self) -> WeatherSnapshot {
        match self {
            Self::Envelope { current } => current,
            Self::Bare(snapshot) => snapshot,
        }
    }
}

pub fn parse_snapshot(text: &str, path: &Path) -> Result<WeatherSnapshot, SnapshotError> {
    if text.trim().is_empty() {
        return Err(SnapshotError::Empty {
            path: path.to_path_buf(),
        });
    }
    serde_json::from_str::<SnapshotDocument>(text)
        .map(SnapshotDocument::into_snapshot)
        .map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// A snapshot on disk, re-read on every load so edits show up on the next refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<WeatherSnapshot, SnapshotError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SnapshotError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse_snapshot(&text, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: &str = r#"{"temp": 7.5, "clouds": 40, "weather": [{"main": "Rain"}]}"#;

    #[test]
    fn parses_bare_reading() {
        let snapshot = parse_snapshot(BARE, Path::new("bare.json")).expect("bare parses");
        assert!((snapshot.temp - 7.5).abs() < f32::EPSILON);
        assert_eq!(snapshot.clouds, Some(40.0));
        assert!(snapshot.is_raining());
    }

    #[test]
    fn parses_envelope_and_ignores_extra_blocks() {
        let text = r#"{
            "lat": 59.33,
            "lon": 18.07,
            "current": {"temp": -2.0, "sunrise": 10, "sunset": 20, "weather": [{"main": "Snow", "description": "light snow"}]},
            "hourly": [{"temp": -3.0}]
        }"#;
        let snapshot = parse_snapshot(text, Path::new("onecall.json")).expect("envelope parses");
        assert!((snapshot.temp + 2.0).abs() < f32::EPSILON);
        assert_eq!(snapshot.sunset, 20);
        assert_eq!(snapshot.weather[0].description, "light snow");
    }

    #[test]
    fn blank_text_is_empty_error() {
        let err = parse_snapshot("  \n", Path::new("blank.json")).expect_err("blank");
        assert!(matches!(err, SnapshotError::Empty { .. }));
        assert_eq!(err.to_string(), "snapshot blank.json is empty");
    }

    #[test]
    fn missing_temperature_is_parse_error() {
        let err = parse_snapshot(r#"{"clouds": 10}"#, Path::new("x.json")).expect_err("no temp");
        assert!(matches!(err, SnapshotError::Parse { .. }));
    }
}
