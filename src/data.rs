pub mod demo;
pub mod snapshot;

use chrono::Utc;

use crate::{
    cli::Cli,
    data::{
        demo::DemoRotation,
        snapshot::{SnapshotError, SnapshotFile},
    },
    domain::weather::WeatherSnapshot,
};

/// Where weather readings come from.
#[derive(Debug, Clone)]
pub enum SnapshotSource {
    File(SnapshotFile),
    Demo(DemoRotation),
}

/// One pending read, detached from the source so it can move into a task.
#[derive(Debug, Clone)]
pub enum SnapshotRequest {
    File(SnapshotFile),
    Ready(Box<WeatherSnapshot>),
}

impl SnapshotSource {
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        match &cli.snapshot {
            Some(path) if !cli.uses_demo() => Self::File(SnapshotFile::new(path.clone())),
            _ => Self::Demo(DemoRotation::new()),
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::File(file) => file.path().display().to_string(),
            Self::Demo(_) => "demo".to_string(),
        }
    }

    /// Takes the next read. Demo readings advance the rotation immediately.
    pub fn request(&mut self) -> SnapshotRequest {
        match self {
            Self::File(file) => SnapshotRequest::File(file.clone()),
            Self::Demo(rotation) => SnapshotRequest::Ready(Box::new(rotation.next_at(Utc::now()))),
        }
    }
}

impl SnapshotRequest {
    pub async fn resolve(self) -> Result<WeatherSnapshot, SnapshotError> {
        match self {
            Self::File(file) => file.load().await,
            Self::Ready(snapshot) => Ok(*snapshot),
        }
    }
}
