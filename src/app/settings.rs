use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    cli::{Cli, ColorArg, DEFAULT_FPS},
    domain::palette::IconMode,
};

const CONFIG_DIR_ENV: &str = "ATMOS_SCENE_CONFIG_DIR";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub fps: u8,
    pub color: ColorArg,
    pub hud: bool,
    pub icon_mode: IconMode,
    pub refresh_interval_secs: u64,
    pub demo_interval_secs: u64,
}

/// Optional overrides read from the config file. Missing keys keep the CLI value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub fps: Option<u8>,
    pub color: Option<ColorArg>,
    pub hud: Option<bool>,
    pub icons: Option<IconMode>,
}

impl RenderSettings {
    #[must_use]
    pub fn from_cli_defaults(cli: &Cli) -> Self {
        Self {
            fps: cli.fps,
            color: cli.effective_color_mode(),
            hud: !cli.no_hud,
            icon_mode: cli.icon_override().unwrap_or_default(),
            refresh_interval_secs: cli.refresh_interval,
            demo_interval_secs: cli.demo_interval,
        }
    }

    /// Seconds between snapshot reads for the active source.
    #[must_use]
    pub fn reload_interval_secs(&self, demo: bool) -> u64 {
        if demo {
            self.demo_interval_secs
        } else {
            self.refresh_interval_secs
        }
    }
}

/// Layers the config file under the command line: a flag left at its default
/// lets the file decide.
#[must_use]
pub fn merge_settings(cli: &Cli, file: &FileSettings) -> RenderSettings {
    let mut settings = RenderSettings::from_cli_defaults(cli);

    if cli.fps == DEFAULT_FPS
        && let Some(fps) = file.fps
    {
        settings.fps = fps.clamp(15, 60);
    }
    if cli.effective_color_mode() == ColorArg::Auto
        && let Some(color) = file.color
    {
        settings.color = color;
    }
    if !cli.no_hud
        && let Some(hud) = file.hud
    {
        settings.hud = hud;
    }
    if cli.icon_override().is_none()
        && let Some(icons) = file.icons
    {
        settings.icon_mode = icons;
    }

    settings
}

/// Reads the config file if there is one. An explicit `--config` must exist;
/// the default location is optional.
pub fn load_render_settings(cli: &Cli) -> anyhow::Result<RenderSettings> {
    let file = match &cli.config {
        Some(path) => read_file_settings(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => read_file_settings(&path)?,
            _ => FileSettings::default(),
        },
    };
    Ok(merge_settings(cli, &file))
}

pub fn read_file_settings(path: &Path) -> anyhow::Result<FileSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config file {} failed", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing config file {} failed", path.display()))
}

fn default_config_path() -> Option<PathBuf> {
    if let Some(base) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(base).join(CONFIG_FILE));
    }

    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("atmos-scene")
            .join(CONFIG_FILE),
    )
}
