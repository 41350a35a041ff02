#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::domain::palette::IconMode;

pub const DEFAULT_FPS: u8 = 30;
pub const DEFAULT_REFRESH_SECS: u64 = 600;
pub const MIN_REFRESH_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "atmos-scene",
    version,
    about = "Animated procedural 3D weather scene for the terminal"
)]
pub struct Cli {
    /// Weather snapshot JSON (bare reading or a One Call style document with `current`)
    #[arg(long, value_name = "PATH", conflicts_with = "demo")]
    pub snapshot: Option<PathBuf>,

    /// Cycle through built-in weather readings (default when no snapshot is given)
    #[arg(long)]
    pub demo: bool,

    /// Target FPS (15..60)
    #[arg(long, default_value_t = DEFAULT_FPS, value_parser = clap::value_parser!(u8).range(15..=60))]
    pub fps: u8,

    /// Snapshot reload interval in seconds
    #[arg(long, default_value_t = DEFAULT_REFRESH_SECS)]
    pub refresh_interval: u64,

    /// Seconds between demo readings
    #[arg(long, default_value_t = 8)]
    pub demo_interval: u64,

    /// Force ASCII icons
    #[arg(long, conflicts_with = "emoji_icons")]
    pub ascii_icons: bool,

    /// Force emoji icons
    #[arg(long)]
    pub emoji_icons: bool,

    /// Color output policy
    #[arg(long, value_enum, default_value_t = ColorArg::Auto, conflicts_with = "no_color")]
    pub color: ColorArg,

    /// Alias for --color never
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Hide the condition badge
    #[arg(long)]
    pub no_hud: bool,

    /// Write diagnostics to this file (filter with ATMOS_SCENE_LOG)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Config file overriding the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the current reading to stdout and exit (non-interactive)
    #[arg(long)]
    pub one_shot: bool,
}

impl Cli {
    /// Demo rotation is used unless a snapshot file was named.
    #[must_use]
    pub fn uses_demo(&self) -> bool {
        self.demo || self.snapshot.is_none()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.refresh_interval < MIN_REFRESH_SECS {
            anyhow::bail!("--refresh-interval must be at least {MIN_REFRESH_SECS} seconds");
        }
        if self.demo_interval == 0 {
            anyhow::bail!("--demo-interval must be at least 1 second");
        }
        Ok(())
    }

    #[must_use]
    pub fn effective_color_mode(&self) -> ColorArg {
        if self.no_color {
            ColorArg::Never
        } else {
            self.color
        }
    }

    /// Icon mode requested on the command line, if any.
    #[must_use]
    pub fn icon_override(&self) -> Option<IconMode> {
        if self.ascii_icons {
            Some(IconMode::Ascii)
        } else if self.emoji_icons {
            Some(IconMode::Emoji)
        } else {
            None
        }
    }
}
