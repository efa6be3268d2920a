//! Effect configuration: presets and JSON loading.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rendering::CompositorSettings;
use crate::simulation::SimulationParameters;

/// Result type for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading the effect configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown preset '{0}' (expected one of: minimal, heavy, calm, breathing)")]
    UnknownPreset(String),

    #[error("resolution scale must be in (0, 1], got {0}")]
    InvalidResolutionScale(f32),
}

/// The bundled effect variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    Minimal,
    Heavy,
    Calm,
    Breathing,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Minimal, Preset::Heavy, Preset::Calm, Preset::Breathing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Minimal => "minimal",
            Preset::Heavy => "heavy",
            Preset::Calm => "calm",
            Preset::Breathing => "breathing",
        }
    }

    pub fn simulation(&self) -> SimulationParameters {
        match self {
            Preset::Minimal => SimulationParameters::minimal(),
            Preset::Heavy => SimulationParameters::heavy(),
            Preset::Calm => SimulationParameters::calm(),
            Preset::Breathing => SimulationParameters::breathing(),
        }
    }

    pub fn compositor(&self) -> CompositorSettings {
        match self {
            Preset::Minimal => CompositorSettings::minimal(),
            Preset::Heavy => CompositorSettings::heavy(),
            Preset::Calm => CompositorSettings::calm(),
            Preset::Breathing => CompositorSettings::breathing(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

/// Resource holding everything the water effect can be tuned with
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterEffectConfig {
    /// Preset the settings below started from; informational once loaded.
    pub preset: Preset,
    /// Simulation cells per logical window pixel.
    pub resolution_scale: f32,
    pub simulation: SimulationParameters,
    pub compositor: CompositorSettings,
}

impl Default for WaterEffectConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl WaterEffectConfig {
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            preset,
            resolution_scale: 0.5,
            simulation: preset.simulation(),
            compositor: preset.compositor(),
        }
    }

    /// Replace the physics and compositor settings with a preset's.
    pub fn apply_preset(&mut self, preset: Preset) {
        self.preset = preset;
        self.simulation = preset.simulation();
        self.compositor = preset.compositor();
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Interpret a command-line argument as a preset name, or else a JSON file path.
    pub fn from_arg(arg: &str) -> Result<Self> {
        match arg.parse::<Preset>() {
            Ok(preset) => Ok(Self::from_preset(preset)),
            Err(_) if Path::new(arg).extension().is_some_and(|ext| ext == "json") => {
                Self::load(arg)
            }
            Err(err) => Err(err),
        }
    }

    fn validate(self) -> Result<Self> {
        if !(self.resolution_scale > 0.0 && self.resolution_scale <= 1.0) {
            return Err(ConfigError::InvalidResolutionScale(self.resolution_scale));
        }
        if !self.simulation.is_stable() {
            warn!(
                "configured simulation parameters may be numerically unstable: {:?}",
                self.simulation
            );
        }
        Ok(self)
    }

    /// Simulation grid size for a window of the given logical size; zero for a
    /// minimized window.
    pub fn grid_size(&self, window_size: Vec2) -> UVec2 {
        (window_size * self.resolution_scale).round().max(Vec2::ZERO).as_uvec2()
    }
}
