//! Mouse-driven water ripples: a double-buffered wave field simulated on the
//! CPU, uploaded as a float texture and composited over a backdrop.

pub mod config;
pub mod rendering;
pub mod simulation;
pub mod water_effect;

pub use config::{ConfigError, Preset, WaterEffectConfig};
pub use simulation::{Disturbance, Field, SimulationParameters, WaveFieldError, WaveSimulator};
pub use water_effect::WaterEffectPlugin;
