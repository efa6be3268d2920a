//! Wave field simulation
//!
//! A double-buffered four-channel grid advanced once per display frame by a
//! local relaxation rule, perturbed by pointer disturbances.

pub mod disturbance;
pub mod error;
pub mod field;
pub mod parameters;
pub mod wave_simulator;

pub use disturbance::*;
pub use error::WaveFieldError;
pub use field::*;
pub use parameters::*;
pub use wave_simulator::*;
