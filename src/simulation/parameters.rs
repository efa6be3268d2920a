use serde::{Deserialize, Serialize};

/// How the disturbance radius and the cell-to-pointer distance are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusSpace {
    /// Radius in cells, distance in grid coordinates.
    #[default]
    Grid,
    /// Radius as a fraction of the field, distance in normalized `[0, 1]²` coordinates.
    Normalized,
}

/// Which channels a disturbance is added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionTarget {
    #[default]
    PressureAndVelocity,
    PressureOnly,
}

/// How the driver turns pointer samples into a disturbance magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisturbanceDrive {
    /// Magnitude is the distance the pointer moved since the previous frame.
    #[default]
    Motion,
    /// Magnitude is 1 whenever the pointer is over the viewport.
    Presence,
}

/// Tunable physics of the wave field
///
/// Values are immutable for the duration of a step; the driver may swap the
/// whole set between frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Relaxation coefficient applied to both axis contributions.
    pub diffusion: f32,
    /// Multiplier on the Euler pressure update.
    pub integration_scale: f32,
    /// Restoring force pulling velocity back toward rest.
    pub decay_coupling: f32,
    pub velocity_damping: f32,
    /// Multiplicative pressure decay per step, slightly below 1.
    pub pressure_damping: f32,
    pub disturbance_radius: f32,
    pub disturbance_strength: f32,
    pub radius_space: RadiusSpace,
    pub injection: InjectionTarget,
    pub drive: DisturbanceDrive,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self::minimal()
    }
}

impl SimulationParameters {
    /// Pointer-speed driven ripples injected into pressure and velocity.
    pub fn minimal() -> Self {
        Self {
            diffusion: 1.0,
            integration_scale: 1.0,
            decay_coupling: 0.005,
            velocity_damping: 0.002,
            pressure_damping: 0.999,
            disturbance_radius: 20.0,
            disturbance_strength: 0.05,
            radius_space: RadiusSpace::Grid,
            injection: InjectionTarget::PressureAndVelocity,
            drive: DisturbanceDrive::Motion,
        }
    }

    /// Slow, heavy liquid with a wide pressure push.
    pub fn heavy() -> Self {
        Self {
            diffusion: 1.4,
            integration_scale: 0.85,
            decay_coupling: 0.004,
            velocity_damping: 0.0015,
            pressure_damping: 0.998,
            disturbance_radius: 0.03,
            disturbance_strength: 3.5,
            radius_space: RadiusSpace::Normalized,
            injection: InjectionTarget::PressureOnly,
            drive: DisturbanceDrive::Presence,
        }
    }

    pub fn calm() -> Self {
        Self {
            diffusion: 1.4,
            integration_scale: 1.0,
            decay_coupling: 0.005,
            velocity_damping: 0.002,
            pressure_damping: 0.999,
            disturbance_radius: 0.02,
            disturbance_strength: 2.0,
            radius_space: RadiusSpace::Normalized,
            injection: InjectionTarget::PressureOnly,
            drive: DisturbanceDrive::Presence,
        }
    }

    pub fn breathing() -> Self {
        Self {
            integration_scale: 0.9,
            ..Self::calm()
        }
    }

    pub fn with_disturbance(mut self, radius: f32, strength: f32) -> Self {
        self.disturbance_radius = radius;
        self.disturbance_strength = strength;
        self
    }

    /// Factor applied to velocity after the restoring force.
    #[inline]
    pub fn velocity_retention(&self) -> f32 {
        1.0 - self.velocity_damping * self.diffusion
    }

    /// Whether the explicit Euler update stays bounded for every grid mode.
    ///
    /// The per-axis second differences sum to at most `-2`, so the scheme is
    /// stable while `diffusion² * integration_scale <= 2` with damping factors
    /// in `[0, 1]`. Outside that range the field can blow up; nothing guards
    /// against it.
    pub fn is_stable(&self) -> bool {
        let stiffness = self.diffusion * self.diffusion * self.integration_scale;
        let retention = self.velocity_retention();
        self.diffusion > 0.0
            && self.integration_scale > 0.0
            && stiffness <= 2.0
            && (0.0..=1.0).contains(&retention)
            && (0.0..=1.0).contains(&self.pressure_damping)
            && self.decay_coupling >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_minimal() {
        assert_eq!(SimulationParameters::default(), SimulationParameters::minimal());
    }

    #[test]
    fn test_presets_are_stable() {
        for params in [
            SimulationParameters::minimal(),
            SimulationParameters::heavy(),
            SimulationParameters::calm(),
            SimulationParameters::breathing(),
        ] {
            assert!(params.is_stable(), "{params:?} should be stable");
        }
    }

    #[test]
    fn test_breathing_differs_from_calm_only_in_integration() {
        let calm = SimulationParameters::calm();
        let breathing = SimulationParameters::breathing();
        assert_eq!(breathing.integration_scale, 0.9);
        assert_eq!(
            SimulationParameters {
                integration_scale: calm.integration_scale,
                ..breathing
            },
            calm
        );
    }

    #[test]
    fn test_unstable_diffusion() {
        let params = SimulationParameters {
            diffusion: 2.5,
            ..SimulationParameters::minimal()
        };
        assert!(!params.is_stable());

        let params = SimulationParameters {
            pressure_damping: 1.2,
            ..SimulationParameters::minimal()
        };
        assert!(!params.is_stable());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let params: SimulationParameters =
            serde_json::from_str(r#"{ "diffusion": 1.2, "drive": "presence" }"#).unwrap();
        assert_eq!(params.diffusion, 1.2);
        assert_eq!(params.drive, DisturbanceDrive::Presence);
        assert_eq!(params.pressure_damping, 0.999);
        assert_eq!(params.radius_space, RadiusSpace::Grid);
    }
}
