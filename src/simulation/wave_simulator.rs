use bevy::prelude::*;

use super::disturbance::Disturbance;
use super::error::{Result, WaveFieldError};
use super::field::{Field, FieldCell};
use super::parameters::{InjectionTarget, RadiusSpace, SimulationParameters};

/// The ping-pong buffer pair and its bookkeeping.
#[derive(Debug, Clone)]
struct SimulationState {
    buffers: [Field; 2],
    /// Index of the buffer holding the last completed step.
    current: usize,
    frame_count: u64,
}

impl SimulationState {
    fn new(width: u32, height: u32) -> Self {
        Self {
            buffers: [Field::new(width, height), Field::new(width, height)],
            current: 0,
            frame_count: 0,
        }
    }

    /// Split the pair into (current, next).
    fn split(&mut self) -> (&Field, &mut Field) {
        let [first, second] = &mut self.buffers;
        if self.current == 0 {
            (&*first, second)
        } else {
            (&*second, first)
        }
    }

    fn swap(&mut self) {
        self.current ^= 1;
        self.frame_count += 1;
    }
}

/// Real-time wave field simulator
///
/// Owns a double-buffered [`Field`] and advances it once per call to
/// [`step`](Self::step). The default value is uninitialized: every operation
/// other than [`initialize`](Self::initialize) fails with
/// [`WaveFieldError::NotInitialized`] until it is called.
#[derive(Resource, Debug, Clone, Default)]
pub struct WaveSimulator {
    parameters: SimulationParameters,
    state: Option<SimulationState>,
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(WaveFieldError::InvalidDimension { width, height });
    }
    Ok(())
}

impl WaveSimulator {
    /// Create an initialized simulator.
    pub fn new(width: u32, height: u32, parameters: SimulationParameters) -> Result<Self> {
        let mut simulator = Self::default();
        simulator.initialize(width, height, parameters)?;
        Ok(simulator)
    }

    /// Allocate both buffers at rest and reset the frame count.
    pub fn initialize(
        &mut self,
        width: u32,
        height: u32,
        parameters: SimulationParameters,
    ) -> Result<()> {
        check_dimensions(width, height)?;
        if !parameters.is_stable() {
            warn!("simulation parameters outside the stable range: {parameters:?}");
        }

        self.parameters = parameters;
        self.state = Some(SimulationState::new(width, height));
        debug!("wave field initialized at {width}x{height}");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    fn state(&self) -> Result<&SimulationState> {
        self.state.as_ref().ok_or(WaveFieldError::NotInitialized)
    }

    fn state_mut(&mut self) -> Result<&mut SimulationState> {
        self.state.as_mut().ok_or(WaveFieldError::NotInitialized)
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    /// Swap the physics between frames. The field state is kept.
    pub fn set_parameters(&mut self, parameters: SimulationParameters) {
        self.parameters = parameters;
    }

    /// Number of completed steps since the last initialize or resize.
    pub fn frame_count(&self) -> Result<u64> {
        Ok(self.state()?.frame_count)
    }

    pub fn dimensions(&self) -> Result<UVec2> {
        let state = self.state()?;
        Ok(state.buffers[state.current].dimensions())
    }

    /// The last completed field.
    pub fn current_field(&self) -> Result<&Field> {
        let state = self.state()?;
        Ok(&state.buffers[state.current])
    }

    /// Mutable access to the current field for seeding initial conditions.
    pub fn current_field_mut(&mut self) -> Result<&mut Field> {
        let state = self.state_mut()?;
        Ok(&mut state.buffers[state.current])
    }

    /// Reallocate both buffers at the new size, at rest, with frame count 0.
    ///
    /// Previous content is discarded rather than resampled.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.state()?;
        check_dimensions(width, height)?;

        self.state = Some(SimulationState::new(width, height));
        debug!("wave field resized to {width}x{height}");
        Ok(())
    }

    /// Return to rest at the current size.
    pub fn reset(&mut self) -> Result<()> {
        let size = self.dimensions()?;
        self.resize(size.x, size.y)
    }

    /// Advance the field by one frame.
    ///
    /// The first step after initialize or resize writes a rest field and
    /// ignores the disturbance.
    pub fn step(&mut self, disturbance: Option<Disturbance>) -> Result<()> {
        let params = self.parameters.clone();
        let state = self.state_mut()?;
        let first_frame = state.frame_count == 0;

        {
            let (current, next) = state.split();
            if first_frame {
                next.clear();
            } else {
                relax(current, next, &params);
                if let Some(disturbance) = disturbance.filter(Disturbance::is_active) {
                    inject(next, &disturbance, &params);
                }
            }
        }

        state.swap();
        Ok(())
    }
}

/// Relaxation of every cell of `source` into `target`.
fn relax(source: &Field, target: &mut Field, params: &SimulationParameters) {
    let width = source.width();
    let height = source.height();
    let diffusion = params.diffusion;
    let retention = params.velocity_retention();

    for y in 0..height {
        for x in 0..width {
            let FieldCell {
                pressure, velocity, ..
            } = source.cells()[source.index(x, y)];

            // Off-grid reads clamp to the cell itself
            let sample = |nx: Option<u32>, ny: Option<u32>| match (nx, ny) {
                (Some(nx), Some(ny)) if nx < width && ny < height => {
                    source.cells()[source.index(nx, ny)].pressure
                }
                _ => pressure,
            };
            let mut right = sample(Some(x + 1), Some(y));
            let mut left = sample(x.checked_sub(1), Some(y));
            let mut up = sample(Some(x), Some(y + 1));
            let mut down = sample(Some(x), y.checked_sub(1));

            // Reflective edges: a missing neighbour mirrors the opposite one
            if x == 0 {
                left = right;
            }
            if x == width - 1 {
                right = left;
            }
            if y == 0 {
                down = up;
            }
            if y == height - 1 {
                up = down;
            }

            // Two independent 1-D second differences, not a 5-point Laplacian
            let mut velocity = velocity;
            velocity += diffusion * (-2.0 * pressure + right + left) / 4.0;
            velocity += diffusion * (-2.0 * pressure + up + down) / 4.0;

            let mut pressure = pressure + diffusion * velocity * params.integration_scale;

            // Order matters: each substep sees the previous one's result
            velocity -= params.decay_coupling * diffusion * pressure;
            velocity *= retention;
            pressure *= params.pressure_damping;

            let idx = target.index(x, y);
            target.cells_mut()[idx] = FieldCell::new(
                pressure,
                velocity,
                (right - left) * 0.5,
                (up - down) * 0.5,
            );
        }
    }
}

/// Add a linear-falloff push around the disturbance location.
fn inject(target: &mut Field, disturbance: &Disturbance, params: &SimulationParameters) {
    let radius = params.disturbance_radius;
    if radius <= 0.0 {
        return;
    }

    let size = target.dimensions().as_vec2();
    // Radius extent in cells along each axis
    let extent = match params.radius_space {
        RadiusSpace::Grid => Vec2::splat(radius),
        RadiusSpace::Normalized => size * radius,
    };

    let min = (disturbance.location - extent).floor().max(Vec2::ZERO);
    let max = (disturbance.location + extent)
        .ceil()
        .min(size - Vec2::ONE);
    if min.x > max.x || min.y > max.y {
        return;
    }

    let amount = params.disturbance_strength * disturbance.magnitude;
    for y in min.y as u32..=max.y as u32 {
        for x in min.x as u32..=max.x as u32 {
            let offset = Vec2::new(x as f32, y as f32) - disturbance.location;
            let distance = match params.radius_space {
                RadiusSpace::Grid => offset.length(),
                RadiusSpace::Normalized => (offset / size).length(),
            };
            if distance >= radius {
                continue;
            }

            let push = amount * (1.0 - distance / radius);
            let idx = target.index(x, y);
            let cell = &mut target.cells_mut()[idx];
            cell.pressure += push;
            if params.injection == InjectionTarget::PressureAndVelocity {
                cell.velocity += push;
            }
        }
    }
}
