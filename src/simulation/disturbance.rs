use bevy::prelude::*;

use super::parameters::DisturbanceDrive;

/// A transient push applied to the field during exactly one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disturbance {
    /// Centre of the push in grid coordinates (cell `(x, y)` is centred at `(x, y)`).
    pub location: Vec2,
    /// Scales the injected amount; zero injects nothing.
    pub magnitude: f32,
}

impl Disturbance {
    pub fn new(location: Vec2, magnitude: f32) -> Self {
        Self { location, magnitude }
    }

    /// Disturbance from two consecutive pointer samples: located at the
    /// latest sample, with the distance travelled as magnitude.
    pub fn between(previous: Vec2, current: Vec2) -> Self {
        Self::new(current, previous.distance(current))
    }

    pub fn is_active(&self) -> bool {
        self.magnitude > 0.0
    }
}

/// Maps logical window pixels (origin top-left) onto grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMapping {
    pub window_size: Vec2,
    pub grid_size: UVec2,
}

impl FieldMapping {
    pub fn new(window_size: Vec2, grid_size: UVec2) -> Self {
        Self {
            window_size,
            grid_size,
        }
    }

    /// Window position to grid coordinates, matching pixel centres to cell centres.
    pub fn to_grid(&self, window_position: Vec2) -> Vec2 {
        let scale = self.grid_size.as_vec2() / self.window_size.max(Vec2::ONE);
        window_position * scale - Vec2::splat(0.5)
    }
}

/// Pointer samples recorded by the driver between frames.
///
/// The tracker keeps the grid position handed out on the previous frame so
/// that [`DisturbanceDrive::Motion`] measures per-frame pointer travel. A
/// pointer that stays still yields no disturbance.
#[derive(Resource, Debug, Default, Clone)]
pub struct PointerTracker {
    latest: Option<Vec2>,
    previous_grid: Option<Vec2>,
}

impl PointerTracker {
    /// Record a pointer position in logical window pixels.
    pub fn record(&mut self, window_position: Vec2) {
        self.latest = Some(window_position);
    }

    /// The pointer left the viewport.
    pub fn clear(&mut self) {
        self.latest = None;
        self.previous_grid = None;
    }

    /// Drop the previous-frame position, e.g. after the grid was resized.
    pub fn forget_motion(&mut self) {
        self.previous_grid = None;
    }

    pub fn is_present(&self) -> bool {
        self.latest.is_some()
    }

    /// Disturbance for the coming step, if the pointer should perturb the field.
    pub fn take_disturbance(
        &mut self,
        drive: DisturbanceDrive,
        mapping: &FieldMapping,
    ) -> Option<Disturbance> {
        let position = mapping.to_grid(self.latest?);
        let previous = self.previous_grid.replace(position);

        let disturbance = match drive {
            DisturbanceDrive::Motion => {
                Disturbance::between(previous.unwrap_or(position), position)
            }
            DisturbanceDrive::Presence => Disturbance::new(position, 1.0),
        };
        disturbance.is_active().then_some(disturbance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_mapping() -> FieldMapping {
        FieldMapping::new(Vec2::new(100.0, 50.0), UVec2::new(100, 50))
    }

    #[test]
    fn test_between_uses_travel_distance() {
        let d = Disturbance::between(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0));
        assert_eq!(d.location, Vec2::new(4.0, 5.0));
        assert!((d.magnitude - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_mapping_centres() {
        let mapping = FieldMapping::new(Vec2::new(200.0, 100.0), UVec2::new(100, 50));
        // Centre of the first pixel pair lands on cell 0
        assert_eq!(mapping.to_grid(Vec2::new(1.0, 1.0)), Vec2::new(0.0, 0.0));
        assert_eq!(mapping.to_grid(Vec2::new(200.0, 100.0)), Vec2::new(99.5, 49.5));
    }

    #[test]
    fn test_motion_requires_movement() {
        let mapping = identity_mapping();
        let mut tracker = PointerTracker::default();

        // No pointer yet
        assert!(tracker.take_disturbance(DisturbanceDrive::Motion, &mapping).is_none());

        // First sample has nothing to compare against
        tracker.record(Vec2::new(10.5, 10.5));
        assert!(tracker.take_disturbance(DisturbanceDrive::Motion, &mapping).is_none());

        tracker.record(Vec2::new(13.5, 14.5));
        let d = tracker
            .take_disturbance(DisturbanceDrive::Motion, &mapping)
            .expect("moving pointer disturbs");
        assert_eq!(d.location, Vec2::new(13.0, 14.0));
        assert!((d.magnitude - 5.0).abs() < 1e-5);

        // Stationary pointer on the next frame
        assert!(tracker.take_disturbance(DisturbanceDrive::Motion, &mapping).is_none());
    }

    #[test]
    fn test_presence_drive() {
        let mapping = identity_mapping();
        let mut tracker = PointerTracker::default();
        tracker.record(Vec2::new(20.5, 5.5));

        for _ in 0..3 {
            let d = tracker
                .take_disturbance(DisturbanceDrive::Presence, &mapping)
                .unwrap();
            assert_eq!(d.magnitude, 1.0);
            assert_eq!(d.location, Vec2::new(20.0, 5.0));
        }

        tracker.clear();
        assert!(!tracker.is_present());
        assert!(tracker.take_disturbance(DisturbanceDrive::Presence, &mapping).is_none());
    }

    #[test]
    fn test_forget_motion_after_resize() {
        let mut tracker = PointerTracker::default();
        tracker.record(Vec2::new(10.0, 10.0));
        let _ = tracker.take_disturbance(DisturbanceDrive::Motion, &identity_mapping());

        tracker.forget_motion();
        let halved = FieldMapping::new(Vec2::new(100.0, 50.0), UVec2::new(50, 25));
        assert!(tracker.take_disturbance(DisturbanceDrive::Motion, &halved).is_none());
    }
}
