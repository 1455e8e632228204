use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Landing-gear clearance: the lowest the body center may rest above the
/// ground plane.
pub const GROUND_HEIGHT: f64 = 0.06;

/// Kinematic state of the aircraft, world frame, y up.
///
/// Written only by the control shaper (targets) and the integrator (actuals);
/// the mixer reads it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    /// Heading in radians about world up.
    pub yaw: f64,
    /// Tracked yaw rate in radians/second.
    pub yaw_rate: f64,
    /// Tracked climb rate in units/second.
    pub vertical_velocity: f64,
    /// Tracked strafe speed, left-positive.
    pub lateral_velocity: f64,
    /// Tracked forward/back speed, forward-positive.
    pub longitudinal_velocity: f64,
    /// Sticky power lever in `[0, 1]`; 0.5 is the hover point.
    pub throttle_lever: f64,
    pub on_ground: bool,
}

impl Default for FlightState {
    fn default() -> Self {
        Self {
            position: Vector3::new(0., GROUND_HEIGHT, 0.),
            velocity: Vector3::zeros(),
            yaw: 0.,
            yaw_rate: 0.,
            vertical_velocity: 0.,
            lateral_velocity: 0.,
            longitudinal_velocity: 0.,
            throttle_lever: 0.,
            on_ground: true,
        }
    }
}

impl FlightState {
    /// Height above the resting position.
    pub fn altitude(&self) -> f64 {
        self.position.y - GROUND_HEIGHT
    }

    /// Restore the grounded zero state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
