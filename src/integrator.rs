use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::control::ControlLimits;
use crate::filter::response_alpha;
use crate::state::{FlightState, GROUND_HEIGHT};

/// Advances the 3-DOF kinematic state: yaw, translational velocity and
/// position, plus the ground-contact clamp.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KinematicIntegrator {
    /// First-order lerp gain low-passing translational velocity. Visual
    /// smoothing, not a physical drag force.
    pub drag_gain: f64,
    /// Resting height of the body center above the ground plane.
    pub ground_height: f64,
    /// Cosmetic tilt limit in radians for the derived rendering attitude.
    pub max_tilt: f64,
}

impl Default for KinematicIntegrator {
    fn default() -> Self {
        Self {
            drag_gain: 4.,
            ground_height: GROUND_HEIGHT,
            max_tilt: 0.2,
        }
    }
}

impl KinematicIntegrator {
    /// Advance `state` by `dt` seconds.
    pub fn integrate(&self, state: &mut FlightState, dt: f64) {
        state.yaw += state.yaw_rate * dt;

        // Yaw-only body basis; pitch and roll never feed back into the
        // translational dynamics.
        let (sin_yaw, cos_yaw) = state.yaw.sin_cos();
        let left = Vector3::new(cos_yaw, 0., -sin_yaw);
        let forward = Vector3::new(sin_yaw, 0., cos_yaw);

        let desired = left * state.lateral_velocity
            + forward * state.longitudinal_velocity
            + Vector3::y() * state.vertical_velocity;

        state.velocity = state.velocity.lerp(&desired, response_alpha(self.drag_gain, dt));
        state.position += state.velocity * dt;

        if state.position.y <= self.ground_height {
            state.position.y = self.ground_height;
            state.velocity.y = state.velocity.y.max(0.);
            state.on_ground = true;
        } else {
            state.on_ground = false;
        }
    }

    /// Rendering attitude: yaw about world up, then a small pitch and roll
    /// proportional to the velocity fractions. Derived for display only.
    pub fn attitude(&self, state: &FlightState, limits: &ControlLimits) -> UnitQuaternion<f64> {
        let roll = (-limits.roll_command(state.lateral_velocity) * self.max_tilt)
            .clamp(-self.max_tilt, self.max_tilt);
        let pitch = (limits.pitch_command(state.longitudinal_velocity) * self.max_tilt)
            .clamp(-self.max_tilt, self.max_tilt);

        // Pitch about the local right axis, roll about the local forward
        // axis, both after the yaw rotation.
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), state.yaw)
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch)
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), roll)
    }
}
