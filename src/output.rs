use std::fmt;

use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};

use crate::layout::RotorLayout;
use crate::state::FlightState;

/// Everything the rendering layer needs for one frame, pushed one-way.
///
/// The renderer owns all lookup and update of its own visual elements; the
/// core never reaches into it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    pub state: FlightState,
    /// Per-rotor power fraction in `[0, 1]`, index-aligned with
    /// `layout.rotors`.
    pub powers: Vec<f64>,
    pub layout: RotorLayout,
    /// Derived rendering attitude; never fed back into the dynamics.
    pub attitude: UnitQuaternion<f64>,
}

impl FrameOutput {
    pub fn readout(&self) -> Readout {
        Readout::from_state(&self.state)
    }

    /// Bar-fill percentages for the per-rotor indicators.
    pub fn power_percents(&self) -> Vec<u8> {
        self.powers.iter().map(|&p| power_percent(p)).collect()
    }
}

/// Fixed-precision text readout of planar position, altitude and yaw.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Readout {
    pub x: f64,
    pub z: f64,
    /// Relative to the resting clearance, not the raw height.
    pub altitude: f64,
    pub yaw_degrees: f64,
}

impl Readout {
    pub fn from_state(state: &FlightState) -> Self {
        Self {
            x: state.position.x,
            z: state.position.z,
            altitude: state.altitude(),
            yaw_degrees: state.yaw.to_degrees(),
        }
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Coordinates: ({:.2}, {:.2})", self.x, self.z)?;
        writeln!(f, "Altitude: {:.2}", self.altitude)?;
        write!(f, "Yaw: {:.1}°", self.yaw_degrees)
    }
}

/// Indicator percentage for one rotor: `round(power * 100)`, clamped first.
pub fn power_percent(power: f64) -> u8 {
    (power.clamp(0., 1.) * 100.).round() as u8
}
