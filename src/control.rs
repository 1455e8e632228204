use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::filter::{approach, response_alpha};
use crate::state::FlightState;

/// A held pilot command.
///
/// Intents are levels (held / not held), not edge events; the input
/// collaborator keeps an [`IntentSet`] current and the next tick reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    ThrottleUp,
    ThrottleDown,
    YawLeft,
    YawRight,
    StrafeLeft,
    StrafeRight,
    Forward,
    Backward,
}

impl Intent {
    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// The set of currently-held intents. Last writer wins; there is no queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentSet {
    held: u8,
}

impl IntentSet {
    pub fn press(&mut self, intent: Intent) {
        self.held |= intent.bit();
    }

    pub fn release(&mut self, intent: Intent) {
        self.held &= !intent.bit();
    }

    pub fn is_held(&self, intent: Intent) -> bool {
        self.held & intent.bit() != 0
    }

    pub fn clear(&mut self) {
        self.held = 0;
    }

    fn axis(&self, positive: Intent, negative: Intent) -> f64 {
        let mut value = 0.;
        if self.is_held(positive) {
            value += 1.;
        }
        if self.is_held(negative) {
            value -= 1.;
        }
        value
    }

    /// Power lever intent in {-1, 0, +1}.
    pub fn throttle(&self) -> f64 {
        self.axis(Intent::ThrottleUp, Intent::ThrottleDown)
    }

    /// Yaw intent, left-positive.
    pub fn yaw(&self) -> f64 {
        self.axis(Intent::YawLeft, Intent::YawRight)
    }

    /// Strafe intent, left-positive.
    pub fn lateral(&self) -> f64 {
        self.axis(Intent::StrafeLeft, Intent::StrafeRight)
    }

    /// Forward/back intent, forward-positive.
    pub fn longitudinal(&self) -> f64 {
        self.axis(Intent::Forward, Intent::Backward)
    }
}

/// Axis maxima for the shaped velocity and yaw-rate targets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    /// Strafe speed ceiling in units/second.
    pub max_lateral: f64,
    /// Forward/back speed ceiling in units/second.
    pub max_longitudinal: f64,
    /// Climb/descent rate ceiling in units/second.
    pub max_vertical: f64,
    /// Yaw rate ceiling in radians/second.
    pub max_yaw_rate: f64,
}

impl Default for ControlLimits {
    fn default() -> Self {
        Self {
            max_lateral: 6.,
            max_longitudinal: 8.,
            max_vertical: 8.,
            max_yaw_rate: PI,
        }
    }
}

impl ControlLimits {
    /// Normalized roll command in `[-1, 1]` from the tracked strafe speed.
    pub fn roll_command(&self, lateral_velocity: f64) -> f64 {
        (lateral_velocity / non_zero(self.max_lateral)).clamp(-1., 1.)
    }

    /// Normalized pitch command in `[-1, 1]` from the tracked forward speed.
    pub fn pitch_command(&self, longitudinal_velocity: f64) -> f64 {
        (longitudinal_velocity / non_zero(self.max_longitudinal)).clamp(-1., 1.)
    }

    /// Normalized yaw command in `[-1, 1]` from the tracked yaw rate.
    pub fn yaw_command(&self, yaw_rate: f64) -> f64 {
        (yaw_rate / non_zero(self.max_yaw_rate)).clamp(-1., 1.)
    }
}

fn non_zero(max: f64) -> f64 {
    if max == 0. {
        1.
    } else {
        max
    }
}

/// Response rates for the control axes.
///
/// Empirically tuned; the defaults preserve the stock response character.
/// The lateral gain shapes both the strafe and forward axes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlResponse {
    /// Lever travel in full-range units per second.
    pub lever_rate: f64,
    pub lateral_gain: f64,
    pub vertical_gain: f64,
    pub yaw_gain: f64,
}

impl Default for ControlResponse {
    fn default() -> Self {
        Self {
            lever_rate: 0.6,
            lateral_gain: 8.,
            vertical_gain: 6.,
            yaw_gain: 6.,
        }
    }
}

/// What one shaping pass observed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShapeOutcome {
    /// Lateral, longitudinal or yaw motion was commanded while resting on
    /// the ground and has been zeroed.
    pub ground_input_rejected: bool,
}

/// Converts held intents into smoothed velocity and yaw-rate targets.
///
/// Each axis maps its intent to a target value scaled by the axis maximum
/// and tracks it with a first-order response; the power lever integrates
/// directly and is sticky at zero intent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlShaper {
    pub limits: ControlLimits,
    pub response: ControlResponse,
}

impl ControlShaper {
    pub fn shape(&self, intents: &IntentSet, state: &mut FlightState, dt: f64) -> ShapeOutcome {
        let lever_intent = intents.throttle();
        if lever_intent != 0. {
            state.throttle_lever =
                (state.throttle_lever + lever_intent * self.response.lever_rate * dt).clamp(0., 1.);
        }

        // Lever 0.5 is the hover point: no climb target.
        let vertical_target = (state.throttle_lever - 0.5) * 2. * self.limits.max_vertical;

        let lateral_alpha = response_alpha(self.response.lateral_gain, dt);
        state.lateral_velocity = approach(
            state.lateral_velocity,
            intents.lateral() * self.limits.max_lateral,
            lateral_alpha,
        );
        state.longitudinal_velocity = approach(
            state.longitudinal_velocity,
            intents.longitudinal() * self.limits.max_longitudinal,
            lateral_alpha,
        );
        state.vertical_velocity = approach(
            state.vertical_velocity,
            vertical_target,
            response_alpha(self.response.vertical_gain, dt),
        );
        state.yaw_rate = approach(
            state.yaw_rate,
            intents.yaw() * self.limits.max_yaw_rate,
            response_alpha(self.response.yaw_gain, dt),
        );

        // Resting on the ground the frame cannot slide or rotate. Applied
        // after smoothing so no residual rate survives a contact event
        // within the same tick.
        let mut outcome = ShapeOutcome::default();
        if state.on_ground
            && (state.lateral_velocity != 0.
                || state.longitudinal_velocity != 0.
                || state.yaw_rate != 0.)
        {
            state.lateral_velocity = 0.;
            state.longitudinal_velocity = 0.;
            state.yaw_rate = 0.;
            outcome.ground_input_rejected = true;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlShaper, Intent, IntentSet};
    use crate::state::FlightState;
    use approx::assert_relative_eq;

    fn airborne() -> FlightState {
        FlightState {
            on_ground: false,
            ..FlightState::default()
        }
    }

    #[test]
    fn lever_is_sticky() {
        let shaper = ControlShaper::default();
        let mut state = airborne();
        let mut intents = IntentSet::default();

        intents.press(Intent::ThrottleUp);
        shaper.shape(&intents, &mut state, 0.5);
        assert_relative_eq!(state.throttle_lever, 0.3);

        intents.release(Intent::ThrottleUp);
        shaper.shape(&intents, &mut state, 0.5);
        assert_relative_eq!(state.throttle_lever, 0.3);
    }

    #[test]
    fn lever_clamps_to_unit_range() {
        let shaper = ControlShaper::default();
        let mut state = airborne();
        let mut intents = IntentSet::default();

        intents.press(Intent::ThrottleUp);
        for _ in 0..100 {
            shaper.shape(&intents, &mut state, 0.033);
        }
        assert_relative_eq!(state.throttle_lever, 1.0);

        intents.clear();
        intents.press(Intent::ThrottleDown);
        for _ in 0..100 {
            shaper.shape(&intents, &mut state, 0.033);
        }
        assert_relative_eq!(state.throttle_lever, 0.0);
    }

    #[test]
    fn half_lever_commands_zero_climb() {
        let shaper = ControlShaper::default();
        let mut state = airborne();
        state.throttle_lever = 0.5;
        state.vertical_velocity = 4.0;

        let intents = IntentSet::default();
        for _ in 0..120 {
            shaper.shape(&intents, &mut state, 0.033);
        }
        assert_relative_eq!(state.vertical_velocity, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn lateral_velocity_converges_to_its_maximum() {
        let shaper = ControlShaper::default();
        let mut state = airborne();
        let mut intents = IntentSet::default();
        intents.press(Intent::StrafeLeft);

        // Two simulated seconds at the clamped frame step.
        let dt = 0.033;
        let steps = (2.0_f64 / dt).ceil() as usize;
        for _ in 0..steps {
            shaper.shape(&intents, &mut state, dt);
            assert!(state.lateral_velocity <= shaper.limits.max_lateral);
        }
        assert!(state.lateral_velocity >= shaper.limits.max_lateral * 0.99);
    }

    #[test]
    fn opposing_intents_cancel() {
        let mut intents = IntentSet::default();
        intents.press(Intent::YawLeft);
        intents.press(Intent::YawRight);
        assert_relative_eq!(intents.yaw(), 0.0);

        intents.release(Intent::YawRight);
        assert_relative_eq!(intents.yaw(), 1.0);
    }

    #[test]
    fn ground_contact_rejects_planar_input() {
        let shaper = ControlShaper::default();
        let mut state = FlightState::default();
        let mut intents = IntentSet::default();
        intents.press(Intent::Forward);
        intents.press(Intent::YawLeft);

        let outcome = shaper.shape(&intents, &mut state, 0.033);
        assert!(outcome.ground_input_rejected);
        assert_relative_eq!(state.longitudinal_velocity, 0.0);
        assert_relative_eq!(state.lateral_velocity, 0.0);
        assert_relative_eq!(state.yaw_rate, 0.0);
    }

    #[test]
    fn ground_contact_still_accepts_the_lever() {
        let shaper = ControlShaper::default();
        let mut state = FlightState::default();
        let mut intents = IntentSet::default();
        intents.press(Intent::ThrottleUp);

        let outcome = shaper.shape(&intents, &mut state, 0.1);
        assert!(!outcome.ground_input_rejected);
        assert!(state.throttle_lever > 0.);
    }

    #[test]
    fn no_rejection_while_airborne() {
        let shaper = ControlShaper::default();
        let mut state = airborne();
        let mut intents = IntentSet::default();
        intents.press(Intent::Forward);

        let outcome = shaper.shape(&intents, &mut state, 0.033);
        assert!(!outcome.ground_input_rejected);
        assert!(state.longitudinal_velocity > 0.);
    }
}
