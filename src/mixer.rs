use serde::{Deserialize, Serialize};

use crate::control::ControlLimits;
use crate::layout::RotorLayout;
use crate::state::FlightState;

/// Mix gains for the attitude-rate contributions.
///
/// Tuned to keep headroom around the throttle baseline; the defaults
/// preserve the stock response character.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MixerGains {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Default for MixerGains {
    fn default() -> Self {
        Self {
            roll: 0.5,
            pitch: 0.5,
            yaw: 0.25,
        }
    }
}

/// Distributes a scalar throttle plus attitude-rate commands across a rotor
/// frame, weighting each rotor by its normalized moment arm and spin sense.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotorMixer {
    pub gains: MixerGains,
    /// Axis maxima used to normalize the tracked rates into commands; must
    /// match the limits the control shaper runs with.
    pub limits: ControlLimits,
}

impl MotorMixer {
    pub fn new(gains: MixerGains, limits: ControlLimits) -> Self {
        Self { gains, limits }
    }

    /// Per-rotor power fraction in `[0, 1]`, index-aligned with
    /// `layout.rotors`. A pure function of its inputs; an empty layout
    /// yields an empty vector.
    pub fn mix(&self, state: &FlightState, layout: &RotorLayout) -> Vec<f64> {
        let lever = state.throttle_lever.clamp(0., 1.);
        let roll_cmd = self.limits.roll_command(state.lateral_velocity);
        let pitch_cmd = self.limits.pitch_command(state.longitudinal_velocity);
        let yaw_cmd = self.limits.yaw_command(state.yaw_rate);

        layout
            .rotors
            .iter()
            .map(|rotor| {
                let x_norm = rotor.x / layout.arm_reach;
                let y_norm = rotor.y / layout.arm_reach;

                // Roll loads the side being pushed down, pitch loads the
                // rear for nose-down (front rotors have y < 0), yaw speeds
                // up the rotors spinning with the commanded sense.
                let power = lever
                    + self.gains.roll * roll_cmd * x_norm
                    + self.gains.pitch * pitch_cmd * y_norm
                    + self.gains.yaw * yaw_cmd * rotor.spin.sign();
                power.clamp(0., 1.)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::MotorMixer;
    use crate::layout::{LayoutKind, RotorLayout};
    use crate::state::FlightState;
    use approx::assert_relative_eq;

    fn hover_state() -> FlightState {
        FlightState {
            throttle_lever: 0.5,
            on_ground: false,
            ..FlightState::default()
        }
    }

    #[test]
    fn output_is_index_aligned_and_bounded() {
        let mixer = MotorMixer::default();
        let mut state = hover_state();
        state.lateral_velocity = 6.0;
        state.longitudinal_velocity = -8.0;
        state.yaw_rate = 3.0;

        for kind in [
            LayoutKind::QuadX,
            LayoutKind::QuadPlus,
            LayoutKind::HexPlus,
            LayoutKind::HexX,
        ] {
            let layout = kind.layout();
            let powers = mixer.mix(&state, &layout);
            assert_eq!(powers.len(), layout.rotor_count());
            assert!(powers.iter().all(|p| (0. ..=1.).contains(p)));
        }
    }

    #[test]
    fn hover_is_uniform_on_quad_plus() {
        let mixer = MotorMixer::default();
        let layout = LayoutKind::QuadPlus.layout();

        let powers = mixer.mix(&hover_state(), &layout);
        assert_eq!(powers, vec![0.5, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn full_yaw_splits_quad_x_by_spin() {
        let mixer = MotorMixer::default();
        let layout = LayoutKind::QuadX.layout();
        let mut state = hover_state();
        state.yaw_rate = mixer.limits.max_yaw_rate;

        let powers = mixer.mix(&state, &layout);
        // Rotor order CCW, CW, CW, CCW: spin-aligned rotors gain 0.25.
        assert_eq!(powers, vec![0.75, 0.25, 0.25, 0.75]);
    }

    #[test]
    fn mixing_is_pure() {
        let mixer = MotorMixer::default();
        let layout = LayoutKind::HexX.layout();
        let mut state = hover_state();
        state.lateral_velocity = 2.5;
        state.yaw_rate = -1.0;

        assert_eq!(mixer.mix(&state, &layout), mixer.mix(&state, &layout));
    }

    #[test]
    fn commands_past_the_maxima_are_clamped() {
        let mixer = MotorMixer::default();
        let layout = LayoutKind::QuadX.layout();
        let mut state = hover_state();
        state.yaw_rate = mixer.limits.max_yaw_rate * 10.;

        let powers = mixer.mix(&state, &layout);
        assert_relative_eq!(powers[0], 0.75);
        assert_relative_eq!(powers[1], 0.25);
    }

    #[test]
    fn saturation_clamps_to_unit_range() {
        let mixer = MotorMixer::default();
        let layout = LayoutKind::QuadX.layout();
        let mut state = hover_state();
        state.throttle_lever = 1.0;
        state.yaw_rate = mixer.limits.max_yaw_rate;

        let powers = mixer.mix(&state, &layout);
        assert_relative_eq!(powers[0], 1.0);
        assert_relative_eq!(powers[1], 0.75);
    }

    #[test]
    fn empty_layout_yields_empty_vector() {
        let mixer = MotorMixer::default();
        let layout = RotorLayout::new(Vec::new());
        assert!(mixer.mix(&hover_state(), &layout).is_empty());
    }

    #[test]
    fn forward_command_loads_the_rear_rotors() {
        let mixer = MotorMixer::default();
        let layout = LayoutKind::QuadPlus.layout();
        let mut state = hover_state();
        state.longitudinal_velocity = mixer.limits.max_longitudinal;

        let powers = mixer.mix(&state, &layout);
        // R1 is the nose rotor (y < 0), R3 the tail.
        assert!(powers[0] < 0.5);
        assert!(powers[2] > 0.5);
        assert_relative_eq!(powers[1], 0.5);
        assert_relative_eq!(powers[3], 0.5);
    }
}
