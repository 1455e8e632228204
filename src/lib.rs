//! # multirotor-sim
//! A multirotor flight simulation library
//!
//! # Components
//! [`RotorLayout`] describes a rotor frame: positions, spin directions and
//! the normalized arm reach (see [`layout_for`] for the preset catalog).
//!
//! [`ControlShaper`] turns held pilot [`Intent`]s into smoothed velocity and
//! yaw-rate targets on a [`FlightState`].
//!
//! [`KinematicIntegrator`] advances the 3-DOF state and clamps it to the
//! ground plane.
//!
//! [`MotorMixer`] distributes the power lever plus attitude-rate commands
//! across the active layout into per-rotor power fractions.
//!
//! [`SimulationClock`] drives one [`Simulator`] step per rendering frame
//! with a clamped time delta and a pause/reset surface, handing each
//! [`FrameOutput`] to the rendering layer.

pub mod control;
pub use control::{ControlLimits, ControlResponse, ControlShaper, Intent, IntentSet, ShapeOutcome};

pub mod filter;

pub mod integrator;
pub use integrator::KinematicIntegrator;

pub mod layout;
pub use layout::{layout_for, LayoutKind, Rotor, RotorLayout, Spin};

pub mod mixer;
pub use mixer::{MixerGains, MotorMixer};

pub mod output;
pub use output::{power_percent, FrameOutput, Readout};

pub mod sim;
pub use sim::{Error, LayoutChanged, SimListener, SimulationClock, Simulator, MAX_STEP};

pub mod state;
pub use state::{FlightState, GROUND_HEIGHT};
