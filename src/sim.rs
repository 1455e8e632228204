use embedded_time::{clock, duration::Microseconds, Clock, ConversionError};

use crate::control::{ControlShaper, IntentSet};
use crate::integrator::KinematicIntegrator;
use crate::layout::{LayoutKind, RotorLayout};
use crate::mixer::{MixerGains, MotorMixer};
use crate::output::FrameOutput;
use crate::state::FlightState;

/// Longest time step fed to one tick, in seconds. Frame stalls are clamped
/// to this, not sub-stepped, bounding the integration error.
pub const MAX_STEP: f64 = 0.033;

/// Simulation clock failure raised by the underlying platform clock.
#[derive(Debug)]
pub enum Error {
    Clock(clock::Error),
    Time(ConversionError),
}

impl From<clock::Error> for Error {
    fn from(clock_error: clock::Error) -> Self {
        Error::Clock(clock_error)
    }
}

impl From<ConversionError> for Error {
    fn from(time_error: ConversionError) -> Self {
        Error::Time(time_error)
    }
}

/// Notification that the active rotor layout was swapped.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutChanged {
    /// The name as requested, before normalization.
    pub requested: String,
    /// The preset the request resolved to (the default on unknown names).
    pub resolved: LayoutKind,
    pub layout: RotorLayout,
}

/// Observer interface for the non-fatal simulation events.
pub trait SimListener {
    /// The active rotor layout was replaced between ticks.
    fn layout_changed(&mut self, _event: &LayoutChanged) {}

    /// Lateral, longitudinal or yaw input was rejected while resting on the
    /// ground; hosts typically surface a transient operator message.
    fn input_rejected(&mut self) {}
}

/// One logical simulation session: the flight state, the active layout and
/// the components that advance them once per rendering frame.
pub struct Simulator {
    pub state: FlightState,
    layout: RotorLayout,
    layout_kind: LayoutKind,
    pub shaper: ControlShaper,
    pub integrator: KinematicIntegrator,
    pub mixer: MotorMixer,
    listeners: Vec<Box<dyn SimListener>>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(LayoutKind::QuadX)
    }
}

impl Simulator {
    pub fn new(kind: LayoutKind) -> Self {
        let shaper = ControlShaper::default();
        Self {
            state: FlightState::default(),
            layout: kind.layout(),
            layout_kind: kind,
            shaper,
            integrator: KinematicIntegrator::default(),
            mixer: MotorMixer::new(MixerGains::default(), shaper.limits),
            listeners: Vec::new(),
        }
    }

    pub fn layout(&self) -> &RotorLayout {
        &self.layout
    }

    pub fn layout_kind(&self) -> LayoutKind {
        self.layout_kind
    }

    pub fn add_listener(&mut self, listener: Box<dyn SimListener>) {
        self.listeners.push(listener);
    }

    /// Swap the active layout between ticks; no tick ever observes a
    /// half-updated geometry. Unknown names resolve to the default preset.
    pub fn set_layout(&mut self, name: &str) {
        let kind = LayoutKind::resolve(name);
        self.layout = kind.layout();
        self.layout_kind = kind;
        log::debug!("rotor layout set to {}", kind.name());

        let event = LayoutChanged {
            requested: name.to_string(),
            resolved: kind,
            layout: self.layout.clone(),
        };
        for listener in &mut self.listeners {
            listener.layout_changed(&event);
        }
    }

    /// Restore the grounded zero state in a single assignment.
    pub fn reset(&mut self) {
        self.state = FlightState::default();
        log::debug!("flight state reset");
    }

    /// One strictly synchronous pass: shape controls, integrate, mix.
    pub fn step(&mut self, intents: &IntentSet, dt: f64) -> FrameOutput {
        let dt = dt.clamp(0., MAX_STEP);

        let outcome = self.shaper.shape(intents, &mut self.state, dt);
        if outcome.ground_input_rejected {
            log::trace!("planar input rejected on ground contact");
            for listener in &mut self.listeners {
                listener.input_rejected();
            }
        }

        self.integrator.integrate(&mut self.state, dt);
        let powers = self.mixer.mix(&self.state, &self.layout);

        FrameOutput {
            state: self.state,
            powers,
            layout: self.layout.clone(),
            attitude: self.integrator.attitude(&self.state, &self.shaper.limits),
        }
    }
}

/// Drives one simulator step per rendering frame from a monotonic clock.
pub struct SimulationClock<C> {
    clock: C,
    last_us: Option<u32>,
    paused: bool,
}

impl<C> SimulationClock<C>
where
    C: Clock<T = u32>,
{
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last_us: None,
            paused: false,
        }
    }

    /// Flip the pause state and return the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Run one frame. Returns `None` while paused; the renderer keeps its
    /// previous frame data.
    pub fn tick(
        &mut self,
        sim: &mut Simulator,
        intents: &IntentSet,
    ) -> Result<Option<FrameOutput>, Error> {
        let now = self.micros_since_epoch()?;
        let dt = match self.last_us {
            Some(last) => now.wrapping_sub(last) as f64 * 1e-6,
            // Nominal step for the very first frame.
            None => MAX_STEP,
        };
        self.last_us = Some(now);

        if self.paused {
            return Ok(None);
        }
        Ok(Some(sim.step(intents, dt)))
    }

    fn micros_since_epoch(&mut self) -> Result<u32, Error> {
        let instant = self.clock.try_now()?;
        Microseconds::try_from(instant.duration_since_epoch())
            .map(|us| us.0)
            .map_err(Into::into)
    }
}
