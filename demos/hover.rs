use std::thread;
use std::time::Duration;

use embedded_time::{clock, rate::Fraction, Clock, Instant};
use multirotor_sim::{Intent, IntentSet, SimulationClock, Simulator};

/// Monotonic microsecond clock backed by the process start time.
struct ProcessClock {
    start: std::time::Instant,
}

impl ProcessClock {
    fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

impl Clock for ProcessClock {
    type T = u32;

    const SCALING_FACTOR: Fraction = Fraction::new(1, 1_000_000);

    fn try_now(&self) -> Result<Instant<Self>, clock::Error> {
        Ok(Instant::new(self.start.elapsed().as_micros() as u32))
    }
}

fn main() {
    let mut sim = Simulator::default();
    let mut clock = SimulationClock::new(ProcessClock::new());
    let mut intents = IntentSet::default();

    // Push the lever up for two seconds, then hold it and watch the climb.
    intents.press(Intent::ThrottleUp);
    let mut last_frame = None;
    for frame_index in 0..240 {
        if frame_index == 120 {
            intents.release(Intent::ThrottleUp);
        }
        if let Some(frame) = clock.tick(&mut sim, &intents).unwrap() {
            last_frame = Some(frame);
        }
        thread::sleep(Duration::from_millis(16));
    }

    let frame = last_frame.expect("at least one unpaused frame");
    println!("{}", frame.readout());
    println!("Lever: {}%", multirotor_sim::power_percent(frame.state.throttle_lever));
    for (rotor, pct) in frame.layout.rotors.iter().zip(frame.power_percents()) {
        println!("{} [{:?}] {}%", rotor.id, rotor.spin, pct);
    }
}
