use serde::{Deserialize, Serialize};

/// Radius of the plus-quad and hex presets.
const PRESET_RADIUS: f64 = 75.0;
/// Per-axis rotor offset of the X-quad preset.
const QUAD_X_OFFSET: f64 = 55.0;

/// Rotor spin direction.
///
/// Alternating the sense across a frame balances reactive yaw torque.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spin {
    Cw,
    Ccw,
}

impl Spin {
    /// +1 for counter-clockwise, -1 for clockwise (right-hand rule, up axis).
    pub fn sign(self) -> f64 {
        match self {
            Spin::Ccw => 1.,
            Spin::Cw => -1.,
        }
    }
}

/// One rotor in a frame, positioned in the body-frame plane.
///
/// `x` is right-positive, `y` is back-positive; front rotors have `y < 0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rotor {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub spin: Spin,
}

impl Rotor {
    pub fn new(id: impl Into<String>, x: f64, y: f64, spin: Spin) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            spin,
        }
    }

    /// Distance from the body center.
    pub fn arm_length(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// The named frame presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
    QuadX,
    QuadPlus,
    HexPlus,
    HexX,
}

impl LayoutKind {
    pub fn name(self) -> &'static str {
        match self {
            LayoutKind::QuadX => "quad-x",
            LayoutKind::QuadPlus => "quad-plus",
            LayoutKind::HexPlus => "hex-plus",
            LayoutKind::HexX => "hex-x",
        }
    }

    /// Match a requested name after case normalization and aliasing
    /// (`"quad"` means the plus frame, `"hex"` likewise).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "quad-x" | "quadx" => Some(LayoutKind::QuadX),
            "quad-plus" | "quad+" | "quad" => Some(LayoutKind::QuadPlus),
            "hex-plus" | "hex+" | "hex" => Some(LayoutKind::HexPlus),
            "hex-x" | "hexx" => Some(LayoutKind::HexX),
            _ => None,
        }
    }

    /// Resolve a requested name to a preset. Unknown names are a fallback
    /// policy, not an error: they resolve to the X-quad.
    pub fn resolve(name: &str) -> Self {
        LayoutKind::from_name(name).unwrap_or_else(|| {
            log::debug!("unknown layout {name:?}, falling back to quad-x");
            LayoutKind::QuadX
        })
    }

    /// Build the preset geometry.
    pub fn layout(self) -> RotorLayout {
        match self {
            LayoutKind::QuadX => quad_x(),
            LayoutKind::QuadPlus => quad_plus(),
            LayoutKind::HexPlus => hex(0.),
            LayoutKind::HexX => hex(30.),
        }
    }
}

/// Rotor geometry for one frame configuration.
///
/// Immutable once constructed; selecting another configuration builds a new
/// value. `arm_reach` is the largest rotor distance from the center, floored
/// at 1.0 so degenerate geometry never amplifies through division.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotorLayout {
    pub rotors: Vec<Rotor>,
    /// Frame arm segments `[x1, y1, x2, y2]` for rendering.
    pub arms: Vec<[f64; 4]>,
    pub arm_reach: f64,
}

impl RotorLayout {
    /// Build a layout from rotors alone, with one arm from the center to
    /// each rotor.
    pub fn new(rotors: Vec<Rotor>) -> Self {
        let arms = rotors.iter().map(|r| [0., 0., r.x, r.y]).collect();
        Self::with_arms(rotors, arms)
    }

    pub fn with_arms(rotors: Vec<Rotor>, arms: Vec<[f64; 4]>) -> Self {
        debug_assert!(
            rotors
                .iter()
                .enumerate()
                .all(|(i, a)| rotors[..i].iter().all(|b| a.id != b.id)),
            "rotor ids must be unique within a layout"
        );
        let arm_reach = rotors
            .iter()
            .map(Rotor::arm_length)
            .fold(1.0_f64, f64::max);
        Self {
            rotors,
            arms,
            arm_reach,
        }
    }

    pub fn rotor_count(&self) -> usize {
        self.rotors.len()
    }
}

/// Resolve a layout request to concrete geometry, falling back to the
/// default X-quad for unknown names.
pub fn layout_for(name: &str) -> RotorLayout {
    LayoutKind::resolve(name).layout()
}

fn quad_x() -> RotorLayout {
    let s = QUAD_X_OFFSET;
    // Diagonal pairs share spin, the standard counter-rotating arrangement.
    RotorLayout::with_arms(
        vec![
            Rotor::new("R1", -s, -s, Spin::Ccw),
            Rotor::new("R2", s, -s, Spin::Cw),
            Rotor::new("R3", -s, s, Spin::Cw),
            Rotor::new("R4", s, s, Spin::Ccw),
        ],
        vec![[-s, -s, s, s], [s, -s, -s, s]],
    )
}

fn quad_plus() -> RotorLayout {
    let r = PRESET_RADIUS;
    RotorLayout::with_arms(
        vec![
            Rotor::new("R1", 0., -r, Spin::Ccw),
            Rotor::new("R2", r, 0., Spin::Cw),
            Rotor::new("R3", 0., r, Spin::Ccw),
            Rotor::new("R4", -r, 0., Spin::Cw),
        ],
        vec![[0., -r, 0., r], [-r, 0., r, 0.]],
    )
}

/// Six rotors evenly spaced by 60°, starting at `offset_deg` (0° puts one
/// arm straight forward, 30° faces a gap forward), spins alternating by
/// index parity.
fn hex(offset_deg: f64) -> RotorLayout {
    let mut rotors = Vec::with_capacity(6);
    for i in 0..6 {
        // -90 so an offset of zero points straight forward
        let angle = (-90. + offset_deg + i as f64 * 60.).to_radians();
        let x = angle.cos() * PRESET_RADIUS;
        let y = angle.sin() * PRESET_RADIUS;
        let spin = if i % 2 == 0 { Spin::Ccw } else { Spin::Cw };
        rotors.push(Rotor::new(format!("R{}", i + 1), x, y, spin));
    }
    RotorLayout::new(rotors)
}
