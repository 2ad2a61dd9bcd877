// Tunable values for the network. Everything the host can change lives in
// NetworkConfig, the fixed timing and shape constants live alongside it.

use crate::color::Color;
use std::fmt;
use std::str::FromStr;

/// Opacity added to every particle each frame until it reaches 1.
pub const FADE_IN_STEP: f64 = 0.01;
/// How far past the surface edge a particle may drift before it turns back.
pub const BOUNDARY_MARGIN: f64 = 100.0;
pub const MIN_RADIUS: f64 = 1.5;
pub const MAX_RADIUS: f64 = 2.5;

pub const POPULATION_TICK_MS: u32 = 250;
pub const POINTER_SPAWN_TICK_MS: u32 = 50;
pub const TAP_WINDOW_MS: u32 = 200;
pub const RESIZE_DEBOUNCE_MS: u32 = 500;

/// Ceiling on the density-driven population. Sprays and taps are not capped.
pub const MAX_TARGET_QUANTITY: usize = 10_000;

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    /// Scale of the random per-axis velocity. Zero freezes the field and
    /// stops the loop after the first frame.
    pub speed: f64,
    /// Surface area per particle. Smaller means denser.
    pub density: f64,
    pub net_line_distance: f64,
    pub net_line_color: Color,
    pub net_line_width: f64,
    pub particle_colors: Vec<Color>,
    /// Particles dropped on the first pointer-down tick and on a tap.
    pub spawn_quantity: usize,
    pub interactive: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            speed: SpeedPreset::Fast.value(),
            density: 15000.0,
            net_line_distance: 200.0,
            net_line_color: Color::from_u32(0x929292ff),
            net_line_width: 0.7,
            particle_colors: vec![Color::from_u32(0xaaaaaaff)],
            spawn_quantity: 3,
            interactive: true,
        }
    }
}

impl NetworkConfig {
    // Nothing here is fatal, a bad value just means fewer (or no) draw calls.
    pub fn log_warnings(&self) {
        if self.particle_colors.is_empty() {
            log::warn!("particle palette is empty, nothing will be drawn");
        }
        if !(self.density > 0.0) {
            log::warn!("density {} is not positive, no particles will spawn", self.density);
        }
        if self.net_line_distance <= 0.0 {
            log::warn!("net line distance {} disables connecting lines", self.net_line_distance);
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpeedPreset {
    Still,
    Slow,
    Medium,
    Fast,
}

impl SpeedPreset {
    pub fn value(self) -> f64 {
        match self {
            SpeedPreset::Still => 0.0,
            SpeedPreset::Slow => 0.33,
            SpeedPreset::Medium => 0.66,
            SpeedPreset::Fast => 1.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DensityPreset {
    Low,
    Medium,
    High,
}

impl DensityPreset {
    pub fn value(self) -> f64 {
        match self {
            DensityPreset::Low => 20000.0,
            DensityPreset::Medium => 10000.0,
            DensityPreset::High => 5000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPreset(String);

impl fmt::Display for UnknownPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown preset '{}'", self.0)
    }
}

impl std::error::Error for UnknownPreset {}

impl FromStr for SpeedPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "still" => Ok(SpeedPreset::Still),
            "slow" => Ok(SpeedPreset::Slow),
            "medium" => Ok(SpeedPreset::Medium),
            "fast" => Ok(SpeedPreset::Fast),
            _ => Err(UnknownPreset(s.to_owned())),
        }
    }
}

impl FromStr for DensityPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(DensityPreset::Low),
            "medium" => Ok(DensityPreset::Medium),
            "high" => Ok(DensityPreset::High),
            _ => Err(UnknownPreset(s.to_owned())),
        }
    }
}
