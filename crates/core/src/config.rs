//! Simulation configuration and validation.
//!
//! All inputs accepted at initialization live here. Mid-run operations never
//! fail; the only meaningful failure class is an invalid configuration,
//! rejected up front by [`SimulationConfig::validate`].

use serde::{Deserialize, Serialize};

use crate::fire::WindVector;
use crate::grid::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::swarm::PsoParams;

/// Placement of the initial fires at simulation start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnitionStrategy {
    /// Draw `count` uniformly random cells. Draws landing on ineligible
    /// cells (water, bare ground) fizzle silently.
    Random {
        /// Number of ignition draws.
        count: usize,
    },
    /// Ignite exactly these coordinates. Ineligible entries fizzle.
    Fixed(Vec<(usize, usize)>),
}

/// Complete configuration for a [`crate::FireSwarmSimulation`].
///
/// The PSO coefficients may also be replaced live on every tick; the rest is
/// fixed for the lifetime of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Number of swarm agents created at activation.
    pub agent_count: usize,
    /// Water units an agent can carry.
    pub max_water_capacity: u32,
    /// Ticks an empty agent must dwell on water before refilling.
    pub refill_time: u32,
    /// Number of water blobs stamped into generated terrain.
    pub water_blob_count: usize,
    /// Probability that a non-water cell carries fuel.
    pub forest_density: f32,
    /// Constant wind direction biasing fire spread; `(0, 0)` disables it.
    pub wind: WindVector,
    /// Initial fire placement.
    pub ignition: IgnitionStrategy,
    /// PSO coefficients (inertia, personal pull, global pull).
    pub pso: PsoParams,
    /// Tick at which the swarm is instantiated.
    pub swarm_activation_tick: u64,
    /// Reproduce the legacy cover accounting where naturally burnt-out cells
    /// still count as forested. Affects cover statistics only.
    pub natural_burnout_keeps_cover: bool,
    /// Fixed RNG seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            agent_count: 20,
            max_water_capacity: 3,
            refill_time: 30,
            water_blob_count: 3,
            forest_density: 1.0,
            wind: WindVector::default(),
            ignition: IgnitionStrategy::Random { count: 2 },
            pso: PsoParams::default(),
            swarm_activation_tick: 10,
            natural_burnout_keeps_cover: false,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Check the configuration for values the simulation cannot run with.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] describing the first rejected field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.agent_count == 0 {
            return Err(ConfigError::NoAgents);
        }
        if self.max_water_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("water capacity"));
        }
        if self.refill_time == 0 {
            return Err(ConfigError::ZeroCapacity("refill time"));
        }
        if !(0.0..=1.0).contains(&self.forest_density) {
            return Err(ConfigError::InvalidDensity(self.forest_density));
        }
        if !self.wind.is_valid() {
            return Err(ConfigError::InvalidWind {
                dx: self.wind.dx,
                dy: self.wind.dy,
            });
        }
        Ok(())
    }
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid has a zero dimension.
    EmptyGrid {
        /// Configured width.
        width: usize,
        /// Configured height.
        height: usize,
    },
    /// Swarm would be empty.
    NoAgents,
    /// A capacity or duration that must be positive is zero.
    ZeroCapacity(&'static str),
    /// Wind components outside `{-1, 0, 1}`.
    InvalidWind {
        /// Configured x component.
        dx: i32,
        /// Configured y component.
        dy: i32,
    },
    /// Forest density outside `[0, 1]`.
    InvalidDensity(f32),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyGrid { width, height } => {
                write!(f, "grid must have positive dimensions, got {width}x{height}")
            }
            ConfigError::NoAgents => write!(f, "agent count must be positive"),
            ConfigError::ZeroCapacity(what) => write!(f, "{what} must be positive"),
            ConfigError::InvalidWind { dx, dy } => {
                write!(f, "wind components must be in -1..=1, got ({dx}, {dy})")
            }
            ConfigError::InvalidDensity(d) => {
                write!(f, "forest density must be in [0, 1], got {d}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
