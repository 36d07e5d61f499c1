//! Wildfire propagation and swarm suppression simulation core.
//!
//! Models fire spread across a discretized terrain as a stochastic cellular
//! automaton and coordinates a swarm of firefighting agents with a
//! particle-swarm optimization (PSO) heuristic deciding where agents move and
//! when they suppress fire. The crate is a self-contained, single-threaded,
//! tick-driven library; rendering, interactive controls and scheduling are
//! external collaborators consuming [`TickReport`] and [`SimulationSnapshot`].
//!
//! Main components:
//! - [`grid`] — terrain cells, elevation, and terrain generation.
//! - [`fire`] — ignition, stochastic spread, burnout, and suppression.
//! - [`swarm`] — PSO movement, fitness evaluation, and water management.
//! - [`simulation`] — tick orchestration, reporting, and snapshots.
//! - [`config`] — run configuration and validation.

pub mod config;
pub mod fire;
pub mod grid;
pub mod simulation;
pub mod swarm;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{ConfigError, IgnitionStrategy, SimulationConfig};
pub use fire::{AttractionField, CellAttraction, FireEngine, WindVector};
pub use grid::{CellState, TerrainGrid};
pub use simulation::{FireSwarmSimulation, SimulationSnapshot, TickReport};
pub use swarm::{Agent, PsoParams, Swarm};
pub use types::Vec2;
