//! Tick orchestration: fire advance, swarm activation and stepping, and
//! stochastic re-ignition.
//!
//! One call to [`FireSwarmSimulation::advance_tick`] is atomic from the
//! caller's perspective and fully deterministic given a fixed seed. The run
//! has two phases: before `swarm_activation_tick` only the fire advances;
//! from that tick on, the swarm (created exactly once) steps right after the
//! fire every tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ConfigError, IgnitionStrategy, SimulationConfig};
use crate::fire::FireEngine;
use crate::grid::{CellState, TerrainGrid};
use crate::swarm::{PsoParams, Swarm};
use crate::types::Vec2;

/// Tick period of the spontaneous re-ignition roll.
const REIGNITION_INTERVAL: u64 = 15;
/// Probability of a spontaneous ignition on a re-ignition tick.
const REIGNITION_PROBABILITY: f32 = 0.3;
/// Minimum completed ticks before quiescence is reported.
const QUIESCENT_MIN_TICK: u64 = 20;

/// Per-tick summary emitted to the driving collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Index of the tick this report describes (0-based).
    pub tick: u64,
    /// Burning cells after this tick.
    pub active_fire_count: usize,
    /// Cells suppressed by agents this tick.
    pub suppressed_this_tick: u32,
    /// Cells suppressed by agents since the start of the run.
    pub cumulative_suppressed: u64,
    /// Cells still counting as forested.
    pub forested_count: usize,
    /// Burnt cells, by agents or naturally.
    pub burnt_count: usize,
    /// In-world elapsed time; advances only through suppression work.
    pub elapsed_clock_seconds: f32,
    /// Agent positions in index order; empty before swarm activation.
    pub agent_positions: Vec<Vec2>,
}

/// Read-only view of the world for rendering collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Cell states in row-major order (`y * width + x`).
    pub cells: Vec<CellState>,
    /// Agent positions in index order; empty before swarm activation.
    pub agent_positions: Vec<Vec2>,
}

/// The complete simulation: fire engine, swarm, clock, and tick sequencing.
#[derive(Debug)]
pub struct FireSwarmSimulation {
    engine: FireEngine,
    swarm: Option<Swarm>,
    config: SimulationConfig,
    rng: StdRng,
    tick: u64,
    clock: f32,
    cumulative_suppressed: u64,
}

impl FireSwarmSimulation {
    /// Build a simulation from a validated configuration: generate terrain,
    /// place the initial fires, and seed the RNG.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the configuration is rejected; this is
    /// the only fallible operation in the crate.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let grid = TerrainGrid::generate(
            config.width,
            config.height,
            config.water_blob_count,
            config.forest_density,
            &mut rng,
        );
        let mut engine = FireEngine::new(grid, config.wind, config.natural_burnout_keeps_cover);

        match &config.ignition {
            IgnitionStrategy::Random { count } => {
                for _ in 0..*count {
                    let x = rng.random_range(0..config.width) as i32;
                    let y = rng.random_range(0..config.height) as i32;
                    engine.ignite(x, y);
                }
            }
            IgnitionStrategy::Fixed(cells) => {
                for &(x, y) in cells {
                    engine.ignite(x as i32, y as i32);
                }
            }
        }

        info!(
            "simulation initialized: {}x{} grid, {} initial fires, wind ({}, {})",
            config.width,
            config.height,
            engine.active_fire_count(),
            config.wind.dx,
            config.wind.dy
        );

        Ok(FireSwarmSimulation {
            engine,
            swarm: None,
            config,
            rng,
            tick: 0,
            clock: 0.0,
            cumulative_suppressed: 0,
        })
    }

    /// Run one tick: fire advance, one-shot swarm activation, swarm step,
    /// periodic re-ignition roll, report.
    ///
    /// Passing `pso` replaces the hyperparameters before anything else runs;
    /// they apply to this tick and stick for later ones.
    pub fn advance_tick(&mut self, pso: Option<PsoParams>) -> TickReport {
        if let Some(params) = pso {
            self.config.pso = params;
            if let Some(swarm) = &mut self.swarm {
                swarm.set_params(params);
            }
        }

        self.engine.advance(&mut self.rng);

        if self.swarm.is_none() && self.tick >= self.config.swarm_activation_tick {
            let field = self.engine.attraction_summary();
            let swarm = Swarm::activate(&field, &self.config, &mut self.rng);
            info!("swarm activated: {} agents", swarm.agents().len());
            self.swarm = Some(swarm);
        }

        let suppressed = match &mut self.swarm {
            Some(swarm) => swarm.step(&mut self.engine, &mut self.clock, &mut self.rng),
            None => 0,
        };
        self.cumulative_suppressed += u64::from(suppressed);

        if self.tick % REIGNITION_INTERVAL == 0
            && self.rng.random::<f32>() < REIGNITION_PROBABILITY
        {
            let x = self.rng.random_range(0..self.config.width) as i32;
            let y = self.rng.random_range(0..self.config.height) as i32;
            // Ineligible targets fizzle inside ignite.
            if self.engine.ignite(x, y) {
                debug!("spontaneous ignition at ({x}, {y})");
            }
        }

        let (forested_count, burnt_count) = self.engine.count_cover();
        let report = TickReport {
            tick: self.tick,
            active_fire_count: self.engine.active_fire_count(),
            suppressed_this_tick: suppressed,
            cumulative_suppressed: self.cumulative_suppressed,
            forested_count,
            burnt_count,
            elapsed_clock_seconds: self.clock,
            agent_positions: self.agent_positions(),
        };
        debug!(
            "tick {}: {} active fires, {} suppressed",
            self.tick, report.active_fire_count, suppressed
        );

        self.tick += 1;
        report
    }

    /// Read-only world view for rendering.
    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            width: self.engine.grid().width(),
            height: self.engine.grid().height(),
            cells: self.engine.grid().cells().to_vec(),
            agent_positions: self.agent_positions(),
        }
    }

    /// Advisory termination signal: nothing burns and the run is past its
    /// warm-up. The driving loop may stop; nothing is enforced.
    pub fn is_quiescent(&self) -> bool {
        self.engine.active_fire_count() == 0 && self.tick > QUIESCENT_MIN_TICK
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// In-world elapsed seconds.
    pub fn clock_seconds(&self) -> f32 {
        self.clock
    }

    /// The fire engine, read-only.
    pub fn engine(&self) -> &FireEngine {
        &self.engine
    }

    /// The swarm, once activated.
    pub fn swarm(&self) -> Option<&Swarm> {
        self.swarm.as_ref()
    }

    /// The active configuration, including any live PSO updates.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn agent_positions(&self) -> Vec<Vec2> {
        self.swarm
            .as_ref()
            .map(Swarm::agent_positions)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_config() -> SimulationConfig {
        SimulationConfig {
            // No water blobs so the fixed ignition points are always fuel.
            water_blob_count: 0,
            ignition: IgnitionStrategy::Fixed(vec![(5, 5), (30, 12)]),
            seed: Some(42),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimulationConfig {
            width: 0,
            ..SimulationConfig::default()
        };
        assert!(FireSwarmSimulation::new(config).is_err());
    }

    #[test]
    fn test_initial_fires_fixed_placement() {
        let sim = FireSwarmSimulation::new(seeded_config()).unwrap();
        assert_eq!(sim.engine().active_fire_count(), 2);
        assert!(sim.engine().grid().cell(5, 5).unwrap().is_burning());
        assert!(sim.engine().grid().cell(30, 12).unwrap().is_burning());
    }

    #[test]
    fn test_swarm_activates_on_schedule() {
        let mut sim = FireSwarmSimulation::new(seeded_config()).unwrap();
        for tick in 0..15 {
            let report = sim.advance_tick(None);
            assert_eq!(report.tick, tick);
            if tick < 10 {
                assert!(sim.swarm().is_none());
                assert!(report.agent_positions.is_empty());
            } else {
                assert_eq!(report.agent_positions.len(), 20);
            }
        }
        assert_eq!(sim.swarm().unwrap().agents().len(), 20);
    }

    #[test]
    fn test_live_pso_update() {
        let mut sim = FireSwarmSimulation::new(seeded_config()).unwrap();
        let params = PsoParams {
            omega: 0.4,
            phi_personal: 2.0,
            phi_global: 0.8,
        };

        sim.advance_tick(Some(params));
        assert_eq!(sim.config().pso, params);

        for _ in 0..10 {
            sim.advance_tick(None);
        }
        // The activation at tick 10 inherited the updated coefficients.
        assert_eq!(sim.swarm().unwrap().params(), params);

        let later = PsoParams {
            omega: 0.9,
            ..params
        };
        sim.advance_tick(Some(later));
        assert_eq!(sim.swarm().unwrap().params(), later);
    }

    #[test]
    fn test_report_counters_are_consistent() {
        let mut sim = FireSwarmSimulation::new(seeded_config()).unwrap();
        let total_cells = sim.engine().grid().cells().len();

        let mut cumulative = 0_u64;
        let mut last_clock = 0.0_f32;
        for _ in 0..60 {
            let report = sim.advance_tick(None);
            cumulative += u64::from(report.suppressed_this_tick);
            assert_eq!(report.cumulative_suppressed, cumulative);
            assert!(report.forested_count + report.burnt_count <= total_cells);
            assert!(report.elapsed_clock_seconds >= last_clock);
            if report.suppressed_this_tick == 0 {
                assert_eq!(report.elapsed_clock_seconds, last_clock);
            }
            last_clock = report.elapsed_clock_seconds;

            let snapshot = sim.snapshot();
            let burning = snapshot.cells.iter().filter(|c| c.is_burning()).count();
            assert_eq!(report.active_fire_count, burning);
        }
    }

    #[test]
    fn test_quiescence_advisory() {
        // No fuel anywhere: no fire can ever exist, including re-ignitions.
        let config = SimulationConfig {
            forest_density: 0.0,
            water_blob_count: 0,
            ignition: IgnitionStrategy::Random { count: 0 },
            seed: Some(1),
            ..SimulationConfig::default()
        };
        let mut sim = FireSwarmSimulation::new(config).unwrap();

        for _ in 0..=20 {
            assert!(!sim.is_quiescent(), "quiescence needs tick count > 20");
            sim.advance_tick(None);
        }
        assert!(sim.is_quiescent());
    }

    #[test]
    fn test_snapshot_shape() {
        let sim = FireSwarmSimulation::new(seeded_config()).unwrap();
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.width, 40);
        assert_eq!(snapshot.height, 20);
        assert_eq!(snapshot.cells.len(), 800);
        assert!(snapshot.agent_positions.is_empty());
    }
}
