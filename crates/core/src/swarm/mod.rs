//! Particle-swarm controller: PSO movement, fitness, resource-aware suppression.
//!
//! The swarm sees the world only through the read-only attraction summary and
//! mutates it only through [`FireEngine::extinguish_from`]. One call to
//! [`Swarm::step`] runs one full PSO iteration: movement, fitness and best
//! tracking, then suppression, each pass completing over all agents before
//! the next begins.

pub mod agent;

pub use agent::Agent;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::fire::{AttractionField, CellAttraction, FireEngine};
use crate::types::Vec2;

/// Fitness for any position outside the grid. Large enough to forbid
/// off-grid optima independently of the hard position clamp.
const OUT_OF_BOUNDS_PENALTY: f32 = 1e6;
/// Base fitness of a burning cell; proximity to water sweetens it further.
const FIRE_BASE_FITNESS: f32 = -100.0;
/// Fitness of a water cell: worth visiting, but fires dominate.
const WATER_FITNESS: f32 = -10.0;
/// Fitness of a burnt cell: no work left there.
const BURNT_FITNESS: f32 = 1000.0;
/// Neutral-cell fitness when nothing burns anywhere.
const IDLE_FITNESS: f32 = 100.0;
/// Cells one agent may suppress in a single tick.
pub const MAX_SUPPRESSIONS_PER_TICK: u32 = 3;

/// PSO coefficients: inertia and the personal/global attraction weights.
///
/// May be replaced between steps; the new values take effect immediately.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsoParams {
    /// Inertia weight applied to the previous velocity.
    pub omega: f32,
    /// Pull toward the agent's personal best.
    pub phi_personal: f32,
    /// Pull toward the swarm's global best.
    pub phi_global: f32,
}

impl Default for PsoParams {
    fn default() -> Self {
        // Clerc constriction values, the usual stable starting point.
        PsoParams {
            omega: 0.72,
            phi_personal: 1.49,
            phi_global: 1.49,
        }
    }
}

/// Score a position against the attraction summary; lower is better.
///
/// Positions are floor-truncated to a cell index, never rounded.
pub fn fitness(field: &AttractionField, position: Vec2) -> f32 {
    let x = position.x.floor() as i32;
    let y = position.y.floor() as i32;
    let Some(class) = field.class_at(x, y) else {
        return OUT_OF_BOUNDS_PENALTY;
    };
    match class {
        CellAttraction::Fire => {
            FIRE_BASE_FITNESS + field.nearest_water_distance(x, y).unwrap_or(0.0)
        }
        CellAttraction::Water => WATER_FITNESS,
        CellAttraction::Burnt => BURNT_FITNESS,
        CellAttraction::Neutral => field.nearest_fire_distance(x, y).unwrap_or(IDLE_FITNESS),
    }
}

/// The swarm of firefighting agents and its shared global best.
#[derive(Debug, Clone)]
pub struct Swarm {
    agents: Vec<Agent>,
    best_position: Vec2,
    best_value: f32,
    params: PsoParams,
    capacity: u32,
    refill_time: u32,
}

impl Swarm {
    /// Instantiate the swarm: agents at uniformly random in-bounds positions
    /// with small random velocities and full water, personal bests seeded
    /// from initial fitness, global best derived as their minimum.
    pub fn activate<R: Rng + ?Sized>(
        field: &AttractionField,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Self {
        let max_x = (field.width() - 1) as f32;
        let max_y = (field.height() - 1) as f32;

        let mut agents = Vec::with_capacity(config.agent_count);
        for _ in 0..config.agent_count {
            let position = Vec2::new(
                rng.random_range(0.0..=max_x),
                rng.random_range(0.0..=max_y),
            );
            let velocity = Vec2::new(
                rng.random_range(-1.0..=1.0),
                rng.random_range(-1.0..=1.0),
            );
            let value = fitness(field, position);
            agents.push(Agent::new(
                position,
                velocity,
                value,
                config.max_water_capacity,
            ));
        }

        let mut best_position = agents[0].best_position;
        let mut best_value = agents[0].best_value;
        for agent in &agents[1..] {
            if agent.best_value < best_value {
                best_value = agent.best_value;
                best_position = agent.best_position;
            }
        }

        Swarm {
            agents,
            best_position,
            best_value,
            params: config.pso,
            capacity: config.max_water_capacity,
            refill_time: config.refill_time,
        }
    }

    /// Run one PSO iteration and the suppression pass.
    ///
    /// Returns the number of cells suppressed this tick. The clock advances
    /// only through suppression, charged per target by
    /// [`FireEngine::extinguish_from`] from each agent's pre-movement cell.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        engine: &mut FireEngine,
        clock: &mut f32,
        rng: &mut R,
    ) -> u32 {
        // Snapshot taken before suppression mutates the grid.
        let field = engine.attraction_summary();
        let max_x = (engine.grid().width() - 1) as f32;
        let max_y = (engine.grid().height() - 1) as f32;

        // Movement: one r_p/r_g pair per agent, shared by both axes.
        let mut origin_cells = Vec::with_capacity(self.agents.len());
        for agent in &mut self.agents {
            origin_cells.push(Vec2::new(
                agent.position.x.floor(),
                agent.position.y.floor(),
            ));
            let r_p: f32 = rng.random();
            let r_g: f32 = rng.random();
            let velocity = agent.velocity * self.params.omega
                + (agent.best_position - agent.position) * (self.params.phi_personal * r_p)
                + (self.best_position - agent.position) * (self.params.phi_global * r_g);
            agent.velocity = velocity;
            agent.position += velocity;
            agent.position.x = agent.position.x.clamp(0.0, max_x);
            agent.position.y = agent.position.y.clamp(0.0, max_y);
        }

        // Fitness and best tracking at the new positions.
        for agent in &mut self.agents {
            let value = fitness(&field, agent.position);
            if agent.note_fitness(value) && agent.best_value < self.best_value {
                self.best_value = agent.best_value;
                self.best_position = agent.best_position;
            }
        }

        // Suppression, in agent index order.
        let mut suppressed = 0;
        for (agent, origin) in self.agents.iter_mut().zip(&origin_cells) {
            let cx = agent.position.x.floor() as i32;
            let cy = agent.position.y.floor() as i32;

            if agent.water_remaining == 0 {
                // Grounded. Refill only progresses while stationed on water.
                if field.class_at(cx, cy) == Some(CellAttraction::Water) {
                    agent.refill_progress += 1;
                    if agent.refill_progress >= self.refill_time {
                        agent.water_remaining = self.capacity;
                        agent.refill_progress = 0;
                    }
                }
                continue;
            }

            let mut hits = 0;
            'scan: for dx in -1..=1i32 {
                for dy in -1..=1i32 {
                    if engine.extinguish_from(cx + dx, cy + dy, *origin, clock) {
                        agent.water_remaining -= 1;
                        hits += 1;
                        suppressed += 1;
                        if hits >= MAX_SUPPRESSIONS_PER_TICK || agent.water_remaining == 0 {
                            break 'scan;
                        }
                    }
                }
            }
        }

        suppressed
    }

    /// Replace the PSO coefficients; effective from the next step.
    pub fn set_params(&mut self, params: PsoParams) {
        self.params = params;
    }

    /// Current PSO coefficients.
    pub fn params(&self) -> PsoParams {
        self.params
    }

    /// All agents, in index order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Best position any agent has observed.
    pub fn best_position(&self) -> Vec2 {
        self.best_position
    }

    /// Best (lowest) fitness any agent has observed. Non-increasing over the
    /// swarm's lifetime.
    pub fn best_value(&self) -> f32 {
        self.best_value
    }

    /// Current agent positions, in index order.
    pub fn agent_positions(&self) -> Vec<Vec2> {
        self.agents.iter().map(Agent::position).collect()
    }
}
