//! Swarm agent state: position, velocity, personal best, water supply.

use serde::{Deserialize, Serialize};

use crate::types::Vec2;

/// One swarm member.
///
/// Agents live in continuous coordinates over the grid and carry a limited
/// water supply; an empty agent is grounded until it completes a refill
/// cycle on a water cell. All agents are created together when the swarm
/// activates and persist until the simulation ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) best_position: Vec2,
    pub(crate) best_value: f32,
    pub(crate) water_remaining: u32,
    pub(crate) refill_progress: u32,
}

impl Agent {
    pub(crate) fn new(position: Vec2, velocity: Vec2, fitness: f32, capacity: u32) -> Self {
        Agent {
            position,
            velocity,
            best_position: position,
            best_value: fitness,
            water_remaining: capacity,
            refill_progress: 0,
        }
    }

    /// Record a fitness observation at the current position; returns whether
    /// it improved the personal best.
    pub(crate) fn note_fitness(&mut self, value: f32) -> bool {
        if value < self.best_value {
            self.best_value = value;
            self.best_position = self.position;
            true
        } else {
            false
        }
    }

    /// Current position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Best position this agent has observed.
    pub fn best_position(&self) -> Vec2 {
        self.best_position
    }

    /// Best (lowest) fitness this agent has observed.
    pub fn best_value(&self) -> f32 {
        self.best_value
    }

    /// Water units left.
    pub fn water_remaining(&self) -> u32 {
        self.water_remaining
    }

    /// Ticks spent refilling so far (only advances while grounded on water).
    pub fn refill_progress(&self) -> u32 {
        self.refill_progress
    }
}
