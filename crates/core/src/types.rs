//! Vector type alias for 2D positions and velocities.

use nalgebra::Vector2;

/// 2D vector type for agent positions, velocities, and best-known positions.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`, used throughout the
/// simulation for continuous coordinates over the discrete terrain grid.
pub type Vec2 = Vector2<f32>;
