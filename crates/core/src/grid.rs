//! Terrain grid with per-cell combustion state and elevation.
//!
//! The grid is a fixed-shape, row-major array of [`CellState`] values with an
//! independently randomized elevation sample per cell. It is created once at
//! simulation start and its shape never changes. At runtime the grid is
//! written exclusively by [`crate::fire::FireEngine`]; everything else sees a
//! read-only view.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default grid width in cells.
pub const DEFAULT_WIDTH: usize = 40;
/// Default grid height in cells.
pub const DEFAULT_HEIGHT: usize = 20;

/// Combustion state of a single terrain cell.
///
/// A cell is exactly one of these at any time. `Water` is terminal: it never
/// transitions to any other variant, which makes "water is burning" an
/// unrepresentable state rather than a checked one. Only `Forest` ignites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    /// Unburnt fuel.
    Forest,
    /// Actively burning. `cooldown` is the number of ticks remaining before
    /// the cell may attempt to ignite its neighbors.
    Burning {
        /// Ticks until the next spread attempt.
        cooldown: u8,
    },
    /// Burnt out. `by_agent` distinguishes agent suppression from natural
    /// burnout; it affects display and cover statistics, never spread logic.
    Burnt {
        /// True when an agent suppressed this cell.
        by_agent: bool,
    },
    /// Open water. Never carries fuel.
    Water,
    /// Bare ground without fuel.
    Empty,
}

impl CellState {
    /// Whether this cell can currently be set alight.
    pub fn is_ignitable(self) -> bool {
        matches!(self, CellState::Forest)
    }

    /// Whether this cell is actively burning.
    pub fn is_burning(self) -> bool {
        matches!(self, CellState::Burning { .. })
    }
}

/// Fixed-size 2D terrain with combustion state and elevation per cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGrid {
    width: usize,
    height: usize,
    /// Cell states in row-major order (`y * width + x`).
    cells: Vec<CellState>,
    /// Elevation per cell in `[0, 100)`, fixed at creation.
    elevations: Vec<f32>,
}

impl TerrainGrid {
    /// Generate a randomized terrain: independently random elevation per
    /// cell, `water_blob_count` circular water bodies, and fuel on each
    /// remaining cell with probability `forest_density`.
    pub fn generate<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        water_blob_count: usize,
        forest_density: f32,
        rng: &mut R,
    ) -> Self {
        let elevations = (0..width * height)
            .map(|_| rng.random_range(0.0..100.0))
            .collect();
        let mut grid = TerrainGrid {
            width,
            height,
            cells: vec![CellState::Forest; width * height],
            elevations,
        };

        if forest_density < 1.0 {
            for cell in &mut grid.cells {
                if rng.random::<f32>() >= forest_density {
                    *cell = CellState::Empty;
                }
            }
        }

        for _ in 0..water_blob_count {
            let cx = rng.random_range(0..width) as i32;
            let cy = rng.random_range(0..height) as i32;
            let radius = rng.random_range(1.0..=3.0);
            grid.place_water_blob(cx, cy, radius);
        }

        grid
    }

    /// Create a uniform terrain: all forest, zero elevation, no water.
    ///
    /// Useful for controlled scenarios and tests.
    pub fn flat(width: usize, height: usize) -> Self {
        TerrainGrid {
            width,
            height,
            cells: vec![CellState::Forest; width * height],
            elevations: vec![0.0; width * height],
        }
    }

    /// Create an all-forest terrain from an existing elevation buffer in
    /// row-major order (`y * width + x`).
    ///
    /// # Panics
    /// Panics if the buffer length does not match `width * height`.
    pub fn from_elevations(width: usize, height: usize, elevations: Vec<f32>) -> Self {
        assert_eq!(
            elevations.len(),
            width * height,
            "elevation buffer size mismatch"
        );
        TerrainGrid {
            width,
            height,
            cells: vec![CellState::Forest; width * height],
            elevations,
        }
    }

    /// Stamp a circular water body centered on `(cx, cy)`.
    ///
    /// Cells within `radius` (euclidean, in cell units) become [`CellState::Water`];
    /// a radius of `0.0` covers exactly the center cell. Out-of-bounds parts
    /// of the circle are clipped.
    pub fn place_water_blob(&mut self, cx: i32, cy: i32, radius: f32) {
        let r = radius.ceil() as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                let x = cx + dx;
                let y = cy + dy;
                if !self.in_bounds(x, y) {
                    continue;
                }
                let dist = ((dx * dx + dy * dy) as f32).sqrt();
                if dist <= radius {
                    let idx = self.index(x as usize, y as usize);
                    self.cells[idx] = CellState::Water;
                }
            }
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether `(x, y)` lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Cell state at `(x, y)`, or `None` when out of bounds.
    pub fn cell(&self, x: i32, y: i32) -> Option<CellState> {
        if self.in_bounds(x, y) {
            Some(self.cells[self.index(x as usize, y as usize)])
        } else {
            None
        }
    }

    /// Elevation at an in-bounds grid position.
    pub fn elevation(&self, x: usize, y: usize) -> f32 {
        self.elevations[self.index(x, y)]
    }

    /// All cell states in row-major order.
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// All elevations in row-major order.
    pub fn elevations(&self) -> &[f32] {
        &self.elevations
    }

    pub(crate) fn set_cell(&mut self, x: usize, y: usize, state: CellState) {
        let idx = self.index(x, y);
        self.cells[idx] = state;
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }
}
