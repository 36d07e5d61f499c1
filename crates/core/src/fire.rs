//! Fire propagation engine: ignition, stochastic spread, burnout, suppression.
//!
//! The engine owns the [`TerrainGrid`] and is its only writer. Spread work is
//! bounded to the active fire set, never a full-grid scan: the set is rebuilt
//! every tick from surviving burners plus newly ignited cells, reusing the
//! same allocations across ticks.

use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::grid::{CellState, TerrainGrid};
use crate::types::Vec2;

/// Meters per grid cell.
pub const CELL_SIZE: f32 = 10.0;
/// Agent travel speed in meters per second.
pub const AGENT_SPEED: f32 = 10.0;
/// Seconds one suppression takes once the agent is on site.
pub const EXTINGUISH_TIME: f32 = 40.0;

/// Per-tick probability that a burning cell burns out naturally.
const BURNOUT_PROBABILITY: f32 = 0.03;
/// Spread cooldown assigned on first ignition.
const IGNITION_COOLDOWN: u8 = 3;
/// Spread cooldown assigned to freshly spread fire and on re-arm.
const SPREAD_COOLDOWN: u8 = 2;
/// Base neighbor ignition probability on level ground.
const SPREAD_BASE: f32 = 0.05;
/// Ignition probability gained per unit of uphill elevation difference.
const SPREAD_ELEVATION_GAIN: f32 = 0.003;
/// Lower clamp on the elevation-adjusted spread probability.
const SPREAD_MIN: f32 = 0.005;
/// Upper clamp on the elevation-adjusted spread probability.
const SPREAD_MAX: f32 = 0.4;
/// Bonus when the neighbor lies directly downwind.
const WIND_BONUS: f32 = 0.08;

/// Constant per-run wind direction.
///
/// Components are restricted to `{-1, 0, 1}` and compared against neighbor
/// offsets during spread; `(0, 0)` never matches any neighbor, disabling the
/// wind bonus entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindVector {
    /// X component.
    pub dx: i32,
    /// Y component.
    pub dy: i32,
}

impl WindVector {
    /// No wind; the spread bonus never applies.
    pub const CALM: WindVector = WindVector { dx: 0, dy: 0 };

    /// Whether both components are in `{-1, 0, 1}`.
    pub fn is_valid(self) -> bool {
        (-1..=1).contains(&self.dx) && (-1..=1).contains(&self.dy)
    }
}

impl Default for WindVector {
    fn default() -> Self {
        WindVector { dx: 1, dy: 0 }
    }
}

/// Per-cell attraction class, used exclusively for swarm fitness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellAttraction {
    /// Actively burning cell.
    Fire,
    /// Burnt-out cell, no work left.
    Burnt,
    /// Water cell, refill site.
    Water,
    /// Anything else.
    Neutral,
}

/// Read-only fitness view over the grid.
///
/// Built by [`FireEngine::attraction_summary`]; carries the per-cell class
/// plus coordinate lists of fires and water for nearest-distance queries.
#[derive(Debug, Clone)]
pub struct AttractionField {
    width: usize,
    height: usize,
    classes: Vec<CellAttraction>,
    fire_cells: Vec<(usize, usize)>,
    water_cells: Vec<(usize, usize)>,
}

impl AttractionField {
    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Attraction class at `(x, y)`, or `None` when out of bounds.
    pub fn class_at(&self, x: i32, y: i32) -> Option<CellAttraction> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(self.classes[y as usize * self.width + x as usize])
        } else {
            None
        }
    }

    /// Whether any cell burns.
    pub fn has_fire(&self) -> bool {
        !self.fire_cells.is_empty()
    }

    /// Euclidean distance (cell units) from `(x, y)` to the nearest burning
    /// cell, or `None` when nothing burns.
    pub fn nearest_fire_distance(&self, x: i32, y: i32) -> Option<f32> {
        Self::nearest(&self.fire_cells, x, y)
    }

    /// Euclidean distance (cell units) from `(x, y)` to the nearest water
    /// cell, or `None` when the map has no water.
    pub fn nearest_water_distance(&self, x: i32, y: i32) -> Option<f32> {
        Self::nearest(&self.water_cells, x, y)
    }

    fn nearest(cells: &[(usize, usize)], x: i32, y: i32) -> Option<f32> {
        cells
            .iter()
            .map(|&(cx, cy)| {
                let dx = cx as f32 - x as f32;
                let dy = cy as f32 - y as f32;
                dx.hypot(dy)
            })
            .min_by(f32::total_cmp)
    }
}

/// Cellular fire propagation over a [`TerrainGrid`].
#[derive(Debug, Clone)]
pub struct FireEngine {
    grid: TerrainGrid,
    wind: WindVector,
    /// Coordinates of all currently burning cells.
    active: FxHashSet<(usize, usize)>,
    /// Scratch set swapped with `active` at the end of every advance.
    next_active: FxHashSet<(usize, usize)>,
    /// Reusable snapshot buffer iterated during an advance.
    scan_buf: Vec<(usize, usize)>,
    /// Count naturally burnt-out cells as forested in cover statistics.
    natural_burnout_keeps_cover: bool,
}

impl FireEngine {
    /// Create an engine over a freshly generated grid with no fire burning.
    pub fn new(grid: TerrainGrid, wind: WindVector, natural_burnout_keeps_cover: bool) -> Self {
        FireEngine {
            grid,
            wind,
            active: FxHashSet::default(),
            next_active: FxHashSet::default(),
            scan_buf: Vec::new(),
            natural_burnout_keeps_cover,
        }
    }

    /// The terrain, read-only.
    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    /// The configured wind direction.
    pub fn wind(&self) -> WindVector {
        self.wind
    }

    /// Number of currently burning cells.
    pub fn active_fire_count(&self) -> usize {
        self.active.len()
    }

    /// Coordinates of all currently burning cells, in no particular order.
    pub fn active_fires(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.active.iter().copied()
    }

    /// Set `(x, y)` alight if it is an in-bounds forest cell.
    ///
    /// Ineligible or out-of-bounds targets are a no-op returning `false`,
    /// never an error.
    pub fn ignite(&mut self, x: i32, y: i32) -> bool {
        if self.grid.cell(x, y) != Some(CellState::Forest) {
            return false;
        }
        self.grid.set_cell(
            x as usize,
            y as usize,
            CellState::Burning {
                cooldown: IGNITION_COOLDOWN,
            },
        );
        self.active.insert((x as usize, y as usize));
        true
    }

    /// Advance fire by one tick: cooldowns, natural burnout, spread.
    ///
    /// For every burning cell: its cooldown drops by one (floored at zero);
    /// with probability 0.03 it burns out naturally and leaves the active
    /// set; otherwise, once the cooldown hits zero, it rolls one ignition
    /// attempt against each of its eight neighbors and re-arms.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.scan_buf.clear();
        self.scan_buf.extend(self.active.iter().copied());
        self.next_active.clear();

        for i in 0..self.scan_buf.len() {
            let (x, y) = self.scan_buf[i];
            let Some(CellState::Burning { cooldown }) = self.grid.cell(x as i32, y as i32) else {
                continue;
            };
            let cooldown = cooldown.saturating_sub(1);

            if rng.random::<f32>() < BURNOUT_PROBABILITY {
                self.grid
                    .set_cell(x, y, CellState::Burnt { by_agent: false });
                continue;
            }

            if cooldown > 0 {
                self.grid.set_cell(x, y, CellState::Burning { cooldown });
                self.next_active.insert((x, y));
                continue;
            }

            let here = self.grid.elevation(x, y);
            for dx in -1..=1i32 {
                for dy in -1..=1i32 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = x as i32 + dx;
                    let ny = y as i32 + dy;
                    if self.grid.cell(nx, ny) != Some(CellState::Forest) {
                        continue;
                    }
                    let delta = self.grid.elevation(nx as usize, ny as usize) - here;
                    let mut p =
                        (SPREAD_BASE + delta * SPREAD_ELEVATION_GAIN).clamp(SPREAD_MIN, SPREAD_MAX);
                    if dx == self.wind.dx && dy == self.wind.dy {
                        p += WIND_BONUS;
                    }
                    if rng.random::<f32>() < p {
                        self.grid.set_cell(
                            nx as usize,
                            ny as usize,
                            CellState::Burning {
                                cooldown: SPREAD_COOLDOWN,
                            },
                        );
                        self.next_active.insert((nx as usize, ny as usize));
                    }
                }
            }
            // Re-arm: another spread attempt after SPREAD_COOLDOWN ticks.
            self.grid.set_cell(
                x,
                y,
                CellState::Burning {
                    cooldown: SPREAD_COOLDOWN,
                },
            );
            self.next_active.insert((x, y));
        }

        std::mem::swap(&mut self.active, &mut self.next_active);
    }

    /// Put out the fire at `(x, y)`.
    ///
    /// A burning target becomes `Burnt { by_agent: true }` and leaves the
    /// active set. Any other target (including out of bounds) is a no-op
    /// returning `false`.
    pub fn extinguish(&mut self, x: i32, y: i32) -> bool {
        if !matches!(self.grid.cell(x, y), Some(CellState::Burning { .. })) {
            return false;
        }
        self.grid
            .set_cell(x as usize, y as usize, CellState::Burnt { by_agent: true });
        self.active.remove(&(x as usize, y as usize));
        true
    }

    /// [`Self::extinguish`] on behalf of an agent, charging the clock.
    ///
    /// On success the clock advances by travel time from `requester` to the
    /// target (euclidean cell distance scaled by [`CELL_SIZE`] over
    /// [`AGENT_SPEED`]) plus [`EXTINGUISH_TIME`]. On failure nothing changes,
    /// the clock included.
    pub fn extinguish_from(&mut self, x: i32, y: i32, requester: Vec2, clock: &mut f32) -> bool {
        if !self.extinguish(x, y) {
            return false;
        }
        let dx = x as f32 - requester.x;
        let dy = y as f32 - requester.y;
        let travel = dx.hypot(dy) * CELL_SIZE / AGENT_SPEED;
        *clock += travel + EXTINGUISH_TIME;
        true
    }

    /// Classify every cell for fitness evaluation. Never mutates state.
    pub fn attraction_summary(&self) -> AttractionField {
        let width = self.grid.width();
        let height = self.grid.height();
        let mut classes = Vec::with_capacity(width * height);
        let mut fire_cells = Vec::with_capacity(self.active.len());
        let mut water_cells = Vec::new();

        for y in 0..height {
            for x in 0..width {
                let class = match self.grid.cell(x as i32, y as i32) {
                    Some(CellState::Burning { .. }) => {
                        fire_cells.push((x, y));
                        CellAttraction::Fire
                    }
                    Some(CellState::Burnt { .. }) => CellAttraction::Burnt,
                    Some(CellState::Water) => {
                        water_cells.push((x, y));
                        CellAttraction::Water
                    }
                    _ => CellAttraction::Neutral,
                };
                classes.push(class);
            }
        }

        AttractionField {
            width,
            height,
            classes,
            fire_cells,
            water_cells,
        }
    }

    /// Count `(forested, burnt)` cells for efficiency reporting.
    ///
    /// Burning cells still hold fuel and count as forested. When the engine
    /// was built with `natural_burnout_keeps_cover`, naturally burnt-out
    /// cells also count as forested, reproducing the legacy accounting.
    pub fn count_cover(&self) -> (usize, usize) {
        let mut forested = 0;
        let mut burnt = 0;
        for &cell in self.grid.cells() {
            match cell {
                CellState::Forest | CellState::Burning { .. } => forested += 1,
                CellState::Burnt { by_agent } => {
                    burnt += 1;
                    if self.natural_burnout_keeps_cover && !by_agent {
                        forested += 1;
                    }
                }
                CellState::Water | CellState::Empty => {}
            }
        }
        (forested, burnt)
    }
}
