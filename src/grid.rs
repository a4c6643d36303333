//! Spatial grid and indexing for fast neighbor queries.

use crate::boid::Boid;
use crate::error::ConfigError;
use glam::DVec2;
use std::collections::HashMap;

/// Signed cell coordinates; boids outside the world bounds get negative or
/// out-of-range cells instead of being dropped.
pub type CellKey = (i64, i64);

/// Uniform grid bucketing boid indices by position
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    cell_size: f64,
    origin: DVec2,
    /// cells[(cx, cy)] contains indices into the population slice
    cells: HashMap<CellKey, Vec<usize>>,
    /// Smallest and largest occupied cell on each axis
    extent: Option<(CellKey, CellKey)>,
    len: usize,
}

impl SpatialIndex {
    /// Create a new index whose cell (0, 0) starts at `origin`
    pub fn new(cell_size: f64, origin: DVec2) -> Result<Self, ConfigError> {
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Err(ConfigError::Invalid("cell_size must be positive".to_string()));
        }
        Ok(Self {
            cell_size,
            origin,
            cells: HashMap::new(),
            extent: None,
            len: 0,
        })
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.cells.clear();
        self.extent = None;
        self.len = 0;
    }

    /// Cell containing `position`
    #[inline]
    pub fn cell_of(&self, position: DVec2) -> CellKey {
        let rel = (position - self.origin) / self.cell_size;
        (rel.x.floor() as i64, rel.y.floor() as i64)
    }

    /// Insert a population index at the given position
    #[inline]
    pub fn insert(&mut self, position: DVec2, idx: usize) {
        let key = self.cell_of(position);
        self.cells.entry(key).or_default().push(idx);
        self.extent = Some(match self.extent {
            Some((lo, hi)) => ((lo.0.min(key.0), lo.1.min(key.1)), (hi.0.max(key.0), hi.1.max(key.1))),
            None => (key, key),
        });
        self.len += 1;
    }

    /// Clear and re-insert every boid of `population`
    pub fn build(&mut self, population: &[Boid]) {
        self.clear();
        for (idx, boid) in population.iter().enumerate() {
            self.insert(boid.position(), idx);
        }
    }

    /// Get all indices in a specific cell
    #[inline]
    pub fn get(&self, key: CellKey) -> &[usize] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of non-empty cells
    #[inline]
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of indexed boids
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cell radius covering `range`
    #[inline]
    pub fn cell_radius(&self, range: f64) -> i64 {
        (range.max(0.0) / self.cell_size).ceil() as i64
    }

    /// All indices in the square of cells within `ceil(range / cell_size)` of
    /// the cell containing `position`, bounds inclusive on both sides.
    ///
    /// This is a superset of the boids closer than `range`; callers filter by
    /// exact distance. The square is clipped to the occupied extent, and when
    /// it still spans more cells than are occupied the occupied cells are
    /// scanned instead. Result order is unspecified.
    pub fn query(&self, position: DVec2, range: f64) -> Vec<usize> {
        let Some((lo, hi)) = self.extent else {
            return Vec::new();
        };
        let (cx, cy) = self.cell_of(position);
        let r = self.cell_radius(range);

        let x0 = cx.saturating_sub(r).max(lo.0);
        let x1 = cx.saturating_add(r).min(hi.0);
        let y0 = cy.saturating_sub(r).max(lo.1);
        let y1 = cy.saturating_add(r).min(hi.1);
        if x0 > x1 || y0 > y1 {
            return Vec::new();
        }

        let span = (x1 as i128 - x0 as i128 + 1) * (y1 as i128 - y0 as i128 + 1);
        let mut results = Vec::new();

        if span > self.cells.len() as i128 {
            for (&(x, y), cell) in &self.cells {
                if (x0..=x1).contains(&x) && (y0..=y1).contains(&y) {
                    results.extend_from_slice(cell);
                }
            }
        } else {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    results.extend_from_slice(self.get((x, y)));
                }
            }
        }

        results
    }

    /// Candidate neighbours of `boid` within its own visual range
    pub fn query_boid(&self, boid: &Boid) -> Vec<usize> {
        self.query(boid.position(), boid.genome.visual_range())
    }
}
