//! Double-buffered trail field.
//!
//! [`TrailField`] keeps two grids of the same resolution. `current` is the
//! published state that sensors and displays read; `previous` is the
//! staging buffer the next tick is built in. The lifecycle per tick is:
//!
//! 1. [`stage`](TrailField::stage): seed `previous` from `current` and
//!    borrow both (read-only `current`, writable `previous`).
//! 2. Kernels deposit into and diffuse through the staging side.
//! 3. [`commit`](TrailField::commit): swap roles, so the staged grid
//!    becomes `current` and the old `current` becomes the next staging
//!    buffer.
//!
//! If a tick fails between 1 and 3, `commit` is simply not called. The
//! published grid was never written, so the rollback is free.

use crate::error::FieldError;
use crate::grid::TrailGrid;

/// Published grid plus staging grid, swapped on commit.
#[derive(Clone, Debug)]
pub struct TrailField {
    current: TrailGrid,
    previous: TrailGrid,
    generation: u64,
}

impl TrailField {
    /// Two zeroed grids of `resolution`.
    pub fn new(resolution: u32) -> Result<Self, FieldError> {
        Ok(Self {
            current: TrailGrid::new(resolution)?,
            previous: TrailGrid::new(resolution)?,
            generation: 0,
        })
    }

    /// Side length in cells.
    pub fn resolution(&self) -> u32 {
        self.current.resolution()
    }

    /// The published grid.
    pub fn current(&self) -> &TrailGrid {
        &self.current
    }

    /// Mutable access to the published grid, for seeding initial trails.
    pub fn current_mut(&mut self) -> &mut TrailGrid {
        &mut self.current
    }

    /// The staging grid. Between ticks it holds the state before the most
    /// recent commit.
    pub fn previous(&self) -> &TrailGrid {
        &self.previous
    }

    /// Seed the staging grid from `current` and borrow both.
    pub fn stage(&mut self) -> (&TrailGrid, &mut TrailGrid) {
        self.previous
            .cells_mut()
            .copy_from_slice(self.current.cells());
        (&self.current, &mut self.previous)
    }

    /// Publish the staging grid.
    pub fn commit(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
        self.generation += 1;
    }

    /// Number of commits since construction or the last reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Zero both grids and the generation counter.
    pub fn reset(&mut self) {
        self.current.fill(0.0);
        self.previous.fill(0.0);
        self.generation = 0;
    }
}
