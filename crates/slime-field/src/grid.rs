//! A single square intensity grid with edge-aware sampling.

use glam::Vec2;
use smallvec::SmallVec;

use crate::edge::EdgePolicy;
use crate::error::FieldError;

/// Direction of a box blur pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlurAxis {
    /// Average along rows.
    Horizontal,
    /// Average along columns.
    Vertical,
    /// Average over the full square window.
    #[default]
    Both,
}

/// Resolved indices along one axis of a sample window.
type AxisCells = SmallVec<[usize; 16]>;

/// A `resolution x resolution` grid of trail intensities, row-major.
///
/// Cell `(x, y)` lives at `y * resolution + x`. All intensities written
/// by the simulation are finite and non-negative.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailGrid {
    resolution: u32,
    cells: Vec<f32>,
}

impl TrailGrid {
    /// A zeroed grid.
    pub fn new(resolution: u32) -> Result<Self, FieldError> {
        let len = cell_count(resolution)?;
        Ok(Self {
            resolution,
            cells: vec![0.0; len],
        })
    }

    /// Wrap existing row-major data.
    pub fn from_cells(resolution: u32, cells: Vec<f32>) -> Result<Self, FieldError> {
        let expected = cell_count(resolution)?;
        if cells.len() != expected {
            return Err(FieldError::LengthMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { resolution, cells })
    }

    /// Side length in cells.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Side length as a float extent.
    pub fn extent(&self) -> f32 {
        self.resolution as f32
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major cell data.
    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    /// Mutable row-major cell data.
    pub fn cells_mut(&mut self) -> &mut [f32] {
        &mut self.cells
    }

    /// Flat index of `(x, y)`. Both must be `< resolution`.
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.resolution as usize + x as usize
    }

    /// `(x, y)` of flat index `i`.
    pub fn coords(&self, i: usize) -> (u32, u32) {
        let r = self.resolution as usize;
        ((i % r) as u32, (i / r) as u32)
    }

    /// Intensity at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.resolution && y < self.resolution {
            Some(self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Set the intensity at `(x, y)`. Returns false outside the grid.
    pub fn set(&mut self, x: u32, y: u32, value: f32) -> bool {
        if x < self.resolution && y < self.resolution {
            let i = self.index(x, y);
            self.cells[i] = value;
            true
        } else {
            false
        }
    }

    /// Flat index of the cell containing `position`.
    ///
    /// Positions are expected inside `[0, resolution)`; anything else is
    /// clamped to the nearest edge cell.
    pub fn cell_at(&self, position: Vec2) -> usize {
        let max = self.resolution.saturating_sub(1);
        // Float-to-int `as` saturates and maps NaN to 0.
        let x = (position.x.floor() as u32).min(max);
        let y = (position.y.floor() as u32).min(max);
        self.index(x, y)
    }

    /// Intensity at a possibly out-of-range cell, resolved by `edge`.
    pub fn sample(&self, x: i64, y: i64, edge: EdgePolicy) -> f32 {
        let r = self.resolution as i64;
        let cx = edge.resolve_cell(x, r);
        let cy = edge.resolve_cell(y, r);
        self.cells[cy * self.resolution as usize + cx]
    }

    /// Sum of the `(2r+1) x (2r+1)` window centred on `(cx, cy)`.
    ///
    /// Window cells off the grid are resolved by `edge`, so the window
    /// always contains exactly `(2r+1)^2` samples.
    pub fn sum_square(&self, cx: i64, cy: i64, radius: u32, edge: EdgePolicy) -> f32 {
        let r = radius as i64;
        let res = self.resolution as i64;
        let width = self.resolution as usize;

        if cx - r >= 0 && cx + r < res && cy - r >= 0 && cy + r < res {
            let x0 = (cx - r) as usize;
            let x1 = (cx + r) as usize;
            let mut sum = 0.0;
            for y in (cy - r) as usize..=(cy + r) as usize {
                let row = y * width;
                sum += self.cells[row + x0..=row + x1].iter().sum::<f32>();
            }
            return sum;
        }

        let xs = self.axis_cells(cx, r, edge);
        let ys = self.axis_cells(cy, r, edge);
        let mut sum = 0.0;
        for &y in &ys {
            let row = y * width;
            for &x in &xs {
                sum += self.cells[row + x];
            }
        }
        sum
    }

    /// Mean of the blur window of `radius` around flat cell `i`.
    pub fn box_mean(&self, i: usize, axis: BlurAxis, radius: u32, edge: EdgePolicy) -> f32 {
        if radius == 0 {
            return self.cells[i];
        }
        let (x, y) = self.coords(i);
        let (x, y) = (x as i64, y as i64);
        let r = radius as i64;
        let width = self.resolution as usize;
        match axis {
            BlurAxis::Horizontal => {
                let row = y as usize * width;
                let xs = self.axis_cells(x, r, edge);
                xs.iter().map(|&cx| self.cells[row + cx]).sum::<f32>() / xs.len() as f32
            }
            BlurAxis::Vertical => {
                let ys = self.axis_cells(y, r, edge);
                ys.iter().map(|&cy| self.cells[cy * width + x as usize]).sum::<f32>()
                    / ys.len() as f32
            }
            BlurAxis::Both => {
                let side = (2 * radius + 1) as f32;
                self.sum_square(x, y, radius, edge) / (side * side)
            }
        }
    }

    fn axis_cells(&self, centre: i64, r: i64, edge: EdgePolicy) -> AxisCells {
        let res = self.resolution as i64;
        (centre - r..=centre + r)
            .map(|v| edge.resolve_cell(v, res))
            .collect()
    }

    /// Sum of all intensities, accumulated in `f64`.
    pub fn total(&self) -> f64 {
        self.cells.iter().map(|&v| v as f64).sum()
    }

    /// Largest intensity.
    pub fn max(&self) -> f32 {
        self.cells.iter().copied().fold(0.0, f32::max)
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: f32) {
        self.cells.fill(value);
    }

    /// Copy another grid of the same resolution into this one.
    pub fn copy_from(&mut self, other: &TrailGrid) -> Result<(), FieldError> {
        if other.cells.len() != self.cells.len() {
            return Err(FieldError::LengthMismatch {
                expected: self.cells.len(),
                actual: other.cells.len(),
            });
        }
        self.cells.copy_from_slice(&other.cells);
        Ok(())
    }

    /// Index of the first NaN or infinite cell.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.cells.iter().position(|v| !v.is_finite())
    }
}

fn cell_count(resolution: u32) -> Result<usize, FieldError> {
    if resolution == 0 {
        return Err(FieldError::ZeroResolution);
    }
    let n = resolution as u64 * resolution as u64;
    if n > u32::MAX as u64 {
        return Err(FieldError::TooLarge { resolution });
    }
    Ok(n as usize)
}
