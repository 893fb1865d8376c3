//! Race-free additive deposits.
//!
//! Many agents may deposit into the same cell within one pass. Each cell
//! is a fixed-point `AtomicU64`, so concurrent deposits are summed with a
//! single `fetch_add` and the result does not depend on worker order:
//! integer addition is associative, where `f32` addition is not.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::grid::TrailGrid;

/// Fixed-point units per unit of intensity.
pub const DEPOSIT_SCALE: f32 = 65_536.0;

/// Smallest positive deposit the accumulator represents exactly.
pub const MIN_DEPOSIT: f32 = 1.0 / DEPOSIT_SCALE;

/// Check that `count` deposits of `amount`, all landing in one cell,
/// stay representable in a single accumulator cell.
///
/// # Errors
///
/// Returns `Err` if `amount` is negative or not finite, is positive but
/// below [`MIN_DEPOSIT`], or if `count` of them would overflow a cell.
pub fn check_deposit(amount: f32, count: usize) -> Result<(), String> {
    if !(amount >= 0.0) || !amount.is_finite() {
        return Err(format!("deposit amount must be finite and >= 0, got {amount}"));
    }
    if amount > 0.0 && amount < MIN_DEPOSIT {
        return Err(format!(
            "deposit amount {amount} is below the accumulator resolution {MIN_DEPOSIT}"
        ));
    }
    let worst = amount as f64 * DEPOSIT_SCALE as f64 * count as f64;
    if worst >= u64::MAX as f64 {
        return Err(format!(
            "{count} deposits of {amount} would overflow an accumulator cell"
        ));
    }
    Ok(())
}

/// Per-cell deposit accumulator shared by all agent workers in a pass.
#[derive(Debug)]
pub struct DepositAccumulator {
    cells: Vec<AtomicU64>,
    ceiling: Option<f32>,
}

impl DepositAccumulator {
    /// An empty accumulator for `len` cells.
    ///
    /// With a `ceiling`, a cell's intensity after deposits are folded in
    /// is capped at that value.
    pub fn new(len: usize, ceiling: Option<f32>) -> Self {
        Self {
            cells: (0..len).map(|_| AtomicU64::new(0)).collect(),
            ceiling,
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for a zero-cell accumulator.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The saturation ceiling, if any.
    pub fn ceiling(&self) -> Option<f32> {
        self.ceiling
    }

    /// Add `amount` to cell `index`. Callable from any thread.
    ///
    /// Negative, non-finite, and out-of-range deposits are ignored. Any
    /// positive amount adds at least one fixed-point unit, and a cell
    /// saturates at `u64::MAX` rather than wrapping.
    pub fn deposit(&self, index: usize, amount: f32) {
        let Some(cell) = self.cells.get(index) else {
            return;
        };
        if !(amount > 0.0) || !amount.is_finite() {
            return;
        }
        // Saturating float-to-int cast.
        let units = ((amount as f64 * DEPOSIT_SCALE as f64).round() as u64).max(1);
        // The update closure never declines, so this cannot fail.
        let _ = cell.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| {
            Some(c.saturating_add(units))
        });
    }

    /// Pending deposit at `index`, in intensity units.
    pub fn pending(&self, index: usize) -> f32 {
        self.cells
            .get(index)
            .map(|c| to_intensity(c.load(Ordering::Relaxed)))
            .unwrap_or(0.0)
    }

    /// Add every pending deposit into `grid`, clamp to the ceiling, and
    /// zero the accumulator. Returns the total intensity deposited.
    pub fn drain_into(&mut self, grid: &mut TrailGrid) -> f64 {
        let mut total = 0.0f64;
        for (cell, value) in self.cells.iter_mut().zip(grid.cells_mut()) {
            let units = std::mem::take(cell.get_mut());
            if units == 0 {
                continue;
            }
            let amount = to_intensity(units);
            total += amount as f64;
            let mut v = *value + amount;
            if let Some(ceiling) = self.ceiling {
                v = v.min(ceiling);
            }
            *value = v;
        }
        total
    }

    /// Drop all pending deposits.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell.get_mut() = 0;
        }
    }
}

fn to_intensity(units: u64) -> f32 {
    (units as f64 / DEPOSIT_SCALE as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn deposits_accumulate() {
        let mut acc = DepositAccumulator::new(4, None);
        acc.deposit(2, 1.5);
        acc.deposit(2, 0.25);
        assert_eq!(acc.pending(2), 1.75);

        let mut grid = TrailGrid::new(2).unwrap();
        grid.cells_mut()[2] = 1.0;
        let total = acc.drain_into(&mut grid);
        assert_eq!(total, 1.75);
        assert_eq!(grid.cells()[2], 2.75);
        assert_eq!(acc.pending(2), 0.0);
    }

    #[test]
    fn ceiling_saturates() {
        let mut acc = DepositAccumulator::new(1, Some(2.0));
        for _ in 0..10 {
            acc.deposit(0, 1.0);
        }
        let mut grid = TrailGrid::new(1).unwrap();
        acc.drain_into(&mut grid);
        assert_eq!(grid.cells()[0], 2.0);
    }

    #[test]
    fn invalid_deposits_ignored() {
        let acc = DepositAccumulator::new(1, None);
        acc.deposit(0, -1.0);
        acc.deposit(0, f32::NAN);
        acc.deposit(5, 1.0);
        assert_eq!(acc.pending(0), 0.0);
    }

    #[test]
    fn tiny_deposits_are_not_dropped() {
        let mut acc = DepositAccumulator::new(1, None);
        acc.deposit(0, 5e-6);
        assert!(acc.pending(0) > 0.0);
        let mut grid = TrailGrid::new(1).unwrap();
        assert!(acc.drain_into(&mut grid) > 0.0);
        assert!(grid.cells()[0] > 0.0);
    }

    #[test]
    fn huge_deposits_saturate_instead_of_wrapping() {
        let acc = DepositAccumulator::new(1, None);
        acc.deposit(0, 2.0e14);
        let one = acc.pending(0);
        acc.deposit(0, 2.0e14);
        let two = acc.pending(0);
        assert!(two > one, "{one} -> {two}");
        assert_eq!(two, to_intensity(u64::MAX));
        acc.deposit(0, 1.0);
        assert_eq!(acc.pending(0), two);
    }

    #[test]
    fn deposit_limits_checked() {
        assert!(check_deposit(1.0, 1_000_000).is_ok());
        assert!(check_deposit(0.0, usize::MAX).is_ok());
        assert!(check_deposit(MIN_DEPOSIT, 1).is_ok());
        assert!(check_deposit(5e-6, 1).is_err());
        assert!(check_deposit(-1.0, 1).is_err());
        assert!(check_deposit(f32::NAN, 1).is_err());
        assert!(check_deposit(3.0e14, 1).is_err());
        assert!(check_deposit(1.0e9, 1_000_000).is_err());
    }

    #[test]
    fn parallel_deposits_are_order_independent() {
        let mut acc = DepositAccumulator::new(8, None);
        (0..10_000usize).into_par_iter().for_each(|i| {
            acc.deposit(i % 8, 0.125);
        });
        // An 8-cell accumulator drains into the first 8 cells of a 9-cell grid.
        let mut grid = TrailGrid::new(3).unwrap();
        acc.drain_into(&mut grid);
        let expected = (10_000 / 8) as f32 * 0.125;
        assert!(grid.cells()[..8].iter().all(|&v| v == expected));
        assert_eq!(grid.cells()[8], 0.0);
        assert_eq!(acc.drain_into(&mut grid), 0.0);
    }

    #[test]
    fn clear_drops_pending() {
        let mut acc = DepositAccumulator::new(2, None);
        acc.deposit(1, 3.0);
        acc.clear();
        assert_eq!(acc.pending(1), 0.0);
    }
}
