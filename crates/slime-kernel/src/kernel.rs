//! The [`Kernel`] trait and [`Domain`] enum.

use slime_core::KernelError;

use crate::context::KernelContext;
use crate::executor::KernelExecutor;

/// What a kernel maps over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Domain {
    /// One invocation per agent.
    Agents,
    /// One invocation per field cell.
    Cells,
}

/// A stateless, data-parallel pass in the per-tick pipeline.
///
/// # Contract
///
/// - `dispatch()` MUST be deterministic: same buffers, tick, and timing
///   produce identical output regardless of executor or thread count.
/// - `&self`: kernels hold configuration only; all mutable state is in
///   the buffers reached through the [`KernelContext`].
/// - Per-element work goes through the executor. Element order within a
///   pass is unspecified.
///
/// # Examples
///
/// A kernel that scales every cell of the field into the target grid:
///
/// ```
/// use slime_core::{FrameTiming, KernelError, TickId};
/// use slime_field::TrailGrid;
/// use slime_kernel::{Domain, Kernel, KernelContext, KernelExecutor, SerialExecutor};
///
/// struct Fade {
///     factor: f32,
/// }
///
/// impl Kernel for Fade {
///     fn name(&self) -> &str { "fade" }
///
///     fn domain(&self) -> Domain { Domain::Cells }
///
///     fn dispatch(
///         &self,
///         ctx: &mut KernelContext<'_>,
///         exec: &dyn KernelExecutor,
///     ) -> Result<(), KernelError> {
///         let source = ctx.field();
///         let factor = self.factor;
///         let target = ctx.target()?;
///         exec.fill_cells(target.cells_mut(), &|i| source.cells()[i] * factor);
///         Ok(())
///     }
/// }
///
/// let mut source = TrailGrid::new(2).unwrap();
/// source.fill(4.0);
/// let mut target = TrailGrid::new(2).unwrap();
/// {
///     let mut ctx = KernelContext::new(&source, FrameTiming::new(1.0, 0.0), TickId(1))
///         .with_target(&mut target);
///     Fade { factor: 0.5 }.dispatch(&mut ctx, &SerialExecutor).unwrap();
/// }
/// assert!(target.cells().iter().all(|&v| v == 2.0));
/// ```
pub trait Kernel: Send + Sync + 'static {
    /// Human-readable name for error reporting and metrics.
    fn name(&self) -> &str;

    /// Whether this kernel maps over agents or cells.
    fn domain(&self) -> Domain;

    /// Run the pass to completion.
    ///
    /// Returns only after every element has been processed. On error, the
    /// stepper abandons everything staged so far in the tick.
    fn dispatch(
        &self,
        ctx: &mut KernelContext<'_>,
        exec: &dyn KernelExecutor,
    ) -> Result<(), KernelError>;
}
