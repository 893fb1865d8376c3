//! Kernel abstraction for the slime-mold simulation.
//!
//! A tick is a short sequence of data-parallel passes. Each pass is a
//! [`Kernel`]: a stateless operator that maps over either the agent array
//! or the field cells. Kernels never loop over elements themselves; they
//! hand a per-element closure to a [`KernelExecutor`], which runs it to
//! completion before returning. That return is the barrier between passes.
//!
//! - [`Kernel`]: the per-pass operator trait.
//! - [`KernelContext`]: split-borrow access to the buffers a pass reads
//!   and writes.
//! - [`SerialExecutor`] and [`RayonExecutor`]: executor implementations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod executor;
pub mod kernel;

pub use context::KernelContext;
pub use executor::{KernelExecutor, RayonExecutor, SerialExecutor};
pub use kernel::{Domain, Kernel};
