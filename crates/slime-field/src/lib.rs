//! Trail field storage for the slime-mold simulation.
//!
//! The field is a square grid of non-negative intensities, held twice so
//! that one copy can be read while the next is written:
//!
//! - [`TrailGrid`] is a single `resolution x resolution` buffer with
//!   edge-aware sampling.
//! - [`TrailField`] pairs a published grid with a staging grid and swaps
//!   them on commit.
//! - [`DepositAccumulator`] collects concurrent, additive deposits.
//! - [`Guides`] holds optional static flow and angle maps.
//! - [`EdgePolicy`] resolves out-of-range positions and sample cells.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod deposit;
pub mod edge;
pub mod error;
pub mod field;
pub mod grid;
pub mod guide;

pub use deposit::{check_deposit, DepositAccumulator, MIN_DEPOSIT};
pub use edge::{AxisFold, EdgePolicy};
pub use error::FieldError;
pub use field::TrailField;
pub use grid::{BlurAxis, TrailGrid};
pub use guide::{AngleMap, FlowMap, Guides};
