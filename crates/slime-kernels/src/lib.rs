//! The kernels that make up one simulation tick.
//!
//! # Pipeline order (each tick)
//!
//! 1. [`AgentUpdate`]: per agent, sense the published field, steer, move,
//!    and deposit into the accumulator.
//! 2. [`Diffuse`] (horizontal): staging grid into scratch.
//! 3. [`Diffuse`] (vertical, with evaporation): scratch back into staging.
//!
//! The stepper owns the buffers and the swap that publishes the result.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod agent_update;
pub mod diffuse;
pub mod sensor;

pub use agent_update::AgentUpdate;
pub use diffuse::Diffuse;
pub use sensor::{Readings, Steer};
