//! Simulation engine for the slime-mold simulation.
//!
//! [`Simulation`] owns the field, agents, species table, and settings, and
//! advances them one tick at a time through the agent-update and diffusion
//! kernels. Settings edits, whether applied directly or queued through a
//! [`SettingsSender`], go through the [`Remapper`], which rescales every
//! species into the new ranges without resetting the run.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod inbox;
pub mod metrics;
pub mod remap;
pub mod spawn;
pub mod species_table;
pub mod stepper;

pub use config::{DepositConfig, DiffusionConfig, SimConfig, SpawnPattern, SpeciesAssignment};
pub use inbox::{InboxError, SettingsSender};
pub use metrics::StepMetrics;
pub use remap::{remap_species, remap_value, RemapReport, Remapper};
pub use species_table::SpeciesTable;
pub use stepper::{Simulation, StepResult};
