//! Slime: a multi-species slime-mold simulation.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Slime sub-crates. For most users, adding `slime` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use slime::prelude::*;
//!
//! let config = SimConfig {
//!     resolution: 64,
//!     num_agents: 1_000,
//!     num_species: 3,
//!     seed: 42,
//!     ..SimConfig::default()
//! };
//! let mut sim = Simulation::new(config).unwrap();
//!
//! // Narrow every species' speed while it runs.
//! let edit = sim
//!     .settings()
//!     .clone()
//!     .with_range(Attribute::MoveSpeed, AttributeRange::new(10.0, 20.0));
//! sim.settings_sender().send(edit).unwrap();
//!
//! for n in 0..10 {
//!     sim.step(FrameTiming::fixed(1.0 / 60.0, n)).unwrap();
//! }
//! assert_eq!(sim.current_tick(), TickId(10));
//! assert!(sim.species().as_slice().iter().all(|s| s.move_speed <= 20.0));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `slime-core` | Agents, species, settings, ids, colors, errors |
//! | [`field`] | `slime-field` | Trail grids, double buffer, deposits, edges, guides |
//! | [`kernel`] | `slime-kernel` | Kernel trait, context, executors |
//! | [`kernels`] | `slime-kernels` | Agent update and diffusion kernels |
//! | [`engine`] | `slime-engine` | Stepper, species generation, remapping, config |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`slime-core`).
///
/// The GPU-layout [`types::Agent`] and [`types::Species`] records, the
/// [`types::Settings`] ranges, and every error type.
pub use slime_core as types;

/// Trail storage (`slime-field`).
///
/// [`field::TrailField`] double-buffers the trail; [`field::EdgePolicy`]
/// decides what happens at the border.
pub use slime_field as field;

/// Kernel trait and executors (`slime-kernel`).
pub use slime_kernel as kernel;

/// The built-in kernels (`slime-kernels`).
///
/// [`kernels::AgentUpdate`] moves agents and records deposits;
/// [`kernels::Diffuse`] blurs and evaporates the trail.
pub use slime_kernels as kernels;

/// The simulation engine (`slime-engine`).
pub use slime_engine as engine;

/// Common imports for typical usage.
///
/// ```rust
/// use slime::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use slime_core::{
        Agent, Attribute, AttributeRange, FrameTiming, Settings, Species, SpeciesId, TickId,
    };

    // Errors
    pub use slime_core::{ConfigError, KernelError, RemapWarning, StepError};

    // Field
    pub use slime_field::{AngleMap, EdgePolicy, FlowMap, Guides, TrailGrid};

    // Kernels
    pub use slime_kernel::{Kernel, KernelExecutor, RayonExecutor, SerialExecutor};

    // Engine
    pub use slime_engine::{
        RemapReport, SettingsSender, SimConfig, Simulation, SpawnPattern, SpeciesAssignment,
        StepMetrics, StepResult,
    };
}
