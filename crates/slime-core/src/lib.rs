//! Core types for the slime-mold simulation.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! plain data shared by every other crate in the workspace: agent and
//! species records (laid out for upload to a compute device), remappable
//! attribute ranges, identifiers, angle helpers, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod angle;
pub mod attribute;
pub mod color;
pub mod error;
pub mod id;
pub mod settings;
pub mod species;
pub mod timing;

pub use agent::Agent;
pub use attribute::{Attribute, AttributeRange};
pub use error::{ConfigError, KernelError, RemapWarning, StepError};
pub use id::{SpeciesId, TickId};
pub use settings::Settings;
pub use species::Species;
pub use timing::FrameTiming;
