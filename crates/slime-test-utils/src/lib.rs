//! Test utilities for slime-mold simulation development.
//!
//! Provides species and settings fixtures with predictable behaviour, a
//! grid builder, and [`RecordingExecutor`], which runs serially while
//! logging every dispatch so tests can assert on pass order and domain
//! sizes.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::Mutex;

use slime_core::Agent;
use slime_kernel::{Domain, KernelExecutor, SerialExecutor};

pub use fixtures::{grid_with, point_settings, species_moving, species_table};

/// Serial executor that records `(domain, element count)` per dispatch.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    log: Mutex<Vec<(Domain, usize)>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches seen so far, in call order.
    pub fn dispatches(&self) -> Vec<(Domain, usize)> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Forget recorded dispatches.
    pub fn clear(&self) {
        if let Ok(mut l) = self.log.lock() {
            l.clear();
        }
    }

    fn record(&self, domain: Domain, len: usize) {
        if let Ok(mut l) = self.log.lock() {
            l.push((domain, len));
        }
    }
}

impl KernelExecutor for RecordingExecutor {
    fn name(&self) -> &str {
        "recording"
    }

    fn for_each_agent(&self, agents: &mut [Agent], f: &(dyn Fn(usize, &mut Agent) + Sync)) {
        self.record(Domain::Agents, agents.len());
        SerialExecutor.for_each_agent(agents, f);
    }

    fn fill_cells(&self, cells: &mut [f32], f: &(dyn Fn(usize) -> f32 + Sync)) {
        self.record(Domain::Cells, cells.len());
        SerialExecutor.fill_cells(cells, f);
    }
}
