//! Per-step metrics for the simulation.

/// Timing and counters collected during a single step.
///
/// Durations are in microseconds. Cumulative counters are marked as such;
/// everything else describes the most recent step only.
#[derive(Clone, Debug, Default)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step.
    pub total_us: u64,
    /// Per-kernel execution times: `(name, microseconds)`, in dispatch order.
    pub kernel_us: Vec<(String, u64)>,
    /// Settings edits applied from the inbox at the start of the step.
    pub settings_edits: u32,
    /// Agents that crossed a field edge and were wrapped or reflected.
    pub boundary_crossings: u64,
    /// Total intensity deposited by agents.
    pub deposited: f64,
    /// Whether the frame timing had to be sanitised.
    pub timing_sanitized: bool,
    /// Cumulative number of rolled-back steps.
    pub rollback_events: u64,
}

impl StepMetrics {
    /// Time recorded for kernel `name`, if it ran.
    pub fn kernel(&self, name: &str) -> Option<u64> {
        self.kernel_us
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, us)| us)
    }
}
