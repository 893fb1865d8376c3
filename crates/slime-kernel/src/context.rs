//! Execution context passed to kernels during a tick.
//!
//! [`KernelContext`] gives a kernel read access to the published field and
//! mutable access to whichever staging buffers the stepper lent it for
//! this pass. Buffers a pass was not given are reported as
//! [`KernelError::ExecutionFailed`] when asked for.

use slime_core::{Agent, FrameTiming, KernelError, Species, TickId};
use slime_field::{DepositAccumulator, EdgePolicy, Guides, TrailGrid};

/// Split-borrow view of the simulation state for one kernel dispatch.
///
/// The read side (`field`, `species`, `deposits`, `guides`) is shared and
/// carries the full `'a` lifetime, so a kernel can hold those references
/// while it mutably borrows the write side (`target`, `agents`).
pub struct KernelContext<'a> {
    field: &'a TrailGrid,
    target: Option<&'a mut TrailGrid>,
    agents: Option<&'a mut [Agent]>,
    species: &'a [Species],
    deposits: Option<&'a DepositAccumulator>,
    guides: Option<&'a Guides>,
    edge: EdgePolicy,
    timing: FrameTiming,
    tick: TickId,
    angle_adjustment_weight: f32,
    boundary_crossings: u64,
}

impl<'a> KernelContext<'a> {
    /// A context that can read `field` and nothing else.
    ///
    /// Typically built by the stepper. Tests attach only the buffers the
    /// kernel under test needs.
    pub fn new(field: &'a TrailGrid, timing: FrameTiming, tick: TickId) -> Self {
        Self {
            field,
            target: None,
            agents: None,
            species: &[],
            deposits: None,
            guides: None,
            edge: EdgePolicy::default(),
            timing,
            tick,
            angle_adjustment_weight: 0.0,
            boundary_crossings: 0,
        }
    }

    /// Attach a writable grid for cell kernels.
    pub fn with_target(mut self, target: &'a mut TrailGrid) -> Self {
        self.target = Some(target);
        self
    }

    /// Attach the agent array and the species table it indexes.
    pub fn with_agents(mut self, agents: &'a mut [Agent], species: &'a [Species]) -> Self {
        self.agents = Some(agents);
        self.species = species;
        self
    }

    /// Attach the deposit accumulator.
    pub fn with_deposits(mut self, deposits: &'a DepositAccumulator) -> Self {
        self.deposits = Some(deposits);
        self
    }

    /// Attach guide maps.
    pub fn with_guides(mut self, guides: &'a Guides) -> Self {
        self.guides = Some(guides);
        self
    }

    /// Set the edge policy.
    pub fn with_edge(mut self, edge: EdgePolicy) -> Self {
        self.edge = edge;
        self
    }

    /// Set the angle guide weight.
    pub fn with_angle_adjustment(mut self, weight: f32) -> Self {
        self.angle_adjustment_weight = weight;
        self
    }

    /// The published field. Never written during a tick.
    pub fn field(&self) -> &'a TrailGrid {
        self.field
    }

    /// The writable grid lent for this pass.
    pub fn target(&mut self) -> Result<&mut TrailGrid, KernelError> {
        self.target
            .as_deref_mut()
            .ok_or_else(|| KernelError::ExecutionFailed {
                reason: "no target grid attached".to_string(),
            })
    }

    /// The writable agent array lent for this pass.
    pub fn agents_mut(&mut self) -> Result<&mut [Agent], KernelError> {
        self.agents
            .as_deref_mut()
            .ok_or_else(|| KernelError::ExecutionFailed {
                reason: "no agent buffer attached".to_string(),
            })
    }

    /// The species table. Empty unless agents were attached.
    pub fn species(&self) -> &'a [Species] {
        self.species
    }

    /// The deposit accumulator.
    pub fn deposits(&self) -> Result<&'a DepositAccumulator, KernelError> {
        self.deposits.ok_or_else(|| KernelError::ExecutionFailed {
            reason: "no deposit accumulator attached".to_string(),
        })
    }

    /// Guide maps, if any were attached.
    pub fn guides(&self) -> Option<&'a Guides> {
        self.guides
    }

    /// Edge policy shared by sensing, movement, and blurring.
    pub fn edge(&self) -> EdgePolicy {
        self.edge
    }

    /// Timing for this tick.
    pub fn timing(&self) -> FrameTiming {
        self.timing
    }

    /// Seconds since the previous tick.
    pub fn dt(&self) -> f32 {
        self.timing.delta_time
    }

    /// The tick being built.
    pub fn tick(&self) -> TickId {
        self.tick
    }

    /// Angle guide weight.
    pub fn angle_adjustment_weight(&self) -> f32 {
        self.angle_adjustment_weight
    }

    /// Record how many agents crossed an edge this pass.
    pub fn record_boundary_crossings(&mut self, count: u64) {
        self.boundary_crossings += count;
    }

    /// Edge crossings recorded so far.
    pub fn boundary_crossings(&self) -> u64 {
        self.boundary_crossings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use slime_core::SpeciesId;

    #[test]
    fn missing_buffers_are_errors() {
        let field = TrailGrid::new(2).unwrap();
        let mut ctx = KernelContext::new(&field, FrameTiming::default(), TickId(3));
        assert!(ctx.target().is_err());
        assert!(ctx.agents_mut().is_err());
        assert!(ctx.deposits().is_err());
        assert!(ctx.guides().is_none());
        assert!(ctx.species().is_empty());
        assert_eq!(ctx.tick(), TickId(3));
    }

    #[test]
    fn attached_buffers_are_reachable() {
        let field = TrailGrid::new(2).unwrap();
        let mut target = TrailGrid::new(2).unwrap();
        let mut agents = vec![Agent::new(SpeciesId(0), Vec2::ONE, 0.0)];
        let species = vec![Species::with_colors(0, 1)];
        let deposits = DepositAccumulator::new(4, None);
        let guides = Guides::none();

        let mut ctx = KernelContext::new(&field, FrameTiming::new(0.5, 1.0), TickId(1))
            .with_target(&mut target)
            .with_agents(&mut agents, &species)
            .with_deposits(&deposits)
            .with_guides(&guides)
            .with_edge(EdgePolicy::Mirror)
            .with_angle_adjustment(0.25);

        // Shared reads outlive the mutable borrows below.
        let read = ctx.field();
        ctx.target().unwrap().fill(1.0);
        ctx.agents_mut().unwrap()[0].heading = 2.0;
        assert_eq!(read.total(), 0.0);
        assert_eq!(ctx.species().len(), 1);
        assert_eq!(ctx.dt(), 0.5);
        assert_eq!(ctx.edge(), EdgePolicy::Mirror);
        assert_eq!(ctx.angle_adjustment_weight(), 0.25);

        ctx.record_boundary_crossings(2);
        ctx.record_boundary_crossings(3);
        assert_eq!(ctx.boundary_crossings(), 5);
        drop(ctx);

        assert_eq!(target.total(), 4.0);
        assert_eq!(agents[0].heading, 2.0);
    }
}
