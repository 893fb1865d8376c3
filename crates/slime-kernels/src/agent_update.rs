//! Per-agent sense, steer, move, and deposit kernel.
//!
//! Respects the determinism contract: the random heading perturbation of
//! agent `i` comes from a ChaCha8 stream keyed by `seed XOR tick` with
//! stream id `i`, so it does not depend on which worker runs the agent or
//! in what order. Deposits go through the fixed-point accumulator, which
//! sums in any order to the same result.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use slime_core::angle::{lerp_angle, wrap_angle};
use slime_core::{Agent, KernelError, Species};
use slime_field::{check_deposit, DepositAccumulator, EdgePolicy, Guides, TrailGrid};
use slime_kernel::{Domain, Kernel, KernelContext, KernelExecutor};

use crate::sensor::read_sensors;

/// Moves every agent one step and records its deposit.
///
/// For each agent, in order:
///
/// 1. Sense the published field at three points (ahead and at
///    `±sensor_angle`, each `sensor_distance` out).
/// 2. Turn by `turn_speed * dt * intentional_turn_weight` toward a side
///    that is strictly the strongest, otherwise keep heading.
/// 3. Add a uniform random turn in
///    `±random_turn_weight * turn_speed * dt`.
/// 4. If an angle guide is present, rotate toward its target by
///    `angle_adjustment_weight * dt` of the shortest arc.
/// 5. Advance `move_speed * dt` along the heading, plus
///    `flow * flow_speed * dt` from the flow guide.
/// 6. Resolve the new position with the edge policy.
/// 7. Deposit `deposit_amount` into the cell the agent now occupies.
///
/// # Construction
///
/// ```
/// use slime_kernels::AgentUpdate;
///
/// let kernel = AgentUpdate::builder()
///     .deposit_amount(1.0)
///     .seed(7)
///     .build()
///     .unwrap();
/// assert_eq!(kernel.deposit_amount(), 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct AgentUpdate {
    deposit_amount: f32,
    seed: u64,
}

/// Builder for [`AgentUpdate`].
///
/// Defaults: deposit 1.0 per step, seed 0.
pub struct AgentUpdateBuilder {
    deposit_amount: f32,
    seed: u64,
}

impl AgentUpdate {
    /// Create a new builder.
    pub fn builder() -> AgentUpdateBuilder {
        AgentUpdateBuilder {
            deposit_amount: 1.0,
            seed: 0,
        }
    }

    /// Intensity each agent deposits per step.
    pub fn deposit_amount(&self) -> f32 {
        self.deposit_amount
    }

    /// Base seed for the random perturbation.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl AgentUpdateBuilder {
    /// Intensity deposited per agent per step (default 1.0). Must be >= 0.
    pub fn deposit_amount(mut self, amount: f32) -> Self {
        self.deposit_amount = amount;
        self
    }

    /// Seed for the per-tick random streams (default 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the kernel.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `deposit_amount` is negative, not finite, or too
    /// small for the deposit accumulator to represent.
    pub fn build(self) -> Result<AgentUpdate, String> {
        check_deposit(self.deposit_amount, 1)?;
        Ok(AgentUpdate {
            deposit_amount: self.deposit_amount,
            seed: self.seed,
        })
    }
}

/// Everything one agent step reads, shared by all workers.
struct AgentStep<'a> {
    field: &'a TrailGrid,
    species: &'a [Species],
    deposits: &'a DepositAccumulator,
    guides: Option<&'a Guides>,
    edge: EdgePolicy,
    dt: f32,
    angle_weight: f32,
    stream_seed: u64,
    deposit_amount: f32,
}

impl AgentStep<'_> {
    /// Advance agent `i`. Returns true if it crossed an edge.
    fn advance(&self, i: usize, agent: &mut Agent) -> bool {
        // Species index validated before dispatch.
        let sp = &self.species[agent.species as usize];
        let turn = sp.turn_speed * self.dt;

        let steer = read_sensors(self.field, agent, sp, self.edge).steer();
        let mut heading = agent.heading + steer.sign() * turn * sp.intentional_turn_weight;

        if sp.random_turn_weight != 0.0 {
            let mut rng = ChaCha8Rng::seed_from_u64(self.stream_seed);
            rng.set_stream(i as u64);
            let jitter: f32 = rng.random_range(-1.0..1.0);
            heading += jitter * sp.random_turn_weight * turn;
        }

        let cell = self.field.cell_at(agent.position);
        let mut flow = Vec2::ZERO;
        if let Some(guides) = self.guides {
            if self.angle_weight > 0.0 {
                if let Some(target) = guides.angle_at(cell) {
                    let t = (self.angle_weight * self.dt).clamp(0.0, 1.0);
                    heading = lerp_angle(heading, target, t);
                }
            }
            if sp.flow_speed != 0.0 {
                flow = guides.flow_at(cell);
            }
        }

        let delta = Vec2::from_angle(heading) * (sp.move_speed * self.dt)
            + flow * (sp.flow_speed * self.dt);
        let (position, heading, crossed) =
            self.edge
                .resolve_agent(agent.position + delta, heading, self.field.extent());

        agent.position = position;
        agent.heading = wrap_angle(heading);
        self.deposits
            .deposit(self.field.cell_at(position), self.deposit_amount);
        crossed
    }
}

impl Kernel for AgentUpdate {
    fn name(&self) -> &str {
        "agent_update"
    }

    fn domain(&self) -> Domain {
        Domain::Agents
    }

    fn dispatch(
        &self,
        ctx: &mut KernelContext<'_>,
        exec: &dyn KernelExecutor,
    ) -> Result<(), KernelError> {
        let field = ctx.field();
        let deposits = ctx.deposits()?;
        if deposits.len() != field.len() {
            return Err(KernelError::BufferMismatch {
                expected: field.len(),
                actual: deposits.len(),
            });
        }

        let step = AgentStep {
            field,
            species: ctx.species(),
            deposits,
            guides: ctx.guides(),
            edge: ctx.edge(),
            dt: ctx.dt(),
            angle_weight: ctx.angle_adjustment_weight(),
            stream_seed: self.seed ^ ctx.tick().0,
            deposit_amount: self.deposit_amount,
        };

        let agents = ctx.agents_mut()?;
        if let Some((i, agent)) = agents
            .iter()
            .enumerate()
            .find(|(_, a)| a.species as usize >= step.species.len())
        {
            return Err(KernelError::ExecutionFailed {
                reason: format!(
                    "agent {i} references species {} but the table has {} rows",
                    agent.species,
                    step.species.len()
                ),
            });
        }

        let crossings = AtomicU64::new(0);
        exec.for_each_agent(agents, &|i, agent| {
            if step.advance(i, agent) {
                crossings.fetch_add(1, Ordering::Relaxed);
            }
        });
        ctx.record_boundary_crossings(crossings.into_inner());
        Ok(())
    }
}
