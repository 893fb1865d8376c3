//! Integration test: non-finite detection and tick rollback.
//!
//! A faulty executor runs each pass correctly and then corrupts its output
//! with NaN. The step must fail with `StepError::KernelFailed`, and the
//! published agents, field, and tick must be exactly as they were before
//! the call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::Vec2;
use slime_core::{Agent, FrameTiming, KernelError, StepError, TickId};
use slime_engine::{SimConfig, Simulation};
use slime_field::{FlowMap, Guides};
use slime_kernel::{KernelExecutor, SerialExecutor};

/// Switches shared between a test and the executor it hands to the
/// simulation.
#[derive(Default)]
struct Faults {
    agents: AtomicBool,
    cells: AtomicBool,
}

/// Serial executor that poisons the first element of a pass while the
/// matching fault is armed.
struct FaultyExecutor(Arc<Faults>);

impl KernelExecutor for FaultyExecutor {
    fn name(&self) -> &str {
        "faulty"
    }

    fn for_each_agent(&self, agents: &mut [Agent], f: &(dyn Fn(usize, &mut Agent) + Sync)) {
        SerialExecutor.for_each_agent(agents, f);
        if self.0.agents.load(Ordering::Relaxed) {
            if let Some(a) = agents.first_mut() {
                a.position = Vec2::NAN;
            }
        }
    }

    fn fill_cells(&self, cells: &mut [f32], f: &(dyn Fn(usize) -> f32 + Sync)) {
        SerialExecutor.fill_cells(cells, f);
        if self.0.cells.load(Ordering::Relaxed) {
            if let Some(c) = cells.first_mut() {
                *c = f32::NAN;
            }
        }
    }
}

fn config() -> SimConfig {
    SimConfig {
        resolution: 16,
        num_agents: 50,
        num_species: 2,
        ..SimConfig::default()
    }
}

fn faulty() -> (Simulation, Arc<Faults>) {
    let faults = Arc::new(Faults::default());
    let sim = Simulation::with_executor(config(), Box::new(FaultyExecutor(faults.clone()))).unwrap();
    (sim, faults)
}

#[test]
fn nan_agents_roll_back_tick() {
    let (mut sim, faults) = faulty();
    sim.step(FrameTiming::new(0.016, 0.0)).unwrap();
    let agents_before = sim.agents().to_vec();
    let trail_before = sim.trail().clone();

    faults.agents.store(true, Ordering::Relaxed);
    let err = sim.step(FrameTiming::new(0.016, 0.016)).unwrap_err();
    match &err {
        StepError::KernelFailed { name, reason } => {
            assert_eq!(name, "agent_update");
            assert_eq!(
                reason,
                &KernelError::NonFinite {
                    buffer: "agents",
                    index: 0
                }
            );
        }
    }
    assert!(std::error::Error::source(&err).is_some());

    assert_eq!(sim.current_tick(), TickId(1));
    assert_eq!(sim.agents(), agents_before.as_slice());
    assert_eq!(sim.trail(), &trail_before);
    assert_eq!(sim.rollback_events(), 1);
}

#[test]
fn nan_trail_rolls_back_tick() {
    let (mut sim, faults) = faulty();
    let agents_before = sim.agents().to_vec();
    let trail_before = sim.trail().clone();

    faults.cells.store(true, Ordering::Relaxed);
    let err = sim.step(FrameTiming::new(0.016, 0.0)).unwrap_err();
    match &err {
        StepError::KernelFailed { name, reason } => {
            assert_eq!(name, "diffuse_v");
            assert!(matches!(
                reason,
                KernelError::NonFinite {
                    buffer: "trail",
                    ..
                }
            ));
        }
    }
    assert_eq!(sim.current_tick(), TickId(0));
    assert_eq!(sim.agents(), agents_before.as_slice());
    assert_eq!(sim.trail(), &trail_before);
}

#[test]
fn recovers_once_the_fault_clears() {
    let (mut sim, faults) = faulty();
    faults.agents.store(true, Ordering::Relaxed);
    assert!(sim.step(FrameTiming::new(0.016, 0.0)).is_err());
    assert!(sim.step(FrameTiming::new(0.016, 0.0)).is_err());
    assert_eq!(sim.rollback_events(), 2);

    faults.agents.store(false, Ordering::Relaxed);
    let result = sim.step(FrameTiming::new(0.016, 0.0)).unwrap();
    assert_eq!(result.tick, TickId(1));
    assert_eq!(result.metrics.rollback_events, 2);
    assert!(sim.agents().iter().all(|a| a.is_finite()));
}

#[test]
fn rollback_drops_pending_deposits() {
    let (mut sim, faults) = faulty();
    faults.agents.store(true, Ordering::Relaxed);
    assert!(sim.step(FrameTiming::new(0.016, 0.0)).is_err());
    // A failed step leaves no trail behind, published or pending.
    assert_eq!(sim.trail().total(), 0.0);
    assert_eq!(sim.last_metrics().deposited, 0.0);
}

#[test]
fn non_finite_guide_is_a_configuration_error() {
    let mut vectors = vec![Vec2::X; 16 * 16];
    vectors[7] = Vec2::NAN;
    assert!(FlowMap::new(16, vectors).is_err());

    // A finite map passes through construction and stepping untouched.
    let config = SimConfig {
        guides: Guides {
            flow: Some(FlowMap::from_fn(16, |_, _| Vec2::Y).unwrap()),
            angle: None,
        },
        ..config()
    };
    let mut sim = Simulation::with_executor(config, Box::new(SerialExecutor)).unwrap();
    sim.step(FrameTiming::new(0.016, 0.0)).unwrap();
    assert!(sim.agents().iter().all(|a| a.is_finite()));
}
