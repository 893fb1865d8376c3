//! Integration tests running the kernels in tick order against real
//! buffers, without the engine.

use glam::Vec2;
use proptest::prelude::*;
use slime_core::{Agent, FrameTiming, SpeciesId, TickId};
use slime_field::{DepositAccumulator, EdgePolicy, TrailField, TrailGrid};
use slime_kernel::{Domain, Kernel, KernelContext, RayonExecutor, SerialExecutor};
use slime_kernels::{AgentUpdate, Diffuse};
use slime_test_utils::{species_table, RecordingExecutor};

/// One hand-driven tick: agents, deposit fold, blur pair, commit.
fn tick(
    field: &mut TrailField,
    scratch: &mut TrailGrid,
    agents: &mut [Agent],
    species: &[slime_core::Species],
    deposits: &mut DepositAccumulator,
    edge: EdgePolicy,
    exec: &dyn slime_kernel::KernelExecutor,
    n: u64,
) {
    let timing = FrameTiming::fixed(0.5, n);
    let update = AgentUpdate::builder().seed(11).build().unwrap();
    let [h, v] = Diffuse::separable_pair(1, 1.0, 0.1).unwrap();

    {
        let mut ctx = KernelContext::new(field.current(), timing, TickId(n))
            .with_agents(agents, species)
            .with_deposits(deposits)
            .with_edge(edge);
        update.dispatch(&mut ctx, exec).unwrap();
    }

    let (_, staged) = field.stage();
    deposits.drain_into(staged);
    {
        let mut ctx = KernelContext::new(staged, timing, TickId(n))
            .with_target(scratch)
            .with_edge(edge);
        h.dispatch(&mut ctx, exec).unwrap();
    }
    {
        let mut ctx = KernelContext::new(scratch, timing, TickId(n))
            .with_target(staged)
            .with_edge(edge);
        v.dispatch(&mut ctx, exec).unwrap();
    }
    field.commit();
}

fn spawn(n: usize, res: f32, species: u32) -> Vec<Agent> {
    (0..n)
        .map(|i| {
            let f = i as f32;
            Agent::new(
                SpeciesId(i as u32 % species),
                Vec2::new((f * 7.3) % res, (f * 3.1) % res),
                f * 0.37,
            )
        })
        .collect()
}

#[test]
fn dispatch_order_is_agents_then_two_cell_passes() {
    let res = 16;
    let mut field = TrailField::new(res).unwrap();
    let mut scratch = TrailGrid::new(res).unwrap();
    let species = species_table(2, 5.0);
    let mut agents = spawn(10, res as f32, 2);
    let mut deposits = DepositAccumulator::new(field.current().len(), None);
    let exec = RecordingExecutor::new();

    tick(
        &mut field,
        &mut scratch,
        &mut agents,
        &species,
        &mut deposits,
        EdgePolicy::Wrap,
        &exec,
        1,
    );

    assert_eq!(
        exec.dispatches(),
        vec![(Domain::Agents, 10), (Domain::Cells, 256), (Domain::Cells, 256)]
    );
    assert!(field.current().total() > 0.0);
}

#[test]
fn serial_and_rayon_agree_bit_for_bit() {
    let res = 48;
    let species = species_table(3, 7.0);
    let run = |exec: &dyn slime_kernel::KernelExecutor| {
        let mut field = TrailField::new(res).unwrap();
        let mut scratch = TrailGrid::new(res).unwrap();
        let mut agents = spawn(2000, res as f32, 3);
        let mut deposits = DepositAccumulator::new(field.current().len(), None);
        let mut sp = species.clone();
        for s in &mut sp {
            s.turn_speed = 3.0;
            s.random_turn_weight = 0.4;
            s.sensor_size = 1;
        }
        for n in 1..=20 {
            tick(
                &mut field,
                &mut scratch,
                &mut agents,
                &sp,
                &mut deposits,
                EdgePolicy::Wrap,
                exec,
                n,
            );
        }
        (agents, field.current().clone())
    };

    let serial = run(&SerialExecutor);
    let parallel = run(&RayonExecutor::with_threads(4).unwrap());
    assert_eq!(serial.0, parallel.0);
    assert_eq!(serial.1, parallel.1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn agents_stay_in_bounds(
        speed in 0.0f32..200.0,
        heading in -20.0f32..20.0,
        x in 0.0f32..31.9,
        y in 0.0f32..31.9,
        mirror in any::<bool>(),
    ) {
        let res = 32;
        let edge = if mirror { EdgePolicy::Mirror } else { EdgePolicy::Wrap };
        let mut field = TrailField::new(res).unwrap();
        let mut scratch = TrailGrid::new(res).unwrap();
        let species = species_table(1, speed);
        let mut agents = vec![Agent::new(SpeciesId(0), Vec2::new(x, y), heading)];
        let mut deposits = DepositAccumulator::new(field.current().len(), None);
        for n in 1..=5 {
            tick(&mut field, &mut scratch, &mut agents, &species, &mut deposits, edge, &SerialExecutor, n);
            let p = agents[0].position;
            prop_assert!(p.x >= 0.0 && p.x < res as f32, "x = {}", p.x);
            prop_assert!(p.y >= 0.0 && p.y < res as f32, "y = {}", p.y);
        }
    }
}
