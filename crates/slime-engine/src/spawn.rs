//! Initial agent placement.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use slime_core::angle::wrap_angle;
use slime_core::{Agent, SpeciesId};

use crate::config::{SimConfig, SpawnPattern, SpeciesAssignment};

/// Stream id for spawn draws, distinct from species generation.
const SPAWN_STREAM: u64 = 1;

/// Place `config.num_agents` agents according to the spawn pattern and
/// species assignment. Headings are uniform in `[0, TAU)`.
///
/// Every position lies inside the field, resolved with the configured
/// edge policy.
pub fn spawn_agents(config: &SimConfig) -> Vec<Agent> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    rng.set_stream(SPAWN_STREAM);

    let extent = config.resolution as f32;
    let center = Vec2::splat(extent * 0.5);
    let species = config.num_species.max(1);

    (0..config.num_agents)
        .map(|i| {
            let raw = match config.spawn {
                SpawnPattern::Uniform => Vec2::new(rng.random(), rng.random()) * extent,
                SpawnPattern::Disc { radius } => {
                    center + unit_disc(&mut rng) * (radius * extent)
                }
            };
            let heading = rng.random::<f32>() * TAU;
            let (position, heading, _) = config.edge.resolve_agent(raw, heading, extent);

            let index = match config.assignment {
                SpeciesAssignment::RoundRobin => (i % species as usize) as u32,
                SpeciesAssignment::Sectors => sector(position - center, species),
            };
            Agent::new(SpeciesId(index), position, wrap_angle(heading))
        })
        .collect()
}

/// Uniform point in the unit disc by rejection.
fn unit_disc(rng: &mut ChaCha8Rng) -> Vec2 {
    loop {
        let p = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}

/// Angular sector of `offset` around the centre, in `0..count`.
fn sector(offset: Vec2, count: u32) -> u32 {
    let angle = wrap_angle(offset.y.atan2(offset.x));
    let s = (angle / TAU * count as f32).floor() as u32;
    s.min(count - 1)
}
