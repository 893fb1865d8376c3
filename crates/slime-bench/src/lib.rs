//! Benchmark profiles for the slime-mold simulation.
//!
//! Provides pre-built [`SimConfig`] profiles for benchmarks and examples:
//!
//! - [`reference_profile`]: 256x256 field, 50K agents, three species
//! - [`stress_profile`]: 1024x1024 field, 1M agents, eight species
//! - [`swirl_guides`]: a rotating flow map plus an outward angle map

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use glam::Vec2;
use slime_core::{Attribute, AttributeRange, Settings};
use slime_engine::{SimConfig, SpawnPattern, SpeciesAssignment};
use slime_field::{AngleMap, FlowMap, Guides};

/// Reference profile: 256x256 field (64K cells), 50K agents in a central
/// disc, three species, wrap edges.
pub fn reference_profile(seed: u64) -> SimConfig {
    SimConfig {
        resolution: 256,
        num_agents: 50_000,
        num_species: 3,
        seed,
        ..SimConfig::default()
    }
}

/// Stress profile: 1024x1024 field (~1M cells), 1M agents split into
/// eight angular sectors.
pub fn stress_profile(seed: u64) -> SimConfig {
    SimConfig {
        resolution: 1024,
        num_agents: 1_000_000,
        num_species: 8,
        seed,
        spawn: SpawnPattern::Disc { radius: 0.45 },
        assignment: SpeciesAssignment::Sectors,
        ..SimConfig::default()
    }
}

/// A flow map circling the field centre and an angle map pointing away
/// from it, both sized for `resolution`.
///
/// Returns `None` for a zero resolution.
pub fn swirl_guides(resolution: u32) -> Option<Guides> {
    let center = Vec2::splat(resolution as f32 * 0.5);
    let offset = move |x: u32, y: u32| Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
    let flow = FlowMap::from_fn(resolution, |x, y| offset(x, y).perp().normalize_or_zero()).ok()?;
    let angle = AngleMap::from_fn(resolution, |x, y| {
        let d = offset(x, y);
        d.y.atan2(d.x)
    })
    .ok()?;
    Some(Guides {
        flow: Some(flow),
        angle: Some(angle),
    })
}

/// Settings that give every species some flow response and a weak pull
/// toward the angle guide.
pub fn guided_settings() -> Settings {
    Settings {
        angle_adjustment_weight: 0.5,
        ..Settings::default()
    }
    .with_range(Attribute::FlowSpeed, AttributeRange::new(2.0, 8.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_validate() {
        assert!(reference_profile(1).validate().is_ok());
        assert!(stress_profile(1).validate().is_ok());
    }

    #[test]
    fn guides_match_resolution() {
        let config = SimConfig {
            resolution: 64,
            settings: guided_settings(),
            guides: swirl_guides(64).unwrap(),
            ..SimConfig::default()
        };
        assert!(config.validate().is_ok());
        assert!(swirl_guides(0).is_none());
    }
}
