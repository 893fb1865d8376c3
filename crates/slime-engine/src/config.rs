//! Simulation configuration and validation.
//!
//! [`SimConfig`] is the input for constructing a [`Simulation`](crate::Simulation).
//! [`validate()`](SimConfig::validate) checks structural invariants at
//! startup; every failure is a [`ConfigError`] and is fatal.

use slime_core::{ConfigError, Settings};
use slime_field::{check_deposit, EdgePolicy, Guides};

// ── DiffusionConfig ────────────────────────────────────────────────

/// Trail diffusion and evaporation parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct DiffusionConfig {
    /// Box blur radius in cells. Default: 1.
    pub blur_radius: u32,
    /// Blend rate toward the blurred value, per second. Default: 10.0.
    pub diffuse_weight: f32,
    /// Fraction of intensity lost per second. Default: 0.2.
    pub evaporate_speed: f32,
}

impl Default for DiffusionConfig {
    fn default() -> Self {
        Self {
            blur_radius: 1,
            diffuse_weight: 10.0,
            evaporate_speed: 0.2,
        }
    }
}

// ── DepositConfig ──────────────────────────────────────────────────

/// How much trail each agent lays down.
#[derive(Clone, Debug, PartialEq)]
pub struct DepositConfig {
    /// Intensity deposited per agent per step. Default: 1.0.
    pub amount: f32,
    /// Optional cap on a cell's intensity after deposits. Default: none.
    pub ceiling: Option<f32>,
}

impl Default for DepositConfig {
    fn default() -> Self {
        Self {
            amount: 1.0,
            ceiling: None,
        }
    }
}

// ── Spawning ───────────────────────────────────────────────────────

/// Where agents start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnPattern {
    /// Uniformly over the whole field.
    Uniform,
    /// Uniformly inside a disc at the field centre. `radius` is a fraction
    /// of the resolution; 0.5 touches the edges.
    Disc {
        /// Disc radius as a fraction of the resolution.
        radius: f32,
    },
}

impl Default for SpawnPattern {
    fn default() -> Self {
        Self::Disc { radius: 0.5 }
    }
}

/// How spawned agents are split between species.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpeciesAssignment {
    /// Agent `i` belongs to species `i % num_species`.
    #[default]
    RoundRobin,
    /// Species by angular sector around the field centre.
    Sectors,
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Complete configuration for constructing a simulation.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Field side length in cells. Default: 256.
    pub resolution: u32,
    /// Number of agents. Default: 50 000.
    pub num_agents: usize,
    /// Number of species. Default: 3.
    pub num_species: u32,
    /// Seed for species generation, spawning, and per-tick randomness.
    pub seed: u64,
    /// Initial attribute ranges.
    pub settings: Settings,
    /// Diffusion and evaporation.
    pub diffusion: DiffusionConfig,
    /// Deposit amount and ceiling.
    pub deposit: DepositConfig,
    /// Boundary policy for movement, sensing, and blurring. Default: wrap.
    pub edge: EdgePolicy,
    /// Initial agent placement.
    pub spawn: SpawnPattern,
    /// Initial species assignment.
    pub assignment: SpeciesAssignment,
    /// Optional static flow and angle maps.
    pub guides: Guides,
    /// Optional cap on the `delta_time` a single step integrates.
    /// Default: none, so any finite non-negative delta is used as given.
    pub max_delta_time: Option<f32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            resolution: 256,
            num_agents: 50_000,
            num_species: 3,
            seed: 0,
            settings: Settings::default(),
            diffusion: DiffusionConfig::default(),
            deposit: DepositConfig::default(),
            edge: EdgePolicy::default(),
            spawn: SpawnPattern::default(),
            assignment: SpeciesAssignment::default(),
            guides: Guides::default(),
            max_delta_time: None,
        }
    }
}

fn non_negative(name: &str, v: f32) -> Result<(), ConfigError> {
    if !v.is_finite() || v < 0.0 {
        return Err(ConfigError::InvalidParameter {
            reason: format!("{name} must be finite and >= 0, got {v}"),
        });
    }
    Ok(())
}

fn positive(name: &str, v: f32) -> Result<(), ConfigError> {
    if !v.is_finite() || v <= 0.0 {
        return Err(ConfigError::InvalidParameter {
            reason: format!("{name} must be finite and > 0, got {v}"),
        });
    }
    Ok(())
}

/// Reject a `sensor_size` range whose window would not fit in the field.
pub(crate) fn check_sensor_size(settings: &Settings, limit: u32) -> Result<(), ConfigError> {
    let max = settings.sensor_size.max;
    if max > limit as f32 {
        return Err(ConfigError::InvalidParameter {
            reason: format!("sensor_size range max {max} exceeds the field limit {limit}"),
        });
    }
    Ok(())
}

impl SimConfig {
    /// Largest `sensor_size` whose `(2r+1)` window fits inside the field.
    pub fn max_sensor_size(&self) -> u32 {
        self.resolution.saturating_sub(1) / 2
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Field must have at least one cell, and fit the index type.
        if self.resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if (self.resolution as u64) * (self.resolution as u64) > u32::MAX as u64 {
            return Err(ConfigError::ResolutionOverflow {
                resolution: self.resolution,
            });
        }
        // 2. At least one agent and one species.
        if self.num_agents == 0 {
            return Err(ConfigError::ZeroAgents);
        }
        if self.num_species == 0 {
            return Err(ConfigError::ZeroSpecies);
        }
        // 3. Every range ordered and finite, sensor windows inside the field.
        self.settings.validate()?;
        check_sensor_size(&self.settings, self.max_sensor_size())?;
        // 4. Diffusion.
        let d = &self.diffusion;
        if d.blur_radius >= self.resolution {
            return Err(ConfigError::InvalidParameter {
                reason: format!(
                    "blur_radius {} must be below resolution {}",
                    d.blur_radius, self.resolution
                ),
            });
        }
        non_negative("diffuse_weight", d.diffuse_weight)?;
        non_negative("evaporate_speed", d.evaporate_speed)?;
        // 5. Deposit, representable even if every agent hits one cell.
        check_deposit(self.deposit.amount, self.num_agents)
            .map_err(|reason| ConfigError::InvalidParameter { reason })?;
        if let Some(ceiling) = self.deposit.ceiling {
            positive("deposit ceiling", ceiling)?;
        }
        // 6. Spawn disc.
        if let SpawnPattern::Disc { radius } = self.spawn {
            positive("spawn disc radius", radius)?;
        }
        // 7. Guide maps must cover the field.
        if let Some(flow) = &self.guides.flow {
            if flow.resolution() != self.resolution {
                return Err(ConfigError::GuideDimensions {
                    guide: "flow",
                    expected: self.resolution,
                    actual: flow.resolution(),
                });
            }
        }
        if let Some(angle) = &self.guides.angle {
            if angle.resolution() != self.resolution {
                return Err(ConfigError::GuideDimensions {
                    guide: "angle",
                    expected: self.resolution,
                    actual: angle.resolution(),
                });
            }
        }
        // 8. Timing cap, if any.
        if let Some(cap) = self.max_delta_time {
            positive("max_delta_time", cap)?;
        }
        Ok(())
    }
}
