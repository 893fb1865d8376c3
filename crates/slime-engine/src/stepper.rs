//! The simulation stepper.
//!
//! [`Simulation`] owns every buffer and runs one tick per
//! [`step()`](Simulation::step):
//!
//! 1. Apply queued settings edits through the remapper.
//! 2. Sanitise the frame timing.
//! 3. Agent update against the published field, into staged agents and
//!    the deposit accumulator.
//! 4. Stage the field and fold in the deposits.
//! 5. Horizontal blur, staged into scratch.
//! 6. Vertical blur with evaporation, scratch back into staged.
//! 7. Finiteness checks on agents and trail.
//! 8. Publish staged agents and field.
//!
//! Any failure before step 8 abandons the staged buffers, so the published
//! state is exactly what it was before the call.

use std::time::Instant;

use slime_core::{
    Agent, ConfigError, FrameTiming, KernelError, Settings, StepError, TickId,
};
use slime_field::{check_deposit, DepositAccumulator, TrailField, TrailGrid};
use slime_kernel::{Kernel, KernelContext, KernelExecutor, RayonExecutor};
use slime_kernels::{AgentUpdate, Diffuse};
use tracing::{debug, info, trace, warn};

use crate::config::{check_sensor_size, SimConfig};
use crate::inbox::{SettingsInbox, SettingsSender};
use crate::metrics::StepMetrics;
use crate::remap::{RemapReport, Remapper};
use crate::spawn::spawn_agents;
use crate::species_table::SpeciesTable;

// ── StepResult ──────────────────────────────────────────────────────

/// Result of a successful step.
#[derive(Clone, Debug)]
pub struct StepResult {
    /// The tick that was just published.
    pub tick: TickId,
    /// Reports for settings edits drained from the inbox this step.
    pub remaps: Vec<RemapReport>,
    /// Metrics for this step.
    pub metrics: StepMetrics,
}

// ── Simulation ──────────────────────────────────────────────────────

/// A running multi-species slime-mold simulation.
///
/// # Example
///
/// ```
/// use slime_core::FrameTiming;
/// use slime_engine::{SimConfig, Simulation};
///
/// let config = SimConfig {
///     resolution: 32,
///     num_agents: 100,
///     ..SimConfig::default()
/// };
/// let mut sim = Simulation::new(config).unwrap();
/// let result = sim.step(FrameTiming::new(1.0 / 60.0, 0.0)).unwrap();
/// assert_eq!(result.tick.0, 1);
/// assert!(sim.trail().total() > 0.0);
/// ```
pub struct Simulation {
    config: SimConfig,
    field: TrailField,
    scratch: TrailGrid,
    deposits: DepositAccumulator,
    agents: Vec<Agent>,
    staged_agents: Vec<Agent>,
    species: SpeciesTable,
    settings: Settings,
    remapper: Remapper,
    agent_update: AgentUpdate,
    diffuse: [Diffuse; 2],
    executor: Box<dyn KernelExecutor>,
    inbox: SettingsInbox,
    current_tick: TickId,
    rollback_events: u64,
    last_metrics: StepMetrics,
}

impl Simulation {
    /// Build a simulation that runs kernels on the global rayon pool.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_executor(config, Box::new(RayonExecutor::new()))
    }

    /// Build a simulation with an explicit executor.
    ///
    /// Validates `config`, generates the species table, and spawns agents.
    /// Every failure here is fatal.
    pub fn with_executor(
        config: SimConfig,
        executor: Box<dyn KernelExecutor>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let field = TrailField::new(config.resolution)?;
        let scratch = TrailGrid::new(config.resolution)?;
        let deposits = DepositAccumulator::new(scratch.len(), config.deposit.ceiling);
        let species = SpeciesTable::generate(config.num_species, &config.settings, config.seed)?;
        let agents = spawn_agents(&config);
        let staged_agents = agents.clone();

        let agent_update = AgentUpdate::builder()
            .deposit_amount(config.deposit.amount)
            .seed(config.seed)
            .build()
            .map_err(|reason| ConfigError::InvalidParameter { reason })?;
        let d = &config.diffusion;
        let diffuse = Diffuse::separable_pair(d.blur_radius, d.diffuse_weight, d.evaporate_speed)
            .map_err(|reason| ConfigError::InvalidParameter { reason })?;

        info!(
            resolution = config.resolution,
            agents = config.num_agents,
            species = config.num_species,
            seed = config.seed,
            edge = ?config.edge,
            executor = executor.name(),
            "simulation created"
        );

        Ok(Self {
            settings: config.settings.clone(),
            remapper: Remapper::with_baseline(config.settings.clone()),
            config,
            field,
            scratch,
            deposits,
            agents,
            staged_agents,
            species,
            agent_update,
            diffuse,
            executor,
            inbox: SettingsInbox::new(),
            current_tick: TickId::default(),
            rollback_events: 0,
            last_metrics: StepMetrics::default(),
        })
    }

    // ── Stepping ────────────────────────────────────────────────────

    /// Advance one tick.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::KernelFailed`] if a kernel fails or leaves a
    /// non-finite value behind. The tick is rolled back: agents, field,
    /// and tick counter are unchanged. Settings edits drained before the
    /// failure stay applied.
    pub fn step(&mut self, timing: FrameTiming) -> Result<StepResult, StepError> {
        let tick_start = Instant::now();
        let next_tick = self.current_tick.next();

        // 1. Settings edits.
        let remaps = self.drain_inbox();

        // 2. Timing.
        let (timing, timing_sanitized) = timing.sanitized(self.config.max_delta_time);
        if timing_sanitized {
            warn!(
                tick = next_tick.0,
                delta_time = timing.delta_time,
                "frame timing sanitised"
            );
        }

        let mut kernel_us = Vec::with_capacity(3);
        let edge = self.config.edge;

        // 3. Agent update.
        self.staged_agents.copy_from_slice(&self.agents);
        let pass_start = Instant::now();
        let outcome = {
            let mut ctx = KernelContext::new(self.field.current(), timing, next_tick)
                .with_agents(&mut self.staged_agents, self.species.as_slice())
                .with_deposits(&self.deposits)
                .with_guides(&self.config.guides)
                .with_edge(edge)
                .with_angle_adjustment(self.settings.angle_adjustment_weight);
            self.agent_update
                .dispatch(&mut ctx, self.executor.as_ref())
                .map(|()| ctx.boundary_crossings())
        };
        let boundary_crossings = match outcome {
            Ok(crossings) => crossings,
            Err(reason) => {
                let name = self.agent_update.name().to_string();
                return Err(self.rollback(name, reason));
            }
        };
        kernel_us.push((
            self.agent_update.name().to_string(),
            pass_start.elapsed().as_micros() as u64,
        ));
        if let Some(index) = self.staged_agents.iter().position(|a| !a.is_finite()) {
            let name = self.agent_update.name().to_string();
            return Err(self.rollback(
                name,
                KernelError::NonFinite {
                    buffer: "agents",
                    index,
                },
            ));
        }

        // 4. Stage the field and fold in deposits.
        let (_, staged) = self.field.stage();
        let deposited = self.deposits.drain_into(staged);

        // 5, 6. Separable blur: staged -> scratch -> staged.
        let [horizontal, vertical] = &self.diffuse;
        let pass_start = Instant::now();
        let outcome = {
            let mut ctx = KernelContext::new(staged, timing, next_tick)
                .with_target(&mut self.scratch)
                .with_edge(edge);
            horizontal.dispatch(&mut ctx, self.executor.as_ref())
        };
        if let Err(reason) = outcome {
            let name = horizontal.name().to_string();
            return Err(self.rollback(name, reason));
        }
        kernel_us.push((
            horizontal.name().to_string(),
            pass_start.elapsed().as_micros() as u64,
        ));

        let pass_start = Instant::now();
        let outcome = {
            let mut ctx = KernelContext::new(&self.scratch, timing, next_tick)
                .with_target(staged)
                .with_edge(edge);
            vertical.dispatch(&mut ctx, self.executor.as_ref())
        };
        if let Err(reason) = outcome {
            let name = vertical.name().to_string();
            return Err(self.rollback(name, reason));
        }
        kernel_us.push((
            vertical.name().to_string(),
            pass_start.elapsed().as_micros() as u64,
        ));

        // 7. Trail must stay finite.
        if let Some(index) = staged.first_non_finite() {
            let name = vertical.name().to_string();
            return Err(self.rollback(
                name,
                KernelError::NonFinite {
                    buffer: "trail",
                    index,
                },
            ));
        }

        // 8. Publish.
        self.field.commit();
        std::mem::swap(&mut self.agents, &mut self.staged_agents);
        self.current_tick = next_tick;

        let metrics = StepMetrics {
            total_us: tick_start.elapsed().as_micros() as u64,
            kernel_us,
            settings_edits: remaps.len() as u32,
            boundary_crossings,
            deposited,
            timing_sanitized,
            rollback_events: self.rollback_events,
        };
        debug!(
            tick = next_tick.0,
            total_us = metrics.total_us,
            deposited = metrics.deposited,
            crossings = metrics.boundary_crossings,
            "tick committed"
        );
        self.last_metrics = metrics.clone();
        Ok(StepResult {
            tick: next_tick,
            remaps,
            metrics,
        })
    }

    /// Abandon the staged tick and build the error.
    fn rollback(&mut self, name: String, reason: KernelError) -> StepError {
        self.deposits.clear();
        self.rollback_events += 1;
        warn!(
            tick = self.current_tick.next().0,
            kernel = %name,
            error = %reason,
            "tick rolled back"
        );
        StepError::KernelFailed { name, reason }
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Apply a settings edit now, rescaling every species into the new
    /// ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for inverted or non-finite ranges, or a
    /// `sensor_size` range wider than [`SimConfig::max_sensor_size`];
    /// nothing changes in that case.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<RemapReport, ConfigError> {
        let limit = self.config.max_sensor_size();
        check_sensor_size(&settings, limit)?;
        let report = self.remapper.apply(&mut self.species, settings.clone())?;
        self.species.clamp_sensor_size(limit);
        self.settings = settings;
        for warning in &report.warnings {
            warn!(%warning, "settings remap recovered");
        }
        trace!(changed = ?report.changed, species = report.species, "settings applied");
        Ok(report)
    }

    /// Handle for queuing settings edits from other threads. Edits apply at
    /// the start of the next step.
    pub fn settings_sender(&self) -> SettingsSender {
        self.inbox.sender()
    }

    fn drain_inbox(&mut self) -> Vec<RemapReport> {
        let mut reports = Vec::new();
        for settings in self.inbox.drain() {
            match self.apply_settings(settings) {
                Ok(report) => reports.push(report),
                Err(error) => warn!(%error, "queued settings edit rejected"),
            }
        }
        reports
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Return to the configured initial state: empty field, freshly
    /// generated species from the configured settings, respawned agents,
    /// tick zero. Pending inbox edits are kept.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        let species = SpeciesTable::generate(
            self.config.num_species,
            &self.config.settings,
            self.config.seed,
        )?;
        self.species = species;
        self.settings = self.config.settings.clone();
        self.remapper = Remapper::with_baseline(self.config.settings.clone());
        self.field.reset();
        self.scratch.fill(0.0);
        self.deposits.clear();
        self.agents = spawn_agents(&self.config);
        self.staged_agents.clone_from(&self.agents);
        self.current_tick = TickId::default();
        self.last_metrics = StepMetrics::default();
        info!(tick = 0, "simulation reset");
        Ok(())
    }

    /// Replace the published agents, e.g. with a custom spawn.
    ///
    /// # Errors
    ///
    /// Rejects an empty list, unknown species, and positions or headings
    /// that are non-finite or outside the field. The current agents are
    /// kept in that case.
    pub fn set_agents(&mut self, agents: Vec<Agent>) -> Result<(), ConfigError> {
        if agents.is_empty() {
            return Err(ConfigError::ZeroAgents);
        }
        let extent = self.field.resolution() as f32;
        let species = self.species.len();
        for (i, agent) in agents.iter().enumerate() {
            let p = agent.position;
            let inside = (0.0..extent).contains(&p.x) && (0.0..extent).contains(&p.y);
            if !agent.is_finite() || !inside {
                return Err(ConfigError::InvalidParameter {
                    reason: format!("agent {i} at {p} heading {} is outside the field", agent.heading),
                });
            }
            if agent.species as usize >= species {
                return Err(ConfigError::InvalidParameter {
                    reason: format!("agent {i} references species {} of {species}", agent.species),
                });
            }
        }
        check_deposit(self.config.deposit.amount, agents.len())
            .map_err(|reason| ConfigError::InvalidParameter { reason })?;
        self.staged_agents.clone_from(&agents);
        self.agents = agents;
        debug!(agents = self.agents.len(), "agents replaced");
        Ok(())
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// The published trail field.
    pub fn trail(&self) -> &TrailGrid {
        self.field.current()
    }

    /// The published agents.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Published agents as raw bytes, for upload to a renderer.
    pub fn agent_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.agents)
    }

    /// The species table.
    pub fn species(&self) -> &SpeciesTable {
        &self.species
    }

    /// The settings the species table currently reflects.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The construction-time configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Field side length in cells.
    pub fn resolution(&self) -> u32 {
        self.field.resolution()
    }

    /// The last published tick.
    pub fn current_tick(&self) -> TickId {
        self.current_tick
    }

    /// Metrics from the most recent successful step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Cumulative number of rolled-back steps.
    pub fn rollback_events(&self) -> u64 {
        self.rollback_events
    }

    /// Name of the executor running the kernels.
    pub fn executor_name(&self) -> &str {
        self.executor.name()
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("resolution", &self.field.resolution())
            .field("agents", &self.agents.len())
            .field("species", &self.species.len())
            .field("tick", &self.current_tick)
            .field("executor", &self.executor.name())
            .finish_non_exhaustive()
    }
}
