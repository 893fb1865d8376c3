//! Headless run: step the reference profile, edit settings mid-run from a
//! second thread, and log what happens.
//!
//! ```text
//! RUST_LOG=info cargo run -p slime-bench --example headless
//! ```

use std::time::Duration;

use slime_bench::reference_profile;
use slime_core::{Attribute, AttributeRange, FrameTiming};
use slime_engine::Simulation;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut sim = match Simulation::new(reference_profile(42)) {
        Ok(sim) => sim,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let sender = sim.settings_sender();
    let base = sim.settings().clone();
    let editor = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        let faster = base
            .clone()
            .with_range(Attribute::MoveSpeed, AttributeRange::new(60.0, 120.0));
        if let Err(e) = sender.send(faster) {
            error!(error = %e, "settings edit not delivered");
        }
        std::thread::sleep(Duration::from_millis(50));
        let pinned = base.with_range(Attribute::SensorAngle, AttributeRange::point(0.4));
        if let Err(e) = sender.send(pinned) {
            error!(error = %e, "settings edit not delivered");
        }
    });

    for n in 0..300u64 {
        match sim.step(FrameTiming::fixed(1.0 / 60.0, n)) {
            Ok(result) => {
                for report in &result.remaps {
                    info!(tick = result.tick.0, changed = ?report.changed, "settings edit applied");
                }
                if n % 60 == 0 {
                    let trail = sim.trail();
                    info!(
                        tick = result.tick.0,
                        total_us = result.metrics.total_us,
                        trail_total = trail.total(),
                        trail_max = trail.max(),
                        crossings = result.metrics.boundary_crossings,
                        "progress"
                    );
                }
            }
            Err(e) => error!(error = %e, "step failed"),
        }
    }

    if editor.join().is_err() {
        error!("settings editor thread panicked");
    }

    for species in sim.species().as_slice() {
        info!(
            species = species.index,
            move_speed = species.move_speed,
            sensor_angle = species.sensor_angle,
            color = ?species.color,
            "final species"
        );
    }
}
