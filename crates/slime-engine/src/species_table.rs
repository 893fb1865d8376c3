//! Species generation and storage.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use slime_core::{Attribute, ConfigError, Settings, Species, SpeciesId};

/// Generate `num_species` rows with evenly spaced hues and every attribute
/// drawn uniformly from its range in `settings`.
///
/// Species `i` gets hue `i / num_species`, full saturation and value, and
/// the channel-wise inverse as its secondary colour. Draws come from a
/// ChaCha8 stream seeded with `seed`, so the same inputs produce the same
/// table.
pub fn generate(
    num_species: u32,
    settings: &Settings,
    seed: u64,
) -> Result<Vec<Species>, ConfigError> {
    if num_species == 0 {
        return Err(ConfigError::ZeroSpecies);
    }
    settings.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let rows = (0..num_species)
        .map(|index| {
            let mut species = Species::with_colors(index, num_species);
            for attribute in Attribute::ALL {
                let t: f32 = rng.random();
                species.set(attribute, settings.range(attribute).lerp(t));
            }
            species
        })
        .collect();
    Ok(rows)
}

/// The species table: one [`Species`] row per id, indexed by position.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesTable {
    rows: Vec<Species>,
}

impl SpeciesTable {
    /// Build a table with [`generate`].
    pub fn generate(num_species: u32, settings: &Settings, seed: u64) -> Result<Self, ConfigError> {
        generate(num_species, settings, seed).map(|rows| Self { rows })
    }

    /// Wrap existing rows. Row `i` must carry index `i`.
    pub fn from_rows(rows: Vec<Species>) -> Result<Self, ConfigError> {
        if rows.is_empty() {
            return Err(ConfigError::ZeroSpecies);
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(i, row)| row.index as usize != *i)
        {
            return Err(ConfigError::InvalidParameter {
                reason: format!("row {i} carries species index {}", row.index),
            });
        }
        Ok(Self { rows })
    }

    /// Number of species.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for `id`, if present.
    pub fn get(&self, id: SpeciesId) -> Option<&Species> {
        self.rows.get(id.index())
    }

    /// All rows in id order.
    pub fn as_slice(&self) -> &[Species] {
        &self.rows
    }

    /// Rows as raw bytes, for upload to a renderer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.rows)
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Species] {
        &mut self.rows
    }

    /// Cap every row's `sensor_size` at `limit`.
    pub(crate) fn clamp_sensor_size(&mut self, limit: u32) {
        for row in &mut self.rows {
            row.sensor_size = row.sensor_size.min(limit);
        }
    }
}
