//! Live rescaling of species attributes when settings ranges change.
//!
//! Each species keeps its relative position within every range: a value at
//! 30% of the old range lands at 30% of the new one. Colours and indices
//! are never touched, so a remap is visible only in behaviour.
//!
//! Recovered conditions come back as [`RemapWarning`]s in the report rather
//! than as errors:
//!
//! - a degenerate old range (`min == max`) maps every value to the new
//!   minimum;
//! - a remapper with no baseline adopts the incoming settings without
//!   touching any species.

use slime_core::{Attribute, AttributeRange, ConfigError, RemapWarning, Settings, Species};

use crate::species_table::SpeciesTable;

/// Map `value` from `old` into `new`, preserving its relative position.
///
/// A degenerate `old` range gives `t = 0`. A non-finite result collapses
/// to `new.min`, so the output is always finite for finite ranges.
pub fn remap_value(value: f32, old: AttributeRange, new: AttributeRange) -> f32 {
    let t = old.relative(value).unwrap_or(0.0);
    let out = new.lerp(t);
    if out.is_finite() {
        out
    } else {
        new.min
    }
}

/// Rescale every attribute whose range differs between `old` and `new`.
///
/// Returns the attributes that were rescaled and one
/// [`RemapWarning::DegenerateRange`] per rescaled attribute whose old range
/// had zero width.
pub fn remap_species(
    species: &mut [Species],
    old: &Settings,
    new: &Settings,
) -> (Vec<Attribute>, Vec<RemapWarning>) {
    let mut changed = Vec::new();
    let mut warnings = Vec::new();
    for attribute in old.changed_attributes(new) {
        let (from, to) = (old.range(attribute), new.range(attribute));
        if from.is_degenerate() {
            warnings.push(RemapWarning::DegenerateRange { attribute });
        }
        for row in species.iter_mut() {
            let value = remap_value(row.get(attribute), from, to);
            row.set(attribute, value);
        }
        changed.push(attribute);
    }
    (changed, warnings)
}

/// What one settings edit did to the species table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemapReport {
    /// Number of species rows visited.
    pub species: usize,
    /// Attributes whose range changed and were rescaled.
    pub changed: Vec<Attribute>,
    /// Recovered conditions encountered along the way.
    pub warnings: Vec<RemapWarning>,
}

impl RemapReport {
    /// True when the edit changed no range.
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Tracks the settings species were last generated or remapped against.
#[derive(Clone, Debug, Default)]
pub struct Remapper {
    baseline: Option<Settings>,
}

impl Remapper {
    /// A remapper with no baseline. Its first [`apply`](Self::apply)
    /// reports [`RemapWarning::StaleRemap`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A remapper whose baseline is the settings the table was generated
    /// from.
    pub fn with_baseline(settings: Settings) -> Self {
        Self {
            baseline: Some(settings),
        }
    }

    /// The settings the table currently reflects.
    pub fn baseline(&self) -> Option<&Settings> {
        self.baseline.as_ref()
    }

    /// Rescale `table` from the baseline into `incoming`, then adopt
    /// `incoming` as the new baseline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `incoming` has an inverted or non-finite
    /// range. The table and baseline are untouched in that case.
    pub fn apply(
        &mut self,
        table: &mut SpeciesTable,
        incoming: Settings,
    ) -> Result<RemapReport, ConfigError> {
        incoming.validate()?;
        let species = table.len();
        let report = match self.baseline.as_ref() {
            None => RemapReport {
                species,
                changed: Vec::new(),
                warnings: vec![RemapWarning::StaleRemap],
            },
            Some(old) => {
                let (changed, warnings) = remap_species(table.rows_mut(), old, &incoming);
                RemapReport {
                    species,
                    changed,
                    warnings,
                }
            }
        };
        self.baseline = Some(incoming);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table(settings: &Settings) -> SpeciesTable {
        SpeciesTable::generate(6, settings, 17).unwrap()
    }

    #[test]
    fn value_keeps_relative_position() {
        let v = remap_value(
            3.0,
            AttributeRange::new(2.0, 6.0),
            AttributeRange::new(10.0, 50.0),
        );
        assert_eq!(v, 20.0);
    }

    #[test]
    fn degenerate_old_range_maps_to_new_min() {
        let v = remap_value(5.0, AttributeRange::point(5.0), AttributeRange::new(1.0, 9.0));
        assert_eq!(v, 1.0);
        assert!(v.is_finite());
    }

    #[test]
    fn overflow_collapses_to_new_min() {
        let v = remap_value(
            f32::MAX,
            AttributeRange::new(0.0, 1.0),
            AttributeRange::new(-1.0, f32::MAX),
        );
        assert_eq!(v, -1.0);
    }

    #[test]
    fn identity_edit_is_noop() {
        let settings = Settings::default();
        let mut t = table(&settings);
        let before = t.clone();
        let mut remapper = Remapper::with_baseline(settings.clone());
        let report = remapper.apply(&mut t, settings).unwrap();
        assert!(report.is_noop());
        assert!(report.warnings.is_empty());
        assert_eq!(t, before);
    }

    #[test]
    fn only_changed_attributes_move() {
        let settings = Settings::default();
        let mut t = table(&settings);
        let before = t.clone();
        let edited = settings
            .clone()
            .with_range(Attribute::MoveSpeed, AttributeRange::new(100.0, 200.0));
        let report = Remapper::with_baseline(settings)
            .apply(&mut t, edited)
            .unwrap();
        assert_eq!(report.changed, vec![Attribute::MoveSpeed]);
        assert_eq!(report.species, 6);
        for (a, b) in before.as_slice().iter().zip(t.as_slice()) {
            assert!(b.move_speed >= 100.0 && b.move_speed <= 200.0);
            assert_eq!(a.sensor_distance, b.sensor_distance);
            assert_eq!(a.color, b.color);
            assert_eq!(a.inverse_color, b.inverse_color);
            assert_eq!(a.index, b.index);
        }
    }

    #[test]
    fn degenerate_range_warns() {
        let settings =
            Settings::default().with_range(Attribute::TurnSpeed, AttributeRange::point(4.0));
        let mut t = table(&settings);
        let edited = settings
            .clone()
            .with_range(Attribute::TurnSpeed, AttributeRange::new(1.0, 3.0));
        let report = Remapper::with_baseline(settings)
            .apply(&mut t, edited)
            .unwrap();
        assert_eq!(
            report.warnings,
            vec![RemapWarning::DegenerateRange {
                attribute: Attribute::TurnSpeed
            }]
        );
        assert!(t.as_slice().iter().all(|s| s.turn_speed == 1.0));
    }

    #[test]
    fn missing_baseline_is_stale() {
        let settings = Settings::default();
        let mut t = table(&settings);
        let before = t.clone();
        let mut remapper = Remapper::new();
        let edited = settings.with_range(Attribute::MoveSpeed, AttributeRange::new(0.0, 1.0));
        let report = remapper.apply(&mut t, edited.clone()).unwrap();
        assert_eq!(report.warnings, vec![RemapWarning::StaleRemap]);
        assert_eq!(t, before);
        assert_eq!(remapper.baseline(), Some(&edited));
    }

    #[test]
    fn invalid_edit_leaves_state_alone() {
        let settings = Settings::default();
        let mut t = table(&settings);
        let before = t.clone();
        let mut remapper = Remapper::with_baseline(settings.clone());
        let bad = settings
            .clone()
            .with_range(Attribute::SensorAngle, AttributeRange::new(1.0, 0.0));
        assert!(remapper.apply(&mut t, bad).is_err());
        assert_eq!(t, before);
        assert_eq!(remapper.baseline(), Some(&settings));
    }

    #[test]
    fn sensor_size_is_floored() {
        let settings =
            Settings::default().with_range(Attribute::SensorSize, AttributeRange::new(0.0, 4.0));
        let mut t = table(&settings);
        let edited = settings
            .clone()
            .with_range(Attribute::SensorSize, AttributeRange::new(0.0, 2.5));
        Remapper::with_baseline(settings)
            .apply(&mut t, edited)
            .unwrap();
        assert!(t.as_slice().iter().all(|s| s.sensor_size <= 2));
    }

    fn range() -> impl Strategy<Value = AttributeRange> {
        (-100.0f32..100.0, 0.5f32..100.0).prop_map(|(min, span)| AttributeRange::new(min, min + span))
    }

    proptest! {
        #[test]
        fn remap_round_trip(value_t in 0.0f32..=1.0, a in range(), b in range()) {
            let value = a.lerp(value_t);
            let there = remap_value(value, a, b);
            let back = remap_value(there, b, a);
            let tolerance = 1e-3 * (1.0 + value.abs().max(a.span()));
            prop_assert!((back - value).abs() <= tolerance, "{value} -> {there} -> {back}");
        }

        #[test]
        fn remap_identity(value in -500.0f32..500.0, a in range()) {
            let out = remap_value(value, a, a);
            let tolerance = 1e-4 * (1.0 + value.abs() + a.min.abs());
            prop_assert!((out - value).abs() <= tolerance);
        }

        #[test]
        fn remap_is_finite(value in any::<f32>(), a in range(), b in range()) {
            prop_assume!(value.is_finite());
            prop_assert!(remap_value(value, a, b).is_finite());
        }
    }
}
