//! Masking of non-physical values and derivation of colour-scale bounds.

use tracing::warn;

use crate::grid::GridField;

/// A rule that blanks or clamps cells of a field.
///
/// Every rule is idempotent: applying it twice gives the same field as
/// applying it once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaskRule {
    /// Values `<= 0` become missing.
    Positive,
    /// Values outside `[lower, upper]` become missing.
    Bounds { lower: f32, upper: f32 },
    /// Values outside `[lower, upper]` are clamped to the nearest bound.
    Clip { lower: f32, upper: f32 },
    /// Cells north of `lat` and east of `lon` become missing.
    ///
    /// Used to blank out an enclosed basin (e.g. the Black Sea) that sits in
    /// the north-east corner of the domain.
    Region { lat: f64, lon: f64 },
}

impl MaskRule {
    pub fn apply(&self, field: &GridField) -> GridField {
        match *self {
            MaskRule::Positive => field.map_cells(|_, _, v| if v > 0.0 { v } else { f32::NAN }),
            MaskRule::Bounds { lower, upper } => field.map_cells(|_, _, v| {
                if v >= lower && v <= upper {
                    v
                } else {
                    f32::NAN
                }
            }),
            MaskRule::Clip { lower, upper } => {
                field.map_cells(|_, _, v| if v.is_nan() { v } else { v.clamp(lower, upper) })
            }
            MaskRule::Region { lat, lon } => field.map_cells(|cell_lat, cell_lon, v| {
                if cell_lat > lat && cell_lon > lon {
                    f32::NAN
                } else {
                    v
                }
            }),
        }
    }
}

/// Apply rules in order.
pub fn apply_rules(field: &GridField, rules: &[MaskRule]) -> GridField {
    rules
        .iter()
        .fold(field.clone(), |acc, rule| rule.apply(&acc))
}

/// Min/max over the valid cells of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub min: f32,
    pub max: f32,
    pub valid: usize,
    pub total: usize,
}

impl FieldStats {
    /// `None` when every cell is missing.
    pub fn compute(field: &GridField) -> Option<Self> {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut valid = 0usize;

        for &v in field.values() {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
                valid += 1;
            }
        }

        (valid > 0).then_some(Self {
            min,
            max,
            valid,
            total: field.values().len(),
        })
    }
}

/// Where the bounds of an [`EffectiveRange`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSource {
    /// Configured static bounds.
    Static,
    /// Recomputed from the masked field.
    Adaptive,
    /// Adaptive mode, but the field had a single distinct value.
    Degenerate,
    /// Adaptive mode, but every cell was missing.
    EmptyField,
}

/// Bounds used for one frame's colour scale, kept separate from the
/// configured bounds so later frames always start from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveRange {
    /// Reported minimum (NaN for an empty field).
    pub min: f32,
    /// Reported maximum (NaN for an empty field).
    pub max: f32,
    pub configured_min: f32,
    pub configured_max: f32,
    pub source: RangeSource,
}

impl EffectiveRange {
    /// Bounds the colour scale and ticks should use.
    ///
    /// Only a usable adaptive range replaces the configured bounds.
    pub fn scale_bounds(&self) -> (f32, f32) {
        match self.source {
            RangeSource::Adaptive => (self.min, self.max),
            _ => (self.configured_min, self.configured_max),
        }
    }

    /// True when the field had no valid cells at all.
    pub fn is_empty(&self) -> bool {
        self.source == RangeSource::EmptyField
    }
}

/// Derive the effective bounds for a masked field.
pub fn effective_range(
    field: &GridField,
    configured_min: f32,
    configured_max: f32,
    adaptive: bool,
) -> EffectiveRange {
    let base = EffectiveRange {
        min: configured_min,
        max: configured_max,
        configured_min,
        configured_max,
        source: RangeSource::Static,
    };

    if !adaptive {
        return base;
    }

    match FieldStats::compute(field) {
        None => {
            warn!(
                cells = field.values().len(),
                "Masked field has no valid cells, adaptive range undefined"
            );
            EffectiveRange {
                min: f32::NAN,
                max: f32::NAN,
                source: RangeSource::EmptyField,
                ..base
            }
        }
        Some(stats) if stats.min >= stats.max => EffectiveRange {
            min: stats.min,
            max: stats.max,
            source: RangeSource::Degenerate,
            ..base
        },
        Some(stats) => EffectiveRange {
            min: stats.min,
            max: stats.max,
            source: RangeSource::Adaptive,
            ..base
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn field(values: Vec<f32>) -> GridField {
        let lats: Arc<[f64]> = vec![40.0, 45.0].into();
        let lons: Arc<[f64]> = vec![20.0, 30.0, 40.0].into();
        GridField::new(lats, lons, values).unwrap()
    }

    #[test]
    fn test_positive_mask() {
        let masked = MaskRule::Positive.apply(&field(vec![1.0, 0.0, -2.0, 3.0, f32::NAN, 5.0]));
        assert_eq!(masked.valid_count(), 3);
        assert!(masked.values()[1].is_nan());
    }

    #[test]
    fn test_clip_keeps_missing() {
        let rule = MaskRule::Clip { lower: -1.0, upper: 1.0 };
        let clipped = rule.apply(&field(vec![-3.0, 0.5, 2.0, f32::NAN, 1.0, -1.0]));
        assert_eq!(clipped.values()[0], -1.0);
        assert_eq!(clipped.values()[2], 1.0);
        assert!(clipped.values()[3].is_nan());
    }

    #[test]
    fn test_region_mask_requires_both_thresholds() {
        let rule = MaskRule::Region { lat: 42.0, lon: 27.0 };
        let masked = rule.apply(&field(vec![1.0; 6]));
        // Row 0 is south of the threshold; in row 1 only lon 30 and 40 are east.
        assert_eq!(masked.valid_count(), 4);
        assert!(masked.get(1, 1).is_nan());
        assert!(masked.get(1, 2).is_nan());
        assert!(!masked.get(1, 0).is_nan());
    }

    #[test]
    fn test_effective_range_static_when_not_adaptive() {
        let range = effective_range(&field(vec![1.0; 6]), 10.0, 40.0, false);
        assert_eq!(range.source, RangeSource::Static);
        assert_eq!(range.scale_bounds(), (10.0, 40.0));
    }

    #[test]
    fn test_effective_range_empty_field() {
        let range = effective_range(&field(vec![f32::NAN; 6]), 10.0, 40.0, true);
        assert!(range.is_empty());
        assert!(range.min.is_nan());
        assert_eq!(range.scale_bounds(), (10.0, 40.0));
    }
}
