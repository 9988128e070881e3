//! Banded colour scales and colour-bar ticks.

use crate::color::Color;
use crate::colormap::ColorMap;
use crate::error::{RenderError, RenderResult};

/// Classification of a value against a [`ColorScale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Missing,
    Under,
    Over,
    Index(usize),
}

/// A colour map quantized into `levels` equal bands between `min` and `max`,
/// extended at both ends with under/over colours.
#[derive(Debug, Clone)]
pub struct ColorScale {
    cmap: ColorMap,
    min: f32,
    max: f32,
    boundaries: Vec<f32>,
    band_colors: Vec<Color>,
    under: Color,
    over: Color,
}

impl ColorScale {
    pub fn new(cmap: ColorMap, min: f32, max: f32, levels: usize) -> RenderResult<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(RenderError::InvalidScale(format!(
                "bounds must be finite with min < max, got [{}, {}]",
                min, max
            )));
        }
        if levels == 0 {
            return Err(RenderError::InvalidScale("levels must be at least 1".to_string()));
        }

        let step = (max - min) / levels as f32;
        let boundaries: Vec<f32> = (0..=levels)
            .map(|i| if i == levels { max } else { min + step * i as f32 })
            .collect();
        if boundaries.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RenderError::InvalidScale(format!(
                "{} levels over [{}, {}] do not give strictly increasing boundaries",
                levels, min, max
            )));
        }

        let band_colors = (0..levels)
            .map(|i| cmap.sample((i as f32 + 0.5) / levels as f32))
            .collect();
        let under = cmap.sample(0.0);
        let over = cmap.sample(1.0);

        Ok(Self {
            cmap,
            min,
            max,
            boundaries,
            band_colors,
            under,
            over,
        })
    }

    pub fn cmap(&self) -> &ColorMap {
        &self.cmap
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn levels(&self) -> usize {
        self.band_colors.len()
    }

    /// `levels + 1` strictly increasing band boundaries.
    pub fn boundaries(&self) -> &[f32] {
        &self.boundaries
    }

    pub fn band_colors(&self) -> &[Color] {
        &self.band_colors
    }

    pub fn under_color(&self) -> Color {
        self.under
    }

    pub fn over_color(&self) -> Color {
        self.over
    }

    /// Band of `value`: `floor((v - min) / (max - min) * levels)`, with `max`
    /// itself in the last band.
    pub fn band(&self, value: f32) -> Band {
        if value.is_nan() {
            return Band::Missing;
        }
        if value < self.min {
            return Band::Under;
        }
        if value > self.max {
            return Band::Over;
        }
        let levels = self.levels();
        let raw = ((value - self.min) / (self.max - self.min) * levels as f32).floor() as usize;
        Band::Index(raw.min(levels - 1))
    }

    /// Fill colour for a value, `None` when missing.
    pub fn color_for(&self, value: f32) -> Option<Color> {
        match self.band(value) {
            Band::Missing => None,
            Band::Under => Some(self.under),
            Band::Over => Some(self.over),
            Band::Index(i) => Some(self.band_colors[i]),
        }
    }

    /// Position of `value` on the scale, 0 at `min` and 1 at `max`.
    pub fn normalize(&self, value: f32) -> f32 {
        (value - self.min) / (self.max - self.min)
    }
}

/// A labelled colour-bar tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f32,
    pub label: String,
}

/// How colour-bar ticks are generated from the scale bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickSpec {
    /// `trunc(min) ..= trunc(max)` in steps of 1.
    Integers,
    /// `min, min + step, ...` up to `max`, with `decimals` digits.
    Step { step: f32, decimals: usize },
}

impl TickSpec {
    /// Ticks for the bounds, dropping any that fall outside `[min, max]`.
    pub fn ticks(&self, min: f32, max: f32) -> Vec<Tick> {
        if !min.is_finite() || !max.is_finite() || max < min {
            return Vec::new();
        }
        let tolerance = (max - min).abs() * 1e-4 + f32::EPSILON;
        let within = |v: f32| v >= min - tolerance && v <= max + tolerance;

        match *self {
            TickSpec::Integers => {
                let lo = min.trunc() as i64;
                let hi = max.trunc() as i64;
                (lo..=hi)
                    .map(|v| v as f32)
                    .filter(|&v| within(v))
                    .map(|v| Tick {
                        value: v,
                        label: format!("{}", v as i64),
                    })
                    .collect()
            }
            TickSpec::Step { step, decimals } => {
                if step <= 0.0 {
                    return Vec::new();
                }
                let count = ((max - min) / step + 1e-3).floor() as usize;
                (0..=count)
                    .map(|i| min + step * i as f32)
                    .filter(|&v| within(v))
                    .map(|v| Tick {
                        value: v,
                        label: format!("{:.*}", decimals, v),
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(min: f32, max: f32, levels: usize) -> ColorScale {
        ColorScale::new(ColorMap::named("viridis").unwrap(), min, max, levels).unwrap()
    }

    #[test]
    fn test_band_index() {
        let s = scale(10.0, 40.0, 30);
        assert_eq!(s.band(25.0), Band::Index(15));
        assert_eq!(s.band(10.0), Band::Index(0));
        assert_eq!(s.band(40.0), Band::Index(29));
        assert_eq!(s.band(9.9), Band::Under);
        assert_eq!(s.band(40.1), Band::Over);
        assert_eq!(s.band(f32::NAN), Band::Missing);
    }

    #[test]
    fn test_boundaries() {
        let s = scale(0.0, 1.0, 4);
        assert_eq!(s.boundaries(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(s.levels(), 4);
    }

    #[test]
    fn test_band_colors_at_centres() {
        let s = scale(0.0, 1.0, 4);
        let cmap = ColorMap::named("viridis").unwrap();
        assert_eq!(s.band_colors()[0], cmap.sample(0.125));
        assert_eq!(s.under_color(), cmap.sample(0.0));
        assert_eq!(s.over_color(), cmap.sample(1.0));
        assert_eq!(s.color_for(-5.0), Some(cmap.sample(0.0)));
        assert_eq!(s.color_for(f32::NAN), None);
    }

    #[test]
    fn test_invalid_scales() {
        let cmap = ColorMap::named("jet").unwrap();
        assert!(ColorScale::new(cmap.clone(), 1.0, 1.0, 10).is_err());
        assert!(ColorScale::new(cmap.clone(), 2.0, 1.0, 10).is_err());
        assert!(ColorScale::new(cmap.clone(), 0.0, 1.0, 0).is_err());
        assert!(ColorScale::new(cmap, f32::NAN, 1.0, 10).is_err());
    }

    #[test]
    fn test_integer_ticks() {
        let ticks = TickSpec::Integers.ticks(17.4, 21.9);
        let values: Vec<f32> = ticks.iter().map(|t| t.value).collect();
        // trunc(17.4) = 17 lies below the scale and is dropped
        assert_eq!(values, vec![18.0, 19.0, 20.0, 21.0]);
        assert_eq!(ticks[0].label, "18");
    }

    #[test]
    fn test_step_ticks() {
        let ticks = TickSpec::Step { step: 0.1, decimals: 1 }.ticks(0.0, 0.5);
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0.0", "0.1", "0.2", "0.3", "0.4", "0.5"]);
    }
}
