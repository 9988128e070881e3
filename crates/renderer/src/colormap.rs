//! Continuous colour maps sampled on the unit interval.
//!
//! Provides a handful of well-known named maps (with `_r` reversal) and two
//! derived forms: a map truncated to a sub-range of another, and a map that
//! reserves its lowest fraction for white.

use crate::color::Color;
use crate::error::{RenderError, RenderResult};

/// Per-channel breakpoints `(x, value)` for red, green and blue.
type ChannelTable = [&'static [(f32, f32)]; 3];

/// A colour map from `[0, 1]` to opaque colours.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorMap {
    /// Piecewise-linear interpolation between colour stops.
    Linear {
        name: String,
        stops: Vec<(f32, Color)>,
    },
    /// Independent piecewise-linear red, green and blue channels.
    Segmented {
        name: &'static str,
        channels: ChannelTable,
    },
    /// Closed-form map.
    Function {
        name: &'static str,
        f: fn(f32) -> [f32; 3],
    },
    /// `base(1 - x)`.
    Reversed(Box<ColorMap>),
    /// White below `fraction`, otherwise `base((x - fraction) / (1 - fraction))`.
    WhiteReserved { base: Box<ColorMap>, fraction: f32 },
}

/// Names accepted by [`ColorMap::named`] (each also with an `_r` suffix).
pub const NAMED_MAPS: [&str; 10] = [
    "gist_rainbow",
    "jet",
    "rainbow",
    "viridis",
    "Reds",
    "Blues",
    "Greens",
    "coolwarm",
    "RdBu",
    "seismic",
];

const JET: ChannelTable = [
    &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)],
    &[(0.0, 0.0), (0.125, 0.0), (0.375, 1.0), (0.64, 1.0), (0.91, 0.0), (1.0, 0.0)],
    &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)],
];

const GIST_RAINBOW: [(f32, [f32; 3]); 8] = [
    (0.000, [1.00, 0.00, 0.16]),
    (0.030, [1.00, 0.00, 0.00]),
    (0.215, [1.00, 1.00, 0.00]),
    (0.400, [0.00, 1.00, 0.00]),
    (0.586, [0.00, 1.00, 1.00]),
    (0.770, [0.00, 0.00, 1.00]),
    (0.954, [1.00, 0.00, 1.00]),
    (1.000, [1.00, 0.00, 0.75]),
];

const SEISMIC: [(f32, [f32; 3]); 5] = [
    (0.00, [0.0, 0.0, 0.3]),
    (0.25, [0.0, 0.0, 1.0]),
    (0.50, [1.0, 1.0, 1.0]),
    (0.75, [1.0, 0.0, 0.0]),
    (1.00, [0.5, 0.0, 0.0]),
];

const VIRIDIS: [&str; 9] = [
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#fde725",
];
const REDS: [&str; 9] = [
    "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d", "#a50f15",
    "#67000d",
];
const BLUES: [&str; 9] = [
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
    "#08306b",
];
const GREENS: [&str; 9] = [
    "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45", "#006d2c",
    "#00441b",
];
const RDBU: [&str; 11] = [
    "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0", "#92c5de",
    "#4393c3", "#2166ac", "#053061",
];
const COOLWARM: [&str; 5] = ["#3b4cc0", "#7b9ff9", "#dddddd", "#f49a7b", "#b40426"];

fn rainbow(x: f32) -> [f32; 3] {
    [
        (2.0 * x - 0.5).abs(),
        (x * std::f32::consts::PI).sin(),
        (x * std::f32::consts::FRAC_PI_2).cos(),
    ]
}

impl ColorMap {
    /// Look up a named map. A trailing `_r` reverses it.
    pub fn named(name: &str) -> RenderResult<Self> {
        if let Some(base) = name.strip_suffix("_r") {
            return Ok(ColorMap::Reversed(Box::new(Self::named(base)?)));
        }

        let map = match name {
            "jet" => ColorMap::Segmented {
                name: "jet",
                channels: JET,
            },
            "rainbow" => ColorMap::Function {
                name: "rainbow",
                f: rainbow,
            },
            "gist_rainbow" => positioned("gist_rainbow", &GIST_RAINBOW),
            "seismic" => positioned("seismic", &SEISMIC),
            "viridis" => from_hex_list("viridis", &VIRIDIS),
            "Reds" => from_hex_list("Reds", &REDS),
            "Blues" => from_hex_list("Blues", &BLUES),
            "Greens" => from_hex_list("Greens", &GREENS),
            "RdBu" => from_hex_list("RdBu", &RDBU),
            "coolwarm" => from_hex_list("coolwarm", &COOLWARM),
            other => return Err(RenderError::UnknownColorMap(other.to_string())),
        };
        Ok(map)
    }

    /// Sample `base` at `samples` evenly spaced points in `[start, end]` and
    /// interpolate linearly between them.
    pub fn truncated(base: &ColorMap, start: f32, end: f32, samples: usize) -> RenderResult<Self> {
        if samples < 2 {
            return Err(RenderError::InvalidScale(format!(
                "truncated colour map needs at least 2 samples, got {}",
                samples
            )));
        }
        if !(0.0..=1.0).contains(&start) || !(0.0..=1.0).contains(&end) || start >= end {
            return Err(RenderError::InvalidScale(format!(
                "truncation range [{}, {}] must lie within [0, 1] with start < end",
                start, end
            )));
        }

        let last = (samples - 1) as f32;
        let stops = (0..samples)
            .map(|i| {
                let t = i as f32 / last;
                (t, base.sample(start + (end - start) * t))
            })
            .collect();

        Ok(ColorMap::Linear {
            name: format!("{}[{}:{}]", base.name(), start, end),
            stops,
        })
    }

    /// Reserve the lowest `fraction` of the map for white.
    pub fn white_reserved(base: ColorMap, fraction: f32) -> RenderResult<Self> {
        if !(0.0..1.0).contains(&fraction) {
            return Err(RenderError::InvalidScale(format!(
                "white fraction must be in [0, 1), got {}",
                fraction
            )));
        }
        Ok(ColorMap::WhiteReserved {
            base: Box::new(base),
            fraction,
        })
    }

    pub fn name(&self) -> String {
        match self {
            ColorMap::Linear { name, .. } => name.clone(),
            ColorMap::Segmented { name, .. } | ColorMap::Function { name, .. } => name.to_string(),
            ColorMap::Reversed(base) => format!("{}_r", base.name()),
            ColorMap::WhiteReserved { base, fraction } => {
                format!("{}+white{}", base.name(), fraction)
            }
        }
    }

    /// Colour at `x`; values outside `[0, 1]` are clamped.
    pub fn sample(&self, x: f32) -> Color {
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        match self {
            ColorMap::Linear { stops, .. } => interpolate_stops(stops, x),
            ColorMap::Segmented { channels, .. } => Color::from_unit([
                interpolate_channel(channels[0], x),
                interpolate_channel(channels[1], x),
                interpolate_channel(channels[2], x),
            ]),
            ColorMap::Function { f, .. } => Color::from_unit(f(x)),
            ColorMap::Reversed(base) => base.sample(1.0 - x),
            ColorMap::WhiteReserved { base, fraction } => {
                if x < *fraction {
                    Color::WHITE
                } else {
                    base.sample((x - fraction) / (1.0 - fraction))
                }
            }
        }
    }
}

fn positioned(name: &str, table: &[(f32, [f32; 3])]) -> ColorMap {
    ColorMap::Linear {
        name: name.to_string(),
        stops: table.iter().map(|&(x, rgb)| (x, Color::from_unit(rgb))).collect(),
    }
}

fn from_hex_list(name: &str, hex: &[&str]) -> ColorMap {
    let last = (hex.len() - 1).max(1) as f32;
    let stops = hex
        .iter()
        .enumerate()
        .filter_map(|(i, h)| Color::from_hex(h).map(|c| (i as f32 / last, c)))
        .collect();
    ColorMap::Linear {
        name: name.to_string(),
        stops,
    }
}

fn interpolate_stops(stops: &[(f32, Color)], x: f32) -> Color {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Color::TRANSPARENT;
    };
    if x <= first.0 {
        return first.1;
    }
    if x >= last.0 {
        return last.1;
    }

    // First stop strictly past x; the guards above keep it in 1..len.
    let upper = stops.partition_point(|(pos, _)| *pos <= x);
    let (x0, c0) = stops[upper - 1];
    let (x1, c1) = stops[upper];
    if x1 <= x0 {
        return c1;
    }
    c0.lerp(c1, (x - x0) / (x1 - x0))
}

fn interpolate_channel(table: &[(f32, f32)], x: f32) -> f32 {
    let (Some(first), Some(last)) = (table.first(), table.last()) else {
        return 0.0;
    };
    if x <= first.0 {
        return first.1;
    }
    if x >= last.0 {
        return last.1;
    }
    let upper = table.partition_point(|(pos, _)| *pos <= x);
    let (x0, y0) = table[upper - 1];
    let (x1, y1) = table[upper];
    if x1 <= x0 {
        return y1;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_named_maps_resolve() {
        for name in NAMED_MAPS {
            assert!(ColorMap::named(name).is_ok(), "{}", name);
            assert!(ColorMap::named(&format!("{}_r", name)).is_ok(), "{}_r", name);
        }
        assert!(matches!(
            ColorMap::named("nonexistent"),
            Err(RenderError::UnknownColorMap(_))
        ));
    }

    #[test]
    fn test_jet_endpoints() {
        let jet = ColorMap::named("jet").unwrap();
        assert_eq!(jet.sample(0.0), Color::rgb(0, 0, 128));
        assert_eq!(jet.sample(1.0), Color::rgb(128, 0, 0));
    }

    #[test]
    fn test_reversed() {
        let reds = ColorMap::named("Reds").unwrap();
        let reds_r = ColorMap::named("Reds_r").unwrap();
        assert_eq!(reds.sample(0.0), reds_r.sample(1.0));
        assert_eq!(reds.sample(0.3), reds_r.sample(0.7));
        assert_eq!(reds_r.name(), "Reds_r");
    }

    #[test]
    fn test_sample_clamps() {
        let viridis = ColorMap::named("viridis").unwrap();
        assert_eq!(viridis.sample(-1.0), viridis.sample(0.0));
        assert_eq!(viridis.sample(5.0), Color::from_hex("#fde725").unwrap());
    }

    #[test]
    fn test_truncated_endpoints() {
        let base = ColorMap::named("gist_rainbow").unwrap();
        let trunc = ColorMap::truncated(&base, 0.15, 1.0, 10).unwrap();
        assert_eq!(trunc.sample(0.0), base.sample(0.15));
        assert_eq!(trunc.sample(1.0), base.sample(1.0));
        assert!(ColorMap::truncated(&base, 0.5, 0.2, 10).is_err());
        assert!(ColorMap::truncated(&base, 0.0, 1.0, 1).is_err());
    }

    #[test]
    fn test_white_reserved() {
        let base = ColorMap::named("jet").unwrap();
        let map = ColorMap::white_reserved(base.clone(), 0.1).unwrap();
        assert_eq!(map.sample(0.0), Color::WHITE);
        assert_eq!(map.sample(0.05), Color::WHITE);
        assert_eq!(map.sample(0.1), base.sample(0.0));
        assert_eq!(map.sample(0.55), base.sample(0.5));
        assert_eq!(map.sample(1.0), base.sample(1.0));
        assert!(ColorMap::white_reserved(base, 1.0).is_err());
    }
}
