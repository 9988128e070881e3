//! Settings shared by both products: scales and figure output.

use std::path::PathBuf;

use crate::document::Section;
use crate::error::ConfigResult;

/// Colour scale parameters for one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSettings {
    pub color_map: String,
    pub min: f32,
    pub max: f32,
    pub levels: usize,
}

impl ScaleSettings {
    /// Read `<prefix>ColorMap`, `<prefix>MinValue`, `<prefix>MaxValue` and
    /// `<prefix>Levels`; an empty prefix reads `colorMap`, `minValue`, ...
    pub fn from_section(section: &Section<'_>, prefix: &str) -> ConfigResult<Self> {
        let key = |name: &str| {
            if prefix.is_empty() {
                let mut chars = name.chars();
                chars
                    .next()
                    .map(|c| c.to_lowercase().chain(chars).collect::<String>())
                    .unwrap_or_default()
            } else {
                format!("{}{}", prefix, name)
            }
        };

        let levels_key = key("Levels");
        let min_key = key("MinValue");
        let max_key = key("MaxValue");
        let settings = Self {
            color_map: section.get_str(&key("ColorMap"))?.to_string(),
            min: section.get(&min_key)?,
            max: section.get(&max_key)?,
            levels: section.get(&levels_key)?,
        };

        if settings.levels == 0 {
            return Err(section.invalid(&levels_key, "0", "at least one level is required"));
        }
        if !settings.min.is_finite() || !settings.max.is_finite() || settings.min >= settings.max {
            return Err(section.invalid(
                &max_key,
                &settings.max.to_string(),
                &format!("must be greater than {} = {}", min_key, settings.min),
            ));
        }
        Ok(settings)
    }
}

/// Figure size, resolution and font.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub dpi: u32,
    pub figure_width: f32,
    pub figure_height: f32,
    /// Font file; `None` searches the usual system locations.
    pub font_path: Option<PathBuf>,
}

impl OutputSettings {
    pub const DEFAULT_DPI: u32 = 300;

    /// Optional `dpi`, `figureWidth`, `figureHeight` and `fontPath` keys.
    pub fn from_section(section: &Section<'_>, default_size: (f32, f32)) -> ConfigResult<Self> {
        let settings = Self {
            dpi: section.get_or("dpi", Self::DEFAULT_DPI)?,
            figure_width: section.get_or("figureWidth", default_size.0)?,
            figure_height: section.get_or("figureHeight", default_size.1)?,
            font_path: section.opt_str("fontPath").map(PathBuf::from),
        };
        if settings.dpi == 0 {
            return Err(section.invalid("dpi", "0", "must be positive"));
        }
        if settings.figure_width <= 0.0 || settings.figure_height <= 0.0 {
            return Err(section.invalid(
                "figureWidth",
                &format!("{}x{}", settings.figure_width, settings.figure_height),
                "figure size must be positive",
            ));
        }
        Ok(settings)
    }
}
