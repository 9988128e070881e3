//! Configuration of the mean/spread salinity product.

use std::path::{Path, PathBuf};

use ocean_common::Template;
use tracing::debug;

use crate::document::ConfigDocument;
use crate::error::ConfigResult;
use crate::resolution::Resolution;
use crate::settings::{OutputSettings, ScaleSettings};

const DEFAULT_SECTION: &str = "default";
const SALINITY_SECTION: &str = "salinity";

#[derive(Debug, Clone, PartialEq)]
pub struct SalinityConfig {
    pub base_path: PathBuf,
    pub base_output_path: PathBuf,
    /// Cells north of this latitude and east of `mask_lon` are excluded
    /// from the mean panel.
    pub mask_lat: f64,
    pub mask_lon: f64,
    pub mean_file: Template,
    pub std_file: Template,
    pub output_folder: Template,
    pub output_name: Template,
    pub mean: ScaleSettings,
    pub std: ScaleSettings,
    pub resolution: Resolution,
    pub variable: String,
    /// Recompute the mean bounds from each masked field.
    pub mean_adaptive: bool,
    /// Lower end of the sub-range of the mean colour map that is used.
    pub mean_color_map_start: f32,
    /// Fraction of the spread colour map reserved for white.
    pub std_white_fraction: f32,
    pub output: OutputSettings,
}

impl SalinityConfig {
    pub const DEFAULT_VARIABLE: &'static str = "vosaline";
    pub const DEFAULT_FIGURE_SIZE: (f32, f32) = (6.4, 4.8);

    pub fn load(path: &Path) -> ConfigResult<Self> {
        Self::from_document(&ConfigDocument::load(path)?)
    }

    pub fn from_document(doc: &ConfigDocument) -> ConfigResult<Self> {
        let default = doc.section(DEFAULT_SECTION)?;
        let salinity = doc.section(SALINITY_SECTION)?;

        let mean_color_map_start: f32 = salinity.get_or("meanColorMapStart", 0.15)?;
        if !(0.0..1.0).contains(&mean_color_map_start) {
            return Err(salinity.invalid(
                "meanColorMapStart",
                &mean_color_map_start.to_string(),
                "must be in [0, 1)",
            ));
        }
        let std_white_fraction: f32 = salinity.get_or("stdWhiteFraction", 0.1)?;
        if !(0.0..1.0).contains(&std_white_fraction) {
            return Err(salinity.invalid(
                "stdWhiteFraction",
                &std_white_fraction.to_string(),
                "must be in [0, 1)",
            ));
        }

        let config = Self {
            base_path: default.get_path("basePath")?,
            base_output_path: default.get_path("baseOutputPath")?,
            mask_lat: default.get("blackSeaMaskLat")?,
            mask_lon: default.get("blackSeaMaskLon")?,
            mean_file: salinity.get_template("meanFile", &["DATE"])?,
            std_file: salinity.get_template("stdFile", &["DATE"])?,
            output_folder: salinity.get_template("outputFolder", &["DATE"])?,
            output_name: salinity.get_template("outputName", &["DATE", "DEPTH"])?,
            mean: ScaleSettings::from_section(&salinity, "mean")?,
            std: ScaleSettings::from_section(&salinity, "std")?,
            resolution: salinity.get("resolution")?,
            variable: salinity
                .opt_str("variable")
                .unwrap_or(Self::DEFAULT_VARIABLE)
                .to_string(),
            mean_adaptive: salinity.get_bool_or("meanAdaptive", true)?,
            mean_color_map_start,
            std_white_fraction,
            output: OutputSettings::from_section(&default, Self::DEFAULT_FIGURE_SIZE)?,
        };
        debug!(?config, "Loaded salinity configuration");
        Ok(config)
    }

    /// `basePath/<date>/meanFile`
    pub fn mean_path(&self, date: &str) -> ConfigResult<PathBuf> {
        Ok(self
            .base_path
            .join(date)
            .join(self.mean_file.render(&[("DATE", date)])?))
    }

    /// `basePath/<date>/stdFile`
    pub fn std_path(&self, date: &str) -> ConfigResult<PathBuf> {
        Ok(self
            .base_path
            .join(date)
            .join(self.std_file.render(&[("DATE", date)])?))
    }

    /// `baseOutputPath/outputFolder`
    pub fn output_dir(&self, date: &str) -> ConfigResult<PathBuf> {
        Ok(self
            .base_output_path
            .join(self.output_folder.render(&[("DATE", date)])?))
    }

    /// Image name for a frame stamp (`YYYY-MM-DD_HH30`) and depth index.
    pub fn output_file_name(&self, stamp: &str, depth_index: usize) -> ConfigResult<String> {
        let depth = depth_index.to_string();
        Ok(self
            .output_name
            .render(&[("DATE", stamp), ("DEPTH", depth.as_str())])?)
    }
}
