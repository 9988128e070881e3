//! Configuration of the sea-surface-height postage-stamp product.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ocean_common::Template;
use tracing::debug;

use crate::document::ConfigDocument;
use crate::error::ConfigResult;
use crate::resolution::Resolution;
use crate::settings::{OutputSettings, ScaleSettings};

const DEFAULT_SECTION: &str = "default";
const POSTAGE_SECTION: &str = "postcardSsh";

/// Treatment of values outside the colour-scale bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfRange {
    /// Clamp to the nearest bound.
    Clip,
    /// Blank the cell.
    Mask,
}

impl FromStr for OutOfRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clip" => Ok(OutOfRange::Clip),
            "mask" => Ok(OutOfRange::Mask),
            other => Err(format!("expected 'clip' or 'mask', got '{}'", other)),
        }
    }
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutOfRange::Clip => f.write_str("clip"),
            OutOfRange::Mask => f.write_str("mask"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostageConfig {
    /// Directory of one ensemble member, with `{INSTANCE}` (and optionally
    /// `{DATE}`) placeholders.
    pub base_ens_path: Template,
    pub input_file: Template,
    pub resolution: Resolution,
    pub scale: ScaleSettings,
    pub variable: String,
    pub members: usize,
    pub columns: usize,
    pub output_folder: Template,
    pub output_name: Template,
    pub out_of_range: OutOfRange,
    pub output: OutputSettings,
}

impl PostageConfig {
    pub const DEFAULT_VARIABLE: &'static str = "sossheig";
    pub const DEFAULT_MEMBERS: usize = 10;
    pub const DEFAULT_COLUMNS: usize = 2;
    pub const DEFAULT_OUTPUT_FOLDER: &'static str = "output";
    pub const DEFAULT_OUTPUT_NAME: &'static str = "postcard_ssh_{DATE}.png";
    pub const DEFAULT_FIGURE_SIZE: (f32, f32) = (6.4, 9.6);

    pub fn load(path: &Path) -> ConfigResult<Self> {
        Self::from_document(&ConfigDocument::load(path)?)
    }

    pub fn from_document(doc: &ConfigDocument) -> ConfigResult<Self> {
        let default = doc.section(DEFAULT_SECTION)?;
        let postage = doc.section(POSTAGE_SECTION)?;

        let members: usize = postage.get_or("members", Self::DEFAULT_MEMBERS)?;
        if members == 0 {
            return Err(postage.invalid("members", "0", "at least one member is required"));
        }
        let columns: usize = postage.get_or("columns", Self::DEFAULT_COLUMNS)?;
        if columns == 0 {
            return Err(postage.invalid("columns", "0", "at least one column is required"));
        }

        let config = Self {
            base_ens_path: default.get_template("baseEnsPath", &["INSTANCE", "DATE"])?,
            input_file: postage.get_template("inputFile", &["DATE"])?,
            resolution: postage.get("resolution")?,
            scale: ScaleSettings::from_section(&postage, "")?,
            variable: postage
                .opt_str("variable")
                .unwrap_or(Self::DEFAULT_VARIABLE)
                .to_string(),
            members,
            columns,
            output_folder: postage.get_template_or(
                "outputFolder",
                Self::DEFAULT_OUTPUT_FOLDER,
                &["DATE"],
            )?,
            output_name: postage.get_template_or(
                "outputName",
                Self::DEFAULT_OUTPUT_NAME,
                &["DATE"],
            )?,
            out_of_range: postage.get_or("outOfRange", OutOfRange::Clip)?,
            output: OutputSettings::from_section(&default, Self::DEFAULT_FIGURE_SIZE)?,
        };
        debug!(?config, "Loaded postage configuration");
        Ok(config)
    }

    /// `baseEnsPath(INSTANCE=member)/inputFile`
    pub fn member_path(&self, member: usize, date: &str) -> ConfigResult<PathBuf> {
        let instance = member.to_string();
        let dir = self
            .base_ens_path
            .render(&[("INSTANCE", instance.as_str()), ("DATE", date)])?;
        Ok(PathBuf::from(dir).join(self.input_file.render(&[("DATE", date)])?))
    }

    pub fn output_dir(&self, date: &str) -> ConfigResult<PathBuf> {
        Ok(PathBuf::from(self.output_folder.render(&[("DATE", date)])?))
    }

    /// Image name for a frame stamp (`YYYY-MM-DD_HH30`).
    pub fn output_file_name(&self, stamp: &str) -> ConfigResult<String> {
        Ok(self.output_name.render(&[("DATE", stamp)])?)
    }
}
