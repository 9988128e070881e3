//! Mean/spread salinity figures: one two-panel image per (timestep, depth).

use std::path::PathBuf;

use anyhow::{Context, Result};
use netcdf_parser::OceanDataset;
use ocean_common::{
    apply_rules, effective_range, plan_frames, FrameDescriptor, MaskRule, Mesh, RangeSource,
};
use plot_config::SalinityConfig;
use renderer::{
    ColorBar, ColorMap, ColorScale, Figure, FigureStyle, MapPanel, TextRenderer, TickSpec,
};
use tracing::{debug, info, instrument, warn};

use crate::cli::RunRequest;
use crate::writer;

pub const MEAN_LABEL: &str = "Mean salinity (psu)";
pub const SPREAD_LABEL: &str = "Spread (psu)";

/// Points sampled from the base map when truncating the mean colour map.
const MEAN_COLOR_SAMPLES: usize = 10;
const SPREAD_TICKS: TickSpec = TickSpec::Step {
    step: 0.1,
    decimals: 1,
};
const SPREAD_SHRINK: f32 = 0.6;

pub fn run(request: &RunRequest) -> Result<()> {
    let config = SalinityConfig::load(&request.config)
        .with_context(|| format!("Failed to load config {}", request.config.display()))?;
    let written = render_day(&config, &request.date, request.day_index)?;
    info!(images = written.len(), "Salinity plots complete");
    Ok(())
}

/// Styling that does not change from frame to frame.
struct Styling {
    mean_cmap: ColorMap,
    spread_scale: ColorScale,
    figure: FigureStyle,
    smoothing: u32,
}

impl Styling {
    fn new(config: &SalinityConfig) -> Result<Self> {
        let mean_base = ColorMap::named(&config.mean.color_map)?;
        let mean_cmap = ColorMap::truncated(
            &mean_base,
            config.mean_color_map_start,
            1.0,
            MEAN_COLOR_SAMPLES,
        )?;
        let spread_cmap = ColorMap::white_reserved(
            ColorMap::named(&config.std.color_map)?,
            config.std_white_fraction,
        )?;
        let spread_scale =
            ColorScale::new(spread_cmap, config.std.min, config.std.max, config.std.levels)?;

        Ok(Self {
            mean_cmap,
            spread_scale,
            figure: FigureStyle {
                width_in: config.output.figure_width,
                height_in: config.output.figure_height,
                dpi: config.output.dpi,
                ..FigureStyle::default()
            },
            smoothing: config.resolution.smoothing_passes(),
        })
    }
}

/// Render every frame of `day_index` and return the written files.
pub fn render_day(config: &SalinityConfig, date: &str, day_index: usize) -> Result<Vec<PathBuf>> {
    let mean_path = config.mean_path(date)?;
    let std_path = config.std_path(date)?;
    info!("Mean file set to: {}", mean_path.display());
    info!("Std file set to: {}", std_path.display());

    let output_dir = config.output_dir(date)?;
    writer::ensure_dir(&output_dir)?;
    info!("Output folder set to: {}", output_dir.display());
    info!(
        mask_lat = config.mask_lat,
        mask_lon = config.mask_lon,
        mean_color_map = %config.mean.color_map,
        mean_min = config.mean.min,
        mean_max = config.mean.max,
        std_color_map = %config.std.color_map,
        std_min = config.std.min,
        std_max = config.std.max,
        resolution = %config.resolution,
        "Chart settings"
    );

    let std_ds = OceanDataset::open(&std_path)
        .with_context(|| format!("Failed to open std dataset {}", std_path.display()))?;
    let mean_ds = OceanDataset::open(&mean_path)
        .with_context(|| format!("Failed to open mean dataset {}", mean_path.display()))?;
    let mesh = std_ds.mesh()?;

    let frames = plan_frames(std_ds.timesteps(), std_ds.depths(), day_index);
    if frames.is_empty() {
        warn!(
            day_index,
            timesteps = std_ds.timesteps().len(),
            "No timesteps fall on the requested day"
        );
    }

    let styling = Styling::new(config)?;
    let text = TextRenderer::load(config.output.font_path.as_deref());

    let mut written = Vec::with_capacity(frames.len());
    for frame in &frames {
        let figure = build_figure(config, &styling, &mean_ds, &std_ds, &mesh, frame)?;
        let png = figure.to_png(&text)?;
        let name = config.output_file_name(&frame.file_stamp(), frame.depth_index.unwrap_or(0))?;
        written.push(writer::write_image(&output_dir, &name, &png)?);
    }
    Ok(written)
}

/// "`<depth> m`", or "surface" for a dataset without a depth axis.
fn depth_phrase(frame: &FrameDescriptor) -> String {
    match frame.depth {
        Some(_) => format!("{} m", frame.depth_label()),
        None => frame.depth_label(),
    }
}

#[instrument(skip_all, fields(stamp = %frame.file_stamp(), depth = ?frame.depth_index))]
fn build_figure(
    config: &SalinityConfig,
    styling: &Styling,
    mean_ds: &OceanDataset,
    std_ds: &OceanDataset,
    mesh: &Mesh,
    frame: &FrameDescriptor,
) -> Result<Figure> {
    let region = MaskRule::Region {
        lat: config.mask_lat,
        lon: config.mask_lon,
    };

    // Mean: non-positive salinity is not physical.
    let mean_raw = mean_ds
        .read_field_on(&config.variable, frame.time_index, frame.depth_index, mesh)
        .context("Failed to read mean field")?;
    let mean = apply_rules(&mean_raw, &[MaskRule::Positive, region]);
    let range = effective_range(&mean, config.mean.min, config.mean.max, config.mean_adaptive);
    match range.source {
        RangeSource::EmptyField => warn!(
            date = %frame.date_string(),
            depth = %frame.depth_label(),
            "Mean field is fully masked, drawing a blank panel"
        ),
        RangeSource::Degenerate => warn!(
            value = range.min,
            "Mean field is constant, using the configured bounds"
        ),
        RangeSource::Static | RangeSource::Adaptive => {
            debug!(min = range.min, max = range.max, valid = mean.valid_count(), "Mean range")
        }
    }
    let (mean_min, mean_max) = range.scale_bounds();
    let mean_scale =
        ColorScale::new(styling.mean_cmap.clone(), mean_min, mean_max, config.mean.levels)?;

    // Spread
    let std_raw = std_ds
        .read_field_on(&config.variable, frame.time_index, frame.depth_index, mesh)
        .context("Failed to read std field")?;
    let spread = region.apply(&std_raw);

    let depth = depth_phrase(frame);
    let day = frame.date_string();

    let mean_bar = ColorBar::new(
        mean_scale.clone(),
        TickSpec::Integers.ticks(mean_min, mean_max),
        MEAN_LABEL,
    );
    let mean_panel = MapPanel::new(
        mean,
        mean_raw.missing_mask(),
        mean_scale,
        format!("Ensemble mean for salinity at {}\nDaily mean: {}", depth, day),
    )?
    .with_coastline_smoothing(styling.smoothing);

    let spread_bar = ColorBar::new(
        styling.spread_scale.clone(),
        SPREAD_TICKS.ticks(config.std.min, config.std.max),
        SPREAD_LABEL,
    )
    .with_shrink(SPREAD_SHRINK);
    let spread_panel = MapPanel::new(
        spread,
        std_raw.missing_mask(),
        styling.spread_scale.clone(),
        format!("Ensemble spread for salinity at {}\nDaily mean: {}", depth, day),
    )?
    .with_coastline_smoothing(styling.smoothing);

    let mut figure = Figure::new(styling.figure.clone(), 2, 1)?;
    figure.set_panel(0, 0, mean_panel, Some(mean_bar))?;
    figure.set_panel(1, 0, spread_panel, Some(spread_bar))?;
    Ok(figure)
}
