//! Sea-surface-height postage stamps: one panel per ensemble member, one
//! image per timestep.

use std::path::PathBuf;

use anyhow::{Context, Result};
use netcdf_parser::OceanDataset;
use ocean_common::{plan_frames, FrameDescriptor, MaskRule, MemberLayout, Mesh};
use plot_config::{OutOfRange, PostageConfig};
use renderer::{
    ColorBar, ColorMap, ColorScale, Figure, FigureStyle, MapPanel, TextRenderer, TickSpec,
};
use tracing::{debug, info, instrument, warn};

use crate::cli::RunRequest;
use crate::writer;

pub const COLORBAR_LABEL: &str = "Sea Level Height (m)";
const COLORBAR_SHRINK: f32 = 0.5;

pub fn run(request: &RunRequest) -> Result<()> {
    let config = PostageConfig::load(&request.config)
        .with_context(|| format!("Failed to load config {}", request.config.display()))?;
    let written = render_day(&config, &request.date, request.day_index)?;
    info!(images = written.len(), "Postage plots complete");
    Ok(())
}

/// Figure style of the postage grid: smaller unit label and a tighter
/// title gap than the salinity figure.
pub fn figure_style(config: &PostageConfig) -> FigureStyle {
    FigureStyle {
        width_in: config.output.figure_width,
        height_in: config.output.figure_height,
        dpi: config.output.dpi,
        title_pad_pt: 4.0,
        colorbar_label_pt: 3.0,
        ..FigureStyle::default()
    }
}

/// Rule applied to each member before plotting.
pub fn range_rule(config: &PostageConfig) -> MaskRule {
    let (lower, upper) = (config.scale.min, config.scale.max);
    match config.out_of_range {
        OutOfRange::Clip => MaskRule::Clip { lower, upper },
        OutOfRange::Mask => MaskRule::Bounds { lower, upper },
    }
}

/// Render every timestep of `day_index` and return the written files.
pub fn render_day(config: &PostageConfig, date: &str, day_index: usize) -> Result<Vec<PathBuf>> {
    let paths = (0..config.members)
        .map(|member| config.member_path(member, date))
        .collect::<Result<Vec<_>, _>>()?;
    info!("Input files set to:");
    for path in &paths {
        info!("  {}", path.display());
    }
    info!(
        resolution = %config.resolution,
        min = config.scale.min,
        max = config.scale.max,
        color_map = %config.scale.color_map,
        levels = config.scale.levels,
        "Chart settings"
    );

    let datasets = paths
        .iter()
        .map(|path| {
            OceanDataset::open(path)
                .with_context(|| format!("Failed to open member dataset {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    let reference = datasets.first().context("No ensemble members configured")?;
    let mesh = reference.mesh()?;

    let output_dir = config.output_dir(date)?;
    writer::ensure_dir(&output_dir)?;
    info!("Output folder set to: {}", output_dir.display());

    let frames = plan_frames(reference.timesteps(), None, day_index);
    if frames.is_empty() {
        warn!(
            day_index,
            timesteps = reference.timesteps().len(),
            "No timesteps fall on the requested day"
        );
    }

    let scale = ColorScale::new(
        ColorMap::named(&config.scale.color_map)?,
        config.scale.min,
        config.scale.max,
        config.scale.levels,
    )?;
    let text = TextRenderer::load(config.output.font_path.as_deref());

    let mut written = Vec::with_capacity(frames.len());
    for frame in &frames {
        info!("Timestep: {}", frame.title_timestamp());
        let figure = build_figure(config, &datasets, &mesh, &scale, frame)?;
        let png = figure.to_png(&text)?;
        let name = config.output_file_name(&frame.file_stamp())?;
        written.push(writer::write_image(&output_dir, &name, &png)?);
    }
    Ok(written)
}

#[instrument(skip_all, fields(stamp = %frame.file_stamp()))]
fn build_figure(
    config: &PostageConfig,
    datasets: &[OceanDataset],
    mesh: &Mesh,
    scale: &ColorScale,
    frame: &FrameDescriptor,
) -> Result<Figure> {
    let layout = MemberLayout::new(datasets.len(), config.columns);
    let rule = range_rule(config);
    let smoothing = config.resolution.smoothing_passes();

    let mut figure = Figure::new(figure_style(config), layout.rows(), layout.columns)?;
    for (member, dataset) in datasets.iter().enumerate() {
        let member_frame = frame.for_member(member);
        let raw = dataset
            .read_field_on(&config.variable, member_frame.time_index, None, mesh)
            .with_context(|| format!("Failed to read member {}", member))?;
        let field = rule.apply(&raw);
        debug!(member, valid = field.valid_count(), "Member field");

        let panel = MapPanel::new(
            field,
            raw.missing_mask(),
            scale.clone(),
            format!("Member {}", member),
        )?
        .with_axes(false)
        .with_coastline_smoothing(smoothing);

        let (row, col) = layout.position(member);
        figure.set_panel(row, col, panel, None)?;
    }

    figure.set_shared_colorbar(
        ColorBar::new(
            scale.clone(),
            TickSpec::Integers.ticks(scale.min(), scale.max()),
            COLORBAR_LABEL,
        )
        .with_shrink(COLORBAR_SHRINK),
    );
    figure.set_suptitle(format!(
        "Sea Surface Height.\nTimestep: {}",
        frame.title_timestamp()
    ));
    Ok(figure)
}
