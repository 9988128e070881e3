//! End-to-end figure rendering on synthetic ocean fields.

use std::sync::Arc;

use ocean_common::GridField;
use renderer::{
    Color, ColorBar, ColorMap, ColorScale, Figure, FigureStyle, MapPanel, TextRenderer, TickSpec,
};
use test_utils::fixtures::grid::REGIONAL;
use test_utils::generators::{create_salinity_grid, create_spread_grid, create_ssh_grid};

// ============================================================================
// Helper functions
// ============================================================================

fn field(values: Vec<f32>) -> GridField {
    let lats: Arc<[f64]> = REGIONAL.lats().into();
    let lons: Arc<[f64]> = REGIONAL.lons().into();
    GridField::new(lats, lons, values).unwrap()
}

fn low_res(width_in: f32, height_in: f32) -> FigureStyle {
    FigureStyle {
        width_in,
        height_in,
        dpi: 60,
        ..FigureStyle::default()
    }
}

fn salinity_figure() -> Figure {
    let mean = field(create_salinity_grid(REGIONAL.width, REGIONAL.height));
    let spread = field(create_spread_grid(REGIONAL.width, REGIONAL.height));
    let land = mean.missing_mask();

    let mean_cmap =
        ColorMap::truncated(&ColorMap::named("gist_rainbow").unwrap(), 0.15, 1.0, 10).unwrap();
    let mean_scale = ColorScale::new(mean_cmap, 10.0, 40.0, 30).unwrap();
    let spread_cmap = ColorMap::white_reserved(ColorMap::named("jet").unwrap(), 0.1).unwrap();
    let spread_scale = ColorScale::new(spread_cmap, 0.0, 1.0, 10).unwrap();

    let mut figure = Figure::new(low_res(6.4, 4.8), 2, 1).unwrap();
    figure
        .set_panel(
            0,
            0,
            MapPanel::new(mean, land.clone(), mean_scale.clone(), "Ensemble mean\nDaily mean")
                .unwrap(),
            Some(ColorBar::new(
                mean_scale,
                TickSpec::Integers.ticks(10.0, 40.0),
                "Mean salinity (psu)",
            )),
        )
        .unwrap();
    figure
        .set_panel(
            1,
            0,
            MapPanel::new(spread, land, spread_scale.clone(), "Ensemble spread").unwrap(),
            Some(
                ColorBar::new(
                    spread_scale,
                    TickSpec::Step { step: 0.1, decimals: 1 }.ticks(0.0, 1.0),
                    "Spread (psu)",
                )
                .with_shrink(0.6),
            ),
        )
        .unwrap();
    figure
}

// ============================================================================
// Two-panel figure with per-panel colour bars
// ============================================================================

#[test]
fn test_salinity_figure_renders_bands() {
    let figure = salinity_figure();
    let canvas = figure.render(&TextRenderer::fallback()).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (384, 288));

    let rgba = canvas.to_rgba();
    let colored = rgba
        .chunks_exact(4)
        .filter(|px| !(px[0] == px[1] && px[1] == px[2]))
        .count();
    assert!(colored > 1000, "expected coloured bands, found {} pixels", colored);
}

#[test]
fn test_png_is_tightly_cropped() {
    let figure = salinity_figure();
    let png = figure.to_png(&TextRenderer::fallback()).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    let (w, h) = decoded.dimensions();
    assert!(w < 384 && h <= 288, "crop should remove margins, got {}x{}", w, h);

    // The crop keeps a white border
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

#[test]
fn test_panel_outside_grid_rejected() {
    let mut figure = Figure::new(low_res(4.0, 4.0), 1, 1).unwrap();
    let f = field(create_spread_grid(REGIONAL.width, REGIONAL.height));
    let land = f.missing_mask();
    let scale = ColorScale::new(ColorMap::named("jet").unwrap(), 0.0, 1.0, 10).unwrap();
    let panel = MapPanel::new(f, land, scale, "").unwrap();
    assert!(figure.set_panel(1, 0, panel, None).is_err());
}

// ============================================================================
// Postage-stamp grid with a shared colour bar
// ============================================================================

#[test]
fn test_postage_grid_with_shared_colorbar() {
    let scale = ColorScale::new(ColorMap::named("RdBu_r").unwrap(), -0.5, 0.5, 20).unwrap();
    let mut figure = Figure::new(low_res(6.4, 9.6), 5, 2).unwrap();
    figure.set_suptitle("Sea Surface Height.\nTimestep: 2021-01-01, 00:30");

    for member in 0..10 {
        let f = field(create_ssh_grid(REGIONAL.width, REGIONAL.height, member));
        let land = f.missing_mask();
        let panel = MapPanel::new(f, land, scale.clone(), format!("Member {}", member))
            .unwrap()
            .with_axes(false);
        figure.set_panel(member / 2, member % 2, panel, None).unwrap();
    }
    figure.set_shared_colorbar(
        ColorBar::new(scale.clone(), TickSpec::Integers.ticks(-0.5, 0.5), "Sea Level Height (m)")
            .with_shrink(0.5),
    );

    assert_eq!(figure.panel_count(), 10);
    let canvas = figure.render(&TextRenderer::fallback()).unwrap();
    let bounds = canvas.content_bounds(Color::WHITE).unwrap();
    assert!(bounds.2 > 100 && bounds.3 > 300);
}
