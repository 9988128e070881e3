//! Integration tests for frame planning, masking and range derivation.

use std::sync::Arc;

use ocean_common::{
    apply_rules, day_indices, effective_range, plan_frames, GridField, MaskRule, RangeSource,
    Template, Timestep,
};
use test_utils::{assert_approx_eq, create_salinity_grid, create_sparse_grid, fixtures};

fn two_day_steps() -> Vec<Timestep> {
    fixtures::time::TWO_DAYS
        .iter()
        .map(|s| Timestep::parse(s).unwrap())
        .collect()
}

fn regional_field(values: Vec<f32>) -> GridField {
    let spec = fixtures::grid::REGIONAL;
    let lats: Arc<[f64]> = spec.lats().into();
    let lons: Arc<[f64]> = spec.lons().into();
    GridField::new(lats, lons, values).unwrap()
}

#[test]
fn test_day_zero_selects_first_two_timesteps() {
    let frames = plan_frames(&two_day_steps(), None, 0);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].time_index, 0);
    assert_eq!(frames[1].time_index, 1);
    assert_eq!(frames[1].hour_string(), "12");
}

#[test]
fn test_day_one_selects_third_timestep() {
    let frames = plan_frames(&two_day_steps(), None, 1);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].time_index, 2);
    assert_eq!(frames[0].date_string(), "2021-01-02");
}

#[test]
fn test_day_out_of_range_yields_no_frames() {
    assert!(plan_frames(&two_day_steps(), Some(&[1.0, 5.0]), 7).is_empty());
}

#[test]
fn test_frames_cover_every_depth_per_timestep() {
    let depths = [1.0, 5.5, 10.2];
    let frames = plan_frames(&two_day_steps(), Some(&depths), 0);
    assert_eq!(frames.len(), 6);
    let order: Vec<(usize, Option<usize>)> =
        frames.iter().map(|f| (f.time_index, f.depth_index)).collect();
    assert_eq!(
        order,
        vec![
            (0, Some(0)),
            (0, Some(1)),
            (0, Some(2)),
            (1, Some(0)),
            (1, Some(1)),
            (1, Some(2)),
        ]
    );
}

#[test]
fn test_day_indices_monotone() {
    let raw = [
        "2021-01-01T00:00",
        "2021-01-01T23:00",
        "2021-01-02T00:00",
        "2021-01-04T00:00",
        "2021-01-04T06:00",
    ];
    let steps: Vec<Timestep> = raw.iter().map(|s| Timestep::parse(s).unwrap()).collect();
    let days = day_indices(&steps);
    assert_eq!(days, vec![0, 0, 1, 2, 2]);
    assert!(days.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_masks_are_idempotent() {
    let spec = fixtures::grid::REGIONAL;
    let field = regional_field(create_salinity_grid(spec.width, spec.height));
    let rules = [
        MaskRule::Positive,
        MaskRule::Bounds { lower: 17.5, upper: 21.0 },
        MaskRule::Clip { lower: 18.0, upper: 20.0 },
        MaskRule::Region { lat: 44.5, lon: 40.5 },
    ];

    for rule in rules {
        let once = rule.apply(&field);
        let twice = rule.apply(&once);
        let same = once
            .values()
            .iter()
            .zip(twice.values())
            .all(|(a, b)| (a.is_nan() && b.is_nan()) || a == b);
        assert!(same, "{:?} is not idempotent", rule);
    }

    let once = apply_rules(&field, &rules);
    let twice = apply_rules(&once, &rules);
    assert_eq!(once.valid_count(), twice.valid_count());
}

#[test]
fn test_single_valid_cell_adaptive_range() {
    let spec = fixtures::grid::REGIONAL;
    let values = create_sparse_grid(spec.width, spec.height, &[(5, 3, 25.0)]);
    let field = MaskRule::Positive.apply(&regional_field(values));

    let range = effective_range(&field, 10.0, 40.0, true);
    assert_approx_eq!(range.min, 25.0, 1e-6);
    assert_approx_eq!(range.max, 25.0, 1e-6);
    assert_eq!(range.source, RangeSource::Degenerate);
    assert_eq!(range.scale_bounds(), (10.0, 40.0));
}

#[test]
fn test_adaptive_range_tracks_masked_field() {
    let spec = fixtures::grid::REGIONAL;
    let field = regional_field(create_salinity_grid(spec.width, spec.height));
    let masked = MaskRule::Bounds { lower: 18.0, upper: 20.0 }.apply(&field);

    let range = effective_range(&masked, 10.0, 40.0, true);
    assert_eq!(range.source, RangeSource::Adaptive);
    assert!(range.min >= 18.0 && range.max <= 20.0);
    assert_eq!(range.configured_min, 10.0);
    assert_eq!(range.configured_max, 40.0);
}

#[test]
fn test_output_names_are_deterministic() {
    let frames = plan_frames(&two_day_steps(), Some(&[3.2]), 0);
    let template = Template::new("salinity_{DATE}_{DEPTH}.png");

    let render = |i: usize| {
        let frame = &frames[i];
        let stamp = frame.file_stamp();
        let depth = frame.depth_index.unwrap_or(0).to_string();
        template
            .render(&[("DATE", stamp.as_str()), ("DEPTH", depth.as_str())])
            .unwrap()
    };

    assert_eq!(render(0), "salinity_2021-01-01_0030_0.png");
    assert_eq!(render(1), "salinity_2021-01-01_1230_0.png");
    assert_eq!(render(0), render(0));
}
