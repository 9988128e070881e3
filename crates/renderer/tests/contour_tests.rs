//! Tests for coastline tracing with marching squares.

use renderer::contour::{
    connect_segments, march_squares, smooth_contour, trace_mask_boundaries, Contour, Point,
};

// ============================================================================
// march_squares tests
// ============================================================================

#[test]
fn test_march_squares_vertical_edge() {
    // Left column low, right column high: a vertical isoline at x = 0.5
    #[rustfmt::skip]
    let data = vec![
        0.0, 1.0,
        0.0, 1.0,
        0.0, 1.0,
    ];
    let segments = march_squares(&data, 2, 3, 0.5);
    assert_eq!(segments.len(), 2);
    for seg in &segments {
        assert!((seg.start.x - 0.5).abs() < 1e-6);
        assert!((seg.end.x - 0.5).abs() < 1e-6);
    }
}

#[test]
fn test_march_squares_degenerate_inputs() {
    assert!(march_squares(&[1.0], 1, 1, 0.5).is_empty());
    assert!(march_squares(&[1.0, 2.0, 3.0], 2, 2, 0.5).is_empty());
}

#[test]
fn test_saddle_produces_two_segments() {
    #[rustfmt::skip]
    let data = vec![
        1.0, 0.0,
        0.0, 1.0,
    ];
    assert_eq!(march_squares(&data, 2, 2, 0.5).len(), 2);
}

// ============================================================================
// connect_segments tests
// ============================================================================

#[test]
fn test_connect_open_line() {
    #[rustfmt::skip]
    let data = vec![
        0.0, 1.0,
        0.0, 1.0,
        0.0, 1.0,
        0.0, 1.0,
    ];
    let segments = march_squares(&data, 2, 4, 0.5);
    let contours = connect_segments(&segments, 0.5);
    assert_eq!(contours.len(), 1);
    assert!(!contours[0].closed);
    assert_eq!(contours[0].points.len(), 4);
}

#[test]
fn test_connect_two_islands() {
    #[rustfmt::skip]
    let data = vec![
        0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0,
    ];
    let segments = march_squares(&data, 5, 3, 0.5);
    let contours = connect_segments(&segments, 0.5);
    assert_eq!(contours.len(), 2);
    assert!(contours.iter().all(|c| c.closed));
}

// ============================================================================
// Mask boundaries
// ============================================================================

#[test]
fn test_mask_corner_block() {
    // Land in the bottom-left 2x2 corner of a 4x4 grid
    let mut mask = vec![false; 16];
    for (row, col) in [(2, 0), (2, 1), (3, 0), (3, 1)] {
        mask[row * 4 + col] = true;
    }
    let contours = trace_mask_boundaries(&mask, 4, 4, 0);
    assert_eq!(contours.len(), 1);
    let line = &contours[0];
    assert!(!line.closed, "boundary touching the grid edge stays open");
    for p in &line.points {
        assert!(p.x <= 1.5 + 1e-6 && p.y >= 1.5 - 1e-6);
    }
}

#[test]
fn test_uniform_mask_has_no_boundary() {
    assert!(trace_mask_boundaries(&[true; 9], 3, 3, 2).is_empty());
    assert!(trace_mask_boundaries(&[false; 9], 3, 3, 2).is_empty());
}

#[test]
fn test_smoothing_adds_points() {
    let mut mask = vec![false; 25];
    mask[12] = true;
    let raw = trace_mask_boundaries(&mask, 5, 5, 0);
    let smooth = trace_mask_boundaries(&mask, 5, 5, 2);
    assert_eq!(raw.len(), 1);
    assert!(smooth[0].points.len() > raw[0].points.len());
    assert!(smooth[0].closed);
}

// ============================================================================
// smooth_contour tests
// ============================================================================

#[test]
fn test_smooth_zero_iterations_is_identity() {
    let contour = Contour {
        level: 0.5,
        points: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0)],
        closed: false,
    };
    let smoothed = smooth_contour(&contour, 0);
    assert_eq!(smoothed.points, contour.points);
}

#[test]
fn test_smooth_stays_in_hull() {
    let contour = Contour {
        level: 0.5,
        points: vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
            Point::new(0.0, 0.0),
        ],
        closed: true,
    };
    let smoothed = smooth_contour(&contour, 3);
    for p in &smoothed.points {
        assert!((0.0..=4.0).contains(&p.x));
        assert!((0.0..=4.0).contains(&p.y));
    }
}
