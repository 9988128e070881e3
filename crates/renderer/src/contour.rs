//! Isoline extraction using the marching squares algorithm.
//!
//! Used to trace coastlines: the land mask is treated as a 0/1 field and the
//! 0.5 isoline is extracted, joined into polylines and optionally smoothed.
//! Coordinates are in grid index space (`x` = column, `y` = row).

use std::collections::HashMap;

/// A point in grid index space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn key(&self) -> (i64, i64) {
        (
            (self.x * 1024.0).round() as i64,
            (self.y * 1024.0).round() as i64,
        )
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A complete contour line (polyline)
#[derive(Debug, Clone)]
pub struct Contour {
    pub level: f32,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Marching squares over a row-major grid.
///
/// Cells with any NaN corner are skipped.
pub fn march_squares(data: &[f32], width: usize, height: usize, level: f32) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();

    for y in 0..(height - 1) {
        for x in 0..(width - 1) {
            let tl = data[y * width + x];
            let tr = data[y * width + x + 1];
            let bl = data[(y + 1) * width + x];
            let br = data[(y + 1) * width + x + 1];

            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let mut case = 0u8;
            if tl >= level {
                case |= 1;
            }
            if tr >= level {
                case |= 2;
            }
            if br >= level {
                case |= 4;
            }
            if bl >= level {
                case |= 8;
            }

            push_cell_segments(&mut segments, case, x as f32, y as f32, [tl, tr, br, bl], level);
        }
    }

    segments
}

/// Append the segments for one cell, interpolating edge crossings linearly.
fn push_cell_segments(
    out: &mut Vec<Segment>,
    case: u8,
    x: f32,
    y: f32,
    [tl, tr, br, bl]: [f32; 4],
    level: f32,
) {
    if case == 0 || case == 15 {
        return;
    }

    let top = interpolate_edge(x, y, x + 1.0, y, tl, tr, level);
    let right = interpolate_edge(x + 1.0, y, x + 1.0, y + 1.0, tr, br, level);
    let bottom = interpolate_edge(x, y + 1.0, x + 1.0, y + 1.0, bl, br, level);
    let left = interpolate_edge(x, y, x, y + 1.0, tl, bl, level);

    let mut push = |start, end| out.push(Segment { start, end });
    match case {
        1 | 14 => push(left, top),
        2 | 13 => push(top, right),
        3 | 12 => push(left, right),
        4 | 11 => push(right, bottom),
        6 | 9 => push(top, bottom),
        7 | 8 => push(left, bottom),
        // Saddles: two separate segments
        5 => {
            push(left, top);
            push(right, bottom);
        }
        10 => {
            push(top, right);
            push(left, bottom);
        }
        _ => {}
    }
}

fn interpolate_edge(x1: f32, y1: f32, x2: f32, y2: f32, v1: f32, v2: f32, level: f32) -> Point {
    if (v2 - v1).abs() < 1e-6 {
        return Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    }
    let t = ((level - v1) / (v2 - v1)).clamp(0.0, 1.0);
    Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

/// Join unordered segments into polylines by matching shared endpoints.
pub fn connect_segments(segments: &[Segment], level: f32) -> Vec<Contour> {
    let mut by_endpoint: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, seg) in segments.iter().enumerate() {
        by_endpoint.entry(seg.start.key()).or_default().push(i);
        by_endpoint.entry(seg.end.key()).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut contours = Vec::new();

    // Next unused segment touching `p`, returned with its far endpoint.
    let next_from = |p: Point, used: &[bool]| -> Option<(usize, Point)> {
        by_endpoint.get(&p.key())?.iter().find_map(|&i| {
            if used[i] {
                return None;
            }
            let seg = segments[i];
            if seg.start.key() == p.key() {
                Some((i, seg.end))
            } else {
                Some((i, seg.start))
            }
        })
    };

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;

        let mut forward = vec![segments[start].start, segments[start].end];
        while let Some((i, p)) = forward.last().and_then(|&end| next_from(end, &used)) {
            used[i] = true;
            forward.push(p);
        }

        let mut backward = Vec::new();
        let mut head = segments[start].start;
        while let Some((i, p)) = next_from(head, &used) {
            used[i] = true;
            backward.push(p);
            head = p;
        }

        backward.reverse();
        backward.extend(forward);
        let points = backward;

        let closed =
            points.len() > 2 && points.first().map(Point::key) == points.last().map(Point::key);
        contours.push(Contour {
            level,
            points,
            closed,
        });
    }

    contours
}

/// Chaikin corner cutting.
pub fn smooth_contour(contour: &Contour, iterations: u32) -> Contour {
    if iterations == 0 || contour.points.len() < 3 {
        return contour.clone();
    }

    let mut points = contour.points.clone();
    if contour.closed {
        // Drop the duplicated closing point; the ring is implicit below.
        points.pop();
    }

    for _ in 0..iterations {
        let n = points.len();
        let pairs = if contour.closed { n } else { n - 1 };
        let mut next = Vec::with_capacity(pairs * 2 + 2);

        if !contour.closed {
            next.push(points[0]);
        }
        for i in 0..pairs {
            let p1 = points[i];
            let p2 = points[(i + 1) % n];
            next.push(Point::new(0.75 * p1.x + 0.25 * p2.x, 0.75 * p1.y + 0.25 * p2.y));
            next.push(Point::new(0.25 * p1.x + 0.75 * p2.x, 0.25 * p1.y + 0.75 * p2.y));
        }
        if !contour.closed {
            next.push(points[n - 1]);
        }

        points = next;
    }

    if contour.closed {
        if let Some(&first) = points.first() {
            points.push(first);
        }
    }

    Contour {
        level: contour.level,
        points,
        closed: contour.closed,
    }
}

/// Boundaries between `true` and `false` cells of a row-major mask.
pub fn trace_mask_boundaries(
    mask: &[bool],
    width: usize,
    height: usize,
    smoothing_passes: u32,
) -> Vec<Contour> {
    let field: Vec<f32> = mask.iter().map(|&m| if m { 1.0 } else { 0.0 }).collect();
    let segments = march_squares(&field, width, height, 0.5);
    connect_segments(&segments, 0.5)
        .iter()
        .map(|c| smooth_contour(c, smoothing_passes))
        .collect()
}
