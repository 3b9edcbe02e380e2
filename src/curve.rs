//! Control points are relative to the slider head. The path is approximated
//! as a polyline whose cumulative lengths allow interpolating positions by
//! progress or by distance.

use std::f64::consts::PI;

use crate::model::pos::Pos;

const BEZIER_TOLERANCE: f32 = 0.25;
const CATMULL_DETAIL: usize = 50;
const CIRCULAR_ARC_TOLERANCE: f32 = 0.1;

/// The kind of curve that the control points following a typed control point
/// describe.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathType {
    Linear,
    Bezier,
    Catmull,
    PerfectCurve,
}

impl PathType {
    /// Parses the single-letter code of a `.osu` slider line.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "L" => Some(Self::Linear),
            "B" => Some(Self::Bezier),
            "C" => Some(Self::Catmull),
            "P" => Some(Self::PerfectCurve),
            _ => None,
        }
    }
}

/// A control point of a slider path.
///
/// A control point with a [`PathType`] starts a new segment.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathControlPoint {
    pub pos: Pos,
    pub path_type: Option<PathType>,
}

impl PathControlPoint {
    pub const fn new(pos: Pos) -> Self {
        Self {
            pos,
            path_type: None,
        }
    }

    pub const fn with_type(pos: Pos, path_type: PathType) -> Self {
        Self {
            pos,
            path_type: Some(path_type),
        }
    }
}

/// The approximated path of a slider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Curve {
    path: Vec<Pos>,
    cumulative_len: Vec<f64>,
}

impl Curve {
    /// Approximate the path through the control points and fit its length to
    /// `expected_dist` if given.
    pub fn new(control_points: &[PathControlPoint], expected_dist: Option<f64>) -> Self {
        let mut curve = Self {
            path: calculate_path(control_points),
            cumulative_len: Vec::new(),
        };

        curve.calculate_len(expected_dist);

        curve
    }

    /// The total length of the path.
    pub fn dist(&self) -> f64 {
        self.cumulative_len.last().copied().unwrap_or(0.0)
    }

    /// The approximated vertices of the path.
    pub fn path(&self) -> &[Pos] {
        &self.path
    }

    /// The position at the given progress, clamped to `[0, 1]`.
    pub fn position_at(&self, progress: f64) -> Pos {
        let d = progress.clamp(0.0, 1.0) * self.dist();

        self.point_at_distance(d)
    }

    /// The position after travelling the distance `d` along the path.
    pub fn point_at_distance(&self, d: f64) -> Pos {
        let d = d.clamp(0.0, self.dist());
        let i = self.idx_of_dist(d);

        self.interpolate_vertices(i, d)
    }

    fn idx_of_dist(&self, d: f64) -> usize {
        self.cumulative_len
            .binary_search_by(|len| len.total_cmp(&d))
            .unwrap_or_else(|i| i)
    }

    fn interpolate_vertices(&self, i: usize, d: f64) -> Pos {
        let Some(last) = self.path.last() else {
            return Pos::default();
        };

        if i == 0 {
            return self.path[0];
        } else if i >= self.path.len() || i >= self.cumulative_len.len() {
            return *last;
        }

        let p0 = self.path[i - 1];
        let p1 = self.path[i];

        let d0 = self.cumulative_len[i - 1];
        let d1 = self.cumulative_len[i];

        if (d0 - d1).abs() < f64::EPSILON {
            return p0;
        }

        let w = (d - d0) / (d1 - d0);

        p0 + (p1 - p0) * w as f32
    }

    fn calculate_len(&mut self, expected_dist: Option<f64>) {
        let mut calculated_len = 0.0;
        self.cumulative_len.clear();
        self.cumulative_len.reserve(self.path.len());
        self.cumulative_len.push(0.0);

        for (prev, curr) in self.path.iter().zip(self.path.iter().skip(1)) {
            calculated_len += f64::from((*curr - *prev).length());
            self.cumulative_len.push(calculated_len);
        }

        let Some(expected_dist) = expected_dist.filter(|&dist| dist > 0.0) else {
            return;
        };

        if (calculated_len - expected_dist).abs() < f64::EPSILON {
            return;
        }

        // Paths ending on a doubled point are never extended
        if let [.., a, b] = self.path.as_slice() {
            if a == b && expected_dist > calculated_len {
                return;
            }
        }

        self.cumulative_len.pop();
        let mut path_end_idx = self.path.len().saturating_sub(1);

        if calculated_len > expected_dist {
            while self
                .cumulative_len
                .last()
                .is_some_and(|&len| len >= expected_dist)
            {
                self.cumulative_len.pop();
                self.path.truncate(path_end_idx);

                if path_end_idx == 0 {
                    break;
                }

                path_end_idx -= 1;
            }
        }

        if path_end_idx == 0 {
            self.cumulative_len.push(0.0);

            return;
        }

        let last = self.cumulative_len.last().copied().unwrap_or(0.0);
        let dir = (self.path[path_end_idx] - self.path[path_end_idx - 1]).normalize();
        self.path[path_end_idx] = self.path[path_end_idx - 1] + dir * (expected_dist - last) as f32;
        self.cumulative_len.push(expected_dist);
    }
}

fn calculate_path(control_points: &[PathControlPoint]) -> Vec<Pos> {
    let mut path = Vec::new();
    let mut start = 0;

    for i in 0..control_points.len() {
        if control_points[i].path_type.is_none() && i < control_points.len() - 1 {
            continue;
        }

        let segment = &control_points[start..=i];
        let path_type = control_points[start].path_type.unwrap_or(PathType::Linear);

        if let [single] = segment {
            if path.last() != Some(&single.pos) {
                path.push(single.pos);
            }
        } else {
            let vertices: Vec<_> = segment.iter().map(|point| point.pos).collect();

            let sub_path = calculate_sub_path(&vertices, path_type);

            // Segments share their boundary point. Doubled points within a
            // segment are kept.
            let skip = usize::from(sub_path.first().is_some_and(|pos| path.last() == Some(pos)));
            path.extend_from_slice(&sub_path[skip..]);
        }

        start = i;
    }

    path
}

fn calculate_sub_path(vertices: &[Pos], path_type: PathType) -> Vec<Pos> {
    match path_type {
        PathType::Linear => vertices.to_vec(),
        PathType::PerfectCurve => {
            if let [a, b, c] = vertices {
                if let Some(arc) = CircularArc::new(*a, *b, *c) {
                    return arc.approximate();
                }
            }

            approximate_bezier(vertices)
        }
        PathType::Catmull => approximate_catmull(vertices),
        PathType::Bezier => approximate_bezier(vertices),
    }
}

fn approximate_bezier(control_points: &[Pos]) -> Vec<Pos> {
    let mut output = Vec::new();
    let count = control_points.len();

    if count == 0 {
        return output;
    }

    let mut to_flatten = vec![control_points.to_vec()];
    let mut left = vec![Pos::default(); count];
    let mut right = vec![Pos::default(); count];
    let mut midpoints = vec![Pos::default(); count];

    while let Some(parent) = to_flatten.pop() {
        if bezier_is_flat_enough(&parent) {
            bezier_approximate(&parent, &mut output, &mut left, &mut right, &mut midpoints);

            continue;
        }

        bezier_subdivide(&parent, &mut left, &mut right, &mut midpoints);

        to_flatten.push(right.clone());
        to_flatten.push(left.clone());
    }

    output.push(control_points[count - 1]);

    output
}

fn bezier_is_flat_enough(points: &[Pos]) -> bool {
    let limit = BEZIER_TOLERANCE * BEZIER_TOLERANCE * 4.0;

    points.windows(3).all(|window| {
        let [prev, curr, next] = window else {
            return true;
        };

        (*prev - *curr * 2.0 + *next).length_squared() <= limit
    })
}

fn bezier_subdivide(points: &[Pos], left: &mut [Pos], right: &mut [Pos], midpoints: &mut [Pos]) {
    let count = points.len();
    midpoints[..count].copy_from_slice(points);

    for i in 0..count {
        left[i] = midpoints[0];
        right[count - i - 1] = midpoints[count - i - 1];

        for j in 0..count - i - 1 {
            midpoints[j] = (midpoints[j] + midpoints[j + 1]) / 2.0;
        }
    }
}

fn bezier_approximate(
    points: &[Pos],
    output: &mut Vec<Pos>,
    left: &mut [Pos],
    right: &mut [Pos],
    midpoints: &mut [Pos],
) {
    let count = points.len();
    bezier_subdivide(points, left, right, midpoints);

    let combined: Vec<_> = left[..count]
        .iter()
        .chain(right[1..count].iter())
        .copied()
        .collect();

    output.push(points[0]);

    for i in 1..count - 1 {
        let idx = 2 * i;
        let pos = (combined[idx - 1] + combined[idx] * 2.0 + combined[idx + 1]) * 0.25;
        output.push(pos);
    }
}

fn approximate_catmull(points: &[Pos]) -> Vec<Pos> {
    let len = points.len();
    let mut result = Vec::with_capacity(len.saturating_sub(1) * CATMULL_DETAIL * 2);

    for i in 0..len.saturating_sub(1) {
        let v1 = if i > 0 { points[i - 1] } else { points[i] };
        let v2 = points[i];
        let v3 = if i < len - 1 { points[i + 1] } else { v2 * 2.0 - v1 };
        let v4 = if i < len - 2 { points[i + 2] } else { v3 * 2.0 - v2 };

        for c in 0..CATMULL_DETAIL {
            let t0 = c as f32 / CATMULL_DETAIL as f32;
            let t1 = (c + 1) as f32 / CATMULL_DETAIL as f32;

            result.push(catmull_point(v1, v2, v3, v4, t0));
            result.push(catmull_point(v1, v2, v3, v4, t1));
        }
    }

    result
}

fn catmull_point(v1: Pos, v2: Pos, v3: Pos, v4: Pos, t: f32) -> Pos {
    let t2 = t * t;
    let t3 = t * t2;

    let coord = |p1: f32, p2: f32, p3: f32, p4: f32| {
        0.5 * (2.0 * p2
            + (-p1 + p3) * t
            + (2.0 * p1 - 5.0 * p2 + 4.0 * p3 - p4) * t2
            + (-p1 + 3.0 * p2 - 3.0 * p3 + p4) * t3)
    };

    Pos::new(
        coord(v1.x, v2.x, v3.x, v4.x),
        coord(v1.y, v2.y, v3.y, v4.y),
    )
}

/// A circular arc through three points.
struct CircularArc {
    theta_start: f64,
    theta_range: f64,
    direction: f64,
    radius: f32,
    centre: Pos,
}

impl CircularArc {
    /// Returns `None` for collinear points.
    fn new(a: Pos, b: Pos, c: Pos) -> Option<Self> {
        let det = (b.y - a.y) * (c.x - a.x) - (b.x - a.x) * (c.y - a.y);

        if det.abs() <= f32::EPSILON {
            return None;
        }

        let d = 2.0 * (a.x * (b - c).y + b.x * (c - a).y + c.x * (a - b).y);
        let a_sq = a.length_squared();
        let b_sq = b.length_squared();
        let c_sq = c.length_squared();

        let centre = Pos::new(
            (a_sq * (b - c).y + b_sq * (c - a).y + c_sq * (a - b).y) / d,
            (a_sq * (c - b).x + b_sq * (a - c).x + c_sq * (b - a).x) / d,
        );

        let d_a = a - centre;
        let d_c = c - centre;

        let radius = d_a.length();

        let theta_start = f64::from(d_a.y).atan2(f64::from(d_a.x));
        let mut theta_end = f64::from(d_c.y).atan2(f64::from(d_c.x));

        while theta_end < theta_start {
            theta_end += 2.0 * PI;
        }

        let mut direction = 1.0;
        let mut theta_range = theta_end - theta_start;

        let a_to_c = c - a;
        let ortho_a_to_c = Pos::new(a_to_c.y, -a_to_c.x);

        if ortho_a_to_c.dot(b - a) < 0.0 {
            direction = -1.0;
            theta_range = 2.0 * PI - theta_range;
        }

        Some(Self {
            theta_start,
            theta_range,
            direction,
            radius,
            centre,
        })
    }

    fn approximate(&self) -> Vec<Pos> {
        let amount_points = if 2.0 * self.radius <= CIRCULAR_ARC_TOLERANCE {
            2
        } else {
            let step = 2.0 * f64::from(1.0 - CIRCULAR_ARC_TOLERANCE / self.radius).acos();

            ((self.theta_range / step).ceil() as usize).max(2)
        };

        (0..amount_points)
            .map(|i| {
                let fract = i as f64 / (amount_points - 1) as f64;
                let theta = self.theta_start + self.direction * fract * self.theta_range;
                let offset = Pos::new(theta.cos() as f32, theta.sin() as f32) * self.radius;

                self.centre + offset
            })
            .collect()
    }
}
