use std::f32::consts::TAU;

use crate::style::LineCap;
use crate::vertex::Vertex;

/// Indexed triangles ready to upload.
#[derive(Debug, Clone, Default)]
pub struct Mesh<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
}

impl<V> Mesh<V> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    fn base(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Pushes four corners in order and two triangles covering them.
    pub fn push_quad(&mut self, corners: [V; 4]) {
        let base = self.base();
        self.vertices.extend(corners);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StrokeStyle<'a> {
    pub width: f32,
    pub cap: LineCap,
    /// On/off lengths; empty means solid.
    pub dash: &'a [f32],
    /// Path length already covered by the pattern before the first point.
    pub dash_offset: f64,
}

fn sub(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

fn cross(a: [f32; 2], b: [f32; 2]) -> f32 {
    a[0] * b[1] - a[1] * b[0]
}

fn length(v: [f32; 2]) -> f32 {
    (v[0] * v[0] + v[1] * v[1]).sqrt()
}

fn vertex(position: [f32; 2], color: [f32; 4]) -> Vertex {
    Vertex { position, color }
}

pub fn fill_quad(mesh: &mut Mesh<Vertex>, corners: [[f32; 2]; 4], color: [f32; 4]) {
    mesh.push_quad(corners.map(|p| vertex(p, color)));
}

/// Fills the triangles `center, ring[i], ring[i + 1]`.
pub fn fill_fan(mesh: &mut Mesh<Vertex>, center: [f32; 2], ring: &[[f32; 2]], color: [f32; 4]) {
    if ring.len() < 2 {
        return;
    }
    let base = mesh.base();
    mesh.vertices.push(vertex(center, color));
    mesh.vertices.extend(ring.iter().map(|&p| vertex(p, color)));
    for i in 0..ring.len() as u32 - 1 {
        mesh.indices.extend_from_slice(&[base, base + 1 + i, base + 2 + i]);
    }
}

/// Fills a simple polygon, convex or not.
pub fn fill_polygon(mesh: &mut Mesh<Vertex>, points: &[[f32; 2]], color: [f32; 4]) {
    let triangles = triangulate(points);
    if triangles.is_empty() {
        return;
    }
    let base = mesh.base();
    mesh.vertices.extend(points.iter().map(|&p| vertex(p, color)));
    for [a, b, c] in triangles {
        mesh.indices
            .extend_from_slice(&[base + a as u32, base + b as u32, base + c as u32]);
    }
}

/// Twice the signed area; positive when counter-clockwise in a y-up frame.
pub fn signed_area(points: &[[f32; 2]]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| cross(points[i], points[(i + 1) % n]))
        .sum::<f32>()
}

/// Ear-clipping triangulation. Falls back to a fan when no ear can be found,
/// which only happens for self-intersecting input.
pub fn triangulate(points: &[[f32; 2]]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let orientation = signed_area(points).signum();
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let m = remaining.len();
        let ear = (0..m).find(|&i| {
            let prev = remaining[(i + m - 1) % m];
            let cur = remaining[i];
            let next = remaining[(i + 1) % m];
            is_ear(points, &remaining, prev, cur, next, orientation)
        });

        match ear {
            Some(i) => {
                let prev = remaining[(i + m - 1) % m];
                let next = remaining[(i + 1) % m];
                triangles.push([prev, remaining[i], next]);
                remaining.remove(i);
            }
            None => {
                for i in 1..m - 1 {
                    triangles.push([remaining[0], remaining[i], remaining[i + 1]]);
                }
                return triangles;
            }
        }
    }

    triangles.push([remaining[0], remaining[1], remaining[2]]);
    triangles
}

fn is_ear(
    points: &[[f32; 2]],
    remaining: &[usize],
    prev: usize,
    cur: usize,
    next: usize,
    orientation: f32,
) -> bool {
    let (a, b, c) = (points[prev], points[cur], points[next]);
    if cross(sub(b, a), sub(c, b)) * orientation <= 0.0 {
        return false;
    }
    remaining
        .iter()
        .filter(|&&i| i != prev && i != cur && i != next)
        .map(|&i| points[i])
        .filter(|&p| p != a && p != b && p != c)
        .all(|p| !in_triangle(p, a, b, c))
}

fn in_triangle(p: [f32; 2], a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> bool {
    let d1 = cross(sub(b, a), sub(p, a));
    let d2 = cross(sub(c, b), sub(p, b));
    let d3 = cross(sub(a, c), sub(p, c));
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

// Segments needing more dash boundaries than this are drawn solid.
const MAX_DASHES_PER_SEGMENT: f64 = 4096.0;

fn to_f64(p: [f32; 2]) -> [f64; 2] {
    [f64::from(p[0]), f64::from(p[1])]
}

fn lerp64(a: [f64; 2], b: [f64; 2], t: f64) -> [f64; 2] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
}

fn distance64(a: [f64; 2], b: [f64; 2]) -> f64 {
    (b[0] - a[0]).hypot(b[1] - a[1])
}

fn narrow(p: [f64; 2]) -> [f32; 2] {
    [p[0] as f32, p[1] as f32]
}

/// Splits a polyline into the "on" runs of a dash pattern that has already
/// advanced `offset` pixels before the first point.
pub fn dash_polyline(
    points: &[[f32; 2]],
    closed: bool,
    pattern: &[f32],
    offset: f64,
) -> Vec<Vec<[f32; 2]>> {
    let pattern: Vec<f64> = pattern.iter().map(|&len| f64::from(len.max(0.0))).collect();
    let period: f64 = pattern.iter().sum();
    if points.len() < 2 || !(period > 0.0 && period.is_finite()) {
        return vec![points.to_vec()];
    }
    // with an odd number of entries on and off swap every other period
    let cycle = if pattern.len() % 2 == 0 { period } else { period * 2.0 };

    let mut path = points.to_vec();
    if closed {
        path.push(points[0]);
    }

    let mut index = 0;
    let mut on = true;
    let mut remaining = pattern[0];
    let mut phase = if offset.is_finite() { offset.rem_euclid(cycle) } else { 0.0 };
    for _ in 0..2 * pattern.len() {
        if phase <= 0.0 || phase < remaining {
            break;
        }
        phase -= remaining;
        on = !on;
        index = (index + 1) % pattern.len();
        remaining = pattern[index];
    }
    remaining = (remaining - phase).max(0.0);

    let mut dashes = Vec::new();
    let mut current = vec![path[0]];

    for pair in path.windows(2) {
        let (a, b) = (to_f64(pair[0]), to_f64(pair[1]));
        let len = distance64(a, b);
        if !(len > 0.0 && len.is_finite()) {
            continue;
        }

        if len / period * pattern.len() as f64 > MAX_DASHES_PER_SEGMENT {
            if !on {
                current = vec![pair[0]];
                on = true;
                index = (index + 1) % pattern.len();
                remaining = pattern[index];
            }
            current.push(pair[1]);
            continue;
        }

        let mut travelled = 0.0;
        while len - travelled > remaining {
            travelled += remaining;
            let p = narrow(lerp64(a, b, travelled / len));
            if on {
                current.push(p);
                dashes.push(std::mem::take(&mut current));
            } else {
                current = vec![p];
            }
            on = !on;
            index = (index + 1) % pattern.len();
            remaining = pattern[index];
        }
        remaining -= len - travelled;
        if on {
            current.push(pair[1]);
        }
    }

    if on && current.len() >= 2 {
        dashes.push(current);
    }
    dashes
}

/// Parameter range `t0..=t1` of the segment `a -> b` that lies inside the box
/// `min..=max`, or `None` when it misses the box.
pub fn clip_segment(a: [f64; 2], b: [f64; 2], min: [f64; 2], max: [f64; 2]) -> Option<(f64, f64)> {
    let d = [b[0] - a[0], b[1] - a[1]];
    if !(a[0].is_finite() && a[1].is_finite() && d[0].is_finite() && d[1].is_finite()) {
        return None;
    }

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for axis in 0..2 {
        for (p, q) in [(-d[axis], a[axis] - min[axis]), (d[axis], max[axis] - a[axis])] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else if r < t0 {
                return None;
            } else {
                t1 = t1.min(r);
            }
        }
    }
    Some((t0, t1))
}

/// A visible piece of a clipped polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct ClippedRun {
    pub points: Vec<[f32; 2]>,
    /// Path length before the first point, for dash phase.
    pub offset: f64,
}

/// Cuts a polyline down to the parts inside the box `min..=max`.
///
/// Runs are always open. A closed outline is walked from a vertex outside the
/// box so that its seam is never inside.
pub fn clip_polyline(points: &[[f64; 2]], closed: bool, min: [f64; 2], max: [f64; 2]) -> Vec<ClippedRun> {
    if points.len() < 2 {
        return Vec::new();
    }
    let inside = |p: [f64; 2]| p[0] >= min[0] && p[0] <= max[0] && p[1] >= min[1] && p[1] <= max[1];

    let mut path = points.to_vec();
    let mut travelled = 0.0;
    let mut perimeter = f64::INFINITY;
    if closed {
        let seam = points.iter().position(|&p| !inside(p)).unwrap_or(0);
        perimeter = (0..points.len())
            .map(|i| distance64(points[i], points[(i + 1) % points.len()]))
            .sum();
        travelled = points[..=seam].windows(2).map(|w| distance64(w[0], w[1])).sum();
        path = points[seam..].iter().chain(&points[..=seam]).copied().collect();
    }

    let mut runs = Vec::new();
    let mut current: Option<ClippedRun> = None;
    for pair in path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let len = distance64(a, b);
        match clip_segment(a, b, min, max) {
            Some((t0, t1)) => {
                let end = narrow(lerp64(a, b, t1));
                match &mut current {
                    Some(run) if t0 == 0.0 => run.points.push(end),
                    slot => {
                        let mut offset = travelled + t0 * len;
                        if offset >= perimeter {
                            offset -= perimeter;
                        }
                        runs.extend(slot.replace(ClippedRun {
                            points: vec![narrow(lerp64(a, b, t0)), end],
                            offset,
                        }));
                    }
                }
                if t1 < 1.0 {
                    runs.extend(current.take());
                }
            }
            None => runs.extend(current.take()),
        }
        travelled += len;
    }
    runs.extend(current);
    runs
}

/// Strokes a polyline with bevel joins, honouring caps and dashes.
pub fn stroke_polyline(
    mesh: &mut Mesh<Vertex>,
    points: &[[f32; 2]],
    closed: bool,
    style: &StrokeStyle<'_>,
    color: [f32; 4],
) {
    if points.len() < 2 || style.width <= 0.0 {
        return;
    }

    if !style.dash.is_empty() {
        for dash in dash_polyline(points, closed, style.dash, style.dash_offset) {
            stroke_run(mesh, &dash, false, style, color);
        }
    } else {
        stroke_run(mesh, points, closed, style, color);
    }
}

fn stroke_run(
    mesh: &mut Mesh<Vertex>,
    points: &[[f32; 2]],
    closed: bool,
    style: &StrokeStyle<'_>,
    color: [f32; 4],
) {
    let half = style.width * 0.5;
    let mut path: Vec<[f32; 2]> = Vec::with_capacity(points.len() + 1);
    for &p in points {
        if path.last() != Some(&p) {
            path.push(p);
        }
    }
    if closed && path.len() > 1 && path.first() == path.last() {
        path.pop();
    }
    let closed = closed && path.len() > 2;
    if closed {
        path.push(path[0]);
    }
    if path.len() < 2 {
        return;
    }

    let last = path.len() - 2;
    for (i, pair) in path.windows(2).enumerate() {
        let (mut p1, mut p2) = (pair[0], pair[1]);
        let d = sub(p2, p1);
        let len = length(d);
        let dir = [d[0] / len, d[1] / len];

        if !closed && style.cap == LineCap::Square {
            if i == 0 {
                p1 = [p1[0] - dir[0] * half, p1[1] - dir[1] * half];
            }
            if i == last {
                p2 = [p2[0] + dir[0] * half, p2[1] + dir[1] * half];
            }
        }

        let nx = -dir[1] * half;
        let ny = dir[0] * half;
        fill_quad(
            mesh,
            [
                [p1[0] - nx, p1[1] - ny],
                [p1[0] + nx, p1[1] + ny],
                [p2[0] + nx, p2[1] + ny],
                [p2[0] - nx, p2[1] - ny],
            ],
            color,
        );
    }

    let join_count = if closed { path.len() - 1 } else { path.len() - 2 };
    for j in 0..join_count {
        let at = (j + 1) % (path.len() - 1);
        let before = if at == 0 { path[path.len() - 2] } else { path[at - 1] };
        bevel(mesh, before, path[at], path[at + 1], half, color);
    }

    if !closed && style.cap == LineCap::Round {
        round_cap(mesh, path[0], path[1], half, color);
        round_cap(mesh, path[path.len() - 1], path[path.len() - 2], half, color);
    }
}

fn unit_normal(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    let d = sub(b, a);
    let len = length(d);
    [-d[1] / len, d[0] / len]
}

fn bevel(mesh: &mut Mesh<Vertex>, a: [f32; 2], v: [f32; 2], b: [f32; 2], half: f32, color: [f32; 4]) {
    let n1 = unit_normal(a, v);
    let n2 = unit_normal(v, b);
    for side in [1.0, -1.0] {
        let base = mesh.base();
        mesh.vertices.extend_from_slice(&[
            vertex(v, color),
            vertex([v[0] + n1[0] * half * side, v[1] + n1[1] * half * side], color),
            vertex([v[0] + n2[0] * half * side, v[1] + n2[1] * half * side], color),
        ]);
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
}

// Half disc at `end`, bulging away from `toward`.
fn round_cap(mesh: &mut Mesh<Vertex>, end: [f32; 2], toward: [f32; 2], half: f32, color: [f32; 4]) {
    let d = sub(end, toward);
    let start = d[1].atan2(d[0]) - TAU / 4.0;
    let ring = ellipse_points(end, half, half, start, TAU / 2.0, segment_count(half, TAU / 2.0), false);
    fill_fan(mesh, end, &ring, color);
}

/// Number of line segments to approximate an arc of `extent` radians.
pub fn segment_count(radius: f32, extent: f32) -> usize {
    let per_turn = (radius.max(1.0).sqrt() * 8.0).clamp(12.0, 256.0);
    ((per_turn * extent.abs() / TAU).ceil() as usize).max(2)
}

/// Points along an elliptic arc. With `y_up`, positive angles run
/// counter-clockwise on screen even though screen y grows downward.
pub fn ellipse_points(
    center: [f32; 2],
    radius_x: f32,
    radius_y: f32,
    start: f32,
    extent: f32,
    segments: usize,
    y_up: bool,
) -> Vec<[f32; 2]> {
    let sign = if y_up { -1.0 } else { 1.0 };
    (0..=segments)
        .map(|i| {
            let angle = start + extent * i as f32 / segments as f32;
            [
                center[0] + radius_x * angle.cos(),
                center[1] + sign * radius_y * angle.sin(),
            ]
        })
        .collect()
}
