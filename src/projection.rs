//! Screen-space tests of projected bounding boxes.
//!
//! A bounding box is pushed through a model-to-clip matrix, its corners are
//! mapped to viewport pixels and the convex hull of those pixels is the box's
//! footprint. Collision checks against the query happen on that footprint;
//! the reported depth is the nearest normalized device depth of the box.

use cgmath::{Matrix4, Point2, Vector4};

use crate::{config::PickConfig, data_structures::aabb::Aabb, query::QueryRegion};

/// A bounding box after projection.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedAabb {
    /// Convex hull of the visible corners, counter-clockwise in screen pixels.
    pub footprint: Vec<Point2<f64>>,
    /// Smallest normalized device depth among the visible corners.
    pub depth: f64,
}

impl ProjectedAabb {
    pub fn intersects(&self, query: &[Point2<f64>]) -> bool {
        polygons_intersect(query, &self.footprint)
    }
}

/// Projects boxes into a viewport of a given size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AabbProjector {
    width: f64,
    height: f64,
    min_area: f64,
    w_epsilon: f64,
}

impl AabbProjector {
    pub fn new(width: f64, height: f64, config: &PickConfig) -> Self {
        Self {
            width,
            height,
            min_area: config.min_footprint_area,
            w_epsilon: config.clip_w_epsilon,
        }
    }

    /// `None` when nothing of the box is visible: malformed input, every
    /// corner behind the camera, a footprint fully outside the viewport, or a
    /// footprint without area.
    pub fn project(
        &self,
        world_view_projection: &Matrix4<f64>,
        aabb: &Aabb,
    ) -> Option<ProjectedAabb> {
        let matrix = *world_view_projection;
        let columns: [[f64; 4]; 4] = matrix.into();
        if !aabb.is_valid() || columns.iter().flatten().any(|v| !v.is_finite()) {
            return None;
        }

        let mut screen = Vec::with_capacity(8);
        let mut depth = f64::MAX;
        for corner in aabb.corners() {
            let clip = matrix * Vector4::new(corner.x, corner.y, corner.z, 1.0);
            if clip.w <= self.w_epsilon {
                continue;
            }
            let ndc = clip.truncate() / clip.w;
            let point = Point2::new(
                (0.5 * ndc.x + 0.5) * self.width,
                (0.5 - 0.5 * ndc.y) * self.height,
            );
            if !(point.x.is_finite() && point.y.is_finite() && ndc.z.is_finite()) {
                return None;
            }
            screen.push(point);
            depth = depth.min(ndc.z);
        }
        if screen.is_empty() {
            return None;
        }

        let (min, max) = bounds(&screen);
        if max.x < 0.0 || max.y < 0.0 || min.x > self.width || min.y > self.height {
            return None;
        }

        let footprint = convex_hull(screen);
        if polygon_area(&footprint) < self.min_area {
            return None;
        }
        Some(ProjectedAabb { footprint, depth })
    }

    /// Depth of the box if its footprint overlaps the query, `None` otherwise.
    pub fn query_intersects_projected_aabb(
        &self,
        query: &QueryRegion,
        world_view_projection: &Matrix4<f64>,
        aabb: &Aabb,
    ) -> Option<f64> {
        let projected = self.project(world_view_projection, aabb)?;
        let query = query.screen_geometry();
        projected.intersects(&query).then_some(projected.depth)
    }
}

fn bounds(points: &[Point2<f64>]) -> (Point2<f64>, Point2<f64>) {
    points.iter().fold(
        (
            Point2::new(f64::MAX, f64::MAX),
            Point2::new(f64::MIN, f64::MIN),
        ),
        |(min, max), p| {
            (
                Point2::new(min.x.min(p.x), min.y.min(p.y)),
                Point2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        },
    )
}

fn cross(o: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Monotone chain hull. Collinear points are dropped.
pub fn convex_hull(mut points: Vec<Point2<f64>>) -> Vec<Point2<f64>> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points.dedup();
    if points.len() < 3 {
        return points;
    }

    let mut hull: Vec<Point2<f64>> = Vec::with_capacity(points.len() * 2);
    for &p in points.iter() {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    // Upper hull must not pop into the lower one.
    let lower_len = hull.len() + 1;
    for &p in points.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Unsigned shoelace area.
pub fn polygon_area(polygon: &[Point2<f64>]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let twice: f64 = polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice.abs() * 0.5
}

/// Even-odd containment test, valid for concave polygons.
pub fn polygon_contains_point(polygon: &[Point2<f64>], p: Point2<f64>) -> bool {
    let mut inside = false;
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn on_segment(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Closed segment intersection, touching endpoints included.
pub fn segments_intersect(
    a0: Point2<f64>,
    a1: Point2<f64>,
    b0: Point2<f64>,
    b1: Point2<f64>,
) -> bool {
    let d1 = cross(b0, b1, a0);
    let d2 = cross(b0, b1, a1);
    let d3 = cross(a0, a1, b0);
    let d4 = cross(a0, a1, b1);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1 == 0.0 && on_segment(a0, b0, b1))
        || (d2 == 0.0 && on_segment(a1, b0, b1))
        || (d3 == 0.0 && on_segment(b0, a0, a1))
        || (d4 == 0.0 && on_segment(b1, a0, a1))
}

fn edges(polygon: &[Point2<f64>]) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
    let n = polygon.len();
    (0..if n < 2 { 0 } else { n }).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

/// True if the polygons overlap: one contains a vertex of the other or
/// their boundaries cross. A one-point polygon acts as a point.
pub fn polygons_intersect(a: &[Point2<f64>], b: &[Point2<f64>]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a.iter().any(|&p| polygon_contains_point(b, p))
        || b.iter().any(|&p| polygon_contains_point(a, p))
    {
        return true;
    }
    edges(a).any(|(a0, a1)| edges(b).any(|(b0, b1)| segments_intersect(a0, a1, b0, b1)))
}
