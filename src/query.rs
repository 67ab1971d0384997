//! Screen-space query regions and the tile they are evaluated against.

use cgmath::Point2;

use crate::data_structures::{bucket::Bucket, tile::UnwrappedTileId};

/// A hover or click region in screen pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryRegion {
    /// A single point grown by `tolerance` pixels on every side.
    Point {
        position: Point2<f64>,
        tolerance: f64,
    },
    /// An arbitrary (possibly concave) polygon, e.g. from a box selection.
    Polygon(Vec<Point2<f64>>),
}

impl QueryRegion {
    pub fn point(x: f64, y: f64, tolerance: f64) -> Self {
        QueryRegion::Point {
            position: Point2::new(x, y),
            tolerance,
        }
    }

    pub fn polygon(points: Vec<Point2<f64>>) -> Self {
        QueryRegion::Polygon(points)
    }

    pub fn is_point_query(&self) -> bool {
        matches!(self, QueryRegion::Point { .. })
    }

    /// The region as a polygon: the tolerance rectangle for point queries
    /// (the bare point when tolerance is zero), the polygon itself otherwise.
    pub fn screen_geometry(&self) -> Vec<Point2<f64>> {
        match self {
            QueryRegion::Point {
                position,
                tolerance,
            } => {
                let r = tolerance.abs();
                if r == 0.0 {
                    return vec![*position];
                }
                vec![
                    Point2::new(position.x - r, position.y - r),
                    Point2::new(position.x + r, position.y - r),
                    Point2::new(position.x + r, position.y + r),
                    Point2::new(position.x - r, position.y + r),
                ]
            }
            QueryRegion::Polygon(points) => points.clone(),
        }
    }
}

/// The tile a query is resolved in, with the layer's bucket for that tile.
#[derive(Clone, Debug)]
pub struct QueryTile {
    pub tile_id: UnwrappedTileId,
    pub bucket: Option<Bucket>,
}

impl QueryTile {
    pub fn new(tile_id: UnwrappedTileId, bucket: Option<Bucket>) -> Self {
        Self { tile_id, bucket }
    }

    pub fn get_bucket(&self) -> Option<&Bucket> {
        self.bucket.as_ref()
    }
}

/// A query region paired with the tile it is tested in.
#[derive(Clone, Debug)]
pub struct TilespaceQuery {
    pub tile: QueryTile,
    pub region: QueryRegion,
}

impl TilespaceQuery {
    pub fn new(tile: QueryTile, region: QueryRegion) -> Self {
        Self { tile, region }
    }
}
