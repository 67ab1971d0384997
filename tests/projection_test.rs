use model_query::{
    Matrix4, Point2, SquareMatrix, Vector3,
    camera::CameraTransform,
    config::PickConfig,
    data_structures::aabb::Aabb,
    projection::{AabbProjector, convex_hull, polygon_area, polygons_intersect},
    query::QueryRegion,
};

use crate::common::test_utils::*;

mod common;

fn projector() -> AabbProjector {
    AabbProjector::new(VIEWPORT, VIEWPORT, &PickConfig::default())
}

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2<f64>> {
    vec![
        Point2::new(x0, y0),
        Point2::new(x1, y0),
        Point2::new(x1, y1),
        Point2::new(x0, y1),
    ]
}

#[test]
fn should_project_box_to_its_screen_footprint() {
    let camera = ortho_camera();
    let aabb = Aabb::new([10.0, 20.0, 0.0], [30.0, 60.0, 5.0]);

    let projected = projector().project(&camera.proj_matrix(), &aabb).unwrap();

    assert_eq!(projected.footprint.len(), 4);
    assert!((polygon_area(&projected.footprint) - 20.0 * 40.0).abs() < 1e-6);
    assert!((projected.depth + 0.005).abs() < 1e-12);
}

#[test]
fn should_reject_box_fully_behind_the_camera() {
    let camera = perspective_camera();
    // The camera sits at z = 1000 looking down.
    let behind = Aabb::new([4000.0, 4000.0, 1500.0], [4200.0, 4200.0, 2500.0]);
    let in_front = Aabb::new([4086.0, 4086.0, 0.0], [4106.0, 4106.0, 10.0]);
    let center = QueryRegion::point(4096.0, 4096.0, 2.0);

    assert_eq!(
        projector().query_intersects_projected_aabb(&center, &camera.proj_matrix(), &behind),
        None
    );
    let depth = projector()
        .query_intersects_projected_aabb(&center, &camera.proj_matrix(), &in_front)
        .unwrap();
    assert!(depth > -1.0 && depth < 1.0);
}

#[test]
fn should_order_depth_by_distance_from_camera() {
    let camera = perspective_camera();
    let center = QueryRegion::point(4096.0, 4096.0, 0.0);
    let near = Aabb::new([4086.0, 4086.0, 500.0], [4106.0, 4106.0, 510.0]);
    let far = Aabb::new([4086.0, 4086.0, 0.0], [4106.0, 4106.0, 10.0]);

    let near_depth = projector()
        .query_intersects_projected_aabb(&center, &camera.proj_matrix(), &near)
        .unwrap();
    let far_depth = projector()
        .query_intersects_projected_aabb(&center, &camera.proj_matrix(), &far)
        .unwrap();

    assert!(near_depth < far_depth);
}

#[test]
fn should_reject_off_screen_and_flat_footprints() {
    let camera = ortho_camera();
    let off_screen = Aabb::new([-500.0, -500.0, 0.0], [-100.0, -100.0, 10.0]);
    // Zero extent on both horizontal axes projects to a single point.
    let needle = Aabb::new([100.0, 100.0, 0.0], [100.0, 100.0, 50.0]);

    assert_eq!(projector().project(&camera.proj_matrix(), &off_screen), None);
    assert_eq!(projector().project(&camera.proj_matrix(), &needle), None);
}

#[test]
fn should_reject_non_finite_matrices() {
    let mut matrix = ortho_camera().proj_matrix();
    matrix.w.x = f64::INFINITY;
    let aabb = Aabb::new([0.0; 3], [100.0; 3]);

    assert_eq!(projector().project(&matrix, &aabb), None);
    assert_eq!(projector().project(&(Matrix4::identity() * f64::NAN), &aabb), None);
}

#[test]
fn should_test_polygon_queries_against_the_footprint() {
    let camera = ortho_camera();
    let aabb = Aabb::new([100.0, 100.0, 0.0], [200.0, 200.0, 10.0]);
    let m = camera.proj_matrix();

    let enclosing = QueryRegion::polygon(square(0.0, 0.0, 1000.0, 1000.0));
    let crossing = QueryRegion::polygon(vec![
        Point2::new(150.0, 0.0),
        Point2::new(160.0, 0.0),
        Point2::new(155.0, 400.0),
    ]);
    let disjoint = QueryRegion::polygon(square(300.0, 300.0, 400.0, 400.0));

    assert!(projector().query_intersects_projected_aabb(&enclosing, &m, &aabb).is_some());
    assert!(projector().query_intersects_projected_aabb(&crossing, &m, &aabb).is_some());
    assert_eq!(projector().query_intersects_projected_aabb(&disjoint, &m, &aabb), None);
}

#[test]
fn should_grow_point_queries_by_tolerance() {
    let camera = ortho_camera();
    let aabb = Aabb::new([100.0, 100.0, 0.0], [200.0, 200.0, 10.0]);
    let m = camera.proj_matrix();

    let exact = QueryRegion::point(95.0, 150.0, 0.0);
    let tolerant = QueryRegion::point(95.0, 150.0, 6.0);

    assert_eq!(projector().query_intersects_projected_aabb(&exact, &m, &aabb), None);
    assert!(projector().query_intersects_projected_aabb(&tolerant, &m, &aabb).is_some());
}

#[test]
fn should_use_translated_matrix_for_placement() {
    let camera = ortho_camera();
    let model = Matrix4::from_translation(Vector3::new(1000.0, 0.0, 0.0));
    let aabb = Aabb::new([0.0, 0.0, 0.0], [10.0, 10.0, 10.0]);
    let m = camera.proj_matrix() * model;

    let moved = QueryRegion::point(1005.0, 5.0, 0.0);
    let origin = QueryRegion::point(5.0, 5.0, 0.0);

    assert!(projector().query_intersects_projected_aabb(&moved, &m, &aabb).is_some());
    assert_eq!(projector().query_intersects_projected_aabb(&origin, &m, &aabb), None);
}

#[test]
fn should_intersect_concave_polygons_correctly() {
    // A "U" whose notch contains the small square without touching it.
    let u_shape = vec![
        Point2::new(0.0, 0.0),
        Point2::new(30.0, 0.0),
        Point2::new(30.0, 30.0),
        Point2::new(20.0, 30.0),
        Point2::new(20.0, 10.0),
        Point2::new(10.0, 10.0),
        Point2::new(10.0, 30.0),
        Point2::new(0.0, 30.0),
    ];
    let in_notch = square(12.0, 15.0, 18.0, 25.0);
    let on_arm = square(22.0, 15.0, 28.0, 25.0);

    assert!(!polygons_intersect(&u_shape, &in_notch));
    assert!(polygons_intersect(&u_shape, &on_arm));
}

#[test]
fn should_build_convex_hull_of_projected_corners() {
    let mut points = square(0.0, 0.0, 10.0, 10.0);
    points.push(Point2::new(5.0, 5.0));
    points.push(Point2::new(10.0, 10.0));
    points.push(Point2::new(5.0, 0.0));

    let hull = convex_hull(points);

    assert_eq!(hull.len(), 4);
    assert!((polygon_area(&hull) - 100.0).abs() < 1e-12);
}
