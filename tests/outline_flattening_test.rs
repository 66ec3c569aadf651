use cfdmesh::geometry::{Beziergon, Contour, CubicBezier, FlattenTolerance};
use cfdmesh::outline::{beziergons_from_commands, parse_path_data, polygons_from_commands, PathCommand};
use nalgebra::Point2;

const CIRCLE_K: f64 = 0.552_284_749_830_793_6;

/// Four-arc cubic approximation of a circle, already in the bottom-up
/// geometry frame.
fn circle_beziergon(cx: f64, cy: f64, r: f64) -> Beziergon {
    let k = CIRCLE_K * r;
    let p = |x: f64, y: f64| Point2::new(x, y);
    Beziergon::new(vec![
        CubicBezier::new(p(cx + r, cy), p(cx + r, cy + k), p(cx + k, cy + r), p(cx, cy + r)),
        CubicBezier::new(p(cx, cy + r), p(cx - k, cy + r), p(cx - r, cy + k), p(cx - r, cy)),
        CubicBezier::new(p(cx - r, cy), p(cx - r, cy - k), p(cx - k, cy - r), p(cx, cy - r)),
        CubicBezier::new(p(cx, cy - r), p(cx + k, cy - r), p(cx + r, cy - k), p(cx + r, cy)),
    ])
}

#[test]
fn golden_point_in_polygon_values() {
    // Fixed outline (circle of radius 92 around (180, 240)) flattened at
    // the default tolerance; these containment verdicts are regression
    // values for that configuration.
    let poly = circle_beziergon(180.0, 240.0, 92.0)
        .approximate_by_polygon(&FlattenTolerance::default(), 1000);

    let cases = [
        (Point2::new(250.0, 210.0), true),
        (Point2::new(140.0, 150.0), false),
        (Point2::new(280.0, 320.0), false),
        (Point2::new(95.0, 260.0), true),
        (Point2::new(180.0, 60.0), false),
    ];
    for (p, expected) in cases {
        assert_eq!(poly.contains_point(p), expected, "containment of {}", p);
    }
}

#[test]
fn flattening_terminates_with_all_segments_linear() {
    let tol = FlattenTolerance::default();
    let flat = circle_beziergon(0.0, 0.0, 92.0).repeatedly_refine(&tol, 1000);
    assert!(flat.num_curves() < 1000);
    assert!(flat.curves.iter().all(|c| c.is_linear(&tol)));
}

#[test]
fn parse_absolute_commands() {
    let cmds = parse_path_data("M 10,20 L 30,20 C 35,20 40,25 40,30 Z");
    assert_eq!(
        cmds,
        vec![
            PathCommand::Move {
                to: Point2::new(10.0, 20.0),
                relative: false
            },
            PathCommand::Line {
                to: Point2::new(30.0, 20.0),
                relative: false
            },
            PathCommand::Curve {
                control1: Point2::new(35.0, 20.0),
                control2: Point2::new(40.0, 25.0),
                to: Point2::new(40.0, 30.0),
                relative: false
            },
            PathCommand::Close,
        ]
    );
}

#[test]
fn parse_skips_unknown_commands_and_bad_operands() {
    // Q (quadratic) is unsupported; "bogus" is not a point. Both vanish
    // without aborting the load.
    let cmds = parse_path_data("M 0,0 Q bogus L 10,0 z");
    assert_eq!(
        cmds,
        vec![
            PathCommand::Move {
                to: Point2::new(0.0, 0.0),
                relative: false
            },
            PathCommand::Line {
                to: Point2::new(10.0, 0.0),
                relative: false
            },
            PathCommand::Close,
        ]
    );
}

#[test]
fn implicit_line_after_move_operands() {
    let cmds = parse_path_data("M 0,0 5,5");
    assert_eq!(cmds.len(), 2);
    assert!(matches!(cmds[1], PathCommand::Line { .. }));
}

#[test]
fn ingestion_mirrors_the_y_axis() {
    let cmds = parse_path_data("M 10,10 L 20,10");
    let gons = beziergons_from_commands(&cmds, 100.0);
    assert_eq!(gons.len(), 1);
    let c = gons[0].curves[0];
    assert_eq!(c.p0, Point2::new(10.0, 90.0));
    assert_eq!(c.p3, Point2::new(20.0, 90.0));
}

#[test]
fn relative_commands_accumulate_before_mirroring() {
    let cmds = parse_path_data("m 10,10 l 20,0 l 0,20");
    let gons = beziergons_from_commands(&cmds, 100.0);
    let curves = &gons[0].curves;
    assert_eq!(curves[0].p0, Point2::new(10.0, 90.0));
    assert_eq!(curves[0].p3, Point2::new(30.0, 90.0));
    // +20 in the top-down source frame is -20 after mirroring.
    assert_eq!(curves[1].p3, Point2::new(30.0, 70.0));
}

#[test]
fn close_adds_a_closing_segment_only_when_needed() {
    // Open triangle: close must add the missing segment.
    let open = parse_path_data("M 0,0 L 10,0 L 10,10 Z");
    let gons = beziergons_from_commands(&open, 100.0);
    assert_eq!(gons[0].num_curves(), 3);
    assert_eq!(gons[0].curves.last().unwrap().p3, gons[0].curves[0].p0);

    // Already-closed loop: a zero-length closing curve is elided.
    let closed = parse_path_data("M 0,0 L 10,0 L 10,10 L 0,0 Z");
    let gons = beziergons_from_commands(&closed, 100.0);
    assert_eq!(gons[0].num_curves(), 3);
}

#[test]
fn one_beziergon_per_closed_path() {
    let cmds = parse_path_data("M 0,0 L 10,0 L 10,10 Z M 50,50 L 60,50 L 60,60 Z");
    let gons = beziergons_from_commands(&cmds, 100.0);
    assert_eq!(gons.len(), 2);
}

#[test]
fn curve_commands_ingest_as_cubics() {
    let cmds = parse_path_data("M 0,100 C 0,50 100,50 100,100 Z");
    let gons = beziergons_from_commands(&cmds, 100.0);
    let c = gons[0].curves[0];
    assert_eq!(c.p0, Point2::new(0.0, 0.0));
    assert_eq!(c.p1, Point2::new(0.0, 50.0));
    assert_eq!(c.p2, Point2::new(100.0, 50.0));
    assert_eq!(c.p3, Point2::new(100.0, 0.0));
}

#[test]
fn polygons_from_commands_filters_degenerate_segments() {
    // The doubled point produces a zero-length chord that must not
    // survive into the polygon.
    let cmds = parse_path_data("M 0,0 L 10,0 L 10,0 L 10,10 Z");
    let polys = polygons_from_commands(&cmds, 100.0, &FlattenTolerance::default(), 1000);
    assert_eq!(polys.len(), 1);
    assert!(polys[0].lines.iter().all(|l| !l.is_degenerate()));
    assert_eq!(polys[0].num_sides(), 3);
}

#[test]
fn contour_samples_follow_the_ingested_curve() {
    let cmds = parse_path_data("M 0,100 C 0,50 100,50 100,100 Z");
    let gons = beziergons_from_commands(&cmds, 100.0);
    let samples = gons[0].sample_uniform(8);
    assert_eq!(samples.len(), gons[0].num_curves() * 8);
    assert_eq!(samples[0], Point2::new(0.0, 0.0));
}
