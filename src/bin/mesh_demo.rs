use cfdmesh::geometry::{Contour, FlattenTolerance};
use cfdmesh::mesh::QuadMesh;
use cfdmesh::outline::{beziergons_from_commands, parse_path_data};
use nalgebra::Point2;

// Blob outline in top-down page coordinates (page height 400).
const OUTLINE: &str = "M 272,160 C 272,110 222,70 180,70 C 130,70 88,110 88,160 \
                       C 88,210 130,252 180,252 C 222,252 272,210 272,160 Z";
const PAGE_HEIGHT: f64 = 400.0;

fn main() {
    env_logger::init();

    let commands = parse_path_data(OUTLINE);
    let outlines = beziergons_from_commands(&commands, PAGE_HEIGHT);
    println!(
        "ingested {} command(s) into {} outline(s)",
        commands.len(),
        outlines.len()
    );

    let tol = FlattenTolerance::default();
    for (n, outline) in outlines.iter().enumerate() {
        let poly = outline.approximate_by_polygon(&tol, 1000);
        println!(
            "outline {}: {} curves ({} endpoints, {} controls) flattened to {} sides (perimeter {:.1})",
            n,
            outline.num_curves(),
            outline.end_points().len(),
            outline.control_points().len(),
            poly.num_sides(),
            poly.total_length()
        );

        let mut mesh = QuadMesh::new(Point2::new(0.0, 0.0), 8, 8, 50.0, 2.0);
        mesh.refine_along_polygon(&poly);

        let fluid = mesh.leaf_elements().len();
        println!(
            "mesh: {} elements, {} fluid leaves, {} cell outline points",
            mesh.num_elements(),
            fluid,
            mesh.leaf_point_list().len()
        );
        if let Some(bb) = poly.bounding_box() {
            println!(
                "obstacle bounds: {} to {}, defining points {}",
                bb.min(),
                bb.max(),
                poly.defining_points().len()
            );
        }
    }

    // Point-location walkthrough: repeatedly split the leaf under one
    // probe point down to the floor.
    let mut mesh = QuadMesh::new(Point2::new(0.0, 0.0), 10, 10, 100.0, 1.0);
    let probe = Point2::new(320.0, 220.0);
    loop {
        let Some(id) = mesh.element_at_point(probe) else {
            break;
        };
        println!(
            "leaf under {}: center {} size {}",
            probe,
            mesh.element(id).center,
            mesh.element(id).cell_size
        );
        if !mesh.split(id) {
            break;
        }
    }
}
