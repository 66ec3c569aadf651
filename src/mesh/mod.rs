pub mod element;


pub use element::*;

use nalgebra::Point2;
use rayon::prelude::*;

use crate::geometry::{BoundingBox, Polygon, StraightLine};

/// Adaptive Cartesian quadtree mesh over a rectangular domain.
///
/// The mesh starts as a uniform row-major grid of root cells of the
/// maximum cell size; root (i, j) lives at `elements[j * nx + i]`. All
/// elements, roots and refinement children alike, live in one arena and
/// are addressed by `ElementId`. Refinement is monotonic: cells are only
/// ever split, never removed or resized.
pub struct QuadMesh {
    elements: Vec<Element>,
    origin: Point2<f64>,
    horizontal_count: usize,
    vertical_count: usize,
    max_cell_size: f64,
    min_cell_size: f64,
    bounding_box: BoundingBox,
}

impl QuadMesh {
    /// Builds the initial uniform grid of `nx * ny` root cells of size
    /// `max_cell_size` above and to the right of `origin`.
    pub fn new(
        origin: Point2<f64>,
        nx: usize,
        ny: usize,
        max_cell_size: f64,
        min_cell_size: f64,
    ) -> Self {
        assert!(nx > 0, "nx must be > 0");
        assert!(ny > 0, "ny must be > 0");
        assert!(max_cell_size > 0.0, "max_cell_size must be > 0");
        assert!(
            min_cell_size > 0.0 && min_cell_size < max_cell_size,
            "min_cell_size must be in (0, max_cell_size)"
        );

        let mut elements = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let center = origin
                    + nalgebra::Vector2::new(
                        (i as f64 + 0.5) * max_cell_size,
                        (j as f64 + 0.5) * max_cell_size,
                    );
                elements.push(Element::new(
                    center,
                    max_cell_size,
                    max_cell_size,
                    min_cell_size,
                    None,
                ));
            }
        }

        let half_width = nx as f64 * max_cell_size / 2.0;
        let half_height = ny as f64 * max_cell_size / 2.0;
        let center = origin + nalgebra::Vector2::new(half_width, half_height);

        Self {
            elements,
            origin,
            horizontal_count: nx,
            vertical_count: ny,
            max_cell_size,
            min_cell_size,
            bounding_box: BoundingBox::new(center, half_width, half_height),
        }
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub fn min_cell_size(&self) -> f64 {
        self.min_cell_size
    }

    pub fn max_cell_size(&self) -> f64 {
        self.max_cell_size
    }

    /// Ids of the root cells in row-major order.
    pub fn roots(&self) -> impl Iterator<Item = ElementId> + '_ {
        (0..self.horizontal_count * self.vertical_count).map(|i| ElementId(i as u32))
    }

    /// Finds the leaf containing `point`, or `None` if the point is
    /// outside the domain or the containing leaf is solid.
    ///
    /// Root selection is O(1) by floor division; a selected root that
    /// does not contain the point indicates index-arithmetic corruption
    /// and is fatal.
    pub fn element_at_point(&self, point: Point2<f64>) -> Option<ElementId> {
        if !self.bounding_box.contains(point) {
            return None;
        }

        let rel = (point - self.origin) / self.max_cell_size;
        // Containment is inclusive, so a point on the far domain edge
        // floors to one past the last root; clamp it back in.
        let i = (rel.x.floor() as usize).min(self.horizontal_count - 1);
        let j = (rel.y.floor() as usize).min(self.vertical_count - 1);

        let root = ElementId((j * self.horizontal_count + i) as u32);
        if !self.element(root).bounding_box().contains(point) {
            panic!(
                "root selection picked element at {} for point {}, which it does not contain",
                self.element(root).center,
                point
            );
        }

        self.descend(root, point)
    }

    /// Point location starting from an arbitrary element. If `start`'s
    /// box does not contain the point, the search restarts from the mesh
    /// root lookup instead of walking up the parent chain.
    pub fn locate_from(&self, start: ElementId, point: Point2<f64>) -> Option<ElementId> {
        if !self.element(start).bounding_box().contains(point) {
            return self.element_at_point(point);
        }
        self.descend(start, point)
    }

    /// Iterative descent from an element known to contain the point. Only
    /// the one child whose box contains the point is ever entered.
    fn descend(&self, start: ElementId, point: Point2<f64>) -> Option<ElementId> {
        let mut id = start;
        loop {
            let e = self.element(id);
            if e.is_leaf {
                return if e.is_solid() { None } else { Some(id) };
            }
            let children = e.children.expect("non-leaf element must have children");
            match children
                .iter()
                .find(|&&c| self.element(c).bounding_box().contains(point))
            {
                Some(&c) => id = c,
                None => panic!(
                    "element at {} contains point {} but none of its children do",
                    e.center, point
                ),
            }
        }
    }

    /// Splits a leaf into 4 equal children (top-left, top-right,
    /// bottom-right, bottom-left) and rebalances the neighbourhood.
    /// Returns false without changing the tree if the element is not a
    /// leaf or the split would violate the minimum cell size.
    pub fn split(&mut self, id: ElementId) -> bool {
        let e = self.element(id);
        if !e.is_leaf {
            log::warn!("split requested on non-leaf element at {}", e.center);
            return false;
        }
        let new_size = e.cell_size / 2.0;
        if new_size <= e.min_cell_size {
            log::warn!(
                "split requested below minimum cell size at {} (size {})",
                e.center,
                e.cell_size
            );
            return false;
        }

        let center = e.center;
        let max_cell_size = e.max_cell_size;
        let min_cell_size = e.min_cell_size;
        let quarter = new_size / 2.0;
        let child_centers = [
            Point2::new(center.x - quarter, center.y + quarter),
            Point2::new(center.x + quarter, center.y + quarter),
            Point2::new(center.x + quarter, center.y - quarter),
            Point2::new(center.x - quarter, center.y - quarter),
        ];

        let mut children = [ElementId(0); 4];
        for (slot, child_center) in children.iter_mut().zip(child_centers) {
            *slot = ElementId(self.elements.len() as u32);
            self.elements.push(Element::new(
                child_center,
                new_size,
                max_cell_size,
                min_cell_size,
                Some(id),
            ));
        }

        let e = &mut self.elements[id.index()];
        e.is_leaf = false;
        e.children = Some(children);

        for child in children {
            self.fix_neighbour_cell_sizes(child);
        }
        true
    }

    /// Face neighbour lookup. The probe point sits
    /// `(cell_size + min_cell_size) / 2` from the center, which lands
    /// inside the neighbour regardless of its refinement level. The
    /// cached link is only a starting hint for point location; the
    /// answer is always re-derived, since the neighbour may have been
    /// split since the cache was filled.
    pub fn neighbour(&mut self, id: ElementId, direction: Direction) -> Option<ElementId> {
        let e = self.element(id);
        let distance = (e.cell_size + e.min_cell_size) / 2.0;
        let probe = e.center + direction.offset() * distance;

        let hint = e.neighbours[direction.index()].or(e.parent);
        let found = match hint {
            Some(start) => self.locate_from(start, probe),
            None => self.element_at_point(probe),
        };

        self.elements[id.index()].neighbours[direction.index()] = found;
        found
    }

    /// Incremental 2:1 balance: after a split, any neighbour more than
    /// twice the size of this leaf is split in turn (which recursively
    /// rebalances around it) until all four sides conform.
    fn fix_neighbour_cell_sizes(&mut self, id: ElementId) {
        for direction in Direction::ALL {
            loop {
                if !self.element(id).is_leaf {
                    return;
                }
                let Some(n) = self.neighbour(id, direction) else {
                    break;
                };
                if self.element(n).cell_size > 2.0 * self.element(id).cell_size {
                    self.split(n);
                } else {
                    break;
                }
            }
        }
    }

    /// Refines the mesh to the minimum cell size everywhere along the
    /// line. The sample spacing never exceeds the minimum cell size, so
    /// no cell on the line can be skipped.
    pub fn refine_along_line(&mut self, line: &StraightLine) {
        let steps = ((line.length() / self.min_cell_size).ceil() as usize).max(1);
        for k in 0..=steps {
            let p = line.point_at(k as f64 / steps as f64);
            self.refine_at_point(p);
        }
    }

    /// Repeatedly splits the cell containing `point` and the four cells
    /// surrounding it until the whole neighbourhood is at the minimum
    /// cell size.
    fn refine_at_point(&mut self, point: Point2<f64>) {
        loop {
            let Some(center) = self.element_at_point(point) else {
                return;
            };

            let mut candidates = [Some(center), None, None, None, None];
            for (slot, direction) in candidates[1..].iter_mut().zip(Direction::ALL) {
                *slot = self.neighbour(center, direction);
            }

            let mut split_any = false;
            for id in candidates.into_iter().flatten() {
                let e = self.element(id);
                let splittable = e.is_leaf && e.cell_size / 2.0 > e.min_cell_size;
                if splittable && self.split(id) {
                    split_any = true;
                }
            }
            if !split_any {
                return;
            }
        }
    }

    /// Refines along every edge of the polygon, re-running solid-cell
    /// classification after each edge so classification tracks the mesh
    /// as it is built.
    pub fn refine_along_polygon(&mut self, polygon: &Polygon) {
        for line in polygon.lines.clone() {
            self.refine_along_line(&line);
            self.mark_solid_cells(polygon);
        }
    }

    /// Classifies every still-undetermined leaf: solid if the polygon
    /// fully contains its bounding box, fluid otherwise. Cells that were
    /// classified earlier are never re-opened.
    pub fn mark_solid_cells(&mut self, polygon: &Polygon) {
        let undetermined: Vec<(usize, BoundingBox)> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_leaf && e.kind == CellKind::Undetermined)
            .map(|(i, e)| (i, e.bounding_box()))
            .collect();

        let kinds: Vec<CellKind> = undetermined
            .par_iter()
            .map(|(_, bb)| {
                if polygon.contains_box(bb) {
                    CellKind::Solid
                } else {
                    CellKind::Fluid
                }
            })
            .collect();

        for ((i, _), kind) in undetermined.iter().zip(kinds) {
            self.elements[*i].kind = kind;
        }
    }

    /// All non-solid leaves, in depth-first order over the row-major
    /// root grid.
    pub fn leaf_elements(&self) -> Vec<ElementId> {
        let mut leaves = Vec::new();
        let mut stack: Vec<ElementId> = self.roots().collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            let e = self.element(id);
            if e.is_leaf {
                if !e.is_solid() {
                    leaves.push(id);
                }
            } else if let Some(children) = e.children {
                stack.extend(children.into_iter().rev());
            }
        }
        leaves
    }

    /// Cell outlines of all non-solid leaves, for the flow kernel and
    /// for plotting.
    pub fn leaf_polygons(&self) -> Vec<Polygon> {
        self.leaf_elements()
            .iter()
            .map(|&id| self.element(id).bounding_box().to_polygon())
            .collect()
    }

    /// Closed corner loops of all non-solid leaves, concatenated.
    pub fn leaf_point_list(&self) -> Vec<Point2<f64>> {
        self.leaf_elements()
            .iter()
            .flat_map(|&id| self.element(id).bounding_box().corner_loop())
            .collect()
    }
}
