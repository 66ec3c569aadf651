use nalgebra::{Point2, Vector2};

use crate::geometry::BoundingBox;

/// Stable index of an element in the mesh arena. Refinement never removes
/// cells, so ids stay valid for the lifetime of the mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(pub u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Face direction of a square cell. The set is closed; an invalid
/// direction is unrepresentable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn offset(self) -> Vector2<f64> {
        match self {
            Direction::Up => Vector2::new(0.0, 1.0),
            Direction::Down => Vector2::new(0.0, -1.0),
            Direction::Left => Vector2::new(-1.0, 0.0),
            Direction::Right => Vector2::new(1.0, 0.0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Classification of a leaf cell. Leaves start undetermined and are
/// settled exactly once by the solid-cell marking pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Undetermined,
    Fluid,
    Solid,
}

/// One square cell of the quadtree. A non-leaf has exactly 4 children
/// whose boxes partition its own. The neighbour links are a lazily filled
/// cache; they may go stale when neighbouring subtrees are refined and
/// are always re-validated through point location before use.
#[derive(Clone, Debug)]
pub struct Element {
    pub center: Point2<f64>,
    pub cell_size: f64,
    pub max_cell_size: f64,
    pub min_cell_size: f64,
    pub is_leaf: bool,
    pub kind: CellKind,
    pub parent: Option<ElementId>,
    pub children: Option<[ElementId; 4]>,
    pub(crate) neighbours: [Option<ElementId>; 4],
}

impl Element {
    pub fn new(
        center: Point2<f64>,
        cell_size: f64,
        max_cell_size: f64,
        min_cell_size: f64,
        parent: Option<ElementId>,
    ) -> Self {
        Self {
            center,
            cell_size,
            max_cell_size,
            min_cell_size,
            is_leaf: true,
            kind: CellKind::Undetermined,
            parent,
            children: None,
            neighbours: [None; 4],
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::square(self.center, self.cell_size / 2.0)
    }

    pub fn is_solid(&self) -> bool {
        self.kind == CellKind::Solid
    }
}
