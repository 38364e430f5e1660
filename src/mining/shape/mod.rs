//! # Shape Calculator
//!
//! Maps a clicked cell plus the actor's selection to the ordered, duplicate-free
//! list of cells an Ultmine break affects.
//!
//! Every shape is one arm of the exhaustive `match` in [`compute_shape`]:
//!
//! * **Planar** (`Square3x3`, `Rect2x1`): a patch perpendicular to the clicked
//!   face, extruded `depth` layers into the face
//! * **Square20x20**: a horizontal 20x20 patch extruded `depth` layers downward
//! * **Line**: `length` cells along the look direction
//! * **Stairs**: `depth` cells along the horizontal look direction, rising one
//!   cell per step
//! * **Legacy**: the clicked cell alone
//!
//! The calculation is pure: the same inputs always yield the same list.

use cgmath::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::voxels::block::facing::{Axis, Facing};

pub mod traversal;

/// Default selection length for every shape except `Stairs`.
pub const DEFAULT_LENGTH: u32 = 16;
/// Default selection length (and step count) for `Stairs`.
pub const STAIRS_DEFAULT_LENGTH: u32 = 8;
/// Side length of the `Square20x20` patch.
const WIDE_SQUARE_SIZE: u32 = 20;

/// Named geometric patterns an actor can select.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// 3x3 patch on the clicked face.
    Square3x3,
    /// One cell wide, two cells tall patch on the clicked face.
    Rect2x1,
    /// Straight run along the look direction.
    Line,
    /// Rising staircase along the horizontal look direction.
    Stairs,
    /// Horizontal 20x20 patch, dug downward.
    Square20x20,
    /// Single cell; bulk breaking falls back to vein mining.
    Legacy,
}

/// Static per-shape defaults.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShapeDefaults {
    /// Layers (planar shapes) or steps (stairs).
    pub depth: u32,
    /// Extent along the first in-plane axis.
    pub width: u32,
    /// Extent along the second in-plane axis.
    pub height: u32,
    /// Cells traced by `Line`.
    pub length: u32,
}

impl ShapeKind {
    /// Every shape kind.
    pub fn all() -> [ShapeKind; 6] {
        [
            ShapeKind::Square3x3,
            ShapeKind::Rect2x1,
            ShapeKind::Line,
            ShapeKind::Stairs,
            ShapeKind::Square20x20,
            ShapeKind::Legacy,
        ]
    }

    /// The documented defaults for this shape.
    pub const fn defaults(self) -> ShapeDefaults {
        match self {
            ShapeKind::Square3x3 => ShapeDefaults {
                depth: 1,
                width: 3,
                height: 3,
                length: DEFAULT_LENGTH,
            },
            ShapeKind::Rect2x1 => ShapeDefaults {
                depth: 1,
                width: 1,
                height: 2,
                length: DEFAULT_LENGTH,
            },
            ShapeKind::Line | ShapeKind::Legacy => ShapeDefaults {
                depth: 1,
                width: 1,
                height: 1,
                length: DEFAULT_LENGTH,
            },
            ShapeKind::Stairs => ShapeDefaults {
                depth: STAIRS_DEFAULT_LENGTH,
                width: 1,
                height: 1,
                length: STAIRS_DEFAULT_LENGTH,
            },
            ShapeKind::Square20x20 => ShapeDefaults {
                depth: 1,
                width: WIDE_SQUARE_SIZE,
                height: WIDE_SQUARE_SIZE,
                length: DEFAULT_LENGTH,
            },
        }
    }

    /// Number of cells [`compute_shape`] yields for these parameters.
    pub fn cell_count(self, depth: u32, length: u32) -> usize {
        let depth = depth.max(1) as usize;
        let length = length.max(1) as usize;
        let ShapeDefaults { width, height, .. } = self.defaults();
        match self {
            ShapeKind::Square3x3 | ShapeKind::Rect2x1 | ShapeKind::Square20x20 => {
                width as usize * height as usize * depth
            }
            ShapeKind::Line => length,
            ShapeKind::Stairs => depth,
            ShapeKind::Legacy => 1,
        }
    }
}

/// Computes the cells covered by a shape anchored at `origin`.
///
/// `depth` and `length` below 1 are treated as 1.
///
/// # Arguments
/// * `origin` - The clicked cell
/// * `kind` - Which pattern to lay out
/// * `depth` - Layers for planar shapes, steps for `Stairs`
/// * `length` - Cells for `Line`
/// * `facing` - Outward normal of the clicked face
/// * `look` - Actor view direction; only `Line` and `Stairs` read it
///
/// # Returns
/// Cells in a deterministic order, without duplicates. Line and stair shapes
/// start at `origin`; planar shapes contain it.
///
/// Coordinates wrap at the `i32` bounds rather than overflowing.
///
/// # Examples
///
/// ```
/// use cgmath::{Point3, Vector3};
/// use voxel_miner::mining::shape::{compute_shape, ShapeKind};
/// use voxel_miner::voxels::block::facing::Facing;
///
/// let cells = compute_shape(
///     Point3::new(0, 64, 0),
///     ShapeKind::Line,
///     1,
///     8,
///     Facing::North,
///     Vector3::new(1.0, 0.0, 1.0),
/// );
/// assert_eq!(cells.len(), 8);
/// assert_eq!(cells[7], Point3::new(7, 64, 7));
/// ```
pub fn compute_shape(
    origin: Point3<i32>,
    kind: ShapeKind,
    depth: u32,
    length: u32,
    facing: Facing,
    look: Vector3<f64>,
) -> Vec<Point3<i32>> {
    let depth = depth.max(1);
    let length = length.max(1);
    let defaults = kind.defaults();

    match kind {
        ShapeKind::Square3x3 | ShapeKind::Rect2x1 => {
            planar_patch(origin, facing, defaults.width, defaults.height, depth)
        }
        ShapeKind::Square20x20 => downward_patch(origin, defaults.width, defaults.height, depth),
        ShapeKind::Line => {
            let direction = traversal::resolve_direction([look, facing.normal_f64()]);
            traversal::trace(origin, direction, length as usize)
        }
        ShapeKind::Stairs => {
            let direction = traversal::resolve_direction([
                horizontal(look),
                horizontal(facing.normal_f64()),
            ]);
            traversal::trace(origin, direction, depth as usize)
                .into_iter()
                .enumerate()
                .map(|(step, cell)| Point3::new(cell.x, origin.y.wrapping_add(step as i32), cell.z))
                .collect()
        }
        ShapeKind::Legacy => vec![origin],
    }
}

/// Offsets `[-(size/2), -(size/2) + size - 1]` around the anchor.
///
/// Even sizes lean toward the negative side.
fn centered_range(size: u32) -> std::ops::RangeInclusive<i32> {
    let size = size.max(1) as i32;
    let start = -(size / 2);
    start..=start + size - 1
}

/// In-plane unit axes `(u, v)` of the face with the given facing.
fn in_plane_axes(facing: Facing) -> (Vector3<i32>, Vector3<i32>) {
    let x = Vector3::new(1, 0, 0);
    let y = Vector3::new(0, 1, 0);
    let z = Vector3::new(0, 0, 1);
    match facing.axis() {
        Axis::Y => (x, z),
        Axis::Z => (x, y),
        Axis::X => (z, y),
    }
}

fn planar_patch(
    origin: Point3<i32>,
    facing: Facing,
    width: u32,
    height: u32,
    depth: u32,
) -> Vec<Point3<i32>> {
    let (u, v) = in_plane_axes(facing);
    let inward = facing.opposite().normal();
    let mut cells = Vec::with_capacity(width as usize * height as usize * depth as usize);

    for layer in 0..depth as i32 {
        let layer_origin = offset(origin, inward * layer);
        for b in centered_range(height) {
            for a in centered_range(width) {
                cells.push(offset(layer_origin, u * a + v * b));
            }
        }
    }

    cells
}

fn downward_patch(origin: Point3<i32>, width: u32, height: u32, depth: u32) -> Vec<Point3<i32>> {
    let mut cells = Vec::with_capacity(width as usize * height as usize * depth as usize);

    for layer in 0..depth as i32 {
        for dz in centered_range(height) {
            for dx in centered_range(width) {
                cells.push(offset(origin, Vector3::new(dx, -layer, dz)));
            }
        }
    }

    cells
}

/// `origin + delta`, wrapping at the `i32` bounds.
fn offset(origin: Point3<i32>, delta: Vector3<i32>) -> Point3<i32> {
    Point3::new(
        origin.x.wrapping_add(delta.x),
        origin.y.wrapping_add(delta.y),
        origin.z.wrapping_add(delta.z),
    )
}

fn horizontal(v: Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.x, 0.0, v.z)
}
