//! # Connectivity Expander
//!
//! Bounded breadth-first search over the 26-connected neighbourhood of a cell,
//! collecting every reachable cell whose contents equal the origin's exactly.
//!
//! The search runs against any [`BlockView`]: the server calls it on the
//! authoritative world, the client on its local cache. Both sides enumerate
//! neighbours in the same fixed order, so identical observed contents always yield
//! identical results.

use std::collections::{HashSet, VecDeque};

use cgmath::{Point3, Vector3};

use crate::voxels::block::Block;
use crate::voxels::world::BlockView;

/// The 26 neighbour offsets: every combination of -1, 0, 1 per axis except
/// the zero offset, ordered by x, then y, then z.
pub const NEIGHBOR_OFFSETS: [[i32; 3]; 26] = neighbor_offsets();

const fn neighbor_offsets() -> [[i32; 3]; 26] {
    let mut offsets = [[0; 3]; 26];
    let mut index = 0;
    let mut dx = -1;
    while dx <= 1 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dz = -1;
            while dz <= 1 {
                if dx != 0 || dy != 0 || dz != 0 {
                    offsets[index] = [dx, dy, dz];
                    index += 1;
                }
                dz += 1;
            }
            dy += 1;
        }
        dx += 1;
    }
    offsets
}

/// Collects cells connected to `origin` that hold exactly `origin_contents`.
///
/// The search stops once `max_cells` cells (the origin included) have been
/// visited, or when no unvisited matching neighbour remains. Cells the view does
/// not know never match.
///
/// # Returns
/// Matching cells in discovery order, without the origin and without
/// duplicates. At most `max_cells - 1` entries.
pub fn expand(
    view: &impl BlockView,
    origin: Point3<i32>,
    origin_contents: Block,
    max_cells: usize,
) -> Vec<Point3<i32>> {
    let mut found = Vec::new();
    if max_cells <= 1 {
        return found;
    }

    let mut visited = HashSet::from([origin]);
    let mut queue = VecDeque::from([origin]);

    'search: while let Some(current) = queue.pop_front() {
        for offset in NEIGHBOR_OFFSETS {
            if visited.len() >= max_cells {
                break 'search;
            }

            let neighbor = current + Vector3::from(offset);
            if visited.contains(&neighbor) {
                continue;
            }

            if view.block_at(neighbor) == Some(origin_contents) {
                visited.insert(neighbor);
                queue.push_back(neighbor);
                found.push(neighbor);
            }
        }
    }

    found
}

/// The cells a vein-mining batch of at most `budget` cells would break.
///
/// Wraps [`expand`] with room for the origin.
pub fn vein_targets(
    view: &impl BlockView,
    origin: Point3<i32>,
    origin_contents: Block,
    budget: usize,
) -> Vec<Point3<i32>> {
    expand(view, origin, origin_contents, budget.saturating_add(1))
}
