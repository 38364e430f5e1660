//! # Voxel Ray Traversal
//!
//! Walks a continuous ray cell by cell (3D DDA) to produce an exact-length,
//! duplicate-free sequence of cells starting at an origin cell.
//!
//! The ray starts at the centre of the origin cell. Each iteration advances the
//! axis whose next cell boundary is nearest along the ray. When several axes reach
//! their boundary at the same parameter (an exact diagonal passing through a cell
//! corner or edge), all of them advance in the same iteration. Stepping them one
//! at a time would visit an arbitrary side cell the ray only touches at a corner.

use cgmath::{InnerSpace, Point3, Vector3};

/// Squared length below which a direction counts as zero.
const DEGENERATE_LENGTH2: f64 = 1e-12;
/// Boundary parameters closer than this are treated as simultaneous.
const TIE_EPSILON: f64 = 1e-9;

/// Unit vector along `direction`, or `None` if it cannot be traced.
///
/// Components are scaled by the largest magnitude before normalizing, so very
/// large finite vectors do not overflow to an infinite length.
fn unit(direction: Vector3<f64>) -> Option<Vector3<f64>> {
    let components = [direction.x, direction.y, direction.z];
    if components.iter().any(|c| !c.is_finite()) {
        return None;
    }
    let scale = components.iter().fold(0.0, |max: f64, c| max.max(c.abs()));
    if scale == 0.0 {
        return None;
    }
    let scaled = direction / scale;
    if scale * scale * scaled.magnitude2() < DEGENERATE_LENGTH2 {
        return None;
    }
    Some(scaled.normalize())
}

/// Returns `true` if `direction` cannot be traced: zero length or non-finite.
pub fn is_degenerate(direction: Vector3<f64>) -> bool {
    unit(direction).is_none()
}

/// Picks the first usable direction from `candidates`, falling back to +X.
pub fn resolve_direction(candidates: impl IntoIterator<Item = Vector3<f64>>) -> Vector3<f64> {
    candidates
        .into_iter()
        .find(|candidate| !is_degenerate(*candidate))
        .unwrap_or_else(Vector3::unit_x)
}

/// Traces `count` cells from `origin` along `direction`.
///
/// Element 0 is always `origin`; every later cell differs from its predecessor by
/// one step on at least one axis, so no cell repeats. A degenerate `direction` is
/// traced as +X. Coordinates wrap at the `i32` bounds.
pub fn trace(origin: Point3<i32>, direction: Vector3<f64>, count: usize) -> Vec<Point3<i32>> {
    let mut cells = Vec::with_capacity(count);
    if count == 0 {
        return cells;
    }
    cells.push(origin);

    let direction = unit(direction).unwrap_or_else(Vector3::unit_x);
    let dir = [direction.x, direction.y, direction.z];

    let mut cell = [origin.x, origin.y, origin.z];
    let mut step = [0i32; 3];
    let mut t_max = [f64::INFINITY; 3];
    let mut t_delta = [f64::INFINITY; 3];

    for axis in 0..3 {
        if dir[axis] != 0.0 {
            step[axis] = if dir[axis] > 0.0 { 1 } else { -1 };
            // Starting from the cell centre, the first boundary is half a cell away.
            t_delta[axis] = 1.0 / dir[axis].abs();
            t_max[axis] = 0.5 * t_delta[axis];
        }
    }

    while cells.len() < count {
        let nearest = t_max.iter().copied().fold(f64::INFINITY, f64::min);

        for axis in 0..3 {
            if t_max[axis] - nearest <= TIE_EPSILON {
                cell[axis] = cell[axis].wrapping_add(step[axis]);
                t_max[axis] += t_delta[axis];
            }
        }

        cells.push(Point3::new(cell[0], cell[1], cell[2]));
    }

    cells
}
