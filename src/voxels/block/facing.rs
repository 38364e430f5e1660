//! # Facing Module
//!
//! The six axis-aligned faces of a voxel cell. A facing is the outward normal of
//! the face an actor clicked, so the cells "behind" the clicked face lie along
//! the negated normal.

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

/// World axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// East-west.
    X,
    /// Vertical.
    Y,
    /// North-south.
    Z,
}

/// Represents the six possible faces of a voxel cell.
///
/// The order is: [UP, DOWN, NORTH, SOUTH, EAST, WEST]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing positive Y.
    Up,
    /// Facing negative Y.
    Down,
    /// Facing negative Z.
    North,
    /// Facing positive Z.
    South,
    /// Facing positive X.
    East,
    /// Facing negative X.
    West,
}

impl Facing {
    /// Returns all six facings in a consistent order.
    pub fn all() -> [Facing; 6] {
        [
            Facing::Up,
            Facing::Down,
            Facing::North,
            Facing::South,
            Facing::East,
            Facing::West,
        ]
    }

    /// The outward unit normal of this face.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            Facing::Up => Vector3::new(0, 1, 0),
            Facing::Down => Vector3::new(0, -1, 0),
            Facing::North => Vector3::new(0, 0, -1),
            Facing::South => Vector3::new(0, 0, 1),
            Facing::East => Vector3::new(1, 0, 0),
            Facing::West => Vector3::new(-1, 0, 0),
        }
    }

    /// The outward unit normal as a continuous vector.
    pub fn normal_f64(self) -> Vector3<f64> {
        let n = self.normal();
        Vector3::new(n.x as f64, n.y as f64, n.z as f64)
    }

    /// The axis this face is perpendicular to.
    pub fn axis(self) -> Axis {
        match self {
            Facing::Up | Facing::Down => Axis::Y,
            Facing::North | Facing::South => Axis::Z,
            Facing::East | Facing::West => Axis::X,
        }
    }

    /// The face on the other side of the cell.
    pub fn opposite(self) -> Facing {
        match self {
            Facing::Up => Facing::Down,
            Facing::Down => Facing::Up,
            Facing::North => Facing::South,
            Facing::South => Facing::North,
            Facing::East => Facing::West,
            Facing::West => Facing::East,
        }
    }
}
