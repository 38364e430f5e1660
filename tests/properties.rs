//! Property-based tests for shape calculation and connectivity expansion.

use std::collections::HashSet;

use cgmath::{Point3, Vector3};
use proptest::prelude::*;

use voxel_miner::mining::connectivity::{expand, vein_targets};
use voxel_miner::mining::shape::{compute_shape, ShapeKind};
use voxel_miner::voxels::block::block_type::BlockType;
use voxel_miner::voxels::block::facing::Facing;
use voxel_miner::voxels::block::Block;
use voxel_miner::voxels::world::{BlockView, World};

// -- Strategies --

fn origin_strategy() -> impl Strategy<Value = Point3<i32>> {
    (-1000..1000i32, -64..256i32, -1000..1000i32).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

fn facing_strategy() -> impl Strategy<Value = Facing> {
    prop::sample::select(Facing::all().to_vec())
}

/// A component bounded away from zero, with either sign.
fn component_strategy() -> impl Strategy<Value = f64> {
    (0.05..1.0f64, any::<bool>()).prop_map(|(magnitude, negative)| {
        if negative {
            -magnitude
        } else {
            magnitude
        }
    })
}

fn diagonal_look_strategy() -> impl Strategy<Value = Vector3<f64>> {
    (component_strategy(), component_strategy(), component_strategy())
        .prop_map(|(x, y, z)| Vector3::new(x, y, z))
}

fn horizontal_look_strategy() -> impl Strategy<Value = Vector3<f64>> {
    (component_strategy(), component_strategy()).prop_map(|(x, z)| Vector3::new(x, 0.0, z))
}

/// An 8x8x8 patch of one chunk where each cell is coal, iron or air.
fn world_strategy() -> impl Strategy<Value = World> {
    prop::collection::vec(0..3u8, 512).prop_map(|cells| {
        let mut world = World::new();
        world.add_chunk_at(Point3::new(0, 0, 0));
        for (index, cell) in cells.into_iter().enumerate() {
            let index = index as i32;
            let position = Point3::new(index % 8, (index / 8) % 8, index / 64);
            let block = match cell {
                0 => Block::new(BlockType::CoalOre),
                1 => Block::new(BlockType::IronOre),
                _ => Block::AIR,
            };
            let _ = world.set_block(position, block);
        }
        world
    })
}

// -- Shape Properties --

proptest! {
    #[test]
    fn square_has_nine_cells_and_contains_origin(
        origin in origin_strategy(),
        facing in facing_strategy(),
        look in diagonal_look_strategy(),
    ) {
        let cells = compute_shape(origin, ShapeKind::Square3x3, 1, 1, facing, look);
        prop_assert_eq!(cells.len(), 9);
        prop_assert!(cells.contains(&origin));
    }

    #[test]
    fn square_on_east_face_stays_in_the_face_plane(
        origin in origin_strategy(),
        look in diagonal_look_strategy(),
    ) {
        let cells = compute_shape(origin, ShapeKind::Square3x3, 1, 1, Facing::East, look);
        prop_assert!(cells.iter().all(|cell| cell.x == origin.x));
    }

    #[test]
    fn line_has_exact_length_without_duplicates(
        origin in origin_strategy(),
        facing in facing_strategy(),
        look in diagonal_look_strategy(),
        length in 1..200u32,
    ) {
        let cells = compute_shape(origin, ShapeKind::Line, 1, length, facing, look);
        prop_assert_eq!(cells.len(), length as usize);
        prop_assert_eq!(cells[0], origin);
        prop_assert_eq!(cells.iter().collect::<HashSet<_>>().len(), cells.len());
    }

    #[test]
    fn stairs_rise_exactly_one_per_step(
        origin in origin_strategy(),
        facing in facing_strategy(),
        look in horizontal_look_strategy(),
        depth in 1..100u32,
    ) {
        let cells = compute_shape(origin, ShapeKind::Stairs, depth, 1, facing, look);
        prop_assert_eq!(cells.len(), depth as usize);
        prop_assert_eq!(cells[0], origin);
        for (step, cell) in cells.iter().enumerate() {
            prop_assert_eq!(cell.y, origin.y + step as i32);
        }
    }

    #[test]
    fn wide_square_scales_with_depth(
        origin in origin_strategy(),
        depth in 1..6u32,
    ) {
        let cells = compute_shape(origin, ShapeKind::Square20x20, depth, 1, Facing::Up, Vector3::new(0.0, -1.0, 0.0));
        prop_assert_eq!(cells.len(), 400 * depth as usize);
    }

    #[test]
    fn shapes_are_deterministic(
        origin in origin_strategy(),
        facing in facing_strategy(),
        look in diagonal_look_strategy(),
    ) {
        for kind in ShapeKind::all() {
            prop_assert_eq!(
                compute_shape(origin, kind, 3, 12, facing, look),
                compute_shape(origin, kind, 3, 12, facing, look)
            );
        }
    }
}

// -- Connectivity Properties --

proptest! {
    #[test]
    fn vein_respects_budget_and_contents(
        world in world_strategy(),
        x in 0..8i32,
        y in 0..8i32,
        z in 0..8i32,
        budget in 0..40usize,
    ) {
        let origin = Point3::new(x, y, z);
        let contents = world.block_at(origin).unwrap_or_default();
        prop_assume!(!contents.is_air());

        let found = vein_targets(&world, origin, contents, budget);
        prop_assert!(found.len() <= budget);
        prop_assert!(!found.contains(&origin));
        prop_assert!(found.iter().all(|cell| world.block_at(*cell) == Some(contents)));
        prop_assert_eq!(found.iter().collect::<HashSet<_>>().len(), found.len());
    }

    #[test]
    fn expansion_is_deterministic(
        world in world_strategy(),
        budget in 1..64usize,
    ) {
        let origin = Point3::new(0, 0, 0);
        let contents = world.block_at(origin).unwrap_or_default();
        prop_assert_eq!(
            expand(&world, origin, contents, budget),
            expand(&world, origin, contents, budget)
        );
    }
}
