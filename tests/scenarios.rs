//! End-to-end scenarios: shape outputs for known inputs, and full
//! select/preview/break round trips through the mining server.

use std::collections::HashSet;

use cgmath::{Point3, Vector3};
use pretty_assertions::assert_eq;

use voxel_miner::config::MiningConfig;
use voxel_miner::mining::actor::{ActorContext, ActorId, Tool};
use voxel_miner::mining::execution::{ExecutionEngine, Rejection};
use voxel_miner::mining::protocol::{
    ActivationToggle, BreakTrigger, ExecutionResult, Inbound, Outbound, ShapeSelect, TargetRequest,
};
use voxel_miner::mining::session::SessionStore;
use voxel_miner::mining::shape::{compute_shape, ShapeKind};
use voxel_miner::server::{Envelope, MiningServer};
use voxel_miner::voxels::block::block_type::{BlockType, ToolKind};
use voxel_miner::voxels::block::facing::Facing;
use voxel_miner::voxels::block::Block;
use voxel_miner::voxels::world::{BlockView, GenerationMethod, World};

fn miner(id: u64) -> ActorContext {
    ActorContext {
        tool: Some(Tool {
            kind: ToolKind::Pickaxe,
            tier: 2,
        }),
        ..ActorContext::new(ActorId(id))
    }
}

#[test]
fn square_on_a_floor_spans_the_horizontal_plane() {
    let origin = Point3::new(0, 64, 0);
    let cells = compute_shape(origin, ShapeKind::Square3x3, 1, 1, Facing::Up, Vector3::new(0.0, -1.0, 0.0));

    assert_eq!(cells.len(), 9);
    let expected: HashSet<_> = (-1..=1)
        .flat_map(|x| (-1..=1).map(move |z| Point3::new(x, 64, z)))
        .collect();
    assert_eq!(cells.into_iter().collect::<HashSet<_>>(), expected);
}

#[test]
fn diagonal_line_steps_both_axes_together() {
    let cells = compute_shape(
        Point3::new(0, 64, 0),
        ShapeKind::Line,
        1,
        8,
        Facing::North,
        Vector3::new(1.0, 0.0, 1.0),
    );

    let expected: Vec<_> = (0..8).map(|i| Point3::new(i, 64, i)).collect();
    assert_eq!(cells, expected);
}

#[test]
fn stairs_climb_one_cell_per_step_along_the_look() {
    let cells = compute_shape(
        Point3::new(10, 40, 10),
        ShapeKind::Stairs,
        5,
        1,
        Facing::North,
        Vector3::new(0.0, 0.0, -1.0),
    );

    assert_eq!(
        cells,
        vec![
            Point3::new(10, 40, 10),
            Point3::new(10, 41, 9),
            Point3::new(10, 42, 8),
            Point3::new(10, 43, 7),
            Point3::new(10, 44, 6),
        ]
    );
}

#[test]
fn wide_square_covers_four_hundred_cells_at_origin_height() {
    let cells = compute_shape(
        Point3::new(0, 70, 0),
        ShapeKind::Square20x20,
        1,
        1,
        Facing::Up,
        Vector3::new(0.0, -1.0, 0.0),
    );

    assert_eq!(cells.len(), 400);
    assert!(cells.iter().all(|cell| cell.y == 70));
    assert_eq!(cells.iter().collect::<HashSet<_>>().len(), 400);
}

#[test]
fn selected_shape_breaks_through_the_server() {
    let mut world = World::with_generation(GenerationMethod::Solid(Block::new(BlockType::Dirt)));
    world.add_chunks_covering(Point3::new(-16, 0, -16), Point3::new(15, 15, 15));

    let (mut server, inbound, outbound) = MiningServer::new(MiningConfig::default());
    let actor = miner(7);
    let origin = Point3::new(0, 10, 0);

    for message in [
        Inbound::Activation(ActivationToggle { is_active: true }),
        Inbound::Select(ShapeSelect {
            shape_kind: ShapeKind::Square3x3,
            depth: 3,
            length: 1,
        }),
        Inbound::Target(TargetRequest {
            target_position: origin,
            clicked_face: Facing::Up,
        }),
        Inbound::Break(BreakTrigger {
            origin_position: origin,
            origin_contents: Block::new(BlockType::Dirt),
            clicked_face: Facing::Up,
        }),
    ] {
        inbound
            .send(Envelope {
                actor: actor.clone(),
                message,
            })
            .unwrap();
    }
    assert_eq!(server.process_tick(&mut world), 4);

    let replies: Vec<_> = outbound.try_iter().map(|(_, reply)| reply).collect();
    let Outbound::Preview(preview) = &replies[0] else {
        panic!("expected a preview first, got {:?}", replies[0]);
    };
    assert_eq!(preview.positions.len(), 27);
    assert_eq!(
        replies[1],
        Outbound::Execution(ExecutionResult {
            success: true,
            cells_broken: 27,
            cells_requested: 27,
        })
    );

    for cell in &preview.positions {
        assert_eq!(world.block_at(*cell), Some(Block::AIR));
    }
    assert_eq!(world.block_at(Point3::new(0, 7, 0)), Some(Block::new(BlockType::Dirt)));
    assert_eq!(world.block_at(Point3::new(2, 10, 0)), Some(Block::new(BlockType::Dirt)));
}

#[test]
fn vein_mining_stops_at_the_budget_and_at_different_blocks() {
    let mut world = World::new();
    world.add_chunks_covering(Point3::new(-16, -16, -16), Point3::new(31, 15, 15));
    for x in 0..20 {
        world.set_block(Point3::new(x, 0, 0), Block::new(BlockType::IronOre)).unwrap();
    }
    world.set_block(Point3::new(0, 1, 0), Block::new(BlockType::CoalOre)).unwrap();

    let config = MiningConfig {
        vein_budget: 10,
        ..MiningConfig::default()
    };
    let sessions = SessionStore::new(&config);
    let engine = ExecutionEngine::new(sessions.clone(), config);
    let actor = miner(2);
    sessions.set_activated(actor.id, true);

    world.set_block(Point3::new(0, 0, 0), Block::AIR).unwrap();
    let report = engine.execute(&mut world, &actor, Point3::new(0, 0, 0), Block::new(BlockType::IronOre));

    assert!(report.is_success());
    assert_eq!(report.cells_broken, 10);
    assert_eq!(world.block_at(Point3::new(10, 0, 0)), Some(Block::AIR));
    assert_eq!(world.block_at(Point3::new(11, 0, 0)), Some(Block::new(BlockType::IronOre)));
    assert_eq!(world.block_at(Point3::new(0, 1, 0)), Some(Block::new(BlockType::CoalOre)));
}

#[test]
fn deactivated_actor_breaks_nothing() {
    let mut world = World::with_generation(GenerationMethod::Solid(Block::new(BlockType::Stone)));
    world.add_chunk_at(Point3::new(0, 0, 0));
    let sessions = SessionStore::default();
    let engine = ExecutionEngine::new(sessions.clone(), MiningConfig::default());
    let actor = miner(3);

    sessions.set_activated(actor.id, true);
    sessions.set_activated(actor.id, false);
    let report = engine.execute(&mut world, &actor, Point3::new(5, 5, 5), Block::new(BlockType::Stone));

    assert_eq!(report.rejection, Some(Rejection::Inactive));
    assert_eq!(report.to_result(), ExecutionResult::default());
    assert_eq!(world.get_chunk_at(Point3::new(0, 0, 0)).unwrap().solid_count(), 4096);
}
