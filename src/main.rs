//! # Voxel Miner Demo
//!
//! Generates a Perlin world, then plays a short session through the mining
//! server: arm vein mining, preview an ore vein, break it, switch to a 3x3
//! shape and dig a floor.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --release
//! ```

use cgmath::{Point3, Vector3};
use log::{info, warn};

use voxel_miner::config::MiningConfig;
use voxel_miner::mining::actor::{ActorContext, ActorId, Tool};
use voxel_miner::mining::protocol::{
    ActivationToggle, BreakTrigger, Inbound, Outbound, ShapeSelect, TargetRequest,
};
use voxel_miner::mining::shape::ShapeKind;
use voxel_miner::server::{Envelope, MiningServer};
use voxel_miner::voxels::block::block_type::ToolKind;
use voxel_miner::voxels::block::facing::Facing;
use voxel_miner::voxels::world::{BlockView, GenerationMethod, World};

const WORLD_SEED: u32 = 1337;

fn main() {
    voxel_miner::init_logging();

    let mut world = World::with_generation(GenerationMethod::Perlin { seed: WORLD_SEED });
    world.add_chunks_covering(Point3::new(-32, -48, -32), Point3::new(31, 31, 31));
    info!("Generated {} chunks", world.chunk_count());

    let (mut server, inbound, outbound) = MiningServer::new(MiningConfig::default());
    let actor = ActorContext {
        look: Vector3::new(0.3, -0.8, 0.5),
        tool: Some(Tool {
            kind: ToolKind::Pickaxe,
            tier: 2,
        }),
        ..ActorContext::new(ActorId(1))
    };

    let Some((ore_position, ore)) = find_ore(&world) else {
        warn!("No ore in the generated area");
        return;
    };
    info!("Found {:?} at {:?}", ore.block_type, ore_position);

    let messages = [
        Inbound::Activation(ActivationToggle { is_active: true }),
        Inbound::Target(TargetRequest {
            target_position: ore_position,
            clicked_face: Facing::Up,
        }),
        Inbound::Break(BreakTrigger {
            origin_position: ore_position,
            origin_contents: ore,
            clicked_face: Facing::Up,
        }),
        Inbound::Select(ShapeSelect {
            shape_kind: ShapeKind::Square3x3,
            depth: 2,
            length: 1,
        }),
        Inbound::Break(BreakTrigger {
            origin_position: Point3::new(0, -20, 0),
            origin_contents: world.block_at(Point3::new(0, -20, 0)).unwrap_or_default(),
            clicked_face: Facing::Up,
        }),
    ];
    for message in messages {
        let _ = inbound.send(Envelope {
            actor: actor.clone(),
            message,
        });
    }

    let handled = server.process_tick(&mut world);
    info!("Handled {} messages", handled);

    for (actor_id, reply) in outbound.try_iter() {
        match reply {
            Outbound::Preview(preview) => {
                info!("{:?} preview: {} cells", actor_id, preview.positions.len())
            }
            Outbound::Execution(result) => info!("{:?} execution: {:?}", actor_id, result),
        }
    }
}

/// First ore cell found scanning the generated area top-down.
fn find_ore(world: &World) -> Option<(Point3<i32>, voxel_miner::voxels::block::Block)> {
    (-48..32).rev().find_map(|y| {
        (-32..32).find_map(|x| {
            (-32..32).find_map(|z| {
                let position = Point3::new(x, y, z);
                world
                    .block_at(position)
                    .filter(|block| block.block_type.is_ore())
                    .map(|block| (position, block))
            })
        })
    })
}
