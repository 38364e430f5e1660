//! # Execution Engine
//!
//! Breaks the cells of a bulk operation on the world thread.
//!
//! ## Execution Sequence
//! 1. Reject if the actor has not armed bulk mining
//! 2. Reject if the actor already has a batch in flight
//! 3. Reject if the origin is empty or unbreakable
//! 4. Reject if the actor's tool cannot harvest the origin (creative skips this)
//! 5. Compute the target set server-side
//! 6. Claim the actor's in-progress guard
//! 7. Break every target whose live contents are not air
//! 8. Release the guard, whatever happened in step 7
//!
//! The guard is a [`GuardToken`](crate::core::GuardToken) held for the duration
//! of the break loop, so step 8 runs on normal completion, on an early return
//! after a failed break, and while unwinding from a panic.
//!
//! Two entry points feed the sequence. [`ExecutionEngine::dispatch`] is the
//! world's own hook, called after the world has broken the origin itself.
//! [`ExecutionEngine::dispatch_requested`] handles a break a client asks for: the
//! claimed origin contents must match the live world, and the origin is broken as
//! the first cell of the batch.
//!
//! Rejections are reported as values, not errors: the caller gets a report with
//! zero cells broken and the reason attached.

use cgmath::Point3;
use log::{debug, info, warn};
use web_time::Instant;

use crate::config::MiningConfig;
use crate::error::WorldError;
use crate::voxels::block::facing::Facing;
use crate::voxels::block::Block;
use crate::voxels::world::{BlockBreaker, BlockView};

use super::actor::ActorContext;
use super::connectivity::vein_targets;
use super::protocol::{BreakTrigger, ExecutionResult};
use super::session::{SelectionParameters, SessionStore};
use super::shape::{compute_shape, ShapeKind};

/// Why a bulk operation did not start.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The activation flag is off.
    Inactive,
    /// A batch for the same actor is already running.
    InProgress,
    /// The origin holds nothing.
    NothingThere,
    /// The origin can never be broken.
    Unbreakable,
    /// The actor's tool cannot harvest the origin.
    WrongTool,
    /// The claimed origin contents do not match the live world.
    OriginMismatch,
}

/// Detailed outcome of one execution request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Non-empty cells actually broken.
    pub cells_broken: usize,
    /// Size of the computed target set.
    pub cells_requested: usize,
    /// Set when a precondition failed and nothing was attempted.
    pub rejection: Option<Rejection>,
    /// Set when a break failed part way; later targets were abandoned.
    pub failure: Option<WorldError>,
}

impl ExecutionReport {
    fn rejected(rejection: Rejection) -> Self {
        ExecutionReport {
            rejection: Some(rejection),
            ..ExecutionReport::default()
        }
    }

    /// `true` when preconditions held and every attempted break succeeded.
    pub fn is_success(&self) -> bool {
        self.rejection.is_none() && self.failure.is_none()
    }

    /// The outbound summary of this report.
    pub fn to_result(&self) -> ExecutionResult {
        ExecutionResult {
            success: self.is_success(),
            cells_broken: self.cells_broken,
            cells_requested: self.cells_requested,
        }
    }
}

/// Whether `actor` may break `block` as part of a bulk operation.
pub fn breakable_by(actor: &ActorContext, block: &Block) -> bool {
    !block.is_air() && !block.is_unbreakable() && actor.can_harvest(block)
}

/// Cells of the selected shape that `actor` could break, in shape order.
///
/// Cells that are unknown, empty, unbreakable or beyond the actor's tool are left
/// out rather than failing the whole shape.
pub fn shape_targets(
    view: &impl BlockView,
    actor: &ActorContext,
    parameters: &SelectionParameters,
    origin: Point3<i32>,
    facing: Facing,
) -> Vec<Point3<i32>> {
    compute_shape(
        origin,
        parameters.shape_kind(),
        parameters.depth(),
        parameters.length(),
        facing,
        actor.look,
    )
    .into_iter()
    .filter(|cell| {
        view.block_at(*cell)
            .is_some_and(|block| breakable_by(actor, &block))
    })
    .collect()
}

/// Performs bulk breaks against the world, guarded per actor.
///
/// Cloning shares the session store, so a clone observes the same guards.
#[derive(Clone)]
pub struct ExecutionEngine {
    sessions: SessionStore,
    config: MiningConfig,
}

impl ExecutionEngine {
    /// Creates an engine reading activation, selection and guards from `sessions`.
    pub fn new(sessions: SessionStore, config: MiningConfig) -> Self {
        ExecutionEngine { sessions, config }
    }

    /// Runs the break the actor's current selection calls for.
    ///
    /// `Legacy` selections vein-mine from the origin; every other shape breaks
    /// its pattern.
    pub fn dispatch(
        &self,
        world: &mut impl BlockBreaker,
        actor: &ActorContext,
        trigger: &BreakTrigger,
    ) -> ExecutionReport {
        let session = self.sessions.session(actor.id);
        match session.parameters.shape_kind() {
            ShapeKind::Legacy => self.execute(
                world,
                actor,
                trigger.origin_position,
                trigger.origin_contents,
            ),
            _ => self.execute_shape(
                world,
                actor,
                trigger.origin_position,
                trigger.origin_contents,
                trigger.clicked_face,
            ),
        }
    }

    /// Verifies and performs a break requested by a client.
    ///
    /// The live contents at `trigger.origin_position` must equal
    /// `trigger.origin_contents`; otherwise nothing happens. The origin is then
    /// broken together with the rest of the selection under the same guard and
    /// preconditions as [`dispatch`](Self::dispatch).
    pub fn dispatch_requested(
        &self,
        world: &mut impl BlockBreaker,
        actor: &ActorContext,
        trigger: &BreakTrigger,
    ) -> ExecutionReport {
        let origin = trigger.origin_position;
        if world.block_at(origin) != Some(trigger.origin_contents) {
            debug!(
                "break at {:?} rejected for {:?}: claimed {:?}, world holds {:?}",
                origin,
                actor.id,
                trigger.origin_contents,
                world.block_at(origin)
            );
            return ExecutionReport::rejected(Rejection::OriginMismatch);
        }

        let session = self.sessions.session(actor.id);
        match session.parameters.shape_kind() {
            ShapeKind::Legacy => {
                self.execute_vein(world, actor, origin, trigger.origin_contents, true)
            }
            // Shape targets already include the live origin.
            _ => self.execute_shape(
                world,
                actor,
                origin,
                trigger.origin_contents,
                trigger.clicked_face,
            ),
        }
    }

    /// Vein-mines from `origin`, which held `origin_contents` when it was broken.
    ///
    /// # Arguments
    /// * `world` - The authoritative world
    /// * `actor` - The actor who broke the origin
    /// * `origin` - The broken cell
    /// * `origin_contents` - What the origin held; the vein matches it exactly
    ///
    /// # Returns
    /// A report whose `cells_broken` may be below `cells_requested` if cells
    /// changed after the target set was computed.
    pub fn execute(
        &self,
        world: &mut impl BlockBreaker,
        actor: &ActorContext,
        origin: Point3<i32>,
        origin_contents: Block,
    ) -> ExecutionReport {
        self.execute_vein(world, actor, origin, origin_contents, false)
    }

    fn execute_vein(
        &self,
        world: &mut impl BlockBreaker,
        actor: &ActorContext,
        origin: Point3<i32>,
        origin_contents: Block,
        include_origin: bool,
    ) -> ExecutionReport {
        if let Err(rejection) = self.check_preconditions(actor, &origin_contents) {
            debug!("vein mining at {:?} rejected for {:?}: {:?}", origin, actor.id, rejection);
            return ExecutionReport::rejected(rejection);
        }

        let vein = vein_targets(&*world, origin, origin_contents, self.config.vein_budget);
        let targets = if include_origin {
            std::iter::once(origin).chain(vein).collect()
        } else {
            vein
        };
        self.run_batch(world, actor, targets)
    }

    /// Breaks the actor's selected shape anchored at `origin`.
    ///
    /// Cells the actor could not break by hand are skipped.
    pub fn execute_shape(
        &self,
        world: &mut impl BlockBreaker,
        actor: &ActorContext,
        origin: Point3<i32>,
        origin_contents: Block,
        facing: Facing,
    ) -> ExecutionReport {
        if let Err(rejection) = self.check_preconditions(actor, &origin_contents) {
            debug!("shape break at {:?} rejected for {:?}: {:?}", origin, actor.id, rejection);
            return ExecutionReport::rejected(rejection);
        }

        let parameters = self.sessions.session(actor.id).parameters;
        let targets = shape_targets(&*world, actor, &parameters, origin, facing);
        self.run_batch(world, actor, targets)
    }

    fn check_preconditions(&self, actor: &ActorContext, origin_contents: &Block) -> Result<(), Rejection> {
        if !self.sessions.session(actor.id).activated {
            return Err(Rejection::Inactive);
        }
        if self.sessions.is_in_progress(actor.id) {
            return Err(Rejection::InProgress);
        }
        if origin_contents.is_air() {
            return Err(Rejection::NothingThere);
        }
        if origin_contents.is_unbreakable() {
            return Err(Rejection::Unbreakable);
        }
        if !actor.can_harvest(origin_contents) {
            return Err(Rejection::WrongTool);
        }
        Ok(())
    }

    fn run_batch(
        &self,
        world: &mut impl BlockBreaker,
        actor: &ActorContext,
        targets: Vec<Point3<i32>>,
    ) -> ExecutionReport {
        let Some(guard) = self.sessions.try_begin(actor.id) else {
            return ExecutionReport::rejected(Rejection::InProgress);
        };

        let started = Instant::now();
        let mut report = ExecutionReport {
            cells_requested: targets.len(),
            ..ExecutionReport::default()
        };

        for target in targets {
            // The world may have changed since the target set was computed.
            if !world.block_at(target).is_some_and(|block| !block.is_air()) {
                continue;
            }
            match world.break_block(target) {
                Ok(_) => report.cells_broken += 1,
                Err(err) => {
                    warn!(
                        "bulk break for {:?} abandoned after {} cells: {}",
                        actor.id, report.cells_broken, err
                    );
                    report.failure = Some(err);
                    break;
                }
            }
        }

        info!(
            "{:?} broke {}/{} cells in {:?}",
            guard.actor(),
            report.cells_broken,
            report.cells_requested,
            started.elapsed()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::actor::{ActorId, GameMode, Tool};
    use crate::mining::protocol::ShapeSelect;
    use crate::voxels::block::block_type::{BlockType, ToolKind};
    use crate::voxels::world::World;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn coal() -> Block {
        Block::new(BlockType::CoalOre)
    }

    fn miner() -> ActorContext {
        ActorContext {
            tool: Some(Tool {
                kind: ToolKind::Pickaxe,
                tier: 2,
            }),
            ..ActorContext::new(ActorId(1))
        }
    }

    /// A world with a straight coal seam along +X from the origin.
    fn seam_world(length: i32) -> World {
        let mut world = World::new();
        world.add_chunks_covering(Point3::new(-16, -16, -16), Point3::new(31, 15, 15));
        for x in 0..length {
            world.set_block(Point3::new(x, 0, 0), coal()).unwrap();
        }
        world
    }

    fn engine(config: MiningConfig) -> (ExecutionEngine, SessionStore) {
        let sessions = SessionStore::new(&config);
        (ExecutionEngine::new(sessions.clone(), config), sessions)
    }

    #[test]
    fn inactive_actor_is_a_no_op() {
        let (engine, _) = engine(MiningConfig::default());
        let mut world = seam_world(5);

        let report = engine.execute(&mut world, &miner(), Point3::new(0, 0, 0), coal());

        assert_eq!(report.rejection, Some(Rejection::Inactive));
        assert_eq!(report.cells_broken, 0);
        assert_eq!(world.block_at(Point3::new(1, 0, 0)), Some(coal()));
    }

    #[test]
    fn breaks_the_vein_within_budget() {
        let config = MiningConfig {
            vein_budget: 3,
            ..MiningConfig::default()
        };
        let (engine, sessions) = engine(config);
        sessions.set_activated(ActorId(1), true);
        let mut world = seam_world(10);
        world.set_block(Point3::new(0, 0, 0), Block::AIR).unwrap();

        let report = engine.execute(&mut world, &miner(), Point3::new(0, 0, 0), coal());

        assert!(report.is_success());
        assert_eq!(report.cells_requested, 3);
        assert_eq!(report.cells_broken, 3);
        assert_eq!(world.block_at(Point3::new(3, 0, 0)), Some(Block::AIR));
        assert_eq!(world.block_at(Point3::new(4, 0, 0)), Some(coal()));
        assert!(!sessions.is_in_progress(ActorId(1)));
    }

    #[test]
    fn rejects_unbreakable_and_wrong_tool() {
        let (engine, sessions) = engine(MiningConfig::default());
        sessions.set_activated(ActorId(1), true);
        let mut world = seam_world(3);
        let origin = Point3::new(0, 0, 0);

        let bedrock = engine.execute(&mut world, &miner(), origin, Block::new(BlockType::Bedrock));
        assert_eq!(bedrock.rejection, Some(Rejection::Unbreakable));

        let bare_hands = ActorContext::new(ActorId(1));
        let report = engine.execute(&mut world, &bare_hands, origin, coal());
        assert_eq!(report.rejection, Some(Rejection::WrongTool));

        let creative = ActorContext {
            mode: GameMode::Creative,
            ..bare_hands
        };
        assert!(engine.execute(&mut world, &creative, origin, coal()).is_success());
    }

    #[test]
    fn rejects_while_guard_is_held() {
        let (engine, sessions) = engine(MiningConfig::default());
        sessions.set_activated(ActorId(1), true);
        let mut world = seam_world(3);

        let _held = sessions.try_begin(ActorId(1)).unwrap();
        let report = engine.execute(&mut world, &miner(), Point3::new(0, 0, 0), coal());
        assert_eq!(report.rejection, Some(Rejection::InProgress));
        assert_eq!(world.block_at(Point3::new(1, 0, 0)), Some(coal()));
    }

    /// Breaks normally but fails after `fail_after` successful breaks.
    struct FlakyWorld {
        inner: World,
        fail_after: usize,
        panic_instead: bool,
        breaks: usize,
    }

    impl BlockView for FlakyWorld {
        fn block_at(&self, position: Point3<i32>) -> Option<Block> {
            self.inner.block_at(position)
        }
    }

    impl BlockBreaker for FlakyWorld {
        fn break_block(&mut self, position: Point3<i32>) -> Result<Block, WorldError> {
            if self.breaks == self.fail_after {
                if self.panic_instead {
                    panic!("simulated break panic");
                }
                return Err(WorldError::ChunkNotLoaded(position));
            }
            self.breaks += 1;
            self.inner.break_block(position)
        }
    }

    #[test]
    fn failure_mid_batch_releases_guard_and_reports_partial_count() {
        let (engine, sessions) = engine(MiningConfig::default());
        sessions.set_activated(ActorId(1), true);
        let mut world = FlakyWorld {
            inner: seam_world(8),
            fail_after: 2,
            panic_instead: false,
            breaks: 0,
        };

        let report = engine.execute(&mut world, &miner(), Point3::new(0, 0, 0), coal());

        assert_eq!(report.cells_broken, 2);
        assert_eq!(report.cells_requested, 7);
        assert!(matches!(report.failure, Some(WorldError::ChunkNotLoaded(_))));
        assert!(!report.to_result().success);
        assert!(!sessions.is_in_progress(ActorId(1)));
    }

    #[test]
    fn panic_mid_batch_still_releases_guard() {
        let (engine, sessions) = engine(MiningConfig::default());
        sessions.set_activated(ActorId(1), true);
        let mut world = FlakyWorld {
            inner: seam_world(4),
            fail_after: 1,
            panic_instead: true,
            breaks: 0,
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            engine.execute(&mut world, &miner(), Point3::new(0, 0, 0), coal())
        }));

        assert!(outcome.is_err());
        assert!(!sessions.is_in_progress(ActorId(1)));
    }

    /// Every break re-enters the engine for the same actor, as a cascading
    /// block update would.
    struct CascadingWorld {
        inner: World,
        nested: World,
        engine: ExecutionEngine,
        actor: ActorContext,
        nested_reports: Vec<ExecutionReport>,
    }

    impl BlockView for CascadingWorld {
        fn block_at(&self, position: Point3<i32>) -> Option<Block> {
            self.inner.block_at(position)
        }
    }

    impl BlockBreaker for CascadingWorld {
        fn break_block(&mut self, position: Point3<i32>) -> Result<Block, WorldError> {
            let nested = self.engine.execute(&mut self.nested, &self.actor, position, coal());
            self.nested_reports.push(nested);
            self.inner.break_block(position)
        }
    }

    #[test]
    fn nested_execution_for_same_actor_is_rejected() {
        let (engine, sessions) = engine(MiningConfig::default());
        sessions.set_activated(ActorId(1), true);
        let mut world = CascadingWorld {
            inner: seam_world(4),
            nested: seam_world(4),
            engine: engine.clone(),
            actor: miner(),
            nested_reports: Vec::new(),
        };

        let report = engine.execute(&mut world, &miner(), Point3::new(0, 0, 0), coal());

        assert_eq!(report.cells_broken, 3);
        assert_eq!(world.nested_reports.len(), 3);
        assert!(world
            .nested_reports
            .iter()
            .all(|nested| nested.rejection == Some(Rejection::InProgress)));
        assert_eq!(world.nested.block_at(Point3::new(1, 0, 0)), Some(coal()));
    }

    #[test]
    fn requested_break_must_match_the_live_origin() {
        let (engine, sessions) = engine(MiningConfig::default());
        sessions.set_activated(ActorId(1), true);
        let mut world = seam_world(4);

        let forged = BreakTrigger {
            origin_position: Point3::new(-1, 0, 0),
            origin_contents: coal(),
            clicked_face: Facing::Up,
        };
        let report = engine.dispatch_requested(&mut world, &miner(), &forged);
        assert_eq!(report.rejection, Some(Rejection::OriginMismatch));
        assert_eq!(world.block_at(Point3::new(0, 0, 0)), Some(coal()));

        let honest = BreakTrigger {
            origin_position: Point3::new(0, 0, 0),
            ..forged
        };
        let report = engine.dispatch_requested(&mut world, &miner(), &honest);
        assert!(report.is_success());
        assert_eq!(report.cells_requested, 4);
        assert_eq!(report.cells_broken, 4);
        assert_eq!(world.block_at(Point3::new(0, 0, 0)), Some(Block::AIR));
    }

    #[test]
    fn shape_break_skips_cells_the_tool_cannot_take() {
        let (engine, sessions) = engine(MiningConfig::default());
        let actor = ActorContext {
            tool: Some(Tool {
                kind: ToolKind::Pickaxe,
                tier: 0,
            }),
            ..ActorContext::new(ActorId(1))
        };
        sessions.set_activated(actor.id, true);
        sessions.apply_shape_select(
            actor.id,
            &ShapeSelect {
                shape_kind: ShapeKind::Square3x3,
                depth: 1,
                length: 1,
            },
        );

        let mut world = World::with_generation(crate::voxels::world::GenerationMethod::Solid(
            Block::new(BlockType::Stone),
        ));
        world.add_chunks_covering(Point3::new(-16, -16, -16), Point3::new(15, 15, 15));
        let diamond = Point3::new(1, 5, 1);
        world.set_block(diamond, Block::new(BlockType::DiamondOre)).unwrap();
        let origin = Point3::new(0, 5, 0);
        world.set_block(origin, Block::AIR).unwrap();

        let trigger = BreakTrigger {
            origin_position: origin,
            origin_contents: Block::new(BlockType::Stone),
            clicked_face: Facing::Up,
        };
        let report = engine.dispatch(&mut world, &actor, &trigger);

        assert!(report.is_success());
        assert_eq!(report.cells_requested, 7);
        assert_eq!(report.cells_broken, 7);
        assert_eq!(world.block_at(diamond), Some(Block::new(BlockType::DiamondOre)));
        assert_eq!(world.block_at(Point3::new(-1, 5, -1)), Some(Block::AIR));
        assert_eq!(world.block_at(Point3::new(0, 4, 0)), Some(Block::new(BlockType::Stone)));
    }
}
