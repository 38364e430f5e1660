//! # Mining
//!
//! Assisted mining: breaking many cells with one action.
//!
//! Two modes share one pipeline:
//!
//! * **Ultmine** breaks a geometric pattern (square, rectangle, line, stairs)
//!   anchored at the clicked cell. See [`shape`].
//! * **Vein mining** breaks every connected cell holding exactly the same block
//!   as the one just broken, up to a budget. See [`connectivity`].
//!
//! ## Architecture
//!
//! ```text
//!   Inbound ─┬─ ShapeSelect / ActivationToggle ──> SessionStore
//!            ├─ TargetRequest ──> PreviewPipeline ──> PreviewResult
//!            └─ BreakTrigger  ──> ExecutionEngine ──> ExecutionResult
//! ```
//!
//! The preview pipeline and the execution engine derive their target sets with
//! the same functions, so a preview shows what a break would do while the world
//! stays unchanged.

pub mod actor;
pub mod connectivity;
pub mod execution;
pub mod preview;
pub mod protocol;
pub mod session;
pub mod shape;
