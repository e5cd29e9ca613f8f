//! Game engine logic and state management.
//!
//! This module provides the high-level logic that orchestrates the core data
//! structures into a playable game:
//!
//! - [`BoardState`] - The authoritative board model (grid, active piece,
//!   lookahead, score)
//! - [`MoveAutomaton`] - Per-tick steering of the active piece toward an
//!   externally supplied [`TargetPose`]
//! - [`GameDriver`] - The tick loop state machine, parameterized by an
//!   optional [`Oracle`]
//! - [`ShapeSource`] / [`ShapeSeed`] - Seeded uniform shape generation
//! - [`GameStats`] - Lock and line-clear bookkeeping
//!
//! # Game Flow
//!
//! 1. `GameDriver::start()` clears the board and spawns the first piece
//! 2. Each tick, the automaton nudges the piece one rotation step and one
//!    column step toward the current target (if any)
//! 3. Gravity moves the piece down one row, or locks it, clears full rows,
//!    and spawns the next piece
//! 4. Repeat until a spawn pose is blocked (board full)
//!
//! Human play bypasses the automaton: each [`Command`] maps directly onto a
//! board operation.
//!
//! # Example
//!
//! ```
//! use quadra_engine::BoardState;
//!
//! let mut board = BoardState::new();
//! board.spawn_piece().unwrap();
//!
//! // Probe freely: collisions are rejections, not errors.
//! board.try_translate(-1).ok();
//! board.try_rotate(1).ok();
//!
//! let cleared = board.gravity_step();
//! assert_eq!(cleared, 0);
//! ```

pub use self::{automaton::*, board::*, driver::*, shape_source::*, stats::*};

mod automaton;
mod board;
mod driver;
mod shape_source;
mod stats;
