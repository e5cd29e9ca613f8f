use serde::{Deserialize, Serialize};

use crate::core::ShapeKind;

use super::board::BoardState;

/// A desired final pose for the active piece: rotation index and column.
///
/// The row is implicit - gravity supplies it. Values are stored raw and
/// unvalidated: an out-of-range direction or column is simply unreachable,
/// and the automaton's attempt caps absorb it without stalling the tick
/// loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetPose {
    pub direction: u8,
    pub column: i16,
}

/// Per-tick controller that walks the active piece toward a target pose.
///
/// Instead of teleporting the piece, the automaton spends at most one
/// rotation step and one column step per tick, so the piece visibly
/// converges on its target over several ticks while gravity keeps pulling
/// it down.
///
/// Two caps bound the work spent on a single piece: 4 rotation attempts (a
/// full cycle) and 5 translation attempts. Attempts are counted whether or
/// not they succeed, which is what guarantees termination when a target is
/// permanently blocked or out of range.
///
/// The automaton remembers the last active shape kind it saw; when the kind
/// changes the stored target and both counters are discarded, so a target
/// meant for one piece is never replayed against its successor.
#[derive(Debug, Clone, Default)]
pub struct MoveAutomaton {
    target: Option<TargetPose>,
    last_shape: Option<ShapeKind>,
    rotate_attempts: u8,
    translate_attempts: u8,
}

impl MoveAutomaton {
    /// Rotation attempts allowed per piece: one full cycle.
    pub const MAX_ROTATE_ATTEMPTS: u8 = 4;
    /// Translation attempts allowed per piece.
    pub const MAX_TRANSLATE_ATTEMPTS: u8 = 5;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Detects piece turnover and, on turnover, drops the stored target and
    /// resets the attempt counters.
    ///
    /// Must run at the start of every tick, before a new target is accepted.
    /// Returns true if the active piece changed since the previous tick.
    pub fn sync_piece(&mut self, board: &BoardState) -> bool {
        let shape = board.current_shape();
        if shape == self.last_shape {
            return false;
        }
        self.last_shape = shape;
        self.target = None;
        self.rotate_attempts = 0;
        self.translate_attempts = 0;
        true
    }

    #[must_use]
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    #[must_use]
    pub fn target(&self) -> Option<TargetPose> {
        self.target
    }

    /// Stores the target the piece should converge toward.
    pub fn set_target(&mut self, target: TargetPose) {
        self.target = Some(target);
    }

    /// Attempts spent rotating the current piece, capped per piece.
    #[must_use]
    pub fn rotate_attempts(&self) -> u8 {
        self.rotate_attempts
    }

    /// Attempts spent translating the current piece, capped per piece.
    #[must_use]
    pub fn translate_attempts(&self) -> u8 {
        self.translate_attempts
    }

    /// Applies this tick's adjustments: at most one rotation step and one
    /// column step toward the target. Runs before the gravity step.
    ///
    /// Rejected steps still consume an attempt; once a cap is reached that
    /// axis stays untouched for the remainder of the piece.
    pub fn adjust(&mut self, board: &mut BoardState) {
        let Some(target) = self.target else {
            return;
        };
        let Some(piece) = board.active_piece() else {
            return;
        };

        if piece.rotation().index() != target.direction
            && self.rotate_attempts < Self::MAX_ROTATE_ATTEMPTS
        {
            self.rotate_attempts += 1;
            _ = board.try_rotate(1);
        }

        let Some(piece) = board.active_piece() else {
            return;
        };
        if piece.x() != target.column && self.translate_attempts < Self::MAX_TRANSLATE_ATTEMPTS {
            self.translate_attempts += 1;
            let dx = if target.column > piece.x() { 1 } else { -1 };
            _ = board.try_translate(dx);
        }
    }
}
