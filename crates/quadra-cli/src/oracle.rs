use quadra_engine::{BoardState, Oracle, TargetPose};
use rand::{Rng as _, rngs::ThreadRng};

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const BOARD_WIDTH: i16 = BoardState::WIDTH as i16;

/// Uniform random stand-in for a real move planner.
///
/// Picks any in-range rotation and column with equal probability, which is
/// enough to exercise the driver and automaton end to end. It makes no
/// attempt to play well; a scoring planner would live behind the same
/// [`Oracle`] seam.
#[derive(Debug)]
pub(crate) struct RandomOracle {
    rng: ThreadRng,
}

impl RandomOracle {
    pub(crate) fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Oracle for RandomOracle {
    fn next_move(&mut self, _board: &BoardState) -> Option<TargetPose> {
        Some(TargetPose {
            direction: self.rng.random_range(0..4),
            column: self.rng.random_range(0..BOARD_WIDTH),
        })
    }
}
