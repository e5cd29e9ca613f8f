use std::{fmt, time::Duration};

use super::{
    automaton::{MoveAutomaton, TargetPose},
    board::BoardState,
};

/// External move planner: supplies one target pose per active piece.
///
/// The driver polls the oracle at most once per piece, with read access to
/// the full board. Returning `None` means the piece falls unassisted; the
/// driver will not ask again until the next piece. Out-of-range values in
/// the returned pose are tolerated - the automaton's attempt caps absorb
/// them.
pub trait Oracle: fmt::Debug {
    fn next_move(&mut self, board: &BoardState) -> Option<TargetPose>;
}

/// Discrete human input, each mapped 1:1 onto a board or driver operation.
///
/// Only left rotation is wired to input; right rotation belongs to the
/// automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    RotateLeft,
    HardDrop,
    TogglePause,
}

/// Lifecycle of a game run.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum DriverState {
    /// Before the first `start()`.
    Idle,
    Running,
    Paused,
    /// Terminal: a spawn pose was blocked. Only `start()` leaves this state.
    BoardFull,
}

/// The tick-loop state machine that owns the board.
///
/// One driver serves both play modes: with an oracle it steers each piece
/// through the [`MoveAutomaton`]; without one, the board only moves through
/// human [`Command`]s and gravity. The embedding event loop owns the timer
/// and is expected to call [`Self::tick`] every [`Self::TICK_INTERVAL`]
/// while the driver reports [`DriverState::Running`] - the interval is
/// constant for the whole run.
#[derive(Debug)]
pub struct GameDriver {
    board: BoardState,
    automaton: MoveAutomaton,
    oracle: Option<Box<dyn Oracle>>,
    state: DriverState,
    oracle_polled: bool,
}

impl Default for GameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl GameDriver {
    /// The fixed fall interval. There is no difficulty ramp.
    pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

    /// Creates a human-only driver over a fresh board.
    #[must_use]
    pub fn new() -> Self {
        Self::with_board(BoardState::new(), None)
    }

    /// Creates an oracle-driven driver over a fresh board.
    #[must_use]
    pub fn with_oracle(oracle: Box<dyn Oracle>) -> Self {
        Self::with_board(BoardState::new(), Some(oracle))
    }

    /// Creates a driver over an existing board (e.g. one with a fixed shape
    /// seed), optionally oracle-driven.
    #[must_use]
    pub fn with_board(board: BoardState, oracle: Option<Box<dyn Oracle>>) -> Self {
        Self {
            board,
            automaton: MoveAutomaton::new(),
            oracle,
            state: DriverState::Idle,
            oracle_polled: false,
        }
    }

    #[must_use]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    #[must_use]
    pub fn state(&self) -> &DriverState {
        &self.state
    }

    #[must_use]
    pub fn automaton(&self) -> &MoveAutomaton {
        &self.automaton
    }

    /// Starts (or restarts) a run: resets board and score, spawns the first
    /// piece, and enters `Running`. No-op while paused.
    pub fn start(&mut self) {
        if self.state.is_paused() {
            return;
        }
        self.board.clear();
        self.automaton = MoveAutomaton::new();
        self.oracle_polled = false;
        _ = self.board.spawn_piece();
        self.state = if self.board.is_board_full() {
            DriverState::BoardFull
        } else {
            DriverState::Running
        };
    }

    /// Toggles between `Running` and `Paused`. No-op before the first start
    /// and in the terminal state.
    pub fn pause(&mut self) {
        self.state = match self.state {
            DriverState::Running => DriverState::Paused,
            DriverState::Paused => DriverState::Running,
            // No change before start or after board full.
            DriverState::Idle => DriverState::Idle,
            DriverState::BoardFull => DriverState::BoardFull,
        };
    }

    /// Executes one timer tick: piece-turnover sync, the once-per-piece
    /// oracle poll, one automaton adjustment, then exactly one gravity step.
    ///
    /// Returns the lines cleared this tick. No-op unless `Running`.
    pub fn tick(&mut self) -> usize {
        if !self.state.is_running() {
            return 0;
        }

        if self.automaton.sync_piece(&self.board) {
            self.oracle_polled = false;
        }
        if let Some(oracle) = self.oracle.as_mut() {
            if !self.oracle_polled && !self.automaton.has_target() {
                self.oracle_polled = true;
                if let Some(target) = oracle.next_move(&self.board) {
                    self.automaton.set_target(target);
                }
            }
        }

        self.automaton.adjust(&mut self.board);
        let cleared = self.board.gravity_step();
        if self.board.is_board_full() {
            self.state = DriverState::BoardFull;
        }
        cleared
    }

    /// Applies one human command immediately, bypassing the automaton.
    ///
    /// Movement and drop commands are ignored unless `Running`; the pause
    /// toggle also works while `Paused`.
    pub fn handle_command(&mut self, command: Command) {
        let is_running = self.state.is_running();
        match command {
            Command::TogglePause => self.pause(),
            Command::MoveLeft if is_running => _ = self.board.try_translate(-1),
            Command::MoveRight if is_running => _ = self.board.try_translate(1),
            Command::RotateLeft if is_running => _ = self.board.try_rotate(-1),
            Command::HardDrop if is_running => {
                self.board.hard_drop();
                if self.board.is_board_full() {
                    self.state = DriverState::BoardFull;
                }
            }
            _ => {}
        }
    }
}
