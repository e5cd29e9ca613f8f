use arrayvec::ArrayVec;
use serde::Serialize;

use crate::{
    BoardFullError, InvalidCoordinateError, PieceCollisionError,
    core::{Cell, CellGrid, Piece, ShapeKind},
};

use super::{
    shape_source::{ShapeSeed, ShapeSource},
    stats::GameStats,
};

/// The authoritative board model: locked grid, active piece, lookahead
/// shape, and score bookkeeping.
///
/// `BoardState` is exclusively owned by its driver and handed by reference
/// to renderers and the move automaton. All falling-piece mutation funnels
/// through the operations here, which share one collision rule: a pose is
/// valid iff every occupied cell is inside the grid and empty.
///
/// Collision rejections are not errors - `try_rotate` and `try_translate`
/// leave the state untouched and report the rejection so both the automaton
/// and human controls can probe freely.
///
/// Once a spawn pose is blocked the board is full: the flag stays up, every
/// mutating call is a no-op, and only [`Self::clear`] recovers.
#[derive(Debug, Clone)]
pub struct BoardState {
    grid: CellGrid,
    active: Option<Piece>,
    next_shape: Option<ShapeKind>,
    stats: GameStats,
    board_full: bool,
    shapes: ShapeSource,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    pub const WIDTH: usize = CellGrid::WIDTH;
    pub const HEIGHT: usize = CellGrid::HEIGHT;

    /// Creates an empty board with an OS-seeded shape source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(ShapeSource::new())
    }

    /// Like [`Self::new`], but with a specific seed for a deterministic
    /// shape sequence.
    #[must_use]
    pub fn with_seed(seed: ShapeSeed) -> Self {
        Self::with_source(ShapeSource::with_seed(seed))
    }

    fn with_source(shapes: ShapeSource) -> Self {
        Self {
            grid: CellGrid::EMPTY,
            active: None,
            next_shape: None,
            stats: GameStats::new(),
            board_full: false,
            shapes,
        }
    }

    /// Resets the grid, score, active piece, and lookahead. This is the only
    /// way out of the board-full state.
    pub fn clear(&mut self) {
        self.grid.reset();
        self.active = None;
        self.next_shape = None;
        self.stats = GameStats::new();
        self.board_full = false;
    }

    /// Promotes the lookahead shape (drawing one if absent) to a fresh
    /// active piece at the spawn pose and draws a new lookahead.
    ///
    /// If the spawn pose overlaps a locked cell, no piece is placed and the
    /// board enters the terminal board-full state.
    pub fn spawn_piece(&mut self) -> Result<(), BoardFullError> {
        if self.board_full {
            return Err(BoardFullError);
        }
        let kind = self.next_shape.take().unwrap_or_else(|| self.shapes.draw());
        self.next_shape = Some(self.shapes.draw());
        let piece = Piece::spawn(kind);
        if self.grid.is_colliding(&piece) {
            self.board_full = true;
            return Err(BoardFullError);
        }
        self.active = Some(piece);
        Ok(())
    }

    /// Rotates the active piece one step (`+1` right, `-1` left) in place.
    ///
    /// There is no wall-kick search: a colliding rotation is rejected
    /// outright and the pose is unchanged.
    pub fn try_rotate(&mut self, delta: i8) -> Result<(), PieceCollisionError> {
        let piece = self.active.ok_or(PieceCollisionError)?;
        self.commit_if_free(piece.rotated(delta))
    }

    /// Moves the active piece one column (`+1` right, `-1` left).
    pub fn try_translate(&mut self, dx: i16) -> Result<(), PieceCollisionError> {
        let piece = self.active.ok_or(PieceCollisionError)?;
        self.commit_if_free(piece.translated(dx))
    }

    fn commit_if_free(&mut self, candidate: Piece) -> Result<(), PieceCollisionError> {
        if self.grid.is_colliding(&candidate) {
            return Err(PieceCollisionError);
        }
        self.active = Some(candidate);
        Ok(())
    }

    /// Advances the active piece one row, or locks it if it cannot descend.
    ///
    /// Locking writes the piece into the grid, clears full rows, updates the
    /// score, and spawns the next piece (possibly raising the board-full
    /// flag). Returns the number of rows cleared this step (0-4).
    pub fn gravity_step(&mut self) -> usize {
        let Some(piece) = self.active else {
            return 0;
        };
        let lowered = piece.dropped();
        if !self.grid.is_colliding(&lowered) {
            self.active = Some(lowered);
            return 0;
        }
        self.lock_and_respawn(piece)
    }

    /// Drops the active piece as far as it goes and locks it there.
    ///
    /// Intermediate poses are not observable. The piece always locks, even
    /// if it could not descend at all. Returns the rows cleared.
    pub fn hard_drop(&mut self) -> usize {
        let Some(mut piece) = self.active else {
            return 0;
        };
        loop {
            let lowered = piece.dropped();
            if self.grid.is_colliding(&lowered) {
                break;
            }
            piece = lowered;
        }
        self.lock_and_respawn(piece)
    }

    fn lock_and_respawn(&mut self, piece: Piece) -> usize {
        self.grid.fill_piece(&piece);
        let cleared = self.grid.clear_lines();
        self.stats.record_lock(cleared);
        self.active = None;
        _ = self.spawn_piece();
        cleared
    }

    /// Returns the absolute cells occupied by the active piece, for
    /// rendering and external collision probes. Empty when no piece is
    /// active.
    #[must_use]
    pub fn current_cells(&self) -> ArrayVec<(i16, i16), 4> {
        self.active.iter().flat_map(Piece::cells).collect()
    }

    /// Looks up a locked cell. Out-of-bounds coordinates are an error, never
    /// a silently wrong value.
    pub fn cell(&self, col: i16, row: i16) -> Result<Cell, InvalidCoordinateError> {
        self.grid.cell(col, row)
    }

    #[must_use]
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<Piece> {
        self.active
    }

    #[must_use]
    pub fn current_shape(&self) -> Option<ShapeKind> {
        self.active.map(|piece| piece.kind())
    }

    #[must_use]
    pub fn next_shape(&self) -> Option<ShapeKind> {
        self.next_shape
    }

    /// The score: total lines cleared since the last [`Self::clear`].
    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.total_cleared_lines()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn is_board_full(&self) -> bool {
        self.board_full
    }

    /// Captures the locked grid and score as a serializable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            width: Self::WIDTH,
            height: Self::HEIGHT,
            rows: self
                .grid
                .rows()
                .map(|row| row.iter().map(|cell| cell.color_index()).collect())
                .collect(),
            score: self.score(),
            board_full: self.board_full,
        }
    }
}

#[cfg(test)]
impl BoardState {
    pub(crate) fn set_active(&mut self, piece: Piece) {
        self.active = Some(piece);
    }

    pub(crate) fn grid_mut(&mut self) -> &mut CellGrid {
        &mut self.grid
    }
}

/// Machine-readable capture of the locked grid, for session reports.
///
/// Rows are listed top-first; each cell is the renderer colour index
/// (0 empty, 1-7 per shape kind). The active piece is deliberately absent -
/// it is pose, not board.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    pub rows: Vec<Vec<u8>>,
    pub score: usize,
    pub board_full: bool,
}

#[cfg(test)]
mod tests {
    use crate::core::Rotation;

    use super::*;

    fn test_seed() -> ShapeSeed {
        "000102030405060708090a0b0c0d0e0f".parse().unwrap()
    }

    fn assert_piece_valid(board: &BoardState) {
        for (col, row) in board.current_cells() {
            let cell = board
                .cell(col, row)
                .unwrap_or_else(|e| panic!("active piece out of bounds: {e}"));
            assert_eq!(cell, Cell::Empty, "active piece overlaps lock at ({col}, {row})");
        }
    }

    fn occupied_cells(board: &BoardState) -> usize {
        board
            .grid()
            .rows()
            .flat_map(|row| row.iter())
            .filter(|cell| !cell.is_empty())
            .count()
    }

    #[test]
    fn test_spawn_promotes_lookahead() {
        let mut board = BoardState::with_seed(test_seed());
        assert_eq!(board.next_shape(), None);

        board.spawn_piece().unwrap();
        assert!(board.current_shape().is_some());
        let lookahead = board.next_shape().unwrap();

        board.spawn_piece().unwrap();
        assert_eq!(board.current_shape(), Some(lookahead));
        assert!(board.next_shape().is_some());
    }

    #[test]
    fn test_translate_commits_or_rejects_without_side_effects() {
        let mut board = BoardState::with_seed(test_seed());
        board.active = Some(Piece::new(ShapeKind::O, Rotation::default(), 0, 1));

        // Already against the left wall: the O occupies columns 0-1.
        assert!(board.try_translate(-1).is_err());
        assert_eq!(board.active_piece().unwrap().x(), 0);

        board.try_translate(1).unwrap();
        assert_eq!(board.active_piece().unwrap().x(), 1);
        assert_piece_valid(&board);
    }

    #[test]
    fn test_rotation_rejected_at_wall_without_kick() {
        let mut board = BoardState::with_seed(test_seed());
        // Vertical I against the right wall; turning it sideways would need
        // columns 7..=10 and column 10 is outside the grid.
        board.active = Some(Piece::new(ShapeKind::I, Rotation::default(), 9, 1));

        assert!(board.try_rotate(1).is_err());
        let piece = board.active_piece().unwrap();
        assert_eq!(piece.rotation(), Rotation::default());
        assert_eq!(piece.x(), 9);

        // The same rotation succeeds away from the wall.
        board.active = Some(Piece::new(ShapeKind::I, Rotation::default(), 5, 1));
        board.try_rotate(1).unwrap();
        assert_eq!(board.active_piece().unwrap().rotation(), Rotation::new(1));
        assert_piece_valid(&board);
    }

    #[test]
    fn test_rotation_rejected_against_locked_cells() {
        let mut board = BoardState::with_seed(test_seed());
        board.grid.set(4, 10, Cell::Piece(ShapeKind::L));
        // T at direction 0 occupies (5,9),(5,10),(5,11),(6,10) - clear of the
        // lock. Rotating left would put a cell on (4,10).
        board.active = Some(Piece::new(ShapeKind::T, Rotation::default(), 5, 10));
        assert_piece_valid(&board);

        assert!(board.try_rotate(-1).is_err());
        assert_eq!(board.active_piece().unwrap().rotation(), Rotation::default());
        assert_piece_valid(&board);
    }

    #[test]
    fn test_gravity_descends_then_locks_and_respawns() {
        let mut board = BoardState::with_seed(test_seed());
        board.active = Some(Piece::new(ShapeKind::I, Rotation::default(), 5, 1));

        // Vertical I spans rows y-1..=y+2, so the lowest anchor row is 17.
        for expected_y in 2..=17 {
            assert_eq!(board.gravity_step(), 0);
            assert_eq!(board.active_piece().unwrap().y(), expected_y);
            assert_piece_valid(&board);
        }

        // Next step cannot descend: lock, then respawn.
        assert_eq!(board.gravity_step(), 0);
        for row in 16..20 {
            assert_eq!(board.cell(5, row).unwrap(), Cell::Piece(ShapeKind::I));
        }
        assert_eq!(board.stats().completed_pieces(), 1);
        let respawned = board.active_piece().unwrap();
        assert_eq!(respawned.x(), 5);
        assert_piece_valid(&board);
    }

    #[test]
    fn test_hard_drop_locks_even_when_blocked_in_place() {
        let mut board = BoardState::with_seed(test_seed());
        board.active = Some(Piece::new(ShapeKind::I, Rotation::default(), 5, 1));
        // A lock directly underneath: the piece cannot descend at all.
        board.grid.set(5, 4, Cell::Piece(ShapeKind::O));

        let before = occupied_cells(&board);
        assert_eq!(board.hard_drop(), 0);
        assert_eq!(occupied_cells(&board), before + 4);
        for row in 0..4 {
            assert_eq!(board.cell(5, row).unwrap(), Cell::Piece(ShapeKind::I));
        }

        // Column 5 rows 0..4 are now locked, so every spawn pose collides.
        assert!(board.is_board_full());
        assert_eq!(board.active_piece(), None);
    }

    #[test]
    fn test_board_full_makes_mutations_no_ops_until_clear() {
        let mut board = BoardState::with_seed(test_seed());
        for row in 0..4 {
            board.grid.set(5, row, Cell::Piece(ShapeKind::Z));
            board.grid.set(6, row, Cell::Piece(ShapeKind::Z));
            board.grid.set(4, row, Cell::Piece(ShapeKind::Z));
        }

        assert!(board.spawn_piece().is_err());
        assert!(board.is_board_full());
        assert_eq!(board.active_piece(), None);

        let grid_before = board.grid().clone();
        assert_eq!(board.gravity_step(), 0);
        assert_eq!(board.hard_drop(), 0);
        assert!(board.try_rotate(1).is_err());
        assert!(board.try_translate(1).is_err());
        assert!(board.spawn_piece().is_err());
        assert_eq!(board.grid(), &grid_before);

        board.clear();
        assert!(!board.is_board_full());
        assert_eq!(board.score(), 0);
        board.spawn_piece().unwrap();
        assert!(board.current_shape().is_some());
    }

    #[test]
    fn test_quad_clear_through_hard_drop() {
        let mut board = BoardState::with_seed(test_seed());
        // Bottom four rows complete except column 5.
        for row in 16..20 {
            for col in 0..10 {
                if col == 5 {
                    continue;
                }
                board.grid.set(col, row, Cell::Piece(ShapeKind::J));
            }
        }
        board.active = Some(Piece::new(ShapeKind::I, Rotation::default(), 5, 1));

        assert_eq!(board.hard_drop(), 4);
        assert_eq!(board.score(), 4);
        assert_eq!(board.stats().line_cleared_counter()[4], 1);
        assert_eq!(occupied_cells(&board), 0);
        // The cleared board has room again, so the next piece spawned.
        assert!(board.active_piece().is_some());
        assert_piece_valid(&board);
    }

    #[test]
    fn test_lock_clears_two_split_rows_and_shifts() {
        let mut board = BoardState::with_seed(test_seed());
        // Rows 17 and 19 complete except column 5; rows 16 and 18 also miss
        // column 0. Locking a vertical I in column 5 completes exactly rows
        // 17 and 19.
        for row in 16..20 {
            for col in 1..10 {
                if col == 5 {
                    continue;
                }
                board.grid.set(col, row, Cell::Piece(ShapeKind::L));
            }
        }
        board.grid.set(0, 17, Cell::Piece(ShapeKind::L));
        board.grid.set(0, 19, Cell::Piece(ShapeKind::L));
        board.active = Some(Piece::new(ShapeKind::I, Rotation::default(), 5, 1));

        assert_eq!(board.hard_drop(), 2);
        assert_eq!(board.score(), 2);

        // The two surviving partial rows moved to the bottom, two empty rows
        // appeared at the top, and their column-0 gaps are intact.
        for row in 0..18 {
            assert_eq!(board.cell(0, row).unwrap(), Cell::Empty);
        }
        assert_eq!(board.cell(0, 18).unwrap(), Cell::Empty);
        assert_eq!(board.cell(0, 19).unwrap(), Cell::Empty);
        assert_eq!(board.cell(1, 18).unwrap(), Cell::Piece(ShapeKind::L));
        assert_eq!(board.cell(1, 19).unwrap(), Cell::Piece(ShapeKind::L));
        assert_eq!(board.cell(5, 18).unwrap(), Cell::Piece(ShapeKind::I));
        assert_eq!(board.cell(5, 19).unwrap(), Cell::Piece(ShapeKind::I));
        assert_eq!(board.cell(1, 17).unwrap(), Cell::Empty);
    }

    #[test]
    fn test_gravity_cell_accounting_over_a_session() {
        let mut board = BoardState::with_seed(test_seed());
        board.spawn_piece().unwrap();

        let mut returned = 0;
        for _ in 0..2000 {
            if board.is_board_full() {
                break;
            }
            returned += board.gravity_step();
            assert_piece_valid(&board);
            let locks = board.stats().completed_pieces();
            assert_eq!(
                occupied_cells(&board),
                locks * 4 - board.score() * BoardState::WIDTH,
            );
        }
        // Untouched pieces stack on the spawn column until the board fills.
        assert!(board.is_board_full());
        assert_eq!(board.score(), returned);
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let run = || {
            let mut board = BoardState::with_seed(test_seed());
            board.spawn_piece().unwrap();
            while !board.is_board_full() {
                board.gravity_step();
            }
            (board.stats().completed_pieces(), board.snapshot().rows)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_snapshot_reflects_locked_cells_only() {
        let mut board = BoardState::with_seed(test_seed());
        board.grid.set(0, 19, Cell::Piece(ShapeKind::S));
        board.active = Some(Piece::new(ShapeKind::I, Rotation::default(), 5, 1));

        let snapshot = board.snapshot();
        assert_eq!(snapshot.width, 10);
        assert_eq!(snapshot.height, 20);
        assert_eq!(snapshot.rows[19][0], ShapeKind::S.color_index());
        // The falling piece is not part of the snapshot.
        assert_eq!(snapshot.rows[0][5], 0);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["score"], 0);
        assert_eq!(json["board_full"], false);
    }
}
