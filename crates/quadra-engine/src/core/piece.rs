use super::{
    GRID_WIDTH,
    shape::{Rotation, ShapeKind},
};

/// An active piece at a specific pose on the board.
///
/// `Piece` is an immutable value type: movement and rotation return new
/// instances, and committing a pose is the board's decision. This keeps
/// candidate poses free to construct and test without touching board state.
///
/// # Coordinate System
///
/// - `(x, y)` is the anchor cell, relative to the top-left of the grid
/// - X increases rightward (columns), Y increases downward (rows)
/// - Cell offsets may reach above the anchor (negative row offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: ShapeKind,
    rotation: Rotation,
    x: i16,
    y: i16,
}

impl Piece {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    const SPAWN_X: i16 = (GRID_WIDTH / 2) as i16;

    /// Creates a piece at the spawn pose: rotation 0, anchored at the
    /// board's horizontal center, with its topmost occupied cell on row 0.
    #[must_use]
    pub fn spawn(kind: ShapeKind) -> Self {
        let bounds = kind.bounding(Rotation::default());
        Self {
            kind,
            rotation: Rotation::default(),
            x: Self::SPAWN_X,
            y: -i16::from(bounds.min_row),
        }
    }

    #[must_use]
    pub const fn new(kind: ShapeKind, rotation: Rotation, x: i16, y: i16) -> Self {
        Self {
            kind,
            rotation,
            x,
            y,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub const fn x(&self) -> i16 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i16 {
        self.y
    }

    /// Returns the absolute cells occupied at this pose.
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> {
        self.kind.cells(self.rotation, self.x, self.y)
    }

    #[must_use]
    pub fn translated(&self, dx: i16) -> Self {
        Self {
            x: self.x + dx,
            ..*self
        }
    }

    #[must_use]
    pub fn dropped(&self) -> Self {
        Self {
            y: self.y + 1,
            ..*self
        }
    }

    /// Returns the pose rotated one step: right for positive `delta`, left
    /// for negative. Position is unchanged.
    #[must_use]
    pub fn rotated(&self, delta: i8) -> Self {
        let rotation = if delta >= 0 {
            self.rotation.rotated_right()
        } else {
            self.rotation.rotated_left()
        };
        Self { rotation, ..*self }
    }
}
