pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding at the requested pose")]
pub struct PieceCollisionError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("spawn position is blocked, the board is full")]
pub struct BoardFullError;

#[derive(Debug, Clone, Copy, derive_more::Display, derive_more::Error)]
#[display("cell coordinate ({col}, {row}) is outside the playable grid")]
pub struct InvalidCoordinateError {
    pub col: i16,
    pub row: i16,
}
