use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Rotation state of a shape.
///
/// Represents one of four rotation states:
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Rotation operations wrap around modulo 4. Shapes with rotational symmetry
/// (I, S, Z have two distinct silhouettes, O has one) still track all four
/// states; the symmetry is applied when looking up cell offsets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rotation(u8);

impl Rotation {
    #[must_use]
    pub const fn new(direction: u8) -> Self {
        Self(direction % 4)
    }

    #[must_use]
    pub fn rotated_right(self) -> Self {
        Rotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub fn rotated_left(self) -> Self {
        Rotation((self.0 + 3) % 4)
    }

    /// Returns the rotation index in `0..4`.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Enum representing the kind of shape (tetromino).
///
/// The discriminant doubles as the colour index renderers use for locked
/// cells (`0` is reserved for an empty cell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    /// I-shape.
    I = 1,
    /// L-shape.
    L = 2,
    /// J-shape.
    J = 3,
    /// T-shape.
    T = 4,
    /// O-shape.
    O = 5,
    /// S-shape.
    S = 6,
    /// Z-shape.
    Z = 7,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        match rng.random_range(1..=7) {
            1 => ShapeKind::I,
            2 => ShapeKind::L,
            3 => ShapeKind::J,
            4 => ShapeKind::T,
            5 => ShapeKind::O,
            6 => ShapeKind::S,
            _ => ShapeKind::Z,
        }
    }
}

/// Cell offsets of a shape relative to its anchor, as `(col, row)` pairs.
///
/// Row offsets grow downward, so a negative row offset is above the anchor.
pub type ShapeOffsets = [(i8, i8); 4];

/// Bounding box of a shape's offsets, used for spawn and preview centering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingOffsets {
    pub min_col: i8,
    pub max_col: i8,
    pub min_row: i8,
    pub max_row: i8,
}

impl ShapeKind {
    /// Number of shape kinds (7).
    pub const LEN: usize = 7;

    /// All shape kinds in colour-index order.
    pub const ALL: [Self; Self::LEN] = [
        ShapeKind::I,
        ShapeKind::L,
        ShapeKind::J,
        ShapeKind::T,
        ShapeKind::O,
        ShapeKind::S,
        ShapeKind::Z,
    ];

    /// Returns the anchor-relative cell offsets for this shape in the given
    /// rotation.
    #[must_use]
    pub fn offsets(self, rotation: Rotation) -> ShapeOffsets {
        SHAPE_OFFSETS[self.table_index()][rotation.as_usize()]
    }

    /// Returns an iterator of absolute cells occupied by this shape at the
    /// given rotation, translated by `(x, y)`.
    pub fn cells(self, rotation: Rotation, x: i16, y: i16) -> impl Iterator<Item = (i16, i16)> {
        self.offsets(rotation)
            .into_iter()
            .map(move |(dx, dy)| (x + i16::from(dx), y + i16::from(dy)))
    }

    /// Returns the bounding box of the offsets for the given rotation.
    #[must_use]
    pub fn bounding(self, rotation: Rotation) -> BoundingOffsets {
        let mut bounds = BoundingOffsets {
            min_col: 0,
            max_col: 0,
            min_row: 0,
            max_row: 0,
        };
        for (col, row) in self.offsets(rotation) {
            bounds.min_col = bounds.min_col.min(col);
            bounds.max_col = bounds.max_col.max(col);
            bounds.min_row = bounds.min_row.min(row);
            bounds.max_row = bounds.max_row.max(row);
        }
        bounds
    }

    /// Returns the colour index renderers use for this shape's locked cells.
    #[must_use]
    pub const fn color_index(self) -> u8 {
        self as u8
    }

    /// Returns the single character representation of this shape kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadra_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::I.as_char(), 'I');
    /// assert_eq!(ShapeKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::L => 'L',
            ShapeKind::J => 'J',
            ShapeKind::T => 'T',
            ShapeKind::O => 'O',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
        }
    }

    /// Parses a shape kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(ShapeKind::I),
            'L' => Some(ShapeKind::L),
            'J' => Some(ShapeKind::J),
            'T' => Some(ShapeKind::T),
            'O' => Some(ShapeKind::O),
            'S' => Some(ShapeKind::S),
            'Z' => Some(ShapeKind::Z),
            _ => None,
        }
    }

    const fn table_index(self) -> usize {
        self as usize - 1
    }
}

const fn rotated_cw(offsets: ShapeOffsets) -> ShapeOffsets {
    let mut out = [(0i8, 0i8); 4];
    let mut i = 0;
    while i < 4 {
        let (col, row) = offsets[i];
        out[i] = (-row, col);
        i += 1;
    }
    out
}

const fn rotated_ccw(offsets: ShapeOffsets) -> ShapeOffsets {
    let mut out = [(0i8, 0i8); 4];
    let mut i = 0;
    while i < 4 {
        let (col, row) = offsets[i];
        out[i] = (row, -col);
        i += 1;
    }
    out
}

const fn negated(offsets: ShapeOffsets) -> ShapeOffsets {
    let mut out = [(0i8, 0i8); 4];
    let mut i = 0;
    while i < 4 {
        let (col, row) = offsets[i];
        out[i] = (-col, -row);
        i += 1;
    }
    out
}

/// Generates the 4 rotation states of a shape from its spawn-state offsets.
///
/// O never changes; I, S and Z alternate between two silhouettes (180° is
/// the identity for them); the remaining shapes cycle through four distinct
/// states.
const fn rotation_states(kind: ShapeKind, base: ShapeOffsets) -> [ShapeOffsets; 4] {
    match kind {
        ShapeKind::O => [base; 4],
        ShapeKind::I | ShapeKind::S | ShapeKind::Z => {
            let turned = rotated_cw(base);
            [base, turned, base, turned]
        }
        _ => [base, rotated_cw(base), negated(base), rotated_ccw(base)],
    }
}

const SHAPE_OFFSETS: [[ShapeOffsets; 4]; ShapeKind::LEN] = [
    // I-shape (spawns vertically)
    rotation_states(ShapeKind::I, [(0, -1), (0, 0), (0, 1), (0, 2)]),
    // L-shape
    rotation_states(ShapeKind::L, [(0, -1), (0, 0), (0, 1), (1, 1)]),
    // J-shape
    rotation_states(ShapeKind::J, [(0, -1), (0, 0), (0, 1), (-1, 1)]),
    // T-shape
    rotation_states(ShapeKind::T, [(0, -1), (0, 0), (0, 1), (1, 0)]),
    // O-shape
    rotation_states(ShapeKind::O, [(0, 0), (0, -1), (1, 0), (1, -1)]),
    // S-shape
    rotation_states(ShapeKind::S, [(0, 0), (0, -1), (-1, 0), (1, -1)]),
    // Z-shape
    rotation_states(ShapeKind::Z, [(0, 0), (0, -1), (1, 0), (-1, -1)]),
];
