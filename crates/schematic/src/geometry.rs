//! Integer cell positions and the direction types used by orientation-valued
//! cell properties.
//!
//! Coordinates follow the usual voxel convention: `+x` is east, `+y` is up and
//! `+z` is south. A clockwise quarter turn (seen from above) maps
//! north → east → south → west.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

use bevy::math::IVec3;
use bitcode::{Decode, Encode};

// =============================================================================
// CellPos
// =============================================================================

/// A cell position, either absolute (world) or relative to a blueprint origin.
///
/// Ordering is layer-major (`y`, then `z`, then `x`) so that iterating a
/// `BTreeMap<CellPos, _>` visits the bottom layer of a structure first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Encode, Decode)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CellPos {
    pub const ORIGIN: CellPos = CellPos { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise minimum.
    pub fn min(self, other: CellPos) -> CellPos {
        CellPos::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Component-wise maximum.
    pub fn max(self, other: CellPos) -> CellPos {
        CellPos::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    /// `self + rhs`, or `None` if any component overflows.
    pub fn checked_add(self, rhs: CellPos) -> Option<CellPos> {
        Some(CellPos::new(
            self.x.checked_add(rhs.x)?,
            self.y.checked_add(rhs.y)?,
            self.z.checked_add(rhs.z)?,
        ))
    }

    /// `self - rhs`, or `None` if any component overflows.
    pub fn checked_sub(self, rhs: CellPos) -> Option<CellPos> {
        Some(CellPos::new(
            self.x.checked_sub(rhs.x)?,
            self.y.checked_sub(rhs.y)?,
            self.z.checked_sub(rhs.z)?,
        ))
    }

    /// Component-wise saturating sum, for reporting positions that cannot
    /// be addressed.
    pub fn saturating_add(self, rhs: CellPos) -> CellPos {
        CellPos::new(
            self.x.saturating_add(rhs.x),
            self.y.saturating_add(rhs.y),
            self.z.saturating_add(rhs.z),
        )
    }
}

impl Ord for CellPos {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.z, self.x).cmp(&(other.y, other.z, other.x))
    }
}

impl PartialOrd for CellPos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for CellPos {
    type Output = CellPos;

    fn add(self, rhs: CellPos) -> CellPos {
        CellPos::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for CellPos {
    type Output = CellPos;

    fn sub(self, rhs: CellPos) -> CellPos {
        CellPos::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl From<IVec3> for CellPos {
    fn from(v: IVec3) -> Self {
        CellPos::new(v.x, v.y, v.z)
    }
}

impl From<CellPos> for IVec3 {
    fn from(p: CellPos) -> Self {
        IVec3::new(p.x, p.y, p.z)
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// =============================================================================
// Cardinal
// =============================================================================

/// One of the four horizontal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Encode, Decode)]
pub enum Cardinal {
    #[default]
    North,
    East,
    South,
    West,
}

impl Cardinal {
    /// All cardinals in clockwise order starting at north.
    pub const ALL: [Cardinal; 4] = [
        Cardinal::North,
        Cardinal::East,
        Cardinal::South,
        Cardinal::West,
    ];

    /// Index in clockwise order (north = 0).
    pub fn index(self) -> u8 {
        match self {
            Cardinal::North => 0,
            Cardinal::East => 1,
            Cardinal::South => 2,
            Cardinal::West => 3,
        }
    }

    pub fn from_index(index: u8) -> Cardinal {
        Cardinal::ALL[(index % 4) as usize]
    }

    /// The clockwise neighbour (one quarter turn).
    pub fn clockwise(self) -> Cardinal {
        Cardinal::from_index(self.index() + 1)
    }

    /// Rotate clockwise by `steps` quarter turns.
    pub fn rotated(self, steps: u8) -> Cardinal {
        Cardinal::from_index(self.index() + steps % 4)
    }

    /// Number of clockwise quarter turns needed to go from `self` to `target`.
    pub fn steps_to(self, target: Cardinal) -> u8 {
        (target.index() + 4 - self.index()) % 4
    }

    /// Unit offset pointing in this direction.
    pub fn offset(self) -> CellPos {
        match self {
            Cardinal::North => CellPos::new(0, 0, -1),
            Cardinal::East => CellPos::new(1, 0, 0),
            Cardinal::South => CellPos::new(0, 0, 1),
            Cardinal::West => CellPos::new(-1, 0, 0),
        }
    }
}

// =============================================================================
// Direction
// =============================================================================

/// A full six-way facing. Vertical facings have no horizontal component and
/// are unaffected by rotation about the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Encode, Decode)]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl Direction {
    /// The horizontal component, if any.
    pub fn horizontal(self) -> Option<Cardinal> {
        match self {
            Direction::North => Some(Cardinal::North),
            Direction::East => Some(Cardinal::East),
            Direction::South => Some(Cardinal::South),
            Direction::West => Some(Cardinal::West),
            Direction::Up | Direction::Down => None,
        }
    }

    pub fn rotated(self, steps: u8) -> Direction {
        match self.horizontal() {
            Some(c) => c.rotated(steps).into(),
            None => self,
        }
    }
}

impl From<Cardinal> for Direction {
    fn from(c: Cardinal) -> Self {
        match c {
            Cardinal::North => Direction::North,
            Cardinal::East => Direction::East,
            Cardinal::South => Direction::South,
            Cardinal::West => Direction::West,
        }
    }
}

// =============================================================================
// Axis
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Encode, Decode)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// A quarter turn swaps the two horizontal axes; `Y` is fixed.
    pub fn rotated(self, steps: u8) -> Axis {
        if steps % 2 == 0 {
            return self;
        }
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
            Axis::Y => Axis::Y,
        }
    }
}
