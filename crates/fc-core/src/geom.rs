//! Integer grid geometry
//!
//! `V2` points, `R2` half-open rectangles and the four compass directions
//! used by the carve engine and snake cursors.

use core::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::rng::GameRng;

/// A point (or offset) on the integer grid
///
/// Ordered row-major (`y` first) so sorted cell lists read top to bottom,
/// left to right.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct V2 {
    pub y: i32,
    pub x: i32,
}

impl V2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    pub const fn is_unsigned(&self) -> bool {
        self.x >= 0 && self.y >= 0
    }

    /// Rectangle spanning from this point to `other` (corners in any order)
    pub fn to(self, other: V2) -> R2 {
        R2::new_4i(self.x, self.y, other.x, other.y)
    }

    /// Rectangle with this point as its top-left corner
    pub fn sized(self, size: V2) -> R2 {
        R2::new(self, size)
    }

    pub fn manhattan(self, other: V2) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// The swapped point: `(y, x)`
    pub const fn transposed(self) -> Self {
        Self::new(self.y, self.x)
    }

    /// All 8 surrounding cells
    pub fn neighbors(self) -> impl Iterator<Item = V2> {
        (-1..=1).flat_map(move |dy| {
            (-1..=1).filter_map(move |dx| {
                if dx == 0 && dy == 0 {
                    None
                } else {
                    Some(V2::new(self.x + dx, self.y + dy))
                }
            })
        })
    }

    /// The 4 orthogonally adjacent cells, in `Cardinal::ALL` order
    pub fn orthogonal(self) -> impl Iterator<Item = V2> {
        Cardinal::ALL.into_iter().map(move |d| self + d.offset())
    }
}

impl Add for V2 {
    type Output = V2;

    fn add(self, rhs: V2) -> V2 {
        V2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for V2 {
    type Output = V2;

    fn sub(self, rhs: V2) -> V2 {
        V2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for V2 {
    type Output = V2;

    fn mul(self, rhs: i32) -> V2 {
        V2::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<V2> for V2 {
    type Output = V2;

    fn mul(self, rhs: V2) -> V2 {
        V2::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Neg for V2 {
    type Output = V2;

    fn neg(self) -> V2 {
        V2::new(-self.x, -self.y)
    }
}

/// An axis-aligned rectangle: `top` inclusive, `top + size` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct R2 {
    pub top: V2,
    pub size: V2,
}

impl R2 {
    /// Create a rectangle. Panics on a negative size.
    pub fn new(top: V2, size: V2) -> Self {
        assert!(size.is_unsigned(), "negative rectangle size: {:?}", size);
        Self { top, size }
    }

    /// Rectangle between two corner points, normalized so `size` is unsigned
    pub fn new_4i(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let top = V2::new(x0.min(x1), y0.min(y1));
        let bot = V2::new(x0.max(x1), y0.max(y1));
        Self::new(top, bot - top)
    }

    pub fn width(&self) -> i32 {
        self.size.x
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    pub fn area(&self) -> usize {
        (self.size.x as usize) * (self.size.y as usize)
    }

    /// True if the rectangle covers at least one cell
    pub fn is_valid(&self) -> bool {
        self.size.x > 0 && self.size.y > 0
    }

    /// Last cell inside the rectangle. Panics on an empty rectangle.
    pub fn bot_inclusive(&self) -> V2 {
        assert!(self.is_valid(), "empty rectangle has no bottom cell");
        self.top + self.size - V2::new(1, 1)
    }

    pub fn bot_exclusive(&self) -> V2 {
        self.top + self.size
    }

    /// Grow by `amount` on every side
    pub fn expand(&self, amount: V2) -> R2 {
        R2::new(self.top - amount, self.size + amount * 2)
    }

    pub fn contains(&self, v: V2) -> bool {
        self.top.x <= v.x
            && v.x < self.top.x + self.size.x
            && self.top.y <= v.y
            && v.y < self.top.y + self.size.y
    }

    pub fn contains_rect(&self, other: &R2) -> bool {
        other.is_valid() && self.contains(other.top) && self.contains(other.bot_inclusive())
    }

    /// Cells row by row, top to bottom
    pub fn iter(&self) -> impl Iterator<Item = V2> + use<> {
        let R2 { top, size } = *self;
        (0..size.y).flat_map(move |y| (0..size.x).map(move |x| V2::new(top.x + x, top.y + y)))
    }
}

impl IntoIterator for R2 {
    type Item = V2;
    type IntoIter = Box<dyn Iterator<Item = V2>>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Compass direction; `North` is toward negative `y`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

impl Cardinal {
    pub const ALL: [Cardinal; 4] = [Cardinal::North, Cardinal::East, Cardinal::South, Cardinal::West];

    /// Rotate 90 degrees clockwise
    pub const fn right(self) -> Self {
        match self {
            Cardinal::North => Cardinal::East,
            Cardinal::East => Cardinal::South,
            Cardinal::South => Cardinal::West,
            Cardinal::West => Cardinal::North,
        }
    }

    /// Rotate 90 degrees counter-clockwise
    pub const fn left(self) -> Self {
        match self {
            Cardinal::North => Cardinal::West,
            Cardinal::East => Cardinal::North,
            Cardinal::South => Cardinal::East,
            Cardinal::West => Cardinal::South,
        }
    }

    pub const fn opposite(self) -> Self {
        self.right().right()
    }

    /// Unit step in this direction
    pub const fn offset(self) -> V2 {
        match self {
            Cardinal::North => V2::new(0, -1),
            Cardinal::East => V2::new(1, 0),
            Cardinal::South => V2::new(0, 1),
            Cardinal::West => V2::new(-1, 0),
        }
    }

    /// East and West move along the x axis
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Cardinal::East | Cardinal::West)
    }

    /// All four directions in random order
    pub fn all_shuffled(rng: &mut GameRng) -> [Cardinal; 4] {
        let mut all = Self::ALL;
        rng.shuffle(&mut all);
        all
    }
}
