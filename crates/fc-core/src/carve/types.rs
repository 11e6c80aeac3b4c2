//! Records shared by the carve engine and its consumers

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

/// Opaque identifier for a carved room
///
/// Allocated sequentially by the room registry; a handle is only reused after
/// the room that held it was rolled back.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RoomHandle(pub u32);

impl RoomHandle {
    pub fn ident(self) -> u32 {
        self.0
    }
}

/// What a room is for; fixed when the room is created
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
pub enum RoomType {
    EntryZone,
    Hallway,
    Antechamber,
    LivingRoom,
    Bedroom,
    Kitchen,
    Bathroom,
    Closet,
    Gallery,
}

impl RoomType {
    /// Map character used by the ascii dump
    pub const fn tile(self) -> char {
        match self {
            RoomType::EntryZone => 'e',
            RoomType::Hallway => '.',
            RoomType::Antechamber => 'a',
            RoomType::LivingRoom => 'l',
            RoomType::Bedroom => 'b',
            RoomType::Kitchen => 'k',
            RoomType::Bathroom => 'r',
            RoomType::Closet => 'c',
            RoomType::Gallery => 'g',
        }
    }

    /// Small utility rooms whose doors are centered rather than grid-aligned
    pub const fn centers_doors(self) -> bool {
        matches!(self, RoomType::EntryZone | RoomType::Closet)
    }
}

/// How two linked rooms are joined when links are built
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum LinkKind {
    /// Recorded but never resolved
    #[default]
    Ignore,
    /// A single doorway
    Door,
    /// The whole shared wall is removed
    Complete,
    /// The shared wall becomes a counter with one gap
    Counter,
}

/// Tags placed on cells for the interior designer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Hint {
    Counter,
    Counterside,
}

/// How a tunnel picks among its candidate sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum Rule {
    /// Uniformly at random
    #[default]
    Rng,
    /// Prefer sites touching the most existing rooms
    Dense,
}

/// A recorded intent to connect two rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub kind: LinkKind,
    pub room_a: RoomHandle,
    pub room_b: RoomHandle,
}

/// Periodic grid used to line doors up across a floorplan
///
/// A door on an east or west wall scores when `(y - cy)` is a multiple of
/// `y`; a door on a north or south wall when `(x - cx)` is a multiple of `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoorGrid {
    pub x: i32,
    pub y: i32,
    pub cx: i32,
    pub cy: i32,
}

impl DoorGrid {
    /// Panics if either period is not positive.
    pub fn new(x: i32, y: i32, cx: i32, cy: i32) -> Self {
        assert!(x > 0 && y > 0, "door grid period must be positive: ({}, {})", x, y);
        Self { x, y, cx, cy }
    }

    /// Grid with the same period on both axes
    pub fn square(period: i32, cx: i32, cy: i32) -> Self {
        Self::new(period, period, cx, cy)
    }

    /// True if `coord` lies on the grid line for the given axis
    pub fn on_line(&self, coord: i32, horizontal_wall: bool) -> bool {
        if horizontal_wall {
            (coord - self.cx).rem_euclid(self.x) == 0
        } else {
            (coord - self.cy).rem_euclid(self.y) == 0
        }
    }
}

impl Default for DoorGrid {
    fn default() -> Self {
        Self::new(1, 1, 0, 0)
    }
}

/// The current speculative attempt is invalid and must be rolled back
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("carve vetoed")]
pub struct Veto;

pub type CarveResult<T> = Result<T, Veto>;

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_room_tiles_are_distinct() {
        let mut tiles: Vec<char> = RoomType::iter().map(RoomType::tile).collect();
        tiles.sort_unstable();
        tiles.dedup();
        assert_eq!(tiles.len(), RoomType::iter().count());
    }

    #[test]
    fn test_door_grid_lines() {
        let grid = DoorGrid::new(4, 5, 1, 2);
        assert!(grid.on_line(1, true));
        assert!(grid.on_line(-3, true));
        assert!(!grid.on_line(2, true));
        assert!(grid.on_line(7, false));
        assert!(grid.on_line(-3, false));
        assert!(!grid.on_line(1, false));
    }

    #[test]
    #[should_panic]
    fn test_door_grid_rejects_zero_period() {
        let _ = DoorGrid::new(0, 3, 0, 0);
    }

    #[test]
    fn test_veto_display() {
        assert_eq!(Veto.to_string(), "carve vetoed");
    }
}
