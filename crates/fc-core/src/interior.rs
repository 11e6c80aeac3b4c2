//! Finished floorplans
//!
//! A [`Floorplan`] is an immutable snapshot of a carve engine after links
//! are built. Each room's cells are split into doorways, boundary and center
//! cells, which is what furniture placement works from.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::carve::{Carve, Hint, RoomHandle, RoomType};
use crate::geom::{R2, V2};
use crate::rng::GameRng;

/// One room of a finished floorplan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomLayout {
    pub handle: RoomHandle,
    pub room_type: RoomType,
    pub cells: BTreeSet<V2>,
    /// Cells open on both sides along one axis
    pub doors: BTreeSet<V2>,
    /// Non-door cells touching open space, diagonals included
    pub boundary: BTreeSet<V2>,
    pub center: BTreeSet<V2>,
}

impl RoomLayout {
    pub fn area(&self) -> usize {
        self.cells.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Floorplan {
    rooms: Vec<RoomLayout>,
    hints: BTreeMap<Hint, BTreeSet<V2>>,
}

impl Floorplan {
    pub fn from_carve(carve: &Carve) -> Self {
        let rooms = carve
            .tiles()
            .rooms()
            .map(|room| {
                let cells: BTreeSet<V2> = carve.cells_of(room).collect();
                (room, carve.room_type(room), cells)
            })
            .collect();
        Self::classify(rooms, carve.hints().clone())
    }

    fn classify(
        rooms: Vec<(RoomHandle, RoomType, BTreeSet<V2>)>,
        hints: BTreeMap<Hint, BTreeSet<V2>>,
    ) -> Self {
        let owned: BTreeSet<V2> = rooms
            .iter()
            .flat_map(|(_, _, cells)| cells.iter().copied())
            .collect();
        let blocked = |v: V2| !owned.contains(&v);

        let rooms = rooms
            .into_iter()
            .map(|(handle, room_type, cells)| {
                let mut doors = BTreeSet::new();
                let mut boundary = BTreeSet::new();
                let mut center = BTreeSet::new();

                for &v in &cells {
                    let across_x = blocked(v - V2::new(1, 0)) && blocked(v + V2::new(1, 0));
                    let across_y = blocked(v - V2::new(0, 1)) && blocked(v + V2::new(0, 1));
                    if across_x || across_y {
                        doors.insert(v);
                    } else if v.neighbors().any(blocked) {
                        boundary.insert(v);
                    } else {
                        center.insert(v);
                    }
                }

                RoomLayout {
                    handle,
                    room_type,
                    cells,
                    doors,
                    boundary,
                    center,
                }
            })
            .collect();

        Self { rooms, hints }
    }

    /// Rooms in creation order
    pub fn rooms(&self) -> &[RoomLayout] {
        &self.rooms
    }

    pub fn room(&self, handle: RoomHandle) -> Option<&RoomLayout> {
        self.rooms.iter().find(|room| room.handle == handle)
    }

    pub fn ident_rooms(&self, room_type: RoomType) -> Vec<&RoomLayout> {
        self.rooms
            .iter()
            .filter(|room| room.room_type == room_type)
            .collect()
    }

    /// The first room of `room_type`. Panics if there is none.
    pub fn first_room(&self, room_type: RoomType) -> &RoomLayout {
        match self.rooms.iter().find(|room| room.room_type == room_type) {
            Some(room) => room,
            None => panic!("floorplan has no {} room", room_type),
        }
    }

    pub fn hints(&self) -> &BTreeMap<Hint, BTreeSet<V2>> {
        &self.hints
    }

    pub fn hinted(&self, hint: Hint) -> impl Iterator<Item = V2> + '_ {
        self.hints.get(&hint).into_iter().flatten().copied()
    }

    pub fn owner_of(&self, cell: V2) -> Option<RoomHandle> {
        self.rooms
            .iter()
            .find(|room| room.cells.contains(&cell))
            .map(|room| room.handle)
    }

    /// Smallest rectangle holding every owned cell
    pub fn bounds(&self) -> Option<R2> {
        let mut cells = self.rooms.iter().flat_map(|room| room.cells.iter());
        let first = *cells.next()?;
        let (lo, hi) = cells.fold((first, first), |(lo, hi), c| {
            (
                V2::new(lo.x.min(c.x), lo.y.min(c.y)),
                V2::new(hi.x.max(c.x), hi.y.max(c.y)),
            )
        });
        Some(lo.to(hi + V2::new(1, 1)))
    }

    /// A copy rotated by a random quarter turn and possibly mirrored
    ///
    /// The result is shifted so its bounds start at the origin.
    pub fn permuted(&self, rng: &mut GameRng) -> Floorplan {
        let turns = rng.rn2(4);
        let mirror = rng.coin();

        let transform = |v: V2| {
            let mut v = if mirror { V2::new(-v.x, v.y) } else { v };
            for _ in 0..turns {
                v = V2::new(-v.y, v.x);
            }
            v
        };

        let moved: Vec<V2> = self
            .rooms
            .iter()
            .flat_map(|room| room.cells.iter().map(|c| transform(*c)))
            .collect();
        let origin = moved
            .iter()
            .copied()
            .reduce(|a, b| V2::new(a.x.min(b.x), a.y.min(b.y)))
            .unwrap_or_default();
        let place = |v: V2| transform(v) - origin;

        let rooms = self
            .rooms
            .iter()
            .map(|room| {
                let cells = room.cells.iter().map(|c| place(*c)).collect();
                (room.handle, room.room_type, cells)
            })
            .collect();
        let hints = self
            .hints
            .iter()
            .map(|(hint, cells)| (*hint, cells.iter().map(|c| place(*c)).collect()))
            .collect();

        Self::classify(rooms, hints)
    }
}

impl fmt::Display for Floorplan {
    /// `#` walls, `.` floor, `+` doorways and `=` counters
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bounds = self
            .bounds()
            .unwrap_or_else(|| V2::zero().sized(V2::new(1, 1)))
            .expand(V2::new(1, 1));

        let counters: BTreeSet<V2> = self.hinted(Hint::Counter).collect();
        let owners: BTreeMap<V2, &RoomLayout> = self
            .rooms
            .iter()
            .flat_map(|room| room.cells.iter().map(move |c| (*c, room)))
            .collect();

        for y in bounds.top.y..bounds.bot_exclusive().y {
            if y != bounds.top.y {
                writeln!(f)?;
            }
            for x in bounds.top.x..bounds.bot_exclusive().x {
                let cell = V2::new(x, y);
                let ch = match owners.get(&cell) {
                    Some(_) if counters.contains(&cell) => '=',
                    Some(room) if room.doors.contains(&cell) => '+',
                    Some(_) => '.',
                    None if cell.neighbors().any(|n| owners.contains_key(&n)) => '#',
                    None => ' ',
                };
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}
