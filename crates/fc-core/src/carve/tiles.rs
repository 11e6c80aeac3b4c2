//! Tile ownership map
//!
//! A one-to-many relation between rooms and the cells they own. Lookups by
//! cell go through a hash index; each room's cells are kept ordered so every
//! scan over them is deterministic for a given seed.

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashMap;

use super::types::RoomHandle;
use crate::geom::V2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileMap {
    owners: HashMap<V2, RoomHandle>,
    cells: BTreeMap<RoomHandle, BTreeSet<V2>>,
}

impl TileMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner_of(&self, cell: V2) -> Option<RoomHandle> {
        self.owners.get(&cell).copied()
    }

    pub fn is_owned(&self, cell: V2) -> bool {
        self.owners.contains_key(&cell)
    }

    /// Cells owned by `room`, row-major; empty for a room with no cells
    pub fn cells_of(&self, room: RoomHandle) -> impl Iterator<Item = V2> + '_ {
        self.cells.get(&room).into_iter().flatten().copied()
    }

    /// Number of cells owned by `room`
    pub fn area(&self, room: RoomHandle) -> usize {
        self.cells.get(&room).map_or(0, BTreeSet::len)
    }

    /// Assign `cell` to `owner`, or clear it with `None`
    ///
    /// Any previous owner loses the cell. Nothing is logged here.
    pub fn set_owner(&mut self, cell: V2, owner: Option<RoomHandle>) {
        let previous = match owner {
            Some(room) => self.owners.insert(cell, room),
            None => self.owners.remove(&cell),
        };

        if let Some(prev) = previous
            && let Some(set) = self.cells.get_mut(&prev)
        {
            set.remove(&cell);
            if set.is_empty() {
                self.cells.remove(&prev);
            }
        }

        if let Some(room) = owner {
            self.cells.entry(room).or_default().insert(cell);
        }
    }

    /// Rooms owning at least one cell, ascending
    pub fn rooms(&self) -> impl Iterator<Item = RoomHandle> + '_ {
        self.cells.keys().copied()
    }

    /// Every `(cell, owner)` pair
    pub fn iter(&self) -> impl Iterator<Item = (V2, RoomHandle)> + '_ {
        self.cells
            .iter()
            .flat_map(|(room, cells)| cells.iter().map(move |c| (*c, *room)))
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_owner_moves_cell() {
        let mut map = TileMap::new();
        let a = RoomHandle(0);
        let b = RoomHandle(1);
        let c = V2::new(3, 4);

        map.set_owner(c, Some(a));
        assert_eq!(map.owner_of(c), Some(a));
        assert_eq!(map.area(a), 1);

        map.set_owner(c, Some(b));
        assert_eq!(map.owner_of(c), Some(b));
        assert_eq!(map.area(a), 0);
        assert_eq!(map.area(b), 1);
        assert_eq!(map.rooms().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_clearing_cell() {
        let mut map = TileMap::new();
        let a = RoomHandle(0);
        map.set_owner(V2::new(0, 0), Some(a));
        map.set_owner(V2::new(1, 0), Some(a));
        map.set_owner(V2::new(0, 0), None);
        map.set_owner(V2::new(9, 9), None);

        assert!(!map.is_owned(V2::new(0, 0)));
        assert_eq!(map.cells_of(a).collect::<Vec<_>>(), vec![V2::new(1, 0)]);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_restoring_previous_state_compares_equal() {
        let mut map = TileMap::new();
        let a = RoomHandle(0);
        map.set_owner(V2::new(0, 0), Some(a));
        let before = map.clone();

        map.set_owner(V2::new(0, 0), Some(RoomHandle(1)));
        map.set_owner(V2::new(0, 0), Some(a));
        assert_eq!(map, before);
    }
}
