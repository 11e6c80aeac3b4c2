//! Room registry: handle allocation and room types

use super::types::{RoomHandle, RoomType};

/// Allocates room handles and remembers each room's type
///
/// Handles are handed out in increasing order. Rollback destroys rooms in
/// the reverse order they were created, so the registry is a stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomRegistry {
    types: Vec<RoomType>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next handle for a room of `room_type`
    pub fn create_room(&mut self, room_type: RoomType) -> RoomHandle {
        let handle = RoomHandle(self.types.len() as u32);
        self.types.push(room_type);
        handle
    }

    /// Forget the most recently created room
    ///
    /// Panics if no rooms exist.
    pub fn destroy_last_room(&mut self) -> RoomHandle {
        match self.types.pop() {
            Some(_) => RoomHandle(self.types.len() as u32),
            None => panic!("destroy_last_room on an empty registry"),
        }
    }

    /// Type of a live room. Panics on a rolled-back or unknown handle.
    pub fn room_type(&self, handle: RoomHandle) -> RoomType {
        match self.types.get(handle.0 as usize) {
            Some(room_type) => *room_type,
            None => panic!("unknown room handle {:?}", handle),
        }
    }

    pub fn contains(&self, handle: RoomHandle) -> bool {
        (handle.0 as usize) < self.types.len()
    }

    /// Number of live rooms; also the next handle to be allocated
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All live rooms in creation order
    pub fn iter(&self) -> impl Iterator<Item = (RoomHandle, RoomType)> + '_ {
        self.types
            .iter()
            .enumerate()
            .map(|(i, t)| (RoomHandle(i as u32), *t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_sequential() {
        let mut reg = RoomRegistry::new();
        let a = reg.create_room(RoomType::Kitchen);
        let b = reg.create_room(RoomType::Closet);
        assert_eq!(a, RoomHandle(0));
        assert_eq!(b, RoomHandle(1));
        assert_eq!(reg.room_type(b), RoomType::Closet);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_destroy_last_room_reuses_handle() {
        let mut reg = RoomRegistry::new();
        reg.create_room(RoomType::Kitchen);
        let b = reg.create_room(RoomType::Closet);
        assert_eq!(reg.destroy_last_room(), b);
        assert!(!reg.contains(b));

        let c = reg.create_room(RoomType::Bedroom);
        assert_eq!(c, b);
        assert_eq!(reg.room_type(c), RoomType::Bedroom);
    }

    #[test]
    #[should_panic]
    fn test_room_type_of_destroyed_room_panics() {
        let mut reg = RoomRegistry::new();
        let a = reg.create_room(RoomType::Kitchen);
        reg.destroy_last_room();
        reg.room_type(a);
    }
}
