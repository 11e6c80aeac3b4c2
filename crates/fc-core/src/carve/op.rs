//! Operation log records
//!
//! Every mutation of carve state is one of these. Rolling back replays the
//! log backwards, applying each record's exact inverse.

use super::types::{Hint, Link, RoomHandle, RoomType};
use crate::geom::V2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarveOp {
    /// A room was allocated in the registry
    CreateRoom(RoomType),
    /// One cell changed hands
    CarveTile {
        position: V2,
        old_owner: Option<RoomHandle>,
        new_owner: Option<RoomHandle>,
    },
    FreezeRoom(RoomHandle),
    LinkRooms(Link),
    /// The resolved-link cursor advanced from `from` to `to`
    ResolveLinks { from: usize, to: usize },
    /// A hint tag was added to a cell that did not carry it
    TagHint { hint: Hint, cell: V2 },
}
