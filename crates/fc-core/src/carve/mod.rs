//! Transactional room carving
//!
//! [`Carve`] holds the whole in-progress floorplan: which room owns each
//! cell, which rooms are frozen, and which rooms should be linked. Every
//! change goes through an operation log, so a recipe can try something
//! speculative inside [`Carve::veto_point`] and have it undone exactly if it
//! does not work out.
//!
//! Recipes usually drive the engine through [`Snake`] cursors, which tunnel
//! new rooms off the side of existing ones.

mod engine;
mod links;
mod op;
mod post;
mod registry;
mod render;
mod snake;
mod tiles;
mod tunnel;
mod types;

pub use engine::{Carve, CarveState};
pub use op::CarveOp;
pub use registry::RoomRegistry;
pub use snake::Snake;
pub use tiles::TileMap;
pub use tunnel::Tunnel;
pub use types::{
    CarveResult, DoorGrid, Hint, Link, LinkKind, RoomHandle, RoomType, Rule, Veto,
};
