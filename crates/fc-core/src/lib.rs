//! Procedural floorplan generation
//!
//! Rooms are carved one rectangle at a time into an unbounded grid. Every
//! change is logged so that speculative work can be vetoed and rolled back
//! exactly, which lets recipes search for a layout by trial and error.
//!
//! - [`carve`]: the transactional engine, snake cursors, post-processing
//!   and link resolution
//! - [`interior`]: finished floorplans with classified room cells
//! - [`floorplans`]: apartment and restaurant recipes and the retry driver
//! - [`config`]: generation settings

pub mod carve;
pub mod config;
pub mod floorplans;
pub mod geom;
pub mod interior;
pub mod rng;

pub use carve::{Carve, CarveResult, RoomHandle, RoomType, Snake, Tunnel, Veto};
pub use config::{ConfigError, GenerationConfig};
pub use floorplans::{FloorplanError, PlanKind, generate};
pub use geom::{Cardinal, R2, V2};
pub use interior::{Floorplan, RoomLayout};
pub use rng::GameRng;
