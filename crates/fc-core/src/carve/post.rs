//! Post-processing: dense expansion and erosion
//!
//! These reshape one room after carving. They only ever claim unowned
//! cells or release the room's own cells, and every change goes through
//! the logged tile primitive so an enclosing veto point still undoes them.
//!
//! The expansion lookahead is a tuned heuristic, not an optimal packing; it
//! occasionally leaves odd notches next to closets.

use std::collections::BTreeSet;

use tracing::trace;

use super::engine::Carve;
use super::types::RoomHandle;
use crate::geom::{Cardinal, V2};

/// Scan order used by expansion and erosion
const SCAN: [Cardinal; 4] = [Cardinal::West, Cardinal::North, Cardinal::East, Cardinal::South];

impl Carve {
    /// Grow `room` into open cells until a full pass claims nothing
    ///
    /// An open cell next to the room is claimed when the room continues two
    /// steps out (filling a notch), or when the cell two steps out is open
    /// and something is owned three or four steps out, so the claim stops
    /// one moat short of the neighbour.
    pub fn expand_densely(&mut self, room: RoomHandle) {
        loop {
            let cells: Vec<V2> = self.cells_of(room).collect();
            let mut to_add = BTreeSet::new();

            for dir in SCAN {
                let d = dir.offset();
                for &t in &cells {
                    if self.is_owned(t + d) {
                        continue;
                    }

                    if self.owner_of(t + d * 2) == Some(room) {
                        to_add.insert(t + d);
                        continue;
                    }

                    if self.is_owned(t + d * 2) {
                        continue;
                    }

                    let t3 = self.is_owned(t + d * 3);
                    let t4 = self.is_owned(t + d * 4);
                    if t3 || t4 {
                        to_add.insert(t + d);
                    }
                }
            }

            if to_add.is_empty() {
                break;
            }

            trace!(room = room.0, added = to_add.len(), "expand pass");
            for t in to_add {
                self.carve_tile(t, Some(room));
            }
        }
    }

    /// Trim cells with nothing owned within two steps on two adjacent sides
    ///
    /// Each direction is paired with its clockwise neighbour.
    pub fn erode(&mut self, room: RoomHandle, iterations: usize) {
        for _ in 0..iterations {
            let cells: Vec<V2> = self.cells_of(room).collect();
            let mut to_remove = BTreeSet::new();

            for d1 in SCAN {
                let (u, l) = (d1.offset(), d1.right().offset());
                for &t in &cells {
                    let near = self.is_owned(t + u)
                        || self.is_owned(t + u * 2)
                        || self.is_owned(t + l)
                        || self.is_owned(t + l * 2);
                    if !near {
                        to_remove.insert(t);
                    }
                }
            }

            trace!(room = room.0, removed = to_remove.len(), "erode pass");
            for t in to_remove {
                self.carve_tile(t, None);
            }
        }
    }

    /// Remove cells that are open on both sides along either axis
    ///
    /// Cleans up the one-cell-wide strips carving sometimes leaves behind.
    pub fn erode_1tile_wonk(&mut self, room: RoomHandle) {
        let cells: Vec<V2> = self.cells_of(room).collect();
        let mut to_remove = BTreeSet::new();

        for dir in [Cardinal::West, Cardinal::North] {
            let d = dir.offset();
            for &t in &cells {
                if !self.is_owned(t + d) && !self.is_owned(t - d) {
                    to_remove.insert(t);
                }
            }
        }

        for t in to_remove {
            self.carve_tile(t, None);
        }
    }
}
