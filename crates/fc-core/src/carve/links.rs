//! Link resolution
//!
//! Links are only intents while rooms are being carved. Once the layout is
//! settled, `build_links` turns each pending link into openings through the
//! moat between its two rooms.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::engine::Carve;
use super::types::{CarveResult, Hint, Link, LinkKind, RoomHandle};
use crate::geom::{Cardinal, V2};

impl Carve {
    /// Resolve every link recorded since the last successful build
    ///
    /// Either every pending link is applied or none are: a link whose rooms
    /// do not face each other across a moat vetoes the whole build.
    pub fn build_links(&mut self) -> CarveResult<()> {
        let pending = self.pending_links().to_vec();
        let total = self.links().len();

        self.atomically(|carve| {
            for link in &pending {
                carve.resolve_link(*link)?;
            }
            carve.mark_links_resolved(total);
            Ok(())
        })?;

        info!(links = pending.len(), "links built");
        Ok(())
    }

    fn resolve_link(&mut self, link: Link) -> CarveResult<()> {
        if link.kind == LinkKind::Ignore {
            return Ok(());
        }

        let openings = self.door_openings(link.room_a, link.room_b);
        if openings.is_empty() {
            debug!(
                room_a = link.room_a.0,
                room_b = link.room_b.0,
                kind = ?link.kind,
                "link between rooms that do not touch"
            );
            return self.veto();
        }

        match link.kind {
            LinkKind::Ignore => {}
            LinkKind::Door => {
                let door = self.pick_door(link, &openings);
                self.carve_tile(door, Some(link.room_a));
            }
            LinkKind::Complete => {
                for &cell in openings.keys() {
                    self.carve_tile(cell, Some(link.room_a));
                }
            }
            LinkKind::Counter => {
                let door = self.pick_door(link, &openings);
                for &cell in openings.keys() {
                    self.carve_tile(cell, Some(link.room_a));
                    if cell != door {
                        self.tag_hint(Hint::Counter, cell);
                    }
                }
                for side in door.orthogonal() {
                    if self.is_owned(side) && !openings.contains_key(&side) {
                        self.tag_hint(Hint::Counterside, side);
                    }
                }
            }
        }
        Ok(())
    }

    /// Moat cells between `room_a` and `room_b`, with the direction from
    /// `room_a` they were found in
    pub fn door_openings(&self, room_a: RoomHandle, room_b: RoomHandle) -> BTreeMap<V2, Cardinal> {
        let mut openings = BTreeMap::new();
        for dir in Cardinal::ALL {
            let d = dir.offset();
            for cell in self.cells_of(room_a) {
                if !self.is_owned(cell + d) && self.owner_of(cell + d * 2) == Some(room_b) {
                    openings.entry(cell + d).or_insert(dir);
                }
            }
        }
        openings
    }

    fn pick_door(&mut self, link: Link, openings: &BTreeMap<V2, Cardinal>) -> V2 {
        let centered = self.room_type(link.room_a).centers_doors()
            || self.room_type(link.room_b).centers_doors();

        let cells: Vec<V2> = openings.keys().copied().collect();
        if centered {
            return cells[cells.len() / 2];
        }

        let grid = self.grid();
        let scores: Vec<u32> = openings
            .iter()
            .map(|(cell, dir)| {
                let on_grid = if dir.is_horizontal() {
                    grid.on_line(cell.y, false)
                } else {
                    grid.on_line(cell.x, true)
                };
                u32::from(on_grid)
            })
            .collect();
        let best_score = scores.iter().copied().max().unwrap_or_default();
        let best: Vec<V2> = cells
            .into_iter()
            .zip(scores)
            .filter(|(_, score)| *score == best_score)
            .map(|(cell, _)| cell)
            .collect();

        let idx = self.rng().rn2(best.len() as u32) as usize;
        best[idx]
    }
}
