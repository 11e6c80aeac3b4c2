//! Ascii dump of the tile map, for logs and the command line

use std::fmt;

use super::engine::Carve;
use crate::geom::V2;

impl fmt::Display for Carve {
    /// One character per cell over the owned bounding box plus a margin
    ///
    /// Owned cells show their room type's tile, open cells touching a room
    /// show `-`, everything else is blank.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tiles = self.tiles();
        let (lo, hi) = tiles
            .iter()
            .fold(None, |acc: Option<(V2, V2)>, (cell, _)| match acc {
                None => Some((cell, cell)),
                Some((lo, hi)) => Some((
                    V2::new(lo.x.min(cell.x), lo.y.min(cell.y)),
                    V2::new(hi.x.max(cell.x), hi.y.max(cell.y)),
                )),
            })
            .unwrap_or((V2::zero(), V2::zero()));

        for y in lo.y - 1..=hi.y + 1 {
            if y != lo.y - 1 {
                writeln!(f)?;
            }
            for x in lo.x - 1..=hi.x + 1 {
                let cell = V2::new(x, y);
                let ch = match tiles.owner_of(cell) {
                    Some(room) => self.room_type(room).tile(),
                    None if cell.neighbors().any(|n| tiles.is_owned(n)) => '-',
                    None => ' ',
                };
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}
