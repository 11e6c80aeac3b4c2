//! Tunnelling: carving a new room off the side of an existing one
//!
//! Candidate sites are anchored on the source room's outermost cells in the
//! tunnel direction and pushed out past the moat. A site qualifies when
//! enough of its cells look straight back across the moat at the source.

use tracing::trace;

use super::engine::Carve;
use super::types::{CarveResult, LinkKind, RoomHandle, RoomType, Rule};
use crate::geom::{Cardinal, R2, V2};

/// Description of a room to tunnel
///
/// `size` is in the tunnel's own frame: `x` runs along the source room's
/// wall and `y` is the depth away from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tunnel {
    pub size: V2,
    pub room_type: RoomType,
    pub link: LinkKind,
    pub min_contact: Option<usize>,
    pub use_ignore: bool,
    pub rule: Rule,
}

impl Tunnel {
    pub fn new(size: V2, room_type: RoomType) -> Self {
        Self {
            size,
            room_type,
            link: LinkKind::Ignore,
            min_contact: None,
            use_ignore: false,
            rule: Rule::Rng,
        }
    }

    /// How the new room connects to its source once links are built
    pub fn link(mut self, link: LinkKind) -> Self {
        self.link = link;
        self
    }

    /// Minimum number of cells facing the source across the moat
    pub fn min_contact(mut self, min_contact: usize) -> Self {
        self.min_contact = Some(min_contact);
        self
    }

    /// Place the room directly against the source, swallowing its edge
    pub fn use_ignore(mut self, use_ignore: bool) -> Self {
        self.use_ignore = use_ignore;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rule = rule;
        self
    }
}

impl Carve {
    /// Carve a room off `from`'s side facing `direction`
    ///
    /// Records a link of `tunnel.link` from the source to the new room.
    /// Vetoes when no site has enough contact, or when the carve itself
    /// vetoes. Panics if `from` owns no cells.
    pub fn tunnel(
        &mut self,
        from: RoomHandle,
        direction: Cardinal,
        tunnel: &Tunnel,
    ) -> CarveResult<RoomHandle> {
        let size = if direction.is_horizontal() {
            tunnel.size.transposed()
        } else {
            tunnel.size
        };
        assert!(
            size.x > 0 && size.y > 0,
            "tunnel size must be positive: {:?}",
            tunnel.size
        );

        let min_contact = tunnel.min_contact.unwrap_or(if tunnel.use_ignore {
            tunnel.size.x as usize
        } else {
            1
        });

        let anchors = self.edge_anchors(from, direction, size);
        let distance = if tunnel.use_ignore { 1 } else { 2 };
        let step = direction.offset() * distance;

        let sites: Vec<R2> = anchors
            .into_iter()
            .map(|anchor| (anchor + step).sized(size))
            .filter(|site| {
                let contact = site
                    .iter()
                    .filter(|cell| {
                        self.has_contact(Some(from), site, *cell, distance, Some(direction.opposite()))
                    })
                    .count();
                contact >= min_contact
            })
            .collect();

        trace!(
            from = from.0,
            %direction,
            sites = sites.len(),
            min_contact,
            "tunnel candidates"
        );

        if sites.is_empty() {
            return self.veto();
        }

        let site = self.choose_site(&sites, tunnel.rule);
        let ignore: &[RoomHandle] = if tunnel.use_ignore { &[from] } else { &[] };

        self.atomically(|carve| {
            let room = carve.carve_ignoring(site, tunnel.room_type, ignore)?;
            carve.link_rooms(tunnel.link, from, room);
            Ok(room)
        })
    }

    /// Top-left corners for sites sharing the source's outermost row or column
    fn edge_anchors(&self, from: RoomHandle, direction: Cardinal, size: V2) -> Vec<V2> {
        let cells: Vec<V2> = self.cells_of(from).collect();
        assert!(!cells.is_empty(), "tunnel from room {:?} with no cells", from);

        let key = |c: &V2| match direction {
            Cardinal::East => c.x,
            Cardinal::West => -c.x,
            Cardinal::South => c.y,
            Cardinal::North => -c.y,
        };
        let extreme = cells.iter().map(key).max().unwrap_or_default();

        // West and north sites grow away from the source, so shift them back
        // by their own extent.
        let shift = match direction {
            Cardinal::East | Cardinal::South => V2::zero(),
            Cardinal::West => V2::new(size.x - 1, 0),
            Cardinal::North => V2::new(0, size.y - 1),
        };

        cells
            .iter()
            .filter(|c| key(c) == extreme)
            .map(|c| *c - shift)
            .collect()
    }

    /// True if `cell` sees `room` (or any room, for `None`) exactly
    /// `distance` steps away, with nothing but open space in between
    ///
    /// Only `direction` is checked if given, otherwise all four.
    pub(crate) fn has_contact(
        &self,
        room: Option<RoomHandle>,
        site: &R2,
        cell: V2,
        distance: i32,
        direction: Option<Cardinal>,
    ) -> bool {
        let directions = match direction {
            Some(d) => vec![d],
            None => Cardinal::ALL.to_vec(),
        };

        directions.into_iter().any(|dir| {
            let offset = dir.offset();
            let target = cell + offset * distance;
            let hit = match room {
                Some(room) => self.owner_of(target) == Some(room),
                None => self.is_owned(target),
            };
            hit && (1..distance).all(|i| {
                let between = cell + offset * i;
                !site.contains(between) && !self.is_owned(between)
            })
        })
    }

    fn choose_site(&mut self, sites: &[R2], rule: Rule) -> R2 {
        let best: Vec<R2> = match rule {
            Rule::Rng => sites.to_vec(),
            Rule::Dense => {
                let scores: Vec<usize> = sites
                    .iter()
                    .map(|site| {
                        site.iter()
                            .filter(|cell| self.has_contact(None, site, *cell, 2, None))
                            .count()
                    })
                    .collect();
                let max_score = scores.iter().copied().max().unwrap_or_default();
                sites
                    .iter()
                    .zip(scores)
                    .filter(|(_, score)| *score == max_score)
                    .map(|(site, _)| *site)
                    .collect()
            }
        };

        let idx = self.rng().rn2(best.len() as u32) as usize;
        best[idx]
    }
}
