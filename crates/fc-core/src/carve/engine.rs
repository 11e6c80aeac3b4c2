//! The carve engine
//!
//! Owns the room registry, tile map, frozen set, links and hints. All state
//! changes are appended to an operation log so a veto point can restore the
//! state exactly.

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashSet;
use tracing::{debug, trace};

use super::op::CarveOp;
use super::registry::RoomRegistry;
use super::snake::Snake;
use super::tiles::TileMap;
use super::types::{CarveResult, DoorGrid, Hint, Link, LinkKind, RoomHandle, RoomType, Veto};
use crate::geom::{Cardinal, R2, V2};
use crate::rng::GameRng;

/// Rooms larger than this may not be carved down below it
const MIN_PROTECTED_AREA: usize = 6;

/// Carve state and its undo log
#[derive(Debug, Clone)]
pub struct Carve {
    registry: RoomRegistry,
    tiles: TileMap,
    frozen: HashSet<RoomHandle>,
    links: Vec<Link>,
    links_resolved: usize,
    hints: BTreeMap<Hint, BTreeSet<V2>>,
    grid: DoorGrid,
    rng: GameRng,
    log: Vec<CarveOp>,
}

/// Comparable copy of everything a rollback must restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarveState {
    pub registry: RoomRegistry,
    pub tiles: TileMap,
    pub frozen: BTreeSet<RoomHandle>,
    pub links: Vec<Link>,
    pub links_resolved: usize,
    pub hints: BTreeMap<Hint, BTreeSet<V2>>,
}

impl Carve {
    pub fn new(grid: DoorGrid, rng: GameRng) -> Self {
        Self {
            registry: RoomRegistry::new(),
            tiles: TileMap::new(),
            frozen: HashSet::new(),
            links: Vec::new(),
            links_resolved: 0,
            hints: BTreeMap::new(),
            grid,
            rng,
            log: Vec::new(),
        }
    }

    // ---- veto protocol ----

    /// Run `attempt`, rolling back everything it did if it vetoes
    ///
    /// Returns `Some` with the attempt's value, or `None` after the state has
    /// been restored to exactly what it was on entry. The veto stops here.
    pub fn veto_point<T>(
        &mut self,
        attempt: impl FnOnce(&mut Self) -> CarveResult<T>,
    ) -> Option<T> {
        let mark = self.log.len();
        match attempt(self) {
            Ok(value) => Some(value),
            Err(Veto) => {
                self.rollback_to(mark);
                None
            }
        }
    }

    /// Abandon the current attempt
    pub fn veto<T>(&self) -> CarveResult<T> {
        trace!(log_len = self.log.len(), "veto");
        Err(Veto)
    }

    /// Like `veto_point`, but the veto keeps propagating after the rollback
    ///
    /// Public operations run inside this so that none of them can leave a
    /// half-applied change behind, even without an enclosing veto point.
    pub(crate) fn atomically<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> CarveResult<T>,
    ) -> CarveResult<T> {
        let mark = self.log.len();
        let result = op(self);
        if result.is_err() {
            self.rollback_to(mark);
        }
        result
    }

    fn rollback_to(&mut self, mark: usize) {
        let undone = self.log.len().saturating_sub(mark);
        while self.log.len() > mark {
            if let Some(op) = self.log.pop() {
                self.undo_op(op);
            }
        }
        debug!(mark, undone, "rolled back to veto point");
    }

    // ---- logged primitives ----

    fn do_log(&mut self, op: CarveOp) {
        self.log.push(op);
        self.do_op(op);
    }

    fn do_op(&mut self, op: CarveOp) {
        match op {
            CarveOp::CreateRoom(room_type) => {
                self.registry.create_room(room_type);
            }
            CarveOp::CarveTile {
                position,
                new_owner,
                ..
            } => self.tiles.set_owner(position, new_owner),
            CarveOp::FreezeRoom(room) => {
                self.frozen.insert(room);
            }
            CarveOp::LinkRooms(link) => self.links.push(link),
            CarveOp::ResolveLinks { to, .. } => self.links_resolved = to,
            CarveOp::TagHint { hint, cell } => {
                self.hints.entry(hint).or_default().insert(cell);
            }
        }
    }

    fn undo_op(&mut self, op: CarveOp) {
        match op {
            CarveOp::CreateRoom(_) => {
                self.registry.destroy_last_room();
            }
            CarveOp::CarveTile {
                position,
                old_owner,
                ..
            } => self.tiles.set_owner(position, old_owner),
            CarveOp::FreezeRoom(room) => {
                self.frozen.remove(&room);
            }
            CarveOp::LinkRooms(_) => {
                self.links.pop();
            }
            CarveOp::ResolveLinks { from, .. } => self.links_resolved = from,
            CarveOp::TagHint { hint, cell } => {
                if let Some(cells) = self.hints.get_mut(&hint) {
                    cells.remove(&cell);
                    if cells.is_empty() {
                        self.hints.remove(&hint);
                    }
                }
            }
        }
    }

    fn create_room(&mut self, room_type: RoomType) -> RoomHandle {
        self.do_log(CarveOp::CreateRoom(room_type));
        RoomHandle(self.registry.len() as u32 - 1)
    }

    /// Give `cell` to `new_owner` (or clear it), logging the change
    pub(crate) fn carve_tile(&mut self, cell: V2, new_owner: Option<RoomHandle>) {
        let old_owner = self.tiles.owner_of(cell);
        self.do_log(CarveOp::CarveTile {
            position: cell,
            old_owner,
            new_owner,
        });
    }

    pub(crate) fn tag_hint(&mut self, hint: Hint, cell: V2) {
        let present = self.hints.get(&hint).is_some_and(|cells| cells.contains(&cell));
        if !present {
            self.do_log(CarveOp::TagHint { hint, cell });
        }
    }

    pub(crate) fn mark_links_resolved(&mut self, to: usize) {
        let from = self.links_resolved;
        if to != from {
            self.do_log(CarveOp::ResolveLinks { from, to });
        }
    }

    // ---- public operations ----

    /// Carve `rect` as a new room of `room_type`
    ///
    /// See [`Carve::carve_ignoring`].
    pub fn carve(&mut self, rect: R2, room_type: RoomType) -> CarveResult<RoomHandle> {
        self.carve_ignoring(rect, room_type, &[])
    }

    /// Carve `rect` as a new room, leaving cells of `ignore` rooms untouched
    ///
    /// The rectangle plus a one-cell moat is claimed: cells inside `rect`
    /// go to the new room, owned moat cells are cleared. Vetoes if any
    /// touched room is frozen, loses more than half its area, or drops from
    /// above six cells to below six.
    pub fn carve_ignoring(
        &mut self,
        rect: R2,
        room_type: RoomType,
        ignore: &[RoomHandle],
    ) -> CarveResult<RoomHandle> {
        assert!(rect.is_valid(), "cannot carve empty rectangle {:?}", rect);

        self.atomically(|carve| {
            let handle = carve.create_room(room_type);
            trace!(room = handle.0, %room_type, ?rect, "carve");

            let mut affected: BTreeMap<RoomHandle, usize> = BTreeMap::new();
            for cell in rect.expand(V2::new(1, 1)).iter() {
                let owner = carve.tiles.owner_of(cell);
                if let Some(existing) = owner {
                    if ignore.contains(&existing) {
                        continue;
                    }
                    if carve.frozen.contains(&existing) {
                        return carve.veto();
                    }
                    let area = carve.tiles.area(existing);
                    affected.entry(existing).or_insert(area);
                }

                if rect.contains(cell) {
                    carve.carve_tile(cell, Some(handle));
                } else if owner.is_some() {
                    carve.carve_tile(cell, None);
                }
            }

            for (room, previous_area) in affected {
                let new_area = carve.tiles.area(room);
                if carve.ruined(room, previous_area, new_area) {
                    return carve.veto();
                }
            }

            Ok(handle)
        })
    }

    fn ruined(&self, room: RoomHandle, previous_area: usize, new_area: usize) -> bool {
        if self.frozen.contains(&room) {
            return true;
        }

        if new_area * 2 < previous_area {
            return true;
        }

        previous_area > MIN_PROTECTED_AREA && new_area < MIN_PROTECTED_AREA
    }

    /// Protect a room's cells from ever changing owner. Idempotent.
    pub fn freeze(&mut self, room: RoomHandle) {
        assert!(self.registry.contains(room), "freeze of unknown room {:?}", room);
        if !self.frozen.contains(&room) {
            self.do_log(CarveOp::FreezeRoom(room));
        }
    }

    /// Record that two rooms should be connected when links are built
    pub fn link_rooms(&mut self, kind: LinkKind, room_a: RoomHandle, room_b: RoomHandle) {
        assert!(self.registry.contains(room_a), "link from unknown room {:?}", room_a);
        assert!(self.registry.contains(room_b), "link to unknown room {:?}", room_b);
        self.do_log(CarveOp::LinkRooms(Link {
            kind,
            room_a,
            room_b,
        }));
    }

    /// A snake cursor on `room` facing `direction`
    pub fn snake(&self, room: RoomHandle, direction: Cardinal) -> Snake {
        assert!(self.registry.contains(room), "snake on unknown room {:?}", room);
        Snake::new(room, direction)
    }

    // ---- queries ----

    /// Rooms of `room_type` that own at least one cell, in creation order
    pub fn ident_rooms(&self, room_type: RoomType) -> Vec<RoomHandle> {
        self.tiles
            .rooms()
            .filter(|room| self.registry.room_type(*room) == room_type)
            .collect()
    }

    pub fn room_type(&self, room: RoomHandle) -> RoomType {
        self.registry.room_type(room)
    }

    pub fn owner_of(&self, cell: V2) -> Option<RoomHandle> {
        self.tiles.owner_of(cell)
    }

    pub fn is_owned(&self, cell: V2) -> bool {
        self.tiles.is_owned(cell)
    }

    pub fn cells_of(&self, room: RoomHandle) -> impl Iterator<Item = V2> + '_ {
        self.tiles.cells_of(room)
    }

    pub fn area(&self, room: RoomHandle) -> usize {
        self.tiles.area(room)
    }

    pub fn is_frozen(&self, room: RoomHandle) -> bool {
        self.frozen.contains(&room)
    }

    pub fn tiles(&self) -> &TileMap {
        &self.tiles
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Every recorded link, resolved or not
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Links recorded since the last successful `build_links`
    pub fn pending_links(&self) -> &[Link] {
        &self.links[self.links_resolved..]
    }

    pub fn hints(&self) -> &BTreeMap<Hint, BTreeSet<V2>> {
        &self.hints
    }

    /// Cells carrying `hint`
    pub fn hinted(&self, hint: Hint) -> impl Iterator<Item = V2> + '_ {
        self.hints.get(&hint).into_iter().flatten().copied()
    }

    pub fn grid(&self) -> DoorGrid {
        self.grid
    }

    pub fn rng(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// Snapshot of all rollback-restored state
    pub fn state(&self) -> CarveState {
        CarveState {
            registry: self.registry.clone(),
            tiles: self.tiles.clone(),
            frozen: self.frozen.iter().copied().collect(),
            links: self.links.clone(),
            links_resolved: self.links_resolved,
            hints: self.hints.clone(),
        }
    }
}
