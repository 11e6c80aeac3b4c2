use std::collections::{BTreeMap, BTreeSet};

use fc_core::carve::{Carve, DoorGrid, LinkKind, RoomHandle, RoomType, Rule, Tunnel};
use fc_core::geom::{Cardinal, V2};
use fc_core::rng::GameRng;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Carve { x: i32, y: i32, w: i32, h: i32, kind: usize },
    Tunnel { from: usize, dir: usize, w: i32, h: i32, dense: bool },
    Freeze(usize),
    Link { a: usize, b: usize, kind: usize },
    Expand(usize),
    Erode(usize),
    BuildLinks,
}

const TYPES: [RoomType; 5] = [
    RoomType::LivingRoom,
    RoomType::Bedroom,
    RoomType::Closet,
    RoomType::Hallway,
    RoomType::Kitchen,
];

const LINKS: [LinkKind; 4] = [LinkKind::Ignore, LinkKind::Door, LinkKind::Complete, LinkKind::Counter];

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-8..8, -8..8, 1..6, 1..6, 0..TYPES.len())
            .prop_map(|(x, y, w, h, kind)| Op::Carve { x, y, w, h, kind }),
        3 => (0..8usize, 0..4usize, 1..5, 1..5, any::<bool>())
            .prop_map(|(from, dir, w, h, dense)| Op::Tunnel { from, dir, w, h, dense }),
        2 => (0..8usize).prop_map(Op::Freeze),
        1 => (0..8usize, 0..8usize, 0..LINKS.len())
            .prop_map(|(a, b, kind)| Op::Link { a, b, kind }),
        1 => (0..8usize).prop_map(Op::Expand),
        1 => (0..8usize).prop_map(Op::Erode),
        1 => Just(Op::BuildLinks),
    ]
}

fn nth_registered(carve: &Carve, idx: usize) -> Option<RoomHandle> {
    let len = carve.registry().len();
    (len > 0).then(|| RoomHandle((idx % len) as u32))
}

fn nth_owning(carve: &Carve, idx: usize) -> Option<RoomHandle> {
    let rooms: Vec<RoomHandle> = carve.tiles().rooms().collect();
    (!rooms.is_empty()).then(|| rooms[idx % rooms.len()])
}

/// Apply one operation inside its own veto point; true if it stuck
fn apply(carve: &mut Carve, op: &Op) -> bool {
    match *op {
        Op::Carve { x, y, w, h, kind } => carve
            .veto_point(|c| c.carve(V2::new(x, y).sized(V2::new(w, h)), TYPES[kind]))
            .is_some(),
        Op::Tunnel { from, dir, w, h, dense } => {
            let Some(from) = nth_owning(carve, from) else {
                return false;
            };
            let rule = if dense { Rule::Dense } else { Rule::Rng };
            let tunnel = Tunnel::new(V2::new(w, h), RoomType::Bedroom)
                .link(LinkKind::Door)
                .rule(rule);
            carve
                .veto_point(|c| c.tunnel(from, Cardinal::ALL[dir], &tunnel))
                .is_some()
        }
        Op::Freeze(idx) => match nth_registered(carve, idx) {
            Some(room) => {
                carve.freeze(room);
                true
            }
            None => false,
        },
        Op::Link { a, b, kind } => match (nth_registered(carve, a), nth_registered(carve, b)) {
            (Some(a), Some(b)) => {
                carve.link_rooms(LINKS[kind], a, b);
                true
            }
            _ => false,
        },
        Op::Expand(idx) => match nth_owning(carve, idx) {
            Some(room) => {
                carve.expand_densely(room);
                true
            }
            None => false,
        },
        Op::Erode(idx) => match nth_owning(carve, idx) {
            Some(room) => {
                carve.erode(room, 1);
                true
            }
            None => false,
        },
        Op::BuildLinks => carve.veto_point(|c| c.build_links()).is_some(),
    }
}

fn assert_single_owner(carve: &Carve) -> Result<(), TestCaseError> {
    let mut total = 0;
    for room in carve.tiles().rooms() {
        for cell in carve.cells_of(room) {
            prop_assert_eq!(carve.owner_of(cell), Some(room));
            total += 1;
        }
    }
    prop_assert_eq!(total, carve.tiles().len());
    Ok(())
}

fn areas(carve: &Carve) -> BTreeMap<RoomHandle, usize> {
    carve.tiles().rooms().map(|r| (r, carve.area(r))).collect()
}

fn frozen_cells(carve: &Carve) -> BTreeMap<RoomHandle, BTreeSet<V2>> {
    carve
        .registry()
        .iter()
        .map(|(room, _)| room)
        .filter(|room| carve.is_frozen(*room))
        .map(|room| (room, carve.cells_of(room).collect()))
        .collect()
}

fn seeded(seed: u64, setup: &[Op]) -> Carve {
    let mut carve = Carve::new(DoorGrid::new(3, 4, 1, 0), GameRng::new(seed));
    for op in setup {
        apply(&mut carve, op);
    }
    carve
}

proptest! {
    #[test]
    fn vetoed_sequences_restore_state_exactly(
        seed in 0_u64..1_000,
        setup in prop::collection::vec(op_strategy(), 0..8),
        ops in prop::collection::vec(op_strategy(), 1..12),
    ) {
        let mut carve = seeded(seed, &setup);
        let before = carve.state();
        let log_len = carve.log_len();

        let result = carve.veto_point(|c| {
            for op in &ops {
                apply(c, op);
            }
            c.veto::<()>()
        });

        prop_assert!(result.is_none());
        prop_assert_eq!(carve.state(), before);
        prop_assert_eq!(carve.log_len(), log_len);
    }

    #[test]
    fn every_cell_has_one_owner(
        seed in 0_u64..1_000,
        ops in prop::collection::vec(op_strategy(), 1..20),
    ) {
        let mut carve = seeded(seed, &[]);
        for op in &ops {
            apply(&mut carve, op);
            assert_single_owner(&carve)?;
        }
    }

    #[test]
    fn carving_never_touches_frozen_rooms(
        seed in 0_u64..1_000,
        setup in prop::collection::vec(op_strategy(), 0..10),
        ops in prop::collection::vec(op_strategy(), 1..12),
    ) {
        let mut carve = seeded(seed, &setup);
        for op in &ops {
            if !matches!(op, Op::Carve { .. } | Op::Tunnel { .. }) {
                continue;
            }
            let frozen = frozen_cells(&carve);
            apply(&mut carve, op);
            for (room, cells) in frozen {
                let now: BTreeSet<V2> = carve.cells_of(room).collect();
                prop_assert_eq!(now, cells);
            }
        }
    }

    #[test]
    fn carving_respects_shrink_guard(
        seed in 0_u64..1_000,
        setup in prop::collection::vec(op_strategy(), 0..10),
        x in -8..8, y in -8..8, w in 1..8, h in 1..8,
    ) {
        let mut carve = seeded(seed, &setup);
        let before = areas(&carve);
        let carved = carve.veto_point(|c| c.carve(V2::new(x, y).sized(V2::new(w, h)), RoomType::Kitchen));

        if carved.is_some() {
            for (room, old) in before {
                let new = carve.area(room);
                prop_assert!(new * 2 >= old, "room {:?} shrank from {} to {}", room, old, new);
                prop_assert!(!(old > 6 && new < 6), "room {:?} dropped from {} to {}", room, old, new);
            }
        } else {
            prop_assert_eq!(areas(&carve), before);
        }
    }

    #[test]
    fn build_links_consumes_everything_or_nothing(
        seed in 0_u64..1_000,
        setup in prop::collection::vec(op_strategy(), 1..16),
    ) {
        let mut carve = seeded(seed, &setup);
        let before = carve.state();
        let pending = carve.pending_links().len();

        match carve.veto_point(|c| c.build_links()) {
            Some(()) => prop_assert!(carve.pending_links().is_empty()),
            None => {
                prop_assert_eq!(carve.pending_links().len(), pending);
                prop_assert_eq!(carve.state(), before);
            }
        }
    }
}
