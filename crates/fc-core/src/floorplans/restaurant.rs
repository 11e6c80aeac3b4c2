//! Restaurant recipe
//!
//! A gallery dining room with wings, a kitchen behind a counter to the
//! north and an antechamber leading in from one wing. Two customer
//! bathrooms come off the dining areas and one staff bathroom off the
//! kitchen.

use super::apartment::frozen_tunnel;
use crate::carve::{Carve, CarveResult, LinkKind, RoomHandle, RoomType, Rule, Snake, Tunnel};
use crate::geom::{Cardinal, V2};

pub fn restaurant(carve: &mut Carve) -> CarveResult<()> {
    let cell_sz = carve.grid().x - 1;

    basic_layout(carve)?;

    // Antechambers are listed twice so they are tried more often.
    let mut customer_rooms: Vec<RoomHandle> = [
        RoomType::Gallery,
        RoomType::Antechamber,
        RoomType::Antechamber,
    ]
    .into_iter()
    .flat_map(|room_type| carve.ident_rooms(room_type))
    .collect();
    add_bathrooms(carve, cell_sz, &mut customer_rooms, 2);

    let mut staff_rooms = carve.ident_rooms(RoomType::Kitchen);
    add_bathrooms(carve, cell_sz, &mut staff_rooms, 1);

    let improved = [RoomType::Gallery, RoomType::Antechamber];
    for room_type in improved {
        for room in carve.ident_rooms(room_type) {
            carve.expand_densely(room);
        }
    }
    for room_type in improved {
        for room in carve.ident_rooms(room_type) {
            carve.erode_1tile_wonk(room);
        }
    }

    carve.build_links()
}

/// Try to add `wanted` bathrooms off randomly chosen `hosts`
///
/// A host that receives a bathroom is removed from the list. Gives up
/// quietly after ten rounds.
fn add_bathrooms(carve: &mut Carve, cell_sz: i32, hosts: &mut Vec<RoomHandle>, wanted: usize) {
    let before = carve.ident_rooms(RoomType::Bathroom).len();

    for _ in 0..10 {
        if carve.ident_rooms(RoomType::Bathroom).len().saturating_sub(before) >= wanted {
            break;
        }

        let Some(host) = carve.rng().choose(hosts).copied() else {
            break;
        };
        for dir in Cardinal::all_shuffled(carve.rng()) {
            if bathroom(carve, cell_sz, Snake::new(host, dir)) {
                if let Some(idx) = hosts.iter().position(|room| *room == host) {
                    hosts.remove(idx);
                }
                break;
            }
        }
    }
}

fn bathroom(carve: &mut Carve, cell_sz: i32, snake: Snake) -> bool {
    (3..=4).rev().any(|sz_x| {
        let tunnel = Tunnel::new(V2::new(sz_x, 3), RoomType::Bathroom)
            .link(LinkKind::Door)
            .min_contact(cell_sz.min(sz_x - 1) as usize)
            .rule(Rule::Dense);
        frozen_tunnel(carve, snake, &tunnel).is_some()
    })
}

fn basic_layout(carve: &mut Carve) -> CarveResult<()> {
    let gallery_w = carve.rng().range(9, 12);
    let (gallery_h, wing_w) = if carve.rng().coin() {
        (gallery_w * 2 / 3, gallery_w / 3)
    } else {
        (gallery_w / 3, gallery_w * 2 / 3)
    };
    let wing_depth = carve.rng().range(2, 5);

    let gallery = carve.carve(
        V2::zero().sized(V2::new(gallery_w, gallery_h)),
        RoomType::Gallery,
    )?;

    let side_wing = Tunnel::new(V2::new(gallery_h, wing_w), RoomType::Gallery)
        .link(LinkKind::Complete)
        .min_contact(gallery_h as usize);

    let mut east = carve.snake(gallery, Cardinal::East);
    east.tunnel(carve, &side_wing)?;

    let mut west = None;
    if carve.rng().percent(50) {
        let mut snake = carve.snake(gallery, Cardinal::West);
        snake.tunnel(carve, &side_wing)?;
        snake.turn_right();
        west = Some(snake);
    }

    match carve.rng().rn2(100) {
        0..50 => east.turn_left(),
        50..70 => east.turn_right(),
        _ => {}
    }

    let corner = Tunnel::new(V2::new(wing_w, wing_depth), RoomType::Gallery)
        .link(LinkKind::Complete)
        .min_contact(wing_w as usize);
    east.tunnel(carve, &corner)?;
    if let Some(snake) = west.as_mut() {
        snake.tunnel(carve, &corner)?;
    }

    let mut kitchen = carve.snake(gallery, Cardinal::North);
    let kitchen_depth = (wing_depth + carve.rng().range(-2, 2)).max(2);
    kitchen.tunnel(
        carve,
        &Tunnel::new(V2::new(gallery_w, kitchen_depth), RoomType::Kitchen)
            .link(LinkKind::Counter)
            .min_contact(gallery_w as usize),
    )?;

    if carve.rng().percent(50) {
        let width = gallery_w.min(4).max(gallery_w - carve.rng().range(1, 4));
        let depth = carve.rng().range(4, 7);
        kitchen.tunnel(
            carve,
            &Tunnel::new(V2::new(width, depth), RoomType::Kitchen)
                .link(LinkKind::Complete)
                .min_contact(width as usize)
                .rule(Rule::Dense),
        )?;
    }

    for room_type in [RoomType::Gallery, RoomType::Kitchen] {
        for room in carve.ident_rooms(room_type) {
            carve.freeze(room);
        }
    }

    east.turn_right();
    let entry_depth = carve.rng().range(3, 6);
    let antechamber = east.tunnel(
        carve,
        &Tunnel::new(V2::new(wing_depth, entry_depth), RoomType::Antechamber)
            .link(LinkKind::Complete)
            .min_contact(wing_depth as usize),
    )?;
    carve.freeze(antechamber);

    match carve.rng().rn2(100) {
        0..33 => east.turn_right(),
        33..66 => east.turn_left(),
        _ => {}
    }

    let entry = east.tunnel(
        carve,
        &Tunnel::new(V2::new(3, 3), RoomType::EntryZone)
            .link(LinkKind::Door)
            .min_contact(3),
    )?;
    carve.freeze(entry);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carve::{DoorGrid, Hint};
    use crate::rng::GameRng;

    fn attempt(seed: u64) -> Option<Carve> {
        let mut carve = Carve::new(DoorGrid::square(5, 2, 0), GameRng::new(seed));
        carve.veto_point(restaurant).map(|()| carve)
    }

    #[test]
    fn test_some_attempt_succeeds() {
        let built: Vec<Carve> = (0..80).filter_map(attempt).collect();
        assert!(!built.is_empty());

        for carve in &built {
            assert!(carve.ident_rooms(RoomType::Gallery).len() >= 3);
            assert!(!carve.ident_rooms(RoomType::Kitchen).is_empty());
            assert_eq!(carve.ident_rooms(RoomType::EntryZone).len(), 1);
            assert_eq!(carve.ident_rooms(RoomType::Antechamber).len(), 1);
            assert!(carve.hinted(Hint::Counter).count() > 0);
            assert!(carve.hinted(Hint::Counterside).count() > 0);
        }
    }
}
