//! Apartment recipe
//!
//! A frozen living room with a kitchen to the north, an entry off the west
//! side and one or more hallways of bedrooms to the east. Every bedroom
//! gets a closet; bathrooms are added until there are as many as bedrooms.

use crate::carve::{Carve, CarveResult, LinkKind, RoomHandle, RoomType, Rule, Snake, Tunnel};
use crate::geom::{Cardinal, V2};

struct Apartment {
    cell_sz: i32,
    living_w: i32,
    living_h: i32,
    depth_l: i32,
    depth_r: i32,
}

fn pick(carve: &mut Carve, options: &[u32]) -> u32 {
    carve.rng().choose(options).copied().unwrap_or_default()
}

pub fn apartment(carve: &mut Carve) -> CarveResult<()> {
    let cell_sz = carve.grid().x - 1;

    let living_w = carve.rng().range(cell_sz + 3, cell_sz * 2 + 1);
    let living_h = carve.rng().range(6, 7);
    let living = carve.carve(
        V2::zero().sized(V2::new(living_w, living_h)),
        RoomType::LivingRoom,
    )?;
    carve.freeze(living);

    let mut plan = Apartment {
        cell_sz,
        living_w,
        living_h,
        depth_l: 0,
        depth_r: 0,
    };

    plan.kitchen(carve, Snake::new(living, Cardinal::North))?;
    plan.antechamber(carve, Snake::new(living, Cardinal::West))?;

    plan.depth_l = carve.rng().range(living_h / 2, living_h);
    plan.depth_r = carve.rng().range(living_h / 2, living_h);

    if carve.rng().coin() {
        let n_hall_nodes = pick(carve, &[0, 0, 1, 2]);
        let mut junction = carve.snake(living, Cardinal::East);
        junction.tunnel(
            carve,
            &Tunnel::new(V2::new(3, 3), RoomType::Hallway)
                .link(LinkKind::Complete)
                .min_contact(3),
        )?;

        let mut hall = junction.branch();
        hall.turn_right();
        plan.hallway(carve, hall, n_hall_nodes)?;

        if !carve.rng().one_in(3) {
            let n_hall_nodes = pick(carve, &[0, 0, 1]);
            let mut hall = junction.branch();
            if carve.rng().one_in(3) {
                hall.turn_left();
            }
            plan.hallway(carve, hall, n_hall_nodes)?;
        }
    } else {
        let n_hall_nodes = pick(carve, &[0, 0, 0, 1, 1, 2, 3]);
        plan.hallway(carve, Snake::new(living, Cardinal::East), n_hall_nodes)?;
    }

    let bedrooms = carve.ident_rooms(RoomType::Bedroom);
    let hallways = carve.ident_rooms(RoomType::Hallway);
    for room in bedrooms
        .iter()
        .chain(&carve.ident_rooms(RoomType::Bathroom))
        .chain(&hallways)
    {
        carve.freeze(*room);
    }

    for &bedroom in &bedrooms {
        let closet = Cardinal::all_shuffled(carve.rng())
            .into_iter()
            .any(|dir| plan.closet(carve, Snake::new(bedroom, dir)));
        if !closet {
            return carve.veto();
        }
    }

    let mut without_bathroom = bedrooms.clone();
    for _ in 0..10 {
        if carve.ident_rooms(RoomType::Bathroom).len() >= bedrooms.len() {
            break;
        }

        let Some(bedroom) = carve.rng().choose(&without_bathroom).copied() else {
            break;
        };
        for dir in Cardinal::all_shuffled(carve.rng()) {
            if plan.bathroom(carve, Snake::new(bedroom, dir)) {
                without_bathroom.retain(|room| *room != bedroom);
                break;
            }
        }

        if let Some(hallway) = carve.rng().choose(&hallways).copied() {
            for dir in Cardinal::all_shuffled(carve.rng()) {
                if plan.bathroom(carve, Snake::new(hallway, dir)) {
                    break;
                }
            }
        }
    }

    let improved = [RoomType::Bedroom, RoomType::Kitchen, RoomType::LivingRoom];
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

    // Living rooms and kitchens often come out pointlessly large.
    if carve.rng().one_in(3) {
        for room_type in [RoomType::LivingRoom, RoomType::Kitchen] {
            for room in carve.ident_rooms(room_type) {
                carve.erode(room, 1);
            }
        }
    }

    carve.build_links()
}

impl Apartment {
    fn kitchen(&self, carve: &mut Carve, mut snake: Snake) -> CarveResult<()> {
        let width = carve.rng().range(self.living_w - 1, self.living_w);
        let height = carve.rng().range(self.living_h - 4, self.living_h - 2).max(2);
        let kitchen = snake.tunnel(
            carve,
            &Tunnel::new(V2::new(width, height), RoomType::Kitchen)
                .link(LinkKind::Complete)
                .min_contact(width as usize),
        )?;
        carve.freeze(kitchen);
        Ok(())
    }

    fn antechamber(&self, carve: &mut Carve, mut snake: Snake) -> CarveResult<()> {
        for _ in 0..5 {
            if snake
                .veto_point(carve, |carve, snake| self.antechamber_once(carve, snake))
                .is_some()
            {
                return Ok(());
            }
        }
        snake.veto(carve)
    }

    fn antechamber_once(&self, carve: &mut Carve, snake: &mut Snake) -> CarveResult<()> {
        let entry = Tunnel::new(V2::new(3, 3), RoomType::EntryZone)
            .link(LinkKind::Door)
            .min_contact(3);

        if carve.rng().rn2(5) < 3 {
            let room = snake.tunnel(carve, &entry)?;
            carve.freeze(room);
            return Ok(());
        }

        // Yard-like approach
        let yard = snake.tunnel(
            carve,
            &Tunnel::new(V2::new(self.living_h, 3), RoomType::Antechamber)
                .link(LinkKind::Door)
                .min_contact(self.living_h as usize),
        )?;
        carve.freeze(yard);

        if carve.rng().coin() {
            snake.turn_right();
            let room = snake.tunnel(
                carve,
                &Tunnel::new(V2::new(3, 3), RoomType::Antechamber).link(LinkKind::Door),
            )?;
            carve.freeze(room);
        }

        if carve.rng().coin() {
            snake.turn_left();
        }
        let room = snake.tunnel(carve, &entry)?;
        carve.freeze(room);
        Ok(())
    }

    /// Chain of hallway segments with rooms off both sides, capped by a
    /// master bedroom
    fn hallway(&self, carve: &mut Carve, mut snake: Snake, n_hall_nodes: u32) -> CarveResult<()> {
        if n_hall_nodes == 0 {
            self.hall_room(carve, snake, true, self.living_w);
            return Ok(());
        }

        for _ in 0..n_hall_nodes {
            let hall = snake.tunnel(
                carve,
                &Tunnel::new(V2::new(3, self.cell_sz), RoomType::Hallway)
                    .link(LinkKind::Complete)
                    .min_contact(3),
            )?;
            carve.freeze(hall);

            let mut left = snake.branch();
            left.turn_left();
            let mut right = snake.branch();
            right.turn_right();

            // The first room built may become the bathroom, so give it the
            // shallower side.
            if self.depth_l < self.depth_r {
                self.hall_room(carve, left, false, self.depth_l);
                self.hall_room(carve, right, false, self.depth_r);
            } else {
                self.hall_room(carve, right, false, self.depth_r);
                self.hall_room(carve, left, false, self.depth_l);
            }
        }

        self.hall_room(carve, snake, true, self.cell_sz);
        Ok(())
    }

    fn hall_room(&self, carve: &mut Carve, mut snake: Snake, master: bool, depth: i32) -> bool {
        for sz_x in (3..=self.cell_sz).rev() {
            let room_type = if master || !carve.ident_rooms(RoomType::Bathroom).is_empty() {
                RoomType::Bedroom
            } else {
                RoomType::Bathroom
            };

            let (extra_x, extra_y) = if master {
                (carve.rng().range(2, 4), carve.rng().range(0, 1))
            } else {
                (0, 0)
            };
            let width = sz_x + extra_x;
            let depth = (depth + extra_y).min(width * 3 / 2);

            let tunnel = Tunnel::new(V2::new(width, depth), room_type)
                .link(LinkKind::Door)
                .min_contact(self.cell_sz.min(sz_x) as usize)
                .rule(Rule::Dense);
            if snake
                .veto_point(carve, |carve, snake| snake.tunnel(carve, &tunnel))
                .is_some()
            {
                return true;
            }
        }
        false
    }

    fn bathroom(&self, carve: &mut Carve, snake: Snake) -> bool {
        (3..=4).rev().any(|sz_x| {
            let tunnel = Tunnel::new(V2::new(sz_x, 3), RoomType::Bathroom)
                .link(LinkKind::Door)
                .min_contact(self.cell_sz.min(sz_x - 1) as usize)
                .rule(Rule::Dense);
            frozen_tunnel(carve, snake, &tunnel).is_some()
        })
    }

    fn closet(&self, carve: &mut Carve, snake: Snake) -> bool {
        (2..=5).rev().any(|sz_x| {
            let tunnel = Tunnel::new(V2::new(sz_x, 1), RoomType::Closet)
                .link(LinkKind::Door)
                .min_contact(sz_x as usize)
                .rule(Rule::Dense);
            frozen_tunnel(carve, snake, &tunnel).is_some()
        })
    }
}

/// Tunnel and freeze the result, or leave no trace
pub(super) fn frozen_tunnel(carve: &mut Carve, mut snake: Snake, tunnel: &Tunnel) -> Option<RoomHandle> {
    snake.veto_point(carve, |carve, snake| {
        let room = snake.tunnel(carve, tunnel)?;
        carve.freeze(room);
        Ok(room)
    })
}
