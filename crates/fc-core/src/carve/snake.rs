//! Snake cursors
//!
//! A snake is a position (a room) and a heading. Tunnelling moves it into
//! the room it just carved. Snakes do not own the engine; every operation
//! takes it as an argument, so any number of snakes can work on one
//! floorplan.

use super::engine::Carve;
use super::tunnel::Tunnel;
use super::types::{CarveResult, RoomHandle};
use crate::geom::Cardinal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snake {
    room: RoomHandle,
    direction: Cardinal,
}

impl Snake {
    pub fn new(room: RoomHandle, direction: Cardinal) -> Self {
        Self { room, direction }
    }

    pub fn room(&self) -> RoomHandle {
        self.room
    }

    pub fn direction(&self) -> Cardinal {
        self.direction
    }

    pub fn turn_left(&mut self) {
        self.direction = self.direction.left();
    }

    pub fn turn_right(&mut self) {
        self.direction = self.direction.right();
    }

    /// An independent cursor at the same room and heading
    pub fn branch(&self) -> Snake {
        *self
    }

    /// Tunnel a room ahead and move into it
    pub fn tunnel(&mut self, carve: &mut Carve, tunnel: &Tunnel) -> CarveResult<RoomHandle> {
        let room = carve.tunnel(self.room, self.direction, tunnel)?;
        self.room = room;
        Ok(room)
    }

    /// Engine veto point that also puts this cursor back on rollback
    pub fn veto_point<T>(
        &mut self,
        carve: &mut Carve,
        attempt: impl FnOnce(&mut Carve, &mut Snake) -> CarveResult<T>,
    ) -> Option<T> {
        let saved = *self;
        let result = carve.veto_point(|carve| attempt(carve, self));
        if result.is_none() {
            *self = saved;
        }
        result
    }

    pub fn veto<T>(&self, carve: &Carve) -> CarveResult<T> {
        carve.veto()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carve::{DoorGrid, RoomType};
    use crate::geom::V2;
    use crate::rng::GameRng;

    fn start() -> (Carve, RoomHandle) {
        let mut carve = Carve::new(DoorGrid::default(), GameRng::new(17));
        let room = carve
            .carve(V2::zero().sized(V2::new(4, 4)), RoomType::LivingRoom)
            .unwrap();
        carve.freeze(room);
        (carve, room)
    }

    #[test]
    fn test_turning() {
        let mut snake = Snake::new(RoomHandle(0), Cardinal::North);
        snake.turn_right();
        assert_eq!(snake.direction(), Cardinal::East);
        snake.turn_left();
        snake.turn_left();
        assert_eq!(snake.direction(), Cardinal::West);
    }

    #[test]
    fn test_tunnel_moves_cursor() {
        let (mut carve, room) = start();
        let mut snake = carve.snake(room, Cardinal::East);
        let hall = snake
            .tunnel(&mut carve, &Tunnel::new(V2::new(3, 3), RoomType::Hallway))
            .unwrap();
        assert_eq!(snake.room(), hall);
        assert_ne!(hall, room);
    }

    #[test]
    fn test_branches_are_independent() {
        let (mut carve, room) = start();
        let snake = carve.snake(room, Cardinal::South);
        let mut left = snake.branch();
        left.turn_left();
        let mut right = snake.branch();
        right.turn_right();

        let a = left
            .tunnel(&mut carve, &Tunnel::new(V2::new(2, 2), RoomType::Closet))
            .unwrap();
        assert_eq!(snake.room(), room);
        assert_eq!(right.room(), room);
        let b = right
            .tunnel(&mut carve, &Tunnel::new(V2::new(2, 2), RoomType::Closet))
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(left.direction(), Cardinal::East);
        assert_eq!(right.direction(), Cardinal::West);
    }

    #[test]
    fn test_veto_point_restores_cursor() {
        let (mut carve, room) = start();
        let mut snake = carve.snake(room, Cardinal::East);
        let before = carve.state();

        let result = snake.veto_point(&mut carve, |carve, snake| {
            snake.tunnel(carve, &Tunnel::new(V2::new(3, 3), RoomType::Hallway))?;
            snake.turn_right();
            snake.tunnel(carve, &Tunnel::new(V2::new(3, 3), RoomType::Bedroom))?;
            snake.veto::<()>(carve)
        });

        assert!(result.is_none());
        assert_eq!(snake, Snake::new(room, Cardinal::East));
        assert_eq!(carve.state(), before);
    }

    #[test]
    fn test_successful_veto_point_keeps_cursor() {
        let (mut carve, room) = start();
        let mut snake = carve.snake(room, Cardinal::West);
        let hall = snake
            .veto_point(&mut carve, |carve, snake| {
                snake.tunnel(carve, &Tunnel::new(V2::new(3, 3), RoomType::Hallway))
            })
            .unwrap();
        assert_eq!(snake.room(), hall);
    }
}
