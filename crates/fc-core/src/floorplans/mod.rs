//! Floorplan recipes and the retry driver
//!
//! A recipe scripts snake and tunnel calls against a fresh engine. Recipes
//! are allowed to fail: any veto that escapes one discards the whole
//! attempt, and [`generate`] simply starts over with a new engine.

mod apartment;
mod restaurant;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use apartment::apartment;
pub use restaurant::restaurant;

use crate::carve::{Carve, CarveResult, DoorGrid};
use crate::interior::Floorplan;
use crate::rng::GameRng;

/// Which recipe to run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlanKind {
    Apartment,
    Restaurant,
}

impl PlanKind {
    fn recipe(self) -> fn(&mut Carve) -> CarveResult<()> {
        match self {
            PlanKind::Apartment => apartment,
            PlanKind::Restaurant => restaurant,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FloorplanError {
    #[error("no {plan} floorplan found in {attempts} attempts")]
    Exhausted { plan: PlanKind, attempts: u32 },
}

/// Door grid with a period one more than the recipe's cell size
///
/// Recipes read their cell size back from the grid.
fn door_grid(rng: &mut GameRng) -> DoorGrid {
    let cell_sz = rng.range(3, 4);
    let period = cell_sz + 1;
    let cx = rng.range(0, period - 1);
    let cy = rng.range(0, period - 1);
    DoorGrid::square(period, cx, cy)
}

/// Run `plan` until an attempt completes, at most `max_attempts` times
///
/// The same seed always yields the same floorplan.
pub fn generate(plan: PlanKind, seed: u64, max_attempts: u32) -> Result<Floorplan, FloorplanError> {
    let mut seeds = GameRng::new(seed);
    let recipe = plan.recipe();

    for attempt in 1..=max_attempts {
        let mut rng = seeds.fork();
        let grid = door_grid(&mut rng);
        let mut carve = Carve::new(grid, rng);

        if carve.veto_point(recipe).is_some() {
            info!(%plan, seed, attempt, rooms = carve.tiles().rooms().count(), "floorplan generated");
            debug!("\n{}", carve);
            return Ok(Floorplan::from_carve(&carve));
        }
        debug!(%plan, attempt, "attempt vetoed");
    }

    warn!(%plan, seed, max_attempts, "giving up on floorplan");
    Err(FloorplanError::Exhausted {
        plan,
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_plan_kind_names() {
        assert_eq!(PlanKind::Apartment.to_string(), "apartment");
        assert_eq!(PlanKind::from_str("restaurant"), Ok(PlanKind::Restaurant));
        assert!(PlanKind::from_str("castle").is_err());
    }

    #[test]
    fn test_door_grid_matches_cell_size() {
        let mut rng = GameRng::new(12);
        for _ in 0..50 {
            let grid = door_grid(&mut rng);
            assert!(grid.x == 4 || grid.x == 5);
            assert_eq!(grid.x, grid.y);
            assert!((0..grid.x).contains(&grid.cx));
            assert!((0..grid.y).contains(&grid.cy));
        }
    }

    #[test]
    fn test_zero_attempts_is_exhausted() {
        let err = generate(PlanKind::Apartment, 1, 0).unwrap_err();
        assert_eq!(
            err,
            FloorplanError::Exhausted {
                plan: PlanKind::Apartment,
                attempts: 0
            }
        );
        assert_eq!(err.to_string(), "no apartment floorplan found in 0 attempts");
    }
}
