//! Registry of live bombs and explosions.
//!
//! Every entry mirrors a tile in the [`GridMap`]: a bomb entry always sits on
//! a `Tile::Bomb` cell and every cell of a live explosion's neighborhood that
//! is not a wall reads `Tile::Explosion`.

use std::collections::BTreeMap;

use friendly_snakes_core::{CellCoord, Direction, Tile, BOMB_COUNTDOWN, EXPLOSION_DURATION};

use crate::grid::GridMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Bomb {
    countdown: u32,
    drift: Option<Direction>,
}

/// Result of letting a bomb drift by one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Drift {
    /// The bomb has no drift direction.
    Stationary,
    /// The bomb relocated to a neighbouring cell.
    Moved { from: CellCoord, to: CellCoord },
    /// The bomb ran into a wall, another bomb or a snake and stopped.
    Stopped,
    /// The bomb rolled into a live explosion and vanished.
    Absorbed { from: CellCoord },
}

impl Drift {
    pub(crate) fn hit_stopper(self) -> bool {
        matches!(self, Self::Stopped)
    }
}

/// Cells turned into explosion tiles by a single detonation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Detonation {
    pub(crate) epicenter: CellCoord,
    pub(crate) cells: Vec<CellCoord>,
}

/// Cells reverted to empty tiles by a burnt-out explosion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Cooling {
    pub(crate) epicenter: CellCoord,
    pub(crate) cells: Vec<CellCoord>,
}

/// Everything that changed during one global tick of the registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct HazardTick {
    pub(crate) cooled: Vec<Cooling>,
    pub(crate) detonations: Vec<Detonation>,
    pub(crate) drifts: Vec<Drift>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct HazardRegistry {
    bombs: BTreeMap<CellCoord, Bomb>,
    explosions: BTreeMap<CellCoord, u32>,
}

impl HazardRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Places a stationary bomb with a fresh countdown.
    pub(crate) fn place_bomb(&mut self, grid: &mut GridMap, cell: CellCoord) {
        grid.set_tile(cell, Tile::Bomb);
        let _ = self.bombs.insert(
            cell,
            Bomb {
                countdown: BOMB_COUNTDOWN,
                drift: None,
            },
        );
    }

    /// Sets the drift direction of the bomb at `cell`.
    pub(crate) fn push_bomb(&mut self, cell: CellCoord, direction: Direction) {
        if let Some(bomb) = self.bombs.get_mut(&cell) {
            bomb.drift = Some(direction);
        }
    }

    /// Moves the bomb at `position` one cell along its drift direction.
    pub(crate) fn drift_bomb(
        &mut self,
        position: CellCoord,
        grid: &mut GridMap,
        occupied: &dyn Fn(CellCoord) -> bool,
    ) -> Drift {
        let Some(bomb) = self.bombs.get(&position).copied() else {
            return Drift::Stationary;
        };
        let Some(direction) = bomb.drift else {
            return Drift::Stationary;
        };

        let target = position
            .step(direction)
            .filter(|cell| grid.contains(*cell));
        let blocked = match target {
            None => true,
            Some(cell) => matches!(grid.tile(cell), Tile::Wall | Tile::Bomb) || occupied(cell),
        };

        match target {
            Some(target) if !blocked => {
                grid.set_tile(position, Tile::Empty);
                let _ = self.bombs.remove(&position);
                if grid.tile(target) == Tile::Explosion {
                    return Drift::Absorbed { from: position };
                }
                grid.set_tile(target, Tile::Bomb);
                let _ = self.bombs.insert(target, bomb);
                Drift::Moved {
                    from: position,
                    to: target,
                }
            }
            _ => {
                if let Some(entry) = self.bombs.get_mut(&position) {
                    entry.drift = None;
                }
                Drift::Stopped
            }
        }
    }

    /// Detonates the bomb at `position` and returns the affected cells.
    ///
    /// Other bombs inside the blast are destroyed without exploding on their own.
    pub(crate) fn detonate(&mut self, position: CellCoord, grid: &mut GridMap) -> Vec<CellCoord> {
        let cells = grid.neighborhood(position);
        for cell in &cells {
            let _ = self.bombs.remove(cell);
            if !grid.tile(*cell).is_indestructible() {
                grid.set_tile(*cell, Tile::Explosion);
            }
        }
        let _ = self.explosions.insert(position, EXPLOSION_DURATION);
        cells
    }

    /// Removes the explosion centred on `epicenter` and clears its cells.
    ///
    /// Cells still covered by another live explosion keep burning.
    pub(crate) fn cool_explosion(
        &mut self,
        epicenter: CellCoord,
        grid: &mut GridMap,
    ) -> Vec<CellCoord> {
        let _ = self.explosions.remove(&epicenter);
        let mut cleared = Vec::new();
        for cell in grid.neighborhood(epicenter) {
            if grid.tile(cell) != Tile::Explosion || self.explosion_covers(cell) {
                continue;
            }
            grid.set_tile(cell, Tile::Empty);
            cleared.push(cell);
        }
        cleared
    }

    /// Advances every countdown by one tick, resolving expiries and drift.
    pub(crate) fn tick_all(
        &mut self,
        grid: &mut GridMap,
        occupied: &dyn Fn(CellCoord) -> bool,
    ) -> HazardTick {
        let mut outcome = HazardTick::default();

        let epicenters: Vec<CellCoord> = self.explosions.keys().copied().collect();
        for epicenter in epicenters {
            let Some(countdown) = self.explosions.get_mut(&epicenter) else {
                continue;
            };
            *countdown = countdown.saturating_sub(1);
            if *countdown == 0 {
                let cells = self.cool_explosion(epicenter, grid);
                outcome.cooled.push(Cooling { epicenter, cells });
            }
        }

        let positions: Vec<CellCoord> = self.bombs.keys().copied().collect();
        for position in positions {
            let Some(bomb) = self.bombs.get_mut(&position) else {
                continue;
            };
            bomb.countdown = bomb.countdown.saturating_sub(1);
            if bomb.countdown == 0 {
                let cells = self.detonate(position, grid);
                outcome.detonations.push(Detonation {
                    epicenter: position,
                    cells,
                });
            } else if bomb.drift.is_some() {
                outcome.drifts.push(self.drift_bomb(position, grid, occupied));
            }
        }

        outcome
    }

    /// Reports whether `cell` lies in the 3×3 block of any live explosion.
    pub(crate) fn explosion_covers(&self, cell: CellCoord) -> bool {
        self.explosions
            .keys()
            .any(|epicenter| epicenter.is_neighbor_of(cell))
    }

    pub(crate) fn bomb_countdowns(&self) -> BTreeMap<CellCoord, u32> {
        self.bombs
            .iter()
            .map(|(cell, bomb)| (*cell, bomb.countdown))
            .collect()
    }

    pub(crate) fn explosion_countdowns(&self) -> BTreeMap<CellCoord, u32> {
        self.explosions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use friendly_snakes_core::{DropKind, DropRate, ItemKind, Level, VictoryCondition};

    fn arena() -> GridMap {
        let body = (0..4).map(|offset| CellCoord::new(1, 1 + offset)).collect();
        let level = Level::new(
            9,
            9,
            Level::bordered_tiles(9, 9),
            vec![body],
            vec![DropRate::new(DropKind::Item(ItemKind::Apple), 1)],
            5,
            VictoryCondition::None,
        )
        .expect("valid level");
        GridMap::from_level(&level)
    }

    fn nobody(_: CellCoord) -> bool {
        false
    }

    fn assert_in_sync(registry: &HazardRegistry, grid: &GridMap) {
        for (cell, tile) in grid.cells() {
            assert_eq!(
                tile == Tile::Bomb,
                registry.bombs.contains_key(&cell),
                "bomb tile and registry diverged at {cell:?}"
            );
            if tile == Tile::Explosion {
                assert!(registry.explosion_covers(cell), "orphan explosion at {cell:?}");
            }
        }
    }

    #[test]
    fn bomb_detonates_when_countdown_runs_out() {
        let mut grid = arena();
        let mut registry = HazardRegistry::new();
        let bomb = CellCoord::new(4, 4);
        registry.place_bomb(&mut grid, bomb);

        for _ in 1..BOMB_COUNTDOWN {
            let tick = registry.tick_all(&mut grid, &nobody);
            assert!(tick.detonations.is_empty());
        }
        let tick = registry.tick_all(&mut grid, &nobody);
        assert_eq!(tick.detonations.len(), 1);
        assert_eq!(tick.detonations[0].cells.len(), 9);
        assert!(registry.bombs.is_empty());
        assert_eq!(registry.explosions.get(&bomb), Some(&EXPLOSION_DURATION));
        for cell in grid.neighborhood(bomb) {
            assert_eq!(grid.tile(cell), Tile::Explosion);
        }
        assert_in_sync(&registry, &grid);
    }

    #[test]
    fn explosion_cools_after_its_duration_and_spares_walls() {
        let mut grid = arena();
        let mut registry = HazardRegistry::new();
        let epicenter = CellCoord::new(1, 1);
        let _ = registry.detonate(epicenter, &mut grid);
        assert_eq!(grid.tile(CellCoord::new(0, 0)), Tile::Wall);
        assert_eq!(grid.tile(CellCoord::new(2, 2)), Tile::Explosion);

        for _ in 1..EXPLOSION_DURATION {
            assert!(registry.tick_all(&mut grid, &nobody).cooled.is_empty());
        }
        let tick = registry.tick_all(&mut grid, &nobody);
        assert_eq!(tick.cooled.len(), 1);
        assert_eq!(tick.cooled[0].cells.len(), 4);
        assert!(registry.explosions.is_empty());
        assert_eq!(grid.tile(CellCoord::new(2, 2)), Tile::Empty);
        assert_eq!(grid.tile(CellCoord::new(0, 1)), Tile::Wall);
    }

    #[test]
    fn neighbouring_bombs_are_destroyed_not_chained() {
        let mut grid = arena();
        let mut registry = HazardRegistry::new();
        registry.place_bomb(&mut grid, CellCoord::new(4, 4));
        registry.place_bomb(&mut grid, CellCoord::new(5, 5));

        let _ = registry.detonate(CellCoord::new(4, 4), &mut grid);
        assert!(registry.bombs.is_empty());
        assert_eq!(registry.explosions.len(), 1);
        assert_eq!(grid.tile(CellCoord::new(5, 5)), Tile::Explosion);
        assert_eq!(grid.tile(CellCoord::new(6, 6)), Tile::Empty);
        assert_in_sync(&registry, &grid);
    }

    #[test]
    fn overlapping_explosions_keep_shared_cells_burning() {
        let mut grid = arena();
        let mut registry = HazardRegistry::new();
        let _ = registry.detonate(CellCoord::new(3, 3), &mut grid);
        let _ = registry.detonate(CellCoord::new(3, 5), &mut grid);

        let cleared = registry.cool_explosion(CellCoord::new(3, 3), &mut grid);
        assert_eq!(cleared.len(), 6);
        assert_eq!(grid.tile(CellCoord::new(3, 4)), Tile::Explosion);
        assert_eq!(grid.tile(CellCoord::new(3, 2)), Tile::Empty);
        assert_in_sync(&registry, &grid);
    }

    #[test]
    fn pushed_bomb_stops_at_a_wall() {
        let mut grid = arena();
        let mut registry = HazardRegistry::new();
        let bomb = CellCoord::new(1, 4);
        registry.place_bomb(&mut grid, bomb);
        registry.push_bomb(bomb, Direction::North);

        let drift = registry.drift_bomb(bomb, &mut grid, &nobody);
        assert!(drift.hit_stopper());
        assert_eq!(
            registry.drift_bomb(bomb, &mut grid, &nobody),
            Drift::Stationary
        );
        assert_eq!(grid.tile(bomb), Tile::Bomb);
    }

    #[test]
    fn pushed_bomb_stops_at_a_snake() {
        let mut grid = arena();
        let mut registry = HazardRegistry::new();
        let bomb = CellCoord::new(4, 4);
        registry.place_bomb(&mut grid, bomb);
        registry.push_bomb(bomb, Direction::East);

        let snake_cell = CellCoord::new(4, 5);
        let drift = registry.drift_bomb(bomb, &mut grid, &|cell| cell == snake_cell);
        assert_eq!(drift, Drift::Stopped);
    }

    #[test]
    fn drifting_bomb_moves_one_cell_per_tick() {
        let mut grid = arena();
        let mut registry = HazardRegistry::new();
        registry.place_bomb(&mut grid, CellCoord::new(4, 2));
        registry.push_bomb(CellCoord::new(4, 2), Direction::East);

        for column in 3..=7 {
            let tick = registry.tick_all(&mut grid, &nobody);
            assert_eq!(
                tick.drifts,
                vec![Drift::Moved {
                    from: CellCoord::new(4, column - 1),
                    to: CellCoord::new(4, column),
                }]
            );
            assert_eq!(grid.tile(CellCoord::new(4, column)), Tile::Bomb);
            assert_eq!(grid.tile(CellCoord::new(4, column - 1)), Tile::Empty);
        }
        let tick = registry.tick_all(&mut grid, &nobody);
        assert_eq!(tick.drifts, vec![Drift::Stopped]);
        assert_eq!(
            registry.bomb_countdowns().get(&CellCoord::new(4, 7)),
            Some(&(BOMB_COUNTDOWN - 6))
        );
        assert_in_sync(&registry, &grid);
    }

    #[test]
    fn bomb_drifting_into_an_explosion_is_absorbed() {
        let mut grid = arena();
        let mut registry = HazardRegistry::new();
        let _ = registry.detonate(CellCoord::new(4, 6), &mut grid);
        registry.place_bomb(&mut grid, CellCoord::new(4, 4));
        registry.push_bomb(CellCoord::new(4, 4), Direction::East);

        let drift = registry.drift_bomb(CellCoord::new(4, 4), &mut grid, &nobody);
        assert_eq!(
            drift,
            Drift::Absorbed {
                from: CellCoord::new(4, 4)
            }
        );
        assert!(registry.bomb_countdowns().is_empty());
        assert_eq!(grid.tile(CellCoord::new(4, 4)), Tile::Empty);
        assert_eq!(registry.explosion_countdowns().len(), 1);
        assert_in_sync(&registry, &grid);
    }
}
