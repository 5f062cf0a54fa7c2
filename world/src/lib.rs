#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Friendly Snakes.
//!
//! The [`World`] owns the tile grid, every snake, the hazard registry and the
//! item spawner. Adapters mutate it exclusively through [`apply`] and read it
//! through the [`query`] module.

mod grid;
mod hazards;
mod snake;
mod spawner;

use std::collections::BTreeSet;

use friendly_snakes_core::{
    CellCoord, Command, Crash, Direction, DropKind, Event, ItemKind, RoundConfig, SnakeId, Tile,
    SPIT_FIRE_RANGE,
};

pub use grid::GridMap;

use hazards::{Drift, HazardRegistry};
use snake::{Snake, StatusChange};
use spawner::ItemSpawner;

/// Represents the authoritative state of a single round.
#[derive(Debug)]
pub struct World {
    config: RoundConfig,
    grid: GridMap,
    snakes: Vec<Snake>,
    hazards: HazardRegistry,
    spawner: ItemSpawner,
    crashes: Vec<Crash>,
    ticks_elapsed: u64,
}

/// Outcome of the first resolution stage for one due snake.
#[derive(Debug)]
struct PlannedMove {
    index: usize,
    from: CellCoord,
    body: Vec<CellCoord>,
    fire: Vec<CellCoord>,
}

impl World {
    /// Creates a world positioned at the start of the configured round.
    #[must_use]
    pub fn new(config: RoundConfig) -> Self {
        let grid = GridMap::from_level(config.level());
        let snakes = spawn_snakes(&config);
        let spawner = ItemSpawner::new(
            config.level(),
            config.seed(),
            free_cells(&grid, &snakes),
        );
        Self {
            config,
            grid,
            snakes,
            hazards: HazardRegistry::new(),
            spawner,
            crashes: Vec::new(),
            ticks_elapsed: 0,
        }
    }

    /// Restores the round to its initial state, keeping level and roster.
    pub fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.grid = GridMap::from_level(self.config.level());
        self.snakes = spawn_snakes(&self.config);
        self.hazards = HazardRegistry::new();
        self.spawner = ItemSpawner::new(
            self.config.level(),
            self.config.seed(),
            free_cells(&self.grid, &self.snakes),
        );
        self.crashes.clear();
        self.ticks_elapsed = 0;
        log::info!("round reset with {} snakes", self.snakes.len());
        out_events.push(Event::RoundReset);
    }

    /// Requests a new heading for a snake. Returns whether it was accepted.
    pub fn steer(
        &mut self,
        snake: SnakeId,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(target) = self.snakes.iter_mut().find(|candidate| candidate.id() == snake) else {
            return false;
        };
        if !target.set_orientation(direction) {
            log::trace!("{snake:?} refused to reverse towards {direction:?}");
            return false;
        }
        out_events.push(Event::SnakeSteered {
            snake,
            direction: target.orientation(),
        });
        true
    }

    /// Moves every listed snake by one cell, resolving them as one batch.
    ///
    /// Item effects and bomb pushes take place before collisions are
    /// resolved, so they stick even when the move itself is fatal. Returns
    /// the kinds of the items that were eaten.
    pub fn advance_snakes(
        &mut self,
        due: &[SnakeId],
        out_events: &mut Vec<Event>,
    ) -> Vec<ItemKind> {
        if self.is_round_over() {
            return Vec::new();
        }

        let mut due_indices: Vec<usize> = due
            .iter()
            .filter_map(|id| self.snakes.iter().position(|snake| snake.id() == *id))
            .collect();
        due_indices.sort_unstable();
        due_indices.dedup();

        let mut consumed = Vec::new();
        let mut meals = Vec::new();
        let mut planned = Vec::with_capacity(due_indices.len());

        for index in due_indices {
            let (id, from, orientation) = {
                let snake = &self.snakes[index];
                (snake.id(), snake.head(), snake.orientation())
            };
            let Some(to) = from.step(orientation).filter(|cell| self.grid.contains(*cell)) else {
                self.record_crash(Crash::at(from), out_events);
                continue;
            };

            let tile = self.grid.tile(to);
            if tile.is_hazard() {
                self.record_crash(Crash::between(from, to), out_events);
            }
            match tile {
                Tile::Item(kind) => {
                    self.snakes[index].apply_item_effect(kind);
                    self.grid.set_tile(to, Tile::Empty);
                    self.release_cell(to);
                    consumed.push(kind);
                    meals.push((index, kind));
                    log::debug!("{id:?} ate {kind:?} at {to:?}");
                    out_events.push(Event::ItemConsumed {
                        snake: id,
                        kind,
                        cell: to,
                    });
                }
                Tile::Bomb => {
                    self.hazards.push_bomb(to, orientation);
                    out_events.push(Event::BombPushed { snake: id, from: to });
                    let drift = self.drift_bomb(to);
                    if drift.hit_stopper() {
                        self.record_crash(Crash::between(from, to), out_events);
                    }
                }
                Tile::Empty | Tile::Wall | Tile::Explosion => {}
            }

            let snake = &self.snakes[index];
            let fire = if snake.is_breathing_fire() {
                self.grid.fire_ray(to, orientation, SPIT_FIRE_RANGE)
            } else {
                Vec::new()
            };
            planned.push(PlannedMove {
                index,
                from,
                body: snake.candidate_body(to),
                fire,
            });
        }

        let mut collisions = Vec::new();
        for plan in &planned {
            let head = plan.body[0];
            if plan.body[1..].contains(&head) {
                collisions.push(Crash::between(plan.body[1], head));
            }

            let hits_other = self.snakes.iter().enumerate().any(|(other, snake)| {
                if other == plan.index {
                    return false;
                }
                match planned.iter().find(|candidate| candidate.index == other) {
                    Some(candidate) => candidate.body.contains(&head),
                    None => snake.occupies(head),
                }
            });
            if hits_other {
                collisions.push(Crash::between(plan.from, head));
            }

            if self.hazards.explosion_covers(head) {
                collisions.push(Crash::between(plan.from, head));
            }
        }
        for crash in collisions {
            self.record_crash(crash, out_events);
        }

        let fire: Vec<CellCoord> = self
            .snakes
            .iter()
            .enumerate()
            .flat_map(|(index, snake)| {
                match planned.iter().find(|plan| plan.index == index) {
                    Some(plan) => plan.fire.clone(),
                    None => snake.fire_cells().to_vec(),
                }
            })
            .collect();

        if self.crashes.is_empty() {
            self.commit_moves(planned, &meals, out_events);
        }

        let mut burned = Vec::new();
        for snake in &self.snakes {
            for cell in snake.body() {
                if fire.contains(cell) {
                    burned.push(Crash::at(*cell));
                }
            }
        }
        for crash in burned {
            self.record_crash(crash, out_events);
        }

        self.announce_round_end(out_events);
        consumed
    }

    fn commit_moves(
        &mut self,
        planned: Vec<PlannedMove>,
        meals: &[(usize, ItemKind)],
        out_events: &mut Vec<Event>,
    ) {
        let mut vacated = Vec::new();
        for plan in planned {
            let head = plan.body[0];
            let snake = &mut self.snakes[plan.index];
            if let Some(tail) = snake.advance(head) {
                vacated.push(tail);
            }
            snake.set_fire_cells(plan.fire);
            log::trace!(
                "{:?} moved to {head:?} at speed {}",
                snake.id(),
                snake.speed()
            );
            out_events.push(Event::SnakeAdvanced {
                snake: snake.id(),
                from: plan.from,
                to: head,
            });
            self.spawner.claim(head);
        }
        for tail in vacated {
            self.release_cell(tail);
        }
        for (index, kind) in meals {
            self.snakes[*index].add_score(kind.score());
        }
    }

    /// Advances every countdown-driven element by one global tick.
    pub fn tick_countdowns(&mut self, out_events: &mut Vec<Event>) {
        if self.is_round_over() {
            return;
        }
        self.ticks_elapsed = self.ticks_elapsed.saturating_add(1);

        let snakes = &self.snakes;
        let occupied = |cell: CellCoord| snakes.iter().any(|snake| snake.occupies(cell));
        let outcome = self.hazards.tick_all(&mut self.grid, &occupied);

        for cooling in outcome.cooled {
            for cell in cooling.cells {
                self.release_cell(cell);
            }
            log::trace!("explosion at {:?} cooled", cooling.epicenter);
            out_events.push(Event::ExplosionCooled {
                epicenter: cooling.epicenter,
            });
        }
        for detonation in outcome.detonations {
            log::debug!("bomb at {:?} detonated", detonation.epicenter);
            out_events.push(Event::ExplosionTriggered {
                epicenter: detonation.epicenter,
            });
            let mut caught = Vec::new();
            for cell in detonation.cells {
                self.spawner.claim(cell);
                if self.snakes.iter().any(|snake| snake.occupies(cell)) {
                    caught.push(Crash::at(cell));
                }
            }
            for crash in caught {
                self.record_crash(crash, out_events);
            }
        }
        for drift in outcome.drifts {
            self.settle_drift(drift);
        }

        if let Some((kind, cell)) = self.spawner.tick(&mut self.grid, &mut self.hazards) {
            log::debug!("dropped {kind:?} at {cell:?}");
            out_events.push(match kind {
                DropKind::Item(item) => Event::ItemDropped { item, cell },
                DropKind::Bomb => Event::BombDropped { cell },
            });
        }

        for index in 0..self.snakes.len() {
            let was_drunk = self.snakes[index].is_drunk();
            let change = self.snakes[index].tick_status();
            let id = self.snakes[index].id();
            if was_drunk && !self.snakes[index].is_drunk() {
                out_events.push(Event::SnakeSobered { snake: id });
            }
            match change {
                StatusChange::None => {}
                StatusChange::FireStarted => {
                    let snake = &self.snakes[index];
                    let ray =
                        self.grid
                            .fire_ray(snake.head(), snake.orientation(), SPIT_FIRE_RANGE);
                    self.snakes[index].set_fire_cells(ray);
                    log::debug!("{id:?} started breathing fire");
                    out_events.push(Event::FireStarted { snake: id });
                }
                StatusChange::FireEnded => {
                    out_events.push(Event::FireEnded { snake: id });
                }
            }
        }

        self.announce_round_end(out_events);
    }

    /// Reports whether a crash ended the round.
    #[must_use]
    pub fn is_round_over(&self) -> bool {
        !self.crashes.is_empty()
    }

    fn drift_bomb(&mut self, position: CellCoord) -> Drift {
        let snakes = &self.snakes;
        let occupied = |cell: CellCoord| snakes.iter().any(|snake| snake.occupies(cell));
        let drift = self.hazards.drift_bomb(position, &mut self.grid, &occupied);
        self.settle_drift(drift);
        drift
    }

    fn settle_drift(&mut self, drift: Drift) {
        match drift {
            Drift::Moved { from, to } => {
                self.release_cell(from);
                self.spawner.claim(to);
            }
            Drift::Absorbed { from } => self.release_cell(from),
            Drift::Stationary | Drift::Stopped => {}
        }
    }

    fn release_cell(&mut self, cell: CellCoord) {
        if self.grid.tile(cell) == Tile::Empty
            && !self.snakes.iter().any(|snake| snake.occupies(cell))
        {
            self.spawner.release(cell);
        }
    }

    fn record_crash(&mut self, crash: Crash, out_events: &mut Vec<Event>) {
        if self.crashes.contains(&crash) {
            return;
        }
        log::debug!("crash from {:?} to {:?}", crash.from(), crash.to());
        self.crashes.push(crash);
        out_events.push(Event::SnakeCrashed { crash });
    }

    /// Only called by entry points that return early once the round is over,
    /// so the announcement happens exactly once.
    fn announce_round_end(&self, out_events: &mut Vec<Event>) {
        if self.is_round_over() {
            log::info!("round ended with {} crashes", self.crashes.len());
            out_events.push(Event::RoundEnded {
                crashes: self.crashes.len(),
            });
        }
    }
}

fn spawn_snakes(config: &RoundConfig) -> Vec<Snake> {
    config
        .players()
        .iter()
        .zip(config.level().start_positions())
        .enumerate()
        .map(|(index, (profile, body))| {
            let id = SnakeId::new(u32::try_from(index).unwrap_or(u32::MAX));
            Snake::new(id, profile.clone(), body)
        })
        .collect()
}

fn free_cells(grid: &GridMap, snakes: &[Snake]) -> BTreeSet<CellCoord> {
    grid.cells()
        .filter(|(cell, tile)| {
            *tile == Tile::Empty && !snakes.iter().any(|snake| snake.occupies(*cell))
        })
        .map(|(cell, _)| cell)
        .collect()
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SteerSnake { snake, direction } => {
            let _ = world.steer(snake, direction, out_events);
        }
        Command::AdvanceSnakes { snakes } => {
            let _ = world.advance_snakes(&snakes, out_events);
        }
        Command::TickCountdowns => world.tick_countdowns(out_events),
        Command::ResetRound => world.reset(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::{BTreeMap, BTreeSet};

    use friendly_snakes_core::{CellCoord, Crash, Level, SnakeView};

    use super::{GridMap, World};

    /// Provides read-only access to the tile grid.
    #[must_use]
    pub fn grid(world: &World) -> &GridMap {
        &world.grid
    }

    /// Level the round is being played on.
    #[must_use]
    pub fn level(world: &World) -> &Level {
        world.config.level()
    }

    /// Captures a read-only view of every snake.
    #[must_use]
    pub fn snake_view(world: &World) -> SnakeView {
        SnakeView::from_snapshots(world.snakes.iter().map(|snake| snake.snapshot()).collect())
    }

    /// Crashes accumulated since the round started.
    #[must_use]
    pub fn crashes(world: &World) -> &[Crash] {
        &world.crashes
    }

    /// Reports whether a crash ended the round.
    #[must_use]
    pub fn is_round_over(world: &World) -> bool {
        world.is_round_over()
    }

    /// Remaining countdown of every live bomb keyed by position.
    #[must_use]
    pub fn bomb_countdowns(world: &World) -> BTreeMap<CellCoord, u32> {
        world.hazards.bomb_countdowns()
    }

    /// Remaining countdown of every live explosion keyed by epicenter.
    #[must_use]
    pub fn explosion_countdowns(world: &World) -> BTreeMap<CellCoord, u32> {
        world.hazards.explosion_countdowns()
    }

    /// Cells currently eligible for item drops.
    #[must_use]
    pub fn free_cells(world: &World) -> &BTreeSet<CellCoord> {
        world.spawner.free_cells()
    }

    /// Global ticks left until the next item drop.
    #[must_use]
    pub fn drop_countdown(world: &World) -> u32 {
        world.spawner.countdown()
    }

    /// Number of global ticks processed since the round started.
    #[must_use]
    pub fn ticks_elapsed(world: &World) -> u64 {
        world.ticks_elapsed
    }
}
