#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Friendly Snakes engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for presentation
//! layers and systems to react to. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

mod error;
mod items;
mod level;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use error::{LevelError, RoundConfigError};
pub use items::{DropKind, DropRate, ItemEffect, ItemKind, SpeedChange};
pub use level::{Level, PlayerProfile, RoundConfig, VictoryCondition};

/// Minimum number of body cells a snake starts a round with.
pub const MIN_SNAKE_SIZE: usize = 4;
/// Slowest permitted snake speed measured in cells per second.
pub const MIN_SNAKE_SPEED: u32 = 1;
/// Fastest permitted snake speed measured in cells per second.
pub const MAX_SNAKE_SPEED: u32 = 1000;
/// Speed assigned to every snake when a round starts.
pub const DEFAULT_SNAKE_SPEED: u32 = 4;

/// Interval between two global countdown ticks.
pub const COUNTDOWN_INTERVAL: Duration = Duration::from_millis(250);
/// Number of global countdown ticks that elapse per second.
pub const TICKS_PER_SECOND: u32 = 4;

/// Countdown of a freshly dropped bomb, in global ticks.
pub const BOMB_COUNTDOWN: u32 = 9 * TICKS_PER_SECOND;
/// Lifetime of an explosion, in global ticks.
pub const EXPLOSION_DURATION: u32 = 2 * TICKS_PER_SECOND;
/// Duration of drunkenness after drinking beer, in global ticks.
pub const DRUNK_DURATION: u32 = 10 * TICKS_PER_SECOND;
/// Delay between eating a chili and breathing fire, in global ticks.
pub const PIQUANCY_DURATION: u32 = 3 * TICKS_PER_SECOND;
/// Duration of active fire breath, in global ticks.
pub const FIRE_DURATION: u32 = 2 * TICKS_PER_SECOND;
/// Number of cells covered by a fire breath in front of the head.
pub const SPIT_FIRE_RANGE: u32 = 2;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests a new heading for a snake.
    SteerSnake {
        /// Snake that should change its heading.
        snake: SnakeId,
        /// Requested heading as decoded from player input.
        direction: Direction,
    },
    /// Moves every listed snake by one cell as a single batch.
    AdvanceSnakes {
        /// Snakes whose movement timer expired during the same instant.
        snakes: Vec<SnakeId>,
    },
    /// Advances every countdown-driven element by one global tick.
    TickCountdowns,
    /// Restores the round to its initial state.
    ResetRound,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a snake accepted a new heading.
    SnakeSteered {
        /// Snake that changed its heading.
        snake: SnakeId,
        /// Heading the snake will follow on its next move.
        direction: Direction,
    },
    /// Confirms that a snake moved its head between two cells.
    SnakeAdvanced {
        /// Snake that moved.
        snake: SnakeId,
        /// Head cell before the move.
        from: CellCoord,
        /// Head cell after the move.
        to: CellCoord,
    },
    /// Reports that a snake swallowed an item.
    ItemConsumed {
        /// Snake that ate the item.
        snake: SnakeId,
        /// Kind of item that was eaten.
        kind: ItemKind,
        /// Cell the item occupied.
        cell: CellCoord,
    },
    /// Reports that a snake shoved a bomb.
    BombPushed {
        /// Snake that pushed the bomb.
        snake: SnakeId,
        /// Cell the bomb occupied when it was pushed.
        from: CellCoord,
    },
    /// Reports that the spawner dropped a consumable item.
    ItemDropped {
        /// Kind of item that appeared.
        item: ItemKind,
        /// Cell that received the item.
        cell: CellCoord,
    },
    /// Reports that the spawner dropped a live bomb.
    BombDropped {
        /// Cell that received the bomb.
        cell: CellCoord,
    },
    /// Reports that a bomb detonated.
    ExplosionTriggered {
        /// Cell the detonating bomb occupied.
        epicenter: CellCoord,
    },
    /// Reports that an explosion burned out.
    ExplosionCooled {
        /// Cell the explosion was centred on.
        epicenter: CellCoord,
    },
    /// Reports that a snake's drunkenness wore off.
    SnakeSobered {
        /// Snake that regained its regular controls.
        snake: SnakeId,
    },
    /// Reports that a snake started breathing fire.
    FireStarted {
        /// Snake breathing fire.
        snake: SnakeId,
    },
    /// Reports that a snake stopped breathing fire.
    FireEnded {
        /// Snake whose fire went out.
        snake: SnakeId,
    },
    /// Reports a fatal collision.
    SnakeCrashed {
        /// Endpoints of the collision.
        crash: Crash,
    },
    /// Announces that the round ended because crashes were recorded.
    RoundEnded {
        /// Number of crashes accumulated when the round ended.
        crashes: usize,
    },
    /// Confirms that the round was restored to its initial state.
    RoundReset,
}

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Returns the adjacent cell in the provided direction.
    ///
    /// Yields `None` when the step would leave the non-negative quadrant.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self
                .row
                .checked_sub(1)
                .map(|row| Self::new(row, self.column)),
            Direction::South => self
                .row
                .checked_add(1)
                .map(|row| Self::new(row, self.column)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(self.row, column)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(self.row, column)),
        }
    }

    /// Enumerates the 3×3 block centred on the cell in row-major order.
    ///
    /// Cells with a negative coordinate are skipped; callers clip the upper
    /// bound against their own grid dimensions.
    #[must_use]
    pub fn neighborhood(self) -> Vec<CellCoord> {
        let mut cells = Vec::with_capacity(9);
        for row_offset in [-1_i64, 0, 1] {
            for column_offset in [-1_i64, 0, 1] {
                let row = i64::from(self.row) + row_offset;
                let column = i64::from(self.column) + column_offset;
                if let (Ok(row), Ok(column)) = (u32::try_from(row), u32::try_from(column)) {
                    cells.push(Self::new(row, column));
                }
            }
        }
        cells
    }

    /// Reports whether `other` lies within the 3×3 block centred on the cell.
    #[must_use]
    pub fn is_neighbor_of(self, other: CellCoord) -> bool {
        self.row.abs_diff(other.row) <= 1 && self.column.abs_diff(other.column) <= 1
    }
}

/// Cardinal movement directions available to snakes and drifting bombs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Returns the opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Derives the direction leading from `from` to the orthogonally adjacent `to`.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());

        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Self::East)
            } else {
                Some(Self::West)
            }
        } else if to.row() > from.row() {
            Some(Self::South)
        } else {
            Some(Self::North)
        }
    }
}

/// Value occupying a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Nothing occupies the cell.
    Empty,
    /// Indestructible obstacle.
    Wall,
    /// Consumable item waiting to be eaten.
    Item(ItemKind),
    /// Live bomb tracked by the hazard registry.
    Bomb,
    /// Burning cell belonging to a live explosion.
    Explosion,
}

impl Tile {
    /// Reports whether entering the tile is fatal.
    #[must_use]
    pub const fn is_hazard(self) -> bool {
        matches!(self, Self::Wall | Self::Explosion)
    }

    /// Reports whether explosions and fire leave the tile untouched.
    #[must_use]
    pub const fn is_indestructible(self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// Unique identifier assigned to a snake, equal to its player slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnakeId(u32);

impl SnakeId {
    /// Creates a new snake identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Player slot index backing the identifier.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Visual appearance applied to a snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnakeColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl SnakeColor {
    /// Creates a new snake color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Fatal collision recorded as the two cells between which it happened.
///
/// Identical endpoints denote an in-place death such as burning or being
/// caught by an explosion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crash {
    from: CellCoord,
    to: CellCoord,
}

impl Crash {
    /// Creates a crash between two cells.
    #[must_use]
    pub const fn between(from: CellCoord, to: CellCoord) -> Self {
        Self { from, to }
    }

    /// Creates an in-place crash at a single cell.
    #[must_use]
    pub const fn at(cell: CellCoord) -> Self {
        Self {
            from: cell,
            to: cell,
        }
    }

    /// Cell the crashing snake came from.
    #[must_use]
    pub const fn from(&self) -> CellCoord {
        self.from
    }

    /// Cell where the collision happened.
    #[must_use]
    pub const fn to(&self) -> CellCoord {
        self.to
    }

    /// Reports whether both endpoints coincide.
    #[must_use]
    pub fn is_in_place(&self) -> bool {
        self.from == self.to
    }
}

/// Immutable representation of a single snake's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnakeSnapshot {
    /// Unique identifier assigned to the snake.
    pub id: SnakeId,
    /// Display name of the owning player.
    pub name: String,
    /// Appearance assigned to the snake.
    pub color: SnakeColor,
    /// Occupied cells ordered from head to tail.
    pub body: Vec<CellCoord>,
    /// Heading used for the next move.
    pub orientation: Direction,
    /// Current speed in cells per second.
    pub speed: u32,
    /// Points accumulated this round.
    pub score: u32,
    /// Number of upcoming moves that keep the tail in place.
    pub pending_growth: u32,
    /// Remaining drunkenness in global ticks.
    pub drunk_ticks: u32,
    /// Remaining delay until fire breath, in global ticks.
    pub piquancy_ticks: u32,
    /// Remaining fire breath in global ticks.
    pub fire_ticks: u32,
    /// Cells currently covered by the snake's fire breath.
    pub fire_cells: Vec<CellCoord>,
}

impl SnakeSnapshot {
    /// Head cell of the snake.
    #[must_use]
    pub fn head(&self) -> Option<CellCoord> {
        self.body.first().copied()
    }

    /// Reports whether the snake currently steers with swapped controls.
    #[must_use]
    pub fn is_drunk(&self) -> bool {
        self.drunk_ticks > 0
    }

    /// Reports whether the snake currently breathes fire.
    #[must_use]
    pub fn is_breathing_fire(&self) -> bool {
        self.fire_ticks > 0
    }
}

/// Read-only snapshot describing all snakes within the arena.
#[derive(Clone, Debug, Default)]
pub struct SnakeView {
    snapshots: Vec<SnakeSnapshot>,
}

impl SnakeView {
    /// Creates a new snake view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<SnakeSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snake snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &SnakeSnapshot> {
        self.snapshots.iter()
    }

    /// Retrieves the snapshot of a specific snake.
    #[must_use]
    pub fn get(&self, snake: SnakeId) -> Option<&SnakeSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == snake)
    }

    /// Number of snakes captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no snakes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<SnakeSnapshot> {
        self.snapshots
    }
}
