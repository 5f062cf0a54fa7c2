//! Level description handed over by the level-loading collaborator.

use std::{collections::BTreeSet, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    CellCoord, Direction, DropKind, DropRate, LevelError, RoundConfigError, SnakeColor, Tile,
    MIN_SNAKE_SIZE,
};

/// Condition under which the players win a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VictoryCondition {
    /// The round only ends by crashing.
    None,
    /// The snakes win once their combined score reaches the target.
    ReachScore(u32),
    /// The snakes win by staying alive for the given duration.
    SurviveFor(Duration),
}

/// Validated, immutable level data consumed by the world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    rows: u32,
    columns: u32,
    tiles: Vec<Tile>,
    start_positions: Vec<Vec<CellCoord>>,
    drop_table: Vec<DropRate>,
    drop_list: Vec<DropKind>,
    drop_interval_secs: u32,
    victory: VictoryCondition,
}

impl Level {
    /// Validates and assembles a level.
    ///
    /// `tiles` is laid out row-major. Each start position lists a snake body
    /// from head to tail.
    pub fn new(
        rows: u32,
        columns: u32,
        tiles: Vec<Tile>,
        start_positions: Vec<Vec<CellCoord>>,
        drop_table: Vec<DropRate>,
        drop_interval_secs: u32,
        victory: VictoryCondition,
    ) -> Result<Self, LevelError> {
        if rows == 0 || columns == 0 {
            return Err(LevelError::EmptyGrid);
        }

        let expected = rows as usize * columns as usize;
        if tiles.len() != expected {
            return Err(LevelError::TileCountMismatch {
                expected,
                actual: tiles.len(),
            });
        }

        if let Some(index) = tiles
            .iter()
            .position(|tile| matches!(tile, Tile::Bomb | Tile::Explosion))
        {
            let index = index as u32;
            return Err(LevelError::UnsupportedTile {
                cell: CellCoord::new(index / columns, index % columns),
            });
        }

        let mut claimed = BTreeSet::new();
        for (player, body) in start_positions.iter().enumerate() {
            if body.len() < MIN_SNAKE_SIZE {
                return Err(LevelError::StartTooShort {
                    player,
                    length: body.len(),
                    minimum: MIN_SNAKE_SIZE,
                });
            }

            for (position, cell) in body.iter().enumerate() {
                if cell.row() >= rows || cell.column() >= columns {
                    return Err(LevelError::StartOutOfBounds {
                        player,
                        cell: *cell,
                    });
                }
                let index = (cell.row() * columns + cell.column()) as usize;
                if tiles[index] != Tile::Empty {
                    return Err(LevelError::StartBlocked {
                        player,
                        cell: *cell,
                    });
                }
                if !claimed.insert(*cell) {
                    return Err(LevelError::StartOverlap { cell: *cell });
                }
                if position > 0 && Direction::between(body[position - 1], *cell).is_none() {
                    return Err(LevelError::StartNotContiguous {
                        player,
                        cell: *cell,
                    });
                }
            }
        }

        if drop_table.is_empty() {
            return Err(LevelError::EmptyDropTable);
        }
        if let Some(entry) = drop_table.iter().find(|entry| entry.rate == 0) {
            return Err(LevelError::ZeroDropRate { kind: entry.kind });
        }
        let drop_list: Vec<DropKind> = drop_table
            .iter()
            .flat_map(|entry| std::iter::repeat(entry.kind).take(entry.rate as usize))
            .collect();
        if drop_interval_secs == 0 {
            return Err(LevelError::ZeroDropInterval);
        }

        Ok(Self {
            rows,
            columns,
            tiles,
            start_positions,
            drop_table,
            drop_list,
            drop_interval_secs,
            victory,
        })
    }

    /// Produces a row-major tile layout of empty cells enclosed by walls.
    #[must_use]
    pub fn bordered_tiles(rows: u32, columns: u32) -> Vec<Tile> {
        let mut tiles = Vec::with_capacity(rows as usize * columns as usize);
        for row in 0..rows {
            for column in 0..columns {
                let on_border =
                    row == 0 || column == 0 || row + 1 == rows || column + 1 == columns;
                tiles.push(if on_border { Tile::Wall } else { Tile::Empty });
            }
        }
        tiles
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Initial tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Start bodies, one per player slot, each listed from head to tail.
    #[must_use]
    pub fn start_positions(&self) -> &[Vec<CellCoord>] {
        &self.start_positions
    }

    /// Drop table as configured by the level.
    #[must_use]
    pub fn drop_table(&self) -> &[DropRate] {
        &self.drop_table
    }

    /// Drop kinds repeated once per unit of their configured rate.
    #[must_use]
    pub fn items(&self) -> &[DropKind] {
        &self.drop_list
    }

    /// Seconds between two item drops.
    #[must_use]
    pub const fn drop_interval_secs(&self) -> u32 {
        self.drop_interval_secs
    }

    /// Victory condition; the world treats it as opaque.
    #[must_use]
    pub const fn victory(&self) -> VictoryCondition {
        self.victory
    }
}

/// Identity of a player retained across round resets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Display name of the player.
    pub name: String,
    /// Appearance of the player's snake.
    pub color: SnakeColor,
}

impl PlayerProfile {
    /// Creates a new player profile.
    #[must_use]
    pub fn new(name: impl Into<String>, color: SnakeColor) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Everything required to start, and later restart, a round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundConfig {
    level: Level,
    players: Vec<PlayerProfile>,
    seed: u64,
}

impl RoundConfig {
    /// Pairs a level with a roster, checking that every player gets a start position.
    pub fn new(
        level: Level,
        players: Vec<PlayerProfile>,
        seed: u64,
    ) -> Result<Self, RoundConfigError> {
        if players.is_empty() {
            return Err(RoundConfigError::NoPlayers);
        }
        let available = level.start_positions().len();
        if players.len() > available {
            return Err(RoundConfigError::NotEnoughStartPositions {
                available,
                requested: players.len(),
            });
        }
        Ok(Self {
            level,
            players,
            seed,
        })
    }

    /// Level the round is played on.
    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Players taking part, in slot order.
    #[must_use]
    pub fn players(&self) -> &[PlayerProfile] {
        &self.players
    }

    /// Seed for the item spawner's random source.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}
