//! Errors raised while validating collaborator-supplied round configuration.

use thiserror::Error;

use crate::{CellCoord, DropKind};

/// Reasons a level description is rejected before a round can start.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The grid has no rows or no columns.
    #[error("level grid must have at least one row and one column")]
    EmptyGrid,
    /// The tile list does not match the declared dimensions.
    #[error("level declares {expected} cells but provides {actual} tiles")]
    TileCountMismatch {
        /// Number of cells implied by the dimensions.
        expected: usize,
        /// Number of tiles supplied.
        actual: usize,
    },
    /// Bombs and explosions need registry state that a static level cannot carry.
    #[error("level tile at {cell:?} must be empty, a wall or an item")]
    UnsupportedTile {
        /// Offending cell.
        cell: CellCoord,
    },
    /// A start body is shorter than the minimum snake size.
    #[error("start position {player} has {length} cells, expected at least {minimum}")]
    StartTooShort {
        /// Player slot of the start body.
        player: usize,
        /// Number of cells supplied.
        length: usize,
        /// Required minimum.
        minimum: usize,
    },
    /// Two consecutive cells of a start body are not orthogonally adjacent.
    #[error("start position {player} is not contiguous at {cell:?}")]
    StartNotContiguous {
        /// Player slot of the start body.
        player: usize,
        /// First cell that does not touch its predecessor.
        cell: CellCoord,
    },
    /// A start cell lies outside the grid.
    #[error("start position {player} leaves the grid at {cell:?}")]
    StartOutOfBounds {
        /// Player slot of the start body.
        player: usize,
        /// Cell outside the grid.
        cell: CellCoord,
    },
    /// A start cell is not empty.
    #[error("start position {player} is blocked at {cell:?}")]
    StartBlocked {
        /// Player slot of the start body.
        player: usize,
        /// Cell whose tile is not empty.
        cell: CellCoord,
    },
    /// A cell is claimed by more than one start body or twice by the same one.
    #[error("start cell {cell:?} is claimed more than once")]
    StartOverlap {
        /// Cell claimed more than once.
        cell: CellCoord,
    },
    /// The drop table has no entries.
    #[error("drop table must contain at least one entry")]
    EmptyDropTable,
    /// A drop table entry would never be picked.
    #[error("drop table entry for {kind:?} must have a positive rate")]
    ZeroDropRate {
        /// Kind whose rate is zero.
        kind: DropKind,
    },
    /// Items would never be dropped.
    #[error("drop interval must be at least one second")]
    ZeroDropInterval,
}

/// Reasons a round cannot be assembled from a level and a roster.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RoundConfigError {
    /// The roster is empty.
    #[error("a round needs at least one player")]
    NoPlayers,
    /// The level offers fewer start positions than there are players.
    #[error("level offers {available} start positions for {requested} players")]
    NotEnoughStartPositions {
        /// Start positions defined by the level.
        available: usize,
        /// Players in the roster.
        requested: usize,
    },
}
