//! Consumable item kinds and their static effect tables.

use serde::{Deserialize, Serialize};

use crate::{MAX_SNAKE_SPEED, MIN_SNAKE_SPEED};

/// Consumable items that may lie on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    /// Grows the snake by a single cell.
    Apple,
    /// Grows the snake by three cells.
    Melon,
    /// Speeds the snake up.
    Coffee,
    /// Slows the snake down.
    Tea,
    /// Swaps the snake's controls for a while.
    Beer,
    /// Makes the snake breathe fire after a delay.
    Chili,
}

impl ItemKind {
    /// Every item kind in declaration order.
    pub const ALL: [ItemKind; 6] = [
        ItemKind::Apple,
        ItemKind::Melon,
        ItemKind::Coffee,
        ItemKind::Tea,
        ItemKind::Beer,
        ItemKind::Chili,
    ];

    /// Effect applied to the snake that eats the item.
    #[must_use]
    pub const fn effect(self) -> ItemEffect {
        match self {
            Self::Apple => ItemEffect::Grow(1),
            Self::Melon => ItemEffect::Grow(3),
            Self::Coffee => ItemEffect::Speed(SpeedChange::Add(3)),
            Self::Tea => ItemEffect::Speed(SpeedChange::Add(-3)),
            Self::Beer => ItemEffect::Drunk,
            Self::Chili => ItemEffect::Piquancy,
        }
    }

    /// Points awarded once a move onto the item is committed.
    #[must_use]
    pub const fn score(self) -> u32 {
        match self {
            Self::Apple => 3,
            Self::Melon => 6,
            Self::Coffee => 9,
            Self::Tea => 0,
            Self::Beer => 7,
            Self::Chili => 5,
        }
    }
}

/// Status change caused by eating an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemEffect {
    /// Keeps the tail in place for the given number of moves.
    Grow(u32),
    /// Adjusts the snake's speed.
    Speed(SpeedChange),
    /// Starts or refreshes drunkenness.
    Drunk,
    /// Starts the countdown toward fire breath.
    Piquancy,
}

/// Adjustment applied to a snake's speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpeedChange {
    /// Adds a signed number of cells per second.
    Add(i32),
    /// Multiplies the speed by `numerator / denominator`, truncating.
    Scale {
        /// Multiplier applied to the current speed.
        numerator: u32,
        /// Divisor applied after multiplication.
        denominator: u32,
    },
}

impl SpeedChange {
    /// Applies the change and clamps the result to the permitted speed range.
    #[must_use]
    pub fn apply(self, speed: u32) -> u32 {
        let changed = match self {
            Self::Add(delta) => i64::from(speed) + i64::from(delta),
            Self::Scale {
                numerator,
                denominator,
            } => {
                if denominator == 0 {
                    i64::from(MAX_SNAKE_SPEED)
                } else {
                    i64::from(speed) * i64::from(numerator) / i64::from(denominator)
                }
            }
        };
        let clamped = changed.clamp(i64::from(MIN_SNAKE_SPEED), i64::from(MAX_SNAKE_SPEED));
        u32::try_from(clamped).unwrap_or(MIN_SNAKE_SPEED)
    }
}

/// Anything the item spawner may drop onto a free cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropKind {
    /// A consumable item.
    Item(ItemKind),
    /// A live bomb with a fresh countdown.
    Bomb,
}

/// Relative weight of a drop kind within a level's drop table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropRate {
    /// Kind that may be dropped.
    pub kind: DropKind,
    /// Number of lottery tickets the kind receives.
    pub rate: u32,
}

impl DropRate {
    /// Creates a drop table entry.
    #[must_use]
    pub const fn new(kind: DropKind, rate: u32) -> Self {
        Self { kind, rate }
    }
}
