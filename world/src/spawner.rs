//! Timed drops of items and bombs onto free cells.

use std::collections::BTreeSet;

use friendly_snakes_core::{CellCoord, DropKind, Level, Tile, TICKS_PER_SECOND};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{grid::GridMap, hazards::HazardRegistry};

/// Periodic drop countdown paired with the set of cells eligible for drops.
#[derive(Clone, Debug)]
pub(crate) struct ItemSpawner {
    countdown: u32,
    interval: u32,
    items: Vec<DropKind>,
    free: BTreeSet<CellCoord>,
    rng: ChaCha8Rng,
}

impl ItemSpawner {
    /// Creates a spawner whose first drop happens one interval after the start.
    pub(crate) fn new(level: &Level, seed: u64, free: BTreeSet<CellCoord>) -> Self {
        let interval = level
            .drop_interval_secs()
            .saturating_mul(TICKS_PER_SECOND)
            .max(1);
        Self {
            countdown: interval,
            interval,
            items: level.items().to_vec(),
            free,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Advances the drop countdown, dropping something when it runs out.
    ///
    /// A drop is skipped when no cell is free; the countdown is re-armed either way.
    pub(crate) fn tick(
        &mut self,
        grid: &mut GridMap,
        hazards: &mut HazardRegistry,
    ) -> Option<(DropKind, CellCoord)> {
        if self.countdown > 1 {
            self.countdown -= 1;
            return None;
        }
        self.countdown = self.interval;

        if self.free.is_empty() {
            log::trace!("no free cell left, skipping drop");
            return None;
        }
        let index = self.rng.gen_range(0..self.free.len());
        let cell = self.free.iter().nth(index).copied()?;
        let kind = *self.items.choose(&mut self.rng)?;

        match kind {
            DropKind::Item(item) => grid.set_tile(cell, Tile::Item(item)),
            DropKind::Bomb => hazards.place_bomb(grid, cell),
        }
        let _ = self.free.remove(&cell);
        Some((kind, cell))
    }

    pub(crate) fn release(&mut self, cell: CellCoord) {
        let _ = self.free.insert(cell);
    }

    pub(crate) fn claim(&mut self, cell: CellCoord) {
        let _ = self.free.remove(&cell);
    }

    pub(crate) fn free_cells(&self) -> &BTreeSet<CellCoord> {
        &self.free
    }

    pub(crate) fn countdown(&self) -> u32 {
        self.countdown
    }
}
