//! Dense tile storage for the arena.

use friendly_snakes_core::{CellCoord, Direction, Level, Tile};

/// Tile grid owned by the world; one [`Tile`] per cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    rows: u32,
    columns: u32,
    tiles: Vec<Tile>,
}

impl GridMap {
    pub(crate) fn from_level(level: &Level) -> Self {
        Self {
            rows: level.rows(),
            columns: level.columns(),
            tiles: level.tiles().to_vec(),
        }
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

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Tile stored at the cell. Cells beyond the map edge read as walls.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Tile {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(Tile::Wall)
    }

    /// Iterates every cell with its tile in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = index as u32;
            (CellCoord::new(index / columns, index % columns), *tile)
        })
    }

    /// The 3×3 block around `center`, clipped to the grid.
    #[must_use]
    pub fn neighborhood(&self, center: CellCoord) -> Vec<CellCoord> {
        center
            .neighborhood()
            .into_iter()
            .filter(|cell| self.contains(*cell))
            .collect()
    }

    /// Cells covered by a fire breath leaving `origin` toward `direction`.
    ///
    /// The ray starts next to `origin` and stops before the first
    /// indestructible tile or the map edge.
    #[must_use]
    pub fn fire_ray(&self, origin: CellCoord, direction: Direction, range: u32) -> Vec<CellCoord> {
        let mut cells = Vec::with_capacity(range as usize);
        let mut cursor = origin;
        for _ in 0..range {
            let Some(next) = cursor.step(direction).filter(|cell| self.contains(*cell)) else {
                break;
            };
            if self.tile(next).is_indestructible() {
                break;
            }
            cells.push(next);
            cursor = next;
        }
        cells
    }

    pub(crate) fn set_tile(&mut self, cell: CellCoord, tile: Tile) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.tiles.get_mut(index) {
                *slot = tile;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use friendly_snakes_core::{DropKind, DropRate, ItemKind, VictoryCondition};

    fn grid(rows: u32, columns: u32, tiles: Vec<Tile>) -> GridMap {
        let body = (0..4).map(|offset| CellCoord::new(1, 1 + offset)).collect();
        let level = Level::new(
            rows,
            columns,
            tiles,
            vec![body],
            vec![DropRate::new(DropKind::Item(ItemKind::Apple), 1)],
            5,
            VictoryCondition::None,
        )
        .expect("valid level");
        GridMap::from_level(&level)
    }

    #[test]
    fn cells_beyond_the_edge_read_as_walls() {
        let grid = grid(4, 6, vec![Tile::Empty; 24]);
        assert_eq!(grid.tile(CellCoord::new(3, 5)), Tile::Empty);
        assert_eq!(grid.tile(CellCoord::new(4, 0)), Tile::Wall);
        assert_eq!(grid.tile(CellCoord::new(0, 6)), Tile::Wall);
    }

    #[test]
    fn neighborhood_is_clipped_to_the_grid() {
        let grid = grid(4, 6, vec![Tile::Empty; 24]);
        assert_eq!(grid.neighborhood(CellCoord::new(3, 5)).len(), 4);
        assert_eq!(grid.neighborhood(CellCoord::new(2, 2)).len(), 9);
    }

    #[test]
    fn fire_ray_stops_at_walls() {
        let grid = grid(6, 8, Level::bordered_tiles(6, 8));
        let ray = grid.fire_ray(CellCoord::new(2, 5), Direction::East, 2);
        assert_eq!(ray, vec![CellCoord::new(2, 6)]);
        let open = grid.fire_ray(CellCoord::new(2, 2), Direction::East, 2);
        assert_eq!(open, vec![CellCoord::new(2, 3), CellCoord::new(2, 4)]);
    }

    #[test]
    fn fire_ray_stops_at_the_map_edge() {
        let grid = grid(4, 6, vec![Tile::Empty; 24]);
        assert!(grid.fire_ray(CellCoord::new(0, 3), Direction::North, 2).is_empty());
    }

    #[test]
    fn set_tile_ignores_cells_outside_the_grid() {
        let mut grid = grid(4, 6, vec![Tile::Empty; 24]);
        let before = grid.clone();
        grid.set_tile(CellCoord::new(10, 10), Tile::Bomb);
        assert_eq!(grid, before);
        grid.set_tile(CellCoord::new(0, 0), Tile::Bomb);
        assert_eq!(grid.tile(CellCoord::new(0, 0)), Tile::Bomb);
        assert_eq!(
            grid.cells().find(|(_, tile)| *tile == Tile::Bomb),
            Some((CellCoord::new(0, 0), Tile::Bomb))
        );
    }
}
