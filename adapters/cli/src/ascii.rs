//! Plain-text frame of the arena for headless runs.

use std::fmt::Write as _;

use friendly_snakes_core::{CellCoord, Crash, ItemKind, SnakeView, Tile};
use friendly_snakes_world::GridMap;

/// Glyph used for a tile when nothing else covers it.
fn tile_glyph(tile: Tile) -> char {
    match tile {
        Tile::Empty => '.',
        Tile::Wall => '#',
        Tile::Item(ItemKind::Apple) => 'a',
        Tile::Item(ItemKind::Melon) => 'm',
        Tile::Item(ItemKind::Coffee) => 'c',
        Tile::Item(ItemKind::Tea) => 't',
        Tile::Item(ItemKind::Beer) => 'b',
        Tile::Item(ItemKind::Chili) => 'h',
        Tile::Bomb => 'O',
        Tile::Explosion => '*',
    }
}

/// Renders the grid with snakes, fire and crash sites drawn on top.
///
/// Heads show the snake's slot number, bodies use `=`, fire uses `~` and
/// crash sites use `X`.
pub(crate) fn render(grid: &GridMap, snakes: &SnakeView, crashes: &[Crash]) -> String {
    let columns = grid.columns() as usize;
    let mut canvas: Vec<Vec<char>> = (0..grid.rows())
        .map(|row| {
            (0..grid.columns())
                .map(|column| tile_glyph(grid.tile(CellCoord::new(row, column))))
                .collect()
        })
        .collect();

    let mut paint = |cell: CellCoord, glyph: char| {
        if let Some(slot) = canvas
            .get_mut(cell.row() as usize)
            .and_then(|line| line.get_mut(cell.column() as usize))
        {
            *slot = glyph;
        }
    };

    for snake in snakes.iter() {
        for cell in &snake.fire_cells {
            paint(*cell, '~');
        }
        for cell in snake.body.iter().skip(1) {
            paint(*cell, '=');
        }
        if let Some(head) = snake.head() {
            let glyph = char::from_digit(snake.id.get() % 10, 10).unwrap_or('@');
            paint(head, glyph);
        }
    }
    for crash in crashes {
        paint(crash.to(), 'X');
    }

    let mut frame = String::with_capacity(canvas.len() * (columns + 1));
    for line in canvas {
        frame.extend(line);
        frame.push('\n');
    }
    frame
}

/// One line per snake with its score and active effects.
pub(crate) fn scoreboard(snakes: &SnakeView) -> String {
    let mut board = String::new();
    for snake in snakes.iter() {
        let _ = write!(
            board,
            "{} {:<12} score {:>4}  length {:>3}  speed {:>3}",
            snake.id.get(),
            snake.name,
            snake.score,
            snake.body.len(),
            snake.speed
        );
        if snake.is_drunk() {
            board.push_str("  drunk");
        }
        if snake.piquancy_ticks > 0 {
            board.push_str("  piquant");
        }
        if snake.is_breathing_fire() {
            board.push_str("  fire");
        }
        board.push('\n');
    }
    board
}
