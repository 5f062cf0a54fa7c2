//! TOML description of a round: arena, roster, drop table and a steering script.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use friendly_snakes_core::{
    CellCoord, Direction, DropKind, DropRate, ItemKind, Level, PlayerProfile, RoundConfig,
    SnakeColor, SnakeId, Tile, VictoryCondition,
};
use serde::Deserialize;

const SUPPORTED_ROUND_VERSION: u32 = 1;

/// Round played when no file is given on the command line.
pub(crate) const DEFAULT_ROUND: &str = r#"
version = 1
seed = 2024
drop_interval_secs = 2

[arena]
rows = 12
columns = 20
walls = [[5, 9], [6, 9], [7, 9]]
items = [
    { row = 3, column = 4, kind = "apple" },
    { row = 8, column = 15, kind = "chili" },
]

[victory]
kind = "reach_score"
score = 30

[[drops]]
kind = "apple"
rate = 4

[[drops]]
kind = "melon"
rate = 1

[[drops]]
kind = "coffee"
rate = 1

[[drops]]
kind = "tea"
rate = 1

[[drops]]
kind = "beer"
rate = 1

[[drops]]
kind = "chili"
rate = 1

[[drops]]
kind = "bomb"
rate = 1

[[players]]
name = "Kokosnuss"
color = [0, 153, 0]
body = [[3, 8], [3, 9], [3, 10], [3, 11]]

[[players]]
name = "Matilda"
color = [204, 0, 0]
body = [[8, 11], [8, 10], [8, 9], [8, 8]]

[[script]]
frame = 20
player = 0
direction = "south"

[[script]]
frame = 36
player = 1
direction = "north"

[[script]]
frame = 52
player = 0
direction = "east"
"#;

#[derive(Debug, Deserialize)]
struct RoundFile {
    version: u32,
    seed: u64,
    drop_interval_secs: u32,
    arena: ArenaEntry,
    #[serde(default)]
    victory: Option<VictoryEntry>,
    drops: Vec<DropEntry>,
    players: Vec<PlayerEntry>,
    #[serde(default)]
    script: Vec<TurnEntry>,
}

#[derive(Debug, Deserialize)]
struct ArenaEntry {
    rows: u32,
    columns: u32,
    #[serde(default)]
    walls: Vec<[u32; 2]>,
    #[serde(default)]
    items: Vec<ItemEntry>,
}

#[derive(Debug, Deserialize)]
struct ItemEntry {
    row: u32,
    column: u32,
    kind: String,
}

#[derive(Debug, Deserialize)]
struct VictoryEntry {
    kind: String,
    #[serde(default)]
    score: Option<u32>,
    #[serde(default)]
    seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct DropEntry {
    kind: String,
    rate: u32,
}

#[derive(Debug, Deserialize)]
struct PlayerEntry {
    name: String,
    color: [u8; 3],
    body: Vec<[u32; 2]>,
}

#[derive(Debug, Deserialize)]
struct TurnEntry {
    frame: u64,
    player: u32,
    direction: String,
}

/// Steering request issued at a fixed frame of the headless run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScriptedTurn {
    pub(crate) frame: u64,
    pub(crate) snake: SnakeId,
    pub(crate) direction: Direction,
}

/// Everything the driver needs to play a round.
#[derive(Debug)]
pub(crate) struct RoundSetup {
    pub(crate) config: RoundConfig,
    pub(crate) script: Vec<ScriptedTurn>,
}

/// Loads a round description from disk.
pub(crate) fn load(path: &Path) -> Result<RoundSetup> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read round file at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid round file {}", path.display()))
}

/// Parses and validates a round description.
pub(crate) fn parse(contents: &str) -> Result<RoundSetup> {
    let file: RoundFile =
        toml::from_str(contents).context("failed to parse round toml contents")?;
    if file.version != SUPPORTED_ROUND_VERSION {
        bail!(
            "unsupported round file version {}; expected {}",
            file.version,
            SUPPORTED_ROUND_VERSION
        );
    }

    let arena = &file.arena;
    let mut tiles = Level::bordered_tiles(arena.rows, arena.columns);
    for [row, column] in &arena.walls {
        let index = tile_index(arena, *row, *column)?;
        tiles[index] = Tile::Wall;
    }
    for item in &arena.items {
        let index = tile_index(arena, item.row, item.column)?;
        tiles[index] = Tile::Item(parse_item(&item.kind)?);
    }

    let drop_table = file
        .drops
        .iter()
        .map(|entry| Ok(DropRate::new(parse_drop(&entry.kind)?, entry.rate)))
        .collect::<Result<Vec<_>>>()?;

    let start_positions = file
        .players
        .iter()
        .map(|player| {
            player
                .body
                .iter()
                .map(|[row, column]| CellCoord::new(*row, *column))
                .collect()
        })
        .collect();
    let players = file
        .players
        .iter()
        .map(|player| {
            let [red, green, blue] = player.color;
            PlayerProfile::new(player.name.clone(), SnakeColor::from_rgb(red, green, blue))
        })
        .collect();

    let victory = match &file.victory {
        Some(entry) => parse_victory(entry)?,
        None => VictoryCondition::None,
    };

    let level = Level::new(
        arena.rows,
        arena.columns,
        tiles,
        start_positions,
        drop_table,
        file.drop_interval_secs,
        victory,
    )
    .context("round file describes an invalid level")?;
    let config = RoundConfig::new(level, players, file.seed)
        .context("round file describes an invalid roster")?;

    let script = file
        .script
        .iter()
        .map(|turn| {
            Ok(ScriptedTurn {
                frame: turn.frame,
                snake: SnakeId::new(turn.player),
                direction: parse_direction(&turn.direction)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RoundSetup { config, script })
}

fn tile_index(arena: &ArenaEntry, row: u32, column: u32) -> Result<usize> {
    if row >= arena.rows || column >= arena.columns {
        bail!(
            "cell ({row}, {column}) lies outside the {}x{} arena",
            arena.rows,
            arena.columns
        );
    }
    Ok((row * arena.columns + column) as usize)
}

fn parse_item(name: &str) -> Result<ItemKind> {
    match name {
        "apple" => Ok(ItemKind::Apple),
        "melon" => Ok(ItemKind::Melon),
        "coffee" => Ok(ItemKind::Coffee),
        "tea" => Ok(ItemKind::Tea),
        "beer" => Ok(ItemKind::Beer),
        "chili" => Ok(ItemKind::Chili),
        other => bail!("unknown item kind `{other}`"),
    }
}

fn parse_drop(name: &str) -> Result<DropKind> {
    if name == "bomb" {
        return Ok(DropKind::Bomb);
    }
    parse_item(name).map(DropKind::Item)
}

fn parse_direction(name: &str) -> Result<Direction> {
    match name {
        "north" => Ok(Direction::North),
        "east" => Ok(Direction::East),
        "south" => Ok(Direction::South),
        "west" => Ok(Direction::West),
        other => bail!("unknown direction `{other}`"),
    }
}

fn parse_victory(entry: &VictoryEntry) -> Result<VictoryCondition> {
    match entry.kind.as_str() {
        "none" => Ok(VictoryCondition::None),
        "reach_score" => {
            let score = entry
                .score
                .context("reach_score victory needs a `score` value")?;
            Ok(VictoryCondition::ReachScore(score))
        }
        "survive" => {
            let seconds = entry
                .seconds
                .context("survive victory needs a `seconds` value")?;
            Ok(VictoryCondition::SurviveFor(Duration::from_secs(seconds)))
        }
        other => bail!("unknown victory kind `{other}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_parses() {
        let setup = parse(DEFAULT_ROUND).expect("default round is valid");
        let level = setup.config.level();
        assert_eq!((level.rows(), level.columns()), (12, 20));
        assert_eq!(setup.config.players().len(), 2);
        assert_eq!(level.victory(), VictoryCondition::ReachScore(30));
        assert_eq!(
            level.tiles()[(3 * 20 + 4) as usize],
            Tile::Item(ItemKind::Apple)
        );
        assert_eq!(setup.script.len(), 3);
        assert_eq!(setup.script[0].direction, Direction::South);
    }

    #[test]
    fn rejects_unknown_versions() {
        let contents = DEFAULT_ROUND.replacen("version = 1", "version = 7", 1);
        let error = parse(&contents).expect_err("version 7 is unsupported");
        assert!(error.to_string().contains("unsupported round file version"));
    }

    #[test]
    fn rejects_unknown_item_names() {
        let contents = DEFAULT_ROUND.replacen("kind = \"tea\"", "kind = \"cake\"", 1);
        let error = parse(&contents).expect_err("cake is not an item");
        assert!(error.to_string().contains("unknown item kind `cake`"));
    }

    #[test]
    fn reports_invalid_levels() {
        let contents = DEFAULT_ROUND.replacen("[3, 8], [3, 9]", "[3, 8], [4, 9]", 1);
        let error = parse(&contents).expect_err("start body is broken");
        assert!(format!("{error:#}").contains("not contiguous"));
    }
}
