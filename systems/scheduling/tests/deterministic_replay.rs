use std::time::Duration;

use friendly_snakes_core::{
    CellCoord, Command, Crash, Direction, DropKind, DropRate, Event, ItemKind, Level,
    PlayerProfile, RoundConfig, SnakeColor, SnakeId, SnakeSnapshot, VictoryCondition,
};
use friendly_snakes_system_scheduling::Scheduler;
use friendly_snakes_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(50);
const MAX_FRAMES: usize = 1_200;

#[test]
fn identical_runs_produce_identical_rounds() {
    let first = replay(&mut new_world());
    let second = replay(&mut new_world());

    assert_eq!(first, second, "replay diverged between runs");
    assert!(!first.crashes.is_empty(), "scripted round never ended");
}

#[test]
fn reset_replays_the_same_round() {
    let mut world = new_world();
    let first = replay(&mut world);

    let mut events = Vec::new();
    world::apply(&mut world, Command::ResetRound, &mut events);
    assert_eq!(events, vec![Event::RoundReset]);
    let second = replay(&mut world);

    assert_eq!(first.crashes, second.crashes);
    assert_eq!(first, second);
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    crashes: Vec<Crash>,
    snakes: Vec<SnakeSnapshot>,
    events: Vec<Event>,
}

fn new_world() -> World {
    let level = Level::new(
        9,
        12,
        Level::bordered_tiles(9, 12),
        vec![
            (3..=6).map(|column| CellCoord::new(2, column)).collect(),
            (7..=10).map(|column| CellCoord::new(6, column)).collect(),
        ],
        vec![
            DropRate::new(DropKind::Item(ItemKind::Apple), 3),
            DropRate::new(DropKind::Item(ItemKind::Melon), 1),
            DropRate::new(DropKind::Item(ItemKind::Coffee), 1),
            DropRate::new(DropKind::Item(ItemKind::Beer), 1),
            DropRate::new(DropKind::Bomb, 1),
        ],
        1,
        VictoryCondition::None,
    )
    .expect("valid level");
    let players = vec![
        PlayerProfile::new("Kokosnuss", SnakeColor::from_rgb(0, 153, 0)),
        PlayerProfile::new("Matilda", SnakeColor::from_rgb(204, 0, 0)),
    ];
    World::new(RoundConfig::new(level, players, 0x5eed).expect("valid round"))
}

fn steering(frame: usize) -> Vec<Command> {
    let steer = |snake: u32, direction| Command::SteerSnake {
        snake: SnakeId::new(snake),
        direction,
    };
    match frame {
        4 => vec![steer(0, Direction::South)],
        10 => vec![steer(1, Direction::North)],
        14 => vec![steer(0, Direction::West)],
        _ => Vec::new(),
    }
}

fn replay(world: &mut World) -> ReplayOutcome {
    let mut scheduler = Scheduler::default();
    let mut events = Vec::new();
    let mut log = Vec::new();

    for frame in 0..MAX_FRAMES {
        let mut commands = steering(frame);
        scheduler.handle(FRAME, &events, &query::snake_view(world), &mut commands);

        events.clear();
        for command in commands {
            world::apply(world, command, &mut events);
        }
        log.extend(events.iter().cloned());

        if query::is_round_over(world) {
            break;
        }
    }

    ReplayOutcome {
        crashes: query::crashes(world).to_vec(),
        snakes: query::snake_view(world).into_vec(),
        events: log,
    }
}
