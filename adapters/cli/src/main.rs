#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Friendly Snakes round headlessly.

mod ascii;
mod round_file;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use friendly_snakes_core::{Command, Event, RoundConfig};
use friendly_snakes_system_scheduling::{Config as SchedulerConfig, Scheduler};
use friendly_snakes_system_victory::{elapsed, RoundVerdict, Victory};
use friendly_snakes_world::{self as world, query, World};

use round_file::{RoundSetup, ScriptedTurn};

/// Plays a scripted Friendly Snakes round without a window.
#[derive(Debug, Parser)]
#[command(name = "friendly-snakes", version, about)]
struct Args {
    /// Round description in TOML; a built-in arena is used when omitted.
    #[arg(long, value_name = "PATH")]
    round: Option<PathBuf>,

    /// Overrides the seed of the item spawner.
    #[arg(long)]
    seed: Option<u64>,

    /// Upper bound on simulated frames.
    #[arg(long, default_value_t = 2_400)]
    frames: u64,

    /// Simulated duration of one frame in milliseconds.
    #[arg(long, default_value_t = 50)]
    frame_ms: u64,

    /// Print the arena every this many frames; 0 prints only the final frame.
    #[arg(long, default_value_t = 0)]
    print_every: u64,
}

/// Entry point for the Friendly Snakes command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let RoundSetup { config, script } = match &args.round {
        Some(path) => round_file::load(path)?,
        None => round_file::parse(round_file::DEFAULT_ROUND)
            .context("built-in round is invalid")?,
    };
    let config = match args.seed {
        Some(seed) => RoundConfig::new(config.level().clone(), config.players().to_vec(), seed)
            .context("failed to apply seed override")?,
        None => config,
    };

    let summary = play(
        config,
        &script,
        Duration::from_millis(args.frame_ms.max(1)),
        args.frames,
        args.print_every,
    );
    println!("{summary}");
    Ok(())
}

/// Runs the frame loop until the round is decided or the frame budget runs out.
fn play(
    config: RoundConfig,
    script: &[ScriptedTurn],
    frame_duration: Duration,
    frames: u64,
    print_every: u64,
) -> String {
    let mut victory = Victory::new(config.level().victory());
    let mut world = World::new(config);
    let mut scheduler = Scheduler::new(SchedulerConfig::default());
    let mut events: Vec<Event> = Vec::new();
    let mut verdict = RoundVerdict::Ongoing;
    let mut played = 0;

    while played < frames && !verdict.is_decided() {
        let mut commands: Vec<Command> = script
            .iter()
            .filter(|turn| turn.frame == played)
            .map(|turn| Command::SteerSnake {
                snake: turn.snake,
                direction: turn.direction,
            })
            .collect();
        scheduler.handle(
            frame_duration,
            &events,
            &query::snake_view(&world),
            &mut commands,
        );

        events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        for event in &events {
            log_event(event);
        }
        verdict = victory.handle(
            &events,
            &query::snake_view(&world),
            query::ticks_elapsed(&world),
        );
        played += 1;

        if print_every > 0 && played % print_every == 0 {
            println!("frame {played}\n{}", draw(&world));
        }
    }

    format!(
        "{}{:?} after {:.2?} of play\n{}",
        draw(&world),
        verdict,
        elapsed(query::ticks_elapsed(&world)),
        ascii::scoreboard(&query::snake_view(&world)),
    )
}

fn draw(world: &World) -> String {
    ascii::render(
        query::grid(world),
        &query::snake_view(world),
        query::crashes(world),
    )
}

fn log_event(event: &Event) {
    match event {
        Event::SnakeAdvanced { .. } | Event::SnakeSteered { .. } => log::trace!("{event:?}"),
        Event::RoundEnded { .. } | Event::RoundReset => log::info!("{event:?}"),
        _ => log::debug!("{event:?}"),
    }
}
