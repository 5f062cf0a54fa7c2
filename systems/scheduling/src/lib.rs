#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame scheduler that turns elapsed time into world commands.
//!
//! Two clocks drive a round: a fixed countdown clock shared by every timed
//! element, and one movement clock per snake whose period follows the
//! snake's current speed. Snakes that become due during the same frame are
//! batched into a single [`Command::AdvanceSnakes`].

use std::{collections::BTreeMap, time::Duration};

use friendly_snakes_core::{Command, Event, SnakeId, SnakeView, COUNTDOWN_INTERVAL};

/// Configuration parameters required to construct the scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    countdown_interval: Duration,
}

impl Config {
    /// Creates a configuration using the provided countdown cadence.
    #[must_use]
    pub const fn new(countdown_interval: Duration) -> Self {
        Self { countdown_interval }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(COUNTDOWN_INTERVAL)
    }
}

/// Pure system that emits countdown ticks and batched snake moves.
#[derive(Debug)]
pub struct Scheduler {
    countdown_interval: Duration,
    countdown_accumulator: Duration,
    move_timers: BTreeMap<SnakeId, Duration>,
    halted: bool,
}

impl Scheduler {
    /// Creates a new scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            countdown_interval: config.countdown_interval,
            countdown_accumulator: Duration::ZERO,
            move_timers: BTreeMap::new(),
            halted: false,
        }
    }

    /// Consumes the frame duration, the previous frame's events and the
    /// current snakes to emit this frame's commands.
    ///
    /// Countdown ticks come first; due snakes follow as one batch. Nothing is
    /// emitted between the end of a round and the next reset.
    pub fn handle(
        &mut self,
        dt: Duration,
        events: &[Event],
        snakes: &SnakeView,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::RoundEnded { .. } => self.halted = true,
                Event::RoundReset => self.reset(),
                _ => {}
            }
        }
        if self.halted {
            return;
        }

        if !self.countdown_interval.is_zero() {
            self.countdown_accumulator = self.countdown_accumulator.saturating_add(dt);
            while self.countdown_accumulator >= self.countdown_interval {
                self.countdown_accumulator -= self.countdown_interval;
                out.push(Command::TickCountdowns);
            }
        }

        let mut due = Vec::new();
        for snake in snakes.iter() {
            let timer = self.move_timers.entry(snake.id).or_insert(Duration::ZERO);
            *timer = timer.saturating_add(dt);
            if *timer >= move_period(snake.speed) {
                *timer = Duration::ZERO;
                due.push(snake.id);
            }
        }
        if !due.is_empty() {
            out.push(Command::AdvanceSnakes { snakes: due });
        }
    }

    /// Clears every clock, as at the start of a round.
    pub fn reset(&mut self) {
        self.countdown_accumulator = Duration::ZERO;
        self.move_timers.clear();
        self.halted = false;
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Time a snake needs to cover one cell at the given speed.
#[must_use]
pub fn move_period(speed: u32) -> Duration {
    Duration::from_secs(1) / speed.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_period_follows_speed() {
        assert_eq!(move_period(4), Duration::from_millis(250));
        assert_eq!(move_period(1000), Duration::from_millis(1));
        assert_eq!(move_period(0), Duration::from_secs(1));
    }

    #[test]
    fn zero_interval_never_ticks() {
        let mut scheduler = Scheduler::new(Config::new(Duration::ZERO));
        let mut commands = Vec::new();
        scheduler.handle(
            Duration::from_secs(5),
            &[],
            &SnakeView::default(),
            &mut commands,
        );
        assert!(commands.is_empty());
    }
}
