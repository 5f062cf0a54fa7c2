#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decides whether the players have won or lost the current round.

use std::time::Duration;

use friendly_snakes_core::{Event, SnakeView, VictoryCondition, COUNTDOWN_INTERVAL};

/// State of the round as judged against the level's victory condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundVerdict {
    /// Neither condition has been met yet.
    Ongoing,
    /// The players met the level's victory condition.
    Won,
    /// A crash ended the round first.
    Lost,
}

impl RoundVerdict {
    /// Reports whether the round has been decided.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Pure system that tracks the verdict of the running round.
#[derive(Debug)]
pub struct Victory {
    condition: VictoryCondition,
    verdict: RoundVerdict,
}

impl Victory {
    /// Creates a new victory system for the provided condition.
    #[must_use]
    pub const fn new(condition: VictoryCondition) -> Self {
        Self {
            condition,
            verdict: RoundVerdict::Ongoing,
        }
    }

    /// Consumes world events and the current snakes to update the verdict.
    ///
    /// `ticks_elapsed` counts global countdown ticks since the round started.
    /// A decided verdict sticks until the round is reset.
    pub fn handle(
        &mut self,
        events: &[Event],
        snakes: &SnakeView,
        ticks_elapsed: u64,
    ) -> RoundVerdict {
        for event in events {
            match event {
                Event::RoundReset => self.verdict = RoundVerdict::Ongoing,
                Event::RoundEnded { .. } if !self.verdict.is_decided() => {
                    self.verdict = RoundVerdict::Lost;
                }
                _ => {}
            }
        }

        if !self.verdict.is_decided() && self.condition_met(snakes, ticks_elapsed) {
            self.verdict = RoundVerdict::Won;
        }
        self.verdict
    }

    /// Verdict reached so far.
    #[must_use]
    pub const fn verdict(&self) -> RoundVerdict {
        self.verdict
    }

    fn condition_met(&self, snakes: &SnakeView, ticks_elapsed: u64) -> bool {
        match self.condition {
            VictoryCondition::None => false,
            VictoryCondition::ReachScore(target) => {
                let total: u64 = snakes.iter().map(|snake| u64::from(snake.score)).sum();
                total >= u64::from(target)
            }
            VictoryCondition::SurviveFor(duration) => elapsed(ticks_elapsed) >= duration,
        }
    }
}

/// Converts a number of global countdown ticks into wall-clock time.
#[must_use]
pub fn elapsed(ticks: u64) -> Duration {
    let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
    COUNTDOWN_INTERVAL.saturating_mul(ticks)
}
