//! Per-player body, heading and status effects.

use std::collections::VecDeque;

use friendly_snakes_core::{
    CellCoord, Direction, ItemEffect, ItemKind, PlayerProfile, SnakeId, SnakeSnapshot,
    DEFAULT_SNAKE_SPEED, DRUNK_DURATION, FIRE_DURATION, PIQUANCY_DURATION,
};

/// Fire transition reported by [`Snake::tick_status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StatusChange {
    None,
    FireStarted,
    FireEnded,
}

#[derive(Clone, Debug)]
pub(crate) struct Snake {
    id: SnakeId,
    profile: PlayerProfile,
    body: VecDeque<CellCoord>,
    orientation: Direction,
    speed: u32,
    score: u32,
    pending_growth: u32,
    drunk_ticks: u32,
    controls_transposed: bool,
    piquancy_ticks: u32,
    fire_ticks: u32,
    fire_cells: Vec<CellCoord>,
}

impl Snake {
    /// Builds a snake from a validated start body listed head first.
    pub(crate) fn new(id: SnakeId, profile: PlayerProfile, body: &[CellCoord]) -> Self {
        let orientation = match body {
            [head, neck, ..] => Direction::between(*neck, *head).unwrap_or(Direction::North),
            _ => Direction::North,
        };
        Self {
            id,
            profile,
            body: body.iter().copied().collect(),
            orientation,
            speed: DEFAULT_SNAKE_SPEED,
            score: 0,
            pending_growth: 0,
            drunk_ticks: 0,
            controls_transposed: false,
            piquancy_ticks: 0,
            fire_ticks: 0,
            fire_cells: Vec::new(),
        }
    }

    pub(crate) fn id(&self) -> SnakeId {
        self.id
    }

    pub(crate) fn head(&self) -> CellCoord {
        self.body[0]
    }

    pub(crate) fn body(&self) -> &VecDeque<CellCoord> {
        &self.body
    }

    pub(crate) fn occupies(&self, cell: CellCoord) -> bool {
        self.body.contains(&cell)
    }

    pub(crate) fn orientation(&self) -> Direction {
        self.orientation
    }

    pub(crate) fn speed(&self) -> u32 {
        self.speed
    }

    pub(crate) fn is_drunk(&self) -> bool {
        self.drunk_ticks > 0
    }

    pub(crate) fn is_breathing_fire(&self) -> bool {
        self.fire_ticks > 0
    }

    pub(crate) fn fire_cells(&self) -> &[CellCoord] {
        &self.fire_cells
    }

    /// Direction of the last completed move, derived from head and neck.
    fn movement_direction(&self) -> Option<Direction> {
        let neck = *self.body.get(1)?;
        Direction::between(neck, self.head())
    }

    /// Requests a new heading. Reversing into the neck is refused.
    ///
    /// While drunk the request is mirrored before it is checked.
    pub(crate) fn set_orientation(&mut self, requested: Direction) -> bool {
        let direction = if self.controls_transposed {
            requested.reversed()
        } else {
            requested
        };

        if let Some(current) = self.movement_direction() {
            if direction == current.reversed() {
                return false;
            }
        }

        self.orientation = direction;
        true
    }

    /// Body the snake would have after moving its head to `new_head`.
    pub(crate) fn candidate_body(&self, new_head: CellCoord) -> Vec<CellCoord> {
        let kept = if self.pending_growth > 0 {
            self.body.len()
        } else {
            self.body.len().saturating_sub(1)
        };
        std::iter::once(new_head)
            .chain(self.body.iter().take(kept).copied())
            .collect()
    }

    /// Moves the head to `new_head`, returning the vacated tail cell.
    pub(crate) fn advance(&mut self, new_head: CellCoord) -> Option<CellCoord> {
        self.body.push_front(new_head);
        if self.pending_growth > 0 {
            self.pending_growth -= 1;
            None
        } else {
            self.body.pop_back()
        }
    }

    pub(crate) fn apply_item_effect(&mut self, kind: ItemKind) {
        match kind.effect() {
            ItemEffect::Grow(amount) => {
                self.pending_growth = self.pending_growth.saturating_add(amount);
            }
            ItemEffect::Speed(change) => {
                self.speed = change.apply(self.speed);
            }
            ItemEffect::Drunk => self.get_drunk(),
            ItemEffect::Piquancy => {
                self.piquancy_ticks = self.piquancy_ticks.max(PIQUANCY_DURATION);
            }
        }
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub(crate) fn set_fire_cells(&mut self, cells: Vec<CellCoord>) {
        self.fire_cells = cells;
    }

    /// Advances every status timer by one global tick.
    pub(crate) fn tick_status(&mut self) -> StatusChange {
        let mut change = StatusChange::None;

        if self.drunk_ticks > 1 {
            self.drunk_ticks -= 1;
        } else if self.drunk_ticks == 1 {
            self.get_sober();
        }

        if self.piquancy_ticks > 1 {
            self.piquancy_ticks -= 1;
        } else if self.piquancy_ticks == 1 {
            self.piquancy_ticks = 0;
            self.fire_ticks = self.fire_ticks.max(FIRE_DURATION);
            change = StatusChange::FireStarted;
        }

        if self.fire_ticks > 1 {
            self.fire_ticks -= 1;
        } else if self.fire_ticks == 1 {
            self.fire_ticks = 0;
            self.fire_cells.clear();
            change = StatusChange::FireEnded;
        }

        change
    }

    fn get_drunk(&mut self) {
        if !self.controls_transposed {
            self.controls_transposed = true;
        }
        self.drunk_ticks = self.drunk_ticks.max(DRUNK_DURATION);
    }

    fn get_sober(&mut self) {
        if self.controls_transposed {
            self.controls_transposed = false;
        }
        self.drunk_ticks = 0;
    }

    pub(crate) fn snapshot(&self) -> SnakeSnapshot {
        SnakeSnapshot {
            id: self.id,
            name: self.profile.name.clone(),
            color: self.profile.color,
            body: self.body.iter().copied().collect(),
            orientation: self.orientation,
            speed: self.speed,
            score: self.score,
            pending_growth: self.pending_growth,
            drunk_ticks: self.drunk_ticks,
            piquancy_ticks: self.piquancy_ticks,
            fire_ticks: self.fire_ticks,
            fire_cells: self.fire_cells.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use friendly_snakes_core::{SnakeColor, MAX_SNAKE_SPEED, MIN_SNAKE_SIZE, MIN_SNAKE_SPEED};

    fn snake_facing_west() -> Snake {
        let body = [
            CellCoord::new(2, 2),
            CellCoord::new(2, 3),
            CellCoord::new(2, 4),
            CellCoord::new(2, 5),
        ];
        Snake::new(
            SnakeId::new(0),
            PlayerProfile::new("Kokosnuss", SnakeColor::from_rgb(0, 153, 0)),
            &body,
        )
    }

    #[test]
    fn orientation_follows_head_and_neck() {
        let snake = snake_facing_west();
        assert_eq!(snake.orientation(), Direction::West);
        assert_eq!(snake.body().len(), MIN_SNAKE_SIZE);
    }

    #[test]
    fn reversing_is_rejected_repeatedly() {
        let mut snake = snake_facing_west();
        assert!(!snake.set_orientation(Direction::East));
        assert!(!snake.set_orientation(Direction::East));
        assert_eq!(snake.orientation(), Direction::West);
    }

    #[test]
    fn reverse_check_uses_the_last_move_not_the_pending_heading() {
        let mut snake = snake_facing_west();
        assert!(snake.set_orientation(Direction::North));
        assert!(!snake.set_orientation(Direction::East));
        assert!(snake.set_orientation(Direction::South));
        assert_eq!(snake.orientation(), Direction::South);
    }

    #[test]
    fn drunk_controls_are_mirrored_until_sober() {
        let mut snake = snake_facing_west();
        snake.apply_item_effect(ItemKind::Beer);
        snake.apply_item_effect(ItemKind::Beer);
        assert!(snake.is_drunk());

        assert!(snake.set_orientation(Direction::North));
        assert_eq!(snake.orientation(), Direction::South);
        assert!(!snake.set_orientation(Direction::West));

        for _ in 0..DRUNK_DURATION {
            assert_eq!(snake.tick_status(), StatusChange::None);
        }
        assert!(!snake.is_drunk());
        assert!(snake.set_orientation(Direction::North));
        assert_eq!(snake.orientation(), Direction::North);
    }

    #[test]
    fn advance_drops_the_tail_without_growth() {
        let mut snake = snake_facing_west();
        let vacated = snake.advance(CellCoord::new(2, 1));
        assert_eq!(vacated, Some(CellCoord::new(2, 5)));
        assert_eq!(
            snake.body().iter().copied().collect::<Vec<_>>(),
            vec![
                CellCoord::new(2, 1),
                CellCoord::new(2, 2),
                CellCoord::new(2, 3),
                CellCoord::new(2, 4),
            ]
        );
    }

    #[test]
    fn growth_keeps_the_tail_for_each_pending_cell() {
        let mut snake = snake_facing_west();
        snake.apply_item_effect(ItemKind::Melon);
        let candidate = snake.candidate_body(CellCoord::new(2, 1));
        assert_eq!(candidate.len(), MIN_SNAKE_SIZE + 1);

        for column in [1, 0] {
            assert_eq!(snake.advance(CellCoord::new(2, column)), None);
        }
        assert_eq!(snake.advance(CellCoord::new(3, 0)), None);
        assert_eq!(snake.body().len(), MIN_SNAKE_SIZE + 3);
        assert_eq!(
            snake.advance(CellCoord::new(4, 0)),
            Some(CellCoord::new(2, 5))
        );
    }

    #[test]
    fn speed_stays_within_bounds() {
        let mut snake = snake_facing_west();
        for _ in 0..10 {
            snake.apply_item_effect(ItemKind::Tea);
        }
        assert_eq!(snake.speed(), MIN_SNAKE_SPEED);
        for _ in 0..1_000 {
            snake.apply_item_effect(ItemKind::Coffee);
        }
        assert_eq!(snake.speed(), MAX_SNAKE_SPEED);
    }

    #[test]
    fn piquancy_pays_off_into_fire_breath() {
        let mut snake = snake_facing_west();
        snake.apply_item_effect(ItemKind::Chili);

        for _ in 1..PIQUANCY_DURATION {
            assert_eq!(snake.tick_status(), StatusChange::None);
        }
        assert_eq!(snake.tick_status(), StatusChange::FireStarted);
        assert!(snake.is_breathing_fire());

        snake.set_fire_cells(vec![CellCoord::new(2, 1)]);
        let mut ticks_until_end = 0;
        while snake.tick_status() != StatusChange::FireEnded {
            ticks_until_end += 1;
            assert!(ticks_until_end < FIRE_DURATION, "fire never ended");
        }
        assert!(!snake.is_breathing_fire());
        assert!(snake.fire_cells().is_empty());
    }

    #[test]
    fn second_chili_never_shortens_the_countdown() {
        let mut snake = snake_facing_west();
        snake.apply_item_effect(ItemKind::Chili);
        for _ in 0..5 {
            let _ = snake.tick_status();
        }
        snake.apply_item_effect(ItemKind::Chili);
        assert_eq!(snake.snapshot().piquancy_ticks, PIQUANCY_DURATION);
    }

    #[test]
    fn snapshot_reflects_identity_and_score() {
        let mut snake = snake_facing_west();
        snake.add_score(ItemKind::Melon.score());
        let snapshot = snake.snapshot();
        assert_eq!(snapshot.id, snake.id());
        assert_eq!(snapshot.name, "Kokosnuss");
        assert_eq!(snapshot.score, 6);
        assert_eq!(snapshot.head(), Some(snake.head()));
    }
}
