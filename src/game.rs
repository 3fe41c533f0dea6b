use std::collections::HashSet;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Rules;
use crate::entity::Entity;
use crate::error::Result;
use crate::input::Direction;
use crate::snake::{Cell, Snake};
use crate::spawn::{spawn_cell, SpawnError};

/// Segments nearest the head (head included) that never count as a self-hit.
///
/// A head cannot land on segments 1..=3 without reversing, so the shortest
/// snake able to bite itself has five segments.
pub const SELF_COLLISION_SKIP: usize = 4;

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// What ended the last game.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameOverReason {
    StoneCollision,
    SelfCollision,
    /// The apple had nowhere left to respawn.
    BoardFull,
}

/// Complete mutable game state for one session.
///
/// Entity fields are public so scenarios can be staged directly; score and
/// status only change through [`GameState::advance_tick`] and
/// [`GameState::restart`].
#[derive(Debug, Clone)]
pub struct GameState<R = StdRng> {
    pub snake: Snake,
    pub apple: Cell,
    pub stones: Vec<Cell>,
    pub gold_apples: Vec<Cell>,
    score: u32,
    status: GameStatus,
    game_over_reason: Option<GameOverReason>,
    last_freed: Option<Cell>,
    tick_count: u64,
    rules: Rules,
    rng: R,
}

impl GameState<StdRng> {
    /// Creates a session seeded from OS entropy.
    pub fn new(rules: Rules) -> Result<Self> {
        Self::with_rng(rules, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible runs.
    pub fn new_with_seed(rules: Rules, seed: u64) -> Result<Self> {
        Self::with_rng(rules, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameState<R> {
    /// Creates a session driven by `rng`.
    ///
    /// Fails when the rules do not describe a playable board.
    pub fn with_rng(rules: Rules, mut rng: R) -> Result<Self> {
        rules.validate()?;

        let world = World::fresh(&rules, &mut rng)?;
        Ok(Self {
            snake: world.snake,
            apple: world.apple,
            stones: world.stones,
            gold_apples: Vec::new(),
            score: 0,
            status: GameStatus::Playing,
            game_over_reason: None,
            last_freed: None,
            tick_count: 0,
            rules,
            rng,
        })
    }

    /// Advances simulation by one gameplay tick.
    pub fn advance_tick(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }

        self.tick_count += 1;
        self.last_freed = self.snake.advance(self.rules.grid);

        let head = self.snake.head();
        if head == self.apple && !self.eat_apple() {
            return;
        }

        self.collect_gold_apples(head);

        if self.stones.contains(&head) {
            self.end_game(GameOverReason::StoneCollision);
        } else if self.snake.head_hits_body(SELF_COLLISION_SKIP) {
            self.end_game(GameOverReason::SelfCollision);
        }
    }

    /// Buffers a turn. Returns `false` when the turn was ignored, either
    /// because it reverses the snake or because the game is over.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }

        self.snake.request_direction(direction)
    }

    /// Starts a fresh game after a game over. Does nothing while playing.
    pub fn restart(&mut self) -> std::result::Result<(), SpawnError> {
        if self.status != GameStatus::GameOver {
            return Ok(());
        }

        let world = World::fresh(&self.rules, &mut self.rng)?;
        self.snake = world.snake;
        self.apple = world.apple;
        self.stones = world.stones;
        self.gold_apples.clear();
        self.score = 0;
        self.status = GameStatus::Playing;
        self.game_over_reason = None;
        self.last_freed = None;
        self.tick_count = 0;

        info!(
            "game restarted heading {:?}, apple at {:?}",
            self.snake.direction(),
            self.apple
        );
        Ok(())
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn apple(&self) -> Cell {
        self.apple
    }

    #[must_use]
    pub fn stones(&self) -> &[Cell] {
        &self.stones
    }

    #[must_use]
    pub fn gold_apples(&self) -> &[Cell] {
        &self.gold_apples
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    /// Tail cell released by the last tick, for renderers that erase incrementally.
    #[must_use]
    pub fn last_freed(&self) -> Option<Cell> {
        self.last_freed
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Board entities in draw order: apple, snake, stones, gold apples.
    pub fn entities(&self) -> impl Iterator<Item = Entity<'_>> {
        [Entity::Apple(self.apple), Entity::Snake(&self.snake)]
            .into_iter()
            .chain(self.stones.iter().map(|cell| Entity::Stone(*cell)))
            .chain(self.gold_apples.iter().map(|cell| Entity::GoldApple(*cell)))
    }

    /// Grows the snake, scores and respawns the apple, then runs the
    /// score-threshold spawns. Returns `false` if the game ended.
    fn eat_apple(&mut self) -> bool {
        self.snake.grow(self.rules.growth_per_apple);
        self.score += self.rules.score_per_apple;

        let occupied = self.occupied_cells();
        match spawn_cell(&mut self.rng, self.rules.grid, &occupied) {
            Ok(cell) => self.apple = cell,
            Err(error) => {
                warn!("apple cannot respawn: {error}");
                self.end_game(GameOverReason::BoardFull);
                return false;
            }
        }

        if self.score % self.rules.stone_interval == 0 {
            let occupied = self.occupied_cells();
            match spawn_cell(&mut self.rng, self.rules.grid, &occupied) {
                Ok(cell) => {
                    debug!("stone spawned at {cell:?} (score {})", self.score);
                    self.stones.push(cell);
                }
                Err(error) => warn!("stone skipped: {error}"),
            }
        }

        if self.score % self.rules.gold_apple_interval == 0 {
            let occupied = self.occupied_cells();
            match spawn_cell(&mut self.rng, self.rules.grid, &occupied) {
                Ok(cell) => {
                    debug!("gold apple spawned at {cell:?} (score {})", self.score);
                    self.gold_apples.push(cell);
                }
                Err(error) => warn!("gold apple skipped: {error}"),
            }
        }

        true
    }

    /// Any gold apple under the head scores, vanishes and wipes every stone.
    fn collect_gold_apples(&mut self, head: Cell) {
        let before = self.gold_apples.len();
        self.gold_apples.retain(|cell| *cell != head);
        let collected = before - self.gold_apples.len();
        if collected == 0 {
            return;
        }

        self.score += self.rules.score_per_gold_apple * collected as u32;
        debug!("gold apple collected, clearing {} stones", self.stones.len());
        self.stones.clear();
    }

    fn end_game(&mut self, reason: GameOverReason) {
        self.status = GameStatus::GameOver;
        self.game_over_reason = Some(reason);
        info!(
            "game over after {} ticks: {reason:?}, score {}, length {}",
            self.tick_count,
            self.score,
            self.snake.len()
        );
    }

    fn occupied_cells(&self) -> HashSet<Cell> {
        self.snake
            .segments()
            .copied()
            .chain(std::iter::once(self.apple))
            .chain(self.stones.iter().copied())
            .chain(self.gold_apples.iter().copied())
            .collect()
    }
}

/// Entities laid out for a brand-new game.
struct World {
    snake: Snake,
    apple: Cell,
    stones: Vec<Cell>,
}

impl World {
    /// Single-segment snake in the center with a random heading, one apple and
    /// one stone on free cells.
    fn fresh<R: Rng + ?Sized>(
        rules: &Rules,
        rng: &mut R,
    ) -> std::result::Result<Self, SpawnError> {
        let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        let snake = Snake::new(Cell::center_of(rules.grid), direction);

        let mut occupied: HashSet<Cell> = snake.segments().copied().collect();
        let apple = spawn_cell(rng, rules.grid, &occupied)?;
        occupied.insert(apple);
        let stone = spawn_cell(rng, rules.grid, &occupied)?;

        Ok(Self {
            snake,
            apple,
            stones: vec![stone],
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::config::{ConfigError, Rules};
    use crate::entity::Entity;
    use crate::error::Error;
    use crate::input::Direction;
    use crate::snake::{Cell, Snake};

    use super::{GameOverReason, GameState, GameStatus};

    /// Default board with the stone moved out of the way of row 5.
    fn staged(seed: u64) -> GameState {
        let mut state =
            GameState::new_with_seed(Rules::default(), seed).expect("default rules are valid");
        state.snake = Snake::new(Cell::new(5, 5), Direction::Right);
        state.apple = Cell::new(20, 20);
        state.stones = vec![Cell::new(0, 20)];
        state.gold_apples.clear();
        state
    }

    fn assert_disjoint_from_snake_and_apple(state: &GameState, cell: Cell) {
        assert!(!state.snake.occupies(cell));
        assert_ne!(cell, state.apple);
    }

    #[test]
    fn new_game_starts_clean() {
        let state = GameState::new_with_seed(Rules::default(), 1).expect("valid rules");

        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.score(), 0);
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.snake().head(), Cell::new(16, 12));
        assert_eq!(state.stones().len(), 1);
        assert!(state.gold_apples().is_empty());
        assert_disjoint_from_snake_and_apple(&state, state.stones()[0]);
        assert!(!state.snake().occupies(state.apple()));
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let a = GameState::new_with_seed(Rules::default(), 99).expect("valid rules");
        let b = GameState::new_with_seed(Rules::default(), 99).expect("valid rules");

        assert_eq!(a.apple(), b.apple());
        assert_eq!(a.stones(), b.stones());
        assert_eq!(a.snake().direction(), b.snake().direction());
    }

    #[test]
    fn invalid_rules_are_rejected() {
        let rules = Rules {
            stone_interval: 0,
            ..Rules::default()
        };

        assert!(GameState::new_with_seed(rules, 1).is_err());
    }

    #[test]
    fn snake_grows_after_eating_apple() {
        let mut state = staged(1);
        state.apple = Cell::new(6, 5);

        state.advance_tick();
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.target_length(), 2);
        assert_eq!(state.score(), 1);

        state.advance_tick();
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.last_freed(), None);

        state.advance_tick();
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.last_freed(), Some(Cell::new(6, 5)));
    }

    #[test]
    fn respawned_apple_avoids_snake() {
        for seed in 0..50 {
            let mut state = staged(seed);
            state.snake = Snake::from_segments(
                (0..6).map(|x| Cell::new(5 - x, 5)).collect(),
                Direction::Right,
            );
            state.apple = Cell::new(6, 5);

            state.advance_tick();

            assert_eq!(state.score(), 1);
            assert!(!state.snake.occupies(state.apple()));
            assert!(!state.stones().contains(&state.apple()));
        }
    }

    #[test]
    fn score_five_spawns_one_stone() {
        let mut state = staged(2);
        state.score = 4;
        state.apple = Cell::new(6, 5);

        state.advance_tick();

        assert_eq!(state.score(), 5);
        assert_eq!(state.stones().len(), 2);
        assert!(state.gold_apples().is_empty());
        assert_disjoint_from_snake_and_apple(&state, state.stones()[1]);
    }

    #[test]
    fn score_ten_spawns_stone_and_gold_apple() {
        let mut state = staged(3);
        state.score = 9;
        state.apple = Cell::new(6, 5);

        state.advance_tick();

        assert_eq!(state.score(), 10);
        assert_eq!(state.stones().len(), 2);
        assert_eq!(state.gold_apples().len(), 1);
        let gold = state.gold_apples()[0];
        assert_disjoint_from_snake_and_apple(&state, gold);
        assert!(!state.stones().contains(&gold));
    }

    #[test]
    fn score_twenty_fires_both_rules_again() {
        let mut state = staged(4);
        state.score = 19;
        state.gold_apples = vec![Cell::new(10, 10)];
        state.apple = Cell::new(6, 5);

        state.advance_tick();

        assert_eq!(state.score(), 20);
        assert_eq!(state.stones().len(), 2);
        assert_eq!(state.gold_apples().len(), 2);
    }

    #[test]
    fn non_threshold_score_spawns_nothing() {
        let mut state = staged(5);
        state.score = 5;
        state.apple = Cell::new(6, 5);

        state.advance_tick();

        assert_eq!(state.score(), 6);
        assert_eq!(state.stones().len(), 1);
        assert!(state.gold_apples().is_empty());
    }

    #[test]
    fn gold_apple_scores_three_and_clears_all_stones() {
        let mut state = staged(6);
        state.score = 7;
        state.gold_apples = vec![Cell::new(6, 5), Cell::new(12, 12)];
        state.stones = vec![Cell::new(0, 0), Cell::new(1, 1), Cell::new(2, 2)];

        state.advance_tick();

        assert_eq!(state.score(), 10);
        assert!(state.stones().is_empty());
        assert_eq!(state.gold_apples(), &[Cell::new(12, 12)]);
        assert_eq!(state.status(), GameStatus::Playing);
    }

    #[test]
    fn stone_collision_sets_game_over() {
        let mut state = staged(7);
        state.stones = vec![Cell::new(6, 5)];

        state.advance_tick();

        assert_eq!(state.status(), GameStatus::GameOver);
        assert_eq!(
            state.game_over_reason(),
            Some(GameOverReason::StoneCollision)
        );
    }

    #[test]
    fn snake_collision_with_self_sets_game_over() {
        let mut state = staged(8);
        state.snake = Snake::from_segments(
            vec![
                Cell::new(2, 1),
                Cell::new(2, 2),
                Cell::new(1, 2),
                Cell::new(1, 1),
                Cell::new(1, 0),
            ],
            Direction::Left,
        );

        state.advance_tick();

        assert_eq!(state.snake.head(), Cell::new(1, 1));
        assert_eq!(state.status(), GameStatus::GameOver);
        assert_eq!(
            state.game_over_reason(),
            Some(GameOverReason::SelfCollision)
        );
    }

    #[test]
    fn head_may_follow_the_retreating_tail() {
        let mut state = staged(9);
        state.snake = Snake::from_segments(
            vec![
                Cell::new(2, 1),
                Cell::new(2, 2),
                Cell::new(1, 2),
                Cell::new(1, 1),
            ],
            Direction::Left,
        );

        state.advance_tick();

        assert_eq!(state.snake.head(), Cell::new(1, 1));
        assert_eq!(state.status(), GameStatus::Playing);
    }

    #[test]
    fn straight_snake_wrapping_left_does_not_collide() {
        let mut state = staged(10);
        state.snake = Snake::from_segments(
            (0..5).map(|x| Cell::new(x, 0)).collect(),
            Direction::Left,
        );

        state.advance_tick();

        assert_eq!(state.snake.head(), Cell::new(31, 0));
        assert_eq!(state.snake.len(), 5);
        assert_eq!(state.last_freed(), Some(Cell::new(4, 0)));
        assert_eq!(state.status(), GameStatus::Playing);
    }

    #[test]
    fn game_over_freezes_state_and_ignores_turns() {
        let mut state = staged(11);
        state.stones = vec![Cell::new(6, 5)];
        state.advance_tick();
        let head = state.snake.head();

        assert!(!state.request_direction(Direction::Up));
        state.advance_tick();

        assert_eq!(state.snake.head(), head);
        assert_eq!(state.tick_count(), 1);
    }

    #[test]
    fn reverse_request_leaves_state_unchanged() {
        let mut state = staged(12);

        assert!(!state.request_direction(Direction::Left));
        assert_eq!(state.snake.next_direction(), None);

        state.advance_tick();
        assert_eq!(state.snake.head(), Cell::new(6, 5));
    }

    #[test]
    fn restart_performs_full_reset() {
        let mut state = staged(13);
        state.score = 12;
        state.gold_apples = vec![Cell::new(3, 3)];
        state.stones = vec![Cell::new(6, 5), Cell::new(9, 9)];
        state.advance_tick();
        assert_eq!(state.status(), GameStatus::GameOver);

        state.restart().expect("board has room");

        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.game_over_reason(), None);
        assert_eq!(state.score(), 0);
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.snake().target_length(), 1);
        assert_eq!(state.snake().head(), Cell::new(16, 12));
        assert_eq!(state.stones().len(), 1);
        assert!(state.gold_apples().is_empty());
        assert!(!state.snake().occupies(state.apple()));
        assert_disjoint_from_snake_and_apple(&state, state.stones()[0]);
    }

    #[test]
    fn restart_while_playing_is_a_no_op() {
        let mut state = staged(14);
        state.score = 3;

        state.restart().expect("restart while playing cannot fail");

        assert_eq!(state.score(), 3);
        assert_eq!(state.snake.head(), Cell::new(5, 5));
    }

    #[test]
    fn apple_with_no_room_ends_game_as_board_full() {
        let mut state =
            GameState::new_with_seed(Rules::with_grid(4, 4), 15).expect("4x4 board is valid");
        state.snake =
            Snake::from_segments(vec![Cell::new(1, 0), Cell::new(0, 0)], Direction::Right);
        state.snake.grow(1);
        state.apple = Cell::new(2, 0);
        state.stones = (0..4)
            .flat_map(|y| (0..4).map(move |x| Cell::new(x, y)))
            .filter(|cell| cell.y > 0 || cell.x == 3)
            .collect();
        state.gold_apples.clear();

        state.advance_tick();

        assert_eq!(state.snake().len(), 3);
        assert_eq!(state.score(), 1);
        assert_eq!(state.status(), GameStatus::GameOver);
        assert_eq!(state.game_over_reason(), Some(GameOverReason::BoardFull));
    }

    #[test]
    fn narrow_board_cannot_start_a_game() {
        let rules = Rules::with_grid(2, 3);

        assert!(matches!(
            GameState::new_with_seed(rules, 17),
            Err(Error::Config(ConfigError::GridTooSmall {
                width: 2,
                height: 3
            }))
        ));
    }

    #[test]
    fn entities_are_listed_in_draw_order() {
        let mut state = staged(16);
        state.gold_apples = vec![Cell::new(7, 7)];

        let tags: Vec<&str> = state
            .entities()
            .map(|entity| match entity {
                Entity::Apple(_) => "apple",
                Entity::Snake(_) => "snake",
                Entity::Stone(_) => "stone",
                Entity::GoldApple(_) => "gold",
            })
            .collect();

        assert_eq!(tags, vec!["apple", "snake", "stone", "gold"]);
    }

    #[test]
    fn body_length_tracks_target_while_moving() {
        let mut state = staged(17);
        state.snake.grow(3);
        let mut previous = state.snake.len();

        for _ in 0..10 {
            state.advance_tick();
            let expected = state.snake.target_length().min(previous + 1);
            assert_eq!(state.snake.len(), expected);
            previous = state.snake.len();
        }

        let cells: HashSet<Cell> = state.snake.segments().copied().collect();
        assert_eq!(cells.len(), 4);
    }
}
