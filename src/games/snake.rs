use std::collections::VecDeque;
use std::time::Duration;

use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use ratatui::prelude::*;

use crate::config::SnakeConfig;
use crate::games::{Entity, Game, GameId, GameState};
use crate::input::Input;
use crate::theme::Palette;
use crate::ui::{self, canvas::Canvas};

pub const FOOD_POINTS: u32 = 10;
const START_LENGTH: i32 = 3;
const START: Cell = Cell { x: 5, y: 5 };
const RANDOM_PLACEMENT_TRIES: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Grid snake. Walls and the snake's own body are fatal.
pub struct Snake {
    width: i32,
    height: i32,
    /// Head at the front.
    body: VecDeque<Cell>,
    direction: Direction,
    queued: Option<Direction>,
    food: Option<Cell>,
    score: u32,
    game_over: bool,
    step_every: Duration,
    elapsed: Duration,
    rng: StdRng,
}

impl Snake {
    pub fn new(config: &SnakeConfig, rng: StdRng) -> Self {
        let mut snake = Self {
            // Room for the starting body
            width: config.width.max(START.x + 1),
            height: config.height.max(START.y + 1),
            body: VecDeque::new(),
            direction: Direction::Right,
            queued: None,
            food: None,
            score: 0,
            game_over: false,
            step_every: Duration::from_millis(config.step_ms.max(1)),
            elapsed: Duration::ZERO,
            rng,
        };
        snake.reset();
        snake
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn body(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn step_interval(&self) -> Duration {
        self.step_every
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Move the food to `cell` for scripted setups. Rejects occupied or off-board cells.
    pub fn place_food_at(&mut self, cell: Cell) -> bool {
        if !self.in_bounds(cell) || self.body.contains(&cell) {
            return false;
        }
        self.food = Some(cell);
        true
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    /// Random retry until a free cell turns up, then a row-major scan so a
    /// crowded board still terminates. `None` means the board is full.
    fn free_cell(&mut self) -> Option<Cell> {
        for _ in 0..RANDOM_PLACEMENT_TRIES {
            let cell = Cell::new(
                self.rng.gen_range(0..self.width),
                self.rng.gen_range(0..self.height),
            );
            if !self.body.contains(&cell) {
                return Some(cell);
            }
        }
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Cell::new(x, y)))
            .find(|c| !self.body.contains(c))
    }

    /// One grid move in the current direction.
    pub fn step(&mut self) {
        if self.game_over {
            return;
        }
        if let Some(dir) = self.queued.take() {
            if dir != self.direction.opposite() {
                self.direction = dir;
            }
        }

        let next = self.head().step(self.direction);
        if !self.in_bounds(next) || self.body.contains(&next) {
            debug!("snake crashed at ({}, {}) with score {}", next.x, next.y, self.score);
            self.game_over = true;
            return;
        }

        self.body.push_front(next);
        if self.food == Some(next) {
            self.score += FOOD_POINTS;
            self.food = self.free_cell();
            if self.food.is_none() {
                // Nowhere left to grow
                self.game_over = true;
            }
        } else {
            self.body.pop_back();
        }
    }
}

impl Game for Snake {
    fn id(&self) -> GameId {
        GameId::Snake
    }

    fn reset(&mut self) {
        self.body = (0..START_LENGTH)
            .map(|i| Cell::new(START.x - i, START.y))
            .collect();
        self.direction = Direction::Right;
        self.queued = None;
        self.score = 0;
        self.game_over = false;
        self.elapsed = Duration::ZERO;
        self.food = self.free_cell();
    }

    fn handle_input(&mut self, input: Input) {
        let dir = match input {
            Input::Up => Direction::Up,
            Input::Down => Direction::Down,
            Input::Left => Direction::Left,
            Input::Right => Direction::Right,
            _ => return,
        };
        if dir != self.direction.opposite() {
            self.queued = Some(dir);
        }
    }

    fn update(&mut self, dt: Duration) {
        self.elapsed += dt;
        while self.elapsed >= self.step_every && !self.game_over {
            self.elapsed -= self.step_every;
            self.step();
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let layout = ui::game_layout(frame, area, " 🐍 Snake ", palette);

        ui::status_bar(
            frame,
            layout.status,
            &[
                (format!("Score: {}", self.score), palette.projectile.color()),
                (format!("Length: {}", self.len()), palette.player.color()),
            ],
            palette,
        );

        let mut canvas = Canvas::new(layout.field, self.width as f32, self.height as f32, palette);
        if let Some(food) = self.food {
            canvas.fill(food.x as f32, food.y as f32, 1.0, 1.0, '●', palette.obstacle.color());
        }
        for (i, cell) in self.body.iter().enumerate().rev() {
            let (ch, color) = if i == 0 {
                ('█', palette.accent1.color())
            } else {
                ('▓', palette.player.color())
            };
            canvas.fill(cell.x as f32, cell.y as f32, 1.0, 1.0, ch, color);
        }
        frame.render_widget(canvas.into_paragraph(), layout.field);

        ui::help_bar(
            frame,
            layout.help,
            &[("←↑↓→", "Steer"), ("P", "Pause"), ("R", "Restart"), ("Esc", "Menu")],
            palette,
        );
    }

    fn status(&self) -> GameState {
        if self.game_over {
            GameState::GameOver
        } else {
            GameState::Running
        }
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn entities(&self) -> Vec<Entity> {
        let (dx, dy) = self.direction.delta();
        let mut out: Vec<Entity> = self
            .body
            .iter()
            .map(|c| Entity::new(c.x as f32, c.y as f32, 1.0, 1.0).with_velocity(dx as f32, dy as f32))
            .collect();
        if let Some(food) = self.food {
            out.push(Entity::new(food.x as f32, food.y as f32, 1.0, 1.0));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn snake(width: i32, height: i32) -> Snake {
        let config = SnakeConfig {
            width,
            height,
            step_ms: 100,
        };
        Snake::new(&config, StdRng::seed_from_u64(9))
    }

    /// Park the food somewhere the test path never reaches.
    fn park_food(s: &mut Snake) {
        let (w, h) = s.size();
        assert!(s.place_food_at(Cell::new(w - 1, h - 1)));
    }

    fn tick(s: &mut Snake) {
        let dt = s.step_interval();
        s.update(dt);
    }

    #[test]
    fn starts_at_five_five_heading_right() {
        let s = snake(20, 20);
        assert_eq!(s.head(), Cell::new(5, 5));
        assert_eq!(s.len(), 3);
        assert_eq!(s.direction(), Direction::Right);
        assert_eq!(s.body().collect::<Vec<_>>(), [Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)]);
        let food = s.food().unwrap();
        assert!(!s.body().any(|c| c == food));
    }

    #[test]
    fn head_moves_one_unit_in_each_direction() {
        for (input, dir) in [
            (Input::Up, Direction::Up),
            (Input::Down, Direction::Down),
            (Input::Right, Direction::Right),
        ] {
            let mut s = snake(20, 20);
            park_food(&mut s);
            let before = s.head();
            s.handle_input(input);
            tick(&mut s);
            let (dx, dy) = dir.delta();
            assert_eq!(s.head(), Cell::new(before.x + dx, before.y + dy));
        }

        // Left needs a turn first since reversing is ignored
        let mut s = snake(20, 20);
        park_food(&mut s);
        s.handle_input(Input::Down);
        tick(&mut s);
        let before = s.head();
        s.handle_input(Input::Left);
        tick(&mut s);
        assert_eq!(s.head(), Cell::new(before.x - 1, before.y));
    }

    #[test]
    fn reversal_is_ignored() {
        let mut s = snake(20, 20);
        park_food(&mut s);
        s.handle_input(Input::Left);
        tick(&mut s);
        assert_eq!(s.head(), Cell::new(6, 5));
        assert_eq!(s.status(), GameState::Running);
    }

    #[test]
    fn input_does_not_move_the_world() {
        let mut s = snake(20, 20);
        let before = s.entities();
        s.handle_input(Input::Down);
        assert_eq!(s.head(), Cell::new(5, 5));
        assert_eq!(s.entities().len(), before.len());
        assert_eq!(s.entities()[0].pos, before[0].pos);
    }

    #[test]
    fn partial_interval_does_not_step() {
        let mut s = snake(20, 20);
        park_food(&mut s);
        s.update(Duration::from_millis(60));
        assert_eq!(s.head(), Cell::new(5, 5));
        s.update(Duration::from_millis(40));
        assert_eq!(s.head(), Cell::new(6, 5));
        s.update(Duration::from_millis(200));
        assert_eq!(s.head(), Cell::new(8, 5));
    }

    #[test]
    fn wall_scenario() {
        // Width 9 puts the wall just past x = 8
        let mut s = snake(9, 12);
        assert!(s.place_food_at(Cell::new(0, 11)));
        for _ in 0..3 {
            tick(&mut s);
        }
        assert_eq!(s.head(), Cell::new(8, 5));
        assert_eq!(s.status(), GameState::Running);
        let score_before = s.score();

        tick(&mut s);
        assert_eq!(s.status(), GameState::GameOver);
        assert_eq!(s.score(), score_before);
    }

    #[test]
    fn eating_grows_by_one_and_scores() {
        let mut s = snake(20, 20);
        assert!(s.place_food_at(Cell::new(6, 5)));
        let len = s.len();
        tick(&mut s);
        assert_eq!(s.score(), FOOD_POINTS);
        assert_eq!(s.len(), len + 1);
        let food = s.food().unwrap();
        assert!(!s.body().any(|c| c == food));

        assert!(s.place_food_at(Cell::new(7, 5)));
        tick(&mut s);
        assert_eq!(s.score(), 2 * FOOD_POINTS);
        assert_eq!(s.len(), len + 2);
    }

    #[test]
    fn self_collision_ends_the_run() {
        let mut s = snake(20, 20);
        // Grow to length 5 so a tight loop bites the body
        assert!(s.place_food_at(Cell::new(6, 5)));
        tick(&mut s);
        assert!(s.place_food_at(Cell::new(7, 5)));
        tick(&mut s);
        park_food(&mut s);
        for input in [Input::Down, Input::Left, Input::Up] {
            s.handle_input(input);
            tick(&mut s);
        }
        assert_eq!(s.status(), GameState::GameOver);
        assert_eq!(s.score(), 2 * FOOD_POINTS);
    }

    #[test]
    fn no_updates_after_game_over() {
        let mut s = snake(8, 8);
        park_food(&mut s);
        for _ in 0..10 {
            tick(&mut s);
        }
        assert_eq!(s.status(), GameState::GameOver);
        let head = s.head();
        tick(&mut s);
        assert_eq!(s.head(), head);
    }

    #[test]
    fn food_is_rejected_on_body_or_off_board() {
        let mut s = snake(10, 10);
        assert!(!s.place_food_at(Cell::new(4, 5)));
        assert!(!s.place_food_at(Cell::new(10, 0)));
        assert!(!s.place_food_at(Cell::new(-1, 3)));
    }

    #[test]
    fn reset_restores_start_state() {
        let mut s = snake(20, 20);
        assert!(s.place_food_at(Cell::new(6, 5)));
        tick(&mut s);
        s.reset();
        assert_eq!(s.score(), 0);
        assert_eq!(s.len(), 3);
        assert_eq!(s.head(), Cell::new(5, 5));
        assert_eq!(s.status(), GameState::Running);
    }

    #[test]
    fn same_seed_same_food() {
        let a = snake(30, 20);
        let b = snake(30, 20);
        assert_eq!(a.food(), b.food());
    }

    #[test]
    fn undersized_board_still_fits_the_snake() {
        for (w, h) in [(0, 0), (-3, 10), (4, 2)] {
            let s = snake(w, h);
            let (width, height) = s.size();
            assert!(width >= 6 && height >= 6, "{w}x{h} gave {width}x{height}");
            assert!(s.body().all(|c| (0..width).contains(&c.x) && (0..height).contains(&c.y)));
            assert!(s.food().is_some());
            assert_eq!(s.status(), GameState::Running);
        }
    }
}
