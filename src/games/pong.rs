use std::time::Duration;

use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use ratatui::prelude::*;
use serde::Deserialize;

use crate::config::PongConfig;
use crate::games::{Entity, Game, GameId, GameState, Vec2};
use crate::input::Input;
use crate::theme::Palette;
use crate::ui::{self, canvas::Canvas};

const FIELD_W: f32 = 60.0;
const FIELD_H: f32 = 24.0;
const PADDLE_W: f32 = 1.0;
const PADDLE_H: f32 = 5.0;
const PADDLE_MARGIN: f32 = 2.0;
/// Cells moved per key press.
const PADDLE_STEP: f32 = 2.0;
/// AI paddle top speed in cells per second, before the difficulty factor.
const AI_SPEED: f32 = 24.0;
const BALL_SIZE: f32 = 1.0;
const BALL_SPEED_X: f32 = 24.0;
const BALL_SPEED_Y: f32 = 12.0;
const MAX_BALL_SPEED_X: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    fn reaction(self) -> f32 {
        match self {
            Difficulty::Easy => 0.3,
            Difficulty::Medium => 0.6,
            Difficulty::Hard => 0.9,
        }
    }

    /// Max aiming error in cells.
    fn jitter(self) -> f32 {
        match self {
            Difficulty::Easy => 2.0,
            Difficulty::Medium => 0.8,
            Difficulty::Hard => 0.2,
        }
    }
}

/// Player (left) against a ball-tracking AI (right).
pub struct Pong {
    player: Entity,
    ai: Entity,
    ball: Entity,
    player_points: u32,
    ai_points: u32,
    winning_score: u32,
    difficulty: Difficulty,
    nudge: f32,
    rng: StdRng,
}

impl Pong {
    pub fn new(config: &PongConfig, rng: StdRng) -> Self {
        let mut pong = Self {
            player: Self::paddle(PADDLE_MARGIN),
            ai: Self::paddle(FIELD_W - PADDLE_MARGIN - PADDLE_W),
            ball: Entity::new(0.0, 0.0, BALL_SIZE, BALL_SIZE),
            player_points: 0,
            ai_points: 0,
            winning_score: config.winning_score.max(1),
            difficulty: config.difficulty,
            nudge: 0.0,
            rng,
        };
        pong.serve();
        pong
    }

    fn paddle(x: f32) -> Entity {
        Entity::new(x, (FIELD_H - PADDLE_H) / 2.0, PADDLE_W, PADDLE_H)
    }

    fn serve(&mut self) {
        self.ball.set_center(Vec2::new(FIELD_W / 2.0, FIELD_H / 2.0));
        let sx = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let sy = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        self.ball.vel = Vec2::new(sx * BALL_SPEED_X, sy * BALL_SPEED_Y);
    }

    pub fn points(&self) -> (u32, u32) {
        (self.player_points, self.ai_points)
    }

    fn is_over(&self) -> bool {
        self.player_points >= self.winning_score || self.ai_points >= self.winning_score
    }

    fn move_ai(&mut self, dt: f32) {
        let jitter = self.difficulty.jitter();
        let target = self.ball.center().y + self.rng.gen_range(-jitter..=jitter);
        let gap = target - self.ai.center().y;
        let max_move = AI_SPEED * self.difficulty.reaction() * dt;
        self.ai.pos.y += gap.clamp(-max_move, max_move);
        self.ai.clamp_y(0.0, FIELD_H);
    }

    fn bounce_off(ball: &mut Entity, paddle: &Entity) {
        let relative = (ball.center().y - paddle.center().y) / (PADDLE_H / 2.0);
        ball.vel.x = -ball.vel.x;
        ball.vel.y = relative.clamp(-1.0, 1.0) * BALL_SPEED_Y;
        if ball.vel.x.abs() < MAX_BALL_SPEED_X {
            ball.vel.x = (ball.vel.x * 1.1).clamp(-MAX_BALL_SPEED_X, MAX_BALL_SPEED_X);
        }
        // Push out so the next step cannot hit the same paddle again
        if ball.vel.x > 0.0 {
            ball.pos.x = paddle.right();
        } else {
            ball.pos.x = paddle.left() - ball.size.x;
        }
    }
}

impl Game for Pong {
    fn id(&self) -> GameId {
        GameId::Pong
    }

    fn reset(&mut self) {
        self.player = Self::paddle(PADDLE_MARGIN);
        self.ai = Self::paddle(FIELD_W - PADDLE_MARGIN - PADDLE_W);
        self.player_points = 0;
        self.ai_points = 0;
        self.nudge = 0.0;
        self.serve();
    }

    fn handle_input(&mut self, input: Input) {
        match input {
            Input::Up => self.nudge -= PADDLE_STEP,
            Input::Down => self.nudge += PADDLE_STEP,
            _ => {}
        }
    }

    fn update(&mut self, dt: Duration) {
        if self.is_over() {
            return;
        }
        let dt = dt.as_secs_f32();

        self.player.pos.y += self.nudge;
        self.nudge = 0.0;
        self.player.clamp_y(0.0, FIELD_H);
        self.move_ai(dt);

        self.ball.advance(dt);
        if self.ball.top() <= 0.0 {
            self.ball.pos.y = 0.0;
            self.ball.vel.y = self.ball.vel.y.abs();
        }
        if self.ball.bottom() >= FIELD_H {
            self.ball.pos.y = FIELD_H - self.ball.size.y;
            self.ball.vel.y = -self.ball.vel.y.abs();
        }

        if self.ball.left() <= 0.0 {
            self.ai_points += 1;
            debug!("pong: ai scores ({}-{})", self.player_points, self.ai_points);
            self.serve();
            return;
        }
        if self.ball.right() >= FIELD_W {
            self.player_points += 1;
            debug!("pong: player scores ({}-{})", self.player_points, self.ai_points);
            self.serve();
            return;
        }

        if self.ball.vel.x < 0.0 && self.ball.intersects(&self.player) {
            Self::bounce_off(&mut self.ball, &self.player);
        } else if self.ball.vel.x > 0.0 && self.ball.intersects(&self.ai) {
            Self::bounce_off(&mut self.ball, &self.ai);
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let layout = ui::game_layout(frame, area, " 🏓 Pong ", palette);

        ui::status_bar(
            frame,
            layout.status,
            &[
                (format!("You: {}", self.player_points), palette.player.color()),
                (format!("CPU: {}", self.ai_points), palette.opponent.color()),
                (format!("First to {}", self.winning_score), palette.text.color()),
            ],
            palette,
        );

        let mut canvas = Canvas::new(layout.field, FIELD_W, FIELD_H, palette);
        let mut y = 0.0;
        while y < FIELD_H {
            canvas.put(FIELD_W / 2.0, y, '┆', palette.muted());
            y += 1.0;
        }
        for (paddle, color) in [(&self.player, palette.player), (&self.ai, palette.opponent)] {
            canvas.fill(paddle.pos.x, paddle.pos.y, paddle.size.x, paddle.size.y, '█', color.color());
        }
        canvas.fill(self.ball.pos.x, self.ball.pos.y, BALL_SIZE, BALL_SIZE, '●', palette.projectile.color());
        frame.render_widget(canvas.into_paragraph(), layout.field);

        ui::help_bar(
            frame,
            layout.help,
            &[("↑↓", "Move paddle"), ("P", "Pause"), ("R", "Restart"), ("Esc", "Menu")],
            palette,
        );
    }

    fn status(&self) -> GameState {
        if self.is_over() {
            GameState::GameOver
        } else {
            GameState::Running
        }
    }

    fn score(&self) -> u32 {
        self.player_points
    }

    fn entities(&self) -> Vec<Entity> {
        vec![self.player, self.ai, self.ball]
    }
}
