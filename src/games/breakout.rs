use std::time::Duration;

use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use ratatui::prelude::*;

use crate::games::{Entity, Game, GameId, GameState, Vec2};
use crate::input::Input;
use crate::theme::Palette;
use crate::ui::{self, canvas::Canvas};

const FIELD_W: f32 = 60.0;
const FIELD_H: f32 = 28.0;
const BRICK_ROWS: usize = 6;
const BRICK_COLS: usize = 10;
const BRICK_H: f32 = 1.0;
const BRICK_GAP: f32 = 0.5;
const BRICK_TOP: f32 = 2.0;
/// Rows above this index take two hits.
const TOUGH_ROWS: usize = 2;
const PADDLE_W: f32 = 10.0;
const PADDLE_MIN_W: f32 = 4.0;
const PADDLE_MAX_W: f32 = 20.0;
const PADDLE_RESIZE: f32 = 2.0;
const PADDLE_Y: f32 = FIELD_H - 3.0;
const PADDLE_STEP: f32 = 3.0;
const BALL_SIZE: f32 = 1.0;
/// Cells per second.
const BALL_SPEED: f32 = 18.0;
const BALL_SPEEDUP: f32 = 0.15;
const LEVEL_SPEED_CAP_STEP: f32 = 3.0;
const BASE_SPEED_CAP: f32 = 30.0;
const POWERUP_CHANCE: f64 = 0.15;
const POWERUP_FALL: f32 = 8.0;
const START_LIVES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PowerKind {
    Expand,
    Shrink,
    ExtraLife,
}

impl PowerKind {
    fn glyph(self) -> char {
        match self {
            PowerKind::Expand => 'E',
            PowerKind::Shrink => 'S',
            PowerKind::ExtraLife => '♥',
        }
    }
}

#[derive(Debug, Clone)]
struct PowerUp {
    body: Entity,
    kind: PowerKind,
}

#[derive(Debug, Clone)]
struct Brick {
    body: Entity,
    hits_left: u32,
    points: u32,
    row: usize,
}

pub struct Breakout {
    paddle: Entity,
    ball: Entity,
    bricks: Vec<Brick>,
    powerups: Vec<PowerUp>,
    speed: f32,
    speed_cap: f32,
    score: u32,
    lives: u32,
    level: u32,
    launched: bool,
    launch_requested: bool,
    nudge: f32,
    game_over: bool,
    rng: StdRng,
}

impl Breakout {
    pub fn new(rng: StdRng) -> Self {
        let mut b = Self {
            paddle: Entity::new((FIELD_W - PADDLE_W) / 2.0, PADDLE_Y, PADDLE_W, 1.0),
            ball: Entity::new(0.0, 0.0, BALL_SIZE, BALL_SIZE),
            bricks: Vec::new(),
            powerups: Vec::new(),
            speed: BALL_SPEED,
            speed_cap: BASE_SPEED_CAP,
            score: 0,
            lives: START_LIVES,
            level: 1,
            launched: false,
            launch_requested: false,
            nudge: 0.0,
            game_over: false,
            rng,
        };
        b.reset();
        b
    }

    fn build_bricks() -> Vec<Brick> {
        let brick_w = (FIELD_W - BRICK_GAP * (BRICK_COLS as f32 + 1.0)) / BRICK_COLS as f32;
        let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                let x = BRICK_GAP + col as f32 * (brick_w + BRICK_GAP);
                let y = BRICK_TOP + row as f32 * (BRICK_H + BRICK_GAP);
                bricks.push(Brick {
                    body: Entity::new(x, y, brick_w, BRICK_H),
                    hits_left: if row < TOUGH_ROWS { 2 } else { 1 },
                    points: (BRICK_ROWS - row) as u32 * 10,
                    row,
                });
            }
        }
        bricks
    }

    fn attach_ball(&mut self) {
        self.launched = false;
        self.ball.vel = Vec2::ZERO;
        self.stick_ball();
    }

    fn stick_ball(&mut self) {
        let c = self.paddle.center();
        self.ball.pos = Vec2::new(c.x - BALL_SIZE / 2.0, self.paddle.top() - BALL_SIZE);
    }

    fn set_paddle_width(&mut self, w: f32) {
        let c = self.paddle.center();
        self.paddle.size.x = w.clamp(PADDLE_MIN_W, PADDLE_MAX_W);
        self.paddle.set_center(c);
        self.paddle.clamp_x(0.0, FIELD_W);
    }

    fn scale_ball_speed(&mut self, new_speed: f32) {
        let factor = new_speed / self.speed;
        self.speed = new_speed;
        self.ball.vel = self.ball.vel * factor;
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.game_over = true;
            debug!("breakout: out of lives at level {} with {}", self.level, self.score);
        } else {
            self.attach_ball();
        }
    }

    fn next_level(&mut self) {
        self.level += 1;
        self.score += self.level * 100;
        self.speed_cap += LEVEL_SPEED_CAP_STEP;
        self.speed = (BALL_SPEED + (self.level - 1) as f32).min(self.speed_cap);
        self.bricks = Self::build_bricks();
        self.powerups.clear();
        self.set_paddle_width(PADDLE_W);
        self.attach_ball();
        debug!("breakout: level {} reached", self.level);
    }

    fn bounce_off_paddle(&mut self) {
        let relative = ((self.ball.center().x - self.paddle.center().x) / (self.paddle.size.x / 2.0)).clamp(-1.0, 1.0);
        self.ball.vel.x = relative * self.speed;
        // Keep enough vertical speed that the ball never skims sideways
        self.ball.vel.y = -(self.speed * self.speed - self.ball.vel.x * self.ball.vel.x)
            .max(self.speed * self.speed * 0.25)
            .sqrt();
        self.ball.pos.y = self.paddle.top() - BALL_SIZE;
    }

    fn hit_brick(&mut self) {
        let Some(idx) = self.bricks.iter().position(|b| b.body.intersects(&self.ball)) else {
            return;
        };
        let brick = &mut self.bricks[idx];
        let d = self.ball.center() - brick.body.center();
        if d.x.abs() / brick.body.size.x > d.y.abs() / brick.body.size.y {
            self.ball.vel.x = -self.ball.vel.x;
        } else {
            self.ball.vel.y = -self.ball.vel.y;
        }

        brick.hits_left -= 1;
        if brick.hits_left > 0 {
            return;
        }
        let broken = self.bricks.remove(idx);
        self.score += broken.points;
        if self.rng.gen_bool(POWERUP_CHANCE) {
            let kind = match self.rng.gen_range(0..3) {
                0 => PowerKind::Expand,
                1 => PowerKind::Shrink,
                _ => PowerKind::ExtraLife,
            };
            let c = broken.body.center();
            let mut body = Entity::new(0.0, 0.0, 2.0, 1.0).with_velocity(0.0, POWERUP_FALL);
            body.set_center(c);
            self.powerups.push(PowerUp { body, kind });
        }
        let faster = (self.speed + BALL_SPEEDUP).min(self.speed_cap);
        self.scale_ball_speed(faster);
    }

    fn update_powerups(&mut self, dt: f32) {
        let mut caught = Vec::new();
        let paddle = self.paddle;
        self.powerups.retain_mut(|p| {
            p.body.advance(dt);
            if p.body.intersects(&paddle) {
                caught.push(p.kind);
                return false;
            }
            p.body.top() < FIELD_H
        });
        for kind in caught {
            match kind {
                PowerKind::Expand => self.set_paddle_width(self.paddle.size.x + PADDLE_RESIZE),
                PowerKind::Shrink => self.set_paddle_width(self.paddle.size.x - PADDLE_RESIZE),
                PowerKind::ExtraLife => self.lives += 1,
            }
            debug!("breakout: caught {kind:?}");
        }
    }
}

impl Game for Breakout {
    fn id(&self) -> GameId {
        GameId::Breakout
    }

    fn reset(&mut self) {
        self.paddle = Entity::new((FIELD_W - PADDLE_W) / 2.0, PADDLE_Y, PADDLE_W, 1.0);
        self.bricks = Self::build_bricks();
        self.powerups.clear();
        self.speed = BALL_SPEED;
        self.speed_cap = BASE_SPEED_CAP;
        self.score = 0;
        self.lives = START_LIVES;
        self.level = 1;
        self.launch_requested = false;
        self.nudge = 0.0;
        self.game_over = false;
        self.attach_ball();
    }

    fn handle_input(&mut self, input: Input) {
        match input {
            Input::Left => self.nudge -= PADDLE_STEP,
            Input::Right => self.nudge += PADDLE_STEP,
            Input::Action | Input::Up => self.launch_requested = true,
            _ => {}
        }
    }

    fn update(&mut self, dt: Duration) {
        if self.game_over {
            return;
        }
        let dt = dt.as_secs_f32();

        self.paddle.pos.x += self.nudge;
        self.nudge = 0.0;
        self.paddle.clamp_x(0.0, FIELD_W);

        if std::mem::take(&mut self.launch_requested) && !self.launched {
            self.launched = true;
            let side = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            self.ball.vel = Vec2::new(side * self.speed * 0.6, -self.speed * 0.8);
        }
        self.update_powerups(dt);

        if !self.launched {
            self.stick_ball();
            return;
        }

        self.ball.advance(dt);
        if self.ball.left() <= 0.0 {
            self.ball.pos.x = 0.0;
            self.ball.vel.x = self.ball.vel.x.abs();
        }
        if self.ball.right() >= FIELD_W {
            self.ball.pos.x = FIELD_W - BALL_SIZE;
            self.ball.vel.x = -self.ball.vel.x.abs();
        }
        if self.ball.top() <= 0.0 {
            self.ball.pos.y = 0.0;
            self.ball.vel.y = self.ball.vel.y.abs();
        }

        // Ball falls below paddle
        if self.ball.top() >= FIELD_H {
            self.lose_life();
            return;
        }

        if self.ball.vel.y > 0.0 && self.ball.intersects(&self.paddle) {
            self.bounce_off_paddle();
        }

        self.hit_brick();
        if self.bricks.is_empty() {
            self.next_level();
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let layout = ui::game_layout(frame, area, " 🧱 Breakout ", palette);

        ui::status_bar(
            frame,
            layout.status,
            &[
                (format!("Score: {}", self.score), palette.projectile.color()),
                (format!("Lives: {}", "♥ ".repeat(self.lives as usize)), palette.obstacle.color()),
                (format!("Level: {}", self.level), palette.accent2.color()),
                (format!("Bricks: {}", self.bricks.len()), palette.text.color()),
            ],
            palette,
        );

        let mut canvas = Canvas::new(layout.field, FIELD_W, FIELD_H, palette);
        for brick in &self.bricks {
            let t = brick.row as f32 / (BRICK_ROWS - 1) as f32;
            let mut color = palette.accent1.mix(palette.accent2, t);
            if brick.hits_left < 2 && brick.row < TOUGH_ROWS {
                // Cracked
                color = color.darken(40);
            }
            let b = &brick.body;
            let ch = if brick.hits_left > 1 { '▓' } else { '█' };
            canvas.fill(b.pos.x, b.pos.y, b.size.x, b.size.y, ch, color.color());
        }
        for p in &self.powerups {
            canvas.put(p.body.pos.x, p.body.pos.y, p.kind.glyph(), palette.accent2.color());
        }
        let pd = &self.paddle;
        canvas.fill(pd.pos.x, pd.pos.y, pd.size.x, pd.size.y, '═', palette.player.color());
        canvas.put(self.ball.pos.x, self.ball.pos.y, '●', palette.projectile.color());
        frame.render_widget(canvas.into_paragraph(), layout.field);

        let mut keys = vec![("←→", "Move paddle")];
        if !self.launched {
            keys.push(("Space", "Launch"));
        }
        keys.extend([("P", "Pause"), ("R", "Restart"), ("Esc", "Menu")]);
        ui::help_bar(frame, layout.help, &keys, palette);
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
        let mut out = vec![self.paddle, self.ball];
        out.extend(self.bricks.iter().map(|b| b.body));
        out.extend(self.powerups.iter().map(|p| p.body));
        out
    }
}
