use std::time::Duration;

use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use ratatui::prelude::*;

use crate::games::{Entity, Game, GameId, GameState};
use crate::input::Input;
use crate::theme::Palette;
use crate::ui::{self, canvas::Canvas};

const FIELD_W: f32 = 60.0;
const FIELD_H: f32 = 24.0;
const GROUND_Y: f32 = FIELD_H - 2.0;
const BIRD_X: f32 = 12.0;
const BIRD_W: f32 = 2.0;
const BIRD_H: f32 = 1.0;
/// Cells per second squared.
const GRAVITY: f32 = 60.0;
const FLAP_VELOCITY: f32 = -18.0;
const PIPE_W: f32 = 4.0;
const PIPE_GAP: f32 = 7.0;
const PIPE_SPEED: f32 = 12.0;
const PIPE_EVERY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone)]
struct Pipe {
    top: Entity,
    bottom: Entity,
    passed: bool,
}

impl Pipe {
    fn new(x: f32, gap_center: f32) -> Self {
        let gap_top = gap_center - PIPE_GAP / 2.0;
        let gap_bottom = gap_center + PIPE_GAP / 2.0;
        Self {
            top: Entity::new(x, 0.0, PIPE_W, gap_top).with_velocity(-PIPE_SPEED, 0.0),
            bottom: Entity::new(x, gap_bottom, PIPE_W, GROUND_Y - gap_bottom)
                .with_velocity(-PIPE_SPEED, 0.0),
            passed: false,
        }
    }

    fn advance(&mut self, dt: f32) {
        self.top.advance(dt);
        self.bottom.advance(dt);
    }

    fn hits(&self, bird: &Entity) -> bool {
        self.top.intersects(bird) || self.bottom.intersects(bird)
    }
}

/// Gravity-bound bird threading gaps in scrolling pipes.
pub struct FlappyBird {
    bird: Entity,
    pipes: Vec<Pipe>,
    score: u32,
    started: bool,
    flap_requested: bool,
    since_pipe: Duration,
    game_over: bool,
    rng: StdRng,
}

impl FlappyBird {
    pub fn new(rng: StdRng) -> Self {
        let mut f = Self {
            bird: Entity::new(BIRD_X, 0.0, BIRD_W, BIRD_H),
            pipes: Vec::new(),
            score: 0,
            started: false,
            flap_requested: false,
            since_pipe: Duration::ZERO,
            game_over: false,
            rng,
        };
        f.reset();
        f
    }

    fn spawn_pipe(&mut self) {
        let margin = PIPE_GAP / 2.0 + 2.0;
        let center = self.rng.gen_range(margin..=GROUND_Y - margin);
        self.pipes.push(Pipe::new(FIELD_W, center));
    }
}

impl Game for FlappyBird {
    fn id(&self) -> GameId {
        GameId::FlappyBird
    }

    fn reset(&mut self) {
        self.bird = Entity::new(BIRD_X, GROUND_Y / 2.0, BIRD_W, BIRD_H);
        self.pipes.clear();
        self.score = 0;
        self.started = false;
        self.flap_requested = false;
        self.since_pipe = Duration::ZERO;
        self.game_over = false;
    }

    fn handle_input(&mut self, input: Input) {
        if matches!(input, Input::Action | Input::Up) {
            self.flap_requested = true;
        }
    }

    fn update(&mut self, dt: Duration) {
        if self.game_over {
            return;
        }
        if std::mem::take(&mut self.flap_requested) {
            self.started = true;
            self.bird.vel.y = FLAP_VELOCITY;
        }
        // Hover until the first flap
        if !self.started {
            return;
        }
        let secs = dt.as_secs_f32();

        self.bird.vel.y += GRAVITY * secs;
        self.bird.advance(secs);
        if self.bird.top() < 0.0 {
            self.bird.pos.y = 0.0;
            self.bird.vel.y = 0.0;
        }

        self.since_pipe += dt;
        if self.since_pipe >= PIPE_EVERY {
            self.since_pipe -= PIPE_EVERY;
            self.spawn_pipe();
        }

        let bird = self.bird;
        let mut crashed = bird.bottom() >= GROUND_Y;
        for pipe in &mut self.pipes {
            pipe.advance(secs);
            if !pipe.passed && pipe.top.right() < bird.left() {
                pipe.passed = true;
                self.score += 1;
            }
            crashed |= pipe.hits(&bird);
        }
        self.pipes.retain(|p| p.top.right() > 0.0);

        if crashed {
            self.game_over = true;
            debug!("flappy: crashed after {} pipes", self.score);
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let layout = ui::game_layout(frame, area, " 🐦 Flappy Bird ", palette);

        ui::status_bar(
            frame,
            layout.status,
            &[(format!("Pipes: {}", self.score), palette.projectile.color())],
            palette,
        );

        let mut canvas = Canvas::new(layout.field, FIELD_W, FIELD_H, palette);
        let pipe_color = palette.obstacle.color();
        for part in self.pipes.iter().flat_map(|p| [&p.top, &p.bottom]) {
            canvas.fill(part.pos.x, part.pos.y, part.size.x, part.size.y, '█', pipe_color);
        }
        canvas.fill(0.0, GROUND_Y, FIELD_W, FIELD_H - GROUND_Y, '▒', palette.accent2.color());
        let b = &self.bird;
        canvas.fill(b.pos.x, b.pos.y, b.size.x, b.size.y, '▶', palette.player.color());
        frame.render_widget(canvas.into_paragraph(), layout.field);

        let mut keys = vec![("Space/↑", "Flap")];
        if !self.started {
            keys[0] = ("Space/↑", "Flap to start");
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
        let mut out = vec![self.bird];
        for p in &self.pipes {
            out.push(p.top);
            out.push(p.bottom);
        }
        out
    }
}
