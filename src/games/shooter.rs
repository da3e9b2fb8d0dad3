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
const FIELD_H: f32 = 24.0;
const SHIP_W: f32 = 3.0;
const SHIP_H: f32 = 2.0;
const SHIP_STEP: f32 = 2.0;
const BULLET_SPEED: f32 = 30.0;
const FIRE_COOLDOWN: Duration = Duration::from_millis(250);
const ENEMY_SPEED: f32 = 5.0;
const ZIGZAG_SPEED: f32 = 6.0;
const ZIGZAG_FLIP: Duration = Duration::from_millis(330);
const SPAWN_EVERY: Duration = Duration::from_millis(1000);
const WAVE_LENGTH: Duration = Duration::from_secs(20);
const FIRST_WAVE_ENEMIES: usize = 5;
const ENEMIES_PER_WAVE: usize = 2;
const INVULNERABLE_FOR: Duration = Duration::from_secs(2);
const START_LIVES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnemyKind {
    Basic,
    Zigzag,
    Fast,
}

impl EnemyKind {
    fn points(self) -> u32 {
        match self {
            EnemyKind::Basic => 10,
            EnemyKind::Zigzag => 15,
            EnemyKind::Fast => 20,
        }
    }

    fn glyph(self) -> char {
        match self {
            EnemyKind::Basic => '●',
            EnemyKind::Zigzag => '◆',
            EnemyKind::Fast => '▼',
        }
    }
}

#[derive(Debug, Clone)]
struct Enemy {
    body: Entity,
    kind: EnemyKind,
    /// Time until a zigzag enemy reverses.
    flip_in: Duration,
}

/// Horizontal ship against descending waves of enemies.
pub struct SpaceShooter {
    ship: Entity,
    bullets: Vec<Entity>,
    enemies: Vec<Enemy>,
    score: u32,
    lives: u32,
    wave: u32,
    wave_size: usize,
    nudge: f32,
    fire_requested: bool,
    cooldown: Duration,
    invulnerable: Duration,
    since_spawn: Duration,
    wave_elapsed: Duration,
    game_over: bool,
    rng: StdRng,
}

impl SpaceShooter {
    pub fn new(rng: StdRng) -> Self {
        let mut s = Self {
            ship: Entity::new(0.0, 0.0, SHIP_W, SHIP_H),
            bullets: Vec::new(),
            enemies: Vec::new(),
            score: 0,
            lives: START_LIVES,
            wave: 1,
            wave_size: FIRST_WAVE_ENEMIES,
            nudge: 0.0,
            fire_requested: false,
            cooldown: Duration::ZERO,
            invulnerable: Duration::ZERO,
            since_spawn: Duration::ZERO,
            wave_elapsed: Duration::ZERO,
            game_over: false,
            rng,
        };
        s.reset();
        s
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    fn spawn_enemy(&mut self) {
        let kind = match self.rng.gen_range(0..3) {
            0 => EnemyKind::Basic,
            1 => EnemyKind::Zigzag,
            _ => EnemyKind::Fast,
        };
        let (w, h) = if kind == EnemyKind::Fast { (2.0, 1.0) } else { (3.0, 2.0) };
        let x = self.rng.gen_range(0.0..=FIELD_W - w);
        let mut speed = self.rng.gen_range(ENEMY_SPEED..=ENEMY_SPEED * 1.5);
        if kind == EnemyKind::Fast {
            speed *= 1.5;
        }
        let mut body = Entity::new(x, -h, w, h).with_velocity(0.0, speed);
        if kind == EnemyKind::Zigzag {
            body.vel.x = if self.rng.gen_bool(0.5) { ZIGZAG_SPEED } else { -ZIGZAG_SPEED };
        }
        self.enemies.push(Enemy { body, kind, flip_in: ZIGZAG_FLIP });
    }

    fn fire(&mut self) {
        if !self.cooldown.is_zero() {
            return;
        }
        self.cooldown = FIRE_COOLDOWN;
        let c = self.ship.center();
        let mut bullet = Entity::new(0.0, 0.0, 1.0, 1.0).with_velocity(0.0, -BULLET_SPEED);
        bullet.set_center(Vec2::new(c.x, self.ship.top() - 0.5));
        self.bullets.push(bullet);
    }

    fn move_enemies(&mut self, dt: Duration) {
        let secs = dt.as_secs_f32();
        for e in &mut self.enemies {
            if e.kind == EnemyKind::Zigzag {
                match e.flip_in.checked_sub(dt) {
                    Some(left) if !left.is_zero() => e.flip_in = left,
                    _ => {
                        e.flip_in = ZIGZAG_FLIP;
                        e.body.vel.x = -e.body.vel.x;
                    }
                }
            }
            e.body.advance(secs);
            if e.body.left() <= 0.0 {
                e.body.pos.x = 0.0;
                e.body.vel.x = e.body.vel.x.abs();
            } else if e.body.right() >= FIELD_W {
                e.body.pos.x = FIELD_W - e.body.size.x;
                e.body.vel.x = -e.body.vel.x.abs();
            }
        }
        // Enemies that slip past are simply gone
        self.enemies.retain(|e| e.body.top() <= FIELD_H);
    }

    fn resolve_shots(&mut self) {
        let mut i = 0;
        while i < self.bullets.len() {
            let bullet = self.bullets[i];
            match self.enemies.iter().position(|e| e.body.intersects(&bullet)) {
                Some(hit) => {
                    let enemy = self.enemies.remove(hit);
                    self.score += enemy.kind.points();
                    self.bullets.remove(i);
                }
                None => i += 1,
            }
        }
    }

    fn resolve_rams(&mut self) {
        if !self.invulnerable.is_zero() {
            return;
        }
        let ship = self.ship;
        if let Some(hit) = self.enemies.iter().position(|e| e.body.intersects(&ship)) {
            self.enemies.remove(hit);
            self.lives = self.lives.saturating_sub(1);
            self.invulnerable = INVULNERABLE_FOR;
            debug!("shooter: ship hit, {} lives left", self.lives);
            if self.lives == 0 {
                self.game_over = true;
            }
        }
    }
}

impl Game for SpaceShooter {
    fn id(&self) -> GameId {
        GameId::SpaceShooter
    }

    fn reset(&mut self) {
        self.ship = Entity::new((FIELD_W - SHIP_W) / 2.0, FIELD_H - SHIP_H - 1.0, SHIP_W, SHIP_H);
        self.bullets.clear();
        self.enemies.clear();
        self.score = 0;
        self.lives = START_LIVES;
        self.wave = 1;
        self.wave_size = FIRST_WAVE_ENEMIES;
        self.nudge = 0.0;
        self.fire_requested = false;
        self.cooldown = Duration::ZERO;
        self.invulnerable = Duration::ZERO;
        self.since_spawn = Duration::ZERO;
        self.wave_elapsed = Duration::ZERO;
        self.game_over = false;
    }

    fn handle_input(&mut self, input: Input) {
        match input {
            Input::Left => self.nudge -= SHIP_STEP,
            Input::Right => self.nudge += SHIP_STEP,
            Input::Action | Input::Up => self.fire_requested = true,
            _ => {}
        }
    }

    fn update(&mut self, dt: Duration) {
        if self.game_over {
            return;
        }
        let secs = dt.as_secs_f32();
        self.cooldown = self.cooldown.saturating_sub(dt);
        self.invulnerable = self.invulnerable.saturating_sub(dt);

        self.ship.pos.x += std::mem::take(&mut self.nudge);
        self.ship.clamp_x(0.0, FIELD_W);
        if std::mem::take(&mut self.fire_requested) {
            self.fire();
        }

        self.wave_elapsed += dt;
        if self.wave_elapsed >= WAVE_LENGTH {
            self.wave_elapsed -= WAVE_LENGTH;
            self.wave += 1;
            self.wave_size += ENEMIES_PER_WAVE;
            self.score += self.wave * 50;
            debug!("shooter: wave {}", self.wave);
        }

        for b in &mut self.bullets {
            b.advance(secs);
        }
        self.bullets.retain(|b| b.bottom() > 0.0);
        self.move_enemies(dt);
        self.resolve_shots();
        self.resolve_rams();

        self.since_spawn += dt;
        if self.since_spawn >= SPAWN_EVERY {
            self.since_spawn = Duration::ZERO;
            if self.enemies.len() < self.wave_size {
                self.spawn_enemy();
            }
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let layout = ui::game_layout(frame, area, " 🚀 Space Shooter ", palette);

        ui::status_bar(
            frame,
            layout.status,
            &[
                (format!("Score: {}", self.score), palette.projectile.color()),
                (format!("Wave: {}", self.wave), palette.accent1.color()),
                (format!("Lives: {}", "♥".repeat(self.lives as usize)), palette.opponent.color()),
            ],
            palette,
        );

        let mut canvas = Canvas::new(layout.field, FIELD_W, FIELD_H, palette);
        for b in &self.bullets {
            canvas.put(b.pos.x, b.pos.y, '|', palette.projectile.color());
        }
        for e in &self.enemies {
            let b = &e.body;
            canvas.fill(b.pos.x, b.pos.y, b.size.x, b.size.y, e.kind.glyph(), palette.opponent.color());
        }
        // Blink while invulnerable
        let blink = (self.invulnerable.as_millis() / 100) % 2 == 1;
        if !blink {
            let s = &self.ship;
            canvas.fill(s.pos.x, s.pos.y, s.size.x, s.size.y, '▲', palette.player.color());
        }
        frame.render_widget(canvas.into_paragraph(), layout.field);

        ui::help_bar(
            frame,
            layout.help,
            &[("←→", "Move"), ("Space", "Fire"), ("P", "Pause"), ("R", "Restart"), ("Esc", "Menu")],
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
        let mut out = vec![self.ship];
        out.extend(self.bullets.iter().copied());
        out.extend(self.enemies.iter().map(|e| e.body));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const DT: Duration = Duration::from_millis(16);

    fn shooter() -> SpaceShooter {
        SpaceShooter::new(StdRng::seed_from_u64(5))
    }

    fn place_enemy(s: &mut SpaceShooter, kind: EnemyKind, x: f32, y: f32) {
        let body = Entity::new(x, y, 3.0, 2.0);
        s.enemies.push(Enemy { body, kind, flip_in: ZIGZAG_FLIP });
    }

    #[test]
    fn fire_respects_cooldown() {
        let mut s = shooter();
        s.handle_input(Input::Action);
        s.update(DT);
        assert_eq!(s.bullets.len(), 1);

        s.handle_input(Input::Action);
        s.update(DT);
        assert_eq!(s.bullets.len(), 1);

        s.update(FIRE_COOLDOWN);
        s.handle_input(Input::Action);
        s.update(DT);
        assert_eq!(s.bullets.len(), 2);
    }

    #[test]
    fn shots_score_by_enemy_kind() {
        for (kind, points) in [
            (EnemyKind::Basic, 10),
            (EnemyKind::Zigzag, 15),
            (EnemyKind::Fast, 20),
        ] {
            let mut s = shooter();
            let c = s.ship.center();
            let top = s.ship.top();
            place_enemy(&mut s, kind, c.x - 1.5, top - 4.0);
            s.handle_input(Input::Action);
            for _ in 0..10 {
                s.update(DT);
            }
            assert_eq!(s.score(), points, "{kind:?}");
            assert!(s.enemies.is_empty());
            assert!(s.bullets.is_empty());
        }
    }

    #[test]
    fn escaping_enemy_leaves_score_alone() {
        let mut s = shooter();
        s.score = 5;
        let mut e = Entity::new(0.0, FIELD_H - 0.01, 3.0, 2.0);
        e.vel.y = ENEMY_SPEED;
        s.enemies.push(Enemy { body: e, kind: EnemyKind::Basic, flip_in: ZIGZAG_FLIP });
        s.update(DT);
        assert!(s.enemies.is_empty());
        assert_eq!(s.score(), 5);
        assert_eq!(s.lives(), START_LIVES);
    }

    #[test]
    fn wave_advances_with_bonus() {
        let mut s = shooter();
        s.update(WAVE_LENGTH);
        assert_eq!(s.wave(), 2);
        assert_eq!(s.score(), 100);
        assert_eq!(s.wave_size, FIRST_WAVE_ENEMIES + ENEMIES_PER_WAVE);
    }

    #[test]
    fn ram_costs_a_life_then_grants_invulnerability() {
        let mut s = shooter();
        let (x, y) = (s.ship.pos.x, s.ship.pos.y);
        place_enemy(&mut s, EnemyKind::Basic, x, y);
        s.update(DT);
        assert_eq!(s.lives(), 2);
        assert!(s.enemies.is_empty());

        place_enemy(&mut s, EnemyKind::Basic, x, y);
        s.update(DT);
        assert_eq!(s.lives(), 2);

        s.enemies.clear();
        s.update(INVULNERABLE_FOR);
        s.enemies.clear();
        place_enemy(&mut s, EnemyKind::Basic, x, y);
        s.update(DT);
        assert_eq!(s.lives(), 1);
    }

    #[test]
    fn last_life_ends_the_run() {
        let mut s = shooter();
        s.lives = 1;
        let (x, y) = (s.ship.pos.x, s.ship.pos.y);
        place_enemy(&mut s, EnemyKind::Fast, x, y);
        s.update(DT);
        assert_eq!(s.status(), GameState::GameOver);
    }

    #[test]
    fn ship_stays_on_field() {
        let mut s = shooter();
        for _ in 0..40 {
            s.handle_input(Input::Right);
        }
        s.update(DT);
        assert_eq!(s.ship.right(), FIELD_W);
        for _ in 0..40 {
            s.handle_input(Input::Left);
        }
        s.update(DT);
        assert_eq!(s.ship.left(), 0.0);
    }

    #[test]
    fn zigzag_enemies_reverse_periodically() {
        let mut s = shooter();
        let mut body = Entity::new(30.0, 2.0, 3.0, 2.0);
        body.vel.x = ZIGZAG_SPEED;
        s.enemies.push(Enemy { body, kind: EnemyKind::Zigzag, flip_in: ZIGZAG_FLIP });
        s.update(ZIGZAG_FLIP);
        assert!(s.enemies[0].body.vel.x < 0.0);
    }
}
