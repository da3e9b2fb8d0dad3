use std::ops::{Add, AddAssign, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// A moving axis-aligned box. `pos` is the top-left corner in field units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Entity {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(w, h),
        }
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.vel = Vec2::new(vx, vy);
        self
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn set_center(&mut self, c: Vec2) {
        self.pos = c - self.size * 0.5;
    }

    /// Strict overlap; touching edges do not count.
    pub fn intersects(&self, other: &Entity) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    pub fn clamp_x(&mut self, min: f32, max: f32) {
        self.pos.x = self.pos.x.clamp(min, (max - self.size.x).max(min));
    }

    pub fn clamp_y(&mut self, min: f32, max: f32) {
        self.pos.y = self.pos.y.clamp(min, (max - self.size.y).max(min));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_strict() {
        let a = Entity::new(0.0, 0.0, 2.0, 2.0);
        let touching = Entity::new(2.0, 0.0, 2.0, 2.0);
        let overlapping = Entity::new(1.5, 1.5, 2.0, 2.0);
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
    }

    #[test]
    fn advance_integrates_velocity() {
        let mut e = Entity::new(1.0, 1.0, 1.0, 1.0).with_velocity(4.0, -2.0);
        e.advance(0.5);
        assert_eq!(e.pos, Vec2::new(3.0, 0.0));
        assert_eq!(e.center(), Vec2::new(3.5, 0.5));
    }

    #[test]
    fn clamp_keeps_box_inside() {
        let mut e = Entity::new(9.0, -3.0, 2.0, 2.0);
        e.clamp_x(0.0, 10.0);
        e.clamp_y(0.0, 10.0);
        assert_eq!(e.pos, Vec2::new(8.0, 0.0));
    }
}
