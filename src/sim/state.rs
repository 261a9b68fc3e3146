//! Entity store and core simulation types
//!
//! Everything the loop mutates between ticks lives in [`SimState`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Ship heading, stored as degrees in {0, ±45, ±90, ±135}.
///
/// Zero is the sprite's upright pose; projectiles fired from it travel along +x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Heading {
    #[default]
    Neutral,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Heading {
    pub fn degrees(&self) -> i16 {
        match self {
            Heading::Neutral => 0,
            Heading::Left => -90,
            Heading::Right => 90,
            Heading::UpLeft => -135,
            Heading::UpRight => 135,
            Heading::DownLeft => -45,
            Heading::DownRight => 45,
        }
    }

    #[inline]
    pub fn radians(&self) -> f32 {
        (self.degrees() as f32).to_radians()
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub heading: Heading,
}

impl Ship {
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            heading: Heading::Neutral,
        }
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Direction of travel (radians), fixed at spawn
    pub heading: f32,
}

/// An explosion left behind by a contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub id: u32,
    pub pos: Vec2,
    /// Frame timestamp (ms) of the contact
    pub created_at: f64,
}

impl Effect {
    /// Milliseconds since the contact, never negative
    #[inline]
    pub fn age(&self, now: f64) -> f64 {
        (now - self.created_at).max(0.0)
    }

    /// Rendered diameter: grows one pixel per `growth_ms_per_px`, capped
    pub fn size(&self, now: f64, growth_ms_per_px: f64, max_size: f32) -> f32 {
        ((self.age(now) / growth_ms_per_px) as f32).min(max_size)
    }

    /// Linear fade over the lifetime
    pub fn opacity(&self, now: f64, lifetime_ms: f64) -> f32 {
        (1.0 - self.age(now) / lifetime_ms).max(0.0) as f32
    }
}

/// Complete simulation state for one overlay session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub ship: Ship,
    pub projectiles: Vec<Projectile>,
    pub effects: Vec<Effect>,
    pub score: u64,
    /// Ticks run since the session started
    pub time_ticks: u64,
    next_projectile_id: u32,
    next_effect_id: u32,
}

impl SimState {
    pub fn new(ship_start: Vec2) -> Self {
        Self {
            ship: Ship::at(ship_start),
            projectiles: Vec::new(),
            effects: Vec::new(),
            score: 0,
            time_ticks: 0,
            next_projectile_id: 0,
            next_effect_id: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Vec2::from(settings.ship_start))
    }

    /// Fresh session: ship back at the start, no entities, zero score.
    ///
    /// Identity counters keep counting so ids are never handed out twice.
    pub fn reset(&mut self, ship_start: Vec2) {
        self.ship = Ship::at(ship_start);
        self.projectiles.clear();
        self.effects.clear();
        self.score = 0;
        self.time_ticks = 0;
    }

    pub fn spawn_projectile(&mut self, pos: Vec2, heading: f32) -> u32 {
        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        self.projectiles.push(Projectile { id, pos, heading });
        id
    }

    pub fn spawn_effect(&mut self, pos: Vec2, created_at: f64) -> u32 {
        let id = self.next_effect_id;
        self.next_effect_id += 1;
        self.effects.push(Effect { id, pos, created_at });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_radians() {
        assert_eq!(Heading::Neutral.radians(), 0.0);
        assert!((Heading::Right.radians() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((Heading::UpLeft.radians() + 0.75 * std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_effect_size_and_opacity() {
        let effect = Effect {
            id: 0,
            pos: Vec2::ZERO,
            created_at: 1000.0,
        };
        assert_eq!(effect.size(1000.0, 50.0, 40.0), 0.0);
        assert_eq!(effect.size(1500.0, 50.0, 40.0), 10.0);
        assert_eq!(effect.size(4000.0, 50.0, 40.0), 40.0);
        assert!((effect.opacity(1250.0, 1000.0) - 0.75).abs() < 1e-6);
        assert_eq!(effect.opacity(2500.0, 1000.0), 0.0);
        // Clock skew never yields a negative age
        assert_eq!(effect.age(900.0), 0.0);
    }

    #[test]
    fn test_reset_keeps_ids_unique() {
        let mut state = SimState::new(Vec2::new(100.0, 100.0));
        let a = state.spawn_projectile(Vec2::ZERO, 0.0);
        let e = state.spawn_effect(Vec2::ZERO, 0.0);
        state.score = 30;
        state.ship.pos = Vec2::new(5.0, 5.0);

        state.reset(Vec2::new(100.0, 100.0));
        assert!(state.projectiles.is_empty());
        assert!(state.effects.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.ship.pos, Vec2::new(100.0, 100.0));

        assert!(state.spawn_projectile(Vec2::ZERO, 0.0) > a);
        assert!(state.spawn_effect(Vec2::ZERO, 0.0) > e);
    }
}
