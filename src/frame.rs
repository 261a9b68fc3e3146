//! Read-only render snapshot handed to the host each tick

use serde::{Deserialize, Serialize};

use crate::Settings;
use crate::sim::SimState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipView {
    pub x: f32,
    pub y: f32,
    pub heading_deg: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

/// An explosion with its age-dependent look already resolved
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub opacity: f32,
}

impl ShipView {
    /// Top-left corner of a sprite with the given half extents centred on the ship
    pub fn top_left(&self, half_width: f32, half_height: f32) -> (f32, f32) {
        (self.x - half_width, self.y - half_height)
    }
}

impl ProjectileView {
    pub fn top_left(&self, radius: f32) -> (f32, f32) {
        (self.x - radius, self.y - radius)
    }
}

impl EffectView {
    pub fn top_left(&self) -> (f32, f32) {
        (self.x - self.size / 2.0, self.y - self.size / 2.0)
    }
}

/// Everything the presentation layer draws for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub ship: ShipView,
    pub projectiles: Vec<ProjectileView>,
    pub effects: Vec<EffectView>,
    pub score: u64,
}

impl Frame {
    pub fn capture(state: &SimState, now: f64, settings: &Settings) -> Self {
        Self {
            ship: ShipView {
                x: state.ship.pos.x,
                y: state.ship.pos.y,
                heading_deg: state.ship.heading.degrees(),
            },
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    x: p.pos.x,
                    y: p.pos.y,
                })
                .collect(),
            effects: state
                .effects
                .iter()
                .map(|e| EffectView {
                    id: e.id,
                    x: e.pos.x,
                    y: e.pos.y,
                    size: e.size(now, settings.effect_growth_ms_per_px, settings.effect_max_size),
                    opacity: e.opacity(now, settings.effect_lifetime_ms),
                })
                .collect(),
            score: state.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_capture_resolves_effect_look() {
        let settings = Settings::default();
        let mut state = SimState::from_settings(&settings);
        state.spawn_effect(Vec2::new(10.0, 20.0), 1000.0);
        state.spawn_projectile(Vec2::new(30.0, 40.0), 0.0);
        state.score = 10;

        let frame = Frame::capture(&state, 1500.0, &settings);
        assert_eq!(frame.ship, ShipView { x: 100.0, y: 100.0, heading_deg: 0 });
        assert_eq!(frame.projectiles, vec![ProjectileView { id: 0, x: 30.0, y: 40.0 }]);
        assert_eq!(frame.effects[0].size, 10.0);
        assert!((frame.effects[0].opacity - 0.5).abs() < 1e-6);
        assert_eq!(frame.score, 10);
    }

    #[test]
    fn test_sprites_anchor_on_centre() {
        let settings = Settings {
            ship_half_width: 30.0,
            ship_half_height: 10.0,
            projectile_radius: 6.0,
            ..Settings::default()
        };
        let mut state = SimState::from_settings(&settings);
        state.spawn_projectile(Vec2::new(50.0, 60.0), 0.0);
        state.spawn_effect(Vec2::new(200.0, 200.0), 0.0);

        let frame = Frame::capture(&state, 500.0, &settings);
        assert_eq!(
            frame.ship.top_left(settings.ship_half_width, settings.ship_half_height),
            (70.0, 90.0)
        );
        assert_eq!(frame.projectiles[0].top_left(settings.projectile_radius), (44.0, 54.0));
        assert_eq!(frame.effects[0].top_left(), (195.0, 195.0));
    }

    #[test]
    fn test_frame_json_shape() {
        let settings = Settings::default();
        let state = SimState::from_settings(&settings);
        let json = serde_json::to_value(Frame::capture(&state, 0.0, &settings)).unwrap();
        assert_eq!(json["ship"]["heading_deg"], 0);
        assert_eq!(json["score"], 0);
        assert!(json["effects"].as_array().unwrap().is_empty());
    }
}
