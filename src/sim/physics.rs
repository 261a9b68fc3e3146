//! Per-tick movement rules
//!
//! Fixed step: every call moves a constant distance, there is no delta time.

use super::input::{Control, InputTracker};
use super::state::{Effect, Heading, Projectile, Ship, SimState};
use crate::{Bounds, clamp_soft, direction};

/// Ship extents and speed used by [`step_ship`]
#[derive(Debug, Clone, Copy)]
pub struct ShipConfig {
    pub speed: f32,
    pub half_width: f32,
    pub half_height: f32,
}

impl From<&crate::Settings> for ShipConfig {
    fn from(s: &crate::Settings) -> Self {
        Self {
            speed: s.move_speed,
            half_width: s.ship_half_width,
            half_height: s.ship_half_height,
        }
    }
}

/// Move and turn the ship from the held controls
pub fn step_ship(ship: &mut Ship, input: &InputTracker, bounds: Bounds, cfg: ShipConfig) {
    let up = input.is_held(Control::Up);
    let down = input.is_held(Control::Down);
    let left = input.is_held(Control::Left);
    let right = input.is_held(Control::Right);

    let min_x = cfg.half_width;
    let max_x = bounds.width - cfg.half_width;
    let min_y = cfg.half_height;
    let max_y = bounds.height - cfg.half_height;

    let mut pos = ship.pos;
    let mut heading = ship.heading;

    if up {
        pos.y = (pos.y - cfg.speed).max(min_y);
    }
    if down {
        pos.y = (pos.y + cfg.speed).min(max_y);
    }
    if left {
        pos.x = (pos.x - cfg.speed).max(min_x);
        heading = Heading::Left;
    }
    if right {
        pos.x = (pos.x + cfg.speed).min(max_x);
        heading = Heading::Right;
    }

    // Diagonals override the horizontal heading. Later checks win when
    // opposing keys are held together.
    if up && left {
        heading = Heading::UpLeft;
    }
    if up && right {
        heading = Heading::UpRight;
    }
    if down && left {
        heading = Heading::DownLeft;
    }
    if down && right {
        heading = Heading::DownRight;
    }

    // The surface may have shrunk since the last tick
    pos.x = clamp_soft(pos.x, min_x, max_x);
    pos.y = clamp_soft(pos.y, min_y, max_y);

    ship.pos = pos;
    ship.heading = heading;
}

/// Spawn one projectile at the ship, travelling along its heading
pub fn fire(state: &mut SimState) -> u32 {
    let pos = state.ship.pos;
    let heading = state.ship.heading.radians();
    state.spawn_projectile(pos, heading)
}

/// Move every projectile one step and drop the ones that left the surface.
///
/// Returns how many were dropped.
pub fn advance_projectiles(
    projectiles: &mut Vec<Projectile>,
    bounds: Bounds,
    speed: f32,
) -> usize {
    for p in projectiles.iter_mut() {
        p.pos += direction(p.heading) * speed;
    }
    let before = projectiles.len();
    projectiles.retain(|p| bounds.contains(p.pos));
    before - projectiles.len()
}

/// Drop effects that have lived for at least `lifetime_ms`.
///
/// Returns how many expired.
pub fn expire_effects(effects: &mut Vec<Effect>, now: f64, lifetime_ms: f64) -> usize {
    let before = effects.len();
    effects.retain(|e| e.age(now) < lifetime_ms);
    before - effects.len()
}
