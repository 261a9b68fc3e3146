//! Destroyer Overlay - an arcade ship that flies over a host page
//!
//! Core modules:
//! - `sim`: Per-tick simulation (input, physics, hit-testing, entity store)
//! - `frame`: Read-only render snapshot handed to the host
//! - `session`: Idle/Running frame loop driving the simulation for a host
//! - `platform`: Browser bindings (DOM surface, animation frames, key events)
//! - `settings`: Tunable constants and session policy

pub mod frame;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use frame::Frame;
pub use session::{Host, Session};
pub use settings::{SessionPolicy, Settings};

use glam::Vec2;

/// Default tuning constants
pub mod consts {
    /// Ship movement per tick (surface pixels)
    pub const SHIP_MOVE_SPEED: f32 = 5.0;
    /// Half the ship sprite width (48px sprite)
    pub const SHIP_HALF_WIDTH: f32 = 24.0;
    /// Half the ship sprite height (64px sprite)
    pub const SHIP_HALF_HEIGHT: f32 = 32.0;
    /// Ship spawn point
    pub const SHIP_START: (f32, f32) = (100.0, 100.0);

    /// Projectile movement per tick
    pub const PROJECTILE_SPEED: f32 = 8.0;
    /// Drawn projectile dot radius
    pub const PROJECTILE_RADIUS: f32 = 4.0;

    /// Effect lifetime in milliseconds
    pub const EFFECT_LIFETIME_MS: f64 = 1000.0;
    /// Effect grows one pixel per this many milliseconds
    pub const EFFECT_GROWTH_MS_PER_PX: f64 = 50.0;
    /// Effect diameter cap
    pub const EFFECT_MAX_SIZE: f32 = 40.0;

    /// Delay before a hit element's flash is reverted
    pub const DISRUPTION_REVERT_MS: u32 = 500;
    /// Score awarded per contact
    pub const CONTACT_REWARD: u64 = 10;
}

/// Width and height of the hosting surface, in surface-local pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Inclusive containment: edges count as inside
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

/// Clamp `v` into `[lo, hi]`, letting `lo` win when the range is inverted.
///
/// `f32::clamp` panics on an inverted range, which happens whenever the
/// surface is smaller than the ship.
#[inline]
pub fn clamp_soft(v: f32, lo: f32, hi: f32) -> f32 {
    v.min(hi).max(lo)
}

/// Unit direction vector for an angle in radians
#[inline]
pub fn direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains_edges() {
        let b = Bounds::new(400.0, 300.0);
        assert!(b.contains(Vec2::new(0.0, 0.0)));
        assert!(b.contains(Vec2::new(400.0, 300.0)));
        assert!(!b.contains(Vec2::new(400.1, 10.0)));
        assert!(!b.contains(Vec2::new(10.0, -0.1)));
    }

    #[test]
    fn test_clamp_soft_inverted_range() {
        assert_eq!(clamp_soft(10.0, 32.0, 268.0), 32.0);
        assert_eq!(clamp_soft(500.0, 32.0, 268.0), 268.0);
        // Surface shorter than the ship: lower bound wins
        assert_eq!(clamp_soft(5.0, 32.0, -12.0), 32.0);
    }
}
