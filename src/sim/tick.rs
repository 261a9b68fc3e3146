//! Single simulation tick
//!
//! Order matters: hit-testing reads post-movement projectile positions, and a
//! projectile spawned this tick is only hit-tested after it has moved once.

use super::hit::{Surface, hit_test};
use super::input::InputTracker;
use super::physics::{ShipConfig, advance_projectiles, expire_effects, fire, step_ship};
use super::state::SimState;
use crate::{Bounds, Settings};

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Movement, hit-test and spawn were skipped (no bounds from the host)
    pub skipped: bool,
    pub contacts: u32,
    pub spawned: Option<u32>,
    pub dropped: usize,
    pub expired: usize,
}

/// Advance the simulation by one fixed step.
///
/// `bounds` is re-queried by the caller every tick since the surface can
/// resize. `now` is the frame timestamp in milliseconds.
pub fn tick<S: Surface>(
    state: &mut SimState,
    input: &InputTracker,
    bounds: Option<Bounds>,
    surface: &mut S,
    now: f64,
    settings: &Settings,
) -> TickReport {
    let mut report = TickReport::default();
    state.time_ticks += 1;

    match bounds {
        Some(bounds) => {
            step_ship(&mut state.ship, input, bounds, ShipConfig::from(settings));
            report.dropped =
                advance_projectiles(&mut state.projectiles, bounds, settings.projectile_speed);

            for contact in hit_test(&state.projectiles, surface) {
                surface.disrupt(&contact.element, settings.disruption_revert_ms);
                let effect_id = state.spawn_effect(contact.point, now);
                state.score += settings.contact_reward;
                report.contacts += 1;
                log::debug!(
                    "Projectile {} hit at ({:.0}, {:.0}), effect {}",
                    contact.projectile_id,
                    contact.point.x,
                    contact.point.y,
                    effect_id
                );
            }

            if input.firing() {
                report.spawned = Some(fire(state));
            }
        }
        None => report.skipped = true,
    }

    report.expired = expire_effects(&mut state.effects, now, settings.effect_lifetime_ms);

    log::trace!(
        "Tick {}: {} projectiles, {} effects, score {}",
        state.time_ticks,
        state.projectiles.len(),
        state.effects.len(),
        state.score
    );

    report
}
