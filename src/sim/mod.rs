//! Overlay simulation
//!
//! All gameplay logic lives here. This module is host-agnostic:
//! - Fixed step per tick, no delta time
//! - Time only enters as the frame timestamp passed to `tick`
//! - Page access goes through the injected `Surface`
//! - No rendering or platform dependencies

pub mod hit;
pub mod input;
pub mod physics;
pub mod state;
pub mod tick;

pub use hit::{Contact, Surface, hit_test};
pub use input::{Control, InputTracker, KeyEffect};
pub use physics::{ShipConfig, advance_projectiles, expire_effects, fire, step_ship};
pub use state::{Effect, Heading, Projectile, Ship, SimState};
pub use tick::{TickReport, tick};
