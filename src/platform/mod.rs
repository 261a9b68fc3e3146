//! Platform abstraction layer
//!
//! Hosts that plug a [`Session`](crate::Session) into its surroundings:
//! - `flash`: hit flash bookkeeping shared by both hosts
//! - `headless`: in-memory page of rectangles, driven by an explicit clock
//! - `web`: the browser DOM (wasm32 only)

pub mod flash;
pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::{HeadlessHost, PageRect};
