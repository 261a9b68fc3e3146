//! Frame loop driving the simulation for a host
//!
//! A [`Session`] is either Idle or Running. Running owns exactly one pending
//! frame handle; deactivation cancels it synchronously so no tick can fire
//! after the overlay is switched off.

use glam::Vec2;

use crate::frame::Frame;
use crate::settings::{SessionPolicy, Settings};
use crate::sim::{InputTracker, KeyEffect, SimState, Surface, TickReport, tick};
use crate::Bounds;

/// Everything the overlay needs from its embedding page
pub trait Host: Surface {
    /// Token for a scheduled animation frame
    type FrameHandle;

    /// Current surface size, re-queried every tick
    fn bounds(&self) -> Option<Bounds>;

    /// Schedule one call to [`Session::on_frame`] on the next animation frame
    fn request_frame(&mut self) -> Self::FrameHandle;

    fn cancel_frame(&mut self, handle: Self::FrameHandle);

    /// Start routing key events to [`Session::key_down`] / [`Session::key_up`]
    fn attach_input(&mut self);

    fn detach_input(&mut self);

    /// Show or hide the overlay. Hidden overlays draw nothing and let the
    /// page receive pointer input again.
    fn set_visible(&mut self, visible: bool);

    /// The player asked to close the overlay. The host runs its close
    /// callback, which normally ends with `set_active(false)`.
    fn request_close(&mut self);

    fn present(&mut self, frame: &Frame);
}

enum LoopPhase<T> {
    Idle,
    Running(T),
}

pub struct Session<H: Host> {
    host: H,
    settings: Settings,
    state: SimState,
    input: InputTracker,
    phase: LoopPhase<H::FrameHandle>,
}

impl<H: Host> Session<H> {
    pub fn new(host: H, settings: Settings) -> Self {
        Self {
            state: SimState::from_settings(&settings),
            host,
            settings,
            input: InputTracker::new(),
            phase: LoopPhase::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, LoopPhase::Running(_))
    }

    /// Follow the host's activation flag
    pub fn set_active(&mut self, active: bool) {
        if active {
            self.activate();
        } else {
            self.deactivate();
        }
    }

    /// Idle → Running. No-op when already running.
    pub fn activate(&mut self) {
        if self.is_running() {
            return;
        }
        if self.settings.session_policy == SessionPolicy::ResetOnActivate {
            self.reset();
        }

        self.host.set_visible(true);
        self.host.attach_input();
        self.input.set_active(true);
        self.phase = LoopPhase::Running(self.host.request_frame());
        log::info!("Overlay activated (score {})", self.state.score);
    }

    /// Running → Idle. No-op when already idle.
    pub fn deactivate(&mut self) {
        let LoopPhase::Running(handle) = std::mem::replace(&mut self.phase, LoopPhase::Idle) else {
            return;
        };
        self.host.cancel_frame(handle);
        self.host.detach_input();
        self.host.set_visible(false);
        self.input.reset();
        self.input.set_active(false);
        log::info!("Overlay deactivated (score {})", self.state.score);
    }

    /// Start a fresh session without touching the loop state
    pub fn reset(&mut self) {
        let start = Vec2::from(self.settings.ship_start);
        self.state.reset(start);
        log::info!("Session reset");
    }

    /// Takes effect on the next activation
    pub fn set_session_policy(&mut self, policy: SessionPolicy) {
        self.settings.session_policy = policy;
        log::info!("Session policy: {}", policy.as_str());
    }

    /// Animation frame callback. Runs one tick, presents it and schedules
    /// the next frame. A callback arriving while idle is ignored.
    pub fn on_frame(&mut self, now: f64) -> Option<TickReport> {
        if !self.is_running() {
            log::debug!("Ignoring frame while idle");
            return None;
        }

        let bounds = self.host.bounds();
        let report = tick(
            &mut self.state,
            &self.input,
            bounds,
            &mut self.host,
            now,
            &self.settings,
        );

        let frame = Frame::capture(&self.state, now, &self.settings);
        self.host.present(&frame);

        self.phase = LoopPhase::Running(self.host.request_frame());
        Some(report)
    }

    pub fn key_down(&mut self, code: &str) -> KeyEffect {
        let effect = self.input.key_down(code);
        if effect == KeyEffect::Cancel {
            self.host.request_close();
        }
        effect
    }

    pub fn key_up(&mut self, code: &str) -> KeyEffect {
        self.input.key_up(code)
    }

    pub fn frame(&self, now: f64) -> Frame {
        Frame::capture(&self.state, now, &self.settings)
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: Host> Drop for Session<H> {
    fn drop(&mut self) {
        self.deactivate();
    }
}
