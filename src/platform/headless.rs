//! Headless host
//!
//! A fake page made of rectangles with a manually advanced clock. Used by the
//! native binary to run scripted sessions and by tests.

use std::collections::BTreeMap;

use glam::Vec2;

use super::flash::{FlashBook, InlineStyle};
use crate::frame::Frame;
use crate::session::Host;
use crate::sim::Surface;
use crate::Bounds;

/// An axis-aligned page element
#[derive(Debug, Clone, PartialEq)]
pub struct PageRect {
    pub id: u32,
    pub label: String,
    pub min: Vec2,
    pub max: Vec2,
    /// Belongs to the overlay
    pub own: bool,
    /// Inline style properties, as a page script would have set them
    pub style: BTreeMap<String, String>,
}

impl PageRect {
    pub fn new(id: u32, label: &str, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            id,
            label: label.to_string(),
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
            own: false,
            style: BTreeMap::new(),
        }
    }

    fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

impl InlineStyle for BTreeMap<String, String> {
    fn get(&self, name: &str) -> String {
        BTreeMap::get(self, name).cloned().unwrap_or_default()
    }

    fn set(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.remove(name);
        } else {
            self.insert(name.to_string(), value.to_string());
        }
    }
}

/// A scheduled flash revert
#[derive(Debug, Clone, Copy, PartialEq)]
struct Revert {
    element: u32,
    revert_at: f64,
}

#[derive(Debug)]
pub struct HeadlessHost {
    bounds: Option<Bounds>,
    /// Later entries are stacked on top
    rects: Vec<PageRect>,
    clock: f64,
    flashes: FlashBook<u32>,
    reverts: Vec<Revert>,
    next_frame: u64,
    pending_frame: Option<u64>,
    listening: bool,
    visible: bool,
    close_requested: bool,
    last_frame: Option<Frame>,
}

impl HeadlessHost {
    pub fn new(bounds: Bounds, rects: Vec<PageRect>) -> Self {
        Self {
            bounds: Some(bounds),
            rects,
            clock: 0.0,
            flashes: FlashBook::new(),
            reverts: Vec::new(),
            next_frame: 0,
            pending_frame: None,
            listening: false,
            visible: false,
            close_requested: false,
            last_frame: None,
        }
    }

    /// Resize the page; `None` simulates a host that cannot report its size
    pub fn set_bounds(&mut self, bounds: Option<Bounds>) {
        self.bounds = bounds;
    }

    /// Move the clock forward and revert flashes whose delay ran out
    pub fn advance_clock(&mut self, now: f64) {
        self.clock = now;
        let (due, pending): (Vec<Revert>, Vec<Revert>) = std::mem::take(&mut self.reverts)
            .into_iter()
            .partition(|r| r.revert_at <= now);
        self.reverts = pending;
        for revert in due {
            if let Some(rect) = self.rects.iter_mut().find(|r| r.id == revert.element) {
                self.flashes.release(&rect.id, &mut rect.style);
            }
        }
    }

    pub fn is_flashing(&self, element: u32) -> bool {
        self.flashes.is_flashing(&element)
    }

    /// Whether the overlay is shown over the page
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Returns and clears the close request flag
    pub fn take_close_request(&mut self) -> bool {
        std::mem::take(&mut self.close_requested)
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn rect(&self, id: u32) -> Option<&PageRect> {
        self.rects.iter().find(|r| r.id == id)
    }
}

impl Surface for HeadlessHost {
    type Element = u32;

    fn elements_at(&self, point: Vec2) -> Vec<u32> {
        self.rects
            .iter()
            .rev()
            .filter(|r| r.contains(point))
            .map(|r| r.id)
            .collect()
    }

    fn is_own(&self, element: &u32) -> bool {
        self.rect(*element).is_some_and(|r| r.own)
    }

    fn center_of(&self, element: &u32) -> Option<Vec2> {
        self.rect(*element).map(|r| (r.min + r.max) / 2.0)
    }

    fn disrupt(&mut self, element: &u32, revert_after_ms: u32) {
        let Some(rect) = self.rects.iter_mut().find(|r| r.id == *element) else {
            return;
        };
        log::debug!("Hit {} ({})", rect.label, rect.id);
        self.flashes.flash(rect.id, &mut rect.style);
        self.reverts.push(Revert {
            element: rect.id,
            revert_at: self.clock + revert_after_ms as f64,
        });
    }
}

impl Host for HeadlessHost {
    type FrameHandle = u64;

    fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    fn request_frame(&mut self) -> u64 {
        self.next_frame += 1;
        self.pending_frame = Some(self.next_frame);
        self.next_frame
    }

    fn cancel_frame(&mut self, handle: u64) {
        if self.pending_frame == Some(handle) {
            self.pending_frame = None;
        }
    }

    fn attach_input(&mut self) {
        self.listening = true;
    }

    fn detach_input(&mut self) {
        self.listening = false;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn request_close(&mut self) {
        self.close_requested = true;
    }

    fn present(&mut self, frame: &Frame) {
        self.last_frame = Some(frame.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Session, Settings};

    fn page() -> HeadlessHost {
        let mut overlay = PageRect::new(0, "overlay", 0.0, 0.0, 800.0, 600.0);
        overlay.own = true;
        HeadlessHost::new(
            Bounds::new(800.0, 600.0),
            vec![
                PageRect::new(1, "panel", 150.0, 60.0, 200.0, 80.0),
                overlay,
            ],
        )
    }

    fn inline(host: &HeadlessHost, id: u32, name: &str) -> String {
        InlineStyle::get(&host.rect(id).unwrap().style, name)
    }

    #[test]
    fn test_overlay_never_scores() {
        let host = page();
        assert_eq!(host.elements_at(Vec2::new(400.0, 400.0)), vec![0]);
        assert!(host.is_own(&0));
        assert!(!host.is_own(&1));
    }

    #[test]
    fn test_flash_reverts_after_delay() {
        let mut host = page();
        host.advance_clock(1000.0);
        host.disrupt(&1, 500);
        host.advance_clock(1499.0);
        assert!(host.is_flashing(1));
        host.advance_clock(1500.0);
        assert!(!host.is_flashing(1));
    }

    #[test]
    fn test_flash_restores_page_styles() {
        let mut host = page();
        host.rects[0].style.insert("transform".into(), "rotate(3deg)".into());
        let original = host.rects[0].style.clone();

        host.disrupt(&1, 500);
        assert_eq!(inline(&host, 1, "transform"), "scale(0.95)");
        assert_eq!(inline(&host, 1, "transition"), "all 0.3s ease");

        // Second hit before the first revert
        host.advance_clock(300.0);
        host.disrupt(&1, 500);
        host.advance_clock(500.0);
        assert!(host.is_flashing(1));
        assert_eq!(inline(&host, 1, "filter"), "blur(2px) brightness(1.5)");

        host.advance_clock(800.0);
        assert!(!host.is_flashing(1));
        assert_eq!(host.rect(1).unwrap().style, original);
    }

    #[test]
    fn test_overlay_hidden_while_idle() {
        let mut session = Session::new(page(), Settings::default());
        assert!(!session.host().is_visible());
        session.activate();
        assert!(session.host().is_visible());
        session.key_down("Escape");
        if session.host_mut().take_close_request() {
            session.set_active(false);
        }
        assert!(!session.host().is_visible());
    }

    #[test]
    fn test_flash_reverts_after_deactivation() {
        let mut session = Session::new(page(), Settings::default());
        session.activate();
        session.key_down("Space");

        let mut now = 0.0;
        while session.score() == 0 {
            now += 16.0;
            session.host_mut().advance_clock(now);
            session.on_frame(now);
        }
        assert!(session.host().is_flashing(1));

        session.deactivate();
        assert!(!session.host().has_pending_frame());
        assert!(!session.host().is_listening());

        // No more ticks, the page still recovers
        session.host_mut().advance_clock(now + 500.0);
        assert!(!session.host().is_flashing(1));
    }

    #[test]
    fn test_escape_raises_close_request() {
        let mut session = Session::new(page(), Settings::default());
        session.activate();
        session.key_down("Escape");
        assert!(session.host_mut().take_close_request());
        assert!(!session.host_mut().take_close_request());
    }
}
