//! Browser host
//!
//! Binds a [`Session`] to the DOM: animation frames, document key events,
//! `elementsFromPoint` hit queries and inline-style hit flashes. JS embeds the
//! overlay through the exported [`DestroyerOverlay`] class.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{
    CssStyleDeclaration, Document, DomRect, Element, HtmlElement, KeyboardEvent, SvgElement,
    Window,
};

use super::flash::{FlashBook, InlineStyle};
use crate::frame::Frame;
use crate::session::{Host, Session};
use crate::settings::{SessionPolicy, Settings};
use crate::sim::Surface;
use crate::Bounds;

type SharedSession = Rc<RefCell<Session<DomHost>>>;

const SHIP_SVG: &str = r##"<svg viewBox="0 0 48 64" width="100%" height="100%">
<rect x="20" y="50" width="8" height="14" fill="#8B4513" stroke="#654321"/>
<rect x="22" y="20" width="4" height="30" fill="#FFD700" stroke="#FFA500"/>
<rect x="8" y="25" width="4" height="25" fill="#FFD700" stroke="#FFA500"/>
<rect x="36" y="25" width="4" height="25" fill="#FFD700" stroke="#FFA500"/>
<rect x="2" y="30" width="4" height="20" fill="#FFD700" stroke="#FFA500"/>
<rect x="42" y="30" width="4" height="20" fill="#FFD700" stroke="#FFA500"/>
<circle cx="4" cy="20" r="2" fill="#FF4500"/>
<circle cx="14" cy="18" r="2" fill="#FF4500"/>
<circle cx="24" cy="16" r="2" fill="#FF4500"/>
<circle cx="34" cy="18" r="2" fill="#FF4500"/>
<circle cx="44" cy="20" r="2" fill="#FF4500"/>
</svg>"##;

/// Closures registered with the browser. Installed once, after the session
/// exists, and shared between the host and the setup code.
#[derive(Default)]
struct Callbacks {
    frame: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    key_down: RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>,
    key_up: RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>,
}

impl InlineStyle for CssStyleDeclaration {
    fn get(&self, name: &str) -> String {
        self.get_property_value(name).unwrap_or_default()
    }

    fn set(&mut self, name: &str, value: &str) {
        let result = if value.is_empty() {
            self.remove_property(name).map(|_| ())
        } else {
            self.set_property(name, value)
        };
        if let Err(e) = result {
            log::warn!("Failed to set {}: {:?}", name, e);
        }
    }
}

/// Inline style of an HTML or SVG element. Other element kinds
/// (MathML and the like) have none we can reach.
fn inline_style(element: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        return Some(html.style());
    }
    element.dyn_ref::<SvgElement>().map(|svg| svg.style())
}

/// Elements the overlay draws into
struct DomView {
    score: Element,
    ship: HtmlElement,
    projectiles: Element,
    effects: Element,
    ship_half: (f32, f32),
    projectile_radius: f32,
}

impl DomView {
    fn build(
        document: &Document,
        overlay: &HtmlElement,
        settings: &Settings,
    ) -> Result<Self, JsValue> {
        let _ = overlay.style().set_property("cursor", "none");

        let hud = document.create_element("div")?;
        hud.set_attribute(
            "style",
            "position:absolute;top:16px;left:16px;z-index:10;padding:16px;border-radius:8px;\
             background:rgba(0,0,0,0.8);color:#fff;font-family:monospace;pointer-events:none",
        )?;
        hud.set_inner_html(
            "<div style=\"font-size:18px;font-weight:bold\">MENORAH DESTROYER</div>\
             <div data-role=\"score\" style=\"font-size:14px\">Score: 0</div>\
             <div style=\"font-size:12px;color:#9ca3af;margin-top:8px\">\
             WASD or Arrow Keys to move<br/>SPACEBAR to shoot<br/>ESC to exit</div>",
        );
        overlay.append_child(&hud)?;
        let score = hud
            .query_selector("[data-role=score]")?
            .ok_or_else(|| JsValue::from_str("score element missing"))?;

        let ship: HtmlElement = document.create_element("div")?.dyn_into()?;
        ship.set_attribute(
            "style",
            &format!(
                "position:absolute;width:{}px;height:{}px;z-index:20;pointer-events:none;\
                 transition:transform 0.1s ease",
                settings.ship_half_width * 2.0,
                settings.ship_half_height * 2.0
            ),
        )?;
        ship.set_inner_html(SHIP_SVG);
        overlay.append_child(&ship)?;

        let projectiles = document.create_element("div")?;
        overlay.append_child(&projectiles)?;
        let effects = document.create_element("div")?;
        overlay.append_child(&effects)?;

        Ok(Self {
            score,
            ship,
            projectiles,
            effects,
            ship_half: (settings.ship_half_width, settings.ship_half_height),
            projectile_radius: settings.projectile_radius,
        })
    }

    fn render(&self, frame: &Frame) {
        self.score.set_text_content(Some(&format!("Score: {}", frame.score)));

        let style = self.ship.style();
        let (left, top) = frame.ship.top_left(self.ship_half.0, self.ship_half.1);
        let _ = style.set_property("left", &format!("{}px", left));
        let _ = style.set_property("top", &format!("{}px", top));
        let _ = style.set_property("transform", &format!("rotate({}deg)", frame.ship.heading_deg));

        let mut html = String::new();
        for p in &frame.projectiles {
            let (left, top) = p.top_left(self.projectile_radius);
            let _ = write!(
                html,
                "<div style=\"position:absolute;left:{}px;top:{}px;width:{d}px;height:{d}px;\
                 border-radius:50%;background:#facc15;box-shadow:0 0 6px #ffff00;\
                 pointer-events:none\"></div>",
                left,
                top,
                d = self.projectile_radius * 2.0
            );
        }
        self.projectiles.set_inner_html(&html);

        html.clear();
        for e in &frame.effects {
            let (left, top) = e.top_left();
            let _ = write!(
                html,
                "<div style=\"position:absolute;left:{}px;top:{}px;width:{s}px;height:{s}px;\
                 opacity:{};border-radius:50%;pointer-events:none;\
                 background:radial-gradient(circle,#facc15,#f97316,#dc2626);\
                 box-shadow:0 0 {s}px #ff6600\"></div>",
                left,
                top,
                e.opacity,
                s = e.size
            );
        }
        self.effects.set_inner_html(&html);
    }
}

pub struct DomHost {
    window: Window,
    document: Document,
    overlay: HtmlElement,
    view: DomView,
    callbacks: Rc<Callbacks>,
    /// Shared with pending revert timeouts, which may outlive the host
    flashes: Rc<RefCell<FlashBook<Element>>>,
    on_close: js_sys::Function,
}

impl DomHost {
    fn new(
        overlay: HtmlElement,
        on_close: js_sys::Function,
        settings: &Settings,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let view = DomView::build(&document, &overlay, settings)?;

        let mut host = Self {
            window,
            document,
            overlay,
            view,
            callbacks: Rc::new(Callbacks::default()),
            flashes: Rc::new(RefCell::new(FlashBook::new())),
            on_close,
        };
        // Hidden until the first activation
        host.set_visible(false);
        Ok(host)
    }

    fn overlay_rect(&self) -> DomRect {
        self.overlay.get_bounding_client_rect()
    }

    fn listen(&self, kind: &str, closure: &RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>) {
        if let Some(cb) = closure.borrow().as_ref() {
            if let Err(e) = self
                .document
                .add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref())
            {
                log::warn!("Failed to add {} listener: {:?}", kind, e);
            }
        }
    }

    fn unlisten(&self, kind: &str, closure: &RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>) {
        if let Some(cb) = closure.borrow().as_ref() {
            let _ = self
                .document
                .remove_event_listener_with_callback(kind, cb.as_ref().unchecked_ref());
        }
    }
}

impl Surface for DomHost {
    type Element = Element;

    fn elements_at(&self, point: Vec2) -> Vec<Element> {
        let origin = self.overlay_rect();
        self.document
            .elements_from_point(point.x + origin.left() as f32, point.y + origin.top() as f32)
            .iter()
            .filter_map(|v| v.dyn_into::<Element>().ok())
            .collect()
    }

    fn is_own(&self, element: &Element) -> bool {
        let node: &web_sys::Node = element.as_ref();
        self.overlay.contains(Some(node))
    }

    fn center_of(&self, element: &Element) -> Option<Vec2> {
        let rect = element.get_bounding_client_rect();
        if rect.width() <= 0.0 && rect.height() <= 0.0 {
            return None;
        }
        let origin = self.overlay_rect();
        Some(Vec2::new(
            (rect.left() + rect.width() / 2.0 - origin.left()) as f32,
            (rect.top() + rect.height() / 2.0 - origin.top()) as f32,
        ))
    }

    fn disrupt(&mut self, element: &Element, revert_after_ms: u32) {
        let Some(mut style) = inline_style(element) else {
            log::debug!("No inline style on <{}>, not flashed", element.tag_name());
            return;
        };
        self.flashes.borrow_mut().flash(element.clone(), &mut style);

        // The revert owns its handles, so it runs even if the overlay is torn
        // down before the timeout fires
        let flashes = self.flashes.clone();
        let key = element.clone();
        let mut revert_style = style.clone();
        let revert = Closure::once_into_js(move || {
            flashes.borrow_mut().release(&key, &mut revert_style);
        });
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                revert.unchecked_ref(),
                revert_after_ms as i32,
            )
        {
            log::warn!("Failed to schedule flash revert: {:?}", e);
            self.flashes.borrow_mut().release(element, &mut style);
        }
    }
}

impl Host for DomHost {
    type FrameHandle = Option<i32>;

    fn bounds(&self) -> Option<Bounds> {
        let rect = self.overlay_rect();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return None;
        }
        Some(Bounds::new(rect.width() as f32, rect.height() as f32))
    }

    fn request_frame(&mut self) -> Option<i32> {
        let frame = self.callbacks.frame.borrow();
        let cb = frame.as_ref()?;
        match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: Option<i32>) {
        if let Some(id) = handle {
            let _ = self.window.cancel_animation_frame(id);
        }
    }

    fn attach_input(&mut self) {
        self.listen("keydown", &self.callbacks.key_down);
        self.listen("keyup", &self.callbacks.key_up);
    }

    fn detach_input(&mut self) {
        self.unlisten("keydown", &self.callbacks.key_down);
        self.unlisten("keyup", &self.callbacks.key_up);
    }

    fn set_visible(&mut self, visible: bool) {
        let style = self.overlay.style();
        let result = if visible {
            style.remove_property("display").map(|_| ())
        } else {
            style.set_property("display", "none")
        };
        if let Err(e) = result {
            log::warn!("Failed to change overlay visibility: {:?}", e);
        }
    }

    fn request_close(&mut self) {
        // Deferred: the close callback usually calls back into the overlay,
        // which is still borrowed by the key handler at this point
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&self.on_close, 0)
        {
            log::warn!("Failed to schedule close callback: {:?}", e);
        }
    }

    fn present(&mut self, frame: &Frame) {
        self.view.render(frame);
    }
}

fn install_callbacks(session: &SharedSession) {
    let callbacks = session.borrow().host().callbacks.clone();

    let weak = Rc::downgrade(session);
    *callbacks.frame.borrow_mut() = Some(Closure::<dyn FnMut(_)>::new(move |now: f64| {
        if let Some(session) = weak.upgrade() {
            session.borrow_mut().on_frame(now);
        }
    }));

    let weak = Rc::downgrade(session);
    let key_down = move |event: KeyboardEvent| {
        if let Some(session) = weak.upgrade() {
            let effect = session.borrow_mut().key_down(&event.code());
            if effect.prevents_default() {
                event.prevent_default();
            }
        }
    };
    *callbacks.key_down.borrow_mut() = Some(Closure::<dyn FnMut(_)>::new(key_down));

    let weak = Rc::downgrade(session);
    let key_up = move |event: KeyboardEvent| {
        if let Some(session) = weak.upgrade() {
            let effect = session.borrow_mut().key_up(&event.code());
            if effect.prevents_default() {
                event.prevent_default();
            }
        }
    };
    *callbacks.key_up.borrow_mut() = Some(Closure::<dyn FnMut(_)>::new(key_up));
}

/// The overlay as seen from JavaScript.
///
/// ```js
/// const overlay = new DestroyerOverlay(element, () => overlay.set_active(false));
/// overlay.set_active(true);
/// ```
#[wasm_bindgen]
pub struct DestroyerOverlay {
    session: SharedSession,
}

#[wasm_bindgen]
impl DestroyerOverlay {
    #[wasm_bindgen(constructor)]
    pub fn new(
        overlay: HtmlElement,
        on_close: js_sys::Function,
    ) -> Result<DestroyerOverlay, JsValue> {
        let settings = Settings::load();
        let host = DomHost::new(overlay, on_close, &settings)?;
        let session = Rc::new(RefCell::new(Session::new(host, settings)));
        install_callbacks(&session);
        log::info!("Destroyer overlay ready");
        Ok(Self { session })
    }

    /// Mirror the host's activation flag
    pub fn set_active(&self, active: bool) {
        match self.session.try_borrow_mut() {
            Ok(mut session) => session.set_active(active),
            Err(_) => log::warn!("set_active({}) ignored: overlay busy", active),
        }
    }

    /// Start a fresh session: zero score, no live entities
    pub fn reset(&self) {
        match self.session.try_borrow_mut() {
            Ok(mut session) => session.reset(),
            Err(_) => log::warn!("reset ignored: overlay busy"),
        }
    }

    /// Choose what re-activation does (`"persist"` or `"reset"`) and remember
    /// it in LocalStorage. Returns `false` for an unknown policy name.
    pub fn set_session_policy(&self, policy: &str) -> bool {
        let Some(policy) = SessionPolicy::from_str(policy) else {
            log::warn!("Unknown session policy {:?}", policy);
            return false;
        };
        match self.session.try_borrow_mut() {
            Ok(mut session) => {
                session.set_session_policy(policy);
                session.settings().save();
                true
            }
            Err(_) => {
                log::warn!("set_session_policy ignored: overlay busy");
                false
            }
        }
    }

    pub fn session_policy(&self) -> String {
        self.session.borrow().settings().session_policy.as_str().to_string()
    }

    pub fn score(&self) -> f64 {
        self.session.borrow().score() as f64
    }

    pub fn is_running(&self) -> bool {
        self.session.borrow().is_running()
    }

    /// Current frame as JSON, for hosts that render it themselves
    pub fn snapshot(&self) -> String {
        // Same clock as the animation frame timestamps
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0);
        let frame = self.session.borrow().frame(now);
        serde_json::to_string(&frame).unwrap_or_default()
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
}
