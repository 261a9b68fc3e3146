//! Destroyer Overlay entry point
//!
//! The browser build is a library (`DestroyerOverlay` in `platform::web`).
//! Natively this runs a scripted headless session and prints the last frame.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use destroyer_overlay::platform::{HeadlessHost, PageRect};
    use destroyer_overlay::{Bounds, Session, Settings};

    env_logger::init();
    log::info!("Destroyer Overlay (native) starting...");

    let mut overlay = PageRect::new(0, "overlay", 0.0, 0.0, 800.0, 600.0);
    overlay.own = true;
    let page = vec![
        PageRect::new(1, "price-chart", 260.0, 40.0, 320.0, 180.0),
        PageRect::new(2, "buy-button", 300.0, 90.0, 80.0, 30.0),
        PageRect::new(3, "wallet-list", 40.0, 380.0, 300.0, 160.0),
        overlay,
    ];
    let host = HeadlessHost::new(Bounds::new(800.0, 600.0), page);
    let mut session = Session::new(host, Settings::load());

    // (frame, key, pressed)
    let script: &[(u32, &str, bool)] = &[
        (1, "Space", true),
        (40, "KeyS", true),
        (90, "KeyS", false),
        (90, "KeyA", true),
        (130, "KeyA", false),
        (160, "KeyS", true),
        (200, "KeyS", false),
        (200, "ArrowRight", true),
        (240, "Space", false),
        (240, "ArrowRight", false),
        (300, "Escape", true),
    ];

    session.set_active(true);

    let mut frame = 0u32;
    let mut now = 0.0;
    while session.host().has_pending_frame() {
        frame += 1;
        now += 1000.0 / 60.0;

        for &(at, code, pressed) in script.iter().filter(|(at, _, _)| *at == frame) {
            log::debug!("frame {}: {} {}", at, code, if pressed { "down" } else { "up" });
            if pressed {
                session.key_down(code);
            } else {
                session.key_up(code);
            }
        }
        if session.host_mut().take_close_request() {
            session.set_active(false);
            break;
        }

        session.host_mut().advance_clock(now);
        session.on_frame(now);
    }

    log::info!(
        "Session closed after {} frames, score {}, overlay {}",
        frame,
        session.score(),
        if session.host().is_visible() { "shown" } else { "hidden" }
    );
    match serde_json::to_string_pretty(&session.frame(now)) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize frame: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
