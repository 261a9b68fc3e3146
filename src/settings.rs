//! Overlay settings and tuning
//!
//! Persisted in LocalStorage as JSON. Missing fields fall back to the
//! defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What happens to an existing session when the overlay is re-activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionPolicy {
    /// Score, ship and live entities carry over from the last activation
    #[default]
    Persist,
    /// Every activation starts a fresh session
    ResetOnActivate,
}

impl SessionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPolicy::Persist => "Persist",
            SessionPolicy::ResetOnActivate => "ResetOnActivate",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "persist" => Some(SessionPolicy::Persist),
            "reset" | "resetonactivate" | "reset_on_activate" => {
                Some(SessionPolicy::ResetOnActivate)
            }
            _ => None,
        }
    }
}

/// Overlay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Ship ===
    /// Distance moved per tick while a direction is held
    pub move_speed: f32,
    /// Half extents used to keep the ship on the surface
    pub ship_half_width: f32,
    pub ship_half_height: f32,
    /// Where a fresh session places the ship
    pub ship_start: (f32, f32),

    // === Projectiles ===
    /// Distance travelled per tick
    pub projectile_speed: f32,
    pub projectile_radius: f32,

    // === Effects ===
    pub effect_lifetime_ms: f64,
    pub effect_growth_ms_per_px: f64,
    pub effect_max_size: f32,

    // === Contacts ===
    /// Delay before the hit flash on a foreign element reverts
    pub disruption_revert_ms: u32,
    pub contact_reward: u64,

    // === Session ===
    pub session_policy: SessionPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            move_speed: SHIP_MOVE_SPEED,
            ship_half_width: SHIP_HALF_WIDTH,
            ship_half_height: SHIP_HALF_HEIGHT,
            ship_start: SHIP_START,

            projectile_speed: PROJECTILE_SPEED,
            projectile_radius: PROJECTILE_RADIUS,

            effect_lifetime_ms: EFFECT_LIFETIME_MS,
            effect_growth_ms_per_px: EFFECT_GROWTH_MS_PER_PX,
            effect_max_size: EFFECT_MAX_SIZE,

            disruption_revert_ms: DISRUPTION_REVERT_MS,
            contact_reward: CONTACT_REWARD,

            session_policy: SessionPolicy::Persist,
        }
    }
}

impl Settings {
    /// Parse settings JSON, falling back to defaults if it is unreadable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "destroyer_overlay_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "move_speed": 7.5, "session_policy": "ResetOnActivate" }"#);
        assert_eq!(settings.move_speed, 7.5);
        assert_eq!(settings.session_policy, SessionPolicy::ResetOnActivate);
        assert_eq!(settings.projectile_speed, PROJECTILE_SPEED);
        assert_eq!(settings.contact_reward, CONTACT_REWARD);
    }

    #[test]
    fn test_garbage_json_falls_back() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(SessionPolicy::from_str("RESET"), Some(SessionPolicy::ResetOnActivate));
        assert_eq!(SessionPolicy::from_str("persist"), Some(SessionPolicy::Persist));
        assert_eq!(SessionPolicy::from_str("sometimes"), None);
    }

    #[test]
    fn test_policy_names_parse_back() {
        for policy in [SessionPolicy::Persist, SessionPolicy::ResetOnActivate] {
            assert_eq!(SessionPolicy::from_str(policy.as_str()), Some(policy));
        }
    }
}
