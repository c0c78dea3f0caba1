//! User settings for chatglue
//!
//! This module defines the `Settings` struct that holds every
//! user-configurable option of the page behaviors, with serde support
//! for JSON persistence. The defaults reproduce the behavior of the
//! original page script: a 5 second alert lifetime, a 2 second submit
//! lockout, and the `X-CSRFToken` header convention.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// All user-configurable options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // CSRF
    // ─────────────────────────────────────────────────────────────────────────
    /// Name attribute of the meta tag carrying the CSRF token
    pub csrf_meta_name: String,

    /// Header under which the token is attached to non-GET requests
    pub csrf_header_name: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Timers
    // ─────────────────────────────────────────────────────────────────────────
    /// How long an alert banner stays on screen before auto-dismissal (ms)
    pub alert_dismiss_delay_ms: u64,

    /// How long a submit button stays disabled after a submission (ms)
    pub submit_restore_delay_ms: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Form & Textarea Behavior
    // ─────────────────────────────────────────────────────────────────────────
    /// Icon class shown on a submit button while a submission is pending
    pub spinner_icon_class: String,

    /// Line height used to derive a textarea's scroll height (px)
    pub textarea_line_height_px: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            csrf_meta_name: "csrf-token".to_string(),
            csrf_header_name: "X-CSRFToken".to_string(),
            alert_dismiss_delay_ms: 5000,
            submit_restore_delay_ms: 2000,
            spinner_icon_class: "fas fa-spinner fa-spin".to_string(),
            textarea_line_height_px: 24,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum allowed timer delay.
    pub const MIN_DELAY_MS: u64 = 100;
    /// Maximum allowed timer delay.
    pub const MAX_DELAY_MS: u64 = 60_000;
    /// Minimum allowed textarea line height.
    pub const MIN_LINE_HEIGHT_PX: u32 = 8;
    /// Maximum allowed textarea line height.
    pub const MAX_LINE_HEIGHT_PX: u32 = 96;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.alert_dismiss_delay_ms = self
            .alert_dismiss_delay_ms
            .clamp(Self::MIN_DELAY_MS, Self::MAX_DELAY_MS);

        self.submit_restore_delay_ms = self
            .submit_restore_delay_ms
            .clamp(Self::MIN_DELAY_MS, Self::MAX_DELAY_MS);

        self.textarea_line_height_px = self
            .textarea_line_height_px
            .clamp(Self::MIN_LINE_HEIGHT_PX, Self::MAX_LINE_HEIGHT_PX);

        // Empty names would silently disable CSRF injection; fall back
        // to the conventional ones instead.
        if self.csrf_meta_name.trim().is_empty() {
            self.csrf_meta_name = "csrf-token".to_string();
        }
        if self.csrf_header_name.trim().is_empty() {
            self.csrf_header_name = "X-CSRFToken".to_string();
        }
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
