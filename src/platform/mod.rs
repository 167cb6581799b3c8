//! Platform adapters
//!
//! The browser adapter supplies the canvas surface, input normalisation,
//! control widgets and the display-refresh loop. Native builds run headless
//! from the binary and need no adapter.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::ActionError;

/// How long a pressed control shows its feedback class
pub const PRESS_FLASH_MS: i32 = 200;

/// Class to flash on a pressed control: `clicked` when the action ran,
/// `denied` when it was refused. Debounced presses get no feedback.
pub fn press_feedback(result: &Result<(), ActionError>) -> Option<&'static str> {
    match result {
        Ok(()) => Some("clicked"),
        Err(ActionError::Debounced) => None,
        Err(_) => Some("denied"),
    }
}

/// CSS color string for an RGBA color
pub fn css_color(color: crate::renderer::Color) -> String {
    let [r, g, b, a] = color;
    format!(
        "rgba({}, {}, {}, {})",
        (r.clamp(0.0, 1.0) * 255.0).round() as u8,
        (g.clamp(0.0, 1.0) * 255.0).round() as u8,
        (b.clamp(0.0, 1.0) * 255.0).round() as u8,
        a.clamp(0.0, 1.0)
    )
}
