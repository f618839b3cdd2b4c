//! Timeline dock state - everything the toolbar shows that is not playback.
//!
//! Holds the resolution text, the timeline/render pane selection, the local
//! pivot flag mirror and whether a scene is active. Playback enablement is
//! derived from the preview controller's state on every query, so nothing
//! here has to be re-synchronized when a preview notification arrives.

use super::document::Document;
use crate::core::playback::{PlaybackCommand, PlaybackState};
use log::debug;
use serde::{Deserialize, Serialize};

/// Resolution presets offered by the toolbar combo.
pub const RESOLUTION_PRESETS: [&str; 4] = ["100 %", "75 %", "50 %", "25 %"];

const MIN_RESOLUTION_PERCENT: f64 = 1.0;
const MAX_RESOLUTION_PERCENT: f64 = 200.0;

/// Parse resolution text like `"75 %"` or `"75%"` into a fraction in `[0.01, 2.0]`.
///
/// Unparsable text counts as 0 % and therefore clamps to the minimum.
pub fn parse_resolution_text(text: &str) -> f64 {
    let percent = text
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);
    percent.clamp(MIN_RESOLUTION_PERCENT, MAX_RESOLUTION_PERCENT) / 100.0
}

/// Format a resolution fraction for the combo: `0.75` -> `"75 %"`.
pub fn format_resolution(fraction: f64) -> String {
    let percent = (fraction * 100.0 * 1000.0).round() / 1000.0;
    format!("{} %", percent)
}

/// Which pane the dock shows under its toolbar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DockMode {
    #[default]
    Timeline,
    Render,
}

/// Glyph and tooltip for a toolbar button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlAppearance {
    pub glyph: &'static str,
    pub tooltip: &'static str,
}

pub const STOP_APPEARANCE: ControlAppearance = ControlAppearance {
    glyph: "■",
    tooltip: "stop preview",
};

/// Appearance of the primary control for a given command.
pub fn primary_appearance(command: PlaybackCommand) -> ControlAppearance {
    match command {
        PlaybackCommand::StartRender => ControlAppearance {
            glyph: "▶",
            tooltip: "render preview",
        },
        PlaybackCommand::Pause => ControlAppearance {
            glyph: "⏸",
            tooltip: "pause preview",
        },
        PlaybackCommand::Play => ControlAppearance {
            glyph: "▶",
            tooltip: "play preview",
        },
        PlaybackCommand::Resume => ControlAppearance {
            glyph: "▶",
            tooltip: "resume preview",
        },
    }
}

/// Keys the dock reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DockKey {
    Left,
    Right,
    Up,
    Down,
    P,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers {
        ctrl: false,
        alt: false,
        shift: false,
    };
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineDock {
    resolution_text: String,
    mode: DockMode,
    local_pivot: bool,
    has_scene: bool,
}

impl Default for TimelineDock {
    fn default() -> Self {
        Self::new(RESOLUTION_PRESETS[0], DockMode::Timeline)
    }
}

impl TimelineDock {
    pub fn new(resolution_text: &str, mode: DockMode) -> Self {
        Self {
            resolution_text: resolution_text.to_string(),
            mode,
            local_pivot: false,
            has_scene: false,
        }
    }

    // === Resolution ===

    pub fn resolution_text(&self) -> &str {
        &self.resolution_text
    }

    /// User edited the resolution: keep the raw text, push the clamped fraction.
    pub fn set_resolution_text(&mut self, text: &str, document: &mut dyn Document) -> f64 {
        self.resolution_text = text.to_string();
        let fraction = parse_resolution_text(text);
        debug!("Resolution '{}' -> {}", text, fraction);
        document.set_resolution_fraction(fraction);
        fraction
    }

    /// Active scene changed: refresh enablement, resolution and pivot from the
    /// document. The resolution is only displayed, never written back.
    pub fn sync_from_document(&mut self, document: &dyn Document) {
        self.has_scene = document.has_active_scene();
        if let Some(fraction) = document.resolution_fraction() {
            self.resolution_text = format_resolution(fraction);
        }
        self.local_pivot = document.local_pivot();
    }

    // === Pane mode ===

    pub fn mode(&self) -> DockMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DockMode) {
        if self.mode != mode {
            debug!("Dock mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    pub fn set_timeline_mode(&mut self) {
        self.set_mode(DockMode::Timeline);
    }

    pub fn set_render_mode(&mut self) {
        self.set_mode(DockMode::Render);
    }

    /// The action for the pane already shown stays checked and disabled.
    pub fn is_mode_action_enabled(&self, mode: DockMode) -> bool {
        self.mode != mode
    }

    // === Playback controls ===

    pub fn has_scene(&self) -> bool {
        self.has_scene
    }

    pub fn is_play_enabled(&self) -> bool {
        self.has_scene
    }

    pub fn is_stop_enabled(&self, playback: PlaybackState) -> bool {
        self.has_scene && playback.is_stop_enabled()
    }

    // === Local pivot ===

    pub fn local_pivot(&self) -> bool {
        self.local_pivot
    }

    pub fn set_local_pivot(&mut self, local: bool, document: &mut dyn Document) {
        self.local_pivot = local;
        document.set_local_pivot(local);
    }

    pub fn toggle_local_pivot(&mut self, document: &mut dyn Document) -> bool {
        let local = !self.local_pivot;
        self.set_local_pivot(local, document);
        local
    }

    // === Shortcuts ===

    /// Handle a key press while the dock has focus. Returns true if consumed.
    pub fn process_key_press(
        &mut self,
        key: DockKey,
        modifiers: KeyModifiers,
        document: &mut dyn Document,
    ) -> bool {
        if modifiers.ctrl {
            return false;
        }
        match key {
            DockKey::Right => document.inc_active_scene_frame(),
            DockKey::Left => document.dec_active_scene_frame(),
            DockKey::Down | DockKey::Up => {
                if !document.has_active_scene() {
                    return false;
                }
                let frame = document.active_scene_frame();
                let target = if key == DockKey::Down {
                    document.prev_key_frame(frame)
                } else {
                    document.next_key_frame(frame)
                };
                if let Some(target) = target {
                    document.set_active_scene_frame(target);
                }
            }
            DockKey::P => {
                if modifiers.alt {
                    return false;
                }
                self.toggle_local_pivot(document);
            }
        }
        true
    }
}
