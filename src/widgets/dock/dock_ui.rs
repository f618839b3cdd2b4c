//! Timeline dock - egui rendering
//!
//! Draws the toolbar from the dock model and the controller's current state
//! every frame. Buttons never change state themselves: each one dispatches a
//! single fixed event, and the shell decides what it means right now.
//! Data flow: egui input -> dispatch(BoxedEvent) -> EventBus -> shell.

use super::dock::{
    DockKey, DockMode, KeyModifiers, RESOLUTION_PRESETS, STOP_APPEARANCE, TimelineDock,
    primary_appearance,
};
use super::dock_events::{
    DockModeSelectedEvent, LocalPivotToggledEvent, PrimaryControlPressedEvent,
    ResolutionTextChangedEvent, StopControlPressedEvent,
};
use crate::core::event_bus::BoxedEvent;
use crate::core::playback::PlaybackState;
use eframe::egui::{self, Ui};

/// Render the dock toolbar: resolution, play/stop, pivot, pane mode.
pub fn render_toolbar(
    ui: &mut Ui,
    dock: &TimelineDock,
    playback: PlaybackState,
    mut dispatch: impl FnMut(BoxedEvent),
) {
    ui.horizontal(|ui| {
        ui.label("Resolution:");

        let mut text = dock.resolution_text().to_string();
        let response = ui.add(egui::TextEdit::singleline(&mut text).desired_width(56.0));
        if response.changed() {
            dispatch(Box::new(ResolutionTextChangedEvent(text)));
        }
        egui::ComboBox::from_id_salt("dock_resolution_presets")
            .selected_text("")
            .width(16.0)
            .show_ui(ui, |ui| {
                for preset in RESOLUTION_PRESETS {
                    let selected = dock.resolution_text() == preset;
                    if ui.selectable_label(selected, preset).clicked() && !selected {
                        dispatch(Box::new(ResolutionTextChangedEvent(preset.to_string())));
                    }
                }
            });

        ui.separator();

        let primary = primary_appearance(playback.primary_command());
        if ui
            .add_enabled(dock.is_play_enabled(), egui::Button::new(primary.glyph))
            .on_hover_text(primary.tooltip)
            .clicked()
        {
            dispatch(Box::new(PrimaryControlPressedEvent));
        }
        if ui
            .add_enabled(
                dock.is_stop_enabled(playback),
                egui::Button::new(STOP_APPEARANCE.glyph),
            )
            .on_hover_text(STOP_APPEARANCE.tooltip)
            .clicked()
        {
            dispatch(Box::new(StopControlPressedEvent));
        }

        ui.separator();

        let mut local = dock.local_pivot();
        let pivot_label = if local { "Pivot: local" } else { "Pivot: global" };
        if ui
            .toggle_value(&mut local, pivot_label)
            .on_hover_text("pivot global/local (P)")
            .changed()
        {
            dispatch(Box::new(LocalPivotToggledEvent(local)));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            // right_to_left: last added appears leftmost
            for (mode, label) in [(DockMode::Render, "Render"), (DockMode::Timeline, "Timeline")] {
                let button = egui::Button::new(label).selected(dock.mode() == mode);
                if ui
                    .add_enabled(dock.is_mode_action_enabled(mode), button)
                    .clicked()
                {
                    dispatch(Box::new(DockModeSelectedEvent(mode)));
                }
            }
        });
    });
}

/// Collect dock shortcut presses from this frame's input.
///
/// Skipped while a text field has keyboard focus so typing a resolution
/// does not scrub the timeline.
pub fn collect_key_presses(ctx: &egui::Context) -> Vec<(DockKey, KeyModifiers)> {
    if ctx.wants_keyboard_input() {
        return Vec::new();
    }
    ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => map_key(*key).map(|k| (k, map_modifiers(*modifiers))),
                _ => None,
            })
            .collect()
    })
}

fn map_key(key: egui::Key) -> Option<DockKey> {
    match key {
        egui::Key::ArrowLeft => Some(DockKey::Left),
        egui::Key::ArrowRight => Some(DockKey::Right),
        egui::Key::ArrowUp => Some(DockKey::Up),
        egui::Key::ArrowDown => Some(DockKey::Down),
        egui::Key::P => Some(DockKey::P),
        _ => None,
    }
}

fn map_modifiers(modifiers: egui::Modifiers) -> KeyModifiers {
    KeyModifiers {
        ctrl: modifiers.ctrl || modifiers.mac_cmd,
        alt: modifiers.alt,
        shift: modifiers.shift,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_key_covers_shortcuts_only() {
        assert_eq!(map_key(egui::Key::ArrowUp), Some(DockKey::Up));
        assert_eq!(map_key(egui::Key::P), Some(DockKey::P));
        assert_eq!(map_key(egui::Key::Space), None);
    }

    #[test]
    fn test_map_modifiers_treats_cmd_as_ctrl() {
        let mods = egui::Modifiers {
            mac_cmd: true,
            ..Default::default()
        };
        assert!(map_modifiers(mods).ctrl);
        assert!(map_modifiers(egui::Modifiers::ALT).alt);
    }
}
