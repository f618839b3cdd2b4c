//! Timeline dock widget - preview toolbar over the timeline/render panes
//!
//! `dock.rs` holds the toolbar model, `dock_ui.rs` draws it with egui and
//! `document.rs` describes the document collaborator it drives.

mod dock;
pub mod dock_events;
mod dock_ui;
pub mod document;

pub use dock::{
    ControlAppearance, DockKey, DockMode, KeyModifiers, RESOLUTION_PRESETS, STOP_APPEARANCE,
    TimelineDock, format_resolution, parse_resolution_text, primary_appearance,
};
pub use document::{Document, InMemoryDocument};
pub use dock_ui::{collect_key_presses, render_toolbar};
