//! Timeline dock preview controls
//!
//! Re-exports all modules for use by binary targets.

// Core engine (events, playback state machine, simulated renderer)
pub mod core;

// App modules
pub mod cli;
pub mod config;
pub mod shell;
pub mod widgets;

// Re-export commonly used types from core
pub use crate::core::event_bus::{BoxedEvent, EventBus, EventEmitter, downcast_event};
pub use crate::core::playback::{PlaybackCommand, PlaybackState, PreviewNotification, PreviewPlaybackController};
pub use crate::core::render_handler::{RenderHandler, RenderRequest};

// Re-export widgets
pub use widgets::dock::{Document, TimelineDock};
