//! Core preview modules - events, playback state machine, render engine
//!
//! These modules form the preview engine plumbing, independent of UI.

pub mod event_bus;
pub mod playback;
pub mod preview_engine;
pub mod preview_events;
pub mod render_handler;

// Re-exports for convenience
pub use event_bus::EventBus;
pub use playback::{PlaybackCommand, PlaybackState, PreviewNotification, PreviewPlaybackController};
pub use preview_engine::{EngineStatus, PreviewEngine};
pub use render_handler::{BusRenderHandler, RenderHandler, RenderRequest};
