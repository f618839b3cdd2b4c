//! Preview lifecycle events.
//!
//! Notifications travel engine -> dock, requests travel dock -> engine.
//! Both directions go through the [`EventBus`](super::event_bus::EventBus)
//! and are drained by the main loop.

use super::event_bus::{BoxedEvent, downcast_event};
use super::playback::PreviewNotification;
use super::render_handler::RenderRequest;

// === Notifications (engine -> dock) ===

#[derive(Clone, Debug)]
pub struct PreviewFinishedEvent;

#[derive(Clone, Debug)]
pub struct PreviewPlayingEvent;

#[derive(Clone, Debug)]
pub struct PreviewRenderingEvent;

#[derive(Clone, Debug)]
pub struct PreviewPausedEvent;

// === Requests (dock -> engine) ===

#[derive(Clone, Debug)]
pub struct RenderPreviewEvent;

#[derive(Clone, Debug)]
pub struct PausePreviewEvent;

#[derive(Clone, Debug)]
pub struct PlayPreviewEvent;

#[derive(Clone, Debug)]
pub struct ResumePreviewEvent;

#[derive(Clone, Debug)]
pub struct InterruptPreviewEvent;

impl PreviewNotification {
    pub fn into_event(self) -> BoxedEvent {
        match self {
            Self::Finished => Box::new(PreviewFinishedEvent),
            Self::Playing => Box::new(PreviewPlayingEvent),
            Self::Rendering => Box::new(PreviewRenderingEvent),
            Self::Paused => Box::new(PreviewPausedEvent),
        }
    }

    /// Recognize a queued notification event.
    pub fn from_event(event: &BoxedEvent) -> Option<Self> {
        if downcast_event::<PreviewFinishedEvent>(event).is_some() {
            Some(Self::Finished)
        } else if downcast_event::<PreviewPlayingEvent>(event).is_some() {
            Some(Self::Playing)
        } else if downcast_event::<PreviewRenderingEvent>(event).is_some() {
            Some(Self::Rendering)
        } else if downcast_event::<PreviewPausedEvent>(event).is_some() {
            Some(Self::Paused)
        } else {
            None
        }
    }
}

impl RenderRequest {
    pub fn into_event(self) -> BoxedEvent {
        match self {
            Self::Render => Box::new(RenderPreviewEvent),
            Self::Pause => Box::new(PausePreviewEvent),
            Self::Play => Box::new(PlayPreviewEvent),
            Self::Resume => Box::new(ResumePreviewEvent),
            Self::Interrupt => Box::new(InterruptPreviewEvent),
        }
    }

    /// Recognize a queued request event.
    pub fn from_event(event: &BoxedEvent) -> Option<Self> {
        if downcast_event::<RenderPreviewEvent>(event).is_some() {
            Some(Self::Render)
        } else if downcast_event::<PausePreviewEvent>(event).is_some() {
            Some(Self::Pause)
        } else if downcast_event::<PlayPreviewEvent>(event).is_some() {
            Some(Self::Play)
        } else if downcast_event::<ResumePreviewEvent>(event).is_some() {
            Some(Self::Resume)
        } else if downcast_event::<InterruptPreviewEvent>(event).is_some() {
            Some(Self::Interrupt)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_and_requests_do_not_overlap() {
        for n in PreviewNotification::ALL {
            let event = n.into_event();
            assert_eq!(PreviewNotification::from_event(&event), Some(n));
            assert_eq!(RenderRequest::from_event(&event), None);
        }
        for r in RenderRequest::ALL {
            let event = r.into_event();
            assert_eq!(RenderRequest::from_event(&event), Some(r));
            assert_eq!(PreviewNotification::from_event(&event), None);
        }
    }

    #[test]
    fn test_foreign_event_is_ignored() {
        let event: BoxedEvent = Box::new(42_u32);
        assert_eq!(PreviewNotification::from_event(&event), None);
        assert_eq!(RenderRequest::from_event(&event), None);
    }
}
