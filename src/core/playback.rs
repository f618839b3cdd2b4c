//! Preview playback state machine.
//!
//! The controller remembers the last lifecycle notification the render
//! engine reported and derives from it what the dock's primary control
//! should do next and whether the stop control is usable.
//!
//! | Notification | State       | Primary command | Stop enabled |
//! |--------------|-------------|-----------------|--------------|
//! | finished     | `Idle`      | `StartRender`   | no           |
//! | playing      | `Playing`   | `Pause`         | yes          |
//! | rendering    | `Rendering` | `Play`          | yes          |
//! | paused       | `Paused`    | `Resume`        | yes          |
//!
//! Transitions are unconditional: the notification alone decides the next
//! state, whatever the current one is. Invoking a control never changes the
//! state directly; the engine answers asynchronously with a notification.
//!
//! Single-threaded: notifications and control invocations are expected on
//! the UI thread, applied in delivery order, last one wins.

use super::event_bus::BoxedEvent;
use super::render_handler::{RenderHandler, RenderRequest};
use log::{debug, info};

/// Last lifecycle event reported by the render engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Rendering,
    Paused,
}

impl PlaybackState {
    pub fn primary_command(self) -> PlaybackCommand {
        match self {
            Self::Idle => PlaybackCommand::StartRender,
            Self::Playing => PlaybackCommand::Pause,
            Self::Rendering => PlaybackCommand::Play,
            Self::Paused => PlaybackCommand::Resume,
        }
    }

    pub fn is_stop_enabled(self) -> bool {
        self != Self::Idle
    }
}

/// Action behind the primary control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackCommand {
    StartRender,
    Pause,
    Play,
    Resume,
}

impl PlaybackCommand {
    pub fn request(self) -> RenderRequest {
        match self {
            Self::StartRender => RenderRequest::Render,
            Self::Pause => RenderRequest::Pause,
            Self::Play => RenderRequest::Play,
            Self::Resume => RenderRequest::Resume,
        }
    }
}

/// Inbound lifecycle notification from the render engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PreviewNotification {
    Finished,
    Playing,
    Rendering,
    Paused,
}

impl PreviewNotification {
    pub const ALL: [PreviewNotification; 4] = [
        PreviewNotification::Finished,
        PreviewNotification::Playing,
        PreviewNotification::Rendering,
        PreviewNotification::Paused,
    ];
}

impl From<PreviewNotification> for PlaybackState {
    fn from(notification: PreviewNotification) -> Self {
        match notification {
            PreviewNotification::Finished => Self::Idle,
            PreviewNotification::Playing => Self::Playing,
            PreviewNotification::Rendering => Self::Rendering,
            PreviewNotification::Paused => Self::Paused,
        }
    }
}

/// Tracks preview lifecycle and dispatches the dock's play/stop controls.
///
/// Owns its render handler, so the collaborator is valid for as long as the
/// controller exists.
#[derive(Debug)]
pub struct PreviewPlaybackController<H: RenderHandler> {
    state: PlaybackState,
    handler: H,
}

impl<H: RenderHandler> PreviewPlaybackController<H> {
    pub fn new(handler: H) -> Self {
        info!("Preview playback controller initialized (idle)");
        Self {
            state: PlaybackState::Idle,
            handler,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_command(&self) -> PlaybackCommand {
        self.state.primary_command()
    }

    pub fn is_stop_enabled(&self) -> bool {
        self.state.is_stop_enabled()
    }

    /// Apply a notification. Returns true if the state changed.
    pub fn apply(&mut self, notification: PreviewNotification) -> bool {
        let next = PlaybackState::from(notification);
        if next == self.state {
            return false;
        }
        debug!("Preview state {:?} -> {:?} ({:?})", self.state, next, notification);
        self.state = next;
        true
    }

    pub fn on_finished(&mut self) -> bool {
        self.apply(PreviewNotification::Finished)
    }

    pub fn on_playing(&mut self) -> bool {
        self.apply(PreviewNotification::Playing)
    }

    pub fn on_rendering(&mut self) -> bool {
        self.apply(PreviewNotification::Rendering)
    }

    pub fn on_paused(&mut self) -> bool {
        self.apply(PreviewNotification::Paused)
    }

    /// Apply a notification drained from the event bus.
    ///
    /// Returns false when the event is not a preview notification.
    pub fn handle_event(&mut self, event: &BoxedEvent) -> bool {
        match PreviewNotification::from_event(event) {
            Some(notification) => {
                self.apply(notification);
                true
            }
            None => false,
        }
    }

    /// Send the engine the request matching [`current_command`](Self::current_command).
    pub fn invoke_primary(&mut self) {
        let command = self.current_command();
        debug!("Primary control: {:?} in {:?}", command, self.state);
        self.handler.request(command.request());
    }

    /// Ask the engine to interrupt whatever it is doing.
    pub fn invoke_secondary(&mut self) {
        debug!("Stop control in {:?}", self.state);
        self.handler.interrupt_preview();
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }
}
