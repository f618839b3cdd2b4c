//! Outbound side of the preview contract: what the dock may ask the render engine to do.

use super::event_bus::EventEmitter;
use log::debug;

/// One-way request to the render engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderRequest {
    Render,
    Pause,
    Play,
    Resume,
    Interrupt,
}

impl RenderRequest {
    pub const ALL: [RenderRequest; 5] = [
        RenderRequest::Render,
        RenderRequest::Pause,
        RenderRequest::Play,
        RenderRequest::Resume,
        RenderRequest::Interrupt,
    ];
}

/// Render engine collaborator.
///
/// Requests are fire-and-forget: the engine reports the resulting lifecycle
/// change later through a preview notification, never through a return value.
pub trait RenderHandler {
    fn render_preview(&mut self);
    fn pause_preview(&mut self);
    fn play_preview(&mut self);
    fn resume_preview(&mut self);
    fn interrupt_preview(&mut self);

    fn request(&mut self, request: RenderRequest) {
        match request {
            RenderRequest::Render => self.render_preview(),
            RenderRequest::Pause => self.pause_preview(),
            RenderRequest::Play => self.play_preview(),
            RenderRequest::Resume => self.resume_preview(),
            RenderRequest::Interrupt => self.interrupt_preview(),
        }
    }
}

impl<H: RenderHandler + ?Sized> RenderHandler for Box<H> {
    fn render_preview(&mut self) {
        (**self).render_preview()
    }
    fn pause_preview(&mut self) {
        (**self).pause_preview()
    }
    fn play_preview(&mut self) {
        (**self).play_preview()
    }
    fn resume_preview(&mut self) {
        (**self).resume_preview()
    }
    fn interrupt_preview(&mut self) {
        (**self).interrupt_preview()
    }
}

/// Render handler that posts requests onto the event bus.
///
/// The engine picks them up on the next `poll()`, so the controller never
/// calls into the engine re-entrantly.
#[derive(Clone, Debug)]
pub struct BusRenderHandler {
    emitter: EventEmitter,
}

impl BusRenderHandler {
    pub fn new(emitter: EventEmitter) -> Self {
        Self { emitter }
    }

    fn post(&self, request: RenderRequest) {
        debug!("Posting render request {:?}", request);
        self.emitter.emit_boxed(request.into_event());
    }
}

impl RenderHandler for BusRenderHandler {
    fn render_preview(&mut self) {
        self.post(RenderRequest::Render);
    }
    fn pause_preview(&mut self) {
        self.post(RenderRequest::Pause);
    }
    fn play_preview(&mut self) {
        self.post(RenderRequest::Play);
    }
    fn resume_preview(&mut self) {
        self.post(RenderRequest::Resume);
    }
    fn interrupt_preview(&mut self) {
        self.post(RenderRequest::Interrupt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_bus::EventBus;

    #[derive(Default)]
    struct Recorder(Vec<RenderRequest>);

    impl RenderHandler for Recorder {
        fn render_preview(&mut self) {
            self.0.push(RenderRequest::Render);
        }
        fn pause_preview(&mut self) {
            self.0.push(RenderRequest::Pause);
        }
        fn play_preview(&mut self) {
            self.0.push(RenderRequest::Play);
        }
        fn resume_preview(&mut self) {
            self.0.push(RenderRequest::Resume);
        }
        fn interrupt_preview(&mut self) {
            self.0.push(RenderRequest::Interrupt);
        }
    }

    #[test]
    fn test_request_dispatches_to_matching_method() {
        let mut recorder = Recorder::default();
        for r in RenderRequest::ALL {
            recorder.request(r);
        }
        assert_eq!(recorder.0, RenderRequest::ALL.to_vec());
    }

    #[test]
    fn test_boxed_handler_forwards() {
        let mut boxed: Box<Recorder> = Box::default();
        boxed.request(RenderRequest::Pause);
        assert_eq!(boxed.0, vec![RenderRequest::Pause]);
    }

    #[test]
    fn test_bus_handler_posts_events_in_order() {
        let bus = EventBus::new();
        let mut handler = BusRenderHandler::new(bus.emitter());

        handler.render_preview();
        handler.interrupt_preview();

        let posted: Vec<_> = bus
            .poll()
            .iter()
            .filter_map(RenderRequest::from_event)
            .collect();
        assert_eq!(posted, vec![RenderRequest::Render, RenderRequest::Interrupt]);
    }
}
