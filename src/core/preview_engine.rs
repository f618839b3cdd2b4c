//! Simulated preview render engine.
//!
//! Stands in for the real renderer behind the dock: it "renders" a frame
//! range one frame per tick, then loops playback over what was rendered.
//! Requests arrive as bus events; every lifecycle change is reported back as
//! a preview notification on the same bus.
//!
//! # Timing Model
//!
//! FPS-based: `update(dt)` accumulates wall time and advances one frame per
//! `1/fps` seconds, for rendering and playback alike.
//!
//! # Lifecycle
//!
//! - render (idle only): start rendering at `start` -> *rendering*
//! - last frame rendered: play from `start` -> *playing*
//! - play while rendering: stop rendering, play the partial range -> *playing*
//! - pause / resume: *paused* <-> *playing*
//! - interrupt (any non-idle state): drop rendered frames -> *finished*
//! - end of range without loop: drop rendered frames -> *finished*

use super::event_bus::{BoxedEvent, EventEmitter};
use super::playback::PreviewNotification;
use super::render_handler::{RenderHandler, RenderRequest};
use log::{debug, info, trace, warn};
use std::time::Duration;

/// Rate used when the configured fps is unusable
pub const DEFAULT_FPS: f32 = 24.0;
pub const MIN_FPS: f32 = 1.0;
pub const MAX_FPS: f32 = 1000.0;

/// Engine-side status. Mirrors what the engine last announced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EngineStatus {
    #[default]
    Idle,
    Rendering,
    Playing,
    Paused,
}

#[derive(Debug)]
pub struct PreviewEngine {
    emitter: EventEmitter,
    start: i32,
    end: i32,
    fps: f32,
    loop_enabled: bool,
    status: EngineStatus,
    /// Last rendered frame (inclusive), None when nothing is cached
    rendered_until: Option<i32>,
    frame: i32,
    accumulator: Duration,
}

impl PreviewEngine {
    /// Engine over the inclusive range `start..=end`. A reversed range is normalized.
    ///
    /// fps is clamped to `MIN_FPS..=MAX_FPS`; NaN, infinite or non-positive
    /// values fall back to `DEFAULT_FPS`.
    pub fn new(emitter: EventEmitter, start: i32, end: i32, fps: f32) -> Self {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        let fps = if fps.is_finite() && fps > 0.0 {
            fps.clamp(MIN_FPS, MAX_FPS)
        } else {
            warn!("Unusable preview fps {}, using {}", fps, DEFAULT_FPS);
            DEFAULT_FPS
        };
        info!("Preview engine: frames {}..={} at {} fps", start, end, fps);
        Self {
            emitter,
            start,
            end,
            fps,
            loop_enabled: true,
            status: EngineStatus::Idle,
            rendered_until: None,
            frame: start,
            accumulator: Duration::ZERO,
        }
    }

    pub fn with_loop(mut self, loop_enabled: bool) -> Self {
        self.loop_enabled = loop_enabled;
        self
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    pub fn current_frame(&self) -> i32 {
        self.frame
    }

    pub fn range(&self) -> (i32, i32) {
        (self.start, self.end)
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Number of frames currently in the preview cache.
    pub fn rendered_frames(&self) -> usize {
        self.rendered_until
            .map(|last| (last - self.start + 1) as usize)
            .unwrap_or(0)
    }

    /// Apply a render request drained from the bus. Returns false for other events.
    pub fn handle_event(&mut self, event: &BoxedEvent) -> bool {
        match RenderRequest::from_event(event) {
            Some(request) => {
                self.request(request);
                true
            }
            None => false,
        }
    }

    /// Advance rendering or playback by `dt` of wall time.
    pub fn update(&mut self, dt: Duration) {
        if !matches!(self.status, EngineStatus::Rendering | EngineStatus::Playing) {
            self.accumulator = Duration::ZERO;
            return;
        }
        let frame_duration = Duration::from_secs_f64(1.0 / f64::from(self.fps));
        self.accumulator += dt;
        while self.accumulator >= frame_duration {
            self.accumulator -= frame_duration;
            match self.status {
                EngineStatus::Rendering => self.render_step(),
                EngineStatus::Playing => self.play_step(),
                _ => break,
            }
        }
    }

    fn notify(&self, notification: PreviewNotification) {
        debug!("Preview engine -> {:?} (frame {})", notification, self.frame);
        self.emitter.emit_boxed(notification.into_event());
    }

    fn render_step(&mut self) {
        trace!("Rendered preview frame {}", self.frame);
        self.rendered_until = Some(self.frame);
        if self.frame >= self.end {
            self.frame = self.start;
            self.status = EngineStatus::Playing;
            self.notify(PreviewNotification::Playing);
        } else {
            self.frame += 1;
        }
    }

    fn play_step(&mut self) {
        let last = self.rendered_until.unwrap_or(self.start);
        if self.frame < last {
            self.frame += 1;
            trace!("Preview frame {}", self.frame);
        } else if self.loop_enabled {
            self.frame = self.start;
        } else {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.status = EngineStatus::Idle;
        self.rendered_until = None;
        self.frame = self.start;
        self.accumulator = Duration::ZERO;
        self.notify(PreviewNotification::Finished);
    }
}

impl RenderHandler for PreviewEngine {
    fn render_preview(&mut self) {
        if self.status != EngineStatus::Idle {
            debug!("Render request ignored: preview already {:?}", self.status);
            return;
        }
        self.rendered_until = None;
        self.frame = self.start;
        self.accumulator = Duration::ZERO;
        self.status = EngineStatus::Rendering;
        self.notify(PreviewNotification::Rendering);
    }

    fn pause_preview(&mut self) {
        if self.status != EngineStatus::Playing {
            debug!("Pause request ignored in {:?}", self.status);
            return;
        }
        self.status = EngineStatus::Paused;
        self.notify(PreviewNotification::Paused);
    }

    fn play_preview(&mut self) {
        match self.status {
            EngineStatus::Rendering if self.rendered_until.is_some() => {
                self.frame = self.start;
                self.status = EngineStatus::Playing;
                self.notify(PreviewNotification::Playing);
            }
            EngineStatus::Paused => self.resume_preview(),
            status => debug!("Play request ignored in {:?} (nothing rendered yet?)", status),
        }
    }

    fn resume_preview(&mut self) {
        if self.status != EngineStatus::Paused {
            debug!("Resume request ignored in {:?}", self.status);
            return;
        }
        self.status = EngineStatus::Playing;
        self.notify(PreviewNotification::Playing);
    }

    fn interrupt_preview(&mut self) {
        if self.status == EngineStatus::Idle {
            debug!("Interrupt request ignored: preview idle");
            return;
        }
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_bus::EventBus;

    const FPS: f32 = 10.0;

    fn frame() -> Duration {
        Duration::from_millis(100)
    }

    fn engine(bus: &EventBus, start: i32, end: i32) -> PreviewEngine {
        PreviewEngine::new(bus.emitter(), start, end, FPS)
    }

    fn notifications(bus: &EventBus) -> Vec<PreviewNotification> {
        bus.poll().iter().filter_map(PreviewNotification::from_event).collect()
    }

    #[test]
    fn test_render_then_autoplay() {
        let bus = EventBus::new();
        let mut e = engine(&bus, 0, 2);

        e.render_preview();
        assert_eq!(notifications(&bus), vec![PreviewNotification::Rendering]);

        e.update(frame());
        e.update(frame());
        assert_eq!(e.status(), EngineStatus::Rendering);
        assert_eq!(e.rendered_frames(), 2);

        e.update(frame());
        assert_eq!(e.status(), EngineStatus::Playing);
        assert_eq!(e.rendered_frames(), 3);
        assert_eq!(e.current_frame(), 0);
        assert_eq!(notifications(&bus), vec![PreviewNotification::Playing]);
    }

    #[test]
    fn test_play_during_render_uses_partial_range() {
        let bus = EventBus::new();
        let mut e = engine(&bus, 10, 100);
        e.render_preview();
        e.update(frame() * 3);
        assert_eq!(e.rendered_frames(), 3);

        e.play_preview();
        assert_eq!(e.status(), EngineStatus::Playing);
        assert_eq!(e.current_frame(), 10);

        // Loops within the 3 rendered frames: 10 -> 11 -> 12 -> 10
        e.update(frame() * 3);
        assert_eq!(e.current_frame(), 10);
        assert_eq!(
            notifications(&bus),
            vec![PreviewNotification::Rendering, PreviewNotification::Playing]
        );
    }

    #[test]
    fn test_play_before_first_frame_is_ignored() {
        let bus = EventBus::new();
        let mut e = engine(&bus, 0, 5);
        e.render_preview();
        e.play_preview();
        assert_eq!(e.status(), EngineStatus::Rendering);
        assert_eq!(notifications(&bus), vec![PreviewNotification::Rendering]);
    }

    #[test]
    fn test_pause_resume_and_interrupt() {
        let bus = EventBus::new();
        let mut e = engine(&bus, 0, 0);
        e.render_preview();
        e.update(frame());
        assert_eq!(e.status(), EngineStatus::Playing);

        e.pause_preview();
        e.update(frame() * 5);
        assert_eq!(e.status(), EngineStatus::Paused);
        e.resume_preview();
        e.interrupt_preview();

        assert_eq!(e.status(), EngineStatus::Idle);
        assert_eq!(e.rendered_frames(), 0);
        assert_eq!(
            notifications(&bus),
            vec![
                PreviewNotification::Rendering,
                PreviewNotification::Playing,
                PreviewNotification::Paused,
                PreviewNotification::Playing,
                PreviewNotification::Finished,
            ]
        );
    }

    #[test]
    fn test_interrupt_when_idle_is_silent() {
        let bus = EventBus::new();
        let mut e = engine(&bus, 0, 3);
        e.interrupt_preview();
        e.pause_preview();
        e.resume_preview();
        assert!(notifications(&bus).is_empty());
    }

    #[test]
    fn test_render_ignored_while_active() {
        let bus = EventBus::new();
        let mut e = engine(&bus, 0, 3);
        e.render_preview();
        e.update(frame());
        e.render_preview();
        assert_eq!(e.rendered_frames(), 1);
        assert_eq!(notifications(&bus), vec![PreviewNotification::Rendering]);
    }

    #[test]
    fn test_no_loop_finishes_at_end() {
        let bus = EventBus::new();
        let mut e = engine(&bus, 0, 1).with_loop(false);
        e.render_preview();
        e.update(frame() * 2); // render 0, 1 -> playing at 0
        e.update(frame()); // 0 -> 1
        assert_eq!(e.status(), EngineStatus::Playing);
        e.update(frame()); // end reached
        assert_eq!(e.status(), EngineStatus::Idle);
        assert_eq!(
            notifications(&bus).last(),
            Some(&PreviewNotification::Finished)
        );
    }

    #[test]
    fn test_reversed_range_and_bad_fps_are_normalized() {
        let bus = EventBus::new();
        let e = PreviewEngine::new(bus.emitter(), 8, 2, 0.0);
        assert_eq!(e.range(), (2, 8));
        assert_eq!(e.fps(), DEFAULT_FPS);
    }

    #[test]
    fn test_extreme_fps_is_clamped() {
        let bus = EventBus::new();
        let step = Duration::from_millis(16);

        let mut slow = PreviewEngine::new(bus.emitter(), 0, 3, 1e-20);
        assert_eq!(slow.fps(), MIN_FPS);
        slow.render_preview();
        slow.update(step);
        assert_eq!(slow.rendered_frames(), 0);
        slow.update(Duration::from_secs(1));
        assert_eq!(slow.rendered_frames(), 1);

        let mut fast = PreviewEngine::new(bus.emitter(), 0, 100, 1e10);
        assert_eq!(fast.fps(), MAX_FPS);
        fast.render_preview();
        fast.update(step);
        assert_eq!(fast.rendered_frames(), 16);
    }

    #[test]
    fn test_handle_event_routes_requests_only() {
        let bus = EventBus::new();
        let mut e = engine(&bus, 0, 3);
        assert!(!e.handle_event(&PreviewNotification::Playing.into_event()));
        assert!(e.handle_event(&RenderRequest::Render.into_event()));
        assert_eq!(e.status(), EngineStatus::Rendering);
    }
}
