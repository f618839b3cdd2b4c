//! Shared shell for the standalone binaries.
//!
//! Wires the event bus, preview controller, simulated engine and dock model
//! together and runs one main-loop step at a time. Both the egui window and
//! the headless simulator drive the dock through this type.

use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::{debug, info};

use crate::cli::Args;
use crate::config::{self, DockSettings, PathConfig};
use crate::core::event_bus::{BoxedEvent, Event, EventBus, downcast_event};
use crate::core::playback::{PreviewNotification, PreviewPlaybackController};
use crate::core::preview_engine::PreviewEngine;
use crate::core::preview_events::{
    PreviewFinishedEvent, PreviewPausedEvent, PreviewPlayingEvent, PreviewRenderingEvent,
};
use crate::core::render_handler::BusRenderHandler;
use crate::widgets::dock::dock_events::*;
use crate::widgets::dock::{DockKey, Document, KeyModifiers, TimelineDock};

/// Rounds of bus draining per step. Each round lets one hop happen
/// (dock -> controller -> engine -> controller), so a few are plenty.
const MAX_DRAIN_ROUNDS: usize = 8;

pub struct PreviewShell {
    pub event_bus: EventBus,
    pub controller: PreviewPlaybackController<BusRenderHandler>,
    pub engine: PreviewEngine,
    pub dock: TimelineDock,
    /// Resolution from settings/CLI, applied to the first scene attached
    pending_resolution: Option<String>,
}

impl PreviewShell {
    pub fn new(settings: &DockSettings) -> Self {
        let event_bus = EventBus::new();
        let controller = PreviewPlaybackController::new(BusRenderHandler::new(event_bus.emitter()));
        let engine = PreviewEngine::new(
            event_bus.emitter(),
            settings.frame_start,
            settings.frame_end,
            settings.preview_fps,
        )
        .with_loop(settings.loop_preview);
        let dock = TimelineDock::new(&settings.resolution, settings.mode);

        Self {
            event_bus,
            controller,
            engine,
            dock,
            pending_resolution: Some(settings.resolution.clone()),
        }
    }

    /// Active scene changed (or first attached).
    ///
    /// The first scene receives the configured resolution; later scenes keep
    /// their own and only refresh the dock.
    pub fn set_active_scene(&mut self, document: &mut dyn Document) {
        self.dock.sync_from_document(document);
        if !document.has_active_scene() {
            return;
        }
        if let Some(text) = self.pending_resolution.take() {
            info!("Applying configured resolution '{}'", text);
            self.dock.set_resolution_text(&text, document);
        }
    }

    /// One main-loop step: advance the engine, then drain the bus.
    pub fn update(&mut self, dt: Duration, document: &mut dyn Document) -> usize {
        self.engine.update(dt);
        self.process_events(document)
    }

    /// Drain the bus until it is quiet. Returns the number of handled events.
    pub fn process_events(&mut self, document: &mut dyn Document) -> usize {
        let mut handled = 0;
        for _ in 0..MAX_DRAIN_ROUNDS {
            let events = self.event_bus.poll();
            if events.is_empty() {
                break;
            }
            for event in &events {
                if self.dispatch(event, document) {
                    handled += 1;
                }
            }
        }
        handled
    }

    fn dispatch(&mut self, event: &BoxedEvent, document: &mut dyn Document) -> bool {
        if self.controller.handle_event(event) || self.engine.handle_event(event) {
            return true;
        }
        if downcast_event::<PrimaryControlPressedEvent>(event).is_some() {
            self.controller.invoke_primary();
            return true;
        }
        if downcast_event::<StopControlPressedEvent>(event).is_some() {
            self.controller.invoke_secondary();
            return true;
        }
        if let Some(e) = downcast_event::<ResolutionTextChangedEvent>(event) {
            self.dock.set_resolution_text(&e.0, document);
            return true;
        }
        if let Some(e) = downcast_event::<DockModeSelectedEvent>(event) {
            self.dock.set_mode(e.0);
            return true;
        }
        if let Some(e) = downcast_event::<LocalPivotToggledEvent>(event) {
            self.dock.set_local_pivot(e.0, document);
            return true;
        }
        debug!("Unhandled event: {}", (**event).type_name());
        false
    }

    /// Call `watcher` for every engine notification the moment it is emitted,
    /// before the main loop drains it.
    pub fn watch_notifications<F>(&self, watcher: F)
    where
        F: Fn(PreviewNotification) + 'static,
    {
        let watcher = Rc::new(watcher);
        let w = Rc::clone(&watcher);
        self.event_bus
            .subscribe::<PreviewFinishedEvent, _>(move |_| w(PreviewNotification::Finished));
        let w = Rc::clone(&watcher);
        self.event_bus
            .subscribe::<PreviewPlayingEvent, _>(move |_| w(PreviewNotification::Playing));
        let w = Rc::clone(&watcher);
        self.event_bus
            .subscribe::<PreviewRenderingEvent, _>(move |_| w(PreviewNotification::Rendering));
        self.event_bus
            .subscribe::<PreviewPausedEvent, _>(move |_| watcher(PreviewNotification::Paused));
    }

    pub fn key_press(
        &mut self,
        key: DockKey,
        modifiers: KeyModifiers,
        document: &mut dyn Document,
    ) -> bool {
        self.dock.process_key_press(key, modifiers, document)
    }

    /// One-line status for logs and the headless runner.
    pub fn status_line(&self) -> String {
        format!(
            "state={:?} command={:?} stop={} frame={} rendered={}",
            self.controller.state(),
            self.controller.current_command(),
            self.controller.is_stop_enabled(),
            self.engine.current_frame(),
            self.engine.rendered_frames(),
        )
    }
}

/// Resolve paths, initialize logging and load settings (CLI overrides applied).
pub fn bootstrap(args: &Args) -> Result<(PathConfig, DockSettings)> {
    let path_config = PathConfig::from_env_and_cli(args.config_dir.clone());
    if let Err(e) = config::ensure_dirs(&path_config) {
        eprintln!("Warning: Failed to create application directories: {:#}", e);
    }

    init_logger(args, &path_config)?;

    let settings_path = config::config_file(config::SETTINGS_FILE, &path_config);
    let mut settings = DockSettings::load(&settings_path)?;
    args.apply_to(&mut settings);
    if args.save_settings {
        settings.save(&settings_path)?;
    }
    debug!("Effective settings: {:?}", settings);
    Ok((path_config, settings))
}

/// Initialize env_logger from the verbosity flags, to console or to a file.
pub fn init_logger(args: &Args, path_config: &PathConfig) -> Result<()> {
    let log_level = args.log_level();

    if let Some(log_path_opt) = &args.log_file {
        let log_path: PathBuf = log_path_opt
            .clone()
            .unwrap_or_else(|| config::data_file(config::LOG_FILE, path_config));
        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .filter_module("egui", log::LevelFilter::Info)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        // RUST_LOG still wins over -v when set
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(log_level.as_str().to_lowercase()),
        )
        .filter_module("egui", log::LevelFilter::Info)
        .format_timestamp_millis()
        .init();
    }
    Ok(())
}

/// One step of a headless preview script.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptStep {
    Primary,
    Stop,
    /// Advance the main loop by this much wall time
    Wait(Duration),
    Key(DockKey),
}

impl FromStr for ScriptStep {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        if let Some(secs) = s.strip_prefix("wait:") {
            let secs: f64 = secs
                .parse()
                .with_context(|| format!("Bad wait duration: {}", secs))?;
            if !secs.is_finite() || secs < 0.0 {
                bail!("Wait duration must be a non-negative number: {}", secs);
            }
            return Ok(Self::Wait(Duration::from_secs_f64(secs)));
        }
        if let Some(key) = s.strip_prefix("key:") {
            let key = match key {
                "left" => DockKey::Left,
                "right" => DockKey::Right,
                "up" => DockKey::Up,
                "down" => DockKey::Down,
                "p" => DockKey::P,
                other => bail!("Unknown key: {}", other),
            };
            return Ok(Self::Key(key));
        }
        match s.as_str() {
            "primary" | "play" => Ok(Self::Primary),
            "stop" => Ok(Self::Stop),
            other => bail!("Unknown script step: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::playback::{PlaybackCommand, PlaybackState};
    use crate::widgets::dock::{DockMode, InMemoryDocument};
    use std::cell::RefCell;

    const TICK: Duration = Duration::from_millis(100);

    fn shell(end: i32) -> (PreviewShell, InMemoryDocument) {
        let settings = DockSettings {
            preview_fps: 10.0,
            frame_start: 0,
            frame_end: end,
            ..Default::default()
        };
        let mut doc = InMemoryDocument::with_scene(vec![0, 4]);
        let mut shell = PreviewShell::new(&settings);
        shell.set_active_scene(&mut doc);
        (shell, doc)
    }

    fn press_primary(shell: &mut PreviewShell, doc: &mut InMemoryDocument) {
        shell.event_bus.emit(PrimaryControlPressedEvent);
        shell.process_events(doc);
    }

    #[test]
    fn test_full_preview_cycle() {
        let (mut shell, mut doc) = shell(2);
        assert_eq!(shell.controller.current_command(), PlaybackCommand::StartRender);

        press_primary(&mut shell, &mut doc);
        assert_eq!(shell.controller.state(), PlaybackState::Rendering);
        assert_eq!(shell.controller.current_command(), PlaybackCommand::Play);

        for _ in 0..3 {
            shell.update(TICK, &mut doc);
        }
        assert_eq!(shell.controller.state(), PlaybackState::Playing);

        press_primary(&mut shell, &mut doc);
        assert_eq!(shell.controller.state(), PlaybackState::Paused);
        assert_eq!(shell.controller.current_command(), PlaybackCommand::Resume);

        press_primary(&mut shell, &mut doc);
        assert_eq!(shell.controller.state(), PlaybackState::Playing);

        shell.event_bus.emit(StopControlPressedEvent);
        shell.process_events(&mut doc);
        assert_eq!(shell.controller.state(), PlaybackState::Idle);
        assert!(!shell.dock.is_stop_enabled(shell.controller.state()));
    }

    #[test]
    fn test_play_during_render() {
        let (mut shell, mut doc) = shell(50);
        press_primary(&mut shell, &mut doc);
        shell.update(TICK * 2, &mut doc);
        press_primary(&mut shell, &mut doc);
        assert_eq!(shell.controller.state(), PlaybackState::Playing);
        assert_eq!(shell.engine.rendered_frames(), 2);
    }

    #[test]
    fn test_watcher_sees_notifications_as_emitted() {
        let (mut shell, mut doc) = shell(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        shell.watch_notifications(move |n| sink.borrow_mut().push(n));

        press_primary(&mut shell, &mut doc);
        shell.update(TICK, &mut doc);
        press_primary(&mut shell, &mut doc);
        shell.event_bus.emit(StopControlPressedEvent);
        shell.process_events(&mut doc);

        assert_eq!(
            *seen.borrow(),
            vec![
                PreviewNotification::Rendering,
                PreviewNotification::Playing,
                PreviewNotification::Paused,
                PreviewNotification::Finished,
            ]
        );
    }

    #[test]
    fn test_dock_events_reach_document() {
        let (mut shell, mut doc) = shell(10);
        shell
            .event_bus
            .emit(ResolutionTextChangedEvent("50 %".to_string()));
        shell.event_bus.emit(DockModeSelectedEvent(DockMode::Render));
        shell.event_bus.emit(LocalPivotToggledEvent(true));
        assert_eq!(shell.process_events(&mut doc), 3);

        assert_eq!(doc.resolution_fraction(), Some(0.5));
        assert_eq!(shell.dock.mode(), DockMode::Render);
        assert!(doc.local_pivot());
    }

    #[test]
    fn test_configured_resolution_reaches_first_scene() {
        let settings = DockSettings {
            resolution: "50 %".to_string(),
            ..Default::default()
        };
        let mut shell = PreviewShell::new(&settings);

        let mut empty = InMemoryDocument::empty();
        shell.set_active_scene(&mut empty);
        assert_eq!(shell.dock.resolution_text(), "50 %");

        let mut doc = InMemoryDocument::with_scene(vec![0]);
        shell.set_active_scene(&mut doc);
        assert_eq!(shell.dock.resolution_text(), "50 %");
        assert_eq!(doc.resolution_fraction(), Some(0.5));

        // Later scenes keep their own resolution
        let mut other = InMemoryDocument::with_scene(vec![0]);
        other.set_resolution_fraction(0.25);
        shell.set_active_scene(&mut other);
        assert_eq!(shell.dock.resolution_text(), "25 %");
        assert_eq!(other.resolution_fraction(), Some(0.25));
    }

    #[test]
    fn test_unknown_event_not_counted() {
        let (mut shell, mut doc) = shell(10);
        shell.event_bus.emit(7_i64);
        assert_eq!(shell.process_events(&mut doc), 0);
    }

    #[test]
    fn test_key_press_moves_playhead() {
        let (mut shell, mut doc) = shell(10);
        assert!(shell.key_press(DockKey::Up, KeyModifiers::NONE, &mut doc));
        assert_eq!(doc.active_scene_frame(), 4);
    }

    #[test]
    fn test_parse_script_steps() {
        assert_eq!("primary".parse::<ScriptStep>().unwrap(), ScriptStep::Primary);
        assert_eq!(" Stop ".parse::<ScriptStep>().unwrap(), ScriptStep::Stop);
        assert_eq!(
            "wait:0.5".parse::<ScriptStep>().unwrap(),
            ScriptStep::Wait(Duration::from_millis(500))
        );
        assert_eq!("key:P".parse::<ScriptStep>().unwrap(), ScriptStep::Key(DockKey::P));
        assert!("wait:-1".parse::<ScriptStep>().is_err());
        assert!("key:q".parse::<ScriptStep>().is_err());
        assert!("jump".parse::<ScriptStep>().is_err());
    }
}
