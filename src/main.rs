use preview_dock::cli::Args;
use preview_dock::core::PlaybackState;
use preview_dock::shell::{self, PreviewShell};
use preview_dock::widgets::dock::{self, DockMode, Document, InMemoryDocument};

use anyhow::anyhow;
use clap::Parser;
use eframe::egui;
use log::{debug, info};
use std::time::{Duration, Instant};

/// Frames of the built-in demo scene that carry keys
const DEMO_KEYS: [i32; 5] = [0, 12, 24, 48, 72];

/// Longest step fed to the engine after a stall (window drag, breakpoint)
const MAX_STEP: Duration = Duration::from_millis(250);

struct PreviewDockApp {
    shell: PreviewShell,
    document: InMemoryDocument,
    last_update: Instant,
}

impl PreviewDockApp {
    fn new(shell: PreviewShell, document: InMemoryDocument) -> Self {
        Self {
            shell,
            document,
            last_update: Instant::now(),
        }
    }

    fn render_timeline_pane(&self, ui: &mut egui::Ui) {
        let (start, end) = self.shell.engine.range();
        ui.heading("Timeline");
        ui.label(format!("Scene frame: {}", self.document.active_scene_frame()));
        ui.label(format!(
            "Preview: {:?}, frame {} of {}..={}",
            self.shell.controller.state(),
            self.shell.engine.current_frame(),
            start,
            end
        ));
        let total = (end - start + 1).max(1) as f32;
        ui.add(
            egui::ProgressBar::new(self.shell.engine.rendered_frames() as f32 / total)
                .text(format!("{} frames cached", self.shell.engine.rendered_frames())),
        );
    }

    fn render_render_pane(&self, ui: &mut egui::Ui) {
        ui.heading("Render");
        ui.label(format!(
            "Resolution: {} ({} fps)",
            self.shell.dock.resolution_text(),
            self.shell.engine.fps()
        ));
    }
}

impl eframe::App for PreviewDockApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update).min(MAX_STEP);
        self.last_update = now;

        for (key, modifiers) in dock::collect_key_presses(ctx) {
            if self.shell.key_press(key, modifiers, &mut self.document) {
                debug!("Shortcut {:?} handled", key);
            }
        }

        self.shell.update(dt, &mut self.document);

        let bus = self.shell.event_bus.clone();
        egui::TopBottomPanel::top("dock_toolbar").show(ctx, |ui| {
            dock::render_toolbar(
                ui,
                &self.shell.dock,
                self.shell.controller.state(),
                |event| bus.emit_boxed(event),
            );
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.shell.dock.mode() {
            DockMode::Timeline => self.render_timeline_pane(ui),
            DockMode::Render => self.render_render_pane(ui),
        });

        // Toolbar clicks land on the bus; pick them up on the next frame
        if self.shell.event_bus.queue_len() > 0
            || self.shell.controller.state() != PlaybackState::Idle
        {
            ctx.request_repaint();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (_path_config, settings) = shell::bootstrap(&args)?;
    info!("Preview dock starting...");
    debug!("Command-line args: {:?}", args);

    let mut document = InMemoryDocument::with_scene(DEMO_KEYS.to_vec());
    let mut preview = PreviewShell::new(&settings);
    preview.set_active_scene(&mut document);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 240.0])
            .with_title("Preview Dock"),
        ..Default::default()
    };

    eframe::run_native(
        "preview-dock",
        options,
        Box::new(move |_cc| Ok(Box::new(PreviewDockApp::new(preview, document)))),
    )
    .map_err(|e| anyhow!("Failed to run dock window: {e}"))
}
