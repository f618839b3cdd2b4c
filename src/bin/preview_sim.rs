//! Headless preview runner for development and testing.
//!
//! Drives the dock through a script of button presses, waits and shortcuts,
//! echoes engine notifications as they happen and prints the preview state
//! after every step.

use preview_dock::cli::Args;
use preview_dock::shell::{self, PreviewShell, ScriptStep};
use preview_dock::widgets::dock::dock_events::{PrimaryControlPressedEvent, StopControlPressedEvent};
use preview_dock::widgets::dock::{InMemoryDocument, KeyModifiers};

use clap::Parser;
use log::info;
use std::time::Duration;

/// Main-loop tick used while waiting (60 Hz)
const TICK: Duration = Duration::from_micros(16_667);

/// Scripted preview session
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct SimArgs {
    #[command(flatten)]
    common: Args,

    /// Comma-separated steps: primary, stop, wait:<secs>, key:<left|right|up|down|p>
    #[arg(
        long = "script",
        value_delimiter = ',',
        default_values = ["primary", "wait:1", "primary", "wait:0.5", "primary", "stop"]
    )]
    script: Vec<ScriptStep>,
}

fn main() -> anyhow::Result<()> {
    let args = SimArgs::parse();
    let (_path_config, settings) = shell::bootstrap(&args.common)?;
    info!("Running {} script steps", args.script.len());

    let mut document = InMemoryDocument::with_scene(vec![0, 10, 20]);
    let mut preview = PreviewShell::new(&settings);
    preview.set_active_scene(&mut document);
    preview.watch_notifications(|n| println!("{:>16}  engine: {:?}", "", n));

    println!("{:>16}  {}", "start", preview.status_line());
    for step in &args.script {
        match step {
            ScriptStep::Primary => preview.event_bus.emit(PrimaryControlPressedEvent),
            ScriptStep::Stop => preview.event_bus.emit(StopControlPressedEvent),
            ScriptStep::Key(key) => {
                preview.key_press(*key, KeyModifiers::NONE, &mut document);
            }
            ScriptStep::Wait(total) => {
                let mut left = *total;
                while !left.is_zero() {
                    let dt = left.min(TICK);
                    preview.update(dt, &mut document);
                    left -= dt;
                }
            }
        }
        preview.process_events(&mut document);
        println!("{:>16}  {}", format!("{:?}", step), preview.status_line());
    }
    Ok(())
}
