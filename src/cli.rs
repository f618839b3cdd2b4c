use crate::config::DockSettings;
use clap::Parser;
use std::path::PathBuf;

const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Timeline dock with preview render/playback controls
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Preview frames per second
    #[arg(long = "fps", value_name = "FPS")]
    pub fps: Option<f32>,

    /// First frame of the preview range
    #[arg(long = "start", value_name = "N")]
    pub range_start: Option<i32>,

    /// Last frame of the preview range (inclusive)
    #[arg(long = "end", value_name = "N")]
    pub range_end: Option<i32>,

    /// Stop at the end of the preview instead of looping
    #[arg(long = "no-loop")]
    pub no_loop: bool,

    /// Initial resolution, e.g. "50 %" or 50
    #[arg(short = 'r', long = "resolution", value_name = "PERCENT")]
    pub resolution: Option<String>,

    /// Write the effective settings back to the settings file
    #[arg(long = "save-settings")]
    pub save_settings: bool,

    /// Enable logging to file (default: preview_dock.log in the data directory)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

impl Args {
    /// Overlay command-line values on loaded settings.
    pub fn apply_to(&self, settings: &mut DockSettings) {
        if let Some(fps) = self.fps {
            settings.preview_fps = fps;
        }
        if let Some(start) = self.range_start {
            settings.frame_start = start;
        }
        if let Some(end) = self.range_end {
            settings.frame_end = end;
        }
        if self.no_loop {
            settings.loop_preview = false;
        }
        if let Some(resolution) = &self.resolution {
            let percent = resolution.trim().trim_end_matches('%').trim();
            settings.resolution = format!("{} %", percent);
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from(["preview-dock", "--fps", "12", "--start", "5", "-vv", "--no-loop"]);
        assert_eq!(args.fps, Some(12.0));
        assert_eq!(args.range_start, Some(5));
        assert_eq!(args.log_level(), log::LevelFilter::Debug);
        assert!(args.no_loop);
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_log_flag_without_value() {
        let args = Args::parse_from(["preview-dock", "--log"]);
        assert_eq!(args.log_file, Some(None));
    }

    #[test]
    fn test_apply_to_overrides_only_given_values() {
        let args = Args::parse_from(["preview-dock", "--end", "48", "-r", "50"]);
        let mut settings = DockSettings::default();
        args.apply_to(&mut settings);
        assert_eq!(settings.frame_end, 48);
        assert_eq!(settings.frame_start, 0);
        assert_eq!(settings.resolution, "50 %");
        assert!(settings.loop_preview);
    }

    #[test]
    fn test_resolution_percent_forms_normalize() {
        for given in ["50", "50%", "50 %", " 50 % "] {
            let args = Args::parse_from(["preview-dock", "-r", given]);
            let mut settings = DockSettings::default();
            args.apply_to(&mut settings);
            assert_eq!(settings.resolution, "50 %");
            assert_eq!(crate::widgets::dock::parse_resolution_text(&settings.resolution), 0.5);
        }
    }
}
