use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use scenesplit::{
    FfmpegLogLevel, ProgressCallback, ProgressInfo, SceneList, SplitOptions, VideoFrameSource,
    split_scenes,
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  scenesplit detect input.mp4\n  scenesplit detect input.mp4 --threshold 0.5 --min-length 3 --max-length 0 --progress\n  scenesplit detect input.mp4 --out scenes.json\n  scenesplit probe input.mp4 --json\n  scenesplit completions zsh > _scenesplit";

#[derive(Debug, Parser)]
#[command(
    name = "scenesplit",
    version,
    about = "Detect scene boundaries in a video and emit a JSON scene list",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional information on stderr.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar while scanning.
    #[arg(long)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long)]
    overwrite: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Detect scenes and print the JSON scene list.
    #[command(
        about = "Detect scenes in a video",
        after_help = "Examples:\n  scenesplit detect input.mp4\n  scenesplit detect input.mp4 --sampling-fps 2 --threshold 0.5\n  scenesplit detect input.mp4 --min-length 3 --max-length 0 --out scenes.json"
    )]
    Detect {
        /// Input video path.
        input: String,

        /// How many frames per second of video to analyze.
        #[arg(long, default_value_t = 1.0)]
        sampling_fps: f64,

        /// Histogram distance threshold (0..1); higher declares fewer cuts.
        #[arg(long, default_value_t = 0.6)]
        threshold: f64,

        /// Minimum scene length in seconds to keep.
        #[arg(long, default_value_t = 10.0)]
        min_length: f64,

        /// Maximum scene length in seconds to keep; 0 disables the bound.
        #[arg(long, default_value_t = 60.0)]
        max_length: f64,

        /// Stop after this many sampled frames (for bounded-time runs).
        #[arg(long)]
        max_samples: Option<u64>,

        /// Write the scene list to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Emit compact JSON instead of pretty-printed.
        #[arg(long)]
        compact: bool,
    },

    /// Print video stream metadata (alias: info).
    #[command(
        about = "Print video metadata",
        visible_alias = "info",
        after_help = "Examples:\n  scenesplit probe input.mp4\n  scenesplit probe input.mp4 --json"
    )]
    Probe {
        /// Input video path.
        input: String,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_log_level(value: &str) -> Option<FfmpegLogLevel> {
    match value.to_ascii_lowercase().as_str() {
        "quiet" => Some(FfmpegLogLevel::Quiet),
        "panic" => Some(FfmpegLogLevel::Panic),
        "fatal" => Some(FfmpegLogLevel::Fatal),
        "error" => Some(FfmpegLogLevel::Error),
        "warning" | "warn" => Some(FfmpegLogLevel::Warning),
        "info" => Some(FfmpegLogLevel::Info),
        "verbose" => Some(FfmpegLogLevel::Verbose),
        "debug" => Some(FfmpegLogLevel::Debug),
        "trace" => Some(FfmpegLogLevel::Trace),
        _ => None,
    }
}

/// Map the CLI's `--max-length` knob to the library's optional bound.
fn effective_max_length(max_length: f64) -> Option<f64> {
    if max_length > 0.0 { Some(max_length) } else { None }
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(level) = &global.log_level {
        let parsed = parse_log_level(level).ok_or(format!("unsupported --log-level: {level}"))?;
        scenesplit::set_ffmpeg_log_level(parsed);
    }
    Ok(())
}

/// Progress bar over sampled frames, driven by the library callback.
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Self {
        let bar = ProgressBar::no_length();
        if let Ok(style) =
            ProgressStyle::with_template("{spinner} {pos}/{len} frames sampled ({elapsed})")
        {
            bar.set_style(style);
        }
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Detect {
            input,
            sampling_fps,
            threshold,
            min_length,
            max_length,
            max_samples,
            out,
            compact,
        } => {
            let mut options = SplitOptions::new()
                .sampling_rate(sampling_fps)
                .threshold(threshold)
                .min_length(min_length);
            options = match effective_max_length(max_length) {
                Some(max_length) => options.max_length(max_length),
                None => options.no_max_length(),
            };
            if let Some(max_samples) = max_samples {
                options = options.max_samples(max_samples);
            }

            let progress = cli.global.progress.then(|| Arc::new(TerminalProgress::new()));
            if let Some(progress) = &progress {
                options = options.with_progress(progress.clone());
            }

            let scenes: SceneList = split_scenes(&input, &options)?;

            if let Some(progress) = &progress {
                progress.finish();
            }
            if cli.global.verbose {
                eprintln!(
                    "{} {} scenes kept",
                    "detected".green().bold(),
                    scenes.len()
                );
            }

            let payload = if compact {
                scenes.to_json()?
            } else {
                scenes.to_json_pretty()?
            };

            match out {
                Some(path) => {
                    ensure_writable_path(&path, cli.global.overwrite)?;
                    fs::write(&path, payload)?;
                    println!("{} {}", "saved".green().bold(), path.display());
                }
                None => println!("{payload}"),
            }
        }
        Commands::Probe { input, json } => {
            let info = VideoFrameSource::probe(&input)?;
            if json {
                let payload = json!({
                    "width": info.width,
                    "height": info.height,
                    "fps": info.frames_per_second,
                    "frame_count": info.frame_count,
                    "duration_seconds": info.duration_seconds(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Video: {}x{} @ {:.2} fps", info.width, info.height, info.frames_per_second);
                println!("Frames: ~{}", info.frame_count);
                println!("Duration: {:.3}s", info.duration_seconds());
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "scenesplit", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
