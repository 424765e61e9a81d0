use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use irtrack::{load_recording, FrameUpdate, GestureEvent, TrackedPoint, TrackerConfig};
use serde::Serialize;

/// Replay dual-sensor recordings and inspect tracker configs.
#[derive(Debug, Parser)]
#[command(author, version, about = "Dual infrared-sensor tracker")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines (builds with the `tracing` feature only).
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Feed a JSON-lines recording through a tracker and print each frame.
    Replay {
        /// Recording file, one `{"sensor": .., "detections": [..]}` per line.
        recording: PathBuf,

        /// Tracker config (JSON). Defaults are used if omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also report points normalized to the configured working volume.
        #[arg(long)]
        normalize: bool,

        /// Print one JSON object per frame instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the default tracker config as JSON.
    ConfigTemplate {
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct ReplayRecord<'a> {
    sample: usize,
    #[serde(flatten)]
    update: &'a FrameUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalized: Option<[Option<[f64; 3]>; 2]>,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json)?;

    match cli.command {
        Command::Replay {
            recording,
            config,
            normalize,
            json,
        } => replay(&recording, config.as_deref(), normalize, json),
        Command::ConfigTemplate { out } => config_template(out.as_deref()),
    }
}

fn verbosity(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => irtrack::core::level_from_env(log::LevelFilter::Warn),
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: u8, _json: bool) -> Result<(), Box<dyn Error>> {
    irtrack::core::init_with_level(verbosity(verbose))?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(verbose: u8, json: bool) -> Result<(), Box<dyn Error>> {
    let directive = format!("irtrack={}", verbosity(verbose).as_str().to_lowercase());
    irtrack::core::init_tracing(&directive, json);
    // No-op when the fmt subscriber already bridged `log`.
    let _ = tracing_log::LogTracer::init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<TrackerConfig, Box<dyn Error>> {
    Ok(match path {
        Some(path) => TrackerConfig::load_json(path)?,
        None => TrackerConfig::default(),
    })
}

fn replay(
    recording: &Path,
    config: Option<&Path>,
    normalize: bool,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let config = load_config(config)?;
    let tracker = config.build_tracker()?;
    let samples = load_recording(recording)?;

    let mut gesture_count = 0usize;
    for (idx, sample) in samples.iter().enumerate() {
        let Some(slots) = sample.slots() else {
            continue;
        };
        let update = tracker.on_detections(sample.sensor, slots);
        gesture_count += update.gestures.len();

        let normalized = normalize.then(|| {
            update
                .frame
                .points()
                .map(|p| p.map(|p| config.volume.normalize(&p)))
        });

        if json {
            let record = ReplayRecord {
                sample: idx,
                update: &update,
                normalized,
            };
            println!("{}", serde_json::to_string(&record)?);
        } else {
            print_text(idx, &update, normalized);
        }
    }

    log::info!(
        "replayed {} samples, {} gesture(s)",
        samples.len(),
        gesture_count
    );
    Ok(())
}

fn fmt_point(p: Option<TrackedPoint>) -> String {
    match p {
        Some(p) => format!("({:.1}, {:.1}, {:.1}) err={:.2}", p.x(), p.y(), p.z(), p.error),
        None => "-".to_string(),
    }
}

fn print_text(idx: usize, update: &FrameUpdate, normalized: Option<[Option<[f64; 3]>; 2]>) {
    let frame = &update.frame;
    println!(
        "#{idx} {:?}: left={} right={} missing={}",
        update.sensor,
        fmt_point(frame.left),
        fmt_point(frame.right),
        frame.missing_detections
    );
    if let Some(normalized) = normalized {
        for (name, n) in ["left", "right"].iter().zip(normalized) {
            if let Some([x, y, z]) = n {
                println!("  {name} normalized: ({x:.3}, {y:.3}, {z:.3})");
            }
        }
    }
    for event in &update.gestures {
        match event {
            GestureEvent::Pinch { location } => {
                println!("  gesture: pinch at {}", fmt_point(Some(*location)))
            }
            GestureEvent::Unpinch { location } => {
                println!("  gesture: unpinch at {}", fmt_point(Some(*location)))
            }
            GestureEvent::Swipe {
                axis,
                direction,
                origin,
            } => println!(
                "  gesture: swipe {axis:?} {direction:+} from {}",
                fmt_point(Some(*origin))
            ),
        }
    }
}

fn config_template(out: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let config = TrackerConfig::default();
    match out {
        Some(path) => config.write_json(path)?,
        None => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}
