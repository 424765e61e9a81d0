//! Stderr logging for the tracker binaries.
//!
//! Lines look like `[  1.234s  WARN triangulate] message`, with the
//! `irtrack_*` crate prefix dropped from the target. The elapsed time makes
//! the per-frame cadence visible when replaying recordings. Records from
//! other crates are only shown at `warn` and above.

use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable overriding the log level (`error` .. `trace`, `off`).
pub const LOG_ENV: &str = "IRTRACK_LOG";

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

fn is_own_target(target: &str) -> bool {
    target.starts_with("irtrack")
}

fn short_target(target: &str) -> &str {
    match target.split_once("::") {
        Some((krate, rest)) if is_own_target(krate) => rest,
        _ => target,
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
            && (metadata.level() <= Level::Warn || is_own_target(metadata.target()))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{elapsed:7.3}s {:>5} {}] {}",
            record.level(),
            short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Level from [`LOG_ENV`] if it is set and parses, else `fallback`.
pub fn level_from_env(fallback: LevelFilter) -> LevelFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(fallback)
}

/// Install the stderr logger at `level`.
///
/// Only the first successful call has an effect.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StderrLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` subscriber. `RUST_LOG` wins over `default_directive`
/// (for example `"irtrack=debug"`). Resolver and detector spans are
/// reported when they close.
#[cfg(feature = "tracing")]
pub fn init_tracing(default_directive: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
