//! Minimal stderr logger.
//!
//! One line per record: level, uptime, target, message. Install it once at
//! startup with `init_with_level`; installing a second logger fails with
//! the `log` crate's registration error.

use std::io::Write;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let _ = writeln!(
            std::io::stderr().lock(),
            "{:<5} {:9.3}s {} > {}",
            record.level(),
            self.started.elapsed().as_secs_f64(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the stderr logger with the provided level filter.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(StderrLogger {
        level,
        started: Instant::now(),
    }))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);
    if json {
        let _ = builder.json().flatten_event(true).try_init();
    } else {
        let _ = builder.compact().with_timer(fmt::time::uptime()).try_init();
    }
}

#[cfg(test)]
mod tests {
    // The CLI parses a `LevelFilter` argument and boxes logger errors, which
    // needs these types to implement `std::error::Error` (the `std` feature
    // of `log`).
    #[test]
    fn log_errors_implement_std_error() {
        fn boxable<E: std::error::Error + 'static>() {}
        boxable::<log::ParseLevelError>();
        boxable::<log::SetLoggerError>();
    }
}
