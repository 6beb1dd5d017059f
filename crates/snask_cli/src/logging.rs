//! Minimal stderr logger behind the `log` facade.

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};

pub(crate) const ENV_LOG: &str = "SNASK_LOG";

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut err = std::io::stderr().lock();
        let _ = writeln!(
            err,
            "[{:<5} {}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// `-v` flags win; otherwise `SNASK_LOG` (error..trace, off); otherwise warn.
pub(crate) fn level_for(verbose: u8, env: Option<&str>) -> LevelFilter {
    match verbose {
        0 => env
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub(crate) fn init(verbose: u8) {
    let env = std::env::var(ENV_LOG).ok();
    let level = level_for(verbose, env.as_deref());
    if log::set_boxed_logger(Box::new(StderrLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}
