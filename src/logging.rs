// src/logging.rs
//
// Thin layer over `log` + `env_logger`. The short macros stay so call sites read
// the same everywhere: logf! (info), logd! (debug), logw! (warn), loge! (error).
// Never pass a bearer token through these.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

use crate::config::consts::LOG_FILE;

static START: OnceLock<Instant> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// Install the global logger.
///
/// Lines look like `[00:00:01.250][INFO] message` and are appended to
/// `<store_dir>/debug.log`. If the file can't be opened we log to stderr instead.
/// `RUST_LOG` overrides the default `info` filter. Calling this twice is harmless.
pub fn init(store_dir: &Path) {
    start();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    builder.format(|buf, record| {
        let elapsed = fmt_elapsed(start().elapsed().as_millis());
        writeln!(buf, "[{elapsed}][{}] {}", record.level(), record.args())
    });

    let file = fs::create_dir_all(store_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(store_dir.join(LOG_FILE))
    });

    match file {
        Ok(f) => {
            builder.target(env_logger::Target::Pipe(Box::new(f)));
        }
        Err(_) => {
            builder.target(env_logger::Target::Stderr);
        }
    }

    let _ = builder.try_init();
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::log::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::log::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::log::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::log::error!($($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::fmt_elapsed;

    #[test]
    fn elapsed_is_zero_padded() {
        assert_eq!(fmt_elapsed(0), "00:00:00.000");
        assert_eq!(fmt_elapsed(3_723_004), "01:02:03.004");
    }
}
