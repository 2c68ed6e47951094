//! Logging setup.
//!
//! The decoders log through the `log` facade only: `trace!` per decoded run
//! header and `debug!` when a truncated packed run is zero-filled or rejected.
//! Embedders that already install a logger need nothing from this module.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;

use log::LevelFilter;

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` at `level`, printing `[LEVEL] message` lines to
/// stderr or, when `log_file` is given, appending them to that file.
///
/// Only the first call has any effect. Returns `false` if the log file could
/// not be opened; logging then goes to stderr.
pub fn enable_verbose_logging(level: LevelFilter, log_file: Option<&Path>) -> bool {
    let mut opened = true;
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(cfg!(test));
        builder.filter_level(level);

        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())
        });

        if let Some(path) = log_file {
            match OpenOptions::new().append(true).create(true).open(path) {
                Ok(file) => {
                    builder.target(env_logger::Target::Pipe(Box::new(file)));
                }
                Err(_) => opened = false,
            }
        }

        let _ = builder.try_init();
    });
    opened
}
