use std::fs::{self, OpenOptions};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config;

/// Send tracing output to the configured log file. The terminal owns stdout,
/// so there is no console layer; a missing or unwritable log path disables
/// logging rather than aborting startup.
pub fn init_tracing(settings: &config::Settings) {
    let path = settings
        .log
        .file
        .clone()
        .or_else(config::default_log_path);
    let Some(path) = path else { return };

    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("jukebox: cannot open log file {}: {e}", path.display());
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .try_init();
}
