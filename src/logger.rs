use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::fs;
use std::path::Path;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "cluster_sim.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Initializes the global logger.
///
/// Call once at the start of `main`. A second call keeps the installed logger
/// and only reports the failure on stderr.
///
/// The level comes from `RUST_LOG` (e.g. `RUST_LOG=debug`) and defaults to `info`.
/// Records go to stderr and to `logs/cluster_sim.log`, including the snapshot
/// events of the `analytics` target.
pub fn init() {
    init_with_level(None);
}

/// Same as [`init`], but a `level` given here wins over `RUST_LOG`.
pub fn init_with_level(level: Option<LevelFilter>) {
    let level = level.unwrap_or_else(level_from_env);
    let mut dispatch = Dispatch::new().level(level).chain(console_dispatch());

    let log_path = Path::new(LOG_DIR).join(LOG_FILE);
    match file_dispatch(&log_path) {
        Ok(file) => dispatch = dispatch.chain(file),
        Err(e) => eprintln!("Cannot log to '{}': {}, logging to stderr only", log_path.display(), e),
    }

    if let Err(e) = dispatch.apply() {
        eprintln!("Logger already installed: {}", e);
        return;
    }

    log::info!("Logging at level {} to stderr and '{}'.", level, log_path.display());
}

fn level_from_env() -> LevelFilter {
    std::env::var("RUST_LOG").ok().and_then(|value| value.parse().ok()).unwrap_or(LevelFilter::Info)
}

fn console_dispatch() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format(TIMESTAMP_FORMAT),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr())
}

fn file_dispatch(path: &Path) -> std::io::Result<Dispatch> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = fern::log_file(path)?;

    Ok(Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {} {}] {}", Local::now().format(TIMESTAMP_FORMAT), record.level(), record.target(), message))
        })
        .chain(file))
}
