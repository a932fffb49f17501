use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use chrono::Local;
use log::LevelFilter;
use crate::error::Result;

/// Install the global logger with a timestamped line format.
///
/// With `log_dir` set, output is appended to `{log_dir}/{name}_{timestamp}.log`,
/// otherwise it goes to stderr.
pub fn init_logging(name: &str, level: LevelFilter, log_dir: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level);

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("{}_{}.log", name, timestamp)))?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }

    // A second init (e.g. from tests) keeps the first logger.
    let _ = builder.try_init();
    Ok(())
}
