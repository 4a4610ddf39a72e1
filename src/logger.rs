/// Logging setup: logs/heritago.log, or stderr if the file can't be opened

use log::LevelFilter;
use std::io::Write;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "logs/heritago.log";

pub fn init() {
    let mut builder = env_logger::Builder::new();

    if let Ok(log_level) = std::env::var("RUST_LOG") {
        builder.parse_filters(&log_level);
    } else {
        builder.filter_level(LevelFilter::Info);
        // Dependencies are too chatty at info
        builder.filter_module("hyper", LevelFilter::Warn);
        builder.filter_module("reqwest", LevelFilter::Warn);
        builder.filter_module("rusqlite", LevelFilter::Warn);
    }

    // [HH:MM:SS LEVEL] module - message
    builder.format(|buf, record| {
        let now = chrono::Local::now().format("%H:%M:%S");
        writeln!(
            buf,
            "[{} {}] {} - {}",
            now,
            record.level(),
            record.target(),
            record.args()
        )
    });

    let _ = std::fs::create_dir_all(LOG_DIR);

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE);

    match file {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.init();

    log::info!("Logging initialised ✓");
}
