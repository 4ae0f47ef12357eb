/// Logger setup for the terminal frontend
use std::fs::File;
use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "fill3d_core=debug"). While the renderer owns the alternate screen,
/// stderr output would tear the frame, so `log_file` redirects it.
#[derive(Debug, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub log_file: Option<File>,
}

static INIT: Once = Once::new();

/// Initializes the global logger once. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Warn);
        }

        if let Some(file) = config.log_file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder.write_style(env_logger::WriteStyle::Never);
        }

        builder.init();
        log::debug!("logging initialized");
    });
}
