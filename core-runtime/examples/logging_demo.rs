//! Logging system demonstration
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run -p core-runtime --example logging_demo
//!
//! # JSON format
//! cargo run -p core-runtime --example logging_demo -- json
//!
//! # With custom filter
//! cargo run -p core-runtime --example logging_demo -- pretty "core_runtime=trace"
//! ```

use core_runtime::logging::{
    init_logging, redact_if_sensitive, strip_path, LogFormat, LogLevel, LoggingConfig,
};
use std::env;
use tracing::{debug, info, warn};

fn main() {
    let args: Vec<String> = env::args().collect();

    let format = if args.len() > 1 {
        match args[1].as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    } else {
        LogFormat::default()
    };

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace)
        .with_target(true);

    if let Some(f) = args.get(2).cloned() {
        config = config.with_filter(f);
    }

    init_logging(config).expect("Failed to initialize logging");

    info!(format = ?format, "logging initialized");

    let account = "alice@cloud.example.org";
    info!(
        account = %redact_if_sensitive("account", account),
        "starting camera folder reconciliation"
    );

    let local = "/sdcard/DCIM/Camera/IMG_0001.jpg";
    debug!(file = %strip_path(local), "candidate file discovered");
    warn!(file = %strip_path(local), "remote listing unavailable, skipping target");
}
