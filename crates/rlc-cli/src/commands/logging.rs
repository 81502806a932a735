//! Log subscriber setup.
//!
//! `RLC_LOG` (error|warn|info|debug|trace) wins over `-v`. Logs always go
//! to stderr so program output on stdout stays clean.

use tracing::Level;

pub const LOG_ENV: &str = "RLC_LOG";

/// Level from the environment override, else from the `-v` count.
pub fn level_for(verbose: u8, env: Option<&str>) -> Level {
    if let Some(level) = env.and_then(|value| value.trim().parse::<Level>().ok()) {
        return level;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn init(verbose: u8, json: bool) {
    let env = std::env::var(LOG_ENV).ok();
    let level = level_for(verbose, env.as_deref());

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false);

    let _ = if json {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.try_init()
    };
}
