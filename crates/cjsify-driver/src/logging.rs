//! Tracing setup for the `cjsify` binary.
//!
//! Logging is off unless `CJSIFY_LOG` (or `RUST_LOG`) is set. The value uses
//! `RUST_LOG` syntax:
//!
//! ```bash
//! CJSIFY_LOG=debug cjsify compile src/index.js
//! CJSIFY_LOG=cjsify_modules=trace CJSIFY_LOG_FORMAT=json cjsify compile src/index.js
//! ```
//!
//! Output always goes to stderr so it never mixes with compiled code on stdout.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("CJSIFY_LOG_FORMAT").unwrap_or_default())
    }
}

/// `CJSIFY_LOG` wins over `RUST_LOG`.
fn build_filter() -> Option<EnvFilter> {
    if let Ok(value) = std::env::var("CJSIFY_LOG") {
        return Some(EnvFilter::builder().parse_lossy(value));
    }
    std::env::var("RUST_LOG")
        .ok()
        .map(|value| EnvFilter::builder().parse_lossy(value))
}

/// Installs the global subscriber when logging was requested.
pub fn init() {
    let Some(filter) = build_filter() else {
        return;
    };

    let result = match LogFormat::from_env() {
        LogFormat::Json => {
            let layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(layer).try_init()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish()
            .try_init(),
    };
    if let Err(err) = result {
        eprintln!("warning: could not initialise logging: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
        assert_eq!(LogFormat::parse("tree"), LogFormat::Text);
    }
}
