//! # Logger
//!
//! Installs a `tracing` subscriber built from [`LoggerSettings`]. `RUST_LOG`
//! takes precedence over the configured level when it is set.

use std::fmt::{self, Display, Formatter};

use serde::Deserialize;
use tracing_subscriber::{
    fmt::{self as tracing_fmt, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::Result;

/// Targets whose events pass the default filter.
const MODULE_WHITELIST: &[&str] = &["bibgraph"];

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggerSettings {
    pub enable: bool,
    pub level: LogLevel,
    pub format: Format,
    /// Full filter directive replacing the whitelist, e.g. `bibgraph=trace,warn`.
    pub override_filter: Option<String>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            enable: true,
            level: LogLevel::default(),
            format: Format::default(),
            override_filter: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Installs the global subscriber.
///
/// Does nothing when logging is disabled.
///
/// # Errors
///
/// When the filter directive is invalid or a global subscriber is already set.
pub fn init(settings: &LoggerSettings) -> Result<()> {
    if !settings.enable {
        return Ok(());
    }
    let filter = env_filter(settings.override_filter.as_deref(), settings.level)?;
    let layer = init_layer(std::io::stderr, settings.format, true);
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()?;
    Ok(())
}

fn env_filter(override_filter: Option<&str>, level: LogLevel) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directives = override_filter.map_or_else(
        || {
            MODULE_WHITELIST
                .iter()
                .map(|module| format!("{module}={level}"))
                .collect::<Vec<_>>()
                .join(",")
        },
        ToOwned::to_owned,
    );
    Ok(EnvFilter::try_new(directives)?)
}

fn init_layer<W>(make_writer: W, format: Format, ansi: bool) -> Box<dyn Layer<Registry> + Sync + Send>
where
    W: for<'writer> MakeWriter<'writer> + Sync + Send + 'static,
{
    match format {
        Format::Compact => tracing_fmt::Layer::default()
            .with_ansi(ansi)
            .with_writer(make_writer)
            .compact()
            .boxed(),
        Format::Pretty => tracing_fmt::Layer::default()
            .with_ansi(ansi)
            .with_writer(make_writer)
            .pretty()
            .boxed(),
        Format::Json => tracing_fmt::Layer::default()
            .with_ansi(false)
            .with_writer(make_writer)
            .json()
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::{env_filter, LogLevel};

    #[test]
    fn whitelist_filter_uses_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(env_filter(None, LogLevel::Debug).is_ok());
        assert!(env_filter(None, LogLevel::Off).is_ok());
    }

    #[test]
    fn invalid_override_is_an_error() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(env_filter(Some("bibgraph=loud"), LogLevel::Info).is_err());
    }
}
