//! # Configuration
//!
//! Settings are read from YAML. Every section is optional and falls back to
//! its defaults:
//!
//! ```yaml
//! base_iri: "https://w3id.org/oc/meta/"
//! supplier_prefix: "060"
//! counter:
//!   backend: filesystem
//!   dir: ./counters
//! import:
//!   validate: true
//!   closed: false
//! logger:
//!   enable: true
//!   level: info
//!   format: compact
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    counter::{CounterError, CounterHandle, DurableCounterHandler, VolatileCounterHandler},
    import::ImportSettings,
    logger::LoggerSettings,
    ontology::{IriError, Namespace},
};

pub const DEFAULT_BASE_IRI: &str = "https://w3id.org/oc/meta/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error(transparent)]
    Namespace(#[from] IriError),
    #[error(transparent)]
    Counter(#[from] CounterError),
}

/// Top-level settings.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub base_iri: String,
    pub supplier_prefix: String,
    pub counter: CounterSettings,
    pub import: ImportSettings,
    pub logger: LoggerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_iri: DEFAULT_BASE_IRI.to_string(),
            supplier_prefix: String::new(),
            counter: CounterSettings::default(),
            import: ImportSettings::default(),
            logger: LoggerSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// When the file cannot be read or does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parses settings from YAML text. An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// When the text is not valid settings YAML.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Builds the namespace identifiers are minted under.
    ///
    /// # Errors
    ///
    /// When `base_iri` is not a valid IRI.
    pub fn namespace(&self) -> Result<Namespace, ConfigError> {
        Ok(Namespace::new(
            self.base_iri.clone(),
            self.supplier_prefix.clone(),
        )?)
    }
}

/// Which counter handler to use.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CounterBackend {
    #[default]
    InMemory,
    Filesystem,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CounterSettings {
    pub backend: CounterBackend,
    /// Storage directory of the filesystem backend.
    pub dir: PathBuf,
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            backend: CounterBackend::default(),
            dir: PathBuf::from("./counters"),
        }
    }
}

impl CounterSettings {
    /// Instantiates the configured counter handler.
    ///
    /// # Errors
    ///
    /// When the filesystem backend cannot open its directory.
    pub fn build(&self) -> Result<Arc<CounterHandle>, ConfigError> {
        let handler: Arc<CounterHandle> = match self.backend {
            CounterBackend::InMemory => Arc::new(VolatileCounterHandler::new()),
            CounterBackend::Filesystem => Arc::new(DurableCounterHandler::open(&self.dir)?),
        };
        tracing::debug!(backend = ?self.backend, dir = %self.dir.display(), "counter_handler_ready");
        Ok(handler)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{ConfigError, CounterBackend, Settings, DEFAULT_BASE_IRI};
    use crate::{
        counter::CounterHandler,
        logger::{Format, LogLevel},
        ontology::EntityTypeCode,
    };

    #[test]
    fn empty_document_yields_defaults() {
        let settings = Settings::from_yaml_str("").expect("defaults");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.base_iri, DEFAULT_BASE_IRI);
        assert_eq!(settings.counter.backend, CounterBackend::InMemory);
        assert!(settings.import.validate);
        assert!(!settings.import.closed);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let settings = Settings::from_yaml_str(
            r"
supplier_prefix: '060'
counter:
  backend: filesystem
  dir: /var/lib/bibgraph
import:
  closed: true
logger:
  level: debug
  format: json
",
        )
        .expect("valid yaml");
        assert_eq!(settings.supplier_prefix, "060");
        assert_eq!(settings.counter.backend, CounterBackend::Filesystem);
        assert_eq!(settings.counter.dir.to_str(), Some("/var/lib/bibgraph"));
        assert!(settings.import.validate);
        assert!(settings.import.closed);
        assert!(settings.logger.enable);
        assert_eq!(settings.logger.level, LogLevel::Debug);
        assert_eq!(settings.logger.format, Format::Json);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = Settings::from_yaml_str("counter:\n  backend: redis\n").expect_err("bad backend");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file_and_builds_counters() {
        let dir = tempfile::tempdir().expect("tempdir");
        let counters = dir.path().join("counters");
        let path = dir.path().join("bibgraph.yaml");
        fs::write(
            &path,
            format!(
                "counter:\n  backend: filesystem\n  dir: {}\n",
                counters.display()
            ),
        )
        .expect("write config");

        let settings = Settings::from_file(&path).expect("load");
        let handler = settings.counter.build().expect("build");
        assert_eq!(
            handler
                .increment_entity_counter(EntityTypeCode::Citation)
                .expect("increment"),
            1
        );
        assert!(counters.join("ci.counter").exists());
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = Settings::from_file("/nonexistent/bibgraph.yaml").expect_err("missing");
        assert!(matches!(err, ConfigError::Read { path, .. } if path.ends_with("bibgraph.yaml")));
    }

    #[test]
    fn namespace_is_derived_from_settings() {
        let settings = Settings::from_yaml_str("base_iri: https://example.org/meta\n").expect("yaml");
        assert_eq!(settings.namespace().expect("namespace").base(), "https://example.org/meta/");

        let bad = Settings::from_yaml_str("base_iri: not an iri\n").expect("yaml");
        assert!(matches!(bad.namespace(), Err(ConfigError::Namespace(_))));
    }
}
