//! # Crate errors
//!
//! Every module returns its own error type; [`Error`] gathers them for
//! callers that drive several subsystems at once, such as the command line.

use crate::{
    config::ConfigError, counter::CounterError, graph::RegistryError, ontology::IriError,
    ontology::TypeCodeError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Counter(#[from] CounterError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Iri(#[from] IriError),

    #[error(transparent)]
    TypeCode(#[from] TypeCodeError),

    #[error("cannot read triple batch: {0}")]
    Batch(#[from] serde_json::Error),

    #[error("invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Logger(#[from] tracing_subscriber::util::TryInitError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
