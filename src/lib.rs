//! # bibgraph
//!
//! Identity allocation and validated import for bibliographic metadata graphs.
//!
//! - [`counter`]: monotonic counters behind a [`counter::CounterHandler`]
//!   trait, with a volatile and a durable filesystem implementation.
//! - [`graph`]: the [`graph::EntityRegistry`], which mints or rehydrates
//!   entities and owns the triples describing them.
//! - [`import`]: the [`import::GraphImporter`], which accepts or rejects each
//!   subject of a triple batch independently.

pub mod config;
pub mod counter;
pub mod errors;
pub mod graph;
pub mod import;
pub mod logger;
pub mod ontology;

#[cfg(feature = "cli")]
pub mod cli;

pub use errors::{Error, Result};
