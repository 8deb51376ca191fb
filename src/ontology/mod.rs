//! Closed ontology vocabulary and the value objects built on it.
//!
//! The module only holds pure domain constructs: the fixed set of entity and
//! provenance type codes, the IRIs of their classes and properties, and the
//! identifier types used by the registry and the counter subsystem.

pub mod entities;
pub mod value_objects;
pub mod vocabulary;

pub use entities::{Attribution, EntityRecord, EntityTypeCode, ProvenanceTypeCode, TypeCodeError};
pub use value_objects::{Iri, IriError, Namespace};
