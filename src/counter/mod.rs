//! Monotonic counters backing identifier allocation.
//!
//! Counters are keyed either by an entity type alone (primary counters) or by
//! an entity type, a provenance type and the sequence number of the owning
//! entity (provenance counters). Owning identifiers are 1-indexed.

use std::path::PathBuf;

use thiserror::Error;

use crate::ontology::{EntityTypeCode, ProvenanceTypeCode, TypeCodeError};

pub mod filesystem;
pub mod in_memory;

pub use filesystem::DurableCounterHandler;
pub use in_memory::VolatileCounterHandler;

/// Type alias simplifying counter handler trait object usage.
pub type CounterHandle = dyn CounterHandler + Send + Sync + 'static;

/// Contract shared by every counter store.
pub trait CounterHandler {
    /// Returns the current value of the addressed counter.
    ///
    /// Reading never changes what a later read or increment observes.
    fn read_counter(
        &self,
        entity: EntityTypeCode,
        provenance: Option<ProvenanceTypeCode>,
        owning_id: u64,
    ) -> Result<u64, CounterError>;

    /// Advances the addressed counter by one and returns the new value.
    fn increment_counter(
        &self,
        entity: EntityTypeCode,
        provenance: Option<ProvenanceTypeCode>,
        owning_id: u64,
    ) -> Result<u64, CounterError>;

    /// Reads the primary counter of `entity`.
    fn read_entity_counter(&self, entity: EntityTypeCode) -> Result<u64, CounterError> {
        self.read_counter(entity, None, 1)
    }

    /// Increments the primary counter of `entity`.
    fn increment_entity_counter(&self, entity: EntityTypeCode) -> Result<u64, CounterError> {
        self.increment_counter(entity, None, 1)
    }
}

/// Fully validated coordinates of one counter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CounterAddress {
    pub entity: EntityTypeCode,
    pub provenance: Option<ProvenanceTypeCode>,
    pub owning_id: u64,
}

impl CounterAddress {
    pub fn new(
        entity: EntityTypeCode,
        provenance: Option<ProvenanceTypeCode>,
        owning_id: u64,
    ) -> Result<Self, CounterError> {
        check_owning_id(owning_id)?;
        Ok(Self {
            entity,
            provenance,
            owning_id,
        })
    }

    /// Parses textual short codes, as supplied by command lines or
    /// configuration files.
    pub fn parse(entity: &str, provenance: Option<&str>, owning_id: i64) -> Result<Self, CounterError> {
        let entity = entity.parse::<EntityTypeCode>()?;
        let provenance = provenance
            .filter(|code| !code.is_empty())
            .map(str::parse::<ProvenanceTypeCode>)
            .transpose()?;
        let owning_id = u64::try_from(owning_id)
            .map_err(|_| CounterError::InvalidIdentifier { owning_id })?;
        Self::new(entity, provenance, owning_id)
    }

    pub fn read(&self, handler: &CounterHandle) -> Result<u64, CounterError> {
        handler.read_counter(self.entity, self.provenance, self.owning_id)
    }

    pub fn increment(&self, handler: &CounterHandle) -> Result<u64, CounterError> {
        handler.increment_counter(self.entity, self.provenance, self.owning_id)
    }
}

pub(crate) fn check_owning_id(owning_id: u64) -> Result<(), CounterError> {
    if owning_id == 0 {
        return Err(CounterError::InvalidIdentifier { owning_id: 0 });
    }
    Ok(())
}

/// Errors raised by counter handlers.
#[derive(Debug, Error)]
pub enum CounterError {
    /// The entity type code is outside the closed set.
    #[error("`{0}` is not a known entity type code")]
    InvalidEntityType(String),
    /// The provenance type code is outside the closed set.
    #[error("`{0}` is not a known provenance type code")]
    InvalidProvenanceType(String),
    /// Owning identifiers start at 1.
    #[error("owning identifier must be a positive integer, got {owning_id}")]
    InvalidIdentifier { owning_id: i64 },
    /// Reading or writing the durable store failed; the counter was not advanced.
    #[error("failed to persist counter at `{path}`: {source}")]
    PersistenceFailure {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A durable counter record does not hold a number.
    #[error("counter record at `{path}` is corrupt: {content:?}")]
    Corrupt { path: PathBuf, content: String },
    /// The counter already holds the largest representable value.
    #[error("counter {entity}/{provenance:?}/{owning_id} cannot be incremented past {max}", max = u64::MAX)]
    Exhausted {
        entity: EntityTypeCode,
        provenance: Option<ProvenanceTypeCode>,
        owning_id: u64,
    },
}

impl From<TypeCodeError> for CounterError {
    fn from(err: TypeCodeError) -> Self {
        match err {
            TypeCodeError::UnknownEntityType(code) => Self::InvalidEntityType(code),
            TypeCodeError::UnknownProvenanceType(code) => Self::InvalidProvenanceType(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CounterAddress, CounterError};
    use crate::ontology::{EntityTypeCode, ProvenanceTypeCode};

    #[test]
    fn parses_textual_addresses() {
        let address = CounterAddress::parse("br", Some("se"), 3).expect("valid address");
        assert_eq!(address.entity, EntityTypeCode::BibliographicResource);
        assert_eq!(address.provenance, Some(ProvenanceTypeCode::Snapshot));
        assert_eq!(address.owning_id, 3);

        let primary = CounterAddress::parse("ra", Some(""), 1).expect("valid address");
        assert_eq!(primary.provenance, None);
    }

    #[test]
    fn rejects_unknown_codes_and_identifiers() {
        assert!(matches!(
            CounterAddress::parse("zz", None, 1),
            Err(CounterError::InvalidEntityType(code)) if code == "zz"
        ));
        assert!(matches!(
            CounterAddress::parse("br", Some("xx"), 1),
            Err(CounterError::InvalidProvenanceType(code)) if code == "xx"
        ));
        assert!(matches!(
            CounterAddress::parse("br", Some("se"), 0),
            Err(CounterError::InvalidIdentifier { owning_id: 0 })
        ));
        assert!(matches!(
            CounterAddress::parse("br", None, -4),
            Err(CounterError::InvalidIdentifier { owning_id: -4 })
        ));
    }
}
