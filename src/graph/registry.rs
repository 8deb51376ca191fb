use std::{collections::BTreeMap, sync::Arc};

use thiserror::Error;

use super::store::{Term, Triple, TripleStore};
use crate::{
    counter::{CounterError, CounterHandle},
    ontology::{
        vocabulary::{self as voc, known_iri},
        Attribution, EntityRecord, EntityTypeCode, Iri, IriError, Namespace,
        ProvenanceTypeCode,
    },
};

/// Single source of truth for the entities of one authoring or import session.
///
/// The registry owns the triple store; [`EntityRecord`]s are shared handles
/// and carry no data of their own. For a given identifier at most one record
/// exists, so repeated lookups hand out the same [`Arc`].
pub struct EntityRegistry {
    namespace: Namespace,
    counters: Arc<CounterHandle>,
    attribution: Attribution,
    records: BTreeMap<Iri, Arc<EntityRecord>>,
    store: TripleStore,
}

impl EntityRegistry {
    /// Creates an empty registry minting identifiers below `namespace`.
    pub fn new(namespace: Namespace, counters: Arc<CounterHandle>) -> Self {
        Self {
            namespace,
            counters,
            attribution: Attribution::default(),
            records: BTreeMap::new(),
            store: TripleStore::new(),
        }
    }

    /// Sets the attribution stamped on records created without an explicit one.
    #[must_use]
    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = attribution;
        self
    }

    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Returns a clone of the counter handler.
    #[must_use]
    pub fn counter_handler(&self) -> Arc<CounterHandle> {
        Arc::clone(&self.counters)
    }

    /// Returns the record for `existing`, or creates one.
    ///
    /// With an identifier the record is rehydrated without touching the
    /// counters; without one a fresh identifier is minted, skipping any
    /// sequence number whose identifier is already registered.
    pub fn get_or_create(
        &mut self,
        code: EntityTypeCode,
        existing: Option<&Iri>,
    ) -> Result<Arc<EntityRecord>, RegistryError> {
        let attribution = self.attribution.clone();
        self.get_or_create_attributed(code, existing, &attribution)
    }

    /// Same as [`Self::get_or_create`] with an explicit attribution for new records.
    pub fn get_or_create_attributed(
        &mut self,
        code: EntityTypeCode,
        existing: Option<&Iri>,
        attribution: &Attribution,
    ) -> Result<Arc<EntityRecord>, RegistryError> {
        let iri = match existing {
            Some(iri) => {
                if let Some(record) = self.records.get(iri) {
                    return Ok(Arc::clone(record));
                }
                tracing::trace!(iri = %iri, code = %code, "entity_rehydrated");
                iri.clone()
            }
            None => loop {
                let sequence = self.counters.increment_entity_counter(code)?;
                let iri = self.namespace.mint(code, sequence)?;
                // the counter store may lag behind records loaded from elsewhere
                if self.records.contains_key(&iri) {
                    tracing::debug!(iri = %iri, code = %code, sequence, "minted_identifier_taken");
                    continue;
                }
                tracing::debug!(iri = %iri, code = %code, sequence, "entity_minted");
                break iri;
            },
        };

        self.store.insert(Triple::new(
            iri.clone(),
            known_iri(voc::RDF_TYPE),
            Term::resource(known_iri(code.class_iri())),
        ));
        let record = Arc::new(EntityRecord::new(iri.clone(), code, attribution.clone()));
        self.records.insert(iri, Arc::clone(&record));
        Ok(record)
    }

    /// Looks up a registered record.
    #[must_use]
    pub fn get(&self, iri: &Iri) -> Option<Arc<EntityRecord>> {
        self.records.get(iri).cloned()
    }

    #[must_use]
    pub fn contains(&self, iri: &Iri) -> bool {
        self.records.contains_key(iri)
    }

    /// Explicitly drops a record together with every triple describing it.
    pub fn remove(&mut self, iri: &Iri) -> Option<Arc<EntityRecord>> {
        let record = self.records.remove(iri)?;
        let removed = self.store.remove_subject(iri);
        tracing::debug!(iri = %iri, triples = removed, "entity_removed");
        Some(record)
    }

    /// Returns every record in identifier order.
    pub fn records(&self) -> impl Iterator<Item = &Arc<EntityRecord>> + '_ {
        self.records.values()
    }

    /// Returns the records of a single type in identifier order.
    pub fn records_of_type(
        &self,
        code: EntityTypeCode,
    ) -> impl Iterator<Item = &Arc<EntityRecord>> + '_ {
        self.records
            .values()
            .filter(move |record| record.code() == code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read access to the owned triple store.
    #[must_use]
    pub fn store(&self) -> &TripleStore {
        &self.store
    }

    /// Adds a property value, keeping existing values of the same predicate.
    pub fn add_property(
        &mut self,
        record: &EntityRecord,
        predicate: &Iri,
        object: Term,
    ) -> Result<(), RegistryError> {
        self.check_property(record, predicate)?;
        self.store
            .insert(Triple::new(record.iri().clone(), predicate.clone(), object));
        Ok(())
    }

    /// Replaces every value of `predicate` with `object`.
    pub fn set_property(
        &mut self,
        record: &EntityRecord,
        predicate: &Iri,
        object: Term,
    ) -> Result<(), RegistryError> {
        self.check_property(record, predicate)?;
        self.store.remove_predicate(record.iri(), predicate);
        self.store
            .insert(Triple::new(record.iri().clone(), predicate.clone(), object));
        Ok(())
    }

    /// Removes every value of `predicate`, returning how many were dropped.
    pub fn remove_property(
        &mut self,
        record: &EntityRecord,
        predicate: &Iri,
    ) -> Result<usize, RegistryError> {
        self.check_property(record, predicate)?;
        Ok(self.store.remove_predicate(record.iri(), predicate))
    }

    /// Returns the values of `predicate` for the record.
    pub fn objects<'a>(
        &'a self,
        record: &EntityRecord,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.store.objects(record.iri(), predicate)
    }

    /// Returns the first literal value of `predicate`, if any.
    #[must_use]
    pub fn literal<'a>(&'a self, record: &EntityRecord, predicate: &'a str) -> Option<&'a str> {
        self.objects(record, predicate).find_map(Term::as_literal)
    }

    /// Returns the resources referenced through `predicate`.
    #[must_use]
    pub fn references(&self, record: &EntityRecord, predicate: &str) -> Vec<Iri> {
        self.store
            .objects(record.iri(), predicate)
            .filter_map(Term::as_iri)
            .cloned()
            .collect()
    }

    /// Returns every triple whose subject is the record.
    #[must_use]
    pub fn triples_of(&self, record: &EntityRecord) -> Vec<Triple> {
        self.store
            .statements(record.iri())
            .map(|(p, o)| Triple::new(record.iri().clone(), p.clone(), o.clone()))
            .collect()
    }

    /// Mints the identifier of the next provenance snapshot of `record`.
    pub fn mint_snapshot(&self, record: &EntityRecord) -> Result<Iri, RegistryError> {
        let Some((code, sequence)) = self.namespace.parse(record.iri()) else {
            return Err(RegistryError::ForeignIdentifier {
                iri: record.iri().clone(),
            });
        };
        let prov = ProvenanceTypeCode::Snapshot;
        let number = self.counters.increment_counter(code, Some(prov), sequence)?;
        let iri = self.namespace.mint_provenance(record.iri(), prov, number)?;
        tracing::debug!(iri = %iri, entity = %record.iri(), "snapshot_minted");
        Ok(iri)
    }

    fn check_property(&self, record: &EntityRecord, predicate: &Iri) -> Result<(), RegistryError> {
        if !self.records.contains_key(record.iri()) {
            return Err(RegistryError::UnknownEntity {
                iri: record.iri().clone(),
            });
        }
        if !record.code().permits(predicate.as_str()) {
            return Err(RegistryError::PropertyNotPermitted {
                code: record.code(),
                predicate: predicate.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn insert_unchecked(&mut self, triple: Triple) {
        self.store.insert(triple);
    }
}

/// Errors raised by [`EntityRegistry`] operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Counter(#[from] CounterError),
    #[error(transparent)]
    Iri(#[from] IriError),
    /// The predicate is not part of the type's permitted-property table.
    #[error("predicate `{predicate}` is not permitted on `{code}` entities")]
    PropertyNotPermitted {
        code: EntityTypeCode,
        predicate: Iri,
    },
    /// The record does not belong to this registry.
    #[error("entity `{iri}` is not registered")]
    UnknownEntity { iri: Iri },
    /// The identifier was not minted under this registry's namespace.
    #[error("entity `{iri}` does not belong to the registry namespace")]
    ForeignIdentifier { iri: Iri },
}
