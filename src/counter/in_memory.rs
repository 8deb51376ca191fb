use std::collections::BTreeMap;

use parking_lot::Mutex;

use super::{check_owning_id, CounterError, CounterHandler};
use crate::ontology::{EntityTypeCode, ProvenanceTypeCode};

/// Provenance counters of one `(entity, provenance)` pair, keyed by owning id.
///
/// Owning ids are sparse; an id without an entry has never been incremented.
type OwnerCounters = BTreeMap<u64, u64>;

#[derive(Debug)]
struct CounterTables {
    entities: BTreeMap<EntityTypeCode, u64>,
    provenance: BTreeMap<(EntityTypeCode, ProvenanceTypeCode), OwnerCounters>,
}

impl Default for CounterTables {
    fn default() -> Self {
        let entities = EntityTypeCode::ALL.into_iter().map(|code| (code, 0)).collect();
        let provenance = EntityTypeCode::ALL
            .into_iter()
            .flat_map(|code| {
                ProvenanceTypeCode::ALL
                    .into_iter()
                    .map(move |prov| ((code, prov), OwnerCounters::new()))
            })
            .collect();
        Self {
            entities,
            provenance,
        }
    }
}

/// Counter store living only as long as the process.
///
/// Suited to tests and one-shot conversions where identifiers never need to
/// survive a restart.
#[derive(Debug, Default)]
pub struct VolatileCounterHandler {
    tables: Mutex<CounterTables>,
}

impl VolatileCounterHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterHandler for VolatileCounterHandler {
    fn read_counter(
        &self,
        entity: EntityTypeCode,
        provenance: Option<ProvenanceTypeCode>,
        owning_id: u64,
    ) -> Result<u64, CounterError> {
        check_owning_id(owning_id)?;
        let tables = self.tables.lock();
        let value = match provenance {
            Some(prov) => tables
                .provenance
                .get(&(entity, prov))
                .and_then(|counters| counters.get(&owning_id))
                .copied()
                .unwrap_or(0),
            None => tables.entities.get(&entity).copied().unwrap_or(0),
        };
        Ok(value)
    }

    fn increment_counter(
        &self,
        entity: EntityTypeCode,
        provenance: Option<ProvenanceTypeCode>,
        owning_id: u64,
    ) -> Result<u64, CounterError> {
        check_owning_id(owning_id)?;
        let mut tables = self.tables.lock();
        let counter = match provenance {
            Some(prov) => tables
                .provenance
                .entry((entity, prov))
                .or_default()
                .entry(owning_id)
                .or_insert(0),
            None => tables.entities.entry(entity).or_insert(0),
        };
        let value = counter.checked_add(1).ok_or(CounterError::Exhausted {
            entity,
            provenance,
            owning_id,
        })?;
        *counter = value;
        tracing::trace!(
            entity = %entity,
            provenance = ?provenance,
            owning_id,
            value,
            "volatile_counter_incremented"
        );
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::VolatileCounterHandler;
    use crate::counter::{CounterError, CounterHandler};
    use crate::ontology::{EntityTypeCode, ProvenanceTypeCode};

    #[rstest]
    #[case("an")]
    #[case("ar")]
    #[case("be")]
    #[case("br")]
    #[case("ci")]
    #[case("de")]
    #[case("id")]
    #[case("pl")]
    #[case("ra")]
    #[case("re")]
    #[case("rp")]
    fn primary_counters_start_at_zero_and_count_up(#[case] code: &str) {
        let code: EntityTypeCode = code.parse().expect("known code");
        let handler = VolatileCounterHandler::new();
        assert_eq!(handler.read_counter(code, None, 1).expect("read"), 0);
        for expected in 1..=3 {
            assert_eq!(handler.increment_counter(code, None, 1).expect("increment"), expected);
        }
        assert_eq!(handler.read_counter(code, None, 1).expect("read"), 3);
    }

    #[test]
    fn provenance_counters_are_independent_per_owner() {
        let handler = VolatileCounterHandler::new();
        let br = EntityTypeCode::BibliographicResource;
        let se = Some(ProvenanceTypeCode::Snapshot);

        assert_eq!(handler.increment_counter(br, se, 3).expect("increment"), 1);
        assert_eq!(handler.read_counter(br, se, 2).expect("read"), 0);
        assert_eq!(handler.read_counter(br, se, 3).expect("read"), 1);
        assert_eq!(handler.read_counter(br, se, 40).expect("read"), 0);

        assert_eq!(handler.increment_counter(br, se, 1).expect("increment"), 1);
        assert_eq!(handler.increment_counter(br, se, 3).expect("increment"), 2);
        assert_eq!(handler.read_entity_counter(br).expect("read"), 0);
    }

    #[test]
    fn types_do_not_share_counters() {
        let handler = VolatileCounterHandler::new();
        handler
            .increment_entity_counter(EntityTypeCode::Citation)
            .expect("increment");
        assert_eq!(
            handler
                .read_entity_counter(EntityTypeCode::Identifier)
                .expect("read"),
            0
        );
        assert_eq!(
            handler
                .read_counter(
                    EntityTypeCode::Identifier,
                    Some(ProvenanceTypeCode::Snapshot),
                    1
                )
                .expect("read"),
            0
        );
    }

    #[test]
    fn zero_owning_identifier_is_rejected() {
        let handler = VolatileCounterHandler::new();
        let err = handler
            .increment_counter(
                EntityTypeCode::AgentRole,
                Some(ProvenanceTypeCode::Snapshot),
                0,
            )
            .expect_err("zero identifier");
        assert!(matches!(err, CounterError::InvalidIdentifier { owning_id: 0 }));
    }

    #[rstest]
    #[case(10_000_000_000)]
    #[case(u64::MAX)]
    fn huge_owning_identifiers_are_stored_sparsely(#[case] owning_id: u64) {
        let handler = VolatileCounterHandler::new();
        let br = EntityTypeCode::BibliographicResource;
        let se = Some(ProvenanceTypeCode::Snapshot);

        assert_eq!(handler.increment_counter(br, se, owning_id).expect("increment"), 1);
        assert_eq!(handler.increment_counter(br, se, owning_id).expect("increment"), 2);
        assert_eq!(handler.read_counter(br, se, owning_id).expect("read"), 2);
        assert_eq!(handler.read_counter(br, se, owning_id - 1).expect("read"), 0);
    }
}
