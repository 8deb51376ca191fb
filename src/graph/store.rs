use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ontology::Iri;

/// Object position of a triple.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Term {
    /// Reference to another resource.
    Resource { iri: Iri },
    /// Literal value, optionally typed or language tagged.
    Literal {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<Iri>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
}

impl Term {
    #[must_use]
    pub fn resource(iri: Iri) -> Self {
        Self::Resource { iri }
    }

    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    #[must_use]
    pub fn typed_literal(value: impl Into<String>, datatype: Iri) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: Some(datatype),
            language: None,
        }
    }

    /// Returns the referenced IRI when the term is a resource.
    #[must_use]
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Resource { iri } => Some(iri),
            Self::Literal { .. } => None,
        }
    }

    /// Returns the lexical value when the term is a literal.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal { value, .. } => Some(value),
            Self::Resource { .. } => None,
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource { iri } => write!(f, "<{iri}>"),
            Self::Literal {
                value,
                datatype,
                language,
            } => {
                write!(f, "{value:?}")?;
                if let Some(language) = language {
                    write!(f, "@{language}")?;
                } else if let Some(datatype) = datatype {
                    write!(f, "^^<{datatype}>")?;
                }
                Ok(())
            }
        }
    }
}

/// A single `(subject, predicate, object)` statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Iri,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    #[must_use]
    pub fn new(subject: Iri, predicate: Iri, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl Display for Triple {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> <{}> {} .", self.subject, self.predicate, self.object)
    }
}

/// Serialized form of a batch of triples handed to the importer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleBatch {
    pub triples: Vec<Triple>,
}

impl TripleBatch {
    /// Parses a batch from its JSON representation.
    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }
}

/// Triples indexed by subject.
///
/// Lookups by subject never scan unrelated subjects; the store is a plain set,
/// so inserting the same statement twice keeps one copy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TripleStore {
    subjects: BTreeMap<Iri, BTreeSet<(Iri, Term)>>,
    len: usize,
}

impl TripleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a triple, returning `false` when it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        let Triple {
            subject,
            predicate,
            object,
        } = triple;
        let inserted = self
            .subjects
            .entry(subject)
            .or_default()
            .insert((predicate, object));
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes a single triple, returning whether it was present.
    pub fn remove(&mut self, subject: &Iri, predicate: &Iri, object: &Term) -> bool {
        let btree_map::Entry::Occupied(mut entry) = self.subjects.entry(subject.clone()) else {
            return false;
        };
        let removed = entry.get_mut().remove(&(predicate.clone(), object.clone()));
        if removed {
            self.len -= 1;
        }
        if entry.get().is_empty() {
            entry.remove();
        }
        removed
    }

    /// Removes every triple with the given subject and predicate.
    pub fn remove_predicate(&mut self, subject: &Iri, predicate: &Iri) -> usize {
        let Some(statements) = self.subjects.get_mut(subject) else {
            return 0;
        };
        let before = statements.len();
        statements.retain(|(p, _)| p != predicate);
        let removed = before - statements.len();
        if statements.is_empty() {
            self.subjects.remove(subject);
        }
        self.len -= removed;
        removed
    }

    /// Removes every triple describing `subject`.
    pub fn remove_subject(&mut self, subject: &Iri) -> usize {
        let removed = self.subjects.remove(subject).map_or(0, |set| set.len());
        self.len -= removed;
        removed
    }

    #[must_use]
    pub fn contains_subject(&self, subject: &Iri) -> bool {
        self.subjects.contains_key(subject)
    }

    /// Returns `(predicate, object)` pairs describing `subject`.
    pub fn statements(&self, subject: &Iri) -> impl Iterator<Item = (&Iri, &Term)> + '_ {
        self.subjects
            .get(subject)
            .into_iter()
            .flat_map(|set| set.iter().map(|(p, o)| (p, o)))
    }

    /// Returns the objects of `subject` for the predicate with IRI `predicate`.
    pub fn objects<'a>(
        &'a self,
        subject: &Iri,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.subjects
            .get(subject)
            .into_iter()
            .flat_map(move |set| {
                set.iter()
                    .filter(move |(p, _)| p.as_str() == predicate)
                    .map(|(_, o)| o)
            })
    }

    /// Returns the distinct subjects in IRI order.
    pub fn subjects(&self) -> impl Iterator<Item = &Iri> + '_ {
        self.subjects.keys()
    }

    /// Iterates every triple, grouped by subject.
    pub fn iter(&self) -> impl Iterator<Item = Triple> + '_ {
        self.subjects.iter().flat_map(|(subject, set)| {
            set.iter()
                .map(move |(p, o)| Triple::new(subject.clone(), p.clone(), o.clone()))
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl FromIterator<Triple> for TripleStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl Extend<Triple> for TripleStore {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Term, Triple, TripleBatch, TripleStore};
    use crate::ontology::Iri;

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    fn triple(s: &str, p: &str, o: Term) -> Triple {
        Triple::new(iri(s), iri(p), o)
    }

    #[test]
    fn duplicate_statements_are_stored_once() {
        let mut store = TripleStore::new();
        assert!(store.insert(triple("https://ex.org/a", "https://ex.org/p", Term::literal("x"))));
        assert!(!store.insert(triple("https://ex.org/a", "https://ex.org/p", Term::literal("x"))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn removal_keeps_length_consistent() {
        let mut store: TripleStore = [
            triple("https://ex.org/a", "https://ex.org/p", Term::literal("1")),
            triple("https://ex.org/a", "https://ex.org/p", Term::literal("2")),
            triple("https://ex.org/a", "https://ex.org/q", Term::literal("3")),
            triple("https://ex.org/b", "https://ex.org/p", Term::literal("4")),
        ]
        .into_iter()
        .collect();
        assert_eq!(store.len(), 4);

        assert_eq!(store.remove_predicate(&iri("https://ex.org/a"), &iri("https://ex.org/p")), 2);
        assert_eq!(store.len(), 2);
        assert!(store.remove(
            &iri("https://ex.org/a"),
            &iri("https://ex.org/q"),
            &Term::literal("3")
        ));
        assert!(!store.contains_subject(&iri("https://ex.org/a")));
        assert_eq!(store.remove_subject(&iri("https://ex.org/b")), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn objects_are_filtered_by_predicate() {
        let store: TripleStore = [
            triple("https://ex.org/a", "https://ex.org/p", Term::literal("1")),
            triple("https://ex.org/a", "https://ex.org/q", Term::resource(iri("https://ex.org/b"))),
        ]
        .into_iter()
        .collect();
        let objects: Vec<_> = store
            .objects(&iri("https://ex.org/a"), "https://ex.org/q")
            .collect();
        assert_eq!(objects, vec![&Term::resource(iri("https://ex.org/b"))]);
    }

    #[test]
    fn batches_parse_from_json() {
        let batch = TripleBatch::from_json(
            r#"{"triples": [
                {"subject": "https://ex.org/a", "predicate": "https://ex.org/p",
                 "object": {"kind": "literal", "value": "x", "language": "en"}},
                {"subject": "https://ex.org/a", "predicate": "https://ex.org/q",
                 "object": {"kind": "resource", "iri": "https://ex.org/b"}}
            ]}"#,
        )
        .expect("valid batch");
        assert_eq!(batch.triples.len(), 2);
        assert_eq!(
            batch.triples[1].object.as_iri(),
            Some(&iri("https://ex.org/b"))
        );
        assert_eq!(batch.triples[0].to_string(), r#"<https://ex.org/a> <https://ex.org/p> "x"@en ."#);
    }

    #[test]
    fn batches_reject_invalid_iris() {
        let err = TripleBatch::from_json(
            r#"{"triples": [{"subject": "not an iri", "predicate": "https://ex.org/p",
                "object": {"kind": "literal", "value": "x"}}]}"#,
        );
        assert!(err.is_err());
    }
}
