//! Import of externally produced triples into an [`EntityRegistry`].
//!
//! Each subject of a batch is an independent unit: it is either accepted as a
//! whole or rejected with a [`Diagnostic`], and one bad subject never aborts
//! the batch. Importing only uses the registry's load path, so counters are
//! never advanced.

pub mod shapes;
pub mod validator;

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

pub use self::{
    shapes::{NodeKind, NodeShape, PropertyShape, ShapeSet},
    validator::{entity_types, ShapeValidator, StructuralValidator, ValidationReport, Violation},
};
use crate::{
    graph::{EntityRegistry, RegistryError, Term, Triple, TripleStore},
    ontology::{Attribution, EntityTypeCode, Iri},
};

/// Importer options.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImportSettings {
    /// Run shape validation before accepting subjects.
    pub validate: bool,
    /// Treat predicates outside a type's permitted table as violations instead
    /// of ignoring them.
    pub closed: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            validate: true,
            closed: false,
        }
    }
}

/// Why a subject was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// No recognized base class, or more than one.
    UnknownEntityType,
    ShapeViolation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub messages: Vec<String>,
}

/// Summary of one import run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Subjects materialized in the registry, in IRI order.
    pub accepted: Vec<Iri>,
    pub rejected: BTreeMap<Iri, Diagnostic>,
    /// Subjects outside the registry namespace.
    pub skipped: Vec<Iri>,
    /// Triples of accepted subjects dropped because they point at a rejected
    /// subject.
    ///
    /// Accepted subjects are not re-validated after the drop, so one whose
    /// only value of a required property was dangling is left without it. An
    /// agent role whose holder was rejected keeps no `pro:isHeldBy`, for
    /// example. Callers needing complete entities should treat a non-empty
    /// list as a reason to review the referring subjects.
    pub dangling: Vec<Triple>,
}

impl ImportOutcome {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.dangling.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SubjectState {
    Pending,
    Validating,
    Accepted(EntityTypeCode),
    Rejected,
}

/// Candidate entity gathered from the batch.
struct Candidate {
    statements: Vec<(Iri, Term)>,
    state: SubjectState,
}

/// Turns triple batches into registry entities.
pub struct GraphImporter {
    settings: ImportSettings,
    validator: Box<dyn ShapeValidator + Send + Sync>,
    shapes: ShapeSet,
    attribution: Attribution,
}

impl Default for GraphImporter {
    fn default() -> Self {
        Self::new(ImportSettings::default())
    }
}

impl GraphImporter {
    /// Creates an importer using the structural validator and built-in shapes.
    #[must_use]
    pub fn new(settings: ImportSettings) -> Self {
        let shapes = ShapeSet::ocdm().closed(settings.closed);
        Self {
            settings,
            validator: Box::new(StructuralValidator),
            shapes,
            attribution: Attribution::default(),
        }
    }

    #[must_use]
    pub fn with_validator(mut self, validator: impl ShapeValidator + Send + Sync + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    #[must_use]
    pub fn with_shapes(mut self, shapes: ShapeSet) -> Self {
        self.shapes = shapes.closed(self.settings.closed);
        self
    }

    /// Attribution recorded on every entity the importer materializes.
    #[must_use]
    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = attribution;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Imports `triples` into `registry`.
    ///
    /// # Errors
    ///
    /// Only registry failures are returned; per-subject problems are reported
    /// in the [`ImportOutcome`].
    pub fn import(
        &self,
        registry: &mut EntityRegistry,
        triples: impl IntoIterator<Item = Triple>,
    ) -> Result<ImportOutcome, RegistryError> {
        let mut outcome = ImportOutcome::default();
        let mut candidates: BTreeMap<Iri, Candidate> = BTreeMap::new();
        let mut skipped = BTreeSet::new();

        for triple in triples {
            if !registry.namespace().contains(&triple.subject) {
                skipped.insert(triple.subject);
                continue;
            }
            candidates
                .entry(triple.subject)
                .or_insert_with(|| Candidate {
                    statements: Vec::new(),
                    state: SubjectState::Pending,
                })
                .statements
                .push((triple.predicate, triple.object));
        }
        outcome.skipped = skipped.into_iter().collect();

        let data: TripleStore = candidates
            .iter()
            .flat_map(|(subject, candidate)| {
                candidate
                    .statements
                    .iter()
                    .map(move |(p, o)| Triple::new(subject.clone(), p.clone(), o.clone()))
            })
            .collect();

        let mut violations: BTreeMap<Iri, Vec<String>> = BTreeMap::new();
        if self.settings.validate {
            let report = self.validator.validate(&data, &self.shapes);
            for violation in report.violations {
                let message = match &violation.path {
                    Some(path) => format!("{path}: {}", violation.message),
                    None => violation.message,
                };
                violations.entry(violation.focus).or_default().push(message);
            }
        }

        let roots: Vec<Iri> = candidates.keys().cloned().collect();
        let mut worklist: Vec<Iri> = Vec::new();
        for root in roots {
            worklist.push(root);
            while let Some(subject) = worklist.pop() {
                let Some(candidate) = candidates.get_mut(&subject) else {
                    continue;
                };
                if candidate.state != SubjectState::Pending {
                    continue;
                }
                candidate.state = SubjectState::Validating;

                let decision = self.decide(registry, &data, &subject, &mut violations);
                match decision {
                    Ok(code) => {
                        candidate.state = SubjectState::Accepted(code);
                        worklist.extend(
                            candidate
                                .statements
                                .iter()
                                .filter_map(|(_, object)| object.as_iri())
                                .cloned(),
                        );
                    }
                    Err(diagnostic) => {
                        candidate.state = SubjectState::Rejected;
                        tracing::warn!(
                            subject = %subject,
                            kind = ?diagnostic.kind,
                            reasons = ?diagnostic.messages,
                            "import_subject_rejected"
                        );
                        outcome.rejected.insert(subject, diagnostic);
                    }
                }
            }
        }

        for (subject, candidate) in &candidates {
            let SubjectState::Accepted(code) = candidate.state else {
                continue;
            };
            let record = registry.get_or_create_attributed(code, Some(subject), &self.attribution)?;
            for (predicate, object) in &candidate.statements {
                if !code.permits(predicate.as_str()) {
                    tracing::debug!(
                        subject = %subject,
                        predicate = %predicate,
                        "import_predicate_ignored"
                    );
                    continue;
                }
                let triple = Triple::new(record.iri().clone(), predicate.clone(), object.clone());
                let target_rejected = object
                    .as_iri()
                    .and_then(|target| candidates.get(target))
                    .is_some_and(|target| target.state == SubjectState::Rejected);
                if target_rejected {
                    tracing::warn!(triple = %triple, "import_reference_dangling");
                    outcome.dangling.push(triple);
                    continue;
                }
                registry.insert_unchecked(triple);
            }
            outcome.accepted.push(subject.clone());
        }

        tracing::info!(
            accepted = outcome.accepted.len(),
            rejected = outcome.rejected.len(),
            skipped = outcome.skipped.len(),
            dangling = outcome.dangling.len(),
            "import_finished"
        );
        Ok(outcome)
    }

    fn decide(
        &self,
        registry: &EntityRegistry,
        data: &TripleStore,
        subject: &Iri,
        violations: &mut BTreeMap<Iri, Vec<String>>,
    ) -> Result<EntityTypeCode, Diagnostic> {
        let types: Vec<EntityTypeCode> = entity_types(data, subject).into_iter().collect();
        let code = match types.as_slice() {
            [code] => *code,
            [] => {
                return Err(Diagnostic {
                    kind: DiagnosticKind::UnknownEntityType,
                    messages: vec!["no recognized entity type".to_owned()],
                })
            }
            several => {
                let codes: Vec<&str> = several.iter().map(|code| code.as_str()).collect();
                return Err(Diagnostic {
                    kind: DiagnosticKind::UnknownEntityType,
                    messages: vec![format!(
                        "several entity types asserted: {}",
                        codes.join(", ")
                    )],
                });
            }
        };

        let mut messages = violations.remove(subject).unwrap_or_default();
        if let Some(existing) = registry.get(subject) {
            if existing.code() != code {
                messages.push(format!(
                    "already registered as a `{}` entity",
                    existing.code()
                ));
            }
        }
        if messages.is_empty() {
            Ok(code)
        } else {
            Err(Diagnostic {
                kind: DiagnosticKind::ShapeViolation,
                messages,
            })
        }
    }
}
