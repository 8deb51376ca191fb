use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use super::shapes::{NodeKind, NodeShape, PropertyShape, ShapeSet};
use crate::{
    graph::{Term, TripleStore},
    ontology::{vocabulary as voc, EntityTypeCode, Iri},
};

/// Checks a data graph against a shape specification.
pub trait ShapeValidator {
    fn validate(&self, data: &TripleStore, shapes: &ShapeSet) -> ValidationReport;
}

/// Outcome of a validation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    #[must_use]
    pub fn conforms(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations whose focus node is `focus`.
    pub fn for_focus<'a>(&'a self, focus: &'a Iri) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| &v.focus == focus)
    }
}

/// A single failed constraint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Subject the constraint was evaluated on.
    pub focus: Iri,
    /// Predicate the constraint is about, if any.
    pub path: Option<String>,
    pub message: String,
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "<{}> <{}>: {}", self.focus, path, self.message),
            None => write!(f, "<{}>: {}", self.focus, self.message),
        }
    }
}

/// Entity types whose base class `subject` is asserted to have in `data`.
#[must_use]
pub fn entity_types(data: &TripleStore, subject: &Iri) -> BTreeSet<EntityTypeCode> {
    data.objects(subject, voc::RDF_TYPE)
        .filter_map(Term::as_iri)
        .filter_map(|class| EntityTypeCode::from_class_iri(class.as_str()))
        .collect()
}

/// Validator for the structural constraints a [`ShapeSet`] can express.
///
/// Each subject with exactly one recognized base class is checked against the
/// node shape of its type. Subjects with no shape target are left alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructuralValidator;

impl ShapeValidator for StructuralValidator {
    fn validate(&self, data: &TripleStore, shapes: &ShapeSet) -> ValidationReport {
        let mut report = ValidationReport::default();
        for subject in data.subjects() {
            let types = entity_types(data, subject);
            let mut types = types.into_iter();
            let (Some(code), None) = (types.next(), types.next()) else {
                continue;
            };
            let Some(shape) = shapes.get(code) else {
                continue;
            };
            check_node(data, subject, shape, &mut report.violations);
        }
        report
    }
}

fn check_node(data: &TripleStore, subject: &Iri, shape: &NodeShape, out: &mut Vec<Violation>) {
    for property in &shape.properties {
        check_property(data, subject, property, out);
    }

    if shape.closed {
        let unexpected: BTreeSet<&Iri> = data
            .statements(subject)
            .map(|(predicate, _)| predicate)
            .filter(|predicate| !shape.target.permits(predicate.as_str()))
            .collect();
        for predicate in unexpected {
            out.push(Violation {
                focus: subject.clone(),
                path: Some(predicate.to_string()),
                message: format!("predicate is not allowed on `{}` entities", shape.target),
            });
        }
    }
}

fn check_property(data: &TripleStore, subject: &Iri, property: &PropertyShape, out: &mut Vec<Violation>) {
    let violation = |message: String| Violation {
        focus: subject.clone(),
        path: Some(property.predicate.to_owned()),
        message,
    };

    let values: Vec<&Term> = data.objects(subject, property.predicate).collect();
    if values.len() < property.min_count {
        out.push(violation(format!(
            "expected at least {} value(s), found {}",
            property.min_count,
            values.len()
        )));
    }
    if let Some(max) = property.max_count {
        if values.len() > max {
            out.push(violation(format!(
                "expected at most {max} value(s), found {}",
                values.len()
            )));
        }
    }

    for value in values {
        match (property.kind, value) {
            (NodeKind::Iri, Term::Resource { iri }) => {
                let Some(class) = property.class else {
                    continue;
                };
                if !data.contains_subject(iri) {
                    continue;
                }
                if !entity_types(data, iri).contains(&class) {
                    out.push(violation(format!(
                        "value <{iri}> is not a `{class}` entity"
                    )));
                }
            }
            (NodeKind::Literal, Term::Literal { datatype, .. }) => {
                if property.datatypes.is_empty() {
                    continue;
                }
                let datatype = datatype.as_ref().map_or(voc::XSD_STRING, Iri::as_str);
                if !property.datatypes.contains(&datatype) {
                    out.push(violation(format!(
                        "literal datatype <{datatype}> is not one of {}",
                        property.datatypes.join(", ")
                    )));
                }
            }
            (NodeKind::Iri, Term::Literal { .. }) => {
                out.push(violation(format!("expected a resource, found {value}")));
            }
            (NodeKind::Literal, Term::Resource { .. }) => {
                out.push(violation(format!("expected a literal, found {value}")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ShapeValidator, StructuralValidator};
    use crate::{
        graph::{Term, Triple, TripleStore},
        import::shapes::ShapeSet,
        ontology::{
            vocabulary::{self as voc, known_iri},
            Iri,
        },
    };

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    fn typed(subject: &str, class: &'static str) -> Triple {
        Triple::new(iri(subject), known_iri(voc::RDF_TYPE), Term::resource(known_iri(class)))
    }

    fn link(subject: &str, predicate: &'static str, object: &str) -> Triple {
        Triple::new(iri(subject), known_iri(predicate), Term::resource(iri(object)))
    }

    fn text(subject: &str, predicate: &'static str, value: &str) -> Triple {
        Triple::new(iri(subject), known_iri(predicate), Term::literal(value))
    }

    const ID: &str = "https://w3id.org/oc/meta/id/1";
    const BR: &str = "https://w3id.org/oc/meta/br/1";

    fn identifier() -> Vec<Triple> {
        vec![
            typed(ID, voc::DATACITE_IDENTIFIER),
            link(ID, voc::DATACITE_USES_IDENTIFIER_SCHEME, voc::DATACITE_DOI),
            text(ID, voc::LITERAL_HAS_LITERAL_VALUE, "10.1000/182"),
        ]
    }

    #[test]
    fn complete_identifier_conforms() {
        let data: TripleStore = identifier().into_iter().collect();
        let report = StructuralValidator.validate(&data, &ShapeSet::ocdm());
        assert!(report.conforms(), "{:?}", report.violations);
    }

    #[test]
    fn missing_and_repeated_values_are_reported() {
        let mut data: TripleStore = identifier().into_iter().collect();
        data.remove_predicate(&iri(ID), &known_iri(voc::DATACITE_USES_IDENTIFIER_SCHEME));
        data.insert(text(ID, voc::LITERAL_HAS_LITERAL_VALUE, "10.1000/183"));

        let report = StructuralValidator.validate(&data, &ShapeSet::ocdm());
        let focus = iri(ID);
        let messages: Vec<_> = report.for_focus(&focus).map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "expected at least 1 value(s), found 0",
                "expected at most 1 value(s), found 2",
            ]
        );
    }

    #[test]
    fn node_kind_and_datatype_are_checked() {
        let data: TripleStore = [
            typed(BR, voc::FABIO_EXPRESSION),
            text(BR, voc::FRBR_PART_OF, "not a link"),
            Triple::new(
                iri(BR),
                known_iri(voc::PRISM_PUBLICATION_DATE),
                Term::typed_literal("soon", known_iri(voc::XSD_STRING)),
            ),
        ]
        .into_iter()
        .collect();

        let report = StructuralValidator.validate(&data, &ShapeSet::ocdm());
        assert_eq!(report.violations.len(), 2);
        assert!(report.violations[0].message.starts_with("expected a resource"));
        assert!(report.violations[1].message.starts_with("literal datatype"));
    }

    #[test]
    fn class_is_only_checked_for_targets_in_the_graph() {
        let mut data: TripleStore = [
            typed(BR, voc::FABIO_EXPRESSION),
            link(BR, voc::DATACITE_HAS_IDENTIFIER, "https://w3id.org/oc/meta/id/99"),
        ]
        .into_iter()
        .collect();
        assert!(StructuralValidator.validate(&data, &ShapeSet::ocdm()).conforms());

        data.insert(link(BR, voc::DATACITE_HAS_IDENTIFIER, "https://w3id.org/oc/meta/br/2"));
        data.insert(typed("https://w3id.org/oc/meta/br/2", voc::FABIO_EXPRESSION));
        let report = StructuralValidator.validate(&data, &ShapeSet::ocdm());
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].focus, iri(BR));
    }

    #[test]
    fn closed_shapes_report_unexpected_predicates() {
        let mut data: TripleStore = identifier().into_iter().collect();
        data.insert(text(ID, voc::DCTERMS_TITLE, "stray"));

        assert!(StructuralValidator.validate(&data, &ShapeSet::ocdm()).conforms());
        let report = StructuralValidator.validate(&data, &ShapeSet::ocdm().closed(true));
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].path.as_deref(), Some(voc::DCTERMS_TITLE));
    }
}
