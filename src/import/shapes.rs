//! Structural constraints candidate entities must satisfy to be imported.
//!
//! A [`ShapeSet`] holds one [`NodeShape`] per entity type. Each node shape
//! lists the properties it constrains with their cardinality, the kind of
//! value they take, and optionally the entity type a referenced resource must
//! have or the datatypes a literal may carry.

use std::collections::BTreeMap;

use crate::ontology::{vocabulary as voc, EntityTypeCode};

/// Whether a property takes resources or literals.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Iri,
    Literal,
}

/// Constraint on a single predicate of a node shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyShape {
    pub predicate: &'static str,
    pub min_count: usize,
    pub max_count: Option<usize>,
    pub kind: NodeKind,
    /// Entity type a referenced resource must have when it is part of the
    /// validated graph.
    pub class: Option<EntityTypeCode>,
    /// Accepted literal datatypes; empty accepts any.
    pub datatypes: Vec<&'static str>,
}

impl PropertyShape {
    /// Reference to a resource, optional and unbounded.
    #[must_use]
    pub fn iri(predicate: &'static str) -> Self {
        Self {
            predicate,
            min_count: 0,
            max_count: None,
            kind: NodeKind::Iri,
            class: None,
            datatypes: Vec::new(),
        }
    }

    /// Literal value, optional and unbounded.
    #[must_use]
    pub fn literal(predicate: &'static str) -> Self {
        Self {
            predicate,
            min_count: 0,
            max_count: None,
            kind: NodeKind::Literal,
            class: None,
            datatypes: Vec::new(),
        }
    }

    #[must_use]
    pub fn min(mut self, count: usize) -> Self {
        self.min_count = count;
        self
    }

    #[must_use]
    pub fn max(mut self, count: usize) -> Self {
        self.max_count = Some(count);
        self
    }

    /// Shorthand for `min(1).max(1)`.
    #[must_use]
    pub fn exactly_one(self) -> Self {
        self.min(1).max(1)
    }

    #[must_use]
    pub fn class(mut self, code: EntityTypeCode) -> Self {
        self.class = Some(code);
        self
    }

    #[must_use]
    pub fn datatypes(mut self, datatypes: &[&'static str]) -> Self {
        self.datatypes = datatypes.to_vec();
        self
    }
}

/// Constraints applying to every entity of one type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeShape {
    pub target: EntityTypeCode,
    pub properties: Vec<PropertyShape>,
    /// Reject predicates outside the type's permitted-property table.
    pub closed: bool,
}

impl NodeShape {
    #[must_use]
    pub fn new(target: EntityTypeCode) -> Self {
        Self {
            target,
            properties: Vec::new(),
            closed: false,
        }
    }

    #[must_use]
    pub fn property(mut self, shape: PropertyShape) -> Self {
        self.properties.push(shape);
        self
    }
}

/// Shape specification for the whole closed type set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShapeSet {
    shapes: BTreeMap<EntityTypeCode, NodeShape>,
}

impl ShapeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node shape, replacing any previous shape for its target.
    #[must_use]
    pub fn with(mut self, shape: NodeShape) -> Self {
        self.shapes.insert(shape.target, shape);
        self
    }

    /// Marks every node shape as closed.
    #[must_use]
    pub fn closed(mut self, closed: bool) -> Self {
        for shape in self.shapes.values_mut() {
            shape.closed = closed;
        }
        self
    }

    #[must_use]
    pub fn get(&self, code: EntityTypeCode) -> Option<&NodeShape> {
        self.shapes.get(&code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeShape> + '_ {
        self.shapes.values()
    }

    /// Constraints of the bibliographic data model.
    #[must_use]
    pub fn ocdm() -> Self {
        use EntityTypeCode::{
            AgentRole, BibliographicReference, BibliographicResource, Citation,
            DiscourseElement, Identifier, PointerList, ReferenceAnnotation, ReferencePointer,
            ResourceEmbodiment, ResponsibleAgent,
        };

        let date = &[voc::XSD_DATE, voc::XSD_GYEAR, voc::XSD_GYEAR_MONTH];
        let has_identifier = || PropertyShape::iri(voc::DATACITE_HAS_IDENTIFIER).class(Identifier);

        Self::new()
            .with(
                NodeShape::new(ReferenceAnnotation)
                    .property(PropertyShape::iri(voc::OA_HAS_BODY).exactly_one().class(Citation))
                    .property(PropertyShape::iri(voc::OA_HAS_TARGET).max(1)),
            )
            .with(
                NodeShape::new(AgentRole)
                    .property(PropertyShape::iri(voc::PRO_WITH_ROLE).exactly_one())
                    .property(
                        PropertyShape::iri(voc::PRO_IS_HELD_BY)
                            .exactly_one()
                            .class(ResponsibleAgent),
                    )
                    .property(PropertyShape::iri(voc::OCO_HAS_NEXT).max(1).class(AgentRole))
                    .property(has_identifier()),
            )
            .with(
                NodeShape::new(BibliographicReference)
                    .property(PropertyShape::literal(voc::C4O_HAS_CONTENT).max(1))
                    .property(
                        PropertyShape::iri(voc::BIRO_REFERENCES)
                            .max(1)
                            .class(BibliographicResource),
                    )
                    .property(
                        PropertyShape::iri(voc::OCO_HAS_ANNOTATION).class(ReferenceAnnotation),
                    )
                    .property(has_identifier()),
            )
            .with(
                NodeShape::new(BibliographicResource)
                    .property(PropertyShape::literal(voc::DCTERMS_TITLE).max(1))
                    .property(PropertyShape::literal(voc::FABIO_HAS_SUBTITLE).max(1))
                    .property(
                        PropertyShape::iri(voc::FRBR_PART_OF)
                            .max(1)
                            .class(BibliographicResource),
                    )
                    .property(PropertyShape::iri(voc::FRBR_PART).class(BibliographicReference))
                    .property(
                        PropertyShape::iri(voc::FRBR_EMBODIMENT).class(ResourceEmbodiment),
                    )
                    .property(PropertyShape::iri(voc::CITO_CITES).class(BibliographicResource))
                    .property(
                        PropertyShape::literal(voc::PRISM_PUBLICATION_DATE)
                            .max(1)
                            .datatypes(date),
                    )
                    .property(PropertyShape::literal(voc::FABIO_HAS_SEQUENCE_IDENTIFIER).max(1))
                    .property(
                        PropertyShape::iri(voc::PRO_IS_DOCUMENT_CONTEXT_FOR).class(AgentRole),
                    )
                    .property(has_identifier()),
            )
            .with(
                NodeShape::new(Citation)
                    .property(
                        PropertyShape::iri(voc::CITO_HAS_CITING_ENTITY)
                            .exactly_one()
                            .class(BibliographicResource),
                    )
                    .property(
                        PropertyShape::iri(voc::CITO_HAS_CITED_ENTITY)
                            .exactly_one()
                            .class(BibliographicResource),
                    )
                    .property(
                        PropertyShape::literal(voc::CITO_HAS_CITATION_CREATION_DATE)
                            .max(1)
                            .datatypes(date),
                    )
                    .property(
                        PropertyShape::literal(voc::CITO_HAS_CITATION_TIME_SPAN)
                            .max(1)
                            .datatypes(&[voc::XSD_DURATION]),
                    )
                    .property(PropertyShape::iri(voc::CITO_HAS_CITATION_CHARACTERISATION).max(1))
                    .property(has_identifier()),
            )
            .with(
                NodeShape::new(DiscourseElement)
                    .property(PropertyShape::literal(voc::DCTERMS_TITLE).max(1))
                    .property(PropertyShape::iri(voc::FRBR_PART).class(DiscourseElement))
                    .property(
                        PropertyShape::iri(voc::OCO_HAS_NEXT)
                            .max(1)
                            .class(DiscourseElement),
                    )
                    .property(PropertyShape::iri(voc::C4O_IS_CONTEXT_OF))
                    .property(PropertyShape::literal(voc::C4O_HAS_CONTENT).max(1))
                    .property(PropertyShape::literal(voc::FABIO_HAS_SEQUENCE_IDENTIFIER).max(1))
                    .property(has_identifier()),
            )
            .with(
                NodeShape::new(Identifier)
                    .property(PropertyShape::iri(voc::DATACITE_USES_IDENTIFIER_SCHEME).exactly_one())
                    .property(PropertyShape::literal(voc::LITERAL_HAS_LITERAL_VALUE).exactly_one()),
            )
            .with(
                NodeShape::new(PointerList)
                    .property(PropertyShape::literal(voc::C4O_HAS_CONTENT).max(1))
                    .property(PropertyShape::iri(voc::CO_HAS_ELEMENT).class(ReferencePointer))
                    .property(has_identifier()),
            )
            .with(
                NodeShape::new(ResponsibleAgent)
                    .property(PropertyShape::literal(voc::FOAF_NAME).max(1))
                    .property(PropertyShape::literal(voc::FOAF_GIVEN_NAME).max(1))
                    .property(PropertyShape::literal(voc::FOAF_FAMILY_NAME).max(1))
                    .property(has_identifier()),
            )
            .with(
                NodeShape::new(ResourceEmbodiment)
                    .property(PropertyShape::literal(voc::PRISM_STARTING_PAGE).max(1))
                    .property(PropertyShape::literal(voc::PRISM_ENDING_PAGE).max(1))
                    .property(PropertyShape::iri(voc::FABIO_HAS_URL).max(1))
                    .property(PropertyShape::iri(voc::DCTERMS_FORMAT).max(1))
                    .property(has_identifier()),
            )
            .with(
                NodeShape::new(ReferencePointer)
                    .property(PropertyShape::literal(voc::C4O_HAS_CONTENT).max(1))
                    .property(
                        PropertyShape::iri(voc::OCO_HAS_NEXT)
                            .max(1)
                            .class(ReferencePointer),
                    )
                    .property(
                        PropertyShape::iri(voc::C4O_DENOTES)
                            .max(1)
                            .class(BibliographicReference),
                    )
                    .property(
                        PropertyShape::iri(voc::OCO_HAS_ANNOTATION).class(ReferenceAnnotation),
                    )
                    .property(has_identifier()),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::ShapeSet;
    use crate::ontology::EntityTypeCode;

    #[test]
    fn ocdm_shapes_cover_every_type() {
        let shapes = ShapeSet::ocdm();
        for code in EntityTypeCode::ALL {
            assert!(shapes.get(code).is_some(), "missing shape for {code}");
        }
    }

    #[test]
    fn ocdm_shapes_only_constrain_permitted_predicates() {
        for shape in ShapeSet::ocdm().iter() {
            for property in &shape.properties {
                assert!(
                    shape.target.permits(property.predicate),
                    "{} constrains {} which it does not permit",
                    shape.target,
                    property.predicate
                );
            }
        }
    }

    #[test]
    fn closing_applies_to_all_shapes() {
        let shapes = ShapeSet::ocdm().closed(true);
        assert!(shapes.iter().all(|shape| shape.closed));
    }
}
