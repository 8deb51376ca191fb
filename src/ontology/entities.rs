use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::value_objects::Iri;
use super::vocabulary as voc;

/// Short two-letter code identifying the ontological category of an entity.
///
/// The set is closed: every table in the crate matches on it exhaustively.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EntityTypeCode {
    /// `an`
    ReferenceAnnotation,
    /// `ar`
    AgentRole,
    /// `be`
    BibliographicReference,
    /// `br`
    BibliographicResource,
    /// `ci`
    Citation,
    /// `de`
    DiscourseElement,
    /// `id`
    Identifier,
    /// `pl`
    PointerList,
    /// `ra`
    ResponsibleAgent,
    /// `re`
    ResourceEmbodiment,
    /// `rp`
    ReferencePointer,
}

impl EntityTypeCode {
    /// Every entity type code, in code order.
    pub const ALL: [Self; 11] = [
        Self::ReferenceAnnotation,
        Self::AgentRole,
        Self::BibliographicReference,
        Self::BibliographicResource,
        Self::Citation,
        Self::DiscourseElement,
        Self::Identifier,
        Self::PointerList,
        Self::ResponsibleAgent,
        Self::ResourceEmbodiment,
        Self::ReferencePointer,
    ];

    /// Returns the two-letter code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReferenceAnnotation => "an",
            Self::AgentRole => "ar",
            Self::BibliographicReference => "be",
            Self::BibliographicResource => "br",
            Self::Citation => "ci",
            Self::DiscourseElement => "de",
            Self::Identifier => "id",
            Self::PointerList => "pl",
            Self::ResponsibleAgent => "ra",
            Self::ResourceEmbodiment => "re",
            Self::ReferencePointer => "rp",
        }
    }

    /// Returns the IRI of the class every entity of this type is asserted to be.
    #[must_use]
    pub fn class_iri(self) -> &'static str {
        match self {
            Self::ReferenceAnnotation => voc::OA_ANNOTATION,
            Self::AgentRole => voc::PRO_ROLE_IN_TIME,
            Self::BibliographicReference => voc::BIRO_BIBLIOGRAPHIC_REFERENCE,
            Self::BibliographicResource => voc::FABIO_EXPRESSION,
            Self::Citation => voc::CITO_CITATION,
            Self::DiscourseElement => voc::DEO_DISCOURSE_ELEMENT,
            Self::Identifier => voc::DATACITE_IDENTIFIER,
            Self::PointerList => voc::C4O_SINGLE_LOCATION_POINTER_LIST,
            Self::ResponsibleAgent => voc::FOAF_AGENT,
            Self::ResourceEmbodiment => voc::FABIO_MANIFESTATION,
            Self::ReferencePointer => voc::C4O_IN_TEXT_REFERENCE_POINTER,
        }
    }

    /// Resolves the type whose base class is `class`, if any.
    #[must_use]
    pub fn from_class_iri(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.class_iri() == class)
    }

    /// Properties that entities of this type may carry besides `rdf:type` and
    /// `rdfs:label`.
    #[must_use]
    pub fn permitted_predicates(self) -> &'static [&'static str] {
        match self {
            Self::ReferenceAnnotation => &[voc::OA_HAS_BODY, voc::OA_HAS_TARGET],
            Self::AgentRole => &[
                voc::PRO_WITH_ROLE,
                voc::PRO_IS_HELD_BY,
                voc::OCO_HAS_NEXT,
                voc::DATACITE_HAS_IDENTIFIER,
            ],
            Self::BibliographicReference => &[
                voc::C4O_HAS_CONTENT,
                voc::BIRO_REFERENCES,
                voc::OCO_HAS_ANNOTATION,
                voc::DATACITE_HAS_IDENTIFIER,
            ],
            Self::BibliographicResource => &[
                voc::DCTERMS_TITLE,
                voc::FABIO_HAS_SUBTITLE,
                voc::FRBR_PART_OF,
                voc::FRBR_PART,
                voc::FRBR_EMBODIMENT,
                voc::CITO_CITES,
                voc::PRISM_PUBLICATION_DATE,
                voc::FABIO_HAS_SEQUENCE_IDENTIFIER,
                voc::PRO_IS_DOCUMENT_CONTEXT_FOR,
                voc::DATACITE_HAS_IDENTIFIER,
            ],
            Self::Citation => &[
                voc::CITO_HAS_CITING_ENTITY,
                voc::CITO_HAS_CITED_ENTITY,
                voc::CITO_HAS_CITATION_CREATION_DATE,
                voc::CITO_HAS_CITATION_TIME_SPAN,
                voc::CITO_HAS_CITATION_CHARACTERISATION,
                voc::DATACITE_HAS_IDENTIFIER,
            ],
            Self::DiscourseElement => &[
                voc::DCTERMS_TITLE,
                voc::FRBR_PART,
                voc::OCO_HAS_NEXT,
                voc::C4O_IS_CONTEXT_OF,
                voc::C4O_HAS_CONTENT,
                voc::FABIO_HAS_SEQUENCE_IDENTIFIER,
                voc::DATACITE_HAS_IDENTIFIER,
            ],
            Self::Identifier => &[
                voc::DATACITE_USES_IDENTIFIER_SCHEME,
                voc::LITERAL_HAS_LITERAL_VALUE,
            ],
            Self::PointerList => &[
                voc::C4O_HAS_CONTENT,
                voc::CO_HAS_ELEMENT,
                voc::DATACITE_HAS_IDENTIFIER,
            ],
            Self::ResponsibleAgent => &[
                voc::FOAF_NAME,
                voc::FOAF_GIVEN_NAME,
                voc::FOAF_FAMILY_NAME,
                voc::DATACITE_HAS_IDENTIFIER,
            ],
            Self::ResourceEmbodiment => &[
                voc::PRISM_STARTING_PAGE,
                voc::PRISM_ENDING_PAGE,
                voc::FABIO_HAS_URL,
                voc::DCTERMS_FORMAT,
                voc::DATACITE_HAS_IDENTIFIER,
            ],
            Self::ReferencePointer => &[
                voc::C4O_HAS_CONTENT,
                voc::OCO_HAS_NEXT,
                voc::C4O_DENOTES,
                voc::OCO_HAS_ANNOTATION,
                voc::DATACITE_HAS_IDENTIFIER,
            ],
        }
    }

    /// Returns `true` when `predicate` may describe entities of this type.
    #[must_use]
    pub fn permits(self, predicate: &str) -> bool {
        predicate == voc::RDF_TYPE
            || predicate == voc::RDFS_LABEL
            || self.permitted_predicates().contains(&predicate)
    }
}

impl Display for EntityTypeCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityTypeCode {
    type Err = TypeCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| TypeCodeError::UnknownEntityType(s.to_owned()))
    }
}

impl TryFrom<String> for EntityTypeCode {
    type Error = TypeCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityTypeCode> for String {
    fn from(code: EntityTypeCode) -> Self {
        code.as_str().to_owned()
    }
}

/// Short code of a provenance entity counted per owning entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProvenanceTypeCode {
    /// `se`
    Snapshot,
}

impl ProvenanceTypeCode {
    pub const ALL: [Self; 1] = [Self::Snapshot];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Snapshot => "se",
        }
    }

    #[must_use]
    pub fn class_iri(self) -> &'static str {
        match self {
            Self::Snapshot => voc::PROV_ENTITY,
        }
    }
}

impl Display for ProvenanceTypeCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProvenanceTypeCode {
    type Err = TypeCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| TypeCodeError::UnknownProvenanceType(s.to_owned()))
    }
}

impl TryFrom<String> for ProvenanceTypeCode {
    type Error = TypeCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProvenanceTypeCode> for String {
    fn from(code: ProvenanceTypeCode) -> Self {
        code.as_str().to_owned()
    }
}

/// Errors raised when parsing short type codes from text.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypeCodeError {
    #[error("`{0}` is not a known entity type code")]
    UnknownEntityType(String),
    #[error("`{0}` is not a known provenance type code")]
    UnknownProvenanceType(String),
}

/// Who is responsible for an entity and where its data came from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attribution {
    pub responsible_agent: Option<Iri>,
    pub primary_source: Option<Iri>,
}

impl Attribution {
    #[must_use]
    pub fn new(responsible_agent: Option<Iri>, primary_source: Option<Iri>) -> Self {
        Self {
            responsible_agent,
            primary_source,
        }
    }
}

/// Typed view over the triples describing one resource.
///
/// A record carries no property data of its own: everything it says lives in
/// the triple store owned by the registry that handed it out.
#[derive(Debug, PartialEq, Eq)]
pub struct EntityRecord {
    iri: Iri,
    code: EntityTypeCode,
    attribution: Attribution,
}

impl EntityRecord {
    pub(crate) fn new(iri: Iri, code: EntityTypeCode, attribution: Attribution) -> Self {
        Self {
            iri,
            code,
            attribution,
        }
    }

    /// Returns the resource identifier the record is bound to.
    #[must_use]
    pub fn iri(&self) -> &Iri {
        &self.iri
    }

    /// Returns the entity type code.
    #[must_use]
    pub fn code(&self) -> EntityTypeCode {
        self.code
    }

    #[must_use]
    pub fn attribution(&self) -> &Attribution {
        &self.attribution
    }

    #[must_use]
    pub fn responsible_agent(&self) -> Option<&Iri> {
        self.attribution.responsible_agent.as_ref()
    }

    #[must_use]
    pub fn primary_source(&self) -> Option<&Iri> {
        self.attribution.primary_source.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityTypeCode, ProvenanceTypeCode, TypeCodeError};
    use crate::ontology::vocabulary as voc;

    #[test]
    fn codes_round_trip_through_text() {
        for code in EntityTypeCode::ALL {
            assert_eq!(code.as_str().parse::<EntityTypeCode>(), Ok(code));
        }
        assert_eq!("se".parse::<ProvenanceTypeCode>(), Ok(ProvenanceTypeCode::Snapshot));
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(
            "xx".parse::<EntityTypeCode>(),
            Err(TypeCodeError::UnknownEntityType("xx".into()))
        );
        assert_eq!(
            "br".parse::<ProvenanceTypeCode>(),
            Err(TypeCodeError::UnknownProvenanceType("br".into()))
        );
    }

    #[test]
    fn class_iris_are_distinct_and_resolvable() {
        for code in EntityTypeCode::ALL {
            assert_eq!(EntityTypeCode::from_class_iri(code.class_iri()), Some(code));
        }
        assert_eq!(EntityTypeCode::from_class_iri(voc::PROV_ENTITY), None);
    }

    #[test]
    fn permitted_properties_follow_the_type() {
        let id = EntityTypeCode::Identifier;
        assert!(id.permits(voc::LITERAL_HAS_LITERAL_VALUE));
        assert!(id.permits(voc::RDF_TYPE));
        assert!(id.permits(voc::RDFS_LABEL));
        assert!(!id.permits(voc::DCTERMS_TITLE));
        assert!(EntityTypeCode::BibliographicResource.permits(voc::DCTERMS_TITLE));
    }
}
