//! IRIs of the classes and properties the registry understands.

use super::value_objects::Iri;

/// Wraps one of the constants below as an [`Iri`].
pub(crate) fn known_iri(constant: &'static str) -> Iri {
    Iri::from_static(constant)
}

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
pub const XSD_GYEAR: &str = "http://www.w3.org/2001/XMLSchema#gYear";
pub const XSD_GYEAR_MONTH: &str = "http://www.w3.org/2001/XMLSchema#gYearMonth";
pub const XSD_DURATION: &str = "http://www.w3.org/2001/XMLSchema#duration";

// classes
pub const OA_ANNOTATION: &str = "http://www.w3.org/ns/oa#Annotation";
pub const PRO_ROLE_IN_TIME: &str = "http://purl.org/spar/pro/RoleInTime";
pub const BIRO_BIBLIOGRAPHIC_REFERENCE: &str = "http://purl.org/spar/biro/BibliographicReference";
pub const FABIO_EXPRESSION: &str = "http://purl.org/spar/fabio/Expression";
pub const CITO_CITATION: &str = "http://purl.org/spar/cito/Citation";
pub const DEO_DISCOURSE_ELEMENT: &str = "http://purl.org/spar/deo/DiscourseElement";
pub const DATACITE_IDENTIFIER: &str = "http://purl.org/spar/datacite/Identifier";
pub const C4O_SINGLE_LOCATION_POINTER_LIST: &str =
    "http://purl.org/spar/c4o/SingleLocationPointerList";
pub const FOAF_AGENT: &str = "http://xmlns.com/foaf/0.1/Agent";
pub const FABIO_MANIFESTATION: &str = "http://purl.org/spar/fabio/Manifestation";
pub const C4O_IN_TEXT_REFERENCE_POINTER: &str = "http://purl.org/spar/c4o/InTextReferencePointer";
pub const PROV_ENTITY: &str = "http://www.w3.org/ns/prov#Entity";

// bibliographic resource
pub const DCTERMS_TITLE: &str = "http://purl.org/dc/terms/title";
pub const FABIO_HAS_SUBTITLE: &str = "http://purl.org/spar/fabio/hasSubtitle";
pub const FRBR_PART_OF: &str = "http://purl.org/vocab/frbr/core#partOf";
pub const FRBR_PART: &str = "http://purl.org/vocab/frbr/core#part";
pub const FRBR_EMBODIMENT: &str = "http://purl.org/vocab/frbr/core#embodiment";
pub const CITO_CITES: &str = "http://purl.org/spar/cito/cites";
pub const PRISM_PUBLICATION_DATE: &str =
    "http://prismstandard.org/namespaces/basic/2.0/publicationDate";
pub const FABIO_HAS_SEQUENCE_IDENTIFIER: &str =
    "http://purl.org/spar/fabio/hasSequenceIdentifier";
pub const PRO_IS_DOCUMENT_CONTEXT_FOR: &str = "http://purl.org/spar/pro/isDocumentContextFor";

// identifiers
pub const DATACITE_HAS_IDENTIFIER: &str = "http://purl.org/spar/datacite/hasIdentifier";
pub const DATACITE_USES_IDENTIFIER_SCHEME: &str =
    "http://purl.org/spar/datacite/usesIdentifierScheme";
pub const LITERAL_HAS_LITERAL_VALUE: &str =
    "http://www.essepuntato.it/2010/06/literalreification/hasLiteralValue";

// agents and roles
pub const PRO_WITH_ROLE: &str = "http://purl.org/spar/pro/withRole";
pub const PRO_IS_HELD_BY: &str = "http://purl.org/spar/pro/isHeldBy";
pub const OCO_HAS_NEXT: &str = "https://w3id.org/oc/ontology/hasNext";
pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";
pub const FOAF_GIVEN_NAME: &str = "http://xmlns.com/foaf/0.1/givenName";
pub const FOAF_FAMILY_NAME: &str = "http://xmlns.com/foaf/0.1/familyName";

// embodiments
pub const PRISM_STARTING_PAGE: &str = "http://prismstandard.org/namespaces/basic/2.0/startingPage";
pub const PRISM_ENDING_PAGE: &str = "http://prismstandard.org/namespaces/basic/2.0/endingPage";
pub const FABIO_HAS_URL: &str = "http://purl.org/spar/fabio/hasURL";
pub const DCTERMS_FORMAT: &str = "http://purl.org/dc/terms/format";

// references, pointers and discourse elements
pub const C4O_HAS_CONTENT: &str = "http://purl.org/spar/c4o/hasContent";
pub const C4O_IS_CONTEXT_OF: &str = "http://purl.org/spar/c4o/isContextOf";
pub const C4O_DENOTES: &str = "http://purl.org/spar/c4o/denotes";
pub const CO_HAS_ELEMENT: &str = "http://purl.org/co/element";
pub const BIRO_REFERENCES: &str = "http://purl.org/spar/biro/references";
pub const OCO_HAS_ANNOTATION: &str = "https://w3id.org/oc/ontology/hasAnnotation";

// citations and annotations
pub const CITO_HAS_CITING_ENTITY: &str = "http://purl.org/spar/cito/hasCitingEntity";
pub const CITO_HAS_CITED_ENTITY: &str = "http://purl.org/spar/cito/hasCitedEntity";
pub const CITO_HAS_CITATION_CREATION_DATE: &str =
    "http://purl.org/spar/cito/hasCitationCreationDate";
pub const CITO_HAS_CITATION_TIME_SPAN: &str = "http://purl.org/spar/cito/hasCitationTimeSpan";
pub const CITO_HAS_CITATION_CHARACTERISATION: &str =
    "http://purl.org/spar/cito/hasCitationCharacterisation";
pub const OA_HAS_BODY: &str = "http://www.w3.org/ns/oa#hasBody";
pub const OA_HAS_TARGET: &str = "http://www.w3.org/ns/oa#hasTarget";

// role kinds used as objects of `pro:withRole`
pub const PRO_AUTHOR: &str = "http://purl.org/spar/pro/author";
pub const PRO_EDITOR: &str = "http://purl.org/spar/pro/editor";
pub const PRO_PUBLISHER: &str = "http://purl.org/spar/pro/publisher";

// identifier schemes used as objects of `datacite:usesIdentifierScheme`
pub const DATACITE_DOI: &str = "http://purl.org/spar/datacite/doi";
pub const DATACITE_ORCID: &str = "http://purl.org/spar/datacite/orcid";
pub const DATACITE_ISSN: &str = "http://purl.org/spar/datacite/issn";
pub const DATACITE_ISBN: &str = "http://purl.org/spar/datacite/isbn";
pub const DATACITE_PMID: &str = "http://purl.org/spar/datacite/pmid";
pub const DATACITE_URL: &str = "http://purl.org/spar/datacite/url";
