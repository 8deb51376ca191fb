use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use oxrdf::NamedNode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::{EntityTypeCode, ProvenanceTypeCode};

/// Value object ensuring that supplied text represents a valid IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iri {
    value: String,
}

impl Iri {
    /// Validates and constructs a new [`Iri`] value object.
    ///
    /// The constructor rejects malformed identifiers in order to guarantee that
    /// every entity uses canonical identifiers.
    pub fn new(value: impl Into<String>) -> Result<Self, IriError> {
        let value = value.into();
        NamedNode::new(value.as_str()).map_err(|_| IriError::Invalid {
            value: value.clone(),
        })?;
        Ok(Self { value })
    }

    /// Wraps a vocabulary constant without re-validating it.
    pub(crate) fn from_static(value: &'static str) -> Self {
        debug_assert!(NamedNode::new(value).is_ok(), "invalid vocabulary IRI {value}");
        Self {
            value: value.to_owned(),
        }
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Display for Iri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Iri {
    type Err = IriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for Iri {
    type Error = IriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Iri> for String {
    fn from(iri: Iri) -> Self {
        iri.value
    }
}

/// Errors produced when validating an [`Iri`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IriError {
    /// The provided text could not be parsed as an IRI.
    #[error("invalid IRI: {value}")]
    Invalid { value: String },
}

/// Base namespace under which resource identifiers are minted.
///
/// Identifiers take the shape `{base}{code}/{supplier_prefix}{sequence}`, and
/// provenance snapshots hang below their entity as `{entity}/prov/{code}/{n}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Namespace {
    base: String,
    supplier_prefix: String,
}

impl Namespace {
    /// Creates a namespace, appending a trailing `/` to the base when it ends
    /// with neither `/` nor `#`.
    pub fn new(base: impl Into<String>, supplier_prefix: impl Into<String>) -> Result<Self, IriError> {
        let mut base = base.into();
        if !base.ends_with('/') && !base.ends_with('#') {
            base.push('/');
        }
        Iri::new(base.clone())?;
        Ok(Self {
            base,
            supplier_prefix: supplier_prefix.into(),
        })
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub fn supplier_prefix(&self) -> &str {
        &self.supplier_prefix
    }

    /// Returns `true` when the IRI lives below this namespace.
    #[must_use]
    pub fn contains(&self, iri: &Iri) -> bool {
        iri.as_str().starts_with(&self.base)
    }

    /// Builds the identifier for sequence number `sequence` of the given type.
    pub fn mint(&self, code: EntityTypeCode, sequence: u64) -> Result<Iri, IriError> {
        Iri::new(format!(
            "{}{}/{}{}",
            self.base,
            code.as_str(),
            self.supplier_prefix,
            sequence
        ))
    }

    /// Builds the identifier of snapshot `sequence` owned by `entity`.
    pub fn mint_provenance(
        &self,
        entity: &Iri,
        provenance: ProvenanceTypeCode,
        sequence: u64,
    ) -> Result<Iri, IriError> {
        Iri::new(format!(
            "{}/prov/{}/{}",
            entity.as_str(),
            provenance.as_str(),
            sequence
        ))
    }

    /// Recovers the type code and sequence number from an identifier minted
    /// by this namespace.
    #[must_use]
    pub fn parse(&self, iri: &Iri) -> Option<(EntityTypeCode, u64)> {
        let rest = iri.as_str().strip_prefix(&self.base)?;
        let (code, local) = rest.split_once('/')?;
        let code = code.parse::<EntityTypeCode>().ok()?;
        let digits = local.strip_prefix(&self.supplier_prefix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let sequence = digits.parse::<u64>().ok()?;
        (sequence > 0).then_some((code, sequence))
    }
}
