//! Triple storage and the entity registry that owns it.

pub mod registry;
pub mod store;

pub use registry::{EntityRegistry, RegistryError};
pub use store::{Term, Triple, TripleBatch, TripleStore};
