//! Conan lockfile decoding, package inventory, and dependency relationships.
//!
//! This crate turns a Conan graph lock (`conan.lock`) into the entities a
//! software-inventory pipeline consumes: the lockfile node table is decoded
//! into an ordered [`LockGraph`], each node's reference string is parsed into a
//! [`Reference`], and the graph is rebuilt as [`Package`]s connected by
//! `dependency-of` [`Relationship`]s, collected in a [`Catalog`].
//!
//! Everything here is pure in-memory computation over an already-buffered
//! document; reading files and writing reports belong to the caller.

pub mod catalog;
pub mod error;
pub mod graph;
pub mod identity;
pub mod options;
pub mod package;
pub mod purl;
pub mod reference;
pub mod types;

pub use catalog::{build_catalog, parse_conan_lock, Catalog, InventorySink};
pub use error::{ErrorKind, LockError};
pub use graph::{decode_lock_graph, decode_lock_graph_str, LockGraph, NodeRecord};
pub use options::{normalize_options, RawOptions};
pub use package::{
    ConanLockMetadata, Language, Package, PackageType, Relationship, RelationshipType,
};
pub use purl::package_url;
pub use reference::Reference;
pub use types::{NodeId, PackageId};
