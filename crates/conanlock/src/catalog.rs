use crate::error::LockError;
use crate::graph::{decode_lock_graph, LockGraph};
use crate::options::normalize_options;
use crate::package::{ConanLockMetadata, Package, Relationship};
use crate::reference::Reference;
use crate::types::NodeId;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

const ROOT_LABEL: &str = "<root>";

/// Receiver for the entities produced from a lockfile.
pub trait InventorySink {
    fn add_package(&mut self, package: Package);
    fn add_relationship(&mut self, relationship: Relationship);
}

/// Packages and relationships of one lockfile, in source node order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub packages: Vec<Package>,
    pub relationships: Vec<Relationship>,
}

impl Catalog {
    /// Hand every package, then every relationship, to `sink`.
    pub fn emit_into<S: InventorySink + ?Sized>(self, sink: &mut S) {
        for package in self.packages {
            sink.add_package(package);
        }
        for relationship in self.relationships {
            sink.add_relationship(relationship);
        }
    }

    pub fn find(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name() == name)
    }
}

impl InventorySink for Catalog {
    fn add_package(&mut self, package: Package) {
        self.packages.push(package);
    }

    fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }
}

/// Decode a `conan.lock` document and build its catalog.
pub fn parse_conan_lock(bytes: &[u8]) -> Result<Catalog, LockError> {
    let graph = decode_lock_graph(bytes)?;
    build_catalog(&graph)
}

/// Rebuild packages and `dependency-of` edges from a decoded graph.
///
/// Runs in two passes: every package node is materialized first, then each
/// `requires`/`build_requires` entry is resolved against that table. Edges to
/// the root are dropped; ids missing from the node table are an error.
pub fn build_catalog(graph: &LockGraph) -> Result<Catalog, LockError> {
    let mut packages: Vec<Package> = Vec::new();
    let mut built: HashMap<&NodeId, usize> = HashMap::new();

    for (id, node) in graph.nodes() {
        let Some(raw_ref) = node.package_ref() else {
            trace!("node {id} has no ref, skipping as root");
            continue;
        };
        let reference = Reference::parse(raw_ref)?;
        let metadata = ConanLockMetadata {
            reference: raw_ref.to_owned(),
            options: normalize_options(&node.options),
            context: node.context.clone().unwrap_or_default(),
            package_id: node.package_id.clone(),
            prev: node.prev.clone(),
        };
        let package = Package::with_reference(&reference, metadata);
        trace!("node {id} -> {}", package.purl());
        built.insert(id, packages.len());
        packages.push(package);
    }

    let mut relationships = Vec::new();
    for (id, node) in graph.nodes() {
        let dependent = built.get(id).copied();
        let mut seen = HashSet::new();
        for dep in node.dependencies() {
            if !graph.contains(dep.as_str()) {
                let package = match dependent {
                    Some(i) => packages[i].to_string(),
                    None => ROOT_LABEL.to_owned(),
                };
                return Err(LockError::DanglingReference {
                    missing: dep.to_string(),
                    package,
                });
            }
            let Some(to) = dependent else {
                continue;
            };
            let Some(&from) = built.get(dep) else {
                trace!("node {id} requires non-package node {dep}, no edge");
                continue;
            };
            if !seen.insert(dep) {
                continue;
            }
            relationships.push(Relationship::dependency_of(
                packages[from].clone(),
                packages[to].clone(),
            ));
        }
    }

    debug!(
        "built {} packages and {} relationships from {} nodes",
        packages.len(),
        relationships.len(),
        graph.len()
    );

    Ok(Catalog {
        packages,
        relationships,
    })
}
