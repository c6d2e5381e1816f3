use crate::error::LockError;
use crate::options::RawOptions;
use crate::types::NodeId;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, trace, warn};

const KNOWN_LOCK_VERSIONS: &[&str] = &["0.1", "0.2", "0.3", "0.4"];

/// One entry of the lockfile node table.
///
/// A node with no `ref` (or an empty one) is not a package: it is the consumer
/// root that the rest of the graph was resolved for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NodeRecord {
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    #[serde(default, alias = "packageID")]
    pub package_id: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub options: RawOptions,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub requires: Vec<NodeId>,
    #[serde(default, alias = "buildRequires")]
    pub build_requires: Vec<NodeId>,
    /// Consumer recipe path, only written for the root.
    #[serde(default)]
    pub path: Option<String>,
}

impl NodeRecord {
    /// The node's reference string, if it names a package.
    pub fn package_ref(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.is_empty())
    }

    pub fn is_root(&self) -> bool {
        self.package_ref().is_none()
    }

    /// `requires` followed by `build_requires`, in declaration order.
    pub fn dependencies(&self) -> impl Iterator<Item = &NodeId> {
        self.requires.iter().chain(self.build_requires.iter())
    }
}

/// The decoded node table of a Conan graph lock, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockGraph {
    nodes: Vec<(NodeId, NodeRecord)>,
    index: HashMap<NodeId, usize>,
    pub version: Option<String>,
    pub profile_host: Option<String>,
    pub profile_build: Option<String>,
    pub revisions_enabled: Option<bool>,
}

impl LockGraph {
    /// Nodes in the order they appear in the document.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = (&NodeId, &NodeRecord)> {
        self.nodes.iter().map(|(id, node)| (id, node))
    }

    pub fn get(&self, id: &str) -> Option<&NodeRecord> {
        self.index.get(id).map(|&i| &self.nodes[i].1)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct LockDocument {
    graph_lock: GraphLockSection,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    profile_host: Option<String>,
    #[serde(default)]
    profile_build: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphLockSection {
    nodes: NodeTable,
    #[serde(default)]
    revisions_enabled: Option<bool>,
}

/// Node table that keeps source order and rejects duplicate ids.
#[derive(Debug)]
struct NodeTable(Vec<(NodeId, NodeRecord)>);

impl<'de> Deserialize<'de> for NodeTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NodeTableVisitor;

        impl<'de> Visitor<'de> for NodeTableVisitor {
            type Value = NodeTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping node ids to node objects")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut seen = HashSet::new();
                let mut nodes = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(id) = map.next_key::<NodeId>()? {
                    if !seen.insert(id.clone()) {
                        return Err(de::Error::custom(format!("duplicate node id '{id}'")));
                    }
                    let node = map.next_value::<NodeRecord>()?;
                    nodes.push((id, node));
                }
                Ok(NodeTable(nodes))
            }
        }

        deserializer.deserialize_map(NodeTableVisitor)
    }
}

/// Decode a Conan graph lock document into its node table.
pub fn decode_lock_graph(bytes: &[u8]) -> Result<LockGraph, LockError> {
    let doc: LockDocument = serde_json::from_slice(bytes)?;
    into_graph(doc)
}

pub fn decode_lock_graph_str(input: &str) -> Result<LockGraph, LockError> {
    let doc: LockDocument = serde_json::from_str(input)?;
    into_graph(doc)
}

fn into_graph(doc: LockDocument) -> Result<LockGraph, LockError> {
    let nodes = doc.graph_lock.nodes.0;
    if nodes.is_empty() {
        return Err(LockError::Decode(
            "graph_lock.nodes is empty; expected at least the root node".to_owned(),
        ));
    }

    match doc.version.as_deref() {
        Some(v) if KNOWN_LOCK_VERSIONS.contains(&v) => {}
        Some(v) => warn!("unrecognized lockfile version '{v}', decoding node table anyway"),
        None => warn!("lockfile has no version field, decoding node table anyway"),
    }

    let index = nodes
        .iter()
        .enumerate()
        .map(|(i, (id, _))| (id.clone(), i))
        .collect();
    for (id, node) in &nodes {
        trace!(
            "node {id}: ref={:?} requires={} build_requires={}",
            node.reference,
            node.requires.len(),
            node.build_requires.len()
        );
    }
    debug!("decoded graph lock with {} nodes", nodes.len());

    Ok(LockGraph {
        nodes,
        index,
        version: doc.version,
        profile_host: doc.profile_host,
        profile_build: doc.profile_build,
        revisions_enabled: doc.graph_lock.revisions_enabled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const SMALL: &str = r#"{
        "graph_lock": {
            "nodes": {
                "0": {"options": "", "requires": ["2"], "path": "conanfile.txt", "context": "host"},
                "2": {"ref": "zlib/1.2.12", "options": "shared=False", "package_id": "abc", "prev": "def", "context": "host"},
                "1": {"ref": "bzip2/1.0.8", "requires": ["2"], "context": "build"}
            },
            "revisions_enabled": true
        },
        "version": "0.4",
        "profile_host": "[settings]\nos=Linux\n"
    }"#;

    #[test]
    fn preserves_source_order() {
        let graph = decode_lock_graph_str(SMALL).unwrap();
        let ids: Vec<&str> = graph.nodes().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["0", "2", "1"]);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn reads_document_metadata() {
        let graph = decode_lock_graph(SMALL.as_bytes()).unwrap();
        assert_eq!(graph.version.as_deref(), Some("0.4"));
        assert_eq!(graph.revisions_enabled, Some(true));
        assert!(graph.profile_host.as_deref().unwrap().contains("os=Linux"));
        assert!(graph.profile_build.is_none());
    }

    #[test]
    fn root_and_package_nodes() {
        let graph = decode_lock_graph_str(SMALL).unwrap();
        let root = graph.get("0").unwrap();
        assert!(root.is_root());
        assert_eq!(root.path.as_deref(), Some("conanfile.txt"));
        assert_eq!(root.requires, vec![NodeId::new("2")]);

        let zlib = graph.get("2").unwrap();
        assert_eq!(zlib.package_ref(), Some("zlib/1.2.12"));
        assert_eq!(zlib.package_id.as_deref(), Some("abc"));
        assert_eq!(zlib.prev.as_deref(), Some("def"));

        let bzip2 = graph.get("1").unwrap();
        assert!(bzip2.package_id.is_none());
        assert!(bzip2.prev.is_none());
        assert_eq!(bzip2.options, RawOptions::Absent);
        assert_eq!(bzip2.context.as_deref(), Some("build"));
        assert!(graph.contains("1"));
        assert!(!graph.contains("9"));
    }

    #[test]
    fn empty_ref_is_root() {
        let graph = decode_lock_graph_str(
            r#"{"graph_lock": {"nodes": {"0": {"ref": ""}}}, "version": "0.4"}"#,
        )
        .unwrap();
        assert!(graph.get("0").unwrap().is_root());
    }

    #[test]
    fn camel_case_aliases_are_accepted() {
        let graph = decode_lock_graph_str(
            r#"{"graph_lock": {"nodes": {
                "0": {"buildRequires": ["1"]},
                "1": {"ref": "cmake/3.25.0", "packageID": "p1"}
            }}, "version": "0.4"}"#,
        )
        .unwrap();
        assert_eq!(graph.get("0").unwrap().build_requires, vec![NodeId::new("1")]);
        assert_eq!(graph.get("1").unwrap().package_id.as_deref(), Some("p1"));
    }

    #[test]
    fn dependencies_lists_requires_then_build_requires() {
        let graph = decode_lock_graph_str(
            r#"{"graph_lock": {"nodes": {
                "0": {"requires": ["1", "2"], "build_requires": ["3"]}
            }}, "version": "0.4"}"#,
        )
        .unwrap();
        let deps: Vec<&str> = graph
            .get("0")
            .unwrap()
            .dependencies()
            .map(NodeId::as_str)
            .collect();
        assert_eq!(deps, ["1", "2", "3"]);
    }

    #[test]
    fn rejects_malformed_documents() {
        for doc in [
            "not json",
            "[]",
            r#"{"version": "0.4"}"#,
            r#"{"graph_lock": {}}"#,
            r#"{"graph_lock": {"nodes": []}}"#,
            r#"{"graph_lock": {"nodes": {"0": "zlib/1.2.12"}}}"#,
            r#"{"graph_lock": {"nodes": {"0": {"requires": "1"}}}}"#,
            r#"{"graph_lock": {"nodes": {"0": {"ref": 5}}}}"#,
            r#"{"graph_lock": {"nodes": {}}}"#,
        ] {
            let err = decode_lock_graph_str(doc).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Decode, "document: {doc}");
        }
    }

    #[test]
    fn rejects_duplicate_node_ids() {
        let err = decode_lock_graph_str(
            r#"{"graph_lock": {"nodes": {"0": {}, "1": {"ref": "a/1"}, "1": {"ref": "b/2"}}}}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().contains("duplicate node id '1'"));
    }

    #[test]
    fn unknown_version_still_decodes() {
        let graph = decode_lock_graph_str(
            r#"{"graph_lock": {"nodes": {"0": {}}}, "version": "9.9"}"#,
        )
        .unwrap();
        assert_eq!(graph.version.as_deref(), Some("9.9"));
        assert_eq!(graph.len(), 1);
    }
}
