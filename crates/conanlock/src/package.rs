use crate::error::LockError;
use crate::reference::Reference;
use crate::types::PackageId;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Language {
    #[serde(rename = "c++")]
    Cpp,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Cpp => "c++",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PackageType {
    #[serde(rename = "conan")]
    Conan,
}

impl PackageType {
    pub fn as_str(self) -> &'static str {
        match self {
            PackageType::Conan => "conan",
        }
    }
}

/// What a lockfile node records about a package beyond its name and version.
///
/// `package_id` and `prev` stay `None` when the lockfile did not carry them;
/// they are never filled with empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConanLockMetadata {
    #[serde(rename = "ref")]
    pub reference: String,
    pub options: BTreeMap<String, String>,
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// A package from the lockfile inventory.
///
/// Built once from a [`ConanLockMetadata`] and immutable afterwards; `id` is
/// computed at construction from every other field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Package {
    id: PackageId,
    name: String,
    version: String,
    purl: String,
    language: Language,
    #[serde(rename = "type")]
    package_type: PackageType,
    metadata: ConanLockMetadata,
}

impl Package {
    /// Derive name, version and purl from the metadata's reference string.
    pub fn from_metadata(metadata: ConanLockMetadata) -> Result<Self, LockError> {
        let reference = Reference::parse(&metadata.reference)?;
        Ok(Self::with_reference(&reference, metadata))
    }

    pub(crate) fn with_reference(reference: &Reference, metadata: ConanLockMetadata) -> Self {
        let name = reference.name.clone();
        let version = reference.version.clone();
        let purl = reference.purl();
        let id = crate::identity::compute_package_id(
            &name,
            &version,
            &purl,
            Language::Cpp,
            PackageType::Conan,
            &metadata,
        );
        Package {
            id,
            name,
            version,
            purl,
            language: Language::Cpp,
            package_type: PackageType::Conan,
            metadata,
        }
    }

    pub fn id(&self) -> &PackageId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn purl(&self) -> &str {
        &self.purl
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn package_type(&self) -> PackageType {
        self.package_type
    }

    pub fn metadata(&self) -> &ConanLockMetadata {
        &self.metadata
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RelationshipType {
    #[serde(rename = "dependency-of")]
    DependencyOf,
}

impl RelationshipType {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipType::DependencyOf => "dependency-of",
        }
    }
}

/// `from` is a dependency of `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relationship {
    pub from: Package,
    pub to: Package,
    pub kind: RelationshipType,
}

impl Relationship {
    pub fn dependency_of(dependency: Package, dependent: Package) -> Self {
        Relationship {
            from: dependency,
            to: dependent,
            kind: RelationshipType::DependencyOf,
        }
    }
}

// Endpoints are written as package ids; the packages themselves are listed once
// in the catalog.
impl Serialize for Relationship {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Relationship", 3)?;
        s.serialize_field("from", self.from.id())?;
        s.serialize_field("to", self.to.id())?;
        s.serialize_field("type", &self.kind)?;
        s.end()
    }
}
