use crate::package::{ConanLockMetadata, Language, PackageType};
use crate::types::PackageId;

/// Compute the stable identity of a package from its full field set.
///
/// Every field is written with a tag and a length prefix so that adjacent
/// values cannot run into each other. Options are fed in key order.
pub(crate) fn compute_package_id(
    name: &str,
    version: &str,
    purl: &str,
    language: Language,
    package_type: PackageType,
    metadata: &ConanLockMetadata,
) -> PackageId {
    let mut hasher = blake3::Hasher::new();

    field(&mut hasher, "name", name);
    field(&mut hasher, "version", version);
    field(&mut hasher, "purl", purl);
    field(&mut hasher, "language", language.as_str());
    field(&mut hasher, "type", package_type.as_str());
    field(&mut hasher, "ref", &metadata.reference);
    field(&mut hasher, "context", &metadata.context);

    for (key, value) in &metadata.options {
        field(&mut hasher, "opt.key", key);
        field(&mut hasher, "opt.value", value);
    }

    // Absent and empty must hash differently.
    optional_field(&mut hasher, "package_id", metadata.package_id.as_deref());
    optional_field(&mut hasher, "prev", metadata.prev.as_deref());

    PackageId::new(hasher.finalize().to_hex().to_string())
}

fn optional_field(hasher: &mut blake3::Hasher, tag: &str, value: Option<&str>) {
    match value {
        Some(v) => field(hasher, tag, v),
        None => {
            hasher.update(format!("{tag}:none;").as_bytes());
        }
    }
}

fn field(hasher: &mut blake3::Hasher, tag: &str, value: &str) {
    hasher.update(format!("{tag}:{}:", value.len()).as_bytes());
    hasher.update(value.as_bytes());
    hasher.update(b";");
}

#[cfg(test)]
mod tests {
    use crate::package::{ConanLockMetadata, Package};
    use std::collections::BTreeMap;

    fn meta(reference: &str, options: &[(&str, &str)]) -> ConanLockMetadata {
        ConanLockMetadata {
            reference: reference.to_owned(),
            options: options
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect::<BTreeMap<_, _>>(),
            context: "host".to_owned(),
            package_id: Some("dfbe50feef7f3c6223a476cd5aeadb687084a646".to_owned()),
            prev: Some("7cd359d44f89ab08e33b5db75605002c".to_owned()),
        }
    }

    fn id_of(m: ConanLockMetadata) -> String {
        Package::from_metadata(m).unwrap().id().as_str().to_owned()
    }

    #[test]
    fn identical_fields_share_an_id() {
        let a = id_of(meta("zlib/1.2.12#rev", &[("fPIC", "True"), ("shared", "False")]));
        let b = id_of(meta("zlib/1.2.12#rev", &[("shared", "False"), ("fPIC", "True")]));
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn option_change_changes_id() {
        let a = id_of(meta("zlib/1.2.12", &[("shared", "False")]));
        let b = id_of(meta("zlib/1.2.12", &[("shared", "True")]));
        assert_ne!(a, b);
    }

    #[test]
    fn revision_changes_id() {
        let a = id_of(meta("zlib/1.2.12#aaa", &[]));
        let b = id_of(meta("zlib/1.2.12#bbb", &[]));
        assert_ne!(a, b);
    }

    #[test]
    fn context_changes_id() {
        let a = meta("cmake/3.25.0", &[]);
        let mut b = a.clone();
        b.context = "build".to_owned();
        assert_ne!(id_of(a), id_of(b));
    }

    #[test]
    fn absent_and_empty_package_id_differ() {
        let mut a = meta("zlib/1.2.12", &[]);
        a.package_id = None;
        let mut b = a.clone();
        b.package_id = Some(String::new());
        assert_ne!(id_of(a), id_of(b));
    }

    #[test]
    fn option_boundaries_are_unambiguous() {
        let a = id_of(meta("zlib/1.2.12", &[("ab", "c")]));
        let b = id_of(meta("zlib/1.2.12", &[("a", "bc")]));
        assert_ne!(a, b);
    }
}
