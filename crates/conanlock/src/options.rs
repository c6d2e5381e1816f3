//! Per-node build options.
//!
//! Conan writes a node's options either as a newline-separated `key=value`
//! block or, in some tooling, as a JSON object. Values are Conan's dynamically
//! typed option text (`True`, `False`, `None`, numbers, enum words) and are
//! never reinterpreted; keys keep their `dependency:` scope prefix.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Option table exactly as it appeared in the lockfile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawOptions {
    #[default]
    Absent,
    /// Conan's native `key=value\n...` encoding.
    Text(String),
    /// A JSON object of string values, in source order.
    Table(Vec<(String, String)>),
}

impl<'de> Deserialize<'de> for RawOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawOptionsVisitor;

        impl<'de> Visitor<'de> for RawOptionsVisitor {
            type Value = RawOptions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an options string or an object of string values")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(RawOptions::Text(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(RawOptions::Text(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(RawOptions::Absent)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(RawOptions::Absent)
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    entries.push((key, value));
                }
                Ok(RawOptions::Table(entries))
            }
        }

        deserializer.deserialize_any(RawOptionsVisitor)
    }
}

/// Copy an option table into a sorted map without touching keys or values.
///
/// Text lines that are not `name=value` are skipped with a warning; a repeated
/// key keeps its last value.
pub fn normalize_options(raw: &RawOptions) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    match raw {
        RawOptions::Absent => {}
        RawOptions::Text(text) => {
            for line in text.split('\n') {
                let line = line.strip_suffix('\r').unwrap_or(line);
                if line.is_empty() {
                    continue;
                }
                match line.split_once('=') {
                    Some((key, value)) if !key.is_empty() => {
                        out.insert(key.to_owned(), value.to_owned());
                    }
                    _ => warn!("skipping option line '{line}', expected 'name=value'"),
                }
            }
        }
        RawOptions::Table(entries) => {
            for (key, value) in entries {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    out
}
