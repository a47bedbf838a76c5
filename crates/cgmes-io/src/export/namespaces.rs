//! RDF namespace table written into every document header.

use serde::de::{self, MapAccess};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered prefix → URI table.
///
/// Serialized as a map; entries keep the order they appear in the source
/// document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces(Vec<(String, String)>);

impl Namespaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespaces used by CGMES 2.4.15 documents.
    pub fn cgmes_default() -> Self {
        Self::new()
            .with("cim", "http://iec.ch/TC57/2013/CIM-schema-cim16#")
            .with("entsoe", "http://entsoe.eu/CIM/SchemaExtension/3/1#")
            .with("md", "http://iec.ch/TC57/61970-552/ModelDescription/1#")
            .with("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#")
    }

    pub fn with(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.insert(prefix, uri);
        self
    }

    /// Add a prefix, replacing the URI in place if the prefix already exists.
    pub fn insert(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        let prefix = prefix.into();
        let uri = uri.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == prefix) {
            Some(entry) => entry.1 = uri,
            None => self.0.push((prefix, uri)),
        }
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(prefix, uri)| (prefix.as_str(), uri.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries of `other` override or extend this table.
    pub fn merge(&mut self, other: &Namespaces) {
        for (prefix, uri) in other.iter() {
            self.insert(prefix, uri);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Namespaces {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut namespaces = Namespaces::new();
        for (prefix, uri) in iter {
            namespaces.insert(prefix, uri);
        }
        namespaces
    }
}

impl Serialize for Namespaces {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (prefix, uri) in &self.0 {
            map.serialize_entry(prefix, uri)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Namespaces {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NamespacesVisitor;

        impl<'de> de::Visitor<'de> for NamespacesVisitor {
            type Value = Namespaces;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of namespace prefixes to URIs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Namespaces, A::Error> {
                let mut namespaces = Namespaces::new();
                while let Some((prefix, uri)) = access.next_entry::<String, String>()? {
                    namespaces.insert(prefix, uri);
                }
                Ok(namespaces)
            }
        }

        deserializer.deserialize_map(NamespacesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place() {
        let mut namespaces = Namespaces::new().with("cim", "a").with("rdf", "b");
        namespaces.insert("cim", "c");
        let entries: Vec<(&str, &str)> = namespaces.iter().collect();
        assert_eq!(entries, vec![("cim", "c"), ("rdf", "b")]);
    }

    #[test]
    fn merge_overrides_defaults() {
        let mut namespaces = Namespaces::cgmes_default();
        namespaces.merge(&Namespaces::new().with("cim", "urn:custom").with("gl", "urn:gl"));
        assert_eq!(namespaces.get("cim"), Some("urn:custom"));
        assert_eq!(namespaces.get("gl"), Some("urn:gl"));
        assert_eq!(namespaces.len(), 5);
    }

    #[test]
    fn deserializes_from_a_map_in_document_order() {
        let namespaces: Namespaces =
            serde_json::from_str(r#"{"zz": "urn:zz", "rdf": "urn:rdf", "aa": "urn:aa"}"#).unwrap();
        let prefixes: Vec<&str> = namespaces.iter().map(|(prefix, _)| prefix).collect();
        assert_eq!(prefixes, vec!["zz", "rdf", "aa"]);
        assert_eq!(namespaces.get("rdf"), Some("urn:rdf"));
    }

    #[test]
    fn serializes_in_table_order() {
        let namespaces = Namespaces::new().with("zz", "urn:zz").with("aa", "urn:aa");
        assert_eq!(
            serde_json::to_string(&namespaces).unwrap(),
            r#"{"zz":"urn:zz","aa":"urn:aa"}"#
        );
    }
}
