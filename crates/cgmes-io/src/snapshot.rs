//! JSON model snapshots.
//!
//! A snapshot lists model objects by key. Attribute values are JSON scalars,
//! `{"ref": "<key>"}` objects pointing at another entry, or arrays of either.
//! Entries marked `"unkeyed": true` are stored without a registry key, the way
//! result objects created after import are.
//!
//! ```json
//! {
//!   "version": "cgmes_v2_4_15",
//!   "namespaces": {"cim": "http://iec.ch/TC57/2013/CIM-schema-cim16#"},
//!   "objects": [
//!     {"key": "_BV1", "class": "BaseVoltage",
//!      "attributes": {"mRID": "_BV1", "nominalVoltage": 110.0},
//!      "readInProfile": {"class": "EQ"}},
//!     {"key": "_L1", "class": "ACLineSegment",
//!      "attributes": {"mRID": "_L1", "r": 0.5, "BaseVoltage": {"ref": "_BV1"}}}
//!   ]
//! }
//! ```

use crate::export::Namespaces;
use anyhow::{anyhow, bail, Context, Result};
use cgmes_core::{CgmesProfile, ModelObject, ObjectId, Provenance, Registry, Value};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    namespaces: Option<Namespaces>,
    objects: Vec<SnapshotObject>,
}

#[derive(Debug, Deserialize)]
struct SnapshotObject {
    key: String,
    class: String,
    #[serde(default)]
    attributes: Map<String, JsonValue>,
    #[serde(default, rename = "readInProfile")]
    read_in_profile: BTreeMap<String, CgmesProfile>,
    #[serde(default)]
    unkeyed: bool,
}

/// A registry loaded from a snapshot, plus the optional header data.
#[derive(Debug)]
pub struct ModelSnapshot {
    pub registry: Registry,
    pub version: Option<String>,
    pub namespaces: Option<Namespaces>,
}

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<ModelSnapshot> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading model snapshot: {}", path.display()))?;
    parse_snapshot(&contents).with_context(|| format!("parsing model snapshot: {}", path.display()))
}

pub fn parse_snapshot(contents: &str) -> Result<ModelSnapshot> {
    let document: SnapshotDocument = serde_json::from_str(contents)?;

    // First pass allocates every object so references can point forward.
    let mut registry = Registry::new();
    let mut handles: HashMap<&str, ObjectId> = HashMap::with_capacity(document.objects.len());
    for object in &document.objects {
        if handles.contains_key(object.key.as_str()) {
            bail!("duplicate snapshot key '{}'", object.key);
        }
        let mut model = ModelObject::new(object.class.as_str());
        *model.read_in_profile_mut() = object
            .read_in_profile
            .iter()
            .map(|(key, profile)| (key.clone(), *profile))
            .collect::<Provenance>();
        let id = if object.unkeyed {
            registry.alloc(model)
        } else {
            registry.insert(object.key.as_str(), model)?
        };
        handles.insert(object.key.as_str(), id);
    }

    for object in &document.objects {
        let id = handles[object.key.as_str()];
        for (name, raw) in &object.attributes {
            let value = convert_value(raw, &handles)
                .with_context(|| format!("attribute '{}' of '{}'", name, object.key))?;
            registry
                .get_mut(id)
                .ok_or_else(|| anyhow!("object '{}' vanished from registry", object.key))?
                .set(name.as_str(), value);
        }
    }

    Ok(ModelSnapshot {
        registry,
        version: document.version,
        namespaces: document.namespaces,
    })
}

fn convert_value(raw: &JsonValue, handles: &HashMap<&str, ObjectId>) -> Result<Value> {
    Ok(match raw {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(
                n.as_f64()
                    .ok_or_else(|| anyhow!("number {} out of range", n))?,
            ),
        },
        JsonValue::String(s) => Value::Str(s.clone()),
        JsonValue::Array(items) => Value::List(
            items
                .iter()
                .map(|item| convert_value(item, handles))
                .collect::<Result<Vec<_>>>()?,
        ),
        JsonValue::Object(map) => {
            let target = map
                .get("ref")
                .and_then(JsonValue::as_str)
                .filter(|_| map.len() == 1)
                .ok_or_else(|| anyhow!("objects must have the form {{\"ref\": \"<key>\"}}"))?;
            let id = handles
                .get(target)
                .ok_or_else(|| anyhow!("dangling reference to '{}'", target))?;
            Value::Object(*id)
        }
    })
}
