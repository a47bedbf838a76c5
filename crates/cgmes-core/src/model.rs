//! Model objects and the registry arena.
//!
//! Every [`ModelObject`] lives in the [`Registry`] arena and is addressed by an
//! [`ObjectId`] handle. References between objects are handles, so "the same
//! object" is handle equality. Registry keys (CGMES identifiers) map to
//! handles; an object can sit in the arena without a key.

use crate::error::{CgmesError, CgmesResult};
use crate::profile::CgmesProfile;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Name of the identifier attribute carried by `IdentifiedObject` descendants.
pub const MRID: &str = "mRID";

/// Stable handle of an object inside a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ObjectId(usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Attribute value held by a model object.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Object(ObjectId),
    List(Vec<Value>),
}

impl Value {
    /// Unset or default-valued scalars carry no export meaning.
    ///
    /// `"many"` is the placeholder used for unset multi-valued associations.
    pub fn is_default(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Str(s) => s.is_empty() || s == "many",
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::Bool(b) => !*b,
            Value::Object(_) => false,
            Value::List(items) => items.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Short type label for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Str(_) => "string",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Object(_) => "object",
            Value::List(_) => "list",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<ObjectId> for Value {
    fn from(value: ObjectId) -> Self {
        Value::Object(value)
    }
}

impl From<Vec<ObjectId>> for Value {
    fn from(value: Vec<ObjectId>) -> Self {
        Value::List(value.into_iter().map(Value::Object).collect())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

/// Which profile each value of an imported object was read from.
///
/// Keyed by bare attribute name, or [`Provenance::CLASS_KEY`] for the class
/// itself. Empty for objects created after import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provenance(BTreeMap<String, CgmesProfile>);

impl Provenance {
    pub const CLASS_KEY: &'static str = "class";

    pub fn class(&self) -> Option<CgmesProfile> {
        self.0.get(Self::CLASS_KEY).copied()
    }

    pub fn attribute(&self, name: &str) -> Option<CgmesProfile> {
        self.0.get(name).copied()
    }

    pub fn set_class(&mut self, profile: CgmesProfile) {
        self.0.insert(Self::CLASS_KEY.to_string(), profile);
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, profile: CgmesProfile) {
        self.0.insert(name.into(), profile);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CgmesProfile)> {
        self.0.iter().map(|(key, profile)| (key.as_str(), *profile))
    }
}

impl FromIterator<(String, CgmesProfile)> for Provenance {
    fn from_iter<T: IntoIterator<Item = (String, CgmesProfile)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An instance of a named CIM class.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelObject {
    class_name: String,
    attributes: BTreeMap<String, Value>,
    read_in_profile: Provenance,
}

impl ModelObject {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            attributes: BTreeMap::new(),
            read_in_profile: Provenance::default(),
        }
    }

    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(attribute, value);
        self
    }

    pub fn with_mrid(self, mrid: impl Into<String>) -> Self {
        self.with(MRID, mrid.into())
    }

    /// Record that the class was read from `profile`.
    pub fn read_in(mut self, profile: CgmesProfile) -> Self {
        self.read_in_profile.set_class(profile);
        self
    }

    /// Record that `attribute` was read from `profile`.
    pub fn read_attribute_in(mut self, attribute: impl Into<String>, profile: CgmesProfile) -> Self {
        self.read_in_profile.set_attribute(attribute, profile);
        self
    }

    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(attribute.into(), value.into());
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    /// Attributes held by the object, by name.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Directly held identifier, if the object carries a non-empty one.
    pub fn mrid(&self) -> Option<&str> {
        self.get(MRID)
            .and_then(Value::as_str)
            .filter(|mrid| !mrid.is_empty())
    }

    pub fn read_in_profile(&self) -> &Provenance {
        &self.read_in_profile
    }

    pub fn read_in_profile_mut(&mut self) -> &mut Provenance {
        &mut self.read_in_profile
    }
}

/// Arena of model objects plus the identifier → object mapping.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    objects: Vec<ModelObject>,
    entries: Vec<(String, ObjectId)>,
    index: HashMap<String, ObjectId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object in the arena without registering a key.
    pub fn alloc(&mut self, object: ModelObject) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(object);
        id
    }

    /// Store an object and register it under `key`.
    pub fn insert(&mut self, key: impl Into<String>, object: ModelObject) -> CgmesResult<ObjectId> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(CgmesError::DuplicateKey(key));
        }
        let id = self.alloc(object);
        self.entries.push((key.clone(), id));
        self.index.insert(key, id);
        Ok(id)
    }

    /// Register an already allocated object under `key`.
    pub fn register(&mut self, key: impl Into<String>, id: ObjectId) -> CgmesResult<()> {
        let key = key.into();
        if id.0 >= self.objects.len() {
            return Err(CgmesError::UnknownObject(id.to_string()));
        }
        if self.index.contains_key(&key) {
            return Err(CgmesError::DuplicateKey(key));
        }
        self.entries.push((key.clone(), id));
        self.index.insert(key, id);
        Ok(())
    }

    pub fn get(&self, id: ObjectId) -> Option<&ModelObject> {
        self.objects.get(id.0)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut ModelObject> {
        self.objects.get_mut(id.0)
    }

    pub fn lookup(&self, key: &str) -> Option<ObjectId> {
        self.index.get(key).copied()
    }

    pub fn object(&self, key: &str) -> Option<&ModelObject> {
        self.lookup(key).and_then(|id| self.get(id))
    }

    /// Registered entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, ObjectId, &ModelObject)> {
        self.entries
            .iter()
            .map(|(key, id)| (key.as_str(), *id, &self.objects[id.0]))
    }

    /// First registry key bound to `id`; a scan over all entries.
    pub fn key_of(&self, id: ObjectId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, candidate)| *candidate == id)
            .map(|(key, _)| key.as_str())
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of objects in the arena, keyed or not.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}
