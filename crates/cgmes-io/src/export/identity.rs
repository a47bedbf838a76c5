//! Recover the identifier of a referenced object.
//!
//! Objects descending from `IdentifiedObject` carry their identifier as the
//! `mRID` attribute. Result objects such as `SvVoltage` or `SvPowerFlow` do
//! not; their identifier is the registry key they are stored under.

use cgmes_core::{ObjectId, Registry};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("object of type {class_name} not found in registry")]
    NotFound { class_name: String },

    #[error("handle {0} does not belong to the registry")]
    Dangling(ObjectId),
}

/// Identifier lookup for one export run.
///
/// The handle → key index is built once, so objects without an `mRID` resolve
/// without scanning the registry per reference.
#[derive(Debug)]
pub struct IdentityResolver<'r> {
    registry: &'r Registry,
    keys: HashMap<ObjectId, &'r str>,
}

impl<'r> IdentityResolver<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        let mut keys = HashMap::with_capacity(registry.len());
        for (key, id, _) in registry.entries() {
            // first registration of a handle wins, like a front-to-back scan
            keys.entry(id).or_insert(key);
        }
        Self { registry, keys }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn resolve(&self, id: ObjectId) -> Result<&'r str, IdentityError> {
        let object = self.registry.get(id).ok_or(IdentityError::Dangling(id))?;
        if let Some(mrid) = object.mrid() {
            return Ok(mrid);
        }
        self.keys
            .get(&id)
            .copied()
            .ok_or_else(|| IdentityError::NotFound {
                class_name: object.class_name().to_string(),
            })
    }
}

/// One-off lookup that scans the registry instead of building an index.
pub fn resolve_identity(id: ObjectId, registry: &Registry) -> Result<&str, IdentityError> {
    let object = registry.get(id).ok_or(IdentityError::Dangling(id))?;
    if let Some(mrid) = object.mrid() {
        return Ok(mrid);
    }
    registry
        .key_of(id)
        .ok_or_else(|| IdentityError::NotFound {
            class_name: object.class_name().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmes_core::ModelObject;

    #[test]
    fn direct_mrid_wins_over_registry_key() {
        let mut registry = Registry::new();
        let id = registry
            .insert("key", ModelObject::new("Terminal").with_mrid("_T1"))
            .unwrap();
        let resolver = IdentityResolver::new(&registry);
        assert_eq!(resolver.resolve(id), Ok("_T1"));
        assert_eq!(resolve_identity(id, &registry), Ok("_T1"));
    }

    #[test]
    fn falls_back_to_registry_key() {
        let mut registry = Registry::new();
        let id = registry.insert("SV1", ModelObject::new("SvVoltage")).unwrap();
        let resolver = IdentityResolver::new(&registry);
        assert_eq!(resolver.resolve(id), Ok("SV1"));
        assert_eq!(resolve_identity(id, &registry), Ok("SV1"));
    }

    #[test]
    fn empty_mrid_falls_back_to_registry_key() {
        let mut registry = Registry::new();
        let id = registry
            .insert("SV2", ModelObject::new("SvVoltage").with_mrid(""))
            .unwrap();
        assert_eq!(IdentityResolver::new(&registry).resolve(id), Ok("SV2"));
    }

    #[test]
    fn unregistered_object_is_not_found() {
        let mut registry = Registry::new();
        let orphan = registry.alloc(ModelObject::new("SvPowerFlow"));
        let resolver = IdentityResolver::new(&registry);
        assert_eq!(
            resolver.resolve(orphan),
            Err(IdentityError::NotFound {
                class_name: "SvPowerFlow".to_string()
            })
        );
    }

    #[test]
    fn foreign_handle_is_dangling() {
        let mut other = Registry::new();
        other.alloc(ModelObject::new("A"));
        let foreign = other.alloc(ModelObject::new("B"));
        let registry = Registry::new();
        assert_eq!(
            resolve_identity(foreign, &registry),
            Err(IdentityError::Dangling(foreign))
        );
    }
}
