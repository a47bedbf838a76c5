//! Flatten a model object into class-qualified attributes.

use cgmes_core::{CgmesError, ModelObject, PossibleProfileList, Provenance, SchemaTable, Value};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("class {class_name} is not declared in schema {version}")]
    UnknownClass { class_name: String, version: String },

    #[error(transparent)]
    Schema(#[from] CgmesError),
}

/// An attribute value together with the class level that declared it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualifiedAttribute<'a> {
    pub class_name: &'a str,
    pub name: &'a str,
    pub value: &'a Value,
}

impl QualifiedAttribute<'_> {
    /// `<ClassName>.<attributeName>`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.class_name, self.name)
    }
}

/// Output of [`extract_attributes`].
#[derive(Debug, Clone)]
pub struct ExtractedAttributes<'a> {
    pub class_name: &'a str,
    pub read_in_profile: &'a Provenance,
    pub possible_profiles: PossibleProfileList<'a>,
    /// Attributes in declaration order, top-most class level first.
    pub attributes: Vec<QualifiedAttribute<'a>>,
}

/// Walk the inheritance chain of `object` from its top-most ancestor down to
/// its concrete class and qualify each attribute with the first level that
/// declares it.
///
/// An attribute re-declared further down keeps the qualification of the
/// top-most declaration. Attributes the object holds but no level declares
/// are qualified with the concrete class, in name order, after the declared
/// ones.
pub fn extract_attributes<'a>(
    object: &'a ModelObject,
    schema: &'a SchemaTable,
) -> Result<ExtractedAttributes<'a>, ExtractError> {
    let class_name = object.class_name();
    if schema.get(class_name).is_none() {
        return Err(ExtractError::UnknownClass {
            class_name: class_name.to_string(),
            version: schema.version().to_string(),
        });
    }
    let chain = schema.chain(class_name)?;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut attributes = Vec::new();
    for level in chain.iter().copied() {
        for declared in &level.attributes {
            if !seen.insert(declared.name.as_str()) {
                continue;
            }
            if let Some(value) = object.get(&declared.name) {
                attributes.push(QualifiedAttribute {
                    class_name: level.name.as_str(),
                    name: declared.name.as_str(),
                    value,
                });
            }
        }
    }

    for (name, value) in object.attributes() {
        if !seen.contains(name) {
            attributes.push(QualifiedAttribute {
                class_name,
                name,
                value,
            });
        }
    }

    Ok(ExtractedAttributes {
        class_name,
        read_in_profile: object.read_in_profile(),
        possible_profiles: PossibleProfileList::new(chain),
        attributes,
    })
}
