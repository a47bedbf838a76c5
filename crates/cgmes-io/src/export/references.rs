//! Turn extracted attributes into reference-resolved records.
//!
//! Object-valued attributes become reference tokens naming the referenced
//! object's identifier. Default values never become records.

use super::category;
use super::extract::{extract_attributes, ExtractError, ExtractedAttributes};
use super::identity::IdentityResolver;
use cgmes_core::{Diagnostics, ObjectId, PossibleProfileList, Provenance, SchemaTable, Value};
use std::fmt;
use tracing::warn;

/// Prefix marking a reference token in its textual form.
pub const REFERENCE_MARKER: char = '%';

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => f.write_str(s),
            Literal::Int(i) => write!(f, "{}", i),
            // keep a decimal point on integral floats: 110 -> "110.0"
            Literal::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
                write!(f, "{:.1}", x)
            }
            Literal::Float(x) => write!(f, "{}", x),
            Literal::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Value of an [`AttributeRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Literal(Literal),
    /// Identifier of a single referenced object.
    Reference(String),
    /// Identifiers of several referenced objects, in attribute order.
    References(Vec<String>),
}

impl RecordValue {
    /// Reference tokens (`%<identifier>`) of a reference value; empty for literals.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            RecordValue::Literal(_) => Vec::new(),
            RecordValue::Reference(id) => vec![format!("{}{}", REFERENCE_MARKER, id)],
            RecordValue::References(ids) => ids
                .iter()
                .map(|id| format!("{}{}", REFERENCE_MARKER, id))
                .collect(),
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordValue::Literal(literal) => write!(f, "{}", literal),
            reference => f.write_str(&reference.tokens().join(" ")),
        }
    }
}

/// A class-qualified, reference-resolved attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRecord {
    pub class_name: String,
    pub attr_name: String,
    pub value: RecordValue,
}

impl AttributeRecord {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.class_name, self.attr_name)
    }
}

/// All records of one registry entry plus the metadata profile assignment needs.
#[derive(Debug, Clone)]
pub struct ClassAttributes<'a> {
    /// Concrete class name.
    pub name: &'a str,
    /// Registry key of the instance.
    pub mrid: &'a str,
    pub read_in_profile: &'a Provenance,
    pub possible_profiles: PossibleProfileList<'a>,
    pub attributes: Vec<AttributeRecord>,
}

/// Resolve the attributes of one extracted object. `owner` names the instance
/// in diagnostics.
pub fn resolve_references(
    extracted: &ExtractedAttributes<'_>,
    identities: &IdentityResolver<'_>,
    owner: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<AttributeRecord> {
    let mut records = Vec::with_capacity(extracted.attributes.len());
    for attribute in &extracted.attributes {
        let value = match attribute.value {
            Value::List(items) => resolve_list(items, identities, owner, diagnostics),
            Value::Object(id) => resolve_object(*id, identities, owner, diagnostics)
                .map(RecordValue::Reference),
            scalar => literal(scalar).map(RecordValue::Literal),
        };
        if let Some(value) = value {
            records.push(AttributeRecord {
                class_name: attribute.class_name.to_string(),
                attr_name: attribute.name.to_string(),
                value,
            });
        }
    }
    records
}

/// Extract and resolve every registry entry, in registry order.
///
/// Entries whose class the schema does not know are logged and left out.
pub fn collect_class_attributes<'a>(
    identities: &IdentityResolver<'a>,
    schema: &'a SchemaTable,
    diagnostics: &mut Diagnostics,
) -> Vec<ClassAttributes<'a>> {
    let registry = identities.registry();
    let mut classes = Vec::with_capacity(registry.len());
    for (key, _, object) in registry.entries() {
        let extracted = match extract_attributes(object, schema) {
            Ok(extracted) => extracted,
            Err(err) => {
                report_extract_error(&err, key, diagnostics);
                continue;
            }
        };
        let attributes = resolve_references(&extracted, identities, key, diagnostics);
        classes.push(ClassAttributes {
            name: extracted.class_name,
            mrid: key,
            read_in_profile: extracted.read_in_profile,
            possible_profiles: extracted.possible_profiles,
            attributes,
        });
    }
    classes
}

fn report_extract_error(err: &ExtractError, key: &str, diagnostics: &mut Diagnostics) {
    warn!("Skipping object {}: {}", key, err);
    diagnostics.add_warning_with_entity(category::SCHEMA, &err.to_string(), key);
}

fn resolve_object(
    id: ObjectId,
    identities: &IdentityResolver<'_>,
    owner: &str,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    match identities.resolve(id) {
        Ok(identifier) => Some(identifier.to_string()),
        Err(err) => {
            warn!("{} as reference for object with UUID {}.", err, owner);
            diagnostics.add_warning_with_entity(category::REFERENCE, &err.to_string(), owner);
            None
        }
    }
}

fn resolve_list(
    items: &[Value],
    identities: &IdentityResolver<'_>,
    owner: &str,
    diagnostics: &mut Diagnostics,
) -> Option<RecordValue> {
    let mut identifiers = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(id) => {
                if let Some(identifier) = resolve_object(*id, identities, owner, diagnostics) {
                    identifiers.push(identifier);
                }
            }
            skipped if skipped.is_default() => {}
            other => {
                let message = format!(
                    "list element of type {} is not a model object",
                    other.kind()
                );
                warn!("Reference object not a model object for object with UUID {}.", owner);
                diagnostics.add_warning_with_entity(category::TYPE, &message, owner);
            }
        }
    }

    match identifiers.len() {
        0 => None,
        1 => identifiers.pop().map(RecordValue::Reference),
        _ => Some(RecordValue::References(identifiers)),
    }
}

fn literal(value: &Value) -> Option<Literal> {
    if value.is_default() {
        return None;
    }
    match value {
        Value::Str(s) => Some(Literal::Str(s.clone())),
        Value::Int(i) => Some(Literal::Int(*i)),
        Value::Float(x) => Some(Literal::Float(*x)),
        Value::Bool(b) => Some(Literal::Bool(*b)),
        Value::Null | Value::Object(_) | Value::List(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmes_core::{ModelObject, Registry, CGMES_V2_4_15};

    fn resolve(registry: &Registry, key: &str) -> (Vec<AttributeRecord>, Diagnostics) {
        let schema = SchemaTable::builtin(CGMES_V2_4_15).unwrap();
        let identities = IdentityResolver::new(registry);
        let object = registry.object(key).unwrap();
        let extracted = extract_attributes(object, &schema).unwrap();
        let mut diagnostics = Diagnostics::new();
        let records = resolve_references(&extracted, &identities, key, &mut diagnostics);
        (records, diagnostics)
    }

    fn value_of<'r>(records: &'r [AttributeRecord], name: &str) -> Option<&'r RecordValue> {
        records
            .iter()
            .find(|record| record.qualified_name() == name)
            .map(|record| &record.value)
    }

    #[test]
    fn object_reference_uses_mrid() {
        let mut registry = Registry::new();
        let bv = registry
            .insert("bv-key", ModelObject::new("BaseVoltage").with_mrid("_BV1"))
            .unwrap();
        registry
            .insert(
                "_L1",
                ModelObject::new("ACLineSegment")
                    .with_mrid("_L1")
                    .with("BaseVoltage", bv),
            )
            .unwrap();

        let (records, diagnostics) = resolve(&registry, "_L1");
        let value = value_of(&records, "ConductingEquipment.BaseVoltage").unwrap();
        assert_eq!(value, &RecordValue::Reference("_BV1".to_string()));
        assert_eq!(value.tokens(), vec!["%_BV1".to_string()]);
        assert!(!diagnostics.has_issues());
    }

    #[test]
    fn object_without_mrid_resolves_to_registry_key() {
        let mut registry = Registry::new();
        let flow = registry.insert("SV_PF_1", ModelObject::new("SvPowerFlow")).unwrap();
        registry
            .insert(
                "_T1",
                ModelObject::new("Terminal")
                    .with_mrid("_T1")
                    .with("SvPowerFlow", flow),
            )
            .unwrap();

        let (records, _) = resolve(&registry, "_T1");
        assert_eq!(
            value_of(&records, "Terminal.SvPowerFlow").unwrap().to_string(),
            "%SV_PF_1"
        );
    }

    #[test]
    fn unresolvable_reference_is_omitted_and_reported() {
        let mut registry = Registry::new();
        let orphan = registry.alloc(ModelObject::new("SvStatus"));
        registry
            .insert(
                "_L1",
                ModelObject::new("ACLineSegment")
                    .with_mrid("_L1")
                    .with("SvStatus", orphan)
                    .with("r", 0.1),
            )
            .unwrap();

        let (records, diagnostics) = resolve(&registry, "_L1");
        assert!(value_of(&records, "ConductingEquipment.SvStatus").is_none());
        assert!(value_of(&records, "ACLineSegment.r").is_some());
        let issue = diagnostics.issues_by_category(category::REFERENCE).next().unwrap();
        assert!(issue.message.contains("SvStatus"));
        assert_eq!(issue.entity.as_deref(), Some("_L1"));
    }

    #[test]
    fn unknown_class_is_skipped_with_schema_warning() {
        let schema = SchemaTable::builtin(CGMES_V2_4_15).unwrap();
        let mut registry = Registry::new();
        registry
            .insert("_G1", ModelObject::new("Gizmo").with_mrid("_G1").with("size", 3))
            .unwrap();
        registry
            .insert("_BV1", ModelObject::new("BaseVoltage").with_mrid("_BV1"))
            .unwrap();
        let identities = IdentityResolver::new(&registry);
        let mut diagnostics = Diagnostics::new();

        let classes = collect_class_attributes(&identities, &schema, &mut diagnostics);

        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].mrid, "_BV1");
        let issues: Vec<_> = diagnostics.issues_by_category(category::SCHEMA).collect();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].entity.as_deref(), Some("_G1"));
        assert!(issues[0].message.contains("Gizmo"));
    }

    #[test]
    fn lists_collapse_and_drop_non_objects() {
        let mut registry = Registry::new();
        let a = registry.insert("_P1", ModelObject::new("Substation").with_mrid("_P1")).unwrap();
        let b = registry.insert("_P2", ModelObject::new("Substation").with_mrid("_P2")).unwrap();
        registry
            .insert(
                "_LOC1",
                ModelObject::new("Location")
                    .with_mrid("_LOC1")
                    .with("PowerSystemResources", vec![a, b]),
            )
            .unwrap();
        registry
            .insert(
                "_LOC2",
                ModelObject::new("Location").with_mrid("_LOC2").with(
                    "PowerSystemResources",
                    vec![Value::Object(a), Value::from("stray"), Value::from(0)],
                ),
            )
            .unwrap();

        let (records, _) = resolve(&registry, "_LOC1");
        assert_eq!(
            value_of(&records, "Location.PowerSystemResources"),
            Some(&RecordValue::References(vec!["_P1".into(), "_P2".into()]))
        );

        let (records, diagnostics) = resolve(&registry, "_LOC2");
        assert_eq!(
            value_of(&records, "Location.PowerSystemResources"),
            Some(&RecordValue::Reference("_P1".into()))
        );
        assert_eq!(diagnostics.issues_by_category(category::TYPE).count(), 1);
    }

    #[test]
    fn defaults_are_never_recorded() {
        let mut registry = Registry::new();
        registry
            .insert(
                "_L1",
                ModelObject::new("ACLineSegment")
                    .with_mrid("_L1")
                    .with("name", "")
                    .with("description", Value::Null)
                    .with("r", 0.0)
                    .with("x", 0)
                    .with("bch", 1.5)
                    .with("gch", Value::List(vec![Value::Null, Value::from(""), Value::from(0.0)])),
            )
            .unwrap();

        let (records, diagnostics) = resolve(&registry, "_L1");
        let names: Vec<String> = records.iter().map(AttributeRecord::qualified_name).collect();
        assert_eq!(names, vec!["IdentifiedObject.mRID", "ACLineSegment.bch"]);
        assert!(!diagnostics.has_issues());
    }

    #[test]
    fn literal_formatting() {
        assert_eq!(Literal::Float(110.0).to_string(), "110.0");
        assert_eq!(Literal::Float(0.25).to_string(), "0.25");
        assert_eq!(Literal::Int(-3).to_string(), "-3");
        assert_eq!(Literal::Bool(true).to_string(), "true");
    }
}
