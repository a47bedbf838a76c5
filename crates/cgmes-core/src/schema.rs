//! Declared CIM class schema.
//!
//! Each class names its parent, the attributes it declares and the profiles in
//! which the class itself and each attribute may be serialized. Classes without
//! a parent hang directly off the abstract base, which contributes nothing but
//! identity. The table is built once and queried by the export pipeline; no
//! class hierarchy is discovered at runtime.

use crate::error::{CgmesError, CgmesResult};
use crate::profile::CgmesProfile;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Version tag of the builtin CGMES 2.4.15 table.
pub const CGMES_V2_4_15: &str = "cgmes_v2_4_15";

/// A single attribute declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSchema {
    pub name: String,
    #[serde(default)]
    pub profiles: Vec<CgmesProfile>,
}

/// One level of the class hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSchema {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// Profiles the class itself may be serialized in.
    #[serde(default)]
    pub profiles: Vec<CgmesProfile>,
    /// Attributes declared at this level, in declaration order.
    #[serde(default)]
    pub attributes: Vec<AttributeSchema>,
}

impl ClassSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            profiles: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_profiles(mut self, profiles: &[CgmesProfile]) -> Self {
        self.profiles = profiles.to_vec();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, profiles: &[CgmesProfile]) -> Self {
        self.attributes.push(AttributeSchema {
            name: name.into(),
            profiles: profiles.to_vec(),
        });
        self
    }

    /// Allowed class-level profiles, ascending by rank.
    pub fn class_profiles(&self) -> &[CgmesProfile] {
        &self.profiles
    }

    /// Allowed profiles of an attribute declared at this level, ascending by rank.
    pub fn attribute_profiles(&self, attribute: &str) -> Option<&[CgmesProfile]> {
        self.attributes
            .iter()
            .find(|attr| attr.name == attribute)
            .map(|attr| attr.profiles.as_slice())
    }

    fn normalize(&mut self) {
        self.profiles.sort();
        self.profiles.dedup();
        for attr in &mut self.attributes {
            attr.profiles.sort();
            attr.profiles.dedup();
        }
    }
}

/// Allowed-profile map of one object: every level of its inheritance chain.
#[derive(Debug, Clone, Default)]
pub struct PossibleProfileList<'a> {
    levels: Vec<&'a ClassSchema>,
}

impl<'a> PossibleProfileList<'a> {
    pub fn new(levels: Vec<&'a ClassSchema>) -> Self {
        Self { levels }
    }

    fn level(&self, class_name: &str) -> Option<&'a ClassSchema> {
        self.levels
            .iter()
            .copied()
            .find(|level| level.name == class_name)
    }

    pub fn contains_class(&self, class_name: &str) -> bool {
        self.level(class_name).is_some()
    }

    pub fn class_profiles(&self, class_name: &str) -> Option<&'a [CgmesProfile]> {
        self.level(class_name).map(ClassSchema::class_profiles)
    }

    pub fn attribute_profiles(&self, class_name: &str, attribute: &str) -> Option<&'a [CgmesProfile]> {
        self.level(class_name)
            .and_then(|level| level.attribute_profiles(attribute))
    }
}

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    version: String,
    classes: Vec<ClassSchema>,
}

/// Lookup table of every class known to an export run.
#[derive(Debug, Clone)]
pub struct SchemaTable {
    version: String,
    classes: HashMap<String, ClassSchema>,
}

impl SchemaTable {
    /// Build a table, rejecting duplicate names, unknown parents and cycles.
    pub fn from_classes(
        version: impl Into<String>,
        classes: impl IntoIterator<Item = ClassSchema>,
    ) -> CgmesResult<Self> {
        let mut table = HashMap::new();
        for mut class in classes {
            class.normalize();
            if table.contains_key(&class.name) {
                return Err(CgmesError::Schema(format!(
                    "class '{}' declared twice",
                    class.name
                )));
            }
            table.insert(class.name.clone(), class);
        }

        let schema = Self {
            version: version.into(),
            classes: table,
        };
        for name in schema.classes.keys() {
            schema.chain(name)?;
        }
        Ok(schema)
    }

    /// Parse a JSON schema document `{"version": "...", "classes": [...]}`.
    pub fn from_json_str(input: &str) -> CgmesResult<Self> {
        let document: SchemaDocument = serde_json::from_str(input)?;
        Self::from_classes(document.version, document.classes)
    }

    /// Builtin table for a version tag.
    pub fn builtin(version: &str) -> CgmesResult<Self> {
        match version {
            CGMES_V2_4_15 => Self::from_classes(CGMES_V2_4_15, cgmes_v2_4_15_classes()),
            other => Err(CgmesError::UnsupportedVersion(other.to_string())),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn get(&self, class_name: &str) -> Option<&ClassSchema> {
        self.classes.get(class_name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class names in alphabetical order.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Inheritance chain of a class, from the top-most ancestor down to the class itself.
    pub fn chain(&self, class_name: &str) -> CgmesResult<Vec<&ClassSchema>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(class_name);

        while let Some(name) = current {
            if !seen.insert(name) {
                return Err(CgmesError::Schema(format!(
                    "inheritance cycle through class '{}'",
                    name
                )));
            }
            let class = self.classes.get(name).ok_or_else(|| {
                if name == class_name {
                    CgmesError::Schema(format!("unknown class '{}'", name))
                } else {
                    CgmesError::Schema(format!(
                        "class '{}' has unknown ancestor '{}'",
                        class_name, name
                    ))
                }
            })?;
            chain.push(class);
            current = class.parent.as_deref();
        }

        chain.reverse();
        Ok(chain)
    }

    /// Allowed-profile map aggregated over the whole chain of a class.
    pub fn possible_profiles(&self, class_name: &str) -> CgmesResult<PossibleProfileList<'_>> {
        Ok(PossibleProfileList::new(self.chain(class_name)?))
    }
}

fn cgmes_v2_4_15_classes() -> Vec<ClassSchema> {
    use CgmesProfile::{
        DiagramLayout as DI, Dynamics as DY, Equipment as EQ, GeographicalLocation as GL,
        StateVariables as SV, SteadyStateHypothesis as SSH, Topology as TP,
    };

    vec![
        ClassSchema::new("IdentifiedObject")
            .with_profiles(&[EQ, SSH, TP, SV, DY, GL, DI])
            .with_attribute("mRID", &[EQ, SSH, TP, SV, DY, GL, DI])
            .with_attribute("name", &[EQ, TP, DY, GL, DI])
            .with_attribute("description", &[EQ, TP, DY, GL, DI])
            .with_attribute("shortName", &[EQ, TP])
            .with_attribute("energyIdentCodeEic", &[EQ, TP])
            .with_attribute("DiagramObjects", &[DI]),
        ClassSchema::new("PowerSystemResource")
            .with_parent("IdentifiedObject")
            .with_profiles(&[EQ, SSH, DY, GL, DI])
            .with_attribute("Location", &[GL])
            .with_attribute("PSRType", &[EQ]),
        ClassSchema::new("Equipment")
            .with_parent("PowerSystemResource")
            .with_profiles(&[EQ, SSH, DY])
            .with_attribute("aggregate", &[EQ])
            .with_attribute("EquipmentContainer", &[EQ]),
        ClassSchema::new("ConductingEquipment")
            .with_parent("Equipment")
            .with_profiles(&[EQ, SSH, DY, SV])
            .with_attribute("BaseVoltage", &[EQ])
            .with_attribute("SvStatus", &[SV]),
        ClassSchema::new("Conductor")
            .with_parent("ConductingEquipment")
            .with_profiles(&[EQ])
            .with_attribute("length", &[EQ]),
        ClassSchema::new("ACLineSegment")
            .with_parent("Conductor")
            .with_profiles(&[EQ])
            .with_attribute("r", &[EQ])
            .with_attribute("x", &[EQ])
            .with_attribute("bch", &[EQ])
            .with_attribute("gch", &[EQ])
            .with_attribute("r0", &[EQ])
            .with_attribute("x0", &[EQ]),
        ClassSchema::new("EnergyConsumer")
            .with_parent("ConductingEquipment")
            .with_profiles(&[EQ, SSH])
            .with_attribute("pfixed", &[EQ])
            .with_attribute("qfixed", &[EQ])
            .with_attribute("LoadResponse", &[EQ])
            .with_attribute("p", &[SSH])
            .with_attribute("q", &[SSH]),
        ClassSchema::new("ACDCTerminal")
            .with_parent("IdentifiedObject")
            .with_profiles(&[EQ, SSH, TP])
            .with_attribute("sequenceNumber", &[EQ])
            .with_attribute("connected", &[SSH])
            .with_attribute("BusNameMarker", &[EQ]),
        ClassSchema::new("Terminal")
            .with_parent("ACDCTerminal")
            .with_profiles(&[EQ, SSH, TP, SV])
            .with_attribute("ConductingEquipment", &[EQ])
            .with_attribute("ConnectivityNode", &[EQ])
            .with_attribute("phases", &[EQ])
            .with_attribute("TopologicalNode", &[TP])
            .with_attribute("SvPowerFlow", &[SV]),
        ClassSchema::new("ConnectivityNode")
            .with_parent("IdentifiedObject")
            .with_profiles(&[EQ, TP])
            .with_attribute("ConnectivityNodeContainer", &[EQ])
            .with_attribute("TopologicalNode", &[TP]),
        ClassSchema::new("TopologicalNode")
            .with_parent("IdentifiedObject")
            .with_profiles(&[TP, SV])
            .with_attribute("BaseVoltage", &[TP])
            .with_attribute("ConnectivityNodeContainer", &[TP])
            .with_attribute("SvVoltage", &[SV])
            .with_attribute("SvInjection", &[SV]),
        ClassSchema::new("BaseVoltage")
            .with_parent("IdentifiedObject")
            .with_profiles(&[EQ])
            .with_attribute("nominalVoltage", &[EQ]),
        ClassSchema::new("ConnectivityNodeContainer")
            .with_parent("PowerSystemResource")
            .with_profiles(&[EQ, TP]),
        ClassSchema::new("EquipmentContainer")
            .with_parent("ConnectivityNodeContainer")
            .with_profiles(&[EQ]),
        ClassSchema::new("Substation")
            .with_parent("EquipmentContainer")
            .with_profiles(&[EQ])
            .with_attribute("Region", &[EQ]),
        ClassSchema::new("VoltageLevel")
            .with_parent("EquipmentContainer")
            .with_profiles(&[EQ])
            .with_attribute("BaseVoltage", &[EQ])
            .with_attribute("Substation", &[EQ])
            .with_attribute("highVoltageLimit", &[EQ])
            .with_attribute("lowVoltageLimit", &[EQ]),
        ClassSchema::new("Location")
            .with_parent("IdentifiedObject")
            .with_profiles(&[GL])
            .with_attribute("PowerSystemResources", &[GL])
            .with_attribute("CoordinateSystem", &[GL]),
        ClassSchema::new("CoordinateSystem")
            .with_parent("IdentifiedObject")
            .with_profiles(&[GL])
            .with_attribute("crsUrn", &[GL]),
        // Result objects carry no mRID; they are identified by registry key only.
        ClassSchema::new("PositionPoint")
            .with_profiles(&[GL])
            .with_attribute("sequenceNumber", &[GL])
            .with_attribute("xPosition", &[GL])
            .with_attribute("yPosition", &[GL])
            .with_attribute("zPosition", &[GL])
            .with_attribute("Location", &[GL]),
        ClassSchema::new("SvVoltage")
            .with_profiles(&[SV])
            .with_attribute("angle", &[SV])
            .with_attribute("v", &[SV])
            .with_attribute("TopologicalNode", &[SV]),
        ClassSchema::new("SvPowerFlow")
            .with_profiles(&[SV])
            .with_attribute("p", &[SV])
            .with_attribute("q", &[SV])
            .with_attribute("Terminal", &[SV]),
        ClassSchema::new("SvInjection")
            .with_profiles(&[SV])
            .with_attribute("pInjection", &[SV])
            .with_attribute("qInjection", &[SV])
            .with_attribute("TopologicalNode", &[SV]),
        ClassSchema::new("SvStatus")
            .with_profiles(&[SV])
            .with_attribute("inService", &[SV])
            .with_attribute("ConductingEquipment", &[SV]),
    ]
}
