//! Group resolved attributes into per-profile export entries.
//!
//! Each surviving instance is owned by exactly one profile. Attributes that
//! resolve to the owning profile are serialized inline; the rest are filed as
//! `about` entries under the profile they resolved to.

use super::assign::{resolve_attribute_profile, resolve_class_profile};
use super::category;
use super::references::{AttributeRecord, ClassAttributes};
use cgmes_core::{ActiveProfiles, CgmesProfile, Diagnostics, MRID};
use std::collections::BTreeMap;
use tracing::warn;

/// One instance as it appears in a single profile document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportEntry {
    pub name: String,
    pub mrid: String,
    pub attributes: Vec<AttributeRecord>,
}

/// Owned classes and about entries, per profile.
#[derive(Debug, Clone, Default)]
pub struct ExportPlan {
    classes: BTreeMap<CgmesProfile, Vec<ExportEntry>>,
    about: BTreeMap<CgmesProfile, Vec<ExportEntry>>,
}

impl ExportPlan {
    /// Instances owned by `profile`, in registry order.
    pub fn classes(&self, profile: CgmesProfile) -> &[ExportEntry] {
        self.classes.get(&profile).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cross-profile entries filed under `profile`, in registry order.
    pub fn about(&self, profile: CgmesProfile) -> &[ExportEntry] {
        self.about.get(&profile).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_content(&self, profile: CgmesProfile) -> bool {
        !self.classes(profile).is_empty() || !self.about(profile).is_empty()
    }

    /// Profiles with any content, in rank order.
    pub fn profiles(&self) -> Vec<CgmesProfile> {
        CgmesProfile::all()
            .filter(|profile| self.has_content(*profile))
            .collect()
    }

    /// Profile owning the instance with identifier `mrid`.
    pub fn owner_of(&self, mrid: &str) -> Option<CgmesProfile> {
        self.classes
            .iter()
            .find(|(_, entries)| entries.iter().any(|entry| entry.mrid == mrid))
            .map(|(profile, _)| *profile)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.about.is_empty()
    }

    fn push_owned(&mut self, profile: CgmesProfile, entry: ExportEntry) {
        self.classes.entry(profile).or_default().push(entry);
    }

    fn push_about(&mut self, profile: CgmesProfile, entry: ExportEntry) {
        self.about.entry(profile).or_default().push(entry);
    }
}

/// Assign every instance and attribute to a profile and build the plan.
pub fn partition(
    classes: Vec<ClassAttributes<'_>>,
    active: &ActiveProfiles,
    diagnostics: &mut Diagnostics,
) -> ExportPlan {
    let mut plan = ExportPlan::default();

    for class in classes {
        let class_profile = match resolve_class_profile(&class, active, diagnostics) {
            Ok(profile) => profile,
            Err(err) => {
                warn!("{}. Skip class {} for export.", err, class.mrid);
                diagnostics.add_warning_with_entity(category::PROFILE, &err.to_string(), class.mrid);
                continue;
            }
        };

        let mut owned = Vec::new();
        let mut about: BTreeMap<CgmesProfile, Vec<AttributeRecord>> = BTreeMap::new();
        for record in &class.attributes {
            if record.attr_name == MRID {
                continue;
            }
            match resolve_attribute_profile(&class, record, active, diagnostics) {
                Ok(profile) if profile == class_profile => owned.push(record.clone()),
                Ok(profile) => about.entry(profile).or_default().push(record.clone()),
                Err(err) => {
                    warn!("{}. Skip attribute for export.", err);
                    diagnostics.add_warning_with_entity(
                        category::PROFILE,
                        &err.to_string(),
                        class.mrid,
                    );
                }
            }
        }

        plan.push_owned(
            class_profile,
            ExportEntry {
                name: class.name.to_string(),
                mrid: class.mrid.to_string(),
                attributes: owned,
            },
        );
        for (profile, attributes) in about {
            plan.push_about(
                profile,
                ExportEntry {
                    name: class.name.to_string(),
                    mrid: class.mrid.to_string(),
                    attributes,
                },
            );
        }
    }

    plan
}
