//! Decide which profile a class instance and each of its attributes is
//! serialized into.
//!
//! Three signals compete: the profile a value was read from (provenance), the
//! profiles active for this export, and the profiles the schema allows. The
//! schema is authoritative. Provenance is a shortcut that is only taken when
//! the named profile is both active and allowed; otherwise the allowed
//! profiles are scanned in ascending rank and the first active one wins.

use super::category;
use super::references::{AttributeRecord, ClassAttributes};
use cgmes_core::{ActiveProfiles, CgmesProfile, Diagnostics};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    #[error("class {class_name} has no profile to export to")]
    NoClassProfiles { class_name: String },

    #[error("all possible export profiles for class {class_name} are inactive")]
    NoActiveClassProfile { class_name: String },

    #[error("attribute {attribute} of class {class_name} has no profile to export to")]
    NoAttributeProfiles {
        class_name: String,
        attribute: String,
    },

    #[error("all possible export profiles for attribute {attribute} of class {class_name} are inactive")]
    NoActiveAttributeProfile {
        class_name: String,
        attribute: String,
    },
}

/// First allowed profile, in ascending rank, that is active.
pub fn first_active(allowed: &[CgmesProfile], active: &ActiveProfiles) -> Option<CgmesProfile> {
    let mut candidates = allowed.to_vec();
    candidates.sort();
    candidates
        .into_iter()
        .find(|profile| active.contains(*profile))
}

/// Class-level profile of an instance.
pub fn resolve_class_profile(
    class: &ClassAttributes<'_>,
    active: &ActiveProfiles,
    diagnostics: &mut Diagnostics,
) -> Result<CgmesProfile, AssignmentError> {
    let allowed = class
        .possible_profiles
        .class_profiles(class.name)
        .filter(|profiles| !profiles.is_empty())
        .ok_or_else(|| AssignmentError::NoClassProfiles {
            class_name: class.name.to_string(),
        })?;

    if let Some(read_in) = class.read_in_profile.class() {
        if !active.contains(read_in) {
            debug!(
                "Class {} was read from profile {} but this profile is not active for the export",
                class.name, read_in
            );
        } else if allowed.contains(&read_in) {
            return Ok(read_in);
        } else {
            let message = format!(
                "class {} was read from profile {} but this profile is not possible for this class",
                class.name, read_in
            );
            warn!("{}", message);
            diagnostics.add_warning_with_entity(category::PROVENANCE, &message, class.mrid);
        }
    }

    first_active(allowed, active).ok_or_else(|| AssignmentError::NoActiveClassProfile {
        class_name: class.name.to_string(),
    })
}

/// Profile of one attribute of an instance.
pub fn resolve_attribute_profile(
    class: &ClassAttributes<'_>,
    record: &AttributeRecord,
    active: &ActiveProfiles,
    diagnostics: &mut Diagnostics,
) -> Result<CgmesProfile, AssignmentError> {
    let allowed = class
        .possible_profiles
        .attribute_profiles(&record.class_name, &record.attr_name)
        .filter(|profiles| !profiles.is_empty())
        .ok_or_else(|| AssignmentError::NoAttributeProfiles {
            class_name: class.name.to_string(),
            attribute: record.qualified_name(),
        })?;

    if let Some(read_in) = class.read_in_profile.attribute(&record.attr_name) {
        if !active.contains(read_in) {
            debug!(
                "Attribute {} of class {} was read from profile {} but this profile is inactive",
                record.qualified_name(),
                class.name,
                read_in
            );
        } else if allowed.contains(&read_in) {
            return Ok(read_in);
        } else {
            let message = format!(
                "attribute {} of class {} was read from profile {} but this profile is not possible for this attribute",
                record.qualified_name(),
                class.name,
                read_in
            );
            warn!("{}", message);
            diagnostics.add_warning_with_entity(category::PROVENANCE, &message, class.mrid);
        }
    }

    first_active(allowed, active).ok_or_else(|| AssignmentError::NoActiveAttributeProfile {
        class_name: class.name.to_string(),
        attribute: record.qualified_name(),
    })
}
