//! Export run configuration.

use cgmes_core::{ActiveProfiles, CgmesProfile};
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Modeling authority written into every model header unless overridden.
pub const DEFAULT_MODELING_AUTHORITY: &str = "www.acs.eonerc.rwth-aachen.de";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    /// File name stem; also the mRID of every generated document.
    pub stem: String,
    pub active_profiles: ActiveProfiles,
    pub modeling_authority: String,
    /// Fixed creation timestamp; the current local time when `None`.
    pub created: Option<NaiveDateTime>,
}

impl ExportOptions {
    pub fn new(stem: impl Into<String>, active_profiles: ActiveProfiles) -> Self {
        Self {
            output_dir: PathBuf::from("."),
            stem: stem.into(),
            active_profiles,
            modeling_authority: DEFAULT_MODELING_AUTHORITY.to_string(),
            created: None,
        }
    }

    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_modeling_authority(mut self, authority: impl Into<String>) -> Self {
        self.modeling_authority = authority.into();
        self
    }

    pub fn with_created(mut self, created: NaiveDateTime) -> Self {
        self.created = Some(created);
        self
    }

    /// `<stem>_<ProfileFullName>.xml`
    pub fn file_name(&self, profile: CgmesProfile) -> String {
        format!("{}_{}.xml", self.stem, profile.full_name())
    }

    pub fn file_path(&self, profile: CgmesProfile) -> PathBuf {
        self.output_dir.join(self.file_name(profile))
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created
            .unwrap_or_else(|| Local::now().naive_local())
    }
}
