//! Export configuration file (TOML).
//!
//! ```toml
//! [export]
//! profiles = "EQ,TP,SV"
//! modeling_authority = "example.org"
//! output_dir = "out"
//! schema_version = "cgmes_v2_4_15"
//!
//! [namespaces]
//! cim = "http://iec.ch/TC57/2013/CIM-schema-cim16#"
//! ```
//!
//! Every key is optional; command-line flags take precedence over the file.

use anyhow::{Context, Result};
use cgmes_core::{ActiveProfiles, CGMES_V2_4_15};
use cgmes_io::export::{Namespaces, DEFAULT_MODELING_AUTHORITY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CgmesConfig {
    #[serde(default)]
    pub export: ExportConfig,
    /// Extra or overriding namespace prefixes
    #[serde(default)]
    pub namespaces: Namespaces,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Comma-separated short codes or full names
    #[serde(default = "default_profiles")]
    pub profiles: String,
    #[serde(default = "default_modeling_authority")]
    pub modeling_authority: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
            modeling_authority: default_modeling_authority(),
            output_dir: default_output_dir(),
            schema_version: default_schema_version(),
        }
    }
}

impl ExportConfig {
    pub fn active_profiles(&self) -> Result<ActiveProfiles> {
        self.profiles
            .parse::<ActiveProfiles>()
            .with_context(|| format!("parsing profile list '{}'", self.profiles))
    }
}

fn default_profiles() -> String {
    ActiveProfiles::all().to_string()
}

fn default_modeling_authority() -> String {
    DEFAULT_MODELING_AUTHORITY.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_schema_version() -> String {
    CGMES_V2_4_15.to_string()
}

/// Load a config file, or the defaults when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<CgmesConfig> {
    let Some(path) = path else {
        return Ok(CgmesConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file: {}", path.display()))?;
    let config: CgmesConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing config file: {}", path.display()))?;
    Ok(config)
}
