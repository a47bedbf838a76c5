//! Profile-partitioned CGMES export.
//!
//! The pipeline runs strictly in order:
//!
//! 1. [`extract`] - flatten each registry entry into class-qualified attributes
//! 2. [`references`] - replace object values by reference tokens, drop defaults
//! 3. [`assign`] - pick the profile of each instance and each attribute
//! 4. [`partition`] - split attributes into owned and `about` entries per profile
//! 5. [`render`] / [`writer`] - one RDF/XML document per non-empty profile
//!
//! Problems with individual objects never abort the export; they are logged
//! through `tracing` and collected in the [`ExportReport`] diagnostics.
//!
//! ```no_run
//! use cgmes_core::{ActiveProfiles, Registry, SchemaTable, CGMES_V2_4_15};
//! use cgmes_io::export::{export_model, ExportOptions, Namespaces};
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = Registry::new();
//! let schema = SchemaTable::builtin(CGMES_V2_4_15)?;
//! let options = ExportOptions::new("grid", "EQ,TP,SV".parse::<ActiveProfiles>()?)
//!     .with_output_dir("out");
//! let report = export_model(&registry, &schema, &Namespaces::cgmes_default(), &options)?;
//! println!("{} files written, {}", report.written.len(), report.diagnostics.summary());
//! # Ok(())
//! # }
//! ```

pub mod assign;
pub mod extract;
pub mod identity;
pub mod namespaces;
pub mod options;
pub mod partition;
pub mod references;
pub mod render;
pub mod writer;

pub use assign::{resolve_attribute_profile, resolve_class_profile, AssignmentError};
pub use extract::{extract_attributes, ExtractError, ExtractedAttributes, QualifiedAttribute};
pub use identity::{resolve_identity, IdentityError, IdentityResolver};
pub use namespaces::Namespaces;
pub use options::{ExportOptions, DEFAULT_MODELING_AUTHORITY};
pub use partition::{partition, ExportEntry, ExportPlan};
pub use references::{
    collect_class_attributes, resolve_references, AttributeRecord, ClassAttributes, Literal,
    RecordValue, REFERENCE_MARKER,
};
pub use render::{
    render_profile, HeaderField, HeaderValue, ModelHeader, ProfileDocument, ProfileRenderer,
    RdfXmlRenderer, CREATED_FORMAT,
};
pub use writer::{write_if_absent, WriteOutcome};

use anyhow::{Context, Result};
use cgmes_core::{ActiveProfiles, CgmesProfile, Diagnostics, Registry, SchemaTable};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Diagnostic categories used by the export pipeline.
pub mod category {
    /// Unresolvable object reference
    pub const REFERENCE: &str = "reference";
    /// Non-object element in a reference list
    pub const TYPE: &str = "type";
    /// No active, allowed profile for a class or attribute
    pub const PROFILE: &str = "profile";
    /// Provenance names a profile the schema does not allow
    pub const PROVENANCE: &str = "provenance";
    /// Class missing from the schema table
    pub const SCHEMA: &str = "schema";
    /// Output file handling
    pub const OUTPUT: &str = "output";
}

/// A rendered profile document and the file it belongs in.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub profile: CgmesProfile,
    pub path: PathBuf,
    pub contents: String,
}

/// Outcome of [`CgmesExporter::export`].
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    /// Files that already existed and were left alone.
    pub skipped: Vec<PathBuf>,
    pub diagnostics: Diagnostics,
}

/// Exports one registry against one schema table.
pub struct CgmesExporter<'a> {
    registry: &'a Registry,
    schema: &'a SchemaTable,
    namespaces: Namespaces,
    renderer: Box<dyn ProfileRenderer + 'a>,
}

impl<'a> CgmesExporter<'a> {
    pub fn new(registry: &'a Registry, schema: &'a SchemaTable) -> Self {
        Self {
            registry,
            schema,
            namespaces: Namespaces::cgmes_default(),
            renderer: Box::new(RdfXmlRenderer),
        }
    }

    pub fn with_namespaces(mut self, namespaces: Namespaces) -> Self {
        self.namespaces = namespaces;
        self
    }

    pub fn with_renderer(mut self, renderer: impl ProfileRenderer + 'a) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Resolve references and assign profiles for every registry entry.
    pub fn plan(&self, active: &ActiveProfiles, diagnostics: &mut Diagnostics) -> ExportPlan {
        let identities = IdentityResolver::new(self.registry);
        let classes = collect_class_attributes(&identities, self.schema, diagnostics);
        partition(classes, active, diagnostics)
    }

    /// Render every non-empty profile without touching the file system.
    pub fn render(&self, options: &ExportOptions) -> Result<(Vec<RenderedDocument>, Diagnostics)> {
        let mut diagnostics = Diagnostics::new();
        let plan = self.plan(&options.active_profiles, &mut diagnostics);
        let created = options.created_at();

        let mut documents = Vec::new();
        for profile in CgmesProfile::all() {
            if !plan.has_content(profile) {
                continue;
            }
            let document = ProfileDocument {
                profile,
                namespaces: &self.namespaces,
                model: ModelHeader::new(
                    options.stem.as_str(),
                    created,
                    &options.modeling_authority,
                    profile,
                ),
                classes: plan.classes(profile),
                about: plan.about(profile),
            };
            let contents = self
                .renderer
                .render(&document)
                .with_context(|| format!("rendering profile {}", profile.full_name()))?;
            documents.push(RenderedDocument {
                profile,
                path: options.file_path(profile),
                contents,
            });
        }
        Ok((documents, diagnostics))
    }

    /// Render and write one file per non-empty profile. Existing files are
    /// skipped, never overwritten.
    pub fn export(&self, options: &ExportOptions) -> Result<ExportReport> {
        let started = Instant::now();
        info!("Start export procedure.");

        fs::create_dir_all(&options.output_dir).with_context(|| {
            format!(
                "creating output directory: {}",
                options.output_dir.display()
            )
        })?;

        let (documents, diagnostics) = self.render(options)?;
        let mut report = ExportReport {
            diagnostics,
            ..ExportReport::default()
        };

        for document in documents {
            match write_if_absent(&document.path, &document.contents)? {
                WriteOutcome::Written(path) => report.written.push(path),
                WriteOutcome::Skipped(path) => {
                    report.diagnostics.add_warning_with_entity(
                        category::OUTPUT,
                        "file already exists; delete it or change the file name",
                        &path.display().to_string(),
                    );
                    report.skipped.push(path);
                }
            }
        }

        if report.diagnostics.has_issues() {
            warn!("Export finished with {}", report.diagnostics.summary());
        }
        info!(
            "End export procedure. Elapsed time: {:.3}s",
            started.elapsed().as_secs_f64()
        );
        Ok(report)
    }
}

/// Export `registry` into one file per non-empty active profile.
pub fn export_model(
    registry: &Registry,
    schema: &SchemaTable,
    namespaces: &Namespaces,
    options: &ExportOptions,
) -> Result<ExportReport> {
    CgmesExporter::new(registry, schema)
        .with_namespaces(namespaces.clone())
        .export(options)
}
