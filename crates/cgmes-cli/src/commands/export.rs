use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cgmes_cli::{load_config, ExportArgs};
use cgmes_core::ActiveProfiles;
use cgmes_io::export::{CgmesExporter, ExportOptions, Namespaces};
use cgmes_io::load_snapshot;
use tabwriter::TabWriter;
use tracing::info;

use crate::commands::schema::load_schema;

pub fn handle(args: &ExportArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let snapshot = load_snapshot(&args.model)?;
    info!(
        "Loaded {} objects ({} keyed) from {}",
        snapshot.registry.object_count(),
        snapshot.registry.len(),
        args.model.display()
    );

    let version = args
        .schema_version
        .as_deref()
        .or(snapshot.version.as_deref())
        .unwrap_or(config.export.schema_version.as_str());
    let schema = load_schema(args.schema.as_deref(), version)?;

    let active = match &args.profiles {
        Some(list) => list
            .parse::<ActiveProfiles>()
            .with_context(|| format!("parsing profile list '{}'", list))?,
        None => config.export.active_profiles()?,
    };
    if active.is_empty() {
        bail!("no active profiles selected");
    }

    // Builtin prefixes, then the snapshot's, then the config file's.
    let mut namespaces = Namespaces::cgmes_default();
    if let Some(extra) = &snapshot.namespaces {
        namespaces.merge(extra);
    }
    namespaces.merge(&config.namespaces);

    let stem = match &args.stem {
        Some(stem) => stem.clone(),
        None => args
            .model
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .context("cannot derive a file name stem from the model path; pass --stem")?,
    };
    let output_dir: PathBuf = args
        .out
        .clone()
        .unwrap_or_else(|| config.export.output_dir.clone());
    let authority = args
        .authority
        .clone()
        .unwrap_or_else(|| config.export.modeling_authority.clone());

    let options = ExportOptions::new(stem, active)
        .with_output_dir(output_dir)
        .with_modeling_authority(authority);
    let exporter = CgmesExporter::new(&snapshot.registry, &schema).with_namespaces(namespaces);

    let mut writer = TabWriter::new(io::stdout());
    if args.dry_run {
        let (documents, diagnostics) = exporter.render(&options)?;
        writeln!(writer, "PROFILE\tFILE\tBYTES")?;
        for document in &documents {
            writeln!(
                writer,
                "{}\t{}\t{}",
                document.profile,
                document.path.display(),
                document.contents.len()
            )?;
        }
        writer.flush()?;
        report_diagnostics(&diagnostics);
        return Ok(());
    }

    let report = exporter.export(&options)?;
    writeln!(writer, "STATUS\tFILE")?;
    for path in &report.written {
        writeln!(writer, "written\t{}", path.display())?;
    }
    for path in &report.skipped {
        writeln!(writer, "skipped\t{}", path.display())?;
    }
    writer.flush()?;
    report_diagnostics(&report.diagnostics);
    Ok(())
}

fn report_diagnostics(diagnostics: &cgmes_core::Diagnostics) {
    if diagnostics.has_issues() {
        eprint!("{}", diagnostics);
    } else {
        println!("{}", diagnostics.summary());
    }
}
