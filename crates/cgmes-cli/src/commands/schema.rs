use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cgmes_core::{CgmesProfile, SchemaTable};
use tabwriter::TabWriter;

/// A JSON schema table when `path` is given, else the builtin one for `version`.
pub fn load_schema(path: Option<&Path>, version: &str) -> Result<SchemaTable> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading schema table: {}", path.display()))?;
            SchemaTable::from_json_str(&contents)
                .with_context(|| format!("parsing schema table: {}", path.display()))
        }
        None => Ok(SchemaTable::builtin(version)?),
    }
}

pub fn handle(class: &str, schema_version: &str, schema: Option<&PathBuf>) -> Result<()> {
    let schema = load_schema(schema.map(PathBuf::as_path), schema_version)?;
    let chain = schema.chain(class)?;

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "CLASS\tATTRIBUTE\tPROFILES")?;
    for level in chain {
        writeln!(
            writer,
            "{}\t\t{}",
            level.name,
            profile_list(&level.profiles)
        )?;
        for attribute in &level.attributes {
            writeln!(
                writer,
                "\t{}\t{}",
                attribute.name,
                profile_list(&attribute.profiles)
            )?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn profile_list(profiles: &[CgmesProfile]) -> String {
    profiles
        .iter()
        .map(|profile| profile.short_name())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_list_keeps_schema_order() {
        let schema = load_schema(None, cgmes_core::CGMES_V2_4_15).unwrap();
        let terminal = schema.get("Terminal").unwrap();
        assert_eq!(profile_list(&terminal.profiles), "EQ,SSH,TP,SV");
        assert_eq!(profile_list(&[]), "");
    }
}
