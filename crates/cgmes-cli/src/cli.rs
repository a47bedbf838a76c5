use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cgmes", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a JSON model snapshot into one CGMES RDF/XML file per profile
    Export(ExportArgs),
    /// List CGMES profiles in export priority order
    Profiles,
    /// Show the inheritance chain and allowed profiles of a class
    Schema {
        /// Class name, e.g. "Terminal"
        class: String,
        /// Builtin schema version
        #[arg(long, default_value = cgmes_core::CGMES_V2_4_15)]
        schema_version: String,
        /// JSON schema table to use instead of a builtin one
        #[arg(long, value_hint = ValueHint::FilePath)]
        schema: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Model snapshot (JSON)
    #[arg(value_hint = ValueHint::FilePath)]
    pub model: PathBuf,
    /// Output directory [default: from config, else "."]
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub out: Option<PathBuf>,
    /// File name stem and model mRID [default: snapshot file stem]
    #[arg(long)]
    pub stem: Option<String>,
    /// Active profiles, e.g. "EQ,TP,SV" [default: from config, else all]
    #[arg(short, long)]
    pub profiles: Option<String>,
    /// Modeling authority written into the model header
    #[arg(long)]
    pub authority: Option<String>,
    /// TOML config file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Builtin schema version [default: snapshot version, else from config]
    #[arg(long)]
    pub schema_version: Option<String>,
    /// JSON schema table to use instead of a builtin one
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub schema: Option<PathBuf>,
    /// Only print the files that would be written
    #[arg(long)]
    pub dry_run: bool,
}
