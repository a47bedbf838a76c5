pub mod cli;
pub mod config;

pub use cli::{Cli, Commands, ExportArgs};
pub use config::{load_config, CgmesConfig, ExportConfig};
