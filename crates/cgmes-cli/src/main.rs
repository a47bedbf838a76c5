use cgmes_cli::{Cli, Commands};
use clap::Parser;
use std::process;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
    }

    let result = match &cli.command {
        Commands::Export(args) => commands::export::handle(args),
        Commands::Profiles => commands::profiles::handle(),
        Commands::Schema {
            class,
            schema_version,
            schema,
        } => commands::schema::handle(class, schema_version, schema.as_ref()),
    };

    if let Err(err) = result {
        error!("{:?}", err);
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}
