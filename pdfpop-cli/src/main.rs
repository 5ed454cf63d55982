use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pdfpop",
    about = "Populate PDF form fields from spreadsheet data",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a field-mapping configuration file for a PDF form
    Config {
        /// PDF form template to inspect
        form: PathBuf,
    },

    /// Populate a PDF form from a mapping and a data file
    Run {
        /// Field-mapping configuration file
        config: PathBuf,

        /// Tabular data source (xlsx, xls, ods or csv)
        data: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { form } => {
            let config_path = pdfpop::generate_config(&form)
                .with_context(|| format!("failed to generate configuration for {}", form.display()))?;
            println!("Generated form configuration file \"{}\".", config_path.display());
        }

        Commands::Run { config, data } => {
            let output = pdfpop::run(&config, &data)
                .with_context(|| format!("failed to populate form per {}", config.display()))?;
            match output {
                Some(path) => println!("Populated form saved to \"{}\".", path.display()),
                None => println!("No entries found in data file. Exiting."),
            }
        }
    }

    Ok(())
}
