use acrofill::{FieldsData, PdfServiceBuilder, ServiceConfig, ServiceError};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Read and fill PDF form fields.
#[derive(Parser, Debug)]
#[command(name = "acrofill", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the fields, pages and fonts of a document as JSON.
    Fields {
        pdf: PathBuf,
        /// Service configuration (font directories, default font size).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Fill a document from a `{"fields": [...]}` JSON file.
    Fill {
        pdf: PathBuf,
        #[arg(long)]
        data: PathBuf,
        #[arg(long, short)]
        output: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ServiceError> {
    match path {
        Some(path) => ServiceConfig::from_file(path),
        None => Ok(ServiceConfig::from_env()),
    }
}

fn run(cli: Cli) -> Result<(), ServiceError> {
    match cli.command {
        Command::Fields { pdf, config } => {
            let service = PdfServiceBuilder::new()
                .with_config(load_config(config.as_deref())?)
                .build()?;
            let listing = service.read_fields(&fs::read(&pdf)?)?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Command::Fill {
            pdf,
            data,
            output,
            config,
        } => {
            let request: FieldsData = serde_json::from_str(&fs::read_to_string(&data)?)?;
            if request.fields.as_ref().is_none_or(|f| f.is_empty()) {
                return Err(ServiceError::InvalidRequest(format!(
                    "'{}' has no fields to fill",
                    data.display()
                )));
            }
            let service = PdfServiceBuilder::new()
                .with_config(load_config(config.as_deref())?)
                .build()?;
            let filled = service.fill_data(&fs::read(&pdf)?, &request)?;
            fs::write(&output, &filled)?;
            log::info!("Wrote {} bytes to {}", filled.len(), output.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            if e.is_validation() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
