use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use ttn_metadata::config::{self, OutputFormat};
use ttn_metadata::{envelope, PacketMetadata};

#[derive(Parser)]
#[command(name = "ttn-metadata")]
#[command(about = "Decode and inspect The Things Network packet metadata")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// JSON pointer to the metadata object (e.g. "/metadata")
    #[arg(short, long)]
    pointer: Option<String>,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Input files; reads stdin when empty or "-"
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config from {:?}: {}", cli.config, e);
        eprintln!("Using default configuration");
        config::Config::default()
    });

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let pointer = cli.pointer.or(config.input.pointer);
    let format = cli.format.unwrap_or(config.output.format);

    debug!(
        "ttn-metadata v{} (pointer: {:?}, format: {})",
        ttn_metadata::VERSION,
        pointer,
        format
    );

    let inputs = if cli.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        cli.files
    };

    let mut failed = 0usize;
    for input in &inputs {
        let result = read_input(input)
            .and_then(|payload| envelope::extract(&payload, pointer.as_deref()))
            .and_then(|meta| report(input, &meta, format));

        if let Err(e) = result {
            error!("{}: {:#}", input.display(), e);
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(anyhow::anyhow!(
            "{} of {} input(s) could not be decoded",
            failed,
            inputs.len()
        ));
    }

    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        return Ok(buf);
    }

    std::fs::read(path).map_err(|e| anyhow::anyhow!("Failed to read {:?}: {}", path, e))
}

fn report(input: &Path, meta: &PacketMetadata, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Summary => {
            info!("{}: {}", input.display(), meta);
            match meta.gateways() {
                Some(gateways) => {
                    for gateway in gateways {
                        info!("  {}", gateway);
                    }
                }
                None => info!("  no gateway information"),
            }
        }
        OutputFormat::Json => println!("{}", meta.to_json()?),
        OutputFormat::Pretty => println!("{}", serde_json::to_string_pretty(meta)?),
    }
    Ok(())
}
