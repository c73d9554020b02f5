use std::path::{Path, PathBuf};

use anyhow::Context;
use blobcluster::html_writer::HtmlWriter;
use blobcluster::io::{FormatRegistry, Writer};
use blobcluster::session::Session;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod server;

/// Cluster-force blob visualization: headless snapshots and an interactive page.
#[derive(Parser)]
#[command(name = "blobcluster")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Simulation config (.yaml, .yml, .json) - used when no subcommand specified
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, global = true, default_value = "output")]
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation headless and write snapshots
    Render {
        /// Simulation config (.yaml, .yml, .json)
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory for snapshots
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Maximum number of ticks to run
        #[arg(short, long, default_value = "300")]
        ticks: usize,

        /// Snapshot formats to write
        #[arg(short, long, value_delimiter = ',', default_values = ["svg", "png", "json"])]
        format: Vec<String>,

        /// Pause before writing, marking one node per cluster
        #[arg(long)]
        paused: bool,
    },
    /// Write the interactive HTML page (default behavior)
    Generate {
        /// Simulation config (.yaml, .yml, .json)
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory for the page
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// wasm-pack output directory to copy next to the page
        #[arg(long)]
        pkg: Option<PathBuf>,
    },
    /// Start development server with hot reload
    Serve {
        /// Simulation config (.yaml, .yml, .json)
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory for the page
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// wasm-pack output directory to copy next to the page
        #[arg(long)]
        pkg: Option<PathBuf>,

        /// Port to run the server on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

fn load(config: &Path) -> anyhow::Result<Session> {
    let registry = FormatRegistry::with_defaults();
    let config = registry
        .read_config(config)
        .with_context(|| format!("reading {}", config.display()))?;
    Ok(Session::new(config)?)
}

fn render(
    config: &Path,
    output: &Path,
    ticks: usize,
    formats: &[String],
    paused: bool,
) -> anyhow::Result<()> {
    let registry = FormatRegistry::with_defaults();
    let writers = formats
        .iter()
        .map(|format| {
            registry
                .writer_for_format(format)
                .ok_or_else(|| anyhow::anyhow!("unsupported output format: {format}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut session = load(config)?;
    let ran = session.run(ticks);
    if paused {
        session.controller_mut().toggle();
    }

    for (writer, format) in writers.iter().zip(formats) {
        writer.write(&session, output)?;
        info!(format = %format, output = %output.display(), "wrote snapshot");
    }
    println!(
        "Rendered {} nodes after {ran} ticks (seed {}) into {}",
        session.controller().state().nodes.len(),
        session.seed(),
        output.display()
    );
    Ok(())
}

fn generate(config: &Path, output: &Path, pkg: Option<&Path>) -> anyhow::Result<()> {
    let session = load(config)?;
    let writer = match pkg {
        Some(pkg) => HtmlWriter::with_pkg(pkg),
        None => HtmlWriter::new(),
    };
    writer.write(&session, output)?;
    println!("Generated page in {}", output.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            config,
            output,
            ticks,
            format,
            paused,
        }) => {
            render(&config, &output, ticks, &format, paused)?;
        }
        Some(Commands::Generate {
            config,
            output,
            pkg,
        }) => {
            generate(&config, &output, pkg.as_deref())?;
        }
        Some(Commands::Serve {
            config,
            output,
            pkg,
            port,
        }) => {
            server::serve(&config, &output, pkg.as_deref(), port).await?;
        }
        None => {
            // Default behavior: generate if a config is provided
            if let Some(config) = cli.config {
                generate(&config, &cli.output, None)?;
            } else {
                println!("blobcluster: no config specified. Use --help for usage.");
            }
        }
    }

    Ok(())
}
