//! Kubeit CLI - load, validate and resolve kubeit application resources

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod docker;
mod error;
mod exit_codes;

#[derive(Parser)]
#[command(name = "kubeit")]
#[command(version)]
#[command(about = "Load, validate and resolve kubeit application resources", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate resources from a directory or image
    Validate {
        /// Source URI (file://DIR, docker://IMAGE, or a guessable path/reference)
        #[arg(env = "KUBEIT_SOURCE", default_value = ".")]
        source: String,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve the Helm values of a HelmApplication
    Values {
        /// Source URI
        source: String,

        /// HelmApplication name
        application: String,

        /// NamedValues resources expanded by `type: named` entries, in order
        #[arg(long = "named")]
        named: Vec<String>,

        /// Print the merged values tree instead of --set lines
        #[arg(long)]
        effective: bool,
    },

    /// Print all resources as a multi-document YAML stream
    Export {
        /// Source URI
        #[arg(env = "KUBEIT_SOURCE", default_value = ".")]
        source: String,
    },

    /// Print `docker build` label arguments embedding the resources
    DockerLabels {
        /// Source URI
        #[arg(env = "KUBEIT_SOURCE", default_value = ".")]
        source: String,
    },

    /// Print version information
    Version,
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match cli.command {
        Commands::Validate { source, json } => commands::validate::run(&source, json),

        Commands::Values {
            source,
            application,
            named,
            effective,
        } => commands::values::run(&source, &application, &named, effective),

        Commands::Export { source } => commands::export::run(&source),

        Commands::DockerLabels { source } => commands::docker_labels::run(&source),

        Commands::Version => {
            commands::version::run();
            Ok(())
        }
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
