//! kubeadvisor CLI - Kubernetes upgrade impact analysis and planning

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;
mod error;
mod exit_codes;
mod settings;

use error::Result;
use settings::{GlobalOptions, Settings};

#[derive(Parser)]
#[command(name = "kubeadvisor")]
#[command(version)]
#[command(about = "Assess the impact of a Kubernetes upgrade and plan the remediation", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: <config dir>/kubeadvisor/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API deprecation knowledge base (apis.json)
    #[arg(long, global = true, env = "KUBEADVISOR_API_KNOWLEDGE")]
    api_knowledge: Option<PathBuf>,

    /// Chart compatibility knowledge base (chart-matrix.json)
    #[arg(long, global = true, env = "KUBEADVISOR_CHART_KNOWLEDGE")]
    chart_knowledge: Option<PathBuf>,

    /// Directory holding inventory snapshots
    #[arg(long, global = true, env = "KUBEADVISOR_INVENTORY")]
    inventory: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan local manifests into a cluster inventory snapshot
    Scan {
        /// Directory of Kubernetes manifests
        #[arg(short, long)]
        manifests: PathBuf,

        /// Cluster id (default: defaultCluster from config)
        #[arg(short, long)]
        cluster: Option<String>,

        /// Current Kubernetes version of the cluster
        #[arg(long)]
        cluster_version: String,

        /// Display name for the cluster
        #[arg(long)]
        name: Option<String>,

        /// YAML list of deployed Helm releases
        #[arg(long)]
        releases: Option<PathBuf>,
    },

    /// List clusters, or show one cluster's inventory
    List {
        /// Show the full inventory of this cluster
        #[arg(short, long)]
        cluster: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assess upgrade impact and show the remediation plan
    Impact {
        /// Target Kubernetes version
        #[arg(short, long)]
        target: String,

        /// Cluster id (default: defaultCluster from config)
        #[arg(short, long)]
        cluster: Option<String>,

        /// Output the assessment and plan as JSON
        #[arg(long)]
        json: bool,

        /// Show the actions of every plan step
        #[arg(long)]
        actions: bool,
    },

    /// Show only the ordered upgrade plan
    Plan {
        /// Target Kubernetes version
        #[arg(short, long)]
        target: String,

        /// Cluster id (default: defaultCluster from config)
        #[arg(short, long)]
        cluster: Option<String>,

        /// Output the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let options = GlobalOptions {
        config: cli.config,
        api_knowledge: cli.api_knowledge,
        chart_knowledge: cli.chart_knowledge,
        inventory: cli.inventory,
    };
    let settings = Settings::resolve(&options)?;
    tracing::debug!(?settings, "resolved settings");

    match cli.command {
        Commands::Scan {
            manifests,
            cluster,
            cluster_version,
            name,
            releases,
        } => commands::scan::run(
            &settings,
            commands::scan::ScanArgs {
                manifests: &manifests,
                cluster: cluster.as_deref(),
                cluster_version: &cluster_version,
                name: name.as_deref(),
                releases: releases.as_deref(),
            },
        ),

        Commands::List { cluster, json } => {
            commands::list::run(&settings, cluster.as_deref(), json)
        }

        Commands::Impact {
            target,
            cluster,
            json,
            actions,
        } => commands::impact::run(&settings, cluster.as_deref(), &target, json, actions),

        Commands::Plan {
            target,
            cluster,
            json,
        } => commands::plan::run(&settings, cluster.as_deref(), &target, json),
    }
}
