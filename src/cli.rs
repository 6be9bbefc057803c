use breakeven::comparison::{DomainSpec, InstanceSelector, ProviderSelection, Scale};
use breakeven::pricing::{PricingCatalog, ProviderId};
use breakeven::WorkloadInput;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "breakeven",
    version,
    about = "Serverless vs. always-on instance cost comparison"
)]
pub struct Cli {
    /// Configuration file path (optional)
    #[arg(short, long, default_value = "breakeven.toml", global = true)]
    pub config: PathBuf,

    /// Pricing override file, replaces `catalog.path`
    #[arg(long, global = true)]
    pub pricing: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sweep a range of monthly volumes and locate break-even points (default)
    Compare(CompareArgs),

    /// Cost breakdown of each offering at a single monthly volume
    Cost(CostArgs),

    /// List the pricing catalog
    Catalog {
        /// Only show this provider
        #[arg(short, long)]
        provider: Option<ProviderId>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,

    /// Validate configuration file and pricing tables
    Validate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Workload flags; anything unset keeps the configured value
#[derive(Args, Debug, Clone, Default)]
pub struct WorkloadArgs {
    /// Function memory in MB
    #[arg(short, long)]
    pub memory_mb: Option<u32>,

    /// Execution time per invocation in seconds
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Monthly invocation count
    #[arg(short, long)]
    pub invocations: Option<u64>,

    /// Response size per request in KB
    #[arg(long)]
    pub egress_kb: Option<f64>,

    /// Share of egress bound for the internet, 0-100
    #[arg(long)]
    pub transfer_ratio: Option<f64>,

    /// Local currency units per USD
    #[arg(long)]
    pub exchange_rate: Option<f64>,
}

impl WorkloadArgs {
    pub fn apply(&self, mut input: WorkloadInput) -> WorkloadInput {
        if let Some(memory_mb) = self.memory_mb {
            input.memory_mb = memory_mb;
        }
        if let Some(duration) = self.duration {
            input.duration_seconds = duration;
        }
        if let Some(invocations) = self.invocations {
            input.monthly_invocations = invocations;
        }
        if let Some(egress_kb) = self.egress_kb {
            input.egress_kb_per_request = egress_kb;
        }
        if let Some(ratio) = self.transfer_ratio {
            input.internet_transfer_ratio_percent = ratio;
        }
        if let Some(rate) = self.exchange_rate {
            input.exchange_rate = rate;
        }
        input
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Serverless providers, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub serverless: Vec<ProviderId>,

    /// Instance offers as provider/instance_type, comma separated
    #[arg(long = "instance", value_delimiter = ',')]
    pub instances: Vec<InstanceSelector>,
}

impl SelectionArgs {
    /// Flags first, then the configured lists, then the whole catalog;
    /// each side falls back on its own
    pub fn resolve(&self, configured: &ProviderSelection, catalog: &PricingCatalog) -> ProviderSelection {
        let all = ProviderSelection::all(catalog);
        ProviderSelection {
            serverless: pick(&self.serverless, &configured.serverless, all.serverless),
            instances: pick(&self.instances, &configured.instances, all.instances),
        }
    }
}

fn pick<T: Clone>(flags: &[T], configured: &[T], all: Vec<T>) -> Vec<T> {
    if !flags.is_empty() {
        flags.to_vec()
    } else if !configured.is_empty() {
        configured.to_vec()
    } else {
        all
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct CompareArgs {
    #[command(flatten)]
    pub workload: WorkloadArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Lowest monthly volume of the sweep
    #[arg(long)]
    pub min: Option<u64>,

    /// Highest monthly volume of the sweep
    #[arg(long)]
    pub max: Option<u64>,

    /// Number of sample points
    #[arg(long, conflicts_with = "step")]
    pub points: Option<usize>,

    /// Fixed distance between sample points
    #[arg(long)]
    pub step: Option<u64>,

    /// Sample spacing: linear or log
    #[arg(long)]
    pub scale: Option<Scale>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl CompareArgs {
    pub fn domain(&self, base: &DomainSpec) -> DomainSpec {
        let mut spec = base.clone();
        if let Some(min) = self.min {
            spec.min = min;
        }
        if let Some(max) = self.max {
            spec.max = max;
        }
        if let Some(points) = self.points {
            spec.points = Some(points);
            spec.step = None;
        }
        if let Some(step) = self.step {
            spec.step = Some(step);
            spec.points = None;
        }
        if let Some(scale) = self.scale {
            spec.scale = scale;
        }
        spec
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct CostArgs {
    #[command(flatten)]
    pub workload: WorkloadArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl Cli {
    /// Get the command to execute, defaulting to Compare if none provided
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Compare(CompareArgs::default()))
    }
}
