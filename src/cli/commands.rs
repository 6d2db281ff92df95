use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(name = "ctem", version, about = "Attack path exposure graph and remediation simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// YAML configuration file (falls back to H3_* environment variables)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Fetch one page of attack paths
    Paths(PathsArgs),
    /// List the most frequent vulnerabilities of an operation
    TopVulns(TopVulnsArgs),
    /// Simulate remediating vulnerabilities and report what stays reachable
    Simulate(SimulateArgs),
    /// List hosts of an operation
    Hosts(OperationArgs),
    /// List threat actors observed on a host
    ThreatActors(ThreatActorsArgs),
    /// Try every attack-path query variant and report each outcome
    Diagnose(PathsArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port (overrides config and PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Listen address (overrides config)
    #[arg(long)]
    pub host: Option<String>,
}

#[derive(Args, Clone)]
pub struct OperationArgs {
    /// Operation id
    pub op_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct PathsArgs {
    /// Operation id
    pub op_id: String,

    #[arg(long, default_value = "1")]
    pub page_num: u32,

    #[arg(long, default_value = "100")]
    pub page_size: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct TopVulnsArgs {
    /// Operation id
    pub op_id: String,

    /// Maximum number of entries
    #[arg(short, long, default_value = "50")]
    pub limit: u32,

    /// Show occurrences of one vulnerability instead of the ranking
    #[arg(long)]
    pub details: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct SimulateArgs {
    /// Operation id
    pub op_id: String,

    /// Vulnerability ids to remediate (comma-separated or repeated)
    #[arg(long = "vuln", value_delimiter = ',', required = true)]
    pub vuln_ids: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ThreatActorsArgs {
    /// Operation id
    pub op_id: String,

    /// Host id
    pub host_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Path to YAML config file
    #[arg(value_name = "CONFIG")]
    pub path: String,
}
