use clap::Parser;
use ctem::{cli, config, errors};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(!cli.no_color)
            .init();
    }

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            errors::CtemError::Config(_) => 2,
            errors::CtemError::AdapterExhausted { .. } => 3,
            errors::CtemError::Auth(_) => 4,
            errors::CtemError::InvalidRequest(_) => 5,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: cli::Cli) -> Result<(), errors::CtemError> {
    if let cli::Commands::Validate(args) = &cli.command {
        return handle_validate(args).await;
    }

    let config = cli::resolve_config(cli.config.as_deref()).await?;
    match cli.command {
        cli::Commands::Serve(args) => cli::serve::handle_serve(args, config).await,
        cli::Commands::Paths(args) => cli::query::handle_paths(args, config).await,
        cli::Commands::TopVulns(args) => cli::query::handle_top_vulns(args, config).await,
        cli::Commands::Simulate(args) => cli::query::handle_simulate(args, config).await,
        cli::Commands::Hosts(args) => cli::query::handle_hosts(args, config).await,
        cli::Commands::ThreatActors(args) => cli::query::handle_threat_actors(args, config).await,
        cli::Commands::Diagnose(args) => cli::query::handle_diagnose(args, config).await,
        cli::Commands::Validate(_) => Ok(()),
    }
}

async fn handle_validate(args: &cli::commands::ValidateArgs) -> Result<(), errors::CtemError> {
    let path = std::path::PathBuf::from(&args.path);
    let _config = config::parse_config(&path).await?;
    println!("Configuration is valid: {}", args.path);
    Ok(())
}
