use serde::Serialize;
use crate::cli::commands::{OperationArgs, PathsArgs, SimulateArgs, ThreatActorsArgs, TopVulnsArgs};
use crate::config::CtemConfig;
use crate::errors::CtemError;
use crate::service::CtemService;
use tracing::info;

fn print_json<T: Serialize>(value: &T) -> Result<(), CtemError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

pub async fn handle_paths(args: PathsArgs, config: CtemConfig) -> Result<(), CtemError> {
    let service = CtemService::from_config(&config)?;
    let page = service.get_page(&args.op_id, args.page_num, args.page_size).await?;
    info!(variant = %page.page_info.variant, records = page.attack_paths.len(), "Attack paths fetched");

    if args.json {
        return print_json(&page);
    }
    println!(
        "Page {} ({} per page) via {}",
        page.page_info.page_num, page.page_info.page_size, page.page_info.variant
    );
    for record in &page.attack_paths {
        println!(
            "  {:<38} {:<9} {:<20} {}",
            record.id,
            or_dash(record.severity.as_deref()),
            or_dash(record.host_name.as_deref()),
            or_dash(record.title()),
        );
    }
    Ok(())
}

pub async fn handle_top_vulns(args: TopVulnsArgs, config: CtemConfig) -> Result<(), CtemError> {
    let service = CtemService::from_config(&config)?;

    if let Some(vuln_id) = args.details.as_deref() {
        let details = service.get_vulnerability_details(&args.op_id, vuln_id).await?;
        if args.json {
            return print_json(&details);
        }
        println!("{}: {}", details.advisory.id, details.advisory.title);
        println!("Occurrences: {}", details.summary.occurrence_count);
        for example in &details.summary.examples {
            println!("  {} {}", example.id, or_dash(example.title.as_deref()));
        }
        return Ok(());
    }

    let counts = service.get_top_vulnerabilities(&args.op_id, args.limit).await?;
    if args.json {
        return print_json(&counts);
    }
    for entry in &counts {
        println!("  {:<20} {}", entry.id, entry.count);
    }
    Ok(())
}

pub async fn handle_simulate(args: SimulateArgs, config: CtemConfig) -> Result<(), CtemError> {
    let service = CtemService::from_config(&config)?;
    let report = service.simulate(&args.op_id, &args.vuln_ids).await?;

    if args.json {
        return print_json(&report);
    }
    let result = &report.result;
    println!(
        "Disrupted {}/{} attack paths ({}% reduction)",
        result.paths_disrupted, result.paths_total, result.percent_reduction
    );
    println!("Entry: {}", or_dash(report.reachability.entry.as_deref()));
    println!("Reachable: {}", report.reachability.reachable.len());
    for (id, connected) in &report.reachability.crown_jewels {
        println!("  crown jewel {} {}", id, if *connected { "CONNECTED" } else { "disconnected" });
    }
    if !report.chain.is_empty() {
        println!("Chain: {}", report.chain.join(" -> "));
    }
    Ok(())
}

pub async fn handle_hosts(args: OperationArgs, config: CtemConfig) -> Result<(), CtemError> {
    let service = CtemService::from_config(&config)?;
    let hosts = service.get_hosts(&args.op_id).await?;

    if args.json {
        return print_json(&hosts);
    }
    for host in &hosts {
        println!("  {:<38} {:<30} {}", host.id, or_dash(host.hostname.as_deref()), or_dash(host.ip.as_deref()));
    }
    Ok(())
}

pub async fn handle_threat_actors(args: ThreatActorsArgs, config: CtemConfig) -> Result<(), CtemError> {
    let service = CtemService::from_config(&config)?;
    let actors = service.get_threat_actors_for_host(&args.op_id, &args.host_id).await?;

    if args.json {
        return print_json(&actors);
    }
    for actor in &actors {
        println!(
            "  {:<24} {:<8} {:<12} {}",
            actor.actor,
            actor.severity,
            or_dash(actor.technique.as_deref()),
            or_dash(actor.last_seen.as_deref()),
        );
    }
    Ok(())
}

pub async fn handle_diagnose(args: PathsArgs, config: CtemConfig) -> Result<(), CtemError> {
    let service = CtemService::from_config(&config)?;
    let report = service.diagnose_page(&args.op_id, args.page_num, args.page_size).await?;

    if args.json {
        return print_json(&report);
    }
    for attempt in &report.tried {
        let outcome = if attempt.ok { "ok".to_string() } else { or_dash(attempt.error.as_deref()).to_string() };
        println!("  {:<55} {}", attempt.variant, outcome);
    }
    match report.first_success() {
        Some(name) => println!("First working variant: {}", name),
        None => println!("No variant succeeded"),
    }
    Ok(())
}
