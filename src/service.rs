//! The operations exposed to the HTTP surface and the CLI, composed from the
//! adapter, graph builder and simulation engine.

use std::collections::BTreeMap;
use std::time::Duration;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::adapter::{CacheEntry, DiagnosticReport, LogicalParams, QueryAdapter, VariantCache, VariantCatalog};
use crate::config::CtemConfig;
use crate::errors::CtemError;
use crate::graph::{tally_vuln_ids, MentionMatcher, AttackGraph, CrownJewelTable, GraphBuilder, LinearChain};
use crate::models::{
    AttackPathRecord, CanonicalPage, Host, Occurrence, OccurrenceExample, OccurrenceSummary,
    SimulationReport, ThreatActor, VulnAdvisory, VulnCount, VulnerabilityDetails,
};
use crate::simulation::{AliasTable, SimulationEngine};
use crate::upstream;

/// Page size used whenever a whole operation is scanned locally.
pub const SCAN_PAGE_SIZE: u32 = 500;
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_TOP_LIMIT: u32 = 50;
pub const THREAT_ACTOR_PAGE_SIZE: u32 = 100;
const SUMMARY_EXAMPLES: usize = 8;

/// Upstream wiring facts safe to show an operator. Never carries the key.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdapterMeta {
    pub graphql_url: Option<String>,
    pub auth_url: Option<String>,
    pub has_api_key: bool,
    pub timeout_secs: u64,
    pub token_ttl_secs: u64,
    pub refresh_margin_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthProbe {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct CtemService {
    adapter: QueryAdapter,
    catalog: VariantCatalog,
    builder: GraphBuilder,
    engine: SimulationEngine,
    meta: AdapterMeta,
}

impl CtemService {
    pub fn new(adapter: QueryAdapter, catalog: VariantCatalog, builder: GraphBuilder, engine: SimulationEngine) -> Self {
        Self { adapter, catalog, builder, engine, meta: AdapterMeta::default() }
    }

    /// Production wiring: reqwest transport, built-in variant catalog, and
    /// crown jewel / alias tables from config on top of the defaults.
    pub fn from_config(config: &CtemConfig) -> Result<Self, CtemError> {
        let upstream = &config.upstream;
        let transport = upstream::connect(upstream)?;
        let adapter = QueryAdapter::new(
            transport,
            VariantCache::new(),
            upstream::attempt_budget(Duration::from_secs(upstream.timeout_secs)),
        );

        let crown_jewels = match &config.graph.crown_jewels {
            Some(patterns) => CrownJewelTable::from_patterns(patterns)?,
            None => CrownJewelTable::default(),
        };
        let aliases = match &config.graph.aliases {
            Some(extra) => AliasTable::default().merged(extra),
            None => AliasTable::default(),
        };

        let meta = AdapterMeta {
            graphql_url: upstream.graphql_url.clone(),
            auth_url: upstream.auth_url.clone(),
            has_api_key: upstream.api_key.is_some(),
            timeout_secs: upstream.timeout_secs,
            token_ttl_secs: upstream.token_ttl_secs,
            refresh_margin_secs: upstream.refresh_margin_secs,
        };

        Ok(Self::new(
            adapter,
            VariantCatalog::builtin(),
            GraphBuilder::new(crown_jewels, Box::new(LinearChain)),
            SimulationEngine::new(aliases),
        )
        .with_meta(meta))
    }

    pub fn with_meta(mut self, meta: AdapterMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn meta(&self) -> &AdapterMeta {
        &self.meta
    }

    pub fn cache_snapshot(&self) -> Vec<CacheEntry> {
        self.adapter.cache().snapshot()
    }

    pub async fn get_page(&self, op_id: &str, page_num: u32, page_size: u32) -> Result<CanonicalPage, CtemError> {
        let params = LogicalParams::for_op(require(op_id, "op_id")?).with_page(page_num, page_size);
        self.adapter.execute(&self.catalog.attack_paths, &params).await
    }

    /// Try every attack-path variant and report each outcome.
    pub async fn diagnose_page(&self, op_id: &str, page_num: u32, page_size: u32) -> Result<DiagnosticReport, CtemError> {
        let params = LogicalParams::for_op(require(op_id, "op_id")?).with_page(page_num, page_size);
        Ok(self.adapter.diagnose(&self.catalog.attack_paths, &params).await)
    }

    /// Upstream top-vulnerability counts. When every variant fails, counts
    /// are derived from identifiers mentioned in attack-path text instead.
    pub async fn get_top_vulnerabilities(&self, op_id: &str, limit: u32) -> Result<Vec<VulnCount>, CtemError> {
        let params = LogicalParams::for_op(require(op_id, "op_id")?).with_limit(limit);

        let mut counts = match self.adapter.execute(&self.catalog.top_vulnerabilities, &params).await {
            Ok(counts) => counts,
            Err(e @ CtemError::AdapterExhausted { .. }) => {
                warn!(op_id = %params.op_id, error = %e, "Top vulnerabilities unavailable, counting from attack paths");
                let records = self.scan(&params.op_id).await?;
                tally_vuln_ids(records.iter().flat_map(|r| r.free_text()))
                    .into_iter()
                    .map(|(id, count)| VulnCount { id, count })
                    .collect()
            }
            Err(e) => return Err(e),
        };

        counts.truncate(limit as usize);
        Ok(counts)
    }

    /// Every attack path mentioning `vuln_id` as a whole word, plus the
    /// advisory when the upstream has one.
    pub async fn get_vulnerability_details(&self, op_id: &str, vuln_id: &str) -> Result<VulnerabilityDetails, CtemError> {
        let op_id = require(op_id, "op_id")?;
        let vuln_id = require(vuln_id, "cve")?.to_uppercase();
        let params = LogicalParams::for_op(op_id).with_vuln(&vuln_id);
        let matcher = MentionMatcher::new(&vuln_id)
            .map_err(|e| CtemError::Internal(format!("Mention pattern for {}: {}", vuln_id, e)))?;

        let (records, advisory) = tokio::join!(
            self.scan(op_id),
            self.adapter.execute(&self.catalog.advisories, &params),
        );
        let records = records?;
        let advisory = advisory.unwrap_or_else(|e| {
            warn!(vuln_id = %vuln_id, error = %e, "Advisory lookup failed");
            VulnAdvisory::unavailable(&vuln_id)
        });

        let occurrences: Vec<Occurrence> = records
            .iter()
            .filter(|r| matcher.is_mentioned_in(&r.text_blob()))
            .map(occurrence)
            .collect();

        let summary = OccurrenceSummary {
            vuln_id: vuln_id.clone(),
            occurrence_count: occurrences.len(),
            examples: occurrences
                .iter()
                .take(SUMMARY_EXAMPLES)
                .map(|o| OccurrenceExample { id: o.id.clone(), title: o.title.clone(), hosts: o.hosts.clone() })
                .collect(),
        };

        Ok(VulnerabilityDetails { summary, occurrences, advisory })
    }

    /// Load the operation's attack paths, build the graph and simulate
    /// remediating `vuln_ids`.
    pub async fn simulate(&self, op_id: &str, vuln_ids: &[String]) -> Result<SimulationReport, CtemError> {
        let graph = self.load_graph(op_id).await?;
        Ok(self.engine.report(&graph, vuln_ids))
    }

    pub async fn load_graph(&self, op_id: &str) -> Result<AttackGraph, CtemError> {
        let records = self.scan(require(op_id, "op_id")?).await?;
        Ok(self.builder.build(&records))
    }

    pub async fn get_hosts(&self, op_id: &str) -> Result<Vec<Host>, CtemError> {
        let params = LogicalParams::for_op(require(op_id, "op_id")?).with_page(1, SCAN_PAGE_SIZE);
        self.adapter.execute(&self.catalog.hosts, &params).await
    }

    pub async fn get_threat_actors_for_host(&self, op_id: &str, host_id: &str) -> Result<Vec<ThreatActor>, CtemError> {
        let params = LogicalParams::for_op(require(op_id, "op_id")?)
            .with_host(require(host_id, "host_id")?)
            .with_page(1, THREAT_ACTOR_PAGE_SIZE);
        self.adapter.execute(&self.catalog.tripwires, &params).await
    }

    /// Mint a token and run the smallest possible query. Reports failure
    /// instead of returning it.
    pub async fn debug_auth(&self) -> AuthProbe {
        match self.adapter.transport().query("query { __typename }", &json!({})).await {
            Ok(data) => {
                info!("Upstream auth probe succeeded");
                AuthProbe {
                    ok: true,
                    typename: data.get("__typename").and_then(|v| v.as_str()).map(str::to_string),
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "Upstream auth probe failed");
                AuthProbe { ok: false, typename: None, error: Some(e.to_string()) }
            }
        }
    }

    /// Variant names per operation in trial order.
    pub fn variant_names(&self) -> BTreeMap<String, Vec<String>> {
        fn names<T>(table: &crate::adapter::VariantTable<T>) -> (String, Vec<String>) {
            (
                table.operation().to_string(),
                table.variants().iter().map(|v| v.name().to_string()).collect(),
            )
        }
        BTreeMap::from([
            names(&self.catalog.attack_paths),
            names(&self.catalog.top_vulnerabilities),
            names(&self.catalog.hosts),
            names(&self.catalog.tripwires),
            names(&self.catalog.advisories),
        ])
    }

    async fn scan(&self, op_id: &str) -> Result<Vec<AttackPathRecord>, CtemError> {
        Ok(self.get_page(op_id, 1, SCAN_PAGE_SIZE).await?.attack_paths)
    }
}

fn require<'a>(value: &'a str, field: &str) -> Result<&'a str, CtemError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CtemError::InvalidRequest(format!("{} required", field)));
    }
    Ok(value)
}

fn occurrence(record: &AttackPathRecord) -> Occurrence {
    Occurrence {
        id: record.id.clone(),
        uuid: record.uuid.clone(),
        title: record.title().map(str::to_string),
        impact_title: record.impact_title.clone(),
        impact_description: record.impact_description.clone(),
        context_score_description: record.context_score_description.clone(),
        context_score_description_md: record.context_score_description_md.clone(),
        hosts: record.host_text.clone().or_else(|| record.host_name.clone()),
        created_at: record.created_at.clone(),
        severity: record.severity.clone(),
        score: record.score,
    }
}
