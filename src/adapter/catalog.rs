//! Built-in variant tables for the upstream operations this crate consumes.
//!
//! Each table lists every argument and response shape seen across tenants, in
//! the order they are tried. Tenants with yet another shape can swap a table on
//! [`VariantCatalog`] without touching the adapter.

use serde_json::{json, Value};
use crate::models::{CanonicalPage, Host, ThreatActor, VulnAdvisory, VulnCount};
use crate::normalize::{
    list_at, normalize_advisory, normalize_hosts, normalize_page, normalize_tripwires,
    normalize_vuln_counts, PageShape,
};
use crate::normalize::page::required;
use super::variant::{LogicalParams, QueryVariant, VariantTable};

pub const ATTACK_PATHS_PAGE: &str = "attack_paths_page";
pub const TOP_VULNERABILITIES: &str = "top_vulnerabilities";
pub const HOSTS_PAGE: &str = "hosts_page";
pub const TRIPWIRES_PAGE: &str = "tripwires_page";
pub const VULN_ADVISORY: &str = "cve_details";

#[derive(Clone)]
pub struct VariantCatalog {
    pub attack_paths: VariantTable<CanonicalPage>,
    pub top_vulnerabilities: VariantTable<Vec<VulnCount>>,
    pub hosts: VariantTable<Vec<Host>>,
    pub tripwires: VariantTable<Vec<ThreatActor>>,
    pub advisories: VariantTable<VulnAdvisory>,
}

impl Default for VariantCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl VariantCatalog {
    pub fn builtin() -> Self {
        Self {
            attack_paths: attack_path_variants(),
            top_vulnerabilities: top_vulnerability_variants(),
            hosts: host_variants(),
            tripwires: tripwire_variants(),
            advisories: advisory_variants(),
        }
    }

    pub fn with_attack_paths(mut self, table: VariantTable<CanonicalPage>) -> Self {
        self.attack_paths = table;
        self
    }

    pub fn with_top_vulnerabilities(mut self, table: VariantTable<Vec<VulnCount>>) -> Self {
        self.top_vulnerabilities = table;
        self
    }

    pub fn with_hosts(mut self, table: VariantTable<Vec<Host>>) -> Self {
        self.hosts = table;
        self
    }

    pub fn with_tripwires(mut self, table: VariantTable<Vec<ThreatActor>>) -> Self {
        self.tripwires = table;
        self
    }

    pub fn with_advisories(mut self, table: VariantTable<VulnAdvisory>) -> Self {
        self.advisories = table;
        self
    }
}

fn op_input(p: &LogicalParams) -> Value {
    json!({ "op_id": p.op_id })
}

fn page_input(p: &LogicalParams) -> Value {
    json!({ "page_num": p.page_num, "page_size": p.page_size })
}

fn page_variant(name: &str, query: &str, variables: fn(&LogicalParams) -> Value, shape: PageShape) -> QueryVariant<CanonicalPage> {
    QueryVariant::new(name, query, variables, move |data: &Value, params: &LogicalParams, variant: &str| {
        normalize_page(data, &shape, params, variant)
    })
}

const LEAN_PATH_FIELDS: &str = "
              id
              uuid
              name
              attack_path_title
              host_name
              severity
              score";

pub fn attack_path_variants() -> VariantTable<CanonicalPage> {
    let paged = PageShape::paged("attack_paths_page", "attack_paths");

    VariantTable::new(ATTACK_PATHS_PAGE)
        .with(page_variant(
            "v1_attack_paths_page_input_page_input",
            "query ($input: OpInput!, $page_input: PageInput) {
          attack_paths_page(input: $input, page_input: $page_input) {
            page_info { page_num page_size has_next total }
            attack_paths {
              id
              uuid
              name
              attack_path_title
              host_name
              host_text
              severity
              score
              impact_description
              context_score_description
              context_score_description_md
              nodes { id type label host { id ip hostname } }
              edges { id from_id to_id label technique_id }
            }
          }
        }",
            |p| json!({ "input": op_input(p), "page_input": page_input(p) }),
            paged,
        ))
        .with(page_variant(
            "v2_attack_paths_page_input_page_input_lean",
            &format!(
                "query ($input: OpInput!, $page_input: PageInput) {{
          attack_paths_page(input: $input, page_input: $page_input) {{
            page_info {{ page_num page_size }}
            attack_paths {{{}
            }}
          }}
        }}",
                LEAN_PATH_FIELDS
            ),
            |p| json!({ "input": op_input(p), "page_input": page_input(p) }),
            paged,
        ))
        .with(page_variant(
            "v3_attack_paths_page_op_id_page_input",
            &format!(
                "query ($op_id: UUID!, $page_input: PageInput) {{
          attack_paths_page(op_id: $op_id, page_input: $page_input) {{
            items {{{}
            }}
          }}
        }}",
                LEAN_PATH_FIELDS
            ),
            |p| json!({ "op_id": p.op_id, "page_input": page_input(p) }),
            PageShape::paged("attack_paths_page", "items"),
        ))
        .with(page_variant(
            "v4_attack_paths_page_input_page",
            &format!(
                "query ($input: OpInput!, $page: PageInput) {{
          attack_paths_page(input: $input, page: $page) {{
            page_info {{ page_num page_size }}
            attack_paths {{{}
            }}
          }}
        }}",
                LEAN_PATH_FIELDS
            ),
            |p| json!({ "input": op_input(p), "page": page_input(p) }),
            paged,
        ))
        .with(page_variant(
            "v5_attack_paths_no_page",
            "query ($input: OpInput!) {
          attack_paths(input: $input) {
            id
            uuid
            name
            attack_path_title
            host_name
            severity
            score
            impact_description
            context_score_description
            context_score_description_md
          }
        }",
            |p| json!({ "input": op_input(p) }),
            PageShape::list("attack_paths"),
        ))
        .with(page_variant(
            "v6_attack_paths_page_operation_id_in_input",
            &format!(
                "query ($input: OpInput!, $page_input: PageInput) {{
          attack_paths_page(input: $input, page_input: $page_input) {{
            page_info {{ page_num page_size }}
            attack_paths {{{}
            }}
          }}
        }}",
                LEAN_PATH_FIELDS
            ),
            |p| json!({ "input": { "operation_id": p.op_id }, "page_input": page_input(p) }),
            paged,
        ))
        .with(page_variant(
            "v7_operation_attack_paths_page_operation_id_page_input",
            &format!(
                "query ($operation_id: UUID!, $page_input: PageInput) {{
          operation_attack_paths_page(operation_id: $operation_id, page_input: $page_input) {{
            page_info {{ page_num page_size }}
            attack_paths {{{}
            }}
          }}
        }}",
                LEAN_PATH_FIELDS
            ),
            |p| json!({ "operation_id": p.op_id, "page_input": page_input(p) }),
            PageShape::paged("operation_attack_paths_page", "attack_paths"),
        ))
        // Minimal shape for tenants without `id` on paths or `has_next`/`total` on PageInfo.
        .with(page_variant(
            "v8_attack_paths_page_minimal_no_id",
            "query ($input: OpInput!, $page_input: PageInput) {
          attack_paths_page(input: $input, page_input: $page_input) {
            page_info { page_num page_size }
            attack_paths {
              uuid
              name
              attack_path_title
              host_name
              severity
              score
              impact_description
              context_score_description
              context_score_description_md
              ip
            }
          }
        }",
            |p| json!({ "input": op_input(p), "page_input": page_input(p) }),
            paged,
        ))
}

pub fn top_vulnerability_variants() -> VariantTable<Vec<VulnCount>> {
    VariantTable::new(TOP_VULNERABILITIES)
        .with(QueryVariant::new(
            "v1_top_cves",
            "query top_cves($input: OpInput!, $limit: Int) {
          top_cves(input: $input, limit: $limit) { cve count }
        }",
            |p| json!({ "input": op_input(p), "limit": p.limit }),
            |data: &Value, _: &LogicalParams, _: &str| Ok(normalize_vuln_counts(list_at(data, &["top_cves"])?, "cve")),
        ))
        .with(QueryVariant::new(
            "v2_top_weaknesses",
            "query top_weaknesses($input: OpInput!, $limit: Int) {
          top_weaknesses(input: $input, limit: $limit) { weakness_id count }
        }",
            |p| json!({ "input": op_input(p), "limit": p.limit }),
            |data: &Value, _: &LogicalParams, _: &str| {
                Ok(normalize_vuln_counts(list_at(data, &["top_weaknesses"])?, "weakness_id"))
            },
        ))
}

pub fn host_variants() -> VariantTable<Vec<Host>> {
    VariantTable::new(HOSTS_PAGE)
        .with(QueryVariant::new(
            "v1_hosts_page",
            "query hosts_page($input: OpInput!, $page_input: PageInput) {
          hosts_page(input: $input, page_input: $page_input) {
            page_info { page_num page_size }
            hosts { id hostname ip }
          }
        }",
            |p| json!({ "input": op_input(p), "page_input": page_input(p) }),
            |data: &Value, _: &LogicalParams, _: &str| Ok(normalize_hosts(list_at(data, &["hosts_page", "hosts"])?)),
        ))
        .with(QueryVariant::new(
            "v2_legacy",
            "query hosts_page($op_id: UUID!, $page_input: PageInput) {
          hosts_page(op_id: $op_id, page_input: $page_input) {
            items { id hostname ip }
          }
        }",
            |p| json!({ "op_id": p.op_id, "page_input": page_input(p) }),
            |data: &Value, _: &LogicalParams, _: &str| Ok(normalize_hosts(list_at(data, &["hosts_page", "items"])?)),
        ))
}

pub fn tripwire_variants() -> VariantTable<Vec<ThreatActor>> {
    VariantTable::new(TRIPWIRES_PAGE)
        .with(QueryVariant::new(
            "v1_tripwires",
            "query tripwires_page($input: OpInput!, $filter_input: TripwireFilterInput, $page_input: PageInput) {
          tripwires_page(input: $input, filter_input: $filter_input, page_input: $page_input) {
            tripwires {
              id created_at severity actor rule_name technique_id description
              host { id hostname ip }
            }
          }
        }",
            |p| json!({
                "input": op_input(p),
                "filter_input": { "host_id": p.host_id },
                "page_input": page_input(p),
            }),
            |data: &Value, _: &LogicalParams, _: &str| {
                Ok(normalize_tripwires(list_at(data, &["tripwires_page", "tripwires"])?))
            },
        ))
        .with(QueryVariant::new(
            "v2_legacy",
            "query tripwires_page($op_id: UUID!, $filters: TripwiresFilters, $page: PageInput) {
          tripwires_page(op_id: $op_id, filters: $filters, page: $page) {
            items {
              id created_at severity actor rule_name technique_id description
              host { id hostname ip }
            }
          }
        }",
            |p| json!({
                "op_id": p.op_id,
                "filters": { "host_id": p.host_id },
                "page": page_input(p),
            }),
            |data: &Value, _: &LogicalParams, _: &str| {
                Ok(normalize_tripwires(list_at(data, &["tripwires_page", "items"])?))
            },
        ))
}

pub fn advisory_variants() -> VariantTable<VulnAdvisory> {
    VariantTable::new(VULN_ADVISORY)
        .with(QueryVariant::new(
            "v1_cve_details",
            "query cve_details($input: OpInput!, $cve: String!) {
          cve_details(input: $input, cve: $cve) {
            cve title description cvss references
          }
        }",
            |p| json!({ "input": op_input(p), "cve": p.vuln_id }),
            |data: &Value, params: &LogicalParams, _: &str| {
                let raw = required(data, "cve_details")?;
                Ok(normalize_advisory(raw, params.vuln_id.as_deref().unwrap_or_default()))
            },
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_path_variant_order() {
        let table = attack_path_variants();
        let names: Vec<&str> = table.variants().iter().map(|v| v.name()).collect();
        assert_eq!(names.len(), 8);
        assert_eq!(names[0], "v1_attack_paths_page_input_page_input");
        assert_eq!(names[7], "v8_attack_paths_page_minimal_no_id");
    }

    #[test]
    fn test_variant_argument_shapes() {
        let params = LogicalParams::for_op("op-1").with_page(2, 10);
        let table = attack_path_variants();

        let v3 = table.get("v3_attack_paths_page_op_id_page_input").unwrap().request(&params);
        assert_eq!(v3.variables, json!({"op_id": "op-1", "page_input": {"page_num": 2, "page_size": 10}}));

        let v6 = table.get("v6_attack_paths_page_operation_id_in_input").unwrap().request(&params);
        assert_eq!(v6.variables["input"], json!({"operation_id": "op-1"}));

        let v5 = table.get("v5_attack_paths_no_page").unwrap().request(&params);
        assert!(v5.variables.get("page_input").is_none());
        assert!(v5.query.contains("attack_paths(input: $input)"));
    }

    #[test]
    fn test_lean_queries_are_well_formed() {
        let table = attack_path_variants();
        for variant in table.variants() {
            let q = variant.request(&LogicalParams::for_op("x")).query;
            assert_eq!(q.matches('{').count(), q.matches('}').count(), "{}", variant.name());
        }
    }

    #[test]
    fn test_v7_normalizes_operation_root() {
        let table = attack_path_variants();
        let variant = table.get("v7_operation_attack_paths_page_operation_id_page_input").unwrap();
        let data = json!({"operation_attack_paths_page": {"attack_paths": [{"id": "a"}]}});
        let page = variant.normalize(&data, &LogicalParams::for_op("x")).unwrap();
        assert_eq!(page.page_info.variant, "v7_operation_attack_paths_page_operation_id_page_input");
        assert_eq!(page.attack_paths[0].id, "a");
    }

    #[test]
    fn test_tripwire_filter_carries_host() {
        let params = LogicalParams::for_op("op").with_host("h-7");
        let table = tripwire_variants();
        let spec = table.variants()[1].request(&params);
        assert_eq!(spec.variables["filters"]["host_id"], "h-7");
    }

    #[test]
    fn test_advisory_requires_root() {
        let table = advisory_variants();
        let params = LogicalParams::for_op("op").with_vuln("CVE-2017-0144");
        assert!(table.variants()[0].normalize(&json!({}), &params).is_err());
        let advisory = table.variants()[0]
            .normalize(&json!({"cve_details": {"title": "EternalBlue"}}), &params)
            .unwrap();
        assert_eq!(advisory.id, "CVE-2017-0144");
        assert_eq!(advisory.title, "EternalBlue");
    }

    #[test]
    fn test_builtin_operation_names() {
        let catalog = VariantCatalog::builtin();
        assert_eq!(catalog.attack_paths.operation(), ATTACK_PATHS_PAGE);
        assert_eq!(catalog.top_vulnerabilities.operation(), TOP_VULNERABILITIES);
        assert_eq!(catalog.hosts.operation(), HOSTS_PAGE);
        assert_eq!(catalog.tripwires.operation(), TRIPWIRES_PAGE);
        assert_eq!(catalog.advisories.operation(), VULN_ADVISORY);
    }
}
