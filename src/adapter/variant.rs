use std::sync::Arc;
use serde::Serialize;
use serde_json::Value;
use crate::errors::CtemError;

/// Tenant-independent arguments of a logical operation. Each variant maps them
/// onto its own argument shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalParams {
    pub op_id: String,
    pub page_num: u32,
    pub page_size: u32,
    pub limit: u32,
    pub host_id: Option<String>,
    pub vuln_id: Option<String>,
}

impl LogicalParams {
    pub fn for_op(op_id: &str) -> Self {
        Self {
            op_id: op_id.to_string(),
            page_num: 1,
            page_size: 100,
            limit: 50,
            host_id: None,
            vuln_id: None,
        }
    }

    pub fn with_page(mut self, page_num: u32, page_size: u32) -> Self {
        self.page_num = page_num;
        self.page_size = page_size;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_host(mut self, host_id: &str) -> Self {
        self.host_id = Some(host_id.to_string());
        self
    }

    pub fn with_vuln(mut self, vuln_id: &str) -> Self {
        self.vuln_id = Some(vuln_id.to_string());
        self
    }
}

/// A concrete request: query document plus variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    pub query: String,
    pub variables: Value,
}

pub type VariablesFn = Arc<dyn Fn(&LogicalParams) -> Value + Send + Sync>;
pub type NormalizeFn<T> = Arc<dyn Fn(&Value, &LogicalParams, &str) -> Result<T, CtemError> + Send + Sync>;

/// One query shape for a logical operation, with its response mapping.
pub struct QueryVariant<T> {
    name: String,
    query: String,
    variables: VariablesFn,
    normalize: NormalizeFn<T>,
}

impl<T> Clone for QueryVariant<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            query: self.query.clone(),
            variables: self.variables.clone(),
            normalize: self.normalize.clone(),
        }
    }
}

impl<T> std::fmt::Debug for QueryVariant<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryVariant").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<T> QueryVariant<T> {
    pub fn new<V, N>(name: &str, query: &str, variables: V, normalize: N) -> Self
    where
        V: Fn(&LogicalParams) -> Value + Send + Sync + 'static,
        N: Fn(&Value, &LogicalParams, &str) -> Result<T, CtemError> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            query: query.to_string(),
            variables: Arc::new(variables),
            normalize: Arc::new(normalize),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn request(&self, params: &LogicalParams) -> QuerySpec {
        QuerySpec {
            query: self.query.clone(),
            variables: (self.variables)(params),
        }
    }

    pub fn normalize(&self, data: &Value, params: &LogicalParams) -> Result<T, CtemError> {
        (self.normalize)(data, params, &self.name)
    }
}

/// Ordered variant list for one logical operation. Order is fallback priority.
pub struct VariantTable<T> {
    operation: String,
    variants: Vec<QueryVariant<T>>,
}

impl<T> Clone for VariantTable<T> {
    fn clone(&self) -> Self {
        Self { operation: self.operation.clone(), variants: self.variants.clone() }
    }
}

impl<T> VariantTable<T> {
    pub fn new(operation: &str) -> Self {
        Self { operation: operation.to_string(), variants: Vec::new() }
    }

    pub fn with(mut self, variant: QueryVariant<T>) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn variants(&self) -> &[QueryVariant<T>] {
        &self.variants
    }

    pub fn get(&self, name: &str) -> Option<&QueryVariant<T>> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
