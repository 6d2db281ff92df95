use std::sync::Arc;
use std::time::Duration;
use serde::Serialize;
use crate::errors::{CtemError, VariantAttempt};
use crate::upstream::Transport;
use super::cache::VariantCache;
use super::variant::{LogicalParams, QueryVariant, VariantTable};
use tracing::{debug, info, warn};

/// Per-variant outcome of a diagnostic run.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    #[serde(rename = "_diagnostic")]
    pub diagnostic: bool,
    pub operation: String,
    pub tried: Vec<VariantAttempt>,
}

impl DiagnosticReport {
    pub fn first_success(&self) -> Option<&str> {
        self.tried.iter().find(|t| t.ok).map(|t| t.variant.as_str())
    }
}

/// Runs logical operations against the upstream by negotiating, once per
/// operation, which query variant this tenant accepts.
pub struct QueryAdapter {
    transport: Arc<dyn Transport>,
    cache: VariantCache,
    call_timeout: Duration,
}

impl QueryAdapter {
    pub fn new(transport: Arc<dyn Transport>, cache: VariantCache, call_timeout: Duration) -> Self {
        Self { transport, cache, call_timeout }
    }

    pub fn cache(&self) -> &VariantCache {
        &self.cache
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Execute `table`'s operation. A cached variant is tried alone and its
    /// failure is returned as is; otherwise variants are tried in order until
    /// one succeeds, and that one is cached.
    pub async fn execute<T>(&self, table: &VariantTable<T>, params: &LogicalParams) -> Result<T, CtemError> {
        let operation = table.operation();

        if let Some(name) = self.cache.get(operation) {
            match table.get(&name) {
                Some(variant) => {
                    debug!(operation, variant = %name, "Using cached variant");
                    return self.attempt(variant, params).await.map_err(|e| {
                        warn!(operation, variant = %name, error = %e, "Cached variant failed");
                        e
                    });
                }
                None => {
                    warn!(operation, variant = %name, "Cached variant no longer registered, rediscovering");
                }
            }
        }

        if table.is_empty() {
            return Err(CtemError::UnknownOperation(operation.to_string()));
        }

        let mut tried = Vec::with_capacity(table.variants().len());
        let mut last_error = None;

        for variant in table.variants() {
            match self.attempt(variant, params).await {
                Ok(output) => {
                    self.cache.record(operation, variant.name());
                    info!(operation, variant = variant.name(), attempts = tried.len() + 1, "Variant accepted");
                    return Ok(output);
                }
                Err(e) => {
                    let classification = e.classify();
                    warn!(
                        operation,
                        variant = variant.name(),
                        error_type = classification.error_type,
                        error = %e,
                        "Variant failed"
                    );
                    if !classification.falls_through {
                        return Err(e);
                    }
                    tried.push(VariantAttempt::failed(variant.name(), &e));
                    last_error = Some(e);
                }
            }
        }

        let last = last_error
            .unwrap_or_else(|| CtemError::Internal("Variant loop exited without an error".into()));
        Err(CtemError::AdapterExhausted {
            operation: operation.to_string(),
            last: Box::new(last),
            tried,
        })
    }

    /// Try every variant of `table` and report each outcome. Never fails and
    /// leaves the cache untouched.
    pub async fn diagnose<T>(&self, table: &VariantTable<T>, params: &LogicalParams) -> DiagnosticReport {
        let attempts = table.variants().iter().map(|variant| async move {
            match self.attempt(variant, params).await {
                Ok(_) => VariantAttempt::succeeded(variant.name()),
                Err(e) => VariantAttempt::failed(variant.name(), &e),
            }
        });
        let tried = futures::future::join_all(attempts).await;

        info!(
            operation = table.operation(),
            ok = tried.iter().filter(|t| t.ok).count(),
            total = tried.len(),
            "Diagnostic run finished"
        );

        DiagnosticReport {
            diagnostic: true,
            operation: table.operation().to_string(),
            tried,
        }
    }

    async fn attempt<T>(&self, variant: &QueryVariant<T>, params: &LogicalParams) -> Result<T, CtemError> {
        let spec = variant.request(params);
        let data = tokio::time::timeout(self.call_timeout, self.transport.query(&spec.query, &spec.variables))
            .await
            .map_err(|_| CtemError::Timeout(format!(
                "{} exceeded {}s", variant.name(), self.call_timeout.as_secs_f64()
            )))??;
        variant.normalize(&data, params)
    }
}
