use crate::core::store::CoefficientStore;
use crate::domain::model::{Lang, ModuleListItem, ModuleStatsResponse, StatQuery, StatResult};
use crate::utils::error::{Result, StatsError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Accepted range for the quality level `q`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityPolicy {
    pub min: f64,
    pub max: Option<f64>,
}

impl Default for QualityPolicy {
    fn default() -> Self {
        Self { min: 0.0, max: None }
    }
}

impl QualityPolicy {
    pub fn check(&self, q: f64) -> Result<()> {
        if !q.is_finite() {
            return Err(StatsError::validation("q", q, "must be a finite number"));
        }
        if q < self.min {
            return Err(StatsError::validation(
                "q",
                q,
                format!("must be greater than or equal to {}", self.min),
            ));
        }
        if let Some(max) = self.max {
            if q > max {
                return Err(StatsError::validation(
                    "q",
                    q,
                    format!("must be less than or equal to {}", max),
                ));
            }
        }
        Ok(())
    }
}

/// Evaluates module stats against the shared, read-only store.
#[derive(Debug, Clone)]
pub struct StatService {
    store: Arc<CoefficientStore>,
    policy: QualityPolicy,
}

impl StatService {
    pub fn new(store: Arc<CoefficientStore>, policy: QualityPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &CoefficientStore {
        &self.store
    }

    /// `value = a + b * q` for one stat of a module.
    pub fn evaluate(&self, query: &StatQuery) -> Result<StatResult> {
        self.policy.check(query.q)?;

        let definition = self.store.lookup(&query.module)?;
        let (stat, coefficients) = match query.stat.as_deref() {
            Some(stat) => (stat, self.store.coefficients(&query.module, stat)?),
            None => definition
                .sole_stat()
                .map(|(name, c)| (name, *c))
                .ok_or_else(|| {
                    StatsError::validation(
                        "stat",
                        "(missing)",
                        format!(
                            "module '{}' defines several stats, choose one of: {}",
                            query.module,
                            definition.stat_keys().join(", ")
                        ),
                    )
                })?,
        };

        let value = coefficients.evaluate(query.q);
        tracing::debug!(module = %query.module, stat, q = query.q, value, "stat evaluated");

        Ok(StatResult {
            module: query.module.clone(),
            stat: stat.to_string(),
            q: query.q,
            value,
        })
    }

    /// Every stat of a module evaluated with the same quality level.
    pub fn module_stats(&self, module: &str, q: f64, lang: Lang) -> Result<ModuleStatsResponse> {
        self.policy.check(q)?;

        let definition = self.store.lookup(module)?;
        let stats = definition
            .stats
            .iter()
            .map(|(name, coefficients)| (name.clone(), coefficients.evaluate(q)))
            .collect();

        Ok(ModuleStatsResponse {
            module: module.to_string(),
            group: definition.group.clone(),
            module_type: definition.module_type.clone(),
            display_name: definition.display_name(lang),
            percent: q,
            stats,
        })
    }

    pub fn list_modules(&self, lang: Lang) -> Vec<ModuleListItem> {
        self.store
            .iter()
            .map(|(key, definition)| ModuleListItem {
                key: key.to_string(),
                group: definition.group.clone(),
                module_type: definition.module_type.clone(),
                display_name: definition.display_name(lang),
                stat_keys: definition.stat_keys(),
            })
            .collect()
    }
}
