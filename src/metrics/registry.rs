// registry.rs - Metric registry for name-based selection

use super::traits::ProfileMetric;
use super::{BitJaccard, CrossCorrelation, Hamming, WeightedJaccard};
use crate::error::{Result, SspError};
use std::collections::BTreeMap;

/// Available shift metrics keyed by tag
pub struct MetricRegistry {
    metrics: BTreeMap<&'static str, Box<dyn ProfileMetric>>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            metrics: BTreeMap::new(),
        };

        registry.register_metric(Box::new(WeightedJaccard));
        registry.register_metric(Box::new(BitJaccard));
        registry.register_metric(Box::new(CrossCorrelation));
        registry.register_metric(Box::new(Hamming));

        registry
    }

    pub fn register_metric(&mut self, metric: Box<dyn ProfileMetric>) {
        self.metrics.insert(metric.name(), metric);
    }

    pub fn get_metric(&self, name: &str) -> Option<&dyn ProfileMetric> {
        self.metrics.get(name).map(|m| m.as_ref())
    }

    pub fn has_metric(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }

    /// Look up `name`, failing with a configuration error listing the
    /// known tags
    pub fn resolve(&self, name: &str) -> Result<&dyn ProfileMetric> {
        self.get_metric(name).ok_or_else(|| {
            SspError::Configuration(format!(
                "Unknown metric '{}'. Available: {}",
                name,
                self.get_metric_names().join(", ")
            ))
        })
    }

    /// (tag, description) pairs in tag order
    pub fn list_metrics(&self) -> Vec<(&str, &str)> {
        self.metrics
            .values()
            .map(|m| (m.name(), m.description()))
            .collect()
    }

    pub fn get_metric_names(&self) -> Vec<&str> {
        self.metrics.keys().copied().collect()
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}
