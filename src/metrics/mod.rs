// mod.rs - Shift metrics module root

pub mod bit_jaccard;
pub mod cross_correlation;
pub mod hamming;
pub mod registry;
pub mod traits;
pub mod weighted_jaccard;

pub use bit_jaccard::BitJaccard;
pub use cross_correlation::CrossCorrelation;
pub use hamming::Hamming;
pub use registry::MetricRegistry;
pub use traits::{Polarity, ProfileMetric, ShiftMetric};
pub use weighted_jaccard::WeightedJaccard;

/// Metric used when none is configured
pub const DEFAULT_METRIC: &str = BitJaccard::NAME;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry() {
        let registry = MetricRegistry::new();
        assert_eq!(registry.get_metric_names(), vec!["ccp", "exjaccard", "hdp", "jaccard"]);
        assert!(registry.has_metric(DEFAULT_METRIC));
        assert_eq!(
            registry.get_metric("hdp").map(|m| m.polarity()),
            Some(Polarity::LowerIsBetter)
        );
        assert_eq!(registry.list_metrics().len(), 4);
    }

    #[test]
    fn test_unknown_metric_is_configuration_error() {
        let registry = MetricRegistry::new();
        let err = registry.resolve("pearson").err().unwrap();
        assert!(matches!(err, crate::error::SspError::Configuration(_)));
        assert!(err.to_string().contains("exjaccard"));
    }
}
