use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Engine counters, registered in their own registry so a host process can
/// merge or scrape them as it sees fit.
pub struct Metrics {
    pub registry: Registry,
    pub computations_total: IntCounterVec,
    pub rejected_samples_total: IntCounter,
    pub violations_total: IntCounter,
}

impl Metrics {
    fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("vitaltrack".into()), None)?;

        let computations_total = IntCounterVec::new(
            Opts::new("computations_total", "AUC engine computations by operation"),
            &["operation"],
        )?;
        let rejected_samples_total = IntCounter::with_opts(Opts::new(
            "rejected_samples_total",
            "Samples dropped as malformed",
        ))?;
        let violations_total = IntCounter::with_opts(Opts::new(
            "violations_total",
            "Threshold violations reported",
        ))?;

        registry.register(Box::new(computations_total.clone()))?;
        registry.register(Box::new(rejected_samples_total.clone()))?;
        registry.register(Box::new(violations_total.clone()))?;

        Ok(Self {
            registry,
            computations_total,
            rejected_samples_total,
            violations_total,
        })
    }
}

// Metric names and labels are constants; construction only fails on invalid names.
static METRICS: Lazy<Metrics> =
    Lazy::new(|| Metrics::new().expect("static metric definitions are valid"));

pub fn metrics() -> &'static Metrics {
    &METRICS
}

pub fn record_computation(operation: &str) {
    METRICS
        .computations_total
        .with_label_values(&[operation])
        .inc();
}

pub fn record_rejected() {
    METRICS.rejected_samples_total.inc();
}

pub fn record_violations(n: usize) {
    METRICS.violations_total.inc_by(n as u64);
}

/// Prometheus text exposition of the engine registry.
pub fn render() -> prometheus::Result<String> {
    let mut buf = Vec::new();
    TextEncoder::new().encode(&METRICS.registry.gather(), &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        record_computation("area");
        record_rejected();
        let text = render().unwrap();
        assert!(text.contains("vitaltrack_computations_total"));
        assert!(text.contains("operation=\"area\""));
        assert!(text.contains("vitaltrack_rejected_samples_total"));
    }
}
