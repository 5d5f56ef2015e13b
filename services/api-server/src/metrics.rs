use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Operation counters, labelled by collection, operation and outcome.
pub struct Metrics {
    registry: Registry,
    operations: IntCounterVec,
}

impl Metrics {
    pub fn new(namespace: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let operations = IntCounterVec::new(
            Opts::new("record_operations_total", "Record operations handled")
                .namespace(namespace.to_string()),
            &["collection", "operation", "outcome"],
        )?;
        registry.register(Box::new(operations.clone()))?;

        Ok(Self {
            registry,
            operations,
        })
    }

    pub fn record(&self, collection: &str, operation: &str, status: u16) {
        let outcome = match status {
            200..=299 => "success",
            400..=499 => "client_error",
            _ => "server_error",
        };
        self.operations
            .with_label_values(&[collection, operation, outcome])
            .inc();
    }

    pub fn count(&self, collection: &str, operation: &str, outcome: &str) -> u64 {
        self.operations
            .with_label_values(&[collection, operation, outcome])
            .get()
    }

    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::error!(error = %e, "Failed to encode metrics");
            return "Error encoding metrics".to_string();
        }
        String::from_utf8(buffer).unwrap_or_else(|_| "Error encoding metrics".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes() {
        let metrics = Metrics::new("flexiflo").unwrap();
        metrics.record("jobs", "create", 201);
        metrics.record("jobs", "create", 400);
        metrics.record("jobs", "create", 400);
        metrics.record("jobs", "get", 500);

        assert_eq!(metrics.count("jobs", "create", "success"), 1);
        assert_eq!(metrics.count("jobs", "create", "client_error"), 2);
        assert_eq!(metrics.count("jobs", "get", "server_error"), 1);
        assert!(metrics
            .render()
            .contains("flexiflo_record_operations_total{collection=\"jobs\",operation=\"create\",outcome=\"success\"} 1"));
    }
}
