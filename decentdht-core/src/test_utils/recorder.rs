//! In-process `metrics` recorder for assertions
//!
//! Install it for a closure with `metrics::with_local_recorder`; counters and
//! histogram samples are kept per name and label set.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ::metrics::{
    Counter, CounterFn, Gauge, Histogram, HistogramFn, Key, KeyName, Metadata, Recorder,
    SharedString, Unit,
};

/// Metric name plus its labels, sorted by label name
type MetricKey = (String, Vec<(String, String)>);

fn metric_key(name: &str, labels: &[(&str, &str)]) -> MetricKey {
    let mut labels: Vec<(String, String)> =
        labels.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    labels.sort();
    (name.to_string(), labels)
}

fn key_of(key: &Key) -> MetricKey {
    let mut labels: Vec<(String, String)> =
        key.labels().map(|label| (label.key().to_string(), label.value().to_string())).collect();
    labels.sort();
    (key.name().to_string(), labels)
}

#[derive(Debug, Default)]
struct Captured {
    counters: HashMap<MetricKey, u64>,
    histograms: HashMap<MetricKey, Vec<f64>>,
}

/// Recorder that keeps every counter increment and histogram sample.
///
/// Clones share the captured values. Gauges are ignored.
#[derive(Debug, Clone, Default)]
pub struct CapturingRecorder {
    captured: Arc<Mutex<Captured>>,
}

impl CapturingRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of the counter `name` with exactly `labels`
    pub fn counter(&self, name: &str, labels: &[(&str, &str)]) -> u64 {
        let key = metric_key(name, labels);
        self.captured
            .lock()
            .map(|captured| captured.counters.get(&key).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Samples recorded into the histogram `name` with exactly `labels`
    pub fn histogram(&self, name: &str, labels: &[(&str, &str)]) -> Vec<f64> {
        let key = metric_key(name, labels);
        self.captured
            .lock()
            .map(|captured| captured.histograms.get(&key).cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

struct CapturedCounter {
    key: MetricKey,
    captured: Arc<Mutex<Captured>>,
}

impl CounterFn for CapturedCounter {
    fn increment(&self, value: u64) {
        if let Ok(mut captured) = self.captured.lock() {
            *captured.counters.entry(self.key.clone()).or_insert(0) += value;
        }
    }

    fn absolute(&self, value: u64) {
        if let Ok(mut captured) = self.captured.lock() {
            let current = captured.counters.entry(self.key.clone()).or_insert(0);
            *current = (*current).max(value);
        }
    }
}

struct CapturedHistogram {
    key: MetricKey,
    captured: Arc<Mutex<Captured>>,
}

impl HistogramFn for CapturedHistogram {
    fn record(&self, value: f64) {
        if let Ok(mut captured) = self.captured.lock() {
            captured.histograms.entry(self.key.clone()).or_default().push(value);
        }
    }
}

impl Recorder for CapturingRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(Arc::new(CapturedCounter {
            key: key_of(key),
            captured: Arc::clone(&self.captured),
        }))
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::from_arc(Arc::new(CapturedHistogram {
            key: key_of(key),
            captured: Arc::clone(&self.captured),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_per_label_set() {
        let recorder = CapturingRecorder::new();

        ::metrics::with_local_recorder(&recorder, || {
            ::metrics::counter!("calls", "kind" => "a").increment(2);
            ::metrics::counter!("calls", "kind" => "b").increment(1);
            ::metrics::counter!("calls", "kind" => "a").increment(1);
            ::metrics::histogram!("latency").record(1.5);
        });

        assert_eq!(recorder.counter("calls", &[("kind", "a")]), 3);
        assert_eq!(recorder.counter("calls", &[("kind", "b")]), 1);
        assert_eq!(recorder.counter("calls", &[]), 0);
        assert_eq!(recorder.histogram("latency", &[]), vec![1.5]);
    }
}
