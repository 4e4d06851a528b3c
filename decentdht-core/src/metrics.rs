//! Metrics for adapter operations
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding binary installs a recorder.

use ::metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::{Duration, Instant};

use crate::adapter::{Operation, Status};

/// Counter of adapter operations, labelled by `op` and `status`
pub const OPERATIONS_TOTAL: &str = "adapter.operations.total";
/// Histogram of adapter operation latency, labelled by `op`
pub const OPERATION_DURATION_MS: &str = "adapter.operation.duration_ms";
/// Counter of tickets acquired by ticketed bindings
pub const TICKETS_ISSUED: &str = "binding.tickets.issued";

/// Register metric descriptions
pub fn init_metrics() {
    describe_counter!(OPERATIONS_TOTAL, "Adapter operations by operation and status");
    describe_histogram!(OPERATION_DURATION_MS, "Adapter operation duration in milliseconds");
    describe_counter!(TICKETS_ISSUED, "Tickets acquired by ticketed bindings");
}

/// Record the outcome of one adapter operation
pub fn record_operation(op: Operation, status: &Status, elapsed: Duration) {
    counter!(OPERATIONS_TOTAL, "op" => op.as_str(), "status" => status.label()).increment(1);
    histogram!(OPERATION_DURATION_MS, "op" => op.as_str()).record(elapsed.as_secs_f64() * 1000.0);
}

/// Timer for measuring operation duration
pub struct Timer {
    op: Operation,
    start: Instant,
}

impl Timer {
    pub fn start(op: Operation) -> Self {
        Self { op, start: Instant::now() }
    }

    /// Record the operation with its final status
    pub fn finish(self, status: &Status) {
        record_operation(self.op, status, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::CapturingRecorder;

    #[test]
    fn test_metrics_init() {
        init_metrics();
        // Descriptions only; a fresh recorder still starts at zero
        let recorder = CapturingRecorder::new();
        ::metrics::with_local_recorder(&recorder, init_metrics);
        assert_eq!(recorder.counter(OPERATIONS_TOTAL, &[("op", "read"), ("status", "ok")]), 0);
    }

    #[test]
    fn test_record_operation_labels() {
        let recorder = CapturingRecorder::new();

        ::metrics::with_local_recorder(&recorder, || {
            record_operation(Operation::Read, &Status::Ok, Duration::from_millis(4));
            record_operation(Operation::Read, &Status::error("boom"), Duration::from_millis(2));
            record_operation(Operation::Read, &Status::Ok, Duration::from_millis(1));
        });

        assert_eq!(recorder.counter(OPERATIONS_TOTAL, &[("op", "read"), ("status", "ok")]), 2);
        assert_eq!(recorder.counter(OPERATIONS_TOTAL, &[("op", "read"), ("status", "error")]), 1);
        assert_eq!(recorder.counter(OPERATIONS_TOTAL, &[("op", "insert"), ("status", "ok")]), 0);

        let samples = recorder.histogram(OPERATION_DURATION_MS, &[("op", "read")]);
        assert_eq!(samples.len(), 3);
        for (sample, expected) in samples.iter().zip([4.0, 2.0, 1.0]) {
            assert!((sample - expected).abs() < 1e-9, "{} != {}", sample, expected);
        }
    }

    #[test]
    fn test_timer() {
        let recorder = CapturingRecorder::new();

        ::metrics::with_local_recorder(&recorder, || {
            let timer = Timer::start(Operation::Scan);
            std::thread::sleep(Duration::from_millis(1));
            timer.finish(&Status::NotImplemented);
        });

        assert_eq!(
            recorder.counter(OPERATIONS_TOTAL, &[("op", "scan"), ("status", "not_implemented")]),
            1
        );
        let samples = recorder.histogram(OPERATION_DURATION_MS, &[("op", "scan")]);
        assert_eq!(samples.len(), 1);
        assert!(samples[0] >= 1.0);
    }
}
