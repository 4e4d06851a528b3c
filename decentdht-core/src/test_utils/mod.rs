//! Test utilities shared by unit tests, integration tests and benches
//!
//! Provides record fixtures, a transport wrapper that injects failures and
//! records the calls it forwards, and a `metrics` recorder for assertions.

pub mod fixtures;
pub mod faulty_transport;
pub mod recorder;

pub use fixtures::*;
pub use faulty_transport::*;
pub use recorder::CapturingRecorder;
