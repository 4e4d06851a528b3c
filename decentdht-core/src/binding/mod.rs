//! DHT bindings
//!
//! A binding is the adapter's view of the DecentDHT client library. Two
//! variants exist:
//!
//! - [`DirectBinding`]: enclave-backed, no batching, no native update.
//! - [`TicketedBinding`]: non-enclave, operations run under tickets bounded by
//!   [`TicketConfig`], native whole-document update.
//!
//! Both talk to the DHT through a [`DhtTransport`]. [`BindingLifecycle`] owns a
//! binding and enforces the initialize/use/cleanup ordering.

use std::fmt;

use crate::document::SerializedDocument;

mod direct;
mod error;
mod lifecycle;
mod memory;
mod ticket;
mod ticketed;
mod transport;

pub use direct::DirectBinding;
pub use error::{BindingError, BindingResult, LifecycleError};
pub use lifecycle::{BindingLifecycle, BindingState};
pub use memory::MemoryTransport;
pub use ticket::TicketConfig;
pub use ticketed::TicketedBinding;
pub use transport::{ConnectMode, DhtTransport, TicketId};

/// Capability set shared by every binding variant.
///
/// Calls are synchronous and may fail independently; nothing is retried here.
pub trait DhtBinding {
    /// Parameters accepted by `initialize`
    type Config: fmt::Debug + Clone;

    /// Short name used in logs and error messages
    const NAME: &'static str;

    /// Whether `update` is offered natively.
    ///
    /// When false the adapter falls back to delete followed by insert.
    const NATIVE_UPDATE: bool;

    /// Open the underlying connection
    fn initialize(&mut self, config: &Self::Config) -> BindingResult<()>;

    /// Release the underlying connection
    fn cleanup(&mut self) -> BindingResult<()>;

    /// Fetch the document under `key`, `BindingError::NotFound` if absent
    fn read(&mut self, key: &str) -> BindingResult<SerializedDocument>;

    /// Store `doc` under `key`
    fn insert(&mut self, key: &str, doc: &SerializedDocument) -> BindingResult<()>;

    /// Remove the document under `key`
    fn delete(&mut self, key: &str) -> BindingResult<()>;

    /// Replace the whole document under `key`.
    ///
    /// Only meaningful when `NATIVE_UPDATE` is true.
    fn update(&mut self, key: &str, doc: &SerializedDocument) -> BindingResult<()> {
        let _ = (key, doc);
        Err(BindingError::Unsupported { binding: Self::NAME, operation: "update" })
    }
}
