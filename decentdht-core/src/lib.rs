//! DecentDHT store adapter
//!
//! Exposes a DecentDHT binding as a document key-value store for workload
//! drivers: field maps are encoded as flat JSON documents and every operation
//! reports a [`Status`].

pub mod adapter;
pub mod binding;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod test_utils;

pub use adapter::{
    client_from_config, Db, DirectClient, Operation, Record, Status, StoreAdapter, TicketedClient,
};
pub use binding::{
    BindingError, BindingLifecycle, BindingResult, BindingState, ConnectMode, DhtBinding,
    DhtTransport, DirectBinding, LifecycleError, MemoryTransport, TicketConfig, TicketedBinding,
};
pub use config::{BindingKind, Config, ConfigError};
pub use document::{Document, DocumentError, FieldValue, SerializedDocument};
pub use error::{AdapterError, AdapterResult};
pub use logging::{init_logging, LogLevel};
