/*
    Transport - the seam to the DecentDHT client library

    Responsibilities:
    `transport.rs` defines what the bindings need from the client library that
    actually talks to the DHT: open/close a connection, get/put/replace/remove a
    value under a key, and hand out tickets for the non-enclave mode.

    Wire protocol, consensus and replication all live behind this trait.

    Inputs:
    - connection requests from a binding's initialize/cleanup
    - single-key requests from binding operations

    Outputs:
    - stored values (or their absence)
    - ticket ids
*/

use std::sync::Arc;

use super::error::BindingResult;

/// Identifier of a ticket handed out by the DHT
pub type TicketId = u64;

/// Deployment mode requested when connecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectMode {
    /// Trusted-execution backed client, no ticketing
    Enclave,
    /// Untrusted client, every operation runs under a ticket
    NonEnclave,
}

impl ConnectMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectMode::Enclave => "enclave",
            ConnectMode::NonEnclave => "non-enclave",
        }
    }
}

/// Client-side access to the DHT.
///
/// Calls are synchronous and blocking. One transport may back several
/// bindings at once, so implementations synchronize internally.
pub trait DhtTransport: Send + Sync {
    /// Open a connection in the given mode
    fn connect(&self, mode: ConnectMode) -> BindingResult<()>;

    /// Close a connection previously opened with `connect`
    fn disconnect(&self) -> BindingResult<()>;

    /// Fetch the value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> BindingResult<Option<String>>;

    /// Store `value` under `key`, overwriting any previous value
    fn put(&self, key: &str, value: &str) -> BindingResult<()>;

    /// Atomically swap the value under an existing `key`.
    ///
    /// Returns `BindingError::NotFound` if nothing is stored under `key`.
    fn replace(&self, key: &str, value: &str) -> BindingResult<()>;

    /// Remove the value under `key`.
    ///
    /// Returns `BindingError::NotFound` if nothing is stored under `key`.
    fn remove(&self, key: &str) -> BindingResult<()>;

    /// Obtain a new ticket good for `max_ops` operations (`None` = unbounded)
    fn issue_ticket(&self, max_ops: Option<u64>) -> BindingResult<TicketId>;
}

impl<T: DhtTransport + ?Sized> DhtTransport for Arc<T> {
    fn connect(&self, mode: ConnectMode) -> BindingResult<()> {
        (**self).connect(mode)
    }

    fn disconnect(&self) -> BindingResult<()> {
        (**self).disconnect()
    }

    fn get(&self, key: &str) -> BindingResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> BindingResult<()> {
        (**self).put(key, value)
    }

    fn replace(&self, key: &str, value: &str) -> BindingResult<()> {
        (**self).replace(key, value)
    }

    fn remove(&self, key: &str) -> BindingResult<()> {
        (**self).remove(key)
    }

    fn issue_ticket(&self, max_ops: Option<u64>) -> BindingResult<TicketId> {
        (**self).issue_ticket(max_ops)
    }
}
