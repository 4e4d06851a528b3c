/*
    MemoryTransport - in-process stand-in for a DecentDHT deployment

    Responsibilities:
    `memory.rs` implements `DhtTransport` over a shared in-memory map so the
    adapter can be driven without a live DHT (tests, benches, the smoke CLI).
    It handles:
    - get/put/replace/remove of string values
    - connection accounting (operations require an open connection)
    - ticket issuance for non-enclave bindings

    Clones share the same map, like several clients attached to one DHT.

    Inputs:
    - requests from bindings: connect, disconnect, get, put, replace, remove, issue_ticket

    Outputs:
    - stored values
    - NotFound / NotConnected failures
    - ticket ids
*/

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use super::error::{BindingError, BindingResult};
use super::transport::{ConnectMode, DhtTransport, TicketId};

/// Stored value with its write revision
#[derive(Debug, Clone)]
struct StoredEntry {
    value: String,
    /// Global write counter at the time of the last write to this key
    revision: u64,
}

type Store = HashMap<String, StoredEntry>;

#[derive(Debug, Default)]
struct Shared {
    store: RwLock<Store>,
    connections: AtomicUsize,
    tickets_issued: AtomicU64,
    writes: AtomicU64,
}

/// Shared in-memory DHT
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    inner: Arc<Shared>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open connections
    pub fn connections(&self) -> usize {
        self.inner.connections.load(Ordering::SeqCst)
    }

    /// Total tickets handed out since creation
    pub fn tickets_issued(&self) -> u64 {
        self.inner.tickets_issued.load(Ordering::SeqCst)
    }

    /// Number of stored keys
    pub fn len(&self) -> BindingResult<usize> {
        Ok(self.read_store()?.len())
    }

    pub fn is_empty(&self) -> BindingResult<bool> {
        Ok(self.read_store()?.is_empty())
    }

    /// Read a value without going through a connection.
    ///
    /// Inspection helper for tests: `None` when the key is absent or the map
    /// is poisoned.
    pub fn inspect(&self, key: &str) -> Option<String> {
        self.read_store().ok()?.get(key).map(|entry| entry.value.clone())
    }

    /// Revision of the value under `key`; same `None` rules as [`inspect`](Self::inspect)
    pub fn revision(&self, key: &str) -> Option<u64> {
        self.read_store().ok()?.get(key).map(|entry| entry.revision)
    }

    /// Write a raw value without a connection (for seeding tests)
    pub fn preload(&self, key: impl Into<String>, value: impl Into<String>) -> BindingResult<()> {
        let revision = self.next_revision();
        self.write_store()?.insert(key.into(), StoredEntry { value: value.into(), revision });
        Ok(())
    }

    fn read_store(&self) -> BindingResult<RwLockReadGuard<'_, Store>> {
        self.inner
            .store
            .read()
            .map_err(|e| BindingError::Transport(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_store(&self) -> BindingResult<RwLockWriteGuard<'_, Store>> {
        self.inner
            .store
            .write()
            .map_err(|e| BindingError::Transport(format!("Failed to acquire write lock: {}", e)))
    }

    fn next_revision(&self) -> u64 {
        self.inner.writes.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn ensure_connected(&self) -> BindingResult<()> {
        if self.connections() == 0 {
            return Err(BindingError::NotConnected);
        }
        Ok(())
    }
}

impl DhtTransport for MemoryTransport {
    fn connect(&self, mode: ConnectMode) -> BindingResult<()> {
        let open = self.inner.connections.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(mode = mode.as_str(), open, "memory transport connected");
        Ok(())
    }

    fn disconnect(&self) -> BindingResult<()> {
        self.inner
            .connections
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |open| open.checked_sub(1))
            .map(|_| ())
            .map_err(|_| BindingError::NotConnected)
    }

    fn get(&self, key: &str) -> BindingResult<Option<String>> {
        self.ensure_connected()?;
        Ok(self.read_store()?.get(key).map(|entry| entry.value.clone()))
    }

    fn put(&self, key: &str, value: &str) -> BindingResult<()> {
        self.ensure_connected()?;
        let revision = self.next_revision();
        self.write_store()?
            .insert(key.to_string(), StoredEntry { value: value.to_string(), revision });
        Ok(())
    }

    fn replace(&self, key: &str, value: &str) -> BindingResult<()> {
        self.ensure_connected()?;
        let revision = self.next_revision();
        match self.write_store()?.get_mut(key) {
            Some(entry) => {
                *entry = StoredEntry { value: value.to_string(), revision };
                Ok(())
            }
            None => Err(BindingError::NotFound(key.to_string())),
        }
    }

    fn remove(&self, key: &str) -> BindingResult<()> {
        self.ensure_connected()?;
        if self.write_store()?.remove(key).is_some() {
            Ok(())
        } else {
            Err(BindingError::NotFound(key.to_string()))
        }
    }

    fn issue_ticket(&self, max_ops: Option<u64>) -> BindingResult<TicketId> {
        self.ensure_connected()?;
        let ticket = self.inner.tickets_issued.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(ticket, ?max_ops, "memory transport issued ticket");
        Ok(ticket)
    }
}
