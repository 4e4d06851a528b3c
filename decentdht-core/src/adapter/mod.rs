/*
    StoreAdapter - document key-value store on top of a DHT binding

    Responsibilities:
    `adapter` implements the workload driver contract (`Db`) for any
    `DhtBinding`:
    - insert: encode the field map, binding insert
    - read: binding read, decode with optional projection
    - update: native update when the binding has one, otherwise delete then insert
    - delete: binding delete
    - scan: not offered, always NotImplemented

    Every failure below this layer (lifecycle, binding, codec) is turned into a
    `Status::Error` here; nothing escapes as a panic or a raw error.

    The delete-then-insert update is not atomic. Between the two calls the key is
    absent to other readers, and a writer racing the insert can be overwritten.
*/

use std::collections::HashSet;

use tracing::{debug, info, trace, warn};

use crate::binding::{
    BindingLifecycle, BindingState, DhtBinding, DhtTransport, DirectBinding, TicketConfig,
    TicketedBinding,
};
use crate::config::{BindingConfig, BindingKind};
use crate::document::{self, Document, FieldValue};
use crate::error::AdapterResult;
use crate::metrics::Timer;

mod db;
mod status;

pub use db::{Db, Record};
pub use status::{Operation, Status};

/// Adapter over the enclave binding
pub type DirectClient<T> = StoreAdapter<DirectBinding<T>>;

/// Adapter over the non-enclave, ticket-batched binding
pub type TicketedClient<T> = StoreAdapter<TicketedBinding<T>>;

/// Build the client selected by `config` on top of `transport`
pub fn client_from_config<T>(config: &BindingConfig, transport: T) -> Box<dyn Db + Send>
where
    T: DhtTransport + 'static,
{
    match config.kind {
        BindingKind::Direct => {
            if config.max_ops_per_ticket != TicketConfig::Unbounded {
                info!(
                    max_ops_per_ticket = %config.max_ops_per_ticket,
                    "ticket bound ignored by the direct binding"
                );
            }
            Box::new(StoreAdapter::direct(transport))
        }
        BindingKind::Ticketed => {
            Box::new(StoreAdapter::ticketed(transport, config.max_ops_per_ticket))
        }
    }
}

/// Document store backed by a single DHT binding.
///
/// One instance per worker; operations take `&mut self` and are never run
/// concurrently on the same instance.
#[derive(Debug)]
pub struct StoreAdapter<B: DhtBinding> {
    lifecycle: BindingLifecycle<B>,
    config: B::Config,
}

impl<T: DhtTransport> StoreAdapter<DirectBinding<T>> {
    pub fn direct(transport: T) -> Self {
        Self::new(DirectBinding::new(transport), ())
    }
}

impl<T: DhtTransport> StoreAdapter<TicketedBinding<T>> {
    pub fn ticketed(transport: T, config: TicketConfig) -> Self {
        Self::new(TicketedBinding::new(transport), config)
    }
}

impl<B: DhtBinding> StoreAdapter<B> {
    /// Wrap `binding`; `config` is handed to the binding on `init`
    pub fn new(binding: B, config: B::Config) -> Self {
        StoreAdapter { lifecycle: BindingLifecycle::new(binding), config }
    }

    pub fn state(&self) -> BindingState {
        self.lifecycle.state()
    }

    pub fn binding(&self) -> &B {
        self.lifecycle.binding()
    }

    pub fn config(&self) -> &B::Config {
        &self.config
    }

    /// Fetch and decode the document under `key`
    pub fn read_document(
        &mut self,
        key: &str,
        fields: Option<&HashSet<String>>,
    ) -> AdapterResult<Document> {
        let binding = self.lifecycle.ready()?;
        let raw = binding.read(key)?;
        Ok(document::decode(&raw, fields)?)
    }

    /// Encode `values` and store them under `key`
    pub fn insert_document(&mut self, key: &str, values: &Record) -> AdapterResult<()> {
        let binding = self.lifecycle.ready()?;
        let doc = document::encode(values)?;
        binding.insert(key, &doc)?;
        Ok(())
    }

    /// Replace the document under `key` with `values`.
    ///
    /// Encoding happens first, so a value that cannot be encoded leaves the
    /// stored document untouched. Without a native update the binding sees a
    /// delete followed by an insert; the first failing step is returned.
    pub fn update_document(&mut self, key: &str, values: &Record) -> AdapterResult<()> {
        let binding = self.lifecycle.ready()?;
        let doc = document::encode(values)?;

        if B::NATIVE_UPDATE {
            binding.update(key, &doc)?;
        } else {
            trace!(key, binding = B::NAME, "update as delete + insert");
            binding.delete(key)?;
            binding.insert(key, &doc)?;
        }
        Ok(())
    }

    /// Remove the document under `key`
    pub fn delete_document(&mut self, key: &str) -> AdapterResult<()> {
        let binding = self.lifecycle.ready()?;
        binding.delete(key)?;
        Ok(())
    }

    fn complete(op: Operation, key: &str, timer: Timer, status: Status) -> Status {
        match &status {
            Status::Error(reason) => warn!(op = op.as_str(), key, reason = %reason, "operation failed"),
            _ => debug!(op = op.as_str(), key, status = status.label(), "operation complete"),
        }
        timer.finish(&status);
        status
    }

    fn status_of(result: AdapterResult<()>) -> Status {
        match result {
            Ok(()) => Status::Ok,
            Err(e) => Status::error(e),
        }
    }
}

impl<B: DhtBinding> Db for StoreAdapter<B> {
    fn init(&mut self) -> AdapterResult<()> {
        self.lifecycle.initialize(&self.config)
    }

    fn cleanup(&mut self) -> AdapterResult<()> {
        self.lifecycle.cleanup()
    }

    fn read(
        &mut self,
        _table: &str,
        key: &str,
        fields: Option<&HashSet<String>>,
        result: &mut Record,
    ) -> Status {
        let timer = Timer::start(Operation::Read);

        let status = match self.read_document(key, fields) {
            // The read itself worked, but an empty projection counts as a miss
            Ok(document) if document.is_empty() => {
                Status::error(format!("No fields returned for key {}", key))
            }
            Ok(document) => {
                result.extend(document.into_iter().map(|(name, value)| (name, FieldValue::from(value))));
                Status::Ok
            }
            Err(e) => Status::error(e),
        };

        Self::complete(Operation::Read, key, timer, status)
    }

    fn scan(
        &mut self,
        _table: &str,
        start_key: &str,
        record_count: usize,
        _fields: Option<&HashSet<String>>,
        _result: &mut Vec<Record>,
    ) -> Status {
        let timer = Timer::start(Operation::Scan);
        trace!(start_key, record_count, "scan not supported");
        Self::complete(Operation::Scan, start_key, timer, Status::NotImplemented)
    }

    fn update(&mut self, _table: &str, key: &str, values: &Record) -> Status {
        let timer = Timer::start(Operation::Update);
        let status = Self::status_of(self.update_document(key, values));
        Self::complete(Operation::Update, key, timer, status)
    }

    fn insert(&mut self, _table: &str, key: &str, values: &Record) -> Status {
        let timer = Timer::start(Operation::Insert);
        let status = Self::status_of(self.insert_document(key, values));
        Self::complete(Operation::Insert, key, timer, status)
    }

    fn delete(&mut self, _table: &str, key: &str) -> Status {
        let timer = Timer::start(Operation::Delete);
        let status = Self::status_of(self.delete_document(key));
        Self::complete(Operation::Delete, key, timer, status)
    }
}
